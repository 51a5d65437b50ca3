//! Hook system for blocks.
//!
//! Two kinds of hooks exist:
//! - **Actions**: host events (`init`, asset enqueue phases) that blocks
//!   subscribe to. Subscribers run in priority order (lower = earlier).
//! - **Filters**: named channels that third parties attach transforms to.
//!   Transform channels (attributes, content, enqueue toggles) compose every
//!   handler; the render channel stops at the first non-empty result.

mod actions;
mod filters;

pub use actions::{ActionRegistry, ActionSubscription, HostEvent};
pub use filters::{Attributes, FilterRegistry, channel};

/// Priority used when none is given.
pub const DEFAULT_PRIORITY: i32 = 10;
