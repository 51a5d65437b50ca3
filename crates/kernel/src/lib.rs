//! Offset Blocks Library
//!
//! Registers manifest-described blocks with a host CMS, wires their assets,
//! and renders them through a filterable pipeline.
//! The `offset-blocks` binary inspects and renders a blocks directory.

pub mod assets;
pub mod block;
pub mod config;
pub mod error;
pub mod hooks;
pub mod host;
pub mod library;
pub mod location;
pub mod manifest;
pub mod render;
pub mod slug;

pub use block::Block;
pub use error::{BlockError, BlockResult};
pub use library::BlockLibrary;
