//! Action registry - indexes which blocks subscribe to which host events.
//!
//! The registry maps each host event to an ordered list of block subscriptions.
//! Subscriptions are sorted by priority (lower = called first); equal
//! priorities keep registration order.

use std::collections::HashMap;
use std::fmt;

/// Host lifecycle events a block can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostEvent {
    /// Initialization phase; blocks register themselves with the host.
    Init,
    /// Admin asset phase; editor assets are enqueued here.
    AdminEnqueueScripts,
    /// Public asset phase; front-end assets are enqueued here.
    EnqueueScripts,
}

impl HostEvent {
    /// Host-side event name.
    pub fn name(self) -> &'static str {
        match self {
            HostEvent::Init => "init",
            HostEvent::AdminEnqueueScripts => "admin_enqueue_scripts",
            HostEvent::EnqueueScripts => "wp_enqueue_scripts",
        }
    }

    /// Parse a host-side event name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "init" => Some(HostEvent::Init),
            "admin_enqueue_scripts" => Some(HostEvent::AdminEnqueueScripts),
            "wp_enqueue_scripts" => Some(HostEvent::EnqueueScripts),
            _ => None,
        }
    }
}

impl fmt::Display for HostEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A block subscribed to a host event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSubscription {
    /// Name of the subscribed block.
    pub block: String,
    /// Priority for ordering (lower = called first).
    pub priority: i32,
}

/// Registry mapping host events to ordered block subscriptions.
#[derive(Debug, Default)]
pub struct ActionRegistry {
    subscriptions: HashMap<HostEvent, Vec<ActionSubscription>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a block to an event.
    pub fn add_action(&mut self, event: HostEvent, block: impl Into<String>, priority: i32) {
        let list = self.subscriptions.entry(event).or_default();
        list.push(ActionSubscription {
            block: block.into(),
            priority,
        });
        // Stable sort keeps registration order among equal priorities
        list.sort_by_key(|s| s.priority);
    }

    /// Drop every subscription of a block.
    pub fn remove_block(&mut self, block: &str) {
        for list in self.subscriptions.values_mut() {
            list.retain(|s| s.block != block);
        }
    }

    /// Subscriptions for an event, in call order.
    ///
    /// Returns an empty slice if nothing subscribes to the event.
    pub fn subscribers(&self, event: HostEvent) -> &[ActionSubscription] {
        self.subscriptions
            .get(&event)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Check whether a block subscribes to an event.
    pub fn has_action(&self, event: HostEvent, block: &str) -> bool {
        self.subscribers(event).iter().any(|s| s.block == block)
    }

    /// Number of subscriptions for an event.
    pub fn action_count(&self, event: HostEvent) -> usize {
        self.subscribers(event).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_registry() {
        let registry = ActionRegistry::new();
        assert!(registry.subscribers(HostEvent::Init).is_empty());
        assert_eq!(registry.action_count(HostEvent::Init), 0);
        assert!(!registry.has_action(HostEvent::Init, "offset/hero"));
    }

    #[test]
    fn subscribers_sorted_by_priority() {
        let mut registry = ActionRegistry::new();
        registry.add_action(HostEvent::Init, "late", 50);
        registry.add_action(HostEvent::Init, "early", 5);
        registry.add_action(HostEvent::Init, "default", 10);

        let order: Vec<_> = registry
            .subscribers(HostEvent::Init)
            .iter()
            .map(|s| s.block.as_str())
            .collect();
        assert_eq!(order, vec!["early", "default", "late"]);
    }

    #[test]
    fn equal_priority_keeps_registration_order() {
        let mut registry = ActionRegistry::new();
        registry.add_action(HostEvent::EnqueueScripts, "b", 10);
        registry.add_action(HostEvent::EnqueueScripts, "a", 10);
        registry.add_action(HostEvent::EnqueueScripts, "c", 10);

        let order: Vec<_> = registry
            .subscribers(HostEvent::EnqueueScripts)
            .iter()
            .map(|s| s.block.as_str())
            .collect();
        assert_eq!(order, vec!["b", "a", "c"]);
    }

    #[test]
    fn remove_block_clears_all_events() {
        let mut registry = ActionRegistry::new();
        registry.add_action(HostEvent::Init, "hero", 50);
        registry.add_action(HostEvent::EnqueueScripts, "hero", 10);
        registry.add_action(HostEvent::Init, "card", 50);

        registry.remove_block("hero");
        assert!(!registry.has_action(HostEvent::Init, "hero"));
        assert!(!registry.has_action(HostEvent::EnqueueScripts, "hero"));
        assert!(registry.has_action(HostEvent::Init, "card"));
    }

    #[test]
    fn event_names_round_trip() {
        for event in [
            HostEvent::Init,
            HostEvent::AdminEnqueueScripts,
            HostEvent::EnqueueScripts,
        ] {
            assert_eq!(HostEvent::from_name(event.name()), Some(event));
        }
        assert_eq!(HostEvent::from_name("shutdown"), None);
    }
}
