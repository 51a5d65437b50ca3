//! Host platform collaborator.
//!
//! Block registration and asset enqueueing belong to the host CMS. The core
//! only talks to it through [`HostPlatform`]; an adapter for the real host
//! implements the trait. [`RecordingHost`] keeps every call in memory and backs
//! the CLI and the tests.

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::assets::AssetDescriptor;

/// What the host receives when a block registers itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockRegistration {
    /// Block name as declared in the manifest.
    pub name: String,
    /// Full manifest, unknown keys included.
    pub manifest: Value,
    /// Key the host passes back to request a dynamic render.
    pub render_callback: String,
}

/// Entry points of the host CMS used by blocks.
pub trait HostPlatform: Send + Sync {
    /// Register a block type with the host.
    fn register_block_type(&self, registration: &BlockRegistration);

    /// Register and enqueue a stylesheet.
    fn enqueue_style(&self, asset: &AssetDescriptor);

    /// Register and enqueue a script.
    fn enqueue_script(&self, asset: &AssetDescriptor);

    /// Enqueue a stylesheet registered earlier under `handle`.
    fn enqueue_registered_style(&self, handle: &str);

    /// Enqueue a script registered earlier under `handle`.
    fn enqueue_registered_script(&self, handle: &str);

    /// Whether the current admin screen is the block editor.
    fn is_block_editor(&self) -> bool;
}

/// One call made against a [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum HostCall {
    RegisterBlockType(BlockRegistration),
    EnqueueStyle(AssetDescriptor),
    EnqueueScript(AssetDescriptor),
    EnqueueRegisteredStyle { handle: String },
    EnqueueRegisteredScript { handle: String },
}

/// In-memory host that records every call.
#[derive(Debug, Default)]
pub struct RecordingHost {
    calls: Mutex<Vec<HostCall>>,
    block_editor: bool,
}

impl RecordingHost {
    /// Host outside the block editor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Host whose current screen is the block editor.
    pub fn in_block_editor() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            block_editor: true,
        }
    }

    /// Snapshot of every call so far.
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().clone()
    }

    /// Forget recorded calls.
    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    /// Names of registered block types.
    pub fn registered_blocks(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                HostCall::RegisterBlockType(r) => Some(r.name.clone()),
                _ => None,
            })
            .collect()
    }

    /// Handles of every style enqueued, registered or by descriptor.
    pub fn enqueued_styles(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                HostCall::EnqueueStyle(a) => Some(a.handle.clone()),
                HostCall::EnqueueRegisteredStyle { handle } => Some(handle.clone()),
                _ => None,
            })
            .collect()
    }

    /// Handles of every script enqueued, registered or by descriptor.
    pub fn enqueued_scripts(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                HostCall::EnqueueScript(a) => Some(a.handle.clone()),
                HostCall::EnqueueRegisteredScript { handle } => Some(handle.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: HostCall) {
        self.calls.lock().push(call);
    }
}

impl HostPlatform for RecordingHost {
    fn register_block_type(&self, registration: &BlockRegistration) {
        debug!(block = %registration.name, "register_block_type");
        self.record(HostCall::RegisterBlockType(registration.clone()));
    }

    fn enqueue_style(&self, asset: &AssetDescriptor) {
        debug!(handle = %asset.handle, src = %asset.src, "enqueue_style");
        self.record(HostCall::EnqueueStyle(asset.clone()));
    }

    fn enqueue_script(&self, asset: &AssetDescriptor) {
        debug!(handle = %asset.handle, src = %asset.src, "enqueue_script");
        self.record(HostCall::EnqueueScript(asset.clone()));
    }

    fn enqueue_registered_style(&self, handle: &str) {
        debug!(handle = %handle, "enqueue_registered_style");
        self.record(HostCall::EnqueueRegisteredStyle {
            handle: handle.to_string(),
        });
    }

    fn enqueue_registered_script(&self, handle: &str) {
        debug!(handle = %handle, "enqueue_registered_script");
        self.record(HostCall::EnqueueRegisteredScript {
            handle: handle.to_string(),
        });
    }

    fn is_block_editor(&self) -> bool {
        self.block_editor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_call_order() {
        let host = RecordingHost::new();
        host.enqueue_registered_style("a_style");
        host.enqueue_registered_script("a_script");
        host.enqueue_registered_style("b_style");

        assert_eq!(host.calls().len(), 3);
        assert_eq!(host.enqueued_styles(), vec!["a_style", "b_style"]);
        assert_eq!(host.enqueued_scripts(), vec!["a_script"]);

        host.clear();
        assert!(host.calls().is_empty());
    }

    #[test]
    fn block_editor_flag() {
        assert!(!RecordingHost::new().is_block_editor());
        assert!(RecordingHost::in_block_editor().is_block_editor());
    }
}
