//! Block library: the table of registered blocks and the hooks they share.
//!
//! Built once at startup. The host dispatches its lifecycle events and render
//! requests here, addressing blocks by name.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::path::Path;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::block::Block;
use crate::error::{BlockError, BlockResult};
use crate::hooks::{ActionRegistry, Attributes, FilterRegistry, HostEvent};
use crate::host::HostPlatform;
use crate::location::HostRoots;
use crate::manifest::MANIFEST_FILE;
use crate::render::{CallableRegistry, RenderTarget};

/// Registered blocks keyed by name, with the action and filter registries.
#[derive(Debug, Default)]
pub struct BlockLibrary {
    blocks: BTreeMap<String, Block>,
    actions: ActionRegistry,
    filters: FilterRegistry,
    callables: CallableRegistry,
    roots: HostRoots,
}

impl BlockLibrary {
    pub fn new(roots: HostRoots) -> Self {
        Self {
            roots,
            ..Self::default()
        }
    }

    /// Load the block at `path` and subscribe it to host events.
    ///
    /// A block with the same name replaces the earlier one.
    pub fn register(&mut self, path: &Path) -> BlockResult<&Block> {
        let block = Block::load(path, &self.roots)?;
        let name = block.name().to_string();

        if self.blocks.contains_key(&name) {
            warn!(block = %name, path = %path.display(), "replacing previously registered block");
            self.actions.remove_block(&name);
        }

        block.init(&mut self.actions);
        info!(
            block = %name,
            hook = %block.hook_name(),
            location = %block.location(),
            "block registered"
        );

        Ok(match self.blocks.entry(name) {
            Entry::Occupied(mut occupied) => {
                occupied.insert(block);
                occupied.into_mut()
            }
            Entry::Vacant(vacant) => vacant.insert(block),
        })
    }

    /// Register every immediate subdirectory of `dir` holding a manifest.
    ///
    /// Invalid manifests are logged and skipped. Returns the names registered,
    /// in directory name order.
    pub fn discover(&mut self, dir: &Path) -> BlockResult<Vec<String>> {
        if !dir.is_dir() {
            return Err(BlockError::missing_file(dir));
        }

        let entries = std::fs::read_dir(dir).map_err(|_| BlockError::missing_file(dir))?;
        let mut candidates: Vec<_> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.join(MANIFEST_FILE).is_file())
            .collect();
        candidates.sort();

        let mut registered = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            match self.register(&candidate) {
                Ok(block) => registered.push(block.name().to_string()),
                Err(e) => warn!(path = %candidate.display(), error = %e, "skipping block"),
            }
        }

        info!(dir = %dir.display(), count = registered.len(), "block discovery complete");
        Ok(registered)
    }

    /// Register a callable that render targets can name.
    pub fn register_callable<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&Attributes, &str) -> Result<Option<String>> + Send + Sync + 'static,
    {
        self.callables.register(name, f);
    }

    /// Set a block's render target.
    pub fn set_render(&mut self, block: &str, target: impl Into<RenderTarget>) -> BlockResult<()> {
        let entry = self
            .blocks
            .get_mut(block)
            .ok_or_else(|| BlockError::UnknownBlock {
                name: block.to_string(),
            })?;
        entry.set_render(target, &self.callables)
    }

    /// Fire a host event at every subscribed block, in priority order.
    pub fn dispatch(&self, event: HostEvent, host: &dyn HostPlatform) {
        let subscribers = self.actions.subscribers(event);
        if subscribers.is_empty() {
            debug!(event = %event, "no blocks subscribed to event");
            return;
        }

        for subscription in subscribers {
            match self.blocks.get(&subscription.block) {
                Some(block) => block.handle_event(event, host),
                None => warn!(event = %event, block = %subscription.block, "subscriber not registered"),
            }
        }

        debug!(event = %event, subscribers = subscribers.len(), "dispatch complete");
    }

    /// Render a block by name.
    pub fn render(
        &self,
        block: &str,
        attributes: Attributes,
        content: impl Into<String>,
        host: &dyn HostPlatform,
    ) -> Result<String> {
        let entry = self.get(block).ok_or_else(|| BlockError::UnknownBlock {
            name: block.to_string(),
        })?;
        entry.render(attributes, content, &self.filters, host)
    }

    pub fn get(&self, name: &str) -> Option<&Block> {
        self.blocks.get(name)
    }

    /// Blocks in name order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    pub fn filters(&self) -> &FilterRegistry {
        &self.filters
    }

    /// Filters are attached before rendering starts.
    pub fn filters_mut(&mut self) -> &mut FilterRegistry {
        &mut self.filters
    }
}
