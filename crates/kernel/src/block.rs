//! A single block: resolved manifest, assets, render strategy, and the render
//! pipeline.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::assets::{AssetClass, BlockAssets};
use crate::error::{BlockError, BlockResult};
use crate::hooks::{ActionRegistry, Attributes, DEFAULT_PRIORITY, FilterRegistry, HostEvent, channel};
use crate::host::{BlockRegistration, HostPlatform};
use crate::location::{HostRoots, InstallLocation};
use crate::manifest::{BlockManifest, LoadedManifest};
use crate::render::{CallableRegistry, RenderStrategy, RenderTarget, TemplateContext, render_template};

/// Priority of the `init` subscription; late so other plugins can add filters first.
pub const INIT_PRIORITY: i32 = 50;

/// A block resolved from its manifest.
#[derive(Debug, Clone)]
pub struct Block {
    loaded: LoadedManifest,
    location: InstallLocation,
    assets: BlockAssets,
    render: RenderStrategy,
}

impl Block {
    /// Load the block whose manifest is colocated with `path`.
    pub fn load(path: &Path, roots: &HostRoots) -> BlockResult<Self> {
        let loaded = BlockManifest::load(path)?;
        Ok(Self::from_loaded(loaded, roots))
    }

    /// Build a block from an already parsed manifest.
    pub fn from_loaded(loaded: LoadedManifest, roots: &HostRoots) -> Self {
        let location = InstallLocation::detect(&loaded.dir, roots);
        let assets = BlockAssets::from_manifest(&loaded.manifest, &loaded.hook_name);

        Self {
            loaded,
            location,
            assets,
            render: RenderStrategy::Unset,
        }
    }

    pub fn name(&self) -> &str {
        &self.loaded.manifest.name
    }

    pub fn hook_name(&self) -> &str {
        &self.loaded.hook_name
    }

    pub fn manifest(&self) -> &BlockManifest {
        &self.loaded.manifest
    }

    /// Directory containing the block.
    pub fn dir(&self) -> &Path {
        &self.loaded.dir
    }

    pub fn location(&self) -> InstallLocation {
        self.location
    }

    pub fn assets(&self) -> &BlockAssets {
        &self.assets
    }

    pub fn render_strategy(&self) -> &RenderStrategy {
        &self.render
    }

    /// Set how the block renders when no override fires.
    ///
    /// Empty input is rejected and leaves the current strategy alone. A name
    /// that is neither a file nor a registered callable resets the strategy to
    /// unset; the block still registers and renders its placeholder.
    pub fn set_render(
        &mut self,
        target: impl Into<RenderTarget>,
        callables: &CallableRegistry,
    ) -> BlockResult<()> {
        match RenderStrategy::select(self.name(), target.into(), callables) {
            Ok(strategy) => {
                self.render = strategy;
                Ok(())
            }
            Err(e @ BlockError::UnsetRenderTarget { .. }) => {
                warn!(block = %self.name(), error = %e, "render target unusable");
                self.render = RenderStrategy::Unset;
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Subscribe the block to the host events it needs.
    pub fn init(&self, actions: &mut ActionRegistry) {
        actions.add_action(HostEvent::Init, self.name(), INIT_PRIORITY);

        if self.assets.has_editor_assets() {
            actions.add_action(HostEvent::AdminEnqueueScripts, self.name(), DEFAULT_PRIORITY);
        }

        if self.assets.has_frontend_assets() {
            actions.add_action(HostEvent::EnqueueScripts, self.name(), DEFAULT_PRIORITY);
        }
    }

    /// Run the handler for a host event.
    pub fn handle_event(&self, event: HostEvent, host: &dyn HostPlatform) {
        match event {
            HostEvent::Init => self.register(host),
            HostEvent::AdminEnqueueScripts => self.enqueue_editor_assets(host),
            HostEvent::EnqueueScripts => self.enqueue_frontend_assets(host),
        }
    }

    /// What the host receives on registration.
    pub fn registration(&self) -> BlockRegistration {
        BlockRegistration {
            name: self.name().to_string(),
            manifest: self.manifest().to_value(),
            render_callback: self.name().to_string(),
        }
    }

    /// Register the block type with the host.
    pub fn register(&self, host: &dyn HostPlatform) {
        debug!(block = %self.name(), location = %self.location, "registering block type");
        host.register_block_type(&self.registration());
    }

    /// Enqueue editor styles then editor scripts, inside the block editor only.
    pub fn enqueue_editor_assets(&self, host: &dyn HostPlatform) {
        if !host.is_block_editor() {
            return;
        }
        for style in &self.assets.editor_styles {
            host.enqueue_style(style);
        }
        for script in &self.assets.editor_scripts {
            host.enqueue_script(script);
        }
    }

    /// Enqueue front-end styles then front-end scripts.
    pub fn enqueue_frontend_assets(&self, host: &dyn HostPlatform) {
        for style in &self.assets.styles {
            host.enqueue_style(style);
        }
        for script in &self.assets.scripts {
            host.enqueue_script(script);
        }
    }

    /// Render the block.
    ///
    /// Attributes and content go through the global then the block-specific
    /// filter. An override filter wins over the template, which wins over the
    /// callable. Style and script enqueue decisions run regardless of which
    /// path produced the HTML. Filter and strategy errors propagate.
    pub fn render(
        &self,
        attributes: Attributes,
        content: impl Into<String>,
        filters: &FilterRegistry,
        host: &dyn HostPlatform,
    ) -> Result<String> {
        let hook = self.hook_name();

        let attributes = filters.apply_attributes(channel::ATTRIBUTES, attributes)?;
        let attributes =
            filters.apply_attributes(&channel::for_block(channel::ATTRIBUTES, hook), attributes)?;

        let content = filters.apply_content(channel::CONTENT, content.into())?;
        let content = filters.apply_content(&channel::for_block(channel::CONTENT, hook), content)?;

        let mut html =
            filters.apply_render(&channel::for_block(channel::RENDER, hook), &attributes, &content)?;

        if html.as_deref().is_none_or(str::is_empty) {
            if let RenderStrategy::Template(path) = &self.render {
                if path.is_file() {
                    let context = TemplateContext {
                        block: self.name(),
                        attributes: &attributes,
                        content: &content,
                    };
                    html = Some(render_template(path, &context)?);
                } else {
                    warn!(block = %self.name(), path = %path.display(), "template file disappeared");
                }
            }
        }

        if html.as_deref().is_none_or(str::is_empty) {
            if let RenderStrategy::Callable(f) = &self.render {
                html = f(&attributes, &content)
                    .with_context(|| format!("render callable of block '{}' failed", self.name()))?;
            }
        }

        self.enqueue_render_assets(filters, host)?;

        Ok(html.unwrap_or_else(|| self.fallback_html()))
    }

    /// Enqueue the block's registered style and script unless a filter says no.
    fn enqueue_render_assets(&self, filters: &FilterRegistry, host: &dyn HostPlatform) -> Result<()> {
        let hook = self.hook_name();

        if enqueue_allowed(filters, channel::IS_STYLE_ENQUEUE, hook)? {
            host.enqueue_registered_style(&AssetClass::Style.handle(hook));
        } else {
            debug!(block = %self.name(), "style enqueue disabled by filter");
        }

        if enqueue_allowed(filters, channel::IS_SCRIPT_ENQUEUE, hook)? {
            host.enqueue_registered_script(&AssetClass::Script.handle(hook));
        } else {
            debug!(block = %self.name(), "script enqueue disabled by filter");
        }

        Ok(())
    }

    /// Placeholder returned when nothing rendered the block.
    pub fn fallback_html(&self) -> String {
        format!("<div>no render for: {}</div>", self.name())
    }
}

/// Both the global and the per-block channel start at `true`; `false` from
/// either one vetoes the enqueue.
fn enqueue_allowed(filters: &FilterRegistry, base: &str, hook: &str) -> Result<bool> {
    let all_blocks = filters.apply_toggle(base, true)?;
    let this_block = filters.apply_toggle(&channel::for_block(base, hook), true)?;
    Ok(all_blocks && this_block)
}
