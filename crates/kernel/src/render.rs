//! Render strategies and template execution.
//!
//! A block renders through one of:
//! - a Tera template file, rendered with a typed `attributes`/`content` context
//! - a callable, either a closure or one registered by name
//!
//! The strategy is chosen once, when the render target is set, and consulted
//! on every render.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};
use tracing::debug;

use crate::error::{BlockError, BlockResult};
use crate::hooks::Attributes;

/// A render function: filtered attributes and content in, HTML out.
///
/// Returning `None` means the callable produced nothing, which makes the
/// pipeline fall back to its diagnostic placeholder.
pub type RenderCallable = Arc<dyn Fn(&Attributes, &str) -> Result<Option<String>> + Send + Sync>;

/// What the caller hands to the strategy selector.
#[derive(Clone)]
pub enum RenderTarget {
    /// A template path, or the name of a registered callable.
    Name(String),
    /// A closure.
    Callable(RenderCallable),
}

impl RenderTarget {
    /// Wrap a closure as a render target.
    pub fn callable<F>(f: F) -> Self
    where
        F: Fn(&Attributes, &str) -> Result<Option<String>> + Send + Sync + 'static,
    {
        RenderTarget::Callable(Arc::new(f))
    }

    /// Whether the target carries nothing usable.
    pub fn is_empty(&self) -> bool {
        matches!(self, RenderTarget::Name(name) if name.is_empty())
    }
}

impl From<&str> for RenderTarget {
    fn from(value: &str) -> Self {
        RenderTarget::Name(value.to_string())
    }
}

impl From<String> for RenderTarget {
    fn from(value: String) -> Self {
        RenderTarget::Name(value)
    }
}

impl From<&Path> for RenderTarget {
    fn from(value: &Path) -> Self {
        RenderTarget::Name(value.to_string_lossy().into_owned())
    }
}

impl From<PathBuf> for RenderTarget {
    fn from(value: PathBuf) -> Self {
        RenderTarget::from(value.as_path())
    }
}

impl fmt::Debug for RenderTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderTarget::Name(name) => f.debug_tuple("Name").field(name).finish(),
            RenderTarget::Callable(_) => f.write_str("Callable(..)"),
        }
    }
}

/// Render callables addressable by name.
#[derive(Clone, Default)]
pub struct CallableRegistry {
    callables: HashMap<String, RenderCallable>,
}

impl CallableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callable under a name, replacing any previous one.
    pub fn register<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&Attributes, &str) -> Result<Option<String>> + Send + Sync + 'static,
    {
        self.callables.insert(name.into(), Arc::new(f));
    }

    pub fn get(&self, name: &str) -> Option<RenderCallable> {
        self.callables.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.callables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callables.is_empty()
    }
}

impl fmt::Debug for CallableRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.callables.keys()).finish()
    }
}

/// How a block produces its HTML when no override fires.
#[derive(Clone, Default)]
pub enum RenderStrategy {
    /// Nothing configured.
    #[default]
    Unset,
    /// Render a template file.
    Template(PathBuf),
    /// Call a function.
    Callable(RenderCallable),
}

impl RenderStrategy {
    /// Choose a strategy for `target`.
    ///
    /// Existing files win over registered callable names. Fails on empty input,
    /// and on a name that is neither a file nor a registered callable.
    pub fn select(
        block: &str,
        target: RenderTarget,
        callables: &CallableRegistry,
    ) -> BlockResult<Self> {
        if target.is_empty() {
            return Err(BlockError::MissingInput {
                what: "render target",
            });
        }

        match target {
            RenderTarget::Callable(f) => Ok(RenderStrategy::Callable(f)),
            RenderTarget::Name(name) => {
                let path = PathBuf::from(&name);
                if path.is_file() {
                    debug!(block = %block, path = %path.display(), "template render strategy");
                    return Ok(RenderStrategy::Template(path));
                }
                if let Some(f) = callables.get(&name) {
                    debug!(block = %block, callable = %name, "callable render strategy");
                    return Ok(RenderStrategy::Callable(f));
                }
                Err(BlockError::UnsetRenderTarget {
                    block: block.to_string(),
                    target: name,
                })
            }
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, RenderStrategy::Unset)
    }

    /// Short label for logs and the CLI.
    pub fn kind(&self) -> &'static str {
        match self {
            RenderStrategy::Unset => "unset",
            RenderStrategy::Template(_) => "template",
            RenderStrategy::Callable(_) => "callable",
        }
    }
}

impl fmt::Debug for RenderStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderStrategy::Unset => f.write_str("Unset"),
            RenderStrategy::Template(path) => f.debug_tuple("Template").field(path).finish(),
            RenderStrategy::Callable(_) => f.write_str("Callable(..)"),
        }
    }
}

/// Variables visible to a block template.
#[derive(Debug, Serialize)]
pub struct TemplateContext<'a> {
    /// Block name.
    pub block: &'a str,
    /// Filtered attributes.
    pub attributes: &'a Attributes,
    /// Filtered inner content.
    pub content: &'a str,
}

/// Read and render a template file.
///
/// The template is re-read on every call, so edits show up without a restart.
/// Autoescaping is off: `content` is already HTML.
pub fn render_template(path: &Path, context: &TemplateContext<'_>) -> BlockResult<String> {
    let source = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            BlockError::missing_file(path)
        } else {
            BlockError::Template {
                block: context.block.to_string(),
                path: path.display().to_string(),
                details: e.to_string(),
            }
        }
    })?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "block".to_string());

    let mut tera = Tera::default();
    tera.autoescape_on(Vec::new());
    tera.add_raw_template(&name, &source)
        .map_err(|e| BlockError::template(context.block, path, &e))?;

    let ctx = Context::from_serialize(context)
        .map_err(|e| BlockError::template(context.block, path, &e))?;

    tera.render(&name, &ctx)
        .map_err(|e| BlockError::template(context.block, path, &e))
}
