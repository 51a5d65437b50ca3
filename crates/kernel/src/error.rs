//! Block error types with clear, actionable messages.
//!
//! Every fallible loader or selector operation returns one of these instead of
//! panicking; callers check the result before proceeding.

use std::error::Error as _;
use std::path::Path;

use thiserror::Error;

/// Errors that can occur while loading, configuring, or rendering a block.
#[derive(Debug, Error)]
pub enum BlockError {
    /// A required input (path or render target) was empty.
    #[error("missing input: {what} must not be empty")]
    MissingInput { what: &'static str },

    /// The given path, or the manifest expected next to it, does not exist.
    #[error("file not found: {path}")]
    MissingFile { path: String },

    /// The manifest could not be read, parsed, or lacks a name.
    #[error("invalid block manifest at {path}: {details}")]
    InvalidManifest { path: String, details: String },

    /// The render target is neither an existing file nor a known callable.
    #[error("block '{block}': render target '{target}' is neither a template file nor a registered callable")]
    UnsetRenderTarget { block: String, target: String },

    /// No block is registered under the requested name.
    #[error("no block registered as '{name}'")]
    UnknownBlock { name: String },

    /// A template file failed to load or render.
    #[error("block '{block}': template {path} failed: {details}")]
    Template {
        block: String,
        path: String,
        details: String,
    },
}

impl BlockError {
    /// Create a missing file error.
    pub fn missing_file(path: &Path) -> Self {
        Self::MissingFile {
            path: path.display().to_string(),
        }
    }

    /// Create an invalid manifest error.
    pub fn invalid_manifest(path: &Path, details: impl Into<String>) -> Self {
        Self::InvalidManifest {
            path: path.display().to_string(),
            details: details.into(),
        }
    }

    /// Create a template error, flattening the source chain into the message.
    pub fn template(block: impl Into<String>, path: &Path, err: &tera::Error) -> Self {
        let mut details = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            details.push_str(": ");
            details.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::Template {
            block: block.into(),
            path: path.display().to_string(),
            details,
        }
    }
}

/// Result type alias using BlockError.
pub type BlockResult<T> = Result<T, BlockError>;
