//! Parser for block `block.json` manifest files.
//!
//! Each block directory holds a `block.json` that declares:
//! - the block name (required, used to derive the hook name)
//! - editor and front-end asset paths (`editorScript`, `editorStyle`, `script`, `style`)
//! - an `offset` extension object with the asset base URL and per-asset overrides
//!
//! Keys this crate does not interpret are kept so the full manifest can be
//! handed to the host's registration entry point unchanged.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::assets::AssetVersion;
use crate::error::{BlockError, BlockResult};
use crate::slug::{is_hook_name, slugify};

/// File name of the manifest colocated with each block.
pub const MANIFEST_FILE: &str = "block.json";

/// Manifest key holding the vendor extension object.
pub const VENDOR_NAMESPACE: &str = "offset";

/// Block metadata parsed from `block.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockManifest {
    /// Block name, usually namespaced (e.g. "offset/hero").
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Script loaded in the block editor.
    #[serde(default, deserialize_with = "null_as_default")]
    pub editor_script: String,

    /// Stylesheet loaded in the block editor.
    #[serde(default, deserialize_with = "null_as_default")]
    pub editor_style: String,

    /// Script loaded on the public site.
    #[serde(default, deserialize_with = "null_as_default")]
    pub script: String,

    /// Stylesheet loaded on the public site.
    #[serde(default, deserialize_with = "null_as_default")]
    pub style: String,

    /// Vendor extension object.
    #[serde(
        default,
        rename = "offset",
        deserialize_with = "null_as_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub offset: Option<OffsetExtension>,

    /// Every other key (title, category, attributes, supports, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `offset` extension object of a manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffsetExtension {
    /// Base URL the block's asset paths are resolved against.
    #[serde(default, deserialize_with = "null_as_default")]
    pub block_url: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub editor_script: AssetOverrides,

    #[serde(default, deserialize_with = "null_as_default")]
    pub editor_style: AssetOverrides,

    #[serde(default, deserialize_with = "null_as_default")]
    pub script: AssetOverrides,

    #[serde(default, deserialize_with = "null_as_default")]
    pub style: AssetOverrides,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Per-asset overrides declared under the `offset` extension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetOverrides {
    /// Extra dependencies, appended after the asset class defaults.
    #[serde(default, deserialize_with = "null_as_default")]
    pub deps: Vec<String>,

    /// Version string, or `false` for none.
    #[serde(default)]
    pub ver: AssetVersion,

    /// Media query (styles only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,

    /// Whether to print the script in the footer (scripts only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_footer: Option<bool>,
}

/// A manifest together with where it was loaded from and its hook name.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedManifest {
    /// Directory containing the block.
    pub dir: PathBuf,
    /// Full path of the `block.json` that was read.
    pub path: PathBuf,
    /// Parsed manifest.
    pub manifest: BlockManifest,
    /// Slug of the manifest name.
    pub hook_name: String,
}

impl BlockManifest {
    /// Locate and parse the manifest colocated with `path`.
    ///
    /// `path` may be the block directory itself or any file inside it (usually
    /// the `block.json`).
    pub fn load(path: &Path) -> BlockResult<LoadedManifest> {
        if path.as_os_str().is_empty() {
            return Err(BlockError::MissingInput {
                what: "manifest path",
            });
        }
        if !path.exists() {
            return Err(BlockError::missing_file(path));
        }

        let dir = if path.is_dir() {
            path.to_path_buf()
        } else {
            path.parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        };
        let manifest_path = dir.join(MANIFEST_FILE);

        let content = std::fs::read_to_string(&manifest_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BlockError::missing_file(&manifest_path)
            } else {
                BlockError::invalid_manifest(&manifest_path, e.to_string())
            }
        })?;

        let manifest = Self::parse_str(&content, &manifest_path)?;
        let hook_name = slugify(&manifest.name);
        debug!(block = %manifest.name, hook = %hook_name, path = %manifest_path.display(), "manifest loaded");

        Ok(LoadedManifest {
            dir,
            path: manifest_path,
            manifest,
            hook_name,
        })
    }

    /// Parse a manifest from a JSON string.
    pub fn parse_str(content: &str, path: &Path) -> BlockResult<Self> {
        let manifest: BlockManifest = serde_json::from_str(content)
            .map_err(|e| BlockError::invalid_manifest(path, e.to_string()))?;

        manifest.validate(path)?;
        Ok(manifest)
    }

    /// Validate the parsed manifest.
    fn validate(&self, path: &Path) -> BlockResult<()> {
        if self.name.is_empty() {
            return Err(BlockError::invalid_manifest(
                path,
                "missing or empty 'name' field",
            ));
        }

        // Hook names key filter channels and asset handles; they must be unique per block
        if !is_hook_name(&slugify(&self.name)) {
            return Err(BlockError::invalid_manifest(
                path,
                format!(
                    "name '{}' has no ASCII letters or digits to derive a hook name from",
                    self.name
                ),
            ));
        }
        Ok(())
    }

    /// Base asset URL, if the extension declares a non-empty one.
    pub fn block_url(&self) -> Option<&str> {
        self.offset
            .as_ref()
            .map(|ext| ext.block_url.as_str())
            .filter(|url| !url.is_empty())
    }

    /// The manifest as a JSON object, with normalized asset fields.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Treat an explicit JSON `null` the same as an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn path() -> &'static Path {
        Path::new("block.json")
    }

    #[test]
    fn parse_full_manifest() {
        let json = r#"{
            "name": "offset/hero",
            "title": "Hero",
            "editorScript": "file:./build/index.js",
            "editorStyle": "file:./build/index.css",
            "style": "file:./build/style-index.css",
            "offset": {
                "blockUrl": "https://example.com/blocks/hero",
                "editorScript": { "deps": ["lodash"], "ver": "1.2.0", "in_footer": true },
                "style": { "media": "screen", "ver": false }
            }
        }"#;

        let manifest = BlockManifest::parse_str(json, path()).unwrap();
        assert_eq!(manifest.name, "offset/hero");
        assert_eq!(manifest.editor_script, "file:./build/index.js");
        assert_eq!(manifest.script, "");
        assert_eq!(manifest.extra["title"], "Hero");

        let ext = manifest.offset.as_ref().unwrap();
        assert_eq!(ext.editor_script.deps, vec!["lodash"]);
        assert_eq!(ext.editor_script.ver, AssetVersion::Version("1.2.0".to_string()));
        assert_eq!(ext.editor_script.in_footer, Some(true));
        assert_eq!(ext.style.media.as_deref(), Some("screen"));
        assert_eq!(ext.style.ver, AssetVersion::Unversioned);
        assert_eq!(manifest.block_url(), Some("https://example.com/blocks/hero"));
    }

    #[test]
    fn optional_fields_default_to_empty() {
        let manifest = BlockManifest::parse_str(r#"{"name": "offset/min"}"#, path()).unwrap();
        assert!(manifest.editor_script.is_empty());
        assert!(manifest.editor_style.is_empty());
        assert!(manifest.script.is_empty());
        assert!(manifest.style.is_empty());
        assert!(manifest.offset.is_none());
        assert!(manifest.block_url().is_none());
    }

    #[test]
    fn null_fields_default_to_empty() {
        let json = r#"{"name": "offset/min", "script": null, "offset": null}"#;
        let manifest = BlockManifest::parse_str(json, path()).unwrap();
        assert!(manifest.script.is_empty());
        assert!(manifest.offset.is_none());
    }

    #[test]
    fn reject_missing_name() {
        let result = BlockManifest::parse_str(r#"{"title": "No name"}"#, path());
        assert!(matches!(result, Err(BlockError::InvalidManifest { .. })));
    }

    #[test]
    fn reject_empty_name() {
        let result = BlockManifest::parse_str(r#"{"name": ""}"#, path());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("'name'"));
    }

    #[test]
    fn reject_name_without_ascii_alphanumerics() {
        for name in ["日本", "中文", "--/--"] {
            let json = format!(r#"{{"name": "{name}"}}"#);
            let err = BlockManifest::parse_str(&json, path()).unwrap_err();
            assert!(matches!(err, BlockError::InvalidManifest { .. }));
            assert!(err.to_string().contains("hook name"));
        }
    }

    #[test]
    fn mixed_script_name_keeps_ascii_part() {
        let manifest = BlockManifest::parse_str(r#"{"name": "offset/日本-hero"}"#, path()).unwrap();
        assert_eq!(slugify(&manifest.name), "offset_hero");
    }

    #[test]
    fn reject_malformed_json() {
        let result = BlockManifest::parse_str("{ not json", path());
        assert!(matches!(result, Err(BlockError::InvalidManifest { .. })));
    }

    #[test]
    fn reject_non_object() {
        let result = BlockManifest::parse_str(r#"["offset/hero"]"#, path());
        assert!(matches!(result, Err(BlockError::InvalidManifest { .. })));
    }

    #[test]
    fn empty_block_url_is_absent() {
        let json = r#"{"name": "offset/x", "offset": {"blockUrl": ""}}"#;
        let manifest = BlockManifest::parse_str(json, path()).unwrap();
        assert!(manifest.block_url().is_none());
    }

    #[test]
    fn to_value_keeps_unknown_keys() {
        let json = r#"{"name": "offset/x", "category": "widgets", "attributes": {"title": {"type": "string"}}}"#;
        let manifest = BlockManifest::parse_str(json, path()).unwrap();
        let value = manifest.to_value();
        assert_eq!(value["name"], "offset/x");
        assert_eq!(value["category"], "widgets");
        assert_eq!(value["attributes"]["title"]["type"], "string");
        assert_eq!(value["editorScript"], "");
    }

    #[test]
    fn load_empty_path_is_missing_input() {
        let result = BlockManifest::load(Path::new(""));
        assert!(matches!(result, Err(BlockError::MissingInput { .. })));
    }

    #[test]
    fn load_nonexistent_path_is_missing_file() {
        let result = BlockManifest::load(Path::new("/definitely/not/a/block/dir"));
        assert!(matches!(result, Err(BlockError::MissingFile { .. })));
    }
}
