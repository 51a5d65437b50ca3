//! Offset blocks test utilities.
//!
//! Helpers for integration testing: throwaway block directories, manifest
//! builders, and assertion utilities for rendered HTML.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value as JsonValue, json};
use uuid::Uuid;

/// A temporary directory holding block subdirectories.
///
/// Created under the OS temp dir with a unique name; removed on drop.
#[derive(Debug)]
pub struct TestBlocksDir {
    root: PathBuf,
}

impl TestBlocksDir {
    /// Create a fresh, empty blocks directory.
    pub fn new() -> Self {
        let root = std::env::temp_dir().join(format!("offset-blocks-test-{}", Uuid::now_v7()));
        fs::create_dir_all(&root).unwrap();
        Self { root }
    }

    /// Path of the blocks directory.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Write a block fixture into `<root>/<dir_name>` and return its directory.
    pub fn add(&self, dir_name: &str, block: TestBlock) -> PathBuf {
        let dir = self.root.join(dir_name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("block.json"), block.manifest_source()).unwrap();
        for (name, contents) in &block.files {
            let path = dir.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, contents).unwrap();
        }
        dir
    }

    /// Write a raw file (e.g. an invalid manifest) at `<root>/<relative>`.
    pub fn add_raw(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }
}

impl Default for TestBlocksDir {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TestBlocksDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

/// Create a test block with a minimal manifest.
pub fn test_block(name: &str) -> TestBlock {
    TestBlock {
        manifest: json!({ "name": name }),
        files: Vec::new(),
    }
}

/// A block fixture builder.
#[derive(Debug, Clone)]
pub struct TestBlock {
    pub manifest: JsonValue,
    pub files: Vec<(String, String)>,
}

impl TestBlock {
    /// Set a top-level manifest key.
    pub fn with_key(mut self, key: &str, value: JsonValue) -> Self {
        self.manifest[key] = value;
        self
    }

    /// Declare all four assets with create-block style `file:./` paths.
    pub fn with_all_assets(self) -> Self {
        self.with_key("editorScript", json!("file:./build/index.js"))
            .with_key("editorStyle", json!("file:./build/index.css"))
            .with_key("style", json!("file:./build/style-index.css"))
            .with_key("script", json!("file:./build/view.js"))
    }

    /// Set the asset base URL.
    pub fn with_block_url(mut self, url: &str) -> Self {
        self.offset_mut()["blockUrl"] = json!(url);
        self
    }

    /// Set overrides for one asset class (`editorScript`, `style`, ...).
    pub fn with_asset_overrides(mut self, class: &str, overrides: JsonValue) -> Self {
        self.offset_mut()[class] = overrides;
        self
    }

    /// Add a file next to the manifest.
    pub fn with_file(mut self, name: &str, contents: &str) -> Self {
        self.files.push((name.to_string(), contents.to_string()));
        self
    }

    /// Add a `render.html` template.
    pub fn with_template(self, contents: &str) -> Self {
        self.with_file("render.html", contents)
    }

    /// Serialized manifest.
    pub fn manifest_source(&self) -> String {
        serde_json::to_string_pretty(&self.manifest).unwrap()
    }

    fn offset_mut(&mut self) -> &mut JsonValue {
        if !self.manifest["offset"].is_object() {
            self.manifest["offset"] = json!({});
        }
        &mut self.manifest["offset"]
    }
}

/// Attribute map builder.
pub fn attributes(value: JsonValue) -> serde_json::Map<String, JsonValue> {
    match value {
        JsonValue::Object(map) => map,
        other => panic!("attributes must be a JSON object, got {other}"),
    }
}

/// Assertion helpers for rendered HTML.
pub mod assert {
    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{}'\nActual: {}",
            needle,
            haystack
        );
    }

    /// Assert that a string does not contain a substring.
    pub fn not_contains(haystack: &str, needle: &str) {
        assert!(
            !haystack.contains(needle),
            "Expected string to NOT contain '{}'\nActual: {}",
            needle,
            haystack
        );
    }
}
