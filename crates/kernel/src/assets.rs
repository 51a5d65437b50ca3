//! Asset descriptors derived from a block manifest.
//!
//! A manifest declares up to four assets: editor style, editor script,
//! front-end style, and front-end script. Each one becomes an
//! [`AssetDescriptor`] once a base URL is known; descriptors are built at load
//! time and only read afterwards, when the host enqueues them.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::manifest::{AssetOverrides, BlockManifest};

/// Host capabilities every editor script depends on.
pub const EDITOR_SCRIPT_DEPS: &[&str] = &[
    "wp-block-editor",
    "wp-blocks",
    "wp-components",
    "wp-element",
    "wp-i18n",
    "wp-editor",
    "wp-polyfill",
];

/// Host capabilities every editor style depends on.
pub const EDITOR_STYLE_DEPS: &[&str] = &["wp-edit-blocks"];

/// Default media for stylesheets.
pub const DEFAULT_MEDIA: &str = "all";

/// The four asset classes a manifest can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetClass {
    EditorStyle,
    EditorScript,
    Style,
    Script,
}

impl AssetClass {
    /// All classes, in the order descriptors are built.
    pub const ALL: [AssetClass; 4] = [
        AssetClass::EditorStyle,
        AssetClass::EditorScript,
        AssetClass::Style,
        AssetClass::Script,
    ];

    /// Suffix appended to the hook name to form the asset handle.
    pub fn handle_suffix(self) -> &'static str {
        match self {
            AssetClass::EditorStyle => "editor_style",
            AssetClass::EditorScript => "editor_script",
            AssetClass::Style => "style",
            AssetClass::Script => "script",
        }
    }

    /// Handle for this asset class of the given block.
    pub fn handle(self, hook_name: &str) -> String {
        format!("{hook_name}_{}", self.handle_suffix())
    }

    /// Dependencies every asset of this class starts with.
    pub fn default_deps(self) -> &'static [&'static str] {
        match self {
            AssetClass::EditorStyle => EDITOR_STYLE_DEPS,
            AssetClass::EditorScript => EDITOR_SCRIPT_DEPS,
            AssetClass::Style | AssetClass::Script => &[],
        }
    }

    pub fn is_style(self) -> bool {
        matches!(self, AssetClass::EditorStyle | AssetClass::Style)
    }

    pub fn is_editor(self) -> bool {
        matches!(self, AssetClass::EditorStyle | AssetClass::EditorScript)
    }

    /// The manifest path declared for this class.
    fn manifest_path(self, manifest: &BlockManifest) -> &str {
        match self {
            AssetClass::EditorStyle => &manifest.editor_style,
            AssetClass::EditorScript => &manifest.editor_script,
            AssetClass::Style => &manifest.style,
            AssetClass::Script => &manifest.script,
        }
    }

    /// The overrides declared for this class, if any.
    fn overrides(self, manifest: &BlockManifest) -> Option<&AssetOverrides> {
        let ext = manifest.offset.as_ref()?;
        Some(match self {
            AssetClass::EditorStyle => &ext.editor_style,
            AssetClass::EditorScript => &ext.editor_script,
            AssetClass::Style => &ext.style,
            AssetClass::Script => &ext.script,
        })
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.handle_suffix())
    }
}

/// Asset version as declared in a manifest: a string, or `false` for none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AssetVersion {
    /// No explicit version; the host picks its own cache-busting value.
    #[default]
    Unversioned,
    /// Explicit version string.
    Version(String),
}

impl AssetVersion {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AssetVersion::Unversioned => None,
            AssetVersion::Version(v) => Some(v),
        }
    }
}

impl Serialize for AssetVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AssetVersion::Unversioned => serializer.serialize_bool(false),
            AssetVersion::Version(v) => serializer.serialize_str(v),
        }
    }
}

impl<'de> Deserialize<'de> for AssetVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            // Any boolean means unversioned; only its presence matters.
            Flag(#[allow(dead_code)] bool),
            Text(String),
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Text(v)) if !v.is_empty() => AssetVersion::Version(v),
            _ => AssetVersion::Unversioned,
        })
    }
}

/// Where an asset is placed: a media query for styles, header/footer for scripts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    Media(String),
    InFooter(bool),
}

/// Everything the host needs to enqueue one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetDescriptor {
    /// Unique handle, `{hook_name}_{class}`.
    pub handle: String,
    /// Absolute source URL.
    pub src: String,
    /// Handles this asset must load after, in order.
    pub deps: Vec<String>,
    pub ver: AssetVersion,
    pub placement: Placement,
    #[serde(skip)]
    pub class: AssetClass,
}

/// Descriptors of one block, grouped by asset class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockAssets {
    pub editor_styles: Vec<AssetDescriptor>,
    pub editor_scripts: Vec<AssetDescriptor>,
    pub styles: Vec<AssetDescriptor>,
    pub scripts: Vec<AssetDescriptor>,
}

impl BlockAssets {
    /// Build every descriptor the manifest declares.
    ///
    /// Nothing is built without a non-empty `offset.blockUrl`.
    pub fn from_manifest(manifest: &BlockManifest, hook_name: &str) -> Self {
        let mut assets = Self::default();
        let Some(block_url) = manifest.block_url() else {
            return assets;
        };

        for class in AssetClass::ALL {
            let Some(descriptor) = build_descriptor(class, manifest, hook_name, block_url) else {
                continue;
            };
            assets.slot_mut(class).push(descriptor);
        }

        assets
    }

    fn slot_mut(&mut self, class: AssetClass) -> &mut Vec<AssetDescriptor> {
        match class {
            AssetClass::EditorStyle => &mut self.editor_styles,
            AssetClass::EditorScript => &mut self.editor_scripts,
            AssetClass::Style => &mut self.styles,
            AssetClass::Script => &mut self.scripts,
        }
    }

    pub fn has_editor_assets(&self) -> bool {
        !self.editor_styles.is_empty() || !self.editor_scripts.is_empty()
    }

    pub fn has_frontend_assets(&self) -> bool {
        !self.styles.is_empty() || !self.scripts.is_empty()
    }

    /// All descriptors, editor assets first.
    pub fn iter(&self) -> impl Iterator<Item = &AssetDescriptor> {
        self.editor_styles
            .iter()
            .chain(&self.editor_scripts)
            .chain(&self.styles)
            .chain(&self.scripts)
    }
}

/// Build the descriptor for one asset class, if the manifest declares it.
pub fn build_descriptor(
    class: AssetClass,
    manifest: &BlockManifest,
    hook_name: &str,
    block_url: &str,
) -> Option<AssetDescriptor> {
    let path = class.manifest_path(manifest);
    if path.is_empty() {
        return None;
    }

    let overrides = class.overrides(manifest).cloned().unwrap_or_default();

    let mut deps: Vec<String> = class
        .default_deps()
        .iter()
        .map(|d| (*d).to_string())
        .collect();
    deps.extend(overrides.deps);

    let placement = if class.is_style() {
        Placement::Media(overrides.media.unwrap_or_else(|| DEFAULT_MEDIA.to_string()))
    } else {
        Placement::InFooter(overrides.in_footer.unwrap_or(false))
    };

    Some(AssetDescriptor {
        handle: class.handle(hook_name),
        src: asset_url(block_url, path),
        deps,
        ver: overrides.ver,
        placement,
        class,
    })
}

/// Join the base URL and a manifest asset path.
pub fn asset_url(block_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        block_url.trim_end_matches('/'),
        clean_asset_url(path)
    )
}

/// Clean an asset path as written by block scaffolding tools.
///
/// Strips a `file` scheme prefix, then leading `:`, then leading `.`, then
/// leading `/`. The order matters: `file:./build/index.js` becomes
/// `build/index.js`. `file` only counts as a prefix when a `:` follows it, so
/// `files/x.css` and `filename.js` are kept as written.
pub fn clean_asset_url(path: &str) -> &str {
    path.strip_prefix("file")
        .filter(|rest| rest.starts_with(':'))
        .unwrap_or(path)
        .trim_start_matches(':')
        .trim_start_matches('.')
        .trim_start_matches('/')
}
