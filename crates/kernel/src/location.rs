//! Where a block is installed relative to the host.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Host directories used to classify block locations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostRoots {
    pub plugin_dir: Option<PathBuf>,
    pub mu_plugin_dir: Option<PathBuf>,
    /// Active theme directory.
    pub theme_dir: Option<PathBuf>,
    /// Parent theme template name; set when the active theme is a child theme.
    pub theme_template: Option<String>,
}

/// Install location of a block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallLocation {
    Plugin,
    MuPlugin,
    Theme,
    ChildTheme,
    #[default]
    Unknown,
}

impl InstallLocation {
    /// Classify a block directory.
    ///
    /// Checked in order: plugin, must-use plugin, then theme or child theme
    /// depending on whether a parent template is set.
    pub fn detect(dir: &Path, roots: &HostRoots) -> Self {
        let within = |root: &Option<PathBuf>| root.as_deref().is_some_and(|r| dir.starts_with(r));

        if within(&roots.plugin_dir) {
            InstallLocation::Plugin
        } else if within(&roots.mu_plugin_dir) {
            InstallLocation::MuPlugin
        } else if within(&roots.theme_dir) {
            match roots.theme_template.as_deref() {
                Some(t) if !t.is_empty() => InstallLocation::ChildTheme,
                _ => InstallLocation::Theme,
            }
        } else {
            InstallLocation::Unknown
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InstallLocation::Plugin => "plugin",
            InstallLocation::MuPlugin => "mu_plugin",
            InstallLocation::Theme => "theme",
            InstallLocation::ChildTheme => "child_theme",
            InstallLocation::Unknown => "unknown",
        }
    }
}

impl fmt::Display for InstallLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roots(template: Option<&str>) -> HostRoots {
        HostRoots {
            plugin_dir: Some(PathBuf::from("/srv/site/plugins")),
            mu_plugin_dir: Some(PathBuf::from("/srv/site/mu-plugins")),
            theme_dir: Some(PathBuf::from("/srv/site/themes/offset")),
            theme_template: template.map(str::to_string),
        }
    }

    #[test]
    fn plugin_block() {
        let dir = Path::new("/srv/site/plugins/offset-blocks/hero");
        assert_eq!(InstallLocation::detect(dir, &roots(None)), InstallLocation::Plugin);
    }

    #[test]
    fn mu_plugin_block() {
        let dir = Path::new("/srv/site/mu-plugins/hero");
        assert_eq!(InstallLocation::detect(dir, &roots(None)), InstallLocation::MuPlugin);
    }

    #[test]
    fn theme_versus_child_theme() {
        let dir = Path::new("/srv/site/themes/offset/blocks/hero");
        assert_eq!(InstallLocation::detect(dir, &roots(None)), InstallLocation::Theme);
        assert_eq!(InstallLocation::detect(dir, &roots(Some(""))), InstallLocation::Theme);
        assert_eq!(
            InstallLocation::detect(dir, &roots(Some("parent"))),
            InstallLocation::ChildTheme
        );
    }

    #[test]
    fn path_prefix_is_component_wise() {
        // "plugins-old" is not inside "plugins"
        let dir = Path::new("/srv/site/plugins-old/hero");
        assert_eq!(InstallLocation::detect(dir, &roots(None)), InstallLocation::Unknown);
    }

    #[test]
    fn no_roots_is_unknown() {
        let dir = Path::new("/anywhere/hero");
        assert_eq!(
            InstallLocation::detect(dir, &HostRoots::default()),
            InstallLocation::Unknown
        );
    }
}
