//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::Result;

use crate::location::HostRoots;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory scanned for block subdirectories (default: ./blocks).
    pub blocks_dir: PathBuf,

    /// Host plugin directory, for install-location detection.
    pub plugin_dir: Option<PathBuf>,

    /// Host must-use plugin directory.
    pub mu_plugin_dir: Option<PathBuf>,

    /// Active theme directory.
    pub theme_dir: Option<PathBuf>,

    /// Parent theme template name; non-empty for child themes.
    pub theme_template: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let blocks_dir = env::var("BLOCKS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./blocks"));

        let plugin_dir = non_empty_var("PLUGIN_DIR").map(PathBuf::from);
        let mu_plugin_dir = non_empty_var("MU_PLUGIN_DIR").map(PathBuf::from);
        let theme_dir = non_empty_var("THEME_DIR").map(PathBuf::from);
        let theme_template = non_empty_var("THEME_TEMPLATE");

        Ok(Self {
            blocks_dir,
            plugin_dir,
            mu_plugin_dir,
            theme_dir,
            theme_template,
        })
    }

    /// Host roots for install-location detection.
    pub fn host_roots(&self) -> HostRoots {
        HostRoots {
            plugin_dir: self.plugin_dir.clone(),
            mu_plugin_dir: self.mu_plugin_dir.clone(),
            theme_dir: self.theme_dir.clone(),
            theme_template: self.theme_template.clone(),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
