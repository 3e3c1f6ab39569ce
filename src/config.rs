//! Project configuration for block-factory
//!
//! Settings come from an optional `block-factory.toml` in the project root,
//! then from environment variables, then from CLI flags (applied by the
//! caller). A missing file is not an error: every key has a default.
//!
//! ```toml
//! blocks_dir = "blocks"
//! build_dir = "build"
//! namespace = "block-factory"
//! default_icon = "editor-code"
//! build_command = ["npm", "run", "build", "--if-present"]
//! ```
//!
//! ## Environment Variables
//!
//! - `BF_BLOCKS_DIR` - overrides `blocks_dir`
//! - `BF_BUILD_DIR` - overrides `build_dir`
//! - `BF_NAMESPACE` - overrides `namespace`

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the project root
pub const CONFIG_FILE: &str = "block-factory.toml";

/// Project-wide settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FactoryConfig {
    /// Directory the config was loaded from; relative paths resolve against it
    #[serde(skip)]
    pub project_root: PathBuf,
    /// Component source directories live here, one per slug
    pub blocks_dir: PathBuf,
    /// Compiled output of the build command, one directory per slug
    pub build_dir: PathBuf,
    /// Block name prefix: `<namespace>/<slug>`
    pub namespace: String,
    /// Dashicon used when `create` is given no icon
    pub default_icon: String,
    /// Program and arguments run by `build`
    pub build_command: Vec<String>,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        FactoryConfig {
            project_root: PathBuf::from("."),
            blocks_dir: PathBuf::from("blocks"),
            build_dir: PathBuf::from("build"),
            namespace: "block-factory".to_string(),
            default_icon: "editor-code".to_string(),
            build_command: ["npm", "run", "build", "--if-present"]
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl FactoryConfig {
    /// Defaults rooted at `root`
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        FactoryConfig {
            project_root: root.into(),
            ..Default::default()
        }
    }

    /// Load the project config.
    ///
    /// Uses `explicit` when given, otherwise `./block-factory.toml`. Environment
    /// overrides are applied last.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
        let mut config = match load_factory_config(&path)? {
            Some(config) => config,
            None if explicit.is_some() => {
                anyhow::bail!("Config file not found: {}", path.display())
            }
            None => FactoryConfig::default(),
        };
        config.project_root = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        config.apply_env();
        Ok(config)
    }

    /// Apply `BF_*` environment overrides
    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(dir) = non_empty("BF_BLOCKS_DIR") {
            self.blocks_dir = PathBuf::from(dir);
        }
        if let Some(dir) = non_empty("BF_BUILD_DIR") {
            self.build_dir = PathBuf::from(dir);
        }
        if let Some(namespace) = non_empty("BF_NAMESPACE") {
            self.namespace = namespace;
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }

    /// Absolute or root-relative blocks directory
    pub fn blocks_path(&self) -> PathBuf {
        self.resolve(&self.blocks_dir)
    }

    /// Absolute or root-relative build directory
    pub fn build_path(&self) -> PathBuf {
        self.resolve(&self.build_dir)
    }

    /// Source directory of one component
    pub fn component_dir(&self, slug: &str) -> PathBuf {
        self.blocks_path().join(slug)
    }

    /// Build output directory of one component
    pub fn build_output_dir(&self, slug: &str) -> PathBuf {
        self.build_path().join(slug)
    }

    /// Full block name for a slug
    pub fn block_name(&self, slug: &str) -> String {
        format!("{}/{slug}", self.namespace)
    }
}

/// Load a factory config from a TOML file
///
/// Returns `Ok(Some(config))` if the file exists and parses,
/// `Ok(None)` if it doesn't exist (not an error),
/// `Err` if it exists but fails to read or parse.
pub fn load_factory_config(config_path: &Path) -> anyhow::Result<Option<FactoryConfig>> {
    if !config_path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;

    let config: FactoryConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config: {}", config_path.display()))?;

    Ok(Some(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = FactoryConfig::for_root("/srv/site");
        assert_eq!(config.component_dir("hero"), PathBuf::from("/srv/site/blocks/hero"));
        assert_eq!(config.build_output_dir("hero"), PathBuf::from("/srv/site/build/hero"));
        assert_eq!(config.block_name("hero"), "block-factory/hero");
        assert_eq!(config.build_command[0], "npm");
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_factory_config(&dir.path().join(CONFIG_FILE)).unwrap().is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "namespace = \"acme\"\nblocks_dir = \"src/blocks\"\n").unwrap();
        let config = FactoryConfig::load(Some(&path)).unwrap();
        assert_eq!(config.namespace, "acme");
        assert_eq!(config.blocks_dir, PathBuf::from("src/blocks"));
        assert_eq!(config.default_icon, "editor-code");
        assert_eq!(config.project_root, dir.path());
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "namespace = [").unwrap();
        let err = load_factory_config(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FactoryConfig::load(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [("BF_NAMESPACE", "acme"), ("BF_BUILD_DIR", " ")]
            .into_iter()
            .collect();
        let mut config = FactoryConfig::default();
        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(config.namespace, "acme");
        assert_eq!(config.build_dir, PathBuf::from("build"));
    }
}
