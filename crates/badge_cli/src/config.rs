//! badge.toml handling

use anyhow::{Context, Result};
use badge_viewer::{BadgeCatalog, BadgeEntry, ViewerConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "badge.toml";

/// Top-level CLI configuration (badge.toml)
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BadgeConfig {
    #[serde(default)]
    pub viewer: ViewerConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    /// Empty means the stock catalog
    #[serde(default)]
    pub badges: Vec<BadgeEntry>,
}

/// Where badge models are read from
#[derive(Debug, Deserialize, Serialize)]
pub struct AssetsConfig {
    /// Directory that asset paths are resolved against
    #[serde(default = "default_root")]
    pub root: PathBuf,
}

fn default_root() -> PathBuf {
    PathBuf::from("public")
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self { root: default_root() }
    }
}

impl BadgeConfig {
    /// Load configuration from a file, or from badge.toml in a directory
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = if path.is_file() {
            path.to_path_buf()
        } else {
            path.join(CONFIG_FILE)
        };

        if !config_path.exists() {
            anyhow::bail!(
                "No {} found in {}. Run `badge init` to create one.",
                CONFIG_FILE,
                path.display()
            );
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config: BadgeConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        config
            .viewer
            .validate()
            .with_context(|| format!("Invalid [viewer] section in {}", config_path.display()))?;

        Ok(config)
    }

    /// Explicit path if given, else ./badge.toml if present, else defaults
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_dir(path);
        }
        let local = Path::new(CONFIG_FILE);
        if local.is_file() {
            return Self::load_from_dir(local);
        }
        tracing::debug!("no {} found, using defaults", CONFIG_FILE);
        Ok(Self::default())
    }

    /// A config listing the stock badges explicitly
    pub fn new() -> Self {
        Self {
            badges: BadgeCatalog::default_badges().iter().cloned().collect(),
            ..Default::default()
        }
    }

    pub fn catalog(&self) -> Result<BadgeCatalog> {
        if self.badges.is_empty() {
            return Ok(BadgeCatalog::default_badges());
        }
        BadgeCatalog::new(self.badges.clone()).context("Invalid [[badges]] list")
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaffold_round_trips() {
        let text = BadgeConfig::new().to_toml().unwrap();
        let parsed: BadgeConfig = toml::from_str(&text).unwrap();

        assert_eq!(parsed.badges.len(), 6);
        assert_eq!(parsed.viewer, ViewerConfig::default());
        assert_eq!(parsed.assets.root, PathBuf::from("public"));
        assert_eq!(parsed.catalog().unwrap(), BadgeCatalog::default_badges());
    }

    #[test]
    fn test_empty_file_uses_stock_catalog() {
        let parsed: BadgeConfig = toml::from_str("").unwrap();
        assert_eq!(parsed.catalog().unwrap().len(), 6);
    }

    #[test]
    fn test_custom_badges_and_viewer_section() {
        let parsed: BadgeConfig = toml::from_str(
            r#"
            [viewer.animation]
            mount_delay_ms = 250

            [assets]
            root = "models"

            [[badges]]
            name = "Chess"
            file = "/badge-chess.glb"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.viewer.animation.mount_delay_ms, 250);
        assert_eq!(parsed.assets.root, PathBuf::from("models"));
        let catalog = parsed.catalog().unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(0).unwrap().display_name, "Chess");
    }

    #[test]
    fn test_missing_file_points_at_init() {
        let err = BadgeConfig::load_from_dir(Path::new("/nonexistent/badge-dir")).unwrap_err();
        assert!(err.to_string().contains("badge init"));
    }
}
