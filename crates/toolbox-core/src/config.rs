use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::dupkeys::DEFAULT_MAX_DEPTH;
use crate::playlist::{MissingKeyPolicy, PlaylistOptions, DEFAULT_SETTLE_DELAY};
use crate::wrap::DEFAULT_WIDTH;

/// Playlist extractor settings (`[playlist]` in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistConfig {
    /// Prepended to every item key to form one output line.
    pub command_prefix: String,
    /// Class markers an element must carry all of to count as a playlist item.
    pub item_classes: Vec<String>,
    /// Data attribute holding the item key, without the `data-` prefix.
    pub key_attribute: String,
    /// Seconds to wait after the document reports complete before extracting.
    pub settle_delay_secs: u64,
    /// What to emit for an item without a key: "placeholder" or "skip".
    pub missing_key: MissingKeyPolicy,
}

impl Default for PlaylistConfig {
    fn default() -> Self {
        let opts = PlaylistOptions::default();
        Self {
            command_prefix: opts.prefix,
            item_classes: opts.item_classes,
            key_attribute: opts.key_attribute,
            settle_delay_secs: DEFAULT_SETTLE_DELAY.as_secs(),
            missing_key: opts.missing_key,
        }
    }
}

impl PlaylistConfig {
    pub fn to_options(&self) -> PlaylistOptions {
        PlaylistOptions {
            prefix: self.command_prefix.clone(),
            item_classes: self.item_classes.clone(),
            key_attribute: self.key_attribute.clone(),
            missing_key: self.missing_key,
        }
    }
}

/// Duplicate key finder settings (`[dup_keys]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DupKeysConfig {
    /// Deepest container nesting walked before failing.
    pub max_depth: usize,
}

impl Default for DupKeysConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Line wrapper settings (`[wrap]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WrapConfig {
    pub width: usize,
}

impl Default for WrapConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
        }
    }
}

/// Global configuration loaded from `~/.config/toolbox/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolboxConfig {
    pub playlist: PlaylistConfig,
    pub dup_keys: DupKeysConfig,
    pub wrap: WrapConfig,
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("toolbox")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ToolboxConfig> {
    load_or_init_at(&config_path()?)
}

/// Same as [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<ToolboxConfig> {
    if !path.exists() {
        let default_cfg = ToolboxConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write config: {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: ToolboxConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = ToolboxConfig::default();
        assert_eq!(
            cfg.playlist.command_prefix,
            "you-get -c cookies.sqlite https://www.bilibili.com/video/"
        );
        assert_eq!(
            cfg.playlist.item_classes,
            vec!["pod-item", "video-pod__item", "simple"]
        );
        assert_eq!(cfg.playlist.key_attribute, "key");
        assert_eq!(cfg.playlist.settle_delay_secs, 10);
        assert_eq!(cfg.playlist.missing_key, MissingKeyPolicy::Placeholder);
        assert_eq!(cfg.dup_keys.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(cfg.wrap.width, 100);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = ToolboxConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: ToolboxConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.playlist.command_prefix, cfg.playlist.command_prefix);
        assert_eq!(parsed.playlist.item_classes, cfg.playlist.item_classes);
        assert_eq!(parsed.dup_keys.max_depth, cfg.dup_keys.max_depth);
        assert_eq!(parsed.wrap.width, cfg.wrap.width);
    }

    #[test]
    fn config_toml_partial_sections_use_defaults() {
        let toml = r#"
            [playlist]
            settle_delay_secs = 0
            missing_key = "skip"

            [wrap]
            width = 72
        "#;
        let cfg: ToolboxConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.playlist.settle_delay_secs, 0);
        assert_eq!(cfg.playlist.missing_key, MissingKeyPolicy::Skip);
        assert_eq!(cfg.playlist.key_attribute, "key");
        assert_eq!(cfg.wrap.width, 72);
        assert_eq!(cfg.dup_keys.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn config_empty_file_is_default() {
        let cfg: ToolboxConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.wrap.width, 100);
        assert_eq!(cfg.playlist.item_classes.len(), 3);
    }

    #[test]
    fn load_or_init_at_creates_then_reads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let created = load_or_init_at(&path).unwrap();
        assert!(path.exists());
        assert_eq!(created.wrap.width, 100);

        fs::write(&path, "[dup_keys]\nmax_depth = 8\n").unwrap();
        let loaded = load_or_init_at(&path).unwrap();
        assert_eq!(loaded.dup_keys.max_depth, 8);
    }

    #[test]
    fn load_or_init_at_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[wrap]\nwidth = \"wide\"\n").unwrap();
        assert!(load_or_init_at(&path).is_err());
    }

    #[test]
    fn playlist_config_to_options() {
        let cfg = PlaylistConfig {
            command_prefix: "get ".to_string(),
            missing_key: MissingKeyPolicy::Skip,
            ..PlaylistConfig::default()
        };
        let opts = cfg.to_options();
        assert_eq!(opts.prefix, "get ");
        assert_eq!(opts.key_attribute, "key");
        assert_eq!(opts.missing_key, MissingKeyPolicy::Skip);
    }
}
