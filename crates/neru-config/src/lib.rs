//! Config record, discovery and TOML loading (§6), grounded on
//! `core-config::{discover, load_from}`: local `neru.toml` checked before the
//! platform config dir, unknown fields ignored, parse failure falls back to
//! defaults rather than aborting startup.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CharsetConfig {
    pub hints: String,
    pub grid_main: String,
    pub grid_subgrid: String,
}

impl Default for CharsetConfig {
    fn default() -> Self {
        Self {
            hints: "ASDFJKL".to_string(),
            grid_main: "ASDFJKL".to_string(),
            grid_subgrid: "UIJK".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct StyleConfig {
    pub font_family: String,
    pub font_size: u32,
    pub text_color: String,
    pub background_color: String,
    pub matched_color: String,
    pub border_width: u32,
    pub padding: u32,
    pub border_radius: u32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_family: "Menlo".to_string(),
            font_size: 13,
            text_color: "#FFFFFF".to_string(),
            background_color: "#202020E0".to_string(),
            matched_color: "#FFD60AFF".to_string(),
            border_width: 1,
            padding: 2,
            border_radius: 4,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeatureFlags {
    pub prewarm: bool,
    pub include_menubar: bool,
    pub hide_unmatched: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            prewarm: true,
            include_menubar: false,
            hide_unmatched: false,
        }
    }
}

/// Exit keys by mode name (§4.7: "mode-scoped list, default `[\"escape\"]`").
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExitKeysConfig {
    pub hints: Vec<String>,
    pub grid: Vec<String>,
    pub recursive_grid: Vec<String>,
    pub scroll: Vec<String>,
    pub action: Vec<String>,
}

impl Default for ExitKeysConfig {
    fn default() -> Self {
        let escape = vec!["escape".to_string()];
        Self {
            hints: escape.clone(),
            grid: escape.clone(),
            recursive_grid: escape.clone(),
            scroll: escape.clone(),
            action: escape,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub charsets: CharsetConfig,
    pub style: StyleConfig,
    pub features: FeatureFlags,
    pub exit_keys: ExitKeysConfig,
    /// Pixels moved per direct-action keystroke in action mode (§4.7).
    pub move_mouse_step: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            charsets: CharsetConfig::default(),
            style: StyleConfig::default(),
            features: FeatureFlags::default(),
            exit_keys: ExitKeysConfig::default(),
            move_mouse_step: 20,
        }
    }
}

/// Local `neru.toml` before the platform config dir (§1.x).
pub fn discover() -> PathBuf {
    let local = PathBuf::from("neru.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("neru").join("neru.toml");
    }
    PathBuf::from("neru.toml")
}

/// Load from `path`, or from `discover()` if `None`. Falls back to
/// `Config::default()` on a missing file or a parse error rather than
/// aborting startup (§1.x: "an outer layer that exercises the core end to
/// end").
pub fn load_from(path: Option<PathBuf>) -> anyhow::Result<Config> {
    let path = path.unwrap_or_else(discover);
    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str::<Config>(&content) {
            Ok(cfg) => Ok(cfg),
            Err(err) => {
                warn!(target: "config", path = %path.display(), %err, "failed to parse config, using defaults");
                Ok(Config::default())
            }
        },
        Err(_) => Ok(Config::default()),
    }
}

/// Re-parse `path` for a future hot-reload watcher to call; not invoked by
/// anything in this crate (§1.x: "hot-reload is explicitly out of scope").
pub fn reload_from(path: &Path) -> anyhow::Result<Config> {
    load_from(Some(path.to_path_buf()))
}
