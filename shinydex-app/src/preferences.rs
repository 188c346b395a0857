use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::app_dir;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppPreferences {
    #[serde(default = "default_window_width")]
    pub window_width: f32,
    #[serde(default = "default_window_height")]
    pub window_height: f32,

    /// Catalog file. When empty, `catalog.json` next to the executable is used.
    #[serde(default)]
    pub catalog_path: String,
    /// Storage file. When empty, `storage.json` in the per-user data directory is used.
    #[serde(default)]
    pub storage_path: String,
    /// Root of the tile images. When empty, `assets/` next to the executable is used.
    #[serde(default)]
    pub asset_dir: String,
    #[serde(default = "default_obtained_folder")]
    pub obtained_folder: String,
    #[serde(default = "default_normal_folder")]
    pub normal_folder: String,

    /// Milliseconds between preparing the surface and capturing it.
    #[serde(default = "default_export_delay_ms")]
    pub export_delay_ms: u64,
    #[serde(default = "default_export_prefix")]
    pub export_prefix: String,
    #[serde(default = "default_export_background")]
    pub export_background: [u8; 3],

    #[serde(default = "default_true")]
    pub show_stats_bar: bool,
    #[serde(default = "default_true")]
    pub show_options_bar: bool,
    /// Tile side length in logical pixels.
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,
}

fn default_window_width() -> f32 {
    1280.0
}
fn default_window_height() -> f32 {
    800.0
}
fn default_obtained_folder() -> String {
    "shiny".into()
}
fn default_normal_folder() -> String {
    "normal".into()
}
fn default_export_delay_ms() -> u64 {
    100
}
fn default_export_prefix() -> String {
    "pokemon_shiny_dex".into()
}
fn default_export_background() -> [u8; 3] {
    [0x1a, 0x1a, 0x1a]
}
fn default_true() -> bool {
    true
}
fn default_tile_size() -> f32 {
    88.0
}

impl Default for AppPreferences {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            catalog_path: String::new(),
            storage_path: String::new(),
            asset_dir: String::new(),
            obtained_folder: default_obtained_folder(),
            normal_folder: default_normal_folder(),
            export_delay_ms: default_export_delay_ms(),
            export_prefix: default_export_prefix(),
            export_background: default_export_background(),
            show_stats_bar: true,
            show_options_bar: true,
            tile_size: default_tile_size(),
        }
    }
}

impl AppPreferences {
    /// Load preferences from next to the executable, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(json) => match Self::from_json(&json) {
                    Ok(prefs) => {
                        info!("Loaded preferences from {}", path.display());
                        return prefs;
                    }
                    Err(e) => {
                        error!("Failed to parse preferences: {e}");
                    }
                },
                Err(e) => {
                    error!("Failed to read preferences file: {e}");
                }
            }
        } else {
            debug!("No preferences file at {}", path.display());
        }
        Self::default()
    }

    fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Persist preferences to disk.
    pub fn save(&self) {
        let path = config_path();
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory: {e}");
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(&path, &json) {
                    error!("Failed to write preferences: {e}");
                } else {
                    debug!("Saved preferences");
                }
            }
            Err(e) => error!("Failed to serialize preferences: {e}"),
        }
    }

    pub fn catalog_file(&self) -> PathBuf {
        or_default(&self.catalog_path, || app_dir::exe_directory().join("catalog.json"))
    }

    pub fn storage_file(&self) -> PathBuf {
        or_default(&self.storage_path, || app_dir::data_directory().join("storage.json"))
    }

    pub fn asset_root(&self) -> PathBuf {
        or_default(&self.asset_dir, || app_dir::exe_directory().join("assets"))
    }
}

fn or_default(configured: &str, fallback: impl FnOnce() -> PathBuf) -> PathBuf {
    let trimmed = configured.trim();
    if trimmed.is_empty() {
        fallback()
    } else {
        PathBuf::from(trimmed)
    }
}

fn config_path() -> PathBuf {
    app_dir::exe_directory().join("preferences.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let prefs = AppPreferences::from_json(r#"{ "tile_size": 64.0, "show_stats_bar": false }"#)
            .expect("partial preferences parse");
        assert_eq!(prefs.tile_size, 64.0);
        assert!(!prefs.show_stats_bar);
        assert!(prefs.show_options_bar);
        assert_eq!(prefs.export_delay_ms, 100);
        assert_eq!(prefs.export_prefix, "pokemon_shiny_dex");
        assert_eq!(prefs.export_background, [0x1a, 0x1a, 0x1a]);
        assert_eq!(prefs.obtained_folder, "shiny");
    }

    #[test]
    fn configured_paths_override_defaults() {
        let prefs = AppPreferences {
            catalog_path: " /data/dex.json ".into(),
            ..AppPreferences::default()
        };
        assert_eq!(prefs.catalog_file(), PathBuf::from("/data/dex.json"));
        assert!(AppPreferences::default()
            .storage_file()
            .ends_with("storage.json"));
    }
}
