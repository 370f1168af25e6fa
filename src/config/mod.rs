use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::editor::BrushOptions;
use crate::geometry::Color;
use crate::session::{EditorConfig, DEFAULT_MAX_UPLOAD_BYTES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfigPathError {
    MissingHomeDirectory,
}

const APP_DIR: &str = "photo-editor";
const APP_CONFIG_FILE: &str = "config.json";

/// Application-level settings from `config.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub max_upload_bytes: u64,
    pub brush_size: u8,
    pub brush_color: String,
    pub desktop_notifications: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let brush = BrushOptions::default();
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            brush_size: brush.size,
            brush_color: brush.color.to_hex(),
            desktop_notifications: false,
        }
    }
}

impl AppConfig {
    pub fn editor_config(&self) -> EditorConfig {
        let color = Color::from_hex(&self.brush_color).unwrap_or_else(|| {
            tracing::warn!(value = %self.brush_color, "invalid brush_color in config; using black");
            Color::BLACK
        });
        EditorConfig {
            max_upload_bytes: self.max_upload_bytes,
            brush: BrushOptions::new(color, self.brush_size),
        }
    }
}

pub fn load_app_config() -> AppConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_app_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_app_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> AppConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(_) => return AppConfig::default(),
    };
    if !path.exists() {
        return AppConfig::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => parse_app_config(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            AppConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            AppConfig::default()
        }
    }
}

fn parse_app_config(contents: &str) -> serde_json::Result<AppConfig> {
    serde_json::from_str(contents)
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}
