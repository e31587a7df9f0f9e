use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gesture::Role;
use crate::map::{BattleMap, MapError};

pub const CONFIG_ENV: &str = "FOGMAP_CONFIG";
pub const ROLE_ENV: &str = "FOGMAP_ROLE";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed config {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unknown role {0:?}, expected \"dm\" or \"player\"")]
    InvalidRole(String),
    #[error("Invalid default map: {0}")]
    DefaultMap(#[from] MapError),
}

/// Viewer settings. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub role: Role,
    pub brush_size: u32,
    pub default_map_id: String,
    pub default_grid_width: u32,
    pub default_grid_height: u32,
    pub default_cell_size: u32,
    /// Initial window size as a multiple of the map's pixel size.
    pub window_scale: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            role: Role::Dm,
            brush_size: 1,
            default_map_id: "untitled".to_string(),
            default_grid_width: 20,
            default_grid_height: 15,
            default_cell_size: 32,
            window_scale: 1,
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_str = path.to_string_lossy().to_string();
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path_str.clone(), source })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Json { path: path_str, source })
    }

    /// Reads the file named by `FOGMAP_CONFIG` if set, then applies
    /// `FOGMAP_ROLE`.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Ok(role) = std::env::var(ROLE_ENV) {
            config.role = parse_role(&role)?;
        }
        config.brush_size = config.brush_size.max(1);
        config.window_scale = config.window_scale.max(1);
        Ok(config)
    }

    pub fn default_map(&self) -> Result<BattleMap, ConfigError> {
        Ok(BattleMap::new(
            self.default_map_id.clone(),
            self.default_grid_width,
            self.default_grid_height,
            self.default_cell_size,
        )?)
    }
}

pub fn parse_role(value: &str) -> Result<Role, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "dm" | "gm" => Ok(Role::Dm),
        "player" => Ok(Role::Player),
        other => Err(ConfigError::InvalidRole(other.to_string())),
    }
}
