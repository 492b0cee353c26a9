// src/config.rs
//! Configuration management with file-based storage

use crate::{
    error::{QuakeMapError, Result},
    feed::{DEFAULT_EARTHQUAKE_URL, DEFAULT_PLATES_URL},
    map::{composer::DEFAULT_CENTER, composer::DEFAULT_ZOOM, BaseLayer, MapView},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub earthquake_url: String,
    pub plates_url: String,
    pub request_timeout_secs: u64,
    pub tile_cache_dir: Option<PathBuf>,
    pub base_layer: String,
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            earthquake_url: DEFAULT_EARTHQUAKE_URL.to_string(),
            plates_url: DEFAULT_PLATES_URL.to_string(),
            request_timeout_secs: 30,
            tile_cache_dir: None,
            base_layer: BaseLayer::OpenStreet.display_name().to_string(),
            center_lat: DEFAULT_CENTER.0,
            center_lon: DEFAULT_CENTER.1,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl MapConfig {
    /// Load configuration, falling back to defaults when no file exists
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Save configuration to storage
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| QuakeMapError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| QuakeMapError::Config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                QuakeMapError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let contents = serde_json::to_string_pretty(self)?;

        std::fs::write(path, contents)
            .map_err(|e| QuakeMapError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Reject values the map cannot use
    pub fn validate(&self) -> Result<()> {
        self.base_layer()?;

        let lat_ok = (-90.0..=90.0).contains(&self.center_lat);
        let lon_ok = (-180.0..=180.0).contains(&self.center_lon);
        if !lat_ok || !lon_ok {
            return Err(QuakeMapError::Config(format!(
                "center ({}, {}) is not a valid coordinate",
                self.center_lat, self.center_lon
            )));
        }

        if self.zoom > 19 {
            return Err(QuakeMapError::Config(format!("zoom {} is above 19", self.zoom)));
        }

        if self.request_timeout_secs == 0 {
            return Err(QuakeMapError::Config(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn base_layer(&self) -> Result<BaseLayer> {
        BaseLayer::from_name(&self.base_layer).ok_or_else(|| {
            QuakeMapError::Config(format!("unknown base layer '{}'", self.base_layer))
        })
    }

    pub fn initial_view(&self) -> MapView {
        MapView {
            center_lat: self.center_lat,
            center_lon: self.center_lon,
            zoom: self.zoom,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Tile cache directory, defaulting to ~/.cache/quake-map/tiles
    pub fn tile_cache_dir(&self) -> Result<PathBuf> {
        match &self.tile_cache_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::home_dir()?.join(".cache").join("quake-map").join("tiles")),
        }
    }

    /// Get config file path
    fn get_config_path() -> Result<PathBuf> {
        Ok(Self::home_dir()?
            .join(".config")
            .join("quake-map")
            .join("config.json"))
    }

    fn home_dir() -> Result<PathBuf> {
        std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map(PathBuf::from)
            .map_err(|_| QuakeMapError::Config("HOME environment variable not set".to_string()))
    }

    /// Apply feed URL overrides
    pub fn update_feeds(&mut self, earthquake_url: Option<String>, plates_url: Option<String>) {
        if let Some(url) = earthquake_url {
            self.earthquake_url = url;
        }
        if let Some(url) = plates_url {
            self.plates_url = url;
        }
    }
}
