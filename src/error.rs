// src/error.rs
//! Error types for the earthquake map

use std::fmt;

pub type Result<T> = std::result::Result<T, QuakeMapError>;

#[derive(Debug)]
pub enum QuakeMapError {
    Io(std::io::Error),
    Http(reqwest::Error),
    Status { url: String, status: u16 },
    Json(serde_json::Error),
    GeoJson(String),
    Config(String),
    Layer(String),
    #[cfg(feature = "gui")]
    Gui(eframe::Error),
    Other(String),
}

impl fmt::Display for QuakeMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuakeMapError::Io(e) => write!(f, "IO error: {}", e),
            QuakeMapError::Http(e) => write!(f, "HTTP error: {}", e),
            QuakeMapError::Status { url, status } => {
                write!(f, "HTTP {} fetching {}", status, url)
            }
            QuakeMapError::Json(e) => write!(f, "JSON error: {}", e),
            QuakeMapError::GeoJson(msg) => write!(f, "GeoJSON error: {}", msg),
            QuakeMapError::Config(msg) => write!(f, "Config error: {}", msg),
            QuakeMapError::Layer(msg) => write!(f, "Layer error: {}", msg),
            #[cfg(feature = "gui")]
            QuakeMapError::Gui(e) => write!(f, "GUI error: {}", e),
            QuakeMapError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for QuakeMapError {}

impl From<std::io::Error> for QuakeMapError {
    fn from(error: std::io::Error) -> Self {
        QuakeMapError::Io(error)
    }
}

impl From<reqwest::Error> for QuakeMapError {
    fn from(error: reqwest::Error) -> Self {
        QuakeMapError::Http(error)
    }
}

impl From<serde_json::Error> for QuakeMapError {
    fn from(error: serde_json::Error) -> Self {
        QuakeMapError::Json(error)
    }
}

impl From<geojson::Error> for QuakeMapError {
    fn from(error: geojson::Error) -> Self {
        QuakeMapError::GeoJson(error.to_string())
    }
}

#[cfg(feature = "gui")]
impl From<eframe::Error> for QuakeMapError {
    fn from(error: eframe::Error) -> Self {
        QuakeMapError::Gui(error)
    }
}

impl From<anyhow::Error> for QuakeMapError {
    fn from(error: anyhow::Error) -> Self {
        QuakeMapError::Other(error.to_string())
    }
}
