// src/lib.rs
//! Earthquake Map Library
//!
//! Loads the USGS earthquake feed and the tectonic plate boundaries, styles
//! each event by depth and magnitude, and composes an interactive map.

pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod feed;
pub mod map;
pub mod session;
pub mod style;

// Re-export main types for convenience
pub use config::MapConfig;
pub use error::{QuakeMapError, Result};
pub use feed::{EarthquakeRecord, FeedLoader, PlateBoundaries};
pub use map::{compose_map, MapComposition, MapView};
pub use session::MapSession;
pub use style::{classify_depth, describe_feature, style_features, DepthColor, StyledMarker};

#[cfg(feature = "gui")]
pub use display::gui::QuakeMapApp;
