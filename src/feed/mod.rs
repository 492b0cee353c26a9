// src/feed/mod.rs
//! Remote GeoJSON feeds: the earthquake summary and the plate boundaries

mod loader;
mod plates;
mod quake;
#[cfg(test)]
pub(crate) mod testing;

pub use loader::{parse_feature_collection, FeedLoader};
pub use plates::{parse_plate_boundaries, PlateBoundaries};
pub use quake::{parse_earthquakes, EarthquakeRecord};

/// USGS summary feed of every earthquake recorded in the past week
pub const DEFAULT_EARTHQUAKE_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson";

/// PB2002 plate boundary model (Bird, 2003)
pub const DEFAULT_PLATES_URL: &str =
    "https://raw.githubusercontent.com/fraxen/tectonicplates/master/GeoJSON/PB2002_boundaries.json";
