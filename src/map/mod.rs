// src/map/mod.rs
//! Map composition, layers and tile caching

pub mod composer;
pub mod layers;
pub mod projection;
mod tile_cache;

pub use composer::{
    compose_map, spawn_plate_fetch, Corner, MapComposition, MapView, OverlayState, SharedPlates,
};
pub use layers::{BaseLayer, LayerRegistry, NamedLayers, Overlay, TileSource};
pub use projection::{lat_lon_to_tile, meters_per_pixel, tile_to_lat_lon};
pub use tile_cache::{CacheStats, TileCache, TileKey};
