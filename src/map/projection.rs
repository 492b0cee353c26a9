// src/map/projection.rs
//! Web-mercator slippy-map math

use std::f64::consts::PI;

pub const TILE_SIZE: f64 = 256.0;

/// Mercator latitude limit of square tile pyramids
pub const MAX_LATITUDE: f64 = 85.051_128_78;

const EARTH_CIRCUMFERENCE_M: f64 = 40_075_016.686;

/// Calculate tile coordinates from lat/lon and zoom level
pub fn lat_lon_to_tile(lat: f64, lon: f64, zoom: u8) -> (u32, u32) {
    let (px, py) = lat_lon_to_world(lat, lon, zoom);
    let max = (1u32 << zoom) - 1;
    let x = (px / TILE_SIZE).floor().clamp(0.0, max as f64) as u32;
    let y = (py / TILE_SIZE).floor().clamp(0.0, max as f64) as u32;
    (x, y)
}

/// Calculate lat/lon of a tile's north-west corner
pub fn tile_to_lat_lon(x: u32, y: u32, zoom: u8) -> (f64, f64) {
    world_to_lat_lon(x as f64 * TILE_SIZE, y as f64 * TILE_SIZE, zoom)
}

/// Lat/lon to world pixel coordinates at a zoom level
pub fn lat_lon_to_world(lat: f64, lon: f64, zoom: u8) -> (f64, f64) {
    let n = 2_f64.powi(zoom as i32) * TILE_SIZE;
    let lat_rad = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (lon + 180.0) / 360.0 * n;
    let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n;
    (x, y)
}

/// World pixel coordinates back to lat/lon
pub fn world_to_lat_lon(x: f64, y: f64, zoom: u8) -> (f64, f64) {
    let n = 2_f64.powi(zoom as i32) * TILE_SIZE;
    let lon = x / n * 360.0 - 180.0;
    let lat = ((1.0 - 2.0 * y / n) * PI).sinh().atan().to_degrees();
    (lat, lon)
}

/// Ground resolution in metres per screen pixel
pub fn meters_per_pixel(lat: f64, zoom: u8) -> f64 {
    EARTH_CIRCUMFERENCE_M * lat.to_radians().cos() / (TILE_SIZE * 2_f64.powi(zoom as i32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_coordinates() {
        let (x, y) = lat_lon_to_tile(37.09, -95.71, 5);
        assert_eq!((x, y), (7, 12));

        let (lat, lon) = tile_to_lat_lon(x, y, 5);
        assert!(lat >= 37.09 && lon <= -95.71);
    }

    #[test]
    fn test_world_round_trip() {
        let (x, y) = lat_lon_to_world(-33.86, 151.2, 7);
        let (lat, lon) = world_to_lat_lon(x, y, 7);
        assert!((lat + 33.86).abs() < 1e-9);
        assert!((lon - 151.2).abs() < 1e-9);
    }

    #[test]
    fn test_polar_clamp() {
        assert_eq!(lat_lon_to_tile(90.0, 0.0, 3).1, 0);
        assert_eq!(lat_lon_to_tile(-90.0, 0.0, 3).1, 7);
    }

    #[test]
    fn test_meters_per_pixel() {
        let equator = meters_per_pixel(0.0, 0);
        assert!((equator - 156_543.03).abs() < 0.1);
        assert!((meters_per_pixel(0.0, 5) - equator / 32.0).abs() < 1e-6);
        assert!(meters_per_pixel(60.0, 5) < meters_per_pixel(0.0, 5));
    }
}
