// src/feed/quake.rs
//! Earthquake records decoded from the USGS summary feed

use chrono::{DateTime, TimeZone, Utc};
use geojson::{Feature, FeatureCollection, Value};
use log::warn;

/// One earthquake from the feed.
///
/// Coordinates come from the point geometry `[lon, lat, depth_km]`. The
/// descriptive properties are optional: the feed occasionally omits them and
/// a missing value is rendered as a placeholder rather than rejected. A point
/// without a depth keeps `depth_km` as NaN, which classifies as the deepest
/// bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct EarthquakeRecord {
    pub place: Option<String>,
    pub time: Option<i64>,      // epoch milliseconds
    pub magnitude: Option<f64>,
    pub longitude: f64,
    pub latitude: f64,
    pub depth_km: f64,
}

impl EarthquakeRecord {
    /// Decode a feature, returning None when it has no usable point geometry
    pub fn from_feature(feature: &Feature) -> Option<Self> {
        let geometry = feature.geometry.as_ref()?;
        let coords = match &geometry.value {
            Value::Point(coords) if coords.len() >= 2 => coords,
            _ => return None,
        };

        let place = feature
            .property("place")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        let time = feature.property("time").and_then(|v| {
            v.as_i64().or_else(|| v.as_f64().map(|ms| ms as i64))
        });

        let magnitude = feature.property("mag").and_then(|v| v.as_f64());

        Some(Self {
            place,
            time,
            magnitude,
            longitude: coords[0],
            latitude: coords[1],
            depth_km: coords.get(2).copied().unwrap_or(f64::NAN),
        })
    }

    pub fn has_depth(&self) -> bool {
        !self.depth_km.is_nan()
    }

    /// Event time as a UTC timestamp
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.time
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
    }
}

/// Decode every earthquake in a collection, preserving feed order
pub fn parse_earthquakes(collection: &FeatureCollection) -> Vec<EarthquakeRecord> {
    let mut records = Vec::with_capacity(collection.features.len());

    for (idx, feature) in collection.features.iter().enumerate() {
        match EarthquakeRecord::from_feature(feature) {
            Some(record) => records.push(record),
            None => warn!("Skipping feature {}: no point geometry", idx),
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::parse_feature_collection;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type":"Feature",
             "properties":{"place":"10km N of X","time":1700000000000,"mag":4.5},
             "geometry":{"type":"Point","coordinates":[-120.0,38.0,15.0]}},
            {"type":"Feature",
             "properties":{"place":null,"time":null,"mag":null},
             "geometry":{"type":"Point","coordinates":[140.2,35.1,-1.2]}},
            {"type":"Feature",
             "properties":{"place":"nowhere","time":1,"mag":1.0},
             "geometry":null},
            {"type":"Feature",
             "properties":{"place":"surface only","time":2,"mag":2.0},
             "geometry":{"type":"Point","coordinates":[10.0,20.0]}}
        ]
    }"#;

    #[test]
    fn test_parse_records() {
        let collection = parse_feature_collection(SAMPLE).unwrap();
        let records = parse_earthquakes(&collection);

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].place.as_deref(), Some("10km N of X"));
        assert_eq!(records[0].time, Some(1_700_000_000_000));
        assert_eq!(records[0].magnitude, Some(4.5));
        assert_eq!(records[0].longitude, -120.0);
        assert_eq!(records[0].latitude, 38.0);
        assert_eq!(records[0].depth_km, 15.0);
    }

    #[test]
    fn test_missing_properties() {
        let collection = parse_feature_collection(SAMPLE).unwrap();
        let records = parse_earthquakes(&collection);

        assert_eq!(records[1].place, None);
        assert_eq!(records[1].time, None);
        assert_eq!(records[1].magnitude, None);
        assert_eq!(records[1].depth_km, -1.2);
    }

    #[test]
    fn test_point_without_depth() {
        let collection = parse_feature_collection(SAMPLE).unwrap();
        let records = parse_earthquakes(&collection);

        let surface = &records[2];
        assert_eq!(surface.place.as_deref(), Some("surface only"));
        assert_eq!((surface.longitude, surface.latitude), (10.0, 20.0));
        assert!(surface.depth_km.is_nan());
        assert!(!surface.has_depth());
        assert!(records[0].has_depth());
        assert_eq!(
            crate::style::classify_depth(surface.depth_km),
            crate::style::DepthColor::BrightRed
        );
    }

    #[test]
    fn test_timestamp() {
        let collection = parse_feature_collection(SAMPLE).unwrap();
        let records = parse_earthquakes(&collection);

        let ts = records[0].timestamp().unwrap();
        assert_eq!(ts.format("%Y-%m-%d %H:%M:%S").to_string(), "2023-11-14 22:13:20");
        assert!(records[1].timestamp().is_none());
    }
}
