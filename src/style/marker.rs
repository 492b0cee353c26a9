// src/style/marker.rs
//! Marker styling and popup text for earthquake records

use super::depth::{classify_depth, DepthColor};
use crate::feed::EarthquakeRecord;

/// Metres of circle radius per unit of magnitude
pub const RADIUS_SCALE: f64 = 20_000.0;
pub const FILL_OPACITY: f32 = 0.7;
pub const STROKE_WEIGHT: f32 = 0.5;
pub const STROKE_COLOR: (u8, u8, u8) = (0, 0, 0);

/// Visual style of one earthquake marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub radius_m: f64,
    pub fill_color: DepthColor,
    pub fill_opacity: f32,
    pub stroke_color: (u8, u8, u8),
    pub stroke_weight: f32,
}

/// A record paired with its derived style and popup text
#[derive(Debug, Clone)]
pub struct StyledMarker {
    pub record: EarthquakeRecord,
    pub style: MarkerStyle,
    pub popup: String,
}

/// Circle radius in metres for a magnitude. Negative magnitudes are clamped
/// to zero.
pub fn marker_radius(magnitude: f64) -> f64 {
    magnitude.max(0.0) * RADIUS_SCALE
}

pub fn style_marker(record: &EarthquakeRecord) -> MarkerStyle {
    MarkerStyle {
        radius_m: marker_radius(record.magnitude.unwrap_or(0.0)),
        fill_color: classify_depth(record.depth_km),
        fill_opacity: FILL_OPACITY,
        stroke_color: STROKE_COLOR,
        stroke_weight: STROKE_WEIGHT,
    }
}

/// Popup text: location, date, magnitude and depth, one per line
pub fn describe_feature(record: &EarthquakeRecord) -> String {
    let place = record.place.as_deref().unwrap_or("Unknown");
    let date = record
        .timestamp()
        .map(|ts| ts.format("%a %b %d %Y %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "Unknown".to_string());
    let magnitude = record
        .magnitude
        .map(|m| m.to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    let depth = if record.has_depth() {
        record.depth_km.to_string()
    } else {
        "Unknown".to_string()
    };

    format!(
        "Location: {}\nDate: {}\nMagnitude: {}\nDepth: {}",
        place, date, magnitude, depth
    )
}

/// Style every record, keeping feed order
pub fn style_features(records: &[EarthquakeRecord]) -> Vec<StyledMarker> {
    records
        .iter()
        .map(|record| StyledMarker {
            record: record.clone(),
            style: style_marker(record),
            popup: describe_feature(record),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(mag: Option<f64>, depth: f64) -> EarthquakeRecord {
        EarthquakeRecord {
            place: Some("10km N of X".to_string()),
            time: Some(1_700_000_000_000),
            magnitude: mag,
            longitude: -120.0,
            latitude: 38.0,
            depth_km: depth,
        }
    }

    #[test]
    fn test_fixed_style_fields() {
        let style = style_marker(&record(Some(5.0), 0.0));
        assert_eq!(style.fill_color, classify_depth(0.0));
        assert_eq!(style.fill_opacity, 0.7);
        assert_eq!(style.stroke_color, (0, 0, 0));
        assert_eq!(style.stroke_weight, 0.5);
    }

    #[test]
    fn test_radius_linear_in_magnitude() {
        let r1 = style_marker(&record(Some(1.0), 5.0)).radius_m;
        let r2 = style_marker(&record(Some(2.0), 5.0)).radius_m;
        let r6 = style_marker(&record(Some(6.5), 5.0)).radius_m;

        assert_eq!(r1, RADIUS_SCALE);
        assert_eq!(r2, 2.0 * r1);
        assert_eq!(r6, 6.5 * RADIUS_SCALE);
        assert!(r1 < r2 && r2 < r6);
    }

    #[test]
    fn test_degenerate_magnitudes() {
        assert_eq!(style_marker(&record(Some(-0.8), 5.0)).radius_m, 0.0);
        assert_eq!(style_marker(&record(Some(0.0), 5.0)).radius_m, 0.0);
        assert_eq!(style_marker(&record(None, 5.0)).radius_m, 0.0);
    }

    #[test]
    fn test_popup_text() {
        let text = describe_feature(&record(Some(4.5), 15.0));
        assert!(text.contains("Location: 10km N of X"));
        assert!(text.contains("Date: Tue Nov 14 2023 22:13:20 UTC"));
        assert!(text.contains("Magnitude: 4.5"));
        assert!(text.contains("Depth: 15"));
    }

    #[test]
    fn test_popup_placeholders() {
        let mut rec = record(None, 3.25);
        rec.place = None;
        rec.time = None;

        let text = describe_feature(&rec);
        assert!(text.contains("Location: Unknown"));
        assert!(text.contains("Date: Unknown"));
        assert!(text.contains("Magnitude: Unknown"));
        assert!(text.contains("Depth: 3.25"));
    }

    #[test]
    fn test_popup_missing_depth() {
        let rec = record(Some(2.0), f64::NAN);

        let text = describe_feature(&rec);
        assert!(text.contains("Depth: Unknown"));
        assert_eq!(style_marker(&rec).fill_color, DepthColor::BrightRed);
    }

    #[test]
    fn test_style_features_preserves_order() {
        let records: Vec<EarthquakeRecord> = (0..5)
            .map(|i| record(Some(i as f64), i as f64 * 25.0))
            .collect();

        let markers = style_features(&records);
        assert_eq!(markers.len(), records.len());
        for (marker, rec) in markers.iter().zip(&records) {
            assert_eq!(&marker.record, rec);
            assert_eq!(marker.style.fill_color, classify_depth(rec.depth_km));
        }
    }
}
