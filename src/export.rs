// src/export.rs
//! Export of styled earthquake markers

use crate::error::{QuakeMapError, Result};
use crate::style::StyledMarker;
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    #[value(name = "geojson")]
    GeoJson,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &str {
        match self {
            ExportFormat::GeoJson => "geojson",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            ExportFormat::GeoJson => "GeoJSON",
            ExportFormat::Csv => "CSV",
        }
    }
}

pub struct MarkerExporter<'a> {
    markers: &'a [StyledMarker],
}

impl<'a> MarkerExporter<'a> {
    pub fn new(markers: &'a [StyledMarker]) -> Self {
        Self { markers }
    }

    pub fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<()> {
        if self.markers.is_empty() {
            return Err(QuakeMapError::Other("No earthquakes to export".to_string()));
        }

        let content = self.render(format)?;

        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;

        Ok(())
    }

    pub fn render(&self, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::GeoJson => self.to_geojson(),
            ExportFormat::Csv => Ok(self.to_csv()),
        }
    }

    /// Point features carrying the marker style as simplestyle-like properties
    fn to_geojson(&self) -> Result<String> {
        let features: Vec<serde_json::Value> = self
            .markers
            .iter()
            .map(|marker| {
                let record = &marker.record;
                let style = &marker.style;

                serde_json::json!({
                    "type": "Feature",
                    "geometry": {
                        "type": "Point",
                        "coordinates": [record.longitude, record.latitude, record.depth_km]
                    },
                    "properties": {
                        "place": record.place,
                        "time": record.time,
                        "mag": record.magnitude,
                        "radius_m": style.radius_m,
                        "fill": style.fill_color.hex(),
                        "fill-opacity": style.fill_opacity,
                        "stroke": "#000000",
                        "stroke-width": style.stroke_weight,
                        "popup": marker.popup,
                    }
                })
            })
            .collect();

        let feature_collection = serde_json::json!({
            "type": "FeatureCollection",
            "features": features
        });

        Ok(serde_json::to_string_pretty(&feature_collection)?)
    }

    fn to_csv(&self) -> String {
        let mut csv = String::from("place,time,magnitude,latitude,longitude,depth_km,radius_m,fill\n");

        for marker in self.markers {
            let record = &marker.record;
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{}\n",
                record.place.as_deref().map_or(String::new(), Self::escape_csv),
                record
                    .timestamp()
                    .map_or(String::new(), |ts| ts.to_rfc3339()),
                record.magnitude.map_or(String::new(), |m| m.to_string()),
                record.latitude,
                record.longitude,
                record.depth_km,
                marker.style.radius_m,
                marker.style.fill_color.hex(),
            ));
        }

        csv
    }

    fn escape_csv(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::EarthquakeRecord;
    use crate::style::style_features;
    use tempfile::TempDir;

    fn markers() -> Vec<StyledMarker> {
        style_features(&[
            EarthquakeRecord {
                place: Some("5 km SW of Volcano, Hawaii".to_string()),
                time: Some(1_700_000_000_000),
                magnitude: Some(2.1),
                longitude: -155.28,
                latitude: 19.39,
                depth_km: 1.5,
            },
            EarthquakeRecord {
                place: None,
                time: None,
                magnitude: None,
                longitude: 142.1,
                latitude: 38.3,
                depth_km: 95.0,
            },
        ])
    }

    #[test]
    fn test_geojson_export() {
        let markers = markers();
        let json = MarkerExporter::new(&markers).render(ExportFormat::GeoJson).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let features = value["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0]["properties"]["fill"], "#00FF00");
        assert_eq!(features[1]["properties"]["fill"], "#FF0000");
        assert!(features[1]["properties"]["mag"].is_null());
        assert_eq!(features[0]["geometry"]["coordinates"][2], 1.5);
    }

    #[test]
    fn test_csv_export() {
        let markers = markers();
        let csv = MarkerExporter::new(&markers).render(ExportFormat::Csv).unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("place,time,magnitude"));
        assert!(lines[1].starts_with("\"5 km SW of Volcano, Hawaii\",2023-11-14T22:13:20+00:00,2.1,"));
        assert!(lines[2].starts_with(",,,38.3,142.1,95,0,#FF0000"));
    }

    #[test]
    fn test_export_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(format!("quakes.{}", ExportFormat::Csv.extension()));

        let markers = markers();
        MarkerExporter::new(&markers).export_to_file(&path, ExportFormat::Csv).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("Hawaii"));

        let empty: Vec<StyledMarker> = Vec::new();
        assert!(MarkerExporter::new(&empty).export_to_file(&path, ExportFormat::Csv).is_err());
    }
}
