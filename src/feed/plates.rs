// src/feed/plates.rs
//! Tectonic plate boundary geometry

use geo_types::{Coord, LineString};
use geojson::{FeatureCollection, Geometry, Value};

/// Boundary lines from the plate feed. Only geometry is kept.
#[derive(Debug, Clone, Default)]
pub struct PlateBoundaries {
    pub lines: Vec<LineString<f64>>,
}

impl PlateBoundaries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of vertices across all lines
    pub fn point_count(&self) -> usize {
        self.lines.iter().map(|line| line.0.len()).sum()
    }

    fn add_geometry(&mut self, geometry: &Geometry) {
        match &geometry.value {
            Value::LineString(coords) => self.add_line(coords),
            Value::MultiLineString(lines) => {
                for coords in lines {
                    self.add_line(coords);
                }
            }
            // Polygon rings are drawn as their outlines
            Value::Polygon(rings) => {
                for ring in rings {
                    self.add_line(ring);
                }
            }
            Value::MultiPolygon(polygons) => {
                for ring in polygons.iter().flatten() {
                    self.add_line(ring);
                }
            }
            Value::GeometryCollection(geometries) => {
                for g in geometries {
                    self.add_geometry(g);
                }
            }
            Value::Point(_) | Value::MultiPoint(_) => {}
        }
    }

    fn add_line(&mut self, coords: &[Vec<f64>]) {
        let points: Vec<Coord<f64>> = coords
            .iter()
            .filter(|c| c.len() >= 2)
            .map(|c| Coord { x: c[0], y: c[1] })
            .collect();

        if points.len() >= 2 {
            self.lines.push(LineString::new(points));
        }
    }
}

/// Decode the boundary lines of a plate collection
pub fn parse_plate_boundaries(collection: &FeatureCollection) -> PlateBoundaries {
    let mut boundaries = PlateBoundaries::new();

    for geometry in collection.features.iter().filter_map(|f| f.geometry.as_ref()) {
        boundaries.add_geometry(geometry);
    }

    boundaries
}
