//! Feed document to styled markers, without the network

use quake_map::{
    feed::{parse_earthquakes, parse_feature_collection, parse_plate_boundaries},
    map::{BaseLayer, MapComposition, MapView, Overlay},
    style::{legend_entries, style_features, DepthColor},
};

const QUAKES: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": { "mag": 4.5, "place": "10 km N of Somewhere", "time": 1700000000000 },
      "geometry": { "type": "Point", "coordinates": [-120.0, 35.0, 15.0] }
    },
    {
      "type": "Feature",
      "properties": { "mag": 2.1, "place": "Offshore", "time": 1700000100000 },
      "geometry": { "type": "Point", "coordinates": [142.3, 38.1, 50.0] }
    },
    {
      "type": "Feature",
      "properties": { "mag": 6.0, "place": "Deep event", "time": 1700000200000 },
      "geometry": { "type": "Point", "coordinates": [-178.5, -20.0, 550.0] }
    }
  ]
}"#;

const PLATES: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": { "Name": "PA-NA" },
      "geometry": { "type": "LineString", "coordinates": [[-125.0, 40.0], [-124.0, 41.0], [-123.5, 42.0]] }
    }
  ]
}"#;

#[test]
fn test_feed_to_markers() {
    let collection = parse_feature_collection(QUAKES).unwrap();
    let records = parse_earthquakes(&collection);
    let markers = style_features(&records);

    assert_eq!(markers.len(), 3);
    assert_eq!(markers[0].record.place.as_deref(), Some("10 km N of Somewhere"));
    assert_eq!(markers[1].record.place.as_deref(), Some("Offshore"));
    assert_eq!(markers[2].record.place.as_deref(), Some("Deep event"));

    assert_eq!(markers[0].style.fill_color, DepthColor::GreenYellow);
    assert_eq!(markers[1].style.fill_color, DepthColor::Yellow);
    assert_eq!(markers[2].style.fill_color, DepthColor::BrightRed);

    assert_eq!(markers[0].style.radius_m, 90000.0);
    assert_eq!(
        markers[0].popup,
        "Location: 10 km N of Somewhere\nDate: Tue Nov 14 2023 22:13:20 UTC\nMagnitude: 4.5\nDepth: 15"
    );
}

#[test]
fn test_composition_from_feed() {
    let collection = parse_feature_collection(QUAKES).unwrap();
    let markers = style_features(&parse_earthquakes(&collection));

    let composition =
        MapComposition::new(markers, MapView::default(), BaseLayer::OpenStreet).unwrap();
    assert_eq!(composition.markers.len(), 3);
    assert_eq!(composition.view.zoom, 5);
    assert!(composition.is_overlay_visible(Overlay::Earthquakes));
    assert!(composition.is_overlay_visible(Overlay::TectonicPlates));
    assert_eq!(composition.legend.entries, legend_entries());
    assert_eq!(composition.registry.base_layers.len(), 5);
    assert_eq!(composition.registry.overlays.len(), 2);
}

#[test]
fn test_plate_document() {
    let collection = parse_feature_collection(PLATES).unwrap();
    let plates = parse_plate_boundaries(&collection);
    assert_eq!(plates.lines.len(), 1);
    assert_eq!(plates.point_count(), 3);
}
