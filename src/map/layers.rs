// src/map/layers.rs
//! Base tile layers, overlays and the named layer registry

use crate::error::{QuakeMapError, Result};

/// Alternative background tile sets. Only one is shown at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseLayer {
    OpenStreet,
    Topo,
    Outdoors,
    Grayscale,
    Watercolor,
}

impl BaseLayer {
    pub const ALL: [BaseLayer; 5] = [
        BaseLayer::OpenStreet,
        BaseLayer::Topo,
        BaseLayer::Outdoors,
        BaseLayer::Grayscale,
        BaseLayer::Watercolor,
    ];

    /// Name shown in the layer control
    pub fn display_name(&self) -> &'static str {
        match self {
            BaseLayer::OpenStreet => "OpenStreet",
            BaseLayer::Topo => "Topo",
            BaseLayer::Outdoors => "Outdoors",
            BaseLayer::Grayscale => "Grayscale",
            BaseLayer::Watercolor => "Watercolor",
        }
    }

    /// Stable identifier, used for cache directories and config
    pub fn id(&self) -> &'static str {
        match self {
            BaseLayer::OpenStreet => "osm",
            BaseLayer::Topo => "stamen-terrain",
            BaseLayer::Outdoors => "usgs-imagery",
            BaseLayer::Grayscale => "stamen-toner-lite",
            BaseLayer::Watercolor => "stamen-watercolor",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|layer| layer.display_name().eq_ignore_ascii_case(name) || layer.id() == name)
    }

    pub fn tile_source(&self) -> TileSource {
        match self {
            BaseLayer::OpenStreet => TileSource {
                url_template: "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
                attribution: "© OpenStreetMap contributors",
                max_zoom: 19,
                extension: "png",
            },
            BaseLayer::Topo => TileSource {
                url_template: "https://tiles.stadiamaps.com/tiles/stamen_terrain/{z}/{x}/{y}.png",
                attribution: "Map tiles by Stamen Design, © Stadia Maps, © OpenStreetMap contributors",
                max_zoom: 18,
                extension: "png",
            },
            BaseLayer::Outdoors => TileSource {
                url_template: "https://basemap.nationalmap.gov/arcgis/rest/services/USGSImageryOnly/MapServer/tile/{z}/{y}/{x}",
                attribution: "Tiles courtesy of the U.S. Geological Survey",
                max_zoom: 20,
                extension: "jpg",
            },
            BaseLayer::Grayscale => TileSource {
                url_template: "https://tiles.stadiamaps.com/tiles/stamen_toner_lite/{z}/{x}/{y}.png",
                attribution: "Map tiles by Stamen Design, © Stadia Maps, © OpenStreetMap contributors",
                max_zoom: 20,
                extension: "png",
            },
            BaseLayer::Watercolor => TileSource {
                url_template: "https://tiles.stadiamaps.com/tiles/stamen_watercolor/{z}/{x}/{y}.jpg",
                attribution: "Map tiles by Stamen Design, © Stadia Maps, © OpenStreetMap contributors",
                max_zoom: 16,
                extension: "jpg",
            },
        }
    }
}

/// Where a base layer's tiles come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSource {
    pub url_template: &'static str,
    pub attribution: &'static str,
    pub max_zoom: u8,
    pub extension: &'static str,
}

impl TileSource {
    pub fn tile_url(&self, zoom: u8, x: u32, y: u32) -> String {
        self.url_template
            .replace("{z}", &zoom.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }
}

/// Independently toggled content layers drawn above the base layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Overlay {
    Earthquakes,
    TectonicPlates,
}

impl Overlay {
    pub const ALL: [Overlay; 2] = [Overlay::Earthquakes, Overlay::TectonicPlates];

    pub fn display_name(&self) -> &'static str {
        match self {
            Overlay::Earthquakes => "Earthquakes",
            Overlay::TectonicPlates => "Tectonic Plates",
        }
    }
}

/// Insertion-ordered name → layer mapping with unique names
#[derive(Debug, Clone)]
pub struct NamedLayers<T> {
    entries: Vec<(String, T)>,
}

impl<T> NamedLayers<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn insert(&mut self, name: &str, layer: T) -> Result<()> {
        if self.get(name).is_some() {
            return Err(QuakeMapError::Layer(format!("duplicate layer name '{}'", name)));
        }
        self.entries.push((name.to_string(), layer));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, layer)| layer)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(n, layer)| (n.as_str(), layer))
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for NamedLayers<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The base-layer and overlay tables listed by the layer control
#[derive(Debug, Clone)]
pub struct LayerRegistry {
    pub base_layers: NamedLayers<BaseLayer>,
    pub overlays: NamedLayers<Overlay>,
}

impl LayerRegistry {
    /// All five base layers and both overlays, in display order
    pub fn standard() -> Result<Self> {
        let mut base_layers = NamedLayers::new();
        for layer in BaseLayer::ALL {
            base_layers.insert(layer.display_name(), layer)?;
        }

        let mut overlays = NamedLayers::new();
        for overlay in Overlay::ALL {
            overlays.insert(overlay.display_name(), overlay)?;
        }

        Ok(Self {
            base_layers,
            overlays,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry() {
        let registry = LayerRegistry::standard().unwrap();
        assert_eq!(
            registry.base_layers.names(),
            vec!["OpenStreet", "Topo", "Outdoors", "Grayscale", "Watercolor"]
        );
        assert_eq!(registry.overlays.names(), vec!["Earthquakes", "Tectonic Plates"]);
        assert_eq!(registry.overlays.get("Tectonic Plates"), Some(&Overlay::TectonicPlates));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut layers = NamedLayers::new();
        layers.insert("Topo", BaseLayer::Topo).unwrap();

        let result = layers.insert("Topo", BaseLayer::Grayscale);
        assert!(matches!(result, Err(QuakeMapError::Layer(_))));
        assert_eq!(layers.len(), 1);
    }

    #[test]
    fn test_tile_url() {
        let osm = BaseLayer::OpenStreet.tile_source();
        assert_eq!(osm.tile_url(5, 7, 12), "https://tile.openstreetmap.org/5/7/12.png");

        // USGS orders the path as z/y/x
        let usgs = BaseLayer::Outdoors.tile_source();
        assert!(usgs.tile_url(5, 7, 12).ends_with("/tile/5/12/7"));
    }

    #[test]
    fn test_from_name() {
        assert_eq!(BaseLayer::from_name("grayscale"), Some(BaseLayer::Grayscale));
        assert_eq!(BaseLayer::from_name("osm"), Some(BaseLayer::OpenStreet));
        assert_eq!(BaseLayer::from_name("satellite"), None);
    }
}
