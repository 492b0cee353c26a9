// src/map/composer.rs
//! Assembles the map: view, layers, legend, markers and the plate overlay

use super::layers::{BaseLayer, LayerRegistry, Overlay};
use crate::{
    error::{QuakeMapError, Result},
    feed::{FeedLoader, PlateBoundaries},
    style::{legend_entries, LegendEntry, StyledMarker},
};
use log::{info, warn};
use std::collections::HashSet;
use std::sync::{Arc, RwLock};
use tokio::{runtime::Handle, task::JoinHandle};

pub const DEFAULT_CENTER: (f64, f64) = (37.09, -95.71);
pub const DEFAULT_ZOOM: u8 = 5;

/// Plate boundaries are drawn as orange lines, weight 2
pub const PLATE_LINE_COLOR: (u8, u8, u8) = (255, 165, 0);
pub const PLATE_LINE_WEIGHT: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: u8,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center_lat: DEFAULT_CENTER.0,
            center_lon: DEFAULT_CENTER.1,
            zoom: DEFAULT_ZOOM,
        }
    }
}

/// Screen corner a control is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Debug, Clone)]
pub struct Legend {
    pub title: &'static str,
    pub corner: Corner,
    pub entries: Vec<LegendEntry>,
}

#[derive(Debug, Clone, Copy)]
pub struct LayerControl {
    pub corner: Corner,
    pub collapsed: bool,
}

/// Load state of an overlay whose data arrives after the map is built
#[derive(Debug, Clone)]
pub enum OverlayState<T> {
    Pending,
    Loaded(T),
    Failed(String),
}

pub type SharedPlates = Arc<RwLock<OverlayState<PlateBoundaries>>>;

/// Everything the map window draws, built once per run
pub struct MapComposition {
    pub view: MapView,
    pub registry: LayerRegistry,
    pub markers: Vec<StyledMarker>,
    pub legend: Legend,
    pub layer_control: LayerControl,
    active_base: BaseLayer,
    visible_overlays: HashSet<Overlay>,
    plates: SharedPlates,
}

impl MapComposition {
    /// Build the composition. Both overlays start visible.
    pub fn new(markers: Vec<StyledMarker>, view: MapView, base: BaseLayer) -> Result<Self> {
        let registry = LayerRegistry::standard()?;

        Ok(Self {
            view,
            registry,
            markers,
            legend: Legend {
                title: "Depth",
                corner: Corner::BottomRight,
                entries: legend_entries(),
            },
            layer_control: LayerControl {
                corner: Corner::TopRight,
                collapsed: false,
            },
            active_base: base,
            visible_overlays: Overlay::ALL.into_iter().collect(),
            plates: Arc::new(RwLock::new(OverlayState::Pending)),
        })
    }

    pub fn active_base(&self) -> BaseLayer {
        self.active_base
    }

    /// Switch base layer by its registered name
    pub fn select_base_layer(&mut self, name: &str) -> Result<()> {
        let layer = self
            .registry
            .base_layers
            .get(name)
            .copied()
            .ok_or_else(|| QuakeMapError::Layer(format!("unknown base layer '{}'", name)))?;
        self.active_base = layer;
        Ok(())
    }

    pub fn is_overlay_visible(&self, overlay: Overlay) -> bool {
        self.visible_overlays.contains(&overlay)
    }

    pub fn set_overlay_visible(&mut self, overlay: Overlay, visible: bool) {
        if visible {
            self.visible_overlays.insert(overlay);
        } else {
            self.visible_overlays.remove(&overlay);
        }
    }

    /// Handle written by the plate fetch when it resolves
    pub fn plates_handle(&self) -> SharedPlates {
        Arc::clone(&self.plates)
    }

    /// Run `f` against the current plate overlay state
    pub fn with_plates<R>(&self, f: impl FnOnce(&OverlayState<PlateBoundaries>) -> R) -> R {
        match self.plates.read() {
            Ok(state) => f(&*state),
            Err(poisoned) => f(&*poisoned.into_inner()),
        }
    }
}

/// Fetch the plate feed in the background and store the outcome in `target`.
///
/// A failed fetch leaves the map usable; the overlay just stays empty.
pub fn spawn_plate_fetch(
    handle: &Handle,
    loader: FeedLoader,
    url: String,
    target: SharedPlates,
) -> JoinHandle<()> {
    handle.spawn(async move {
        let state = match loader.fetch_plates(&url).await {
            Ok(plates) => {
                info!(
                    "Loaded {} plate boundary lines ({} points)",
                    plates.lines.len(),
                    plates.point_count()
                );
                OverlayState::Loaded(plates)
            }
            Err(e) => {
                warn!("Tectonic plate feed failed, continuing without it: {}", e);
                OverlayState::Failed(e.to_string())
            }
        };

        match target.write() {
            Ok(mut slot) => *slot = state,
            Err(poisoned) => *poisoned.into_inner() = state,
        }
    })
}

/// Build the map around already styled markers, then start the plate fetch
pub fn compose_map(
    markers: Vec<StyledMarker>,
    view: MapView,
    base: BaseLayer,
    loader: &FeedLoader,
    plates_url: &str,
    handle: &Handle,
) -> Result<MapComposition> {
    let composition = MapComposition::new(markers, view, base)?;
    info!(
        "Composed map with {} earthquake markers at ({:.2}, {:.2}) zoom {}",
        composition.markers.len(),
        view.center_lat,
        view.center_lon,
        view.zoom
    );

    spawn_plate_fetch(
        handle,
        loader.clone(),
        plates_url.to_string(),
        composition.plates_handle(),
    );

    Ok(composition)
}
