// src/display/gui/map_view.rs
//! Slippy map canvas: base tiles, plate boundaries, earthquake markers and popups

use crate::{
    map::{
        composer::{PLATE_LINE_COLOR, PLATE_LINE_WEIGHT},
        meters_per_pixel,
        projection::{lat_lon_to_world, world_to_lat_lon, MAX_LATITUDE, TILE_SIZE},
        BaseLayer, MapComposition, Overlay, OverlayState, TileCache, TileKey,
    },
    style::StyledMarker,
};
use eframe::egui;
use log::debug;
use std::collections::{HashMap, HashSet};

use super::{
    layer_control::render_layer_control,
    legend::{depth_color32, render_legend},
};

const MIN_ZOOM: u8 = 1;
const MIN_MARKER_PX: f32 = 1.5;

pub struct MapCanvas {
    composition: MapComposition,
    tile_cache: TileCache,
    zoom: u8,
    center_lat: f64,
    center_lon: f64,
    loaded_tiles: HashMap<TileKey, egui::TextureHandle>,
    bad_tiles: HashSet<TileKey>,
    selected: Option<usize>,
}

impl MapCanvas {
    pub fn new(composition: MapComposition, tile_cache: TileCache) -> Self {
        let view = composition.view;
        tile_cache.preload_area(
            composition.active_base(),
            view.center_lat,
            view.center_lon,
            view.zoom,
            2,
        );

        Self {
            zoom: view.zoom,
            center_lat: view.center_lat,
            center_lon: view.center_lon,
            composition,
            tile_cache,
            loaded_tiles: HashMap::new(),
            bad_tiles: HashSet::new(),
            selected: None,
        }
    }

    pub fn composition(&self) -> &MapComposition {
        &self.composition
    }

    pub fn tile_cache(&self) -> &TileCache {
        &self.tile_cache
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn center(&self) -> (f64, f64) {
        (self.center_lat, self.center_lon)
    }

    pub fn zoom_in(&mut self) {
        let max = self.composition.active_base().tile_source().max_zoom;
        if self.zoom < max {
            self.zoom += 1;
        }
    }

    pub fn zoom_out(&mut self) {
        if self.zoom > MIN_ZOOM {
            self.zoom -= 1;
        }
    }

    pub fn reset_view(&mut self) {
        let view = self.composition.view;
        self.center_lat = view.center_lat;
        self.center_lon = view.center_lon;
        self.zoom = view.zoom;
    }

    pub fn clear_tiles(&mut self) {
        if let Err(e) = self.tile_cache.clear_disk_cache() {
            log::warn!("{}", e);
        }
        self.tile_cache.clear_memory_cache();
        self.loaded_tiles.clear();
        self.bad_tiles.clear();
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        let ctx = ui.ctx().clone();
        let available_size = ui.available_size();
        let (response, painter) =
            ui.allocate_painter(available_size, egui::Sense::click_and_drag());
        let rect = response.rect;

        if response.dragged() {
            self.pan_map(response.drag_delta());
        }

        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll > 20.0 {
                self.zoom_in();
            } else if scroll < -20.0 {
                self.zoom_out();
            }
        }

        let base = self.composition.active_base();
        if self.zoom > base.tile_source().max_zoom {
            self.zoom = base.tile_source().max_zoom;
        }

        painter.rect_filled(rect, 0.0, egui::Color32::from_gray(200));
        self.render_tiles(&ctx, &painter, rect);

        if self.composition.is_overlay_visible(Overlay::TectonicPlates) {
            self.render_plates(&painter, rect);
        }

        if self.composition.is_overlay_visible(Overlay::Earthquakes) {
            self.render_markers(&painter, rect);

            if response.clicked() {
                self.selected = response
                    .interact_pointer_pos()
                    .and_then(|pos| self.marker_at(pos, rect));
            }
            self.render_popup(&ctx, rect);
        } else {
            self.selected = None;
        }

        painter.text(
            rect.left_bottom() + egui::vec2(4.0, -4.0),
            egui::Align2::LEFT_BOTTOM,
            base.tile_source().attribution,
            egui::FontId::proportional(10.0),
            egui::Color32::from_gray(60),
        );

        render_legend(&ctx, rect, &self.composition.legend);
        if render_layer_control(&ctx, rect, &mut self.composition) {
            let base = self.composition.active_base();
            self.tile_cache
                .preload_area(base, self.center_lat, self.center_lon, self.zoom, 2);
        }
    }

    /// World-pixel position of the map rect's top-left corner
    fn world_origin(&self, rect: egui::Rect) -> (f64, f64) {
        let (cx, cy) = lat_lon_to_world(self.center_lat, self.center_lon, self.zoom);
        (cx - rect.width() as f64 / 2.0, cy - rect.height() as f64 / 2.0)
    }

    fn lat_lon_to_screen(&self, lat: f64, lon: f64, rect: egui::Rect) -> egui::Pos2 {
        let (origin_x, origin_y) = self.world_origin(rect);
        let (wx, wy) = lat_lon_to_world(lat, lon, self.zoom);
        egui::pos2(
            rect.left() + (wx - origin_x) as f32,
            rect.top() + (wy - origin_y) as f32,
        )
    }

    fn render_tiles(&mut self, ctx: &egui::Context, painter: &egui::Painter, rect: egui::Rect) {
        let base = self.composition.active_base();
        let tiles = visible_tiles(base, self.zoom, self.world_origin(rect), rect);

        // Textures for tiles that scrolled out of view or belong to another
        // zoom or layer are released
        let visible: HashSet<TileKey> = tiles.iter().map(|(key, _)| *key).collect();
        prune_tiles(&mut self.loaded_tiles, &visible);
        self.bad_tiles.retain(|key| visible.contains(key));

        for (key, tile_rect) in tiles {
            self.render_tile(ctx, painter, key, tile_rect);
        }
    }

    fn render_tile(
        &mut self,
        ctx: &egui::Context,
        painter: &egui::Painter,
        key: TileKey,
        tile_rect: egui::Rect,
    ) {
        let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));

        if let Some(texture) = self.loaded_tiles.get(&key) {
            painter.image(texture.id(), tile_rect, uv, egui::Color32::WHITE);
            return;
        }

        if self.bad_tiles.contains(&key) {
            return;
        }

        match self.tile_cache.get_tile(key) {
            Ok(Some(bytes)) => match image::load_from_memory(&bytes) {
                Ok(image) => {
                    let size = [image.width() as usize, image.height() as usize];
                    let rgba = image.to_rgba8();
                    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());

                    let (layer, zoom, x, y) = key;
                    let texture = ctx.load_texture(
                        format!("tile_{}_{}_{}_{}", layer.id(), zoom, x, y),
                        color_image,
                        egui::TextureOptions::LINEAR,
                    );
                    painter.image(texture.id(), tile_rect, uv, egui::Color32::WHITE);
                    self.loaded_tiles.insert(key, texture);
                }
                Err(e) => {
                    debug!("Undecodable tile {:?}: {}", key, e);
                    self.bad_tiles.insert(key);
                }
            },
            // Unreachable tile sources stay blank until the backoff expires
            Ok(None) if self.tile_cache.is_failed(key) => {}
            Ok(None) => {
                self.tile_cache.download_tile_async(key);
                painter.text(
                    tile_rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "Loading...",
                    egui::FontId::proportional(12.0),
                    egui::Color32::GRAY,
                );
            }
            Err(e) => {
                debug!("Tile {:?} read failed: {}", key, e);
                self.bad_tiles.insert(key);
            }
        }
    }

    fn render_plates(&self, painter: &egui::Painter, rect: egui::Rect) {
        let (r, g, b) = PLATE_LINE_COLOR;
        let stroke = egui::Stroke::new(PLATE_LINE_WEIGHT, egui::Color32::from_rgb(r, g, b));

        self.composition.with_plates(|state| {
            if let OverlayState::Loaded(plates) = state {
                let clip = rect.expand(50.0);
                for line in &plates.lines {
                    let points: Vec<egui::Pos2> = line
                        .0
                        .iter()
                        .map(|c| self.lat_lon_to_screen(c.y, c.x, rect))
                        .collect();

                    // Split where a line crosses the antimeridian instead of
                    // drawing a stroke across the whole map
                    let mut run: Vec<egui::Pos2> = Vec::new();
                    for pos in points {
                        if let Some(prev) = run.last() {
                            if (pos.x - prev.x).abs() > rect.width().max(TILE_SIZE as f32) {
                                Self::flush_line(painter, &mut run, clip, stroke);
                            }
                        }
                        run.push(pos);
                    }
                    Self::flush_line(painter, &mut run, clip, stroke);
                }
            }
        });
    }

    fn flush_line(
        painter: &egui::Painter,
        run: &mut Vec<egui::Pos2>,
        clip: egui::Rect,
        stroke: egui::Stroke,
    ) {
        if run.len() > 1 && run.iter().any(|p| clip.contains(*p)) {
            painter.add(egui::Shape::line(std::mem::take(run), stroke));
        }
        run.clear();
    }

    fn marker_radius_px(&self, marker: &StyledMarker) -> f32 {
        let lat = marker.record.latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE);
        let mpp = meters_per_pixel(lat, self.zoom);
        ((marker.style.radius_m / mpp) as f32).max(MIN_MARKER_PX)
    }

    fn render_markers(&self, painter: &egui::Painter, rect: egui::Rect) {
        for (idx, marker) in self.composition.markers.iter().enumerate() {
            let record = &marker.record;
            let pos = self.lat_lon_to_screen(record.latitude, record.longitude, rect);
            let radius = self.marker_radius_px(marker);
            if !rect.expand(radius).contains(pos) {
                continue;
            }

            let (r, g, b) = marker.style.fill_color.rgb();
            let alpha = (marker.style.fill_opacity * 255.0).round() as u8;
            let fill = egui::Color32::from_rgba_unmultiplied(r, g, b, alpha);

            let (sr, sg, sb) = marker.style.stroke_color;
            let stroke_width = if self.selected == Some(idx) {
                2.0
            } else {
                marker.style.stroke_weight
            };
            let stroke = egui::Stroke::new(stroke_width, egui::Color32::from_rgb(sr, sg, sb));

            painter.circle(pos, radius, fill, stroke);
        }
    }

    /// Smallest marker under the pointer
    fn marker_at(&self, pointer: egui::Pos2, rect: egui::Rect) -> Option<usize> {
        self.composition
            .markers
            .iter()
            .enumerate()
            .filter_map(|(idx, marker)| {
                let record = &marker.record;
                let pos = self.lat_lon_to_screen(record.latitude, record.longitude, rect);
                let radius = self.marker_radius_px(marker).max(4.0);
                (pos.distance(pointer) <= radius).then_some((idx, radius))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(idx, _)| idx)
    }

    fn render_popup(&mut self, ctx: &egui::Context, rect: egui::Rect) {
        let Some(idx) = self.selected else {
            return;
        };
        let Some(marker) = self.composition.markers.get(idx) else {
            self.selected = None;
            return;
        };

        let record = &marker.record;
        let pos = self.lat_lon_to_screen(record.latitude, record.longitude, rect);
        if !rect.contains(pos) {
            return;
        }

        let mut close = false;
        egui::Area::new(egui::Id::new("quake_popup"))
            .order(egui::Order::Foreground)
            .pivot(egui::Align2::CENTER_BOTTOM)
            .fixed_pos(pos - egui::vec2(0.0, 8.0))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_max_width(280.0);
                    let mut lines = marker.popup.lines();
                    ui.horizontal(|ui| {
                        if let Some(title) = lines.next() {
                            ui.strong(title);
                        }
                        if ui.small_button("✖").clicked() {
                            close = true;
                        }
                    });
                    ui.separator();
                    for line in lines {
                        ui.label(line);
                    }
                    ui.colored_label(depth_color32(marker.style.fill_color), "●");
                });
            });

        if close {
            self.selected = None;
        }
    }

    fn pan_map(&mut self, delta: egui::Vec2) {
        let (cx, cy) = lat_lon_to_world(self.center_lat, self.center_lon, self.zoom);
        let (lat, lon) = world_to_lat_lon(cx - delta.x as f64, cy - delta.y as f64, self.zoom);

        self.center_lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
        self.center_lon = (lon + 180.0).rem_euclid(360.0) - 180.0;
    }
}

/// Tiles covering `rect`, given the world-pixel position of its top-left
/// corner. Columns wrap around the antimeridian; rows are clipped to the map.
fn visible_tiles(
    layer: BaseLayer,
    zoom: u8,
    origin: (f64, f64),
    rect: egui::Rect,
) -> Vec<(TileKey, egui::Rect)> {
    let (origin_x, origin_y) = origin;
    let tiles_per_side = 1i64 << zoom;

    let first_x = (origin_x / TILE_SIZE).floor() as i64;
    let last_x = ((origin_x + rect.width() as f64) / TILE_SIZE).floor() as i64;
    let first_y = ((origin_y / TILE_SIZE).floor() as i64).max(0);
    let last_y = (((origin_y + rect.height() as f64) / TILE_SIZE).floor() as i64)
        .min(tiles_per_side - 1);

    let tile_size = egui::vec2(TILE_SIZE as f32, TILE_SIZE as f32);
    let mut tiles = Vec::new();

    for ty in first_y..=last_y {
        for tx in first_x..=last_x {
            let screen = egui::pos2(
                rect.left() + (tx as f64 * TILE_SIZE - origin_x) as f32,
                rect.top() + (ty as f64 * TILE_SIZE - origin_y) as f32,
            );

            let wrapped_x = tx.rem_euclid(tiles_per_side) as u32;
            let key = (layer, zoom, wrapped_x, ty as u32);
            tiles.push((key, egui::Rect::from_min_size(screen, tile_size)));
        }
    }

    tiles
}

/// Drop every loaded tile that is not currently visible
fn prune_tiles<T>(tiles: &mut HashMap<TileKey, T>, visible: &HashSet<TileKey>) {
    tiles.retain(|key, _| visible.contains(key));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(width: f32, height: f32) -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(width, height))
    }

    #[test]
    fn test_visible_tiles_cover_viewport() {
        let rect = viewport(512.0, 256.0);
        let tiles = visible_tiles(BaseLayer::OpenStreet, 3, (256.0, 256.0), rect);

        let keys: Vec<TileKey> = tiles.iter().map(|(key, _)| *key).collect();
        assert!(keys.contains(&(BaseLayer::OpenStreet, 3, 1, 1)));
        assert!(keys.contains(&(BaseLayer::OpenStreet, 3, 2, 1)));
        assert!(keys.iter().all(|(_, zoom, _, _)| *zoom == 3));
        assert_eq!(tiles[0].1.min, egui::Pos2::ZERO);
    }

    #[test]
    fn test_visible_tiles_wrap_columns_and_clip_rows() {
        // Two tiles per side at zoom 1; start half a tile left of the map
        let rect = viewport(256.0, 1024.0);
        let tiles = visible_tiles(BaseLayer::Topo, 1, (-128.0, -300.0), rect);

        let keys: HashSet<TileKey> = tiles.iter().map(|(key, _)| *key).collect();
        assert!(keys.contains(&(BaseLayer::Topo, 1, 1, 0)));
        assert!(keys.contains(&(BaseLayer::Topo, 1, 0, 1)));
        assert!(keys.iter().all(|(_, _, x, y)| *x < 2 && *y < 2));
    }

    #[test]
    fn test_prune_keeps_only_visible() {
        let mut loaded: HashMap<TileKey, u32> = HashMap::new();
        loaded.insert((BaseLayer::OpenStreet, 5, 7, 12), 1);
        loaded.insert((BaseLayer::OpenStreet, 4, 3, 6), 2);
        loaded.insert((BaseLayer::Topo, 5, 7, 12), 3);

        let visible: HashSet<TileKey> =
            [(BaseLayer::OpenStreet, 5, 7, 12)].into_iter().collect();
        prune_tiles(&mut loaded, &visible);

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.get(&(BaseLayer::OpenStreet, 5, 7, 12)), Some(&1));
    }
}
