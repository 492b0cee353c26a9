// src/display/gui/layer_control.rs
//! Always-expanded base layer and overlay selector

use crate::map::{MapComposition, Overlay};
use eframe::egui;

use super::corner_anchor;

/// Draw the layer control. Returns true when the base layer changed.
pub fn render_layer_control(
    ctx: &egui::Context,
    map_rect: egui::Rect,
    composition: &mut MapComposition,
) -> bool {
    let (pivot, pos) = corner_anchor(composition.layer_control.corner, map_rect, 10.0);
    let before = composition.active_base();

    let base_layers: Vec<(String, _)> = composition
        .registry
        .base_layers
        .iter()
        .map(|(name, layer)| (name.to_string(), *layer))
        .collect();
    let overlays: Vec<(String, Overlay)> = composition
        .registry
        .overlays
        .iter()
        .map(|(name, overlay)| (name.to_string(), *overlay))
        .collect();

    egui::Area::new(egui::Id::new("layer_control"))
        .order(egui::Order::Foreground)
        .pivot(pivot)
        .fixed_pos(pos)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                let mut active = composition.active_base();
                for (name, layer) in &base_layers {
                    ui.radio_value(&mut active, *layer, name.as_str());
                }
                if active != composition.active_base() {
                    if let Some((name, _)) = base_layers.iter().find(|(_, l)| *l == active) {
                        if let Err(e) = composition.select_base_layer(name) {
                            log::warn!("{}", e);
                        }
                    }
                }

                ui.separator();

                for (name, overlay) in &overlays {
                    let mut visible = composition.is_overlay_visible(*overlay);
                    if ui.checkbox(&mut visible, name.as_str()).changed() {
                        composition.set_overlay_visible(*overlay, visible);
                    }
                }
            });
        });

    composition.active_base() != before
}
