// src/display/gui/legend.rs
//! Depth legend overlay

use crate::{map::composer::Legend, style::DepthColor};
use eframe::egui;

use super::corner_anchor;

pub fn depth_color32(color: DepthColor) -> egui::Color32 {
    let (r, g, b) = color.rgb();
    egui::Color32::from_rgb(r, g, b)
}

/// Draw the legend box anchored to its corner of `map_rect`
pub fn render_legend(ctx: &egui::Context, map_rect: egui::Rect, legend: &Legend) {
    let (pivot, pos) = corner_anchor(legend.corner, map_rect, 10.0);

    egui::Area::new(egui::Id::new("depth_legend"))
        .order(egui::Order::Foreground)
        .pivot(pivot)
        .fixed_pos(pos)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.strong(legend.title);
                });
                ui.separator();

                for entry in &legend.entries {
                    ui.horizontal(|ui| {
                        let (swatch, _) = ui.allocate_exact_size(
                            egui::vec2(16.0, 14.0),
                            egui::Sense::hover(),
                        );
                        ui.painter().rect_filled(swatch, 2.0, depth_color32(entry.color));
                        ui.monospace(entry.label());
                    });
                }
            });
        });
}
