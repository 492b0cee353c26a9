// src/display/gui/mod.rs
//! GUI display module - window setup and shared helpers

mod app;
mod layer_control;
mod legend;
mod map_view;

pub use app::QuakeMapApp;

use crate::{
    error::{QuakeMapError, Result},
    map::Corner,
};
use eframe::egui;

/// Open the map window and block until it is closed
pub fn run(app: QuakeMapApp) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("Earthquake Map")
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Earthquake Map",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            Ok(Box::new(app))
        }),
    )
    .map_err(QuakeMapError::Gui)
}

/// Pivot and position placing a box in `corner` of `rect`, inset by `margin`
pub(crate) fn corner_anchor(
    corner: Corner,
    rect: egui::Rect,
    margin: f32,
) -> (egui::Align2, egui::Pos2) {
    match corner {
        Corner::TopLeft => (
            egui::Align2::LEFT_TOP,
            rect.left_top() + egui::vec2(margin, margin),
        ),
        Corner::TopRight => (
            egui::Align2::RIGHT_TOP,
            rect.right_top() + egui::vec2(-margin, margin),
        ),
        Corner::BottomLeft => (
            egui::Align2::LEFT_BOTTOM,
            rect.left_bottom() + egui::vec2(margin, -margin),
        ),
        Corner::BottomRight => (
            egui::Align2::RIGHT_BOTTOM,
            rect.right_bottom() + egui::vec2(-margin, -margin),
        ),
    }
}
