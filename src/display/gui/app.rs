// src/display/gui/app.rs
//! Main GUI application structure and eframe::App implementation

use crate::map::{MapComposition, Overlay, OverlayState, TileCache};
use eframe::egui;
use std::time::Duration;

use super::map_view::MapCanvas;

enum Content {
    Map(Box<MapCanvas>),
    Failed(String),
}

pub struct QuakeMapApp {
    content: Content,
}

impl QuakeMapApp {
    pub fn new(composition: MapComposition, tile_cache: TileCache) -> Self {
        Self {
            content: Content::Map(Box::new(MapCanvas::new(composition, tile_cache))),
        }
    }

    /// App that only reports why the earthquake feed could not be shown
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            content: Content::Failed(message.into()),
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.heading("🌋 Earthquake Map");

                if let Content::Map(canvas) = &mut self.content {
                    ui.separator();
                    ui.label("Zoom:");
                    if ui.button("➖").clicked() {
                        canvas.zoom_out();
                    }
                    ui.label(format!("{}", canvas.zoom()));
                    if ui.button("➕").clicked() {
                        canvas.zoom_in();
                    }
                    if ui.button("⟲ Reset view").clicked() {
                        canvas.reset_view();
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("❌ Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }

                    if let Content::Map(canvas) = &mut self.content {
                        if ui.button("🗑 Clear Cache").clicked() {
                            canvas.clear_tiles();
                        }
                    }
                });
            });
        });
    }

    fn render_status_bar(ctx: &egui::Context, canvas: &MapCanvas) {
        egui::TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let composition = canvas.composition();
                ui.label(format!("{} earthquakes", composition.markers.len()));
                ui.separator();

                composition.with_plates(|state| match state {
                    OverlayState::Pending => {
                        ui.weak("Tectonic plates: loading...");
                    }
                    OverlayState::Loaded(plates) => {
                        ui.label(format!("Tectonic plates: {} boundaries", plates.lines.len()));
                    }
                    OverlayState::Failed(msg) => {
                        ui.colored_label(egui::Color32::YELLOW, "Tectonic plates unavailable")
                            .on_hover_text(msg.as_str());
                    }
                });

                if !composition.is_overlay_visible(Overlay::Earthquakes) {
                    ui.separator();
                    ui.weak("Earthquakes hidden");
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let stats = canvas.tile_cache().get_stats();
                    ui.label(format!(
                        "Cache: {} tiles ({:.1} MB)",
                        stats.disk_tiles, stats.disk_size_mb
                    ));
                    ui.separator();
                    let (lat, lon) = canvas.center();
                    ui.monospace(format!("{:.4}, {:.4}", lat, lon));
                });
            });
        });
    }
}

impl eframe::App for QuakeMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Tiles and the plate overlay arrive in the background
        ctx.request_repaint_after(Duration::from_millis(500));

        self.render_top_bar(ctx);

        match &mut self.content {
            Content::Map(canvas) => {
                Self::render_status_bar(ctx, canvas);

                egui::CentralPanel::default()
                    .frame(egui::Frame::none())
                    .show(ctx, |ui| {
                        canvas.show(ui);
                    });
            }
            Content::Failed(message) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(ui.available_height() / 3.0);
                        ui.heading(
                            egui::RichText::new("Could not load the earthquake feed")
                                .color(egui::Color32::RED),
                        );
                        ui.add_space(10.0);
                        ui.label(message.as_str());
                    });
                });
            }
        }
    }
}
