// src/display/terminal.rs
//! Terminal summary of the earthquake feed

use crate::{
    error::Result,
    style::{legend_entries, DepthColor, StyledMarker},
};
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use std::io::Write;

pub struct TerminalDisplay;

impl TerminalDisplay {
    pub fn new() -> Self {
        Self
    }

    /// Print bucket counts, the depth legend and the `limit` strongest events
    pub fn render(
        &self,
        stdout: &mut impl Write,
        markers: &[StyledMarker],
        limit: usize,
    ) -> Result<()> {
        execute!(
            stdout,
            SetForegroundColor(Color::Green),
            Print("=".repeat(72)),
            Print("\n"),
            Print(format!("Earthquake Map - {} events in feed\n", markers.len())),
            Print("=".repeat(72)),
            Print("\n\n"),
            ResetColor
        )?;

        self.render_legend_section(stdout, markers)?;
        self.render_events_section(stdout, markers, limit)?;

        stdout.flush()?;
        Ok(())
    }

    fn render_legend_section(
        &self,
        stdout: &mut impl Write,
        markers: &[StyledMarker],
    ) -> Result<()> {
        execute!(
            stdout,
            SetForegroundColor(Color::Yellow),
            Print("DEPTH (km):\n"),
            ResetColor
        )?;

        for entry in legend_entries() {
            let count = markers
                .iter()
                .filter(|m| m.style.fill_color == entry.color)
                .count();

            execute!(
                stdout,
                Print("  "),
                SetForegroundColor(Self::term_color(entry.color)),
                Print("\u{25CF}"),
                ResetColor,
                Print(format!(" {:<8} {:>6}\n", entry.label(), count))
            )?;
        }

        execute!(stdout, Print("\n"))?;
        Ok(())
    }

    fn render_events_section(
        &self,
        stdout: &mut impl Write,
        markers: &[StyledMarker],
        limit: usize,
    ) -> Result<()> {
        execute!(
            stdout,
            SetForegroundColor(Color::Cyan),
            Print(format!("STRONGEST {}:\n", limit.min(markers.len()))),
            ResetColor
        )?;

        let mut strongest: Vec<&StyledMarker> = markers.iter().collect();
        strongest.sort_by(|a, b| {
            let a = a.record.magnitude.unwrap_or(f64::MIN);
            let b = b.record.magnitude.unwrap_or(f64::MIN);
            b.total_cmp(&a)
        });

        for marker in strongest.into_iter().take(limit) {
            let record = &marker.record;
            let time = record
                .timestamp()
                .map(|ts| ts.format("%Y-%m-%d %H:%M UTC").to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            let magnitude = record
                .magnitude
                .map(|m| format!("{:>4.1}", m))
                .unwrap_or_else(|| "   ?".to_string());

            execute!(
                stdout,
                Print("  "),
                SetForegroundColor(Self::term_color(marker.style.fill_color)),
                Print(format!("M{}", magnitude)),
                ResetColor,
                Print(format!(
                    " {:>7.1} km  {}  {}\n",
                    record.depth_km,
                    time,
                    record.place.as_deref().unwrap_or("Unknown")
                ))
            )?;
        }

        execute!(stdout, Print("\n"))?;
        Ok(())
    }

    fn term_color(color: DepthColor) -> Color {
        let (r, g, b) = color.rgb();
        Color::Rgb { r, g, b }
    }
}

impl Default for TerminalDisplay {
    fn default() -> Self {
        Self::new()
    }
}
