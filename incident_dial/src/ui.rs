//! UI module - range bar, detail panel, and settings
//!
//! Interactive chrome built with nannou_egui; results come back as plain
//! values so the app loop applies them after the egui frame closes.

use nannou_egui::egui;
use shared::EventRecord;

use crate::view::Range;

/// Draw the top range bar; returns the range the user clicked, if any
pub fn draw_range_bar(
    ctx: &egui::Context,
    current: Range,
    shown_count: usize,
    total_count: usize,
) -> Option<Range> {
    let mut picked = None;

    egui::TopBottomPanel::top("range_bar")
        .resizable(false)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Lookback:");
                for range in Range::ALL {
                    if ui
                        .selectable_label(range == current, range.key())
                        .clicked()
                    {
                        picked = Some(range);
                    }
                }

                ui.separator();
                ui.label(format!(
                    "Showing {} of {} incidents",
                    shown_count, total_count
                ));
            });
        });

    picked
}

/// Draw the incident detail panel
///
/// Fed the full selected record on each frame; empty selection shows the
/// inspection hint instead.
pub fn draw_detail_panel(ctx: &egui::Context, selected: Option<&EventRecord>) {
    egui::SidePanel::right("detail_panel")
        .resizable(false)
        .default_width(260.0)
        .show(ctx, |ui| {
            ui.heading("Event details");
            ui.separator();

            match selected {
                None => {
                    ui.label("Select a ray to inspect event name, location, and local time.");
                }
                Some(event) => {
                    ui.strong(&event.name);
                    ui.label(&event.location);
                    ui.separator();

                    ui.horizontal(|ui| {
                        ui.label("Time:");
                        ui.monospace(event.format_time());
                    });
                    ui.horizontal(|ui| {
                        ui.label("Date:");
                        ui.monospace(event.format_date());
                    });
                    ui.horizontal(|ui| {
                        ui.label("Severity:");
                        let color = if event.severity >= 70 {
                            egui::Color32::from_rgb(255, 84, 56)
                        } else {
                            egui::Color32::from_rgb(64, 160, 180)
                        };
                        ui.colored_label(color, format!("{}/100", event.severity));
                    });

                    ui.separator();
                    ui.label(&event.description);
                }
            }
        });
}

/// Draw the settings window; returns true when reduced motion was toggled
pub fn draw_settings_panel(ctx: &egui::Context, reduced_motion: &mut bool) -> bool {
    let mut changed = false;

    egui::Window::new("Settings")
        .collapsible(true)
        .resizable(false)
        .default_width(200.0)
        .anchor(egui::Align2::LEFT_BOTTOM, [10.0, -10.0])
        .show(ctx, |ui| {
            if ui.checkbox(reduced_motion, "Reduced Motion").changed() {
                changed = true;
            }
            ui.label("Freezes the haze aura at nominal geometry");
            ui.separator();
            ui.label("Press R to toggle");
        });

    changed
}
