//! Completed moves of this session and the activity log.

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use super::app::{App, LogLevel};
use super::components::{back_button, colors, panel_header, section};

/// Show the moves panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let go_back = back_button(ui);

    panel_header(ui, "Completed Moves");

    section(ui, &format!("This Session ({})", app.moves.len()), |ui| {
        if app.moves.is_empty() {
            ui.label(RichText::new("No moves completed yet").weak());
            return;
        }

        ScrollArea::vertical()
            .id_salt("moves_scroll")
            .max_height(300.0)
            .show(ui, |ui| {
                egui::Grid::new("moves_grid")
                    .num_columns(6)
                    .spacing([20.0, 6.0])
                    .striped(true)
                    .show(ui, |ui| {
                        for title in ["Time", "Move Type", "Pallet/Asset", "From", "To", "Reference"] {
                            ui.label(RichText::new(title).strong());
                        }
                        ui.end_row();

                        for done in app.moves.iter().rev() {
                            ui.label(done.completed_at.format("%H:%M:%S").to_string());
                            ui.label(done.record.move_type.display_name());
                            ui.label(&done.record.asset_id);
                            ui.label(&done.record.current_location);
                            ui.label(&done.record.destination_location);
                            ui.label(done.reference.as_deref().unwrap_or("-"));
                            ui.end_row();
                        }
                    });
            });
    });

    ui.add_space(20.0);

    section(ui, "Activity Log", |ui| {
        ScrollArea::vertical()
            .id_salt("log_scroll")
            .max_height(200.0)
            .show(ui, |ui| {
                if app.log_messages.is_empty() {
                    ui.label(RichText::new("No recent activity").weak());
                }
                for entry in app.log_messages.iter().rev() {
                    let color = match entry.level {
                        LogLevel::Info => Color32::GRAY,
                        LogLevel::Success => colors::SUCCESS,
                        LogLevel::Warning => colors::WARNING,
                        LogLevel::Error => colors::ERROR,
                    };

                    ui.horizontal(|ui| {
                        ui.label(
                            RichText::new(entry.timestamp.format("%H:%M:%S").to_string())
                                .small()
                                .color(Color32::DARK_GRAY),
                        );
                        ui.label(RichText::new(&entry.message).color(color));
                    });
                }
            });
    });

    go_back
}
