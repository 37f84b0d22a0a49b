//! Scanning panel: move type, step indicator, scan input, confirm and completion views.

use eframe::egui::{self, Align, Layout, RichText, ScrollArea, TextEdit, TextStyle, Ui};
use egui_phosphor::regular::{
    ARROW_COUNTER_CLOCKWISE, ARROW_RIGHT, ARROWS_LEFT_RIGHT, BARCODE, CHECK, CHECK_CIRCLE, LIST, X_CIRCLE,
};

use crate::models::{FlowStep, MoveType, ScanRecord};
use crate::scan::{Feedback, FlowSnapshot};

use super::app::{App, Panel};
use super::components::{alert, colors, section, step_badge, styled_button_with_icon};

/// Show the scan panel.
///
/// Returns `Some(panel)` if navigation is requested.
pub fn show(app: &mut App, ui: &mut Ui) -> Option<Panel> {
    let mut next_panel = None;
    let snapshot = app.flow.snapshot();

    ui.horizontal(|ui| {
        ui.heading(RichText::new("Skid-Pallet-Asset to Location Scanning").size(24.0));
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            if styled_button_with_icon(ui, LIST, "Completed Moves").clicked() {
                next_panel = Some(Panel::Moves);
            }
        });
    });
    ui.label(RichText::new("Scan barcodes to move items between warehouse locations").weak());
    ui.add_space(10.0);
    ui.separator();
    ui.add_space(10.0);

    ScrollArea::vertical().show(ui, |ui| {
        show_move_type_selector(app, ui, &snapshot);
        ui.add_space(15.0);

        show_step_indicator(ui, &snapshot);
        ui.add_space(20.0);

        match snapshot.step {
            FlowStep::Current | FlowStep::Asset | FlowStep::Destination => show_scan_input(app, ui, &snapshot),
            FlowStep::Confirm => show_confirm_step(app, ui, &snapshot),
            FlowStep::Complete => show_completion(app, ui, &snapshot),
        }

        if snapshot.step != FlowStep::Complete {
            ui.add_space(20.0);
            show_scan_summary(ui, &snapshot.record);
        }

        ui.add_space(20.0);
        ui.separator();
        show_footer(app, ui, &snapshot);
    });

    next_panel
}

fn show_move_type_selector(app: &mut App, ui: &mut Ui, snapshot: &FlowSnapshot) {
    ui.label(RichText::new("Select Move Type:").strong());
    ui.add_space(4.0);

    let mut selected = snapshot.record.move_type;
    ui.add_enabled_ui(snapshot.can_select_move_type(), |ui| {
        egui::ComboBox::from_id_salt("move_type")
            .selected_text(selected.display_name())
            .width(320.0)
            .show_ui(ui, |ui| {
                for move_type in MoveType::ALL {
                    ui.selectable_value(&mut selected, move_type, move_type.display_name());
                }
            });
    });

    if selected != snapshot.record.move_type {
        app.select_move_type(selected);
    }
}

fn show_step_indicator(ui: &mut Ui, snapshot: &FlowSnapshot) {
    ui.horizontal(|ui| {
        for (i, step) in FlowStep::VISIBLE.into_iter().enumerate() {
            if i > 0 {
                ui.label(RichText::new(ARROW_RIGHT).weak());
            }
            step_badge(
                ui,
                step.number().unwrap_or_default(),
                step.title(snapshot.record.move_type),
                step.status(snapshot.step),
                CHECK,
            );
        }
    });
}

fn show_feedback(ui: &mut Ui, feedback: &Feedback) {
    match feedback {
        Feedback::None => {}
        Feedback::Error(message) => {
            ui.add_space(8.0);
            alert(ui, X_CIRCLE, message, colors::ERROR);
        }
        Feedback::Success(message) => {
            ui.add_space(8.0);
            alert(ui, CHECK_CIRCLE, message, colors::SUCCESS);
        }
    }
}

fn show_scan_input(app: &mut App, ui: &mut Ui, snapshot: &FlowSnapshot) {
    let label = snapshot.label();

    ui.horizontal(|ui| {
        ui.label(RichText::new(format!("Step {}", snapshot.step.number().unwrap_or_default())).strong());
        ui.heading(format!("Scan {label}"));
    });
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        ui.label(RichText::new(BARCODE).size(24.0));

        let width = ui.available_width() - 40.0;
        let response = ui.add_enabled(
            !snapshot.processing,
            TextEdit::singleline(&mut app.scan_input)
                .hint_text(format!("Scan {label} barcode..."))
                .font(TextStyle::Heading)
                .desired_width(width),
        );

        if app.focus_scan_input && !snapshot.processing {
            response.request_focus();
            app.focus_scan_input = false;
        }

        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) && !snapshot.processing {
            app.submit_scan();
        }

        if snapshot.processing {
            ui.spinner();
        }
    });

    show_feedback(ui, &snapshot.feedback);
}

fn show_confirm_step(app: &mut App, ui: &mut Ui, snapshot: &FlowSnapshot) {
    ui.horizontal(|ui| {
        ui.label(RichText::new("Step 4").strong());
        ui.heading("Confirm Move");
    });
    ui.add_space(8.0);

    section(ui, "Move Details", |ui| {
        move_details_grid(ui, "confirm_grid", &snapshot.record);
    });

    ui.add_space(15.0);

    ui.vertical_centered(|ui| {
        if snapshot.processing {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Processing...");
            });
        } else if styled_button_with_icon(ui, ARROWS_LEFT_RIGHT, "Confirm Move").clicked() {
            app.confirm_move();
        }
    });

    show_feedback(ui, &snapshot.feedback);
}

fn show_scan_summary(ui: &mut Ui, record: &ScanRecord) {
    let or_dash = |s: &str| if s.is_empty() { "-".to_string() } else { s.to_string() };
    let asset_title = FlowStep::Asset.title(record.move_type);

    section(ui, "Scan Summary", |ui| {
        ui.columns(3, |columns| {
            for (column, (title, value)) in columns.iter_mut().zip([
                ("Current Bin Location", &record.current_location),
                (asset_title, &record.asset_id),
                ("Destination Bin Location", &record.destination_location),
            ]) {
                column.label(RichText::new(title).small().weak());
                column.label(RichText::new(or_dash(value)).strong());
            }
        });
    });
}

fn show_completion(app: &mut App, ui: &mut Ui, snapshot: &FlowSnapshot) {
    ui.vertical_centered(|ui| {
        ui.label(RichText::new(CHECK_CIRCLE).size(48.0).color(colors::SUCCESS));
        ui.add_space(8.0);
        ui.label(RichText::new("Move Completed Successfully").size(20.0).strong());
        ui.label(RichText::new(snapshot.record.move_type.completion_message()).weak());
    });
    ui.add_space(15.0);

    section(ui, "Move Summary", |ui| {
        move_details_grid(ui, "completion_grid", &snapshot.record);
    });

    ui.add_space(15.0);
    ui.vertical_centered(|ui| {
        if ui.button("Scan Another Item").clicked() {
            app.reset_scan();
        }
    });
}

fn move_details_grid(ui: &mut Ui, id: &str, record: &ScanRecord) {
    egui::Grid::new(id).num_columns(2).spacing([40.0, 8.0]).striped(true).show(ui, |ui| {
        ui.label("Move Type:");
        ui.label(RichText::new(record.move_type.display_name()).strong());
        ui.end_row();

        ui.label("From:");
        ui.label(&record.current_location);
        ui.end_row();

        ui.label(format!("{}:", FlowStep::Asset.title(record.move_type)));
        ui.label(&record.asset_id);
        ui.end_row();

        ui.label("To:");
        ui.label(&record.destination_location);
        ui.end_row();
    });
}

fn show_footer(app: &mut App, ui: &mut Ui, snapshot: &FlowSnapshot) {
    ui.horizontal(|ui| {
        if ui
            .add_enabled(
                snapshot.can_reset(),
                egui::Button::new(format!("{ARROW_COUNTER_CLOCKWISE}  Reset")),
            )
            .clicked()
        {
            app.reset_scan();
        }

        if snapshot.step.is_capture() {
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.label(RichText::new(format!("Press Enter after scanning {ARROW_RIGHT}")).weak());
            });
        }
    });
}
