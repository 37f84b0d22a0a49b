//! Shared UI components.

use eframe::egui::{self, Color32, CornerRadius, Margin, Response, RichText, Ui};

use crate::models::StepStatus;

/// Status indicator colors.
pub mod colors {
    use super::Color32;

    pub const SUCCESS: Color32 = Color32::from_rgb(100, 200, 100);
    pub const ERROR: Color32 = Color32::from_rgb(255, 100, 100);
    pub const WARNING: Color32 = Color32::from_rgb(255, 200, 100);
    pub const NEUTRAL: Color32 = Color32::from_rgb(150, 150, 150);
    pub const ACTIVE: Color32 = Color32::from_rgb(100, 150, 230);
}

/// Render a back button that returns true when clicked.
pub fn back_button(ui: &mut Ui) -> bool {
    ui.button(RichText::new("< Back to Scanning").size(14.0)).clicked()
}

/// Render a panel header with title.
pub fn panel_header(ui: &mut Ui, title: &str) {
    ui.heading(RichText::new(title).size(24.0));
    ui.add_space(10.0);
    ui.separator();
    ui.add_space(20.0);
}

/// Button with a phosphor icon in front of the text.
pub fn styled_button_with_icon(ui: &mut Ui, icon: &str, text: &str) -> Response {
    ui.button(RichText::new(format!("{icon}  {text}")).size(14.0))
}

/// Colored message banner for scan feedback.
pub fn alert(ui: &mut Ui, icon: &str, message: &str, color: Color32) {
    egui::Frame::new()
        .fill(color.gamma_multiply(0.15))
        .stroke(egui::Stroke::new(1.0, color))
        .inner_margin(Margin::same(8))
        .corner_radius(CornerRadius::same(4))
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(RichText::new(icon).color(color));
                ui.label(RichText::new(message).color(color));
            });
        });
}

/// Numbered circle of the step indicator with its caption below.
pub fn step_badge(ui: &mut Ui, number: u8, caption: &str, status: StepStatus, done_icon: &str) {
    ui.vertical(|ui| {
        ui.set_width(90.0);
        let size = egui::vec2(36.0, 36.0);
        let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());

        if ui.is_rect_visible(rect) {
            let (fill, text_color) = match status {
                StepStatus::Active => (colors::ACTIVE, Color32::WHITE),
                StepStatus::Done => (colors::SUCCESS.gamma_multiply(0.3), colors::SUCCESS),
                StepStatus::Pending => (ui.visuals().faint_bg_color, ui.visuals().weak_text_color()),
            };
            let label = match status {
                StepStatus::Done => done_icon.to_string(),
                _ => number.to_string(),
            };

            ui.painter().circle_filled(rect.center(), 18.0, fill);
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                label,
                egui::FontId::proportional(16.0),
                text_color,
            );
        }

        ui.label(RichText::new(caption).small());
    });
}

/// Framed section with a bold title.
pub fn section(ui: &mut Ui, title: &str, add_contents: impl FnOnce(&mut Ui)) {
    egui::Frame::new()
        .fill(ui.style().visuals.extreme_bg_color)
        .inner_margin(Margin::same(15))
        .corner_radius(CornerRadius::same(8))
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(RichText::new(title).strong());
            ui.add_space(10.0);
            add_contents(ui);
        });
}
