//! Reusable UI components

use crate::theme;
use eframe::egui;

/// Backend connection indicator: a colored dot plus a short label.
/// `reachable == None` means the startup probe has not run or was skipped.
pub fn status_dot(ui: &mut egui::Ui, reachable: Option<bool>) {
    let (color, label) = match reachable {
        Some(true) => (theme::STATUS_SUCCESS, "Backend online"),
        Some(false) => (theme::STATUS_ERROR, "Backend unreachable"),
        None => (theme::TEXT_DIM, "Backend status unknown"),
    };

    ui.horizontal(|ui| {
        let (rect, _) = ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
        ui.painter().circle_filled(rect.center(), 4.0, color);
        ui.add(
            egui::Label::new(
                egui::RichText::new(label)
                    .size(theme::FONT_SMALL)
                    .color(theme::TEXT_DIM),
            )
            .selectable(false),
        );
    });
}

/// Dim label / bright value row used in the result card.
pub fn detail_row(ui: &mut egui::Ui, label: &str, value: &str) {
    ui.horizontal(|ui| {
        ui.add(
            egui::Label::new(
                egui::RichText::new(label)
                    .size(theme::FONT_LABEL)
                    .color(theme::TEXT_DIM),
            )
            .selectable(false),
        );
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.add(
                egui::Label::new(
                    egui::RichText::new(value)
                        .size(theme::FONT_LABEL)
                        .color(theme::TEXT_SECONDARY),
                )
                .selectable(false),
            );
        });
    });
}
