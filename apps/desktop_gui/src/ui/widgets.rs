//! Small reusable widgets for the customer screen.

use client_core::pagination::default_page_window;
use eframe::egui;

/// Single-line text field with a label and an optional inline error below it.
pub fn labeled_field(
    ui: &mut egui::Ui,
    id: &'static str,
    label: &str,
    value: &mut String,
    error: Option<&str>,
) -> egui::Response {
    ui.label(egui::RichText::new(label).strong());
    let response = ui.add(
        egui::TextEdit::singleline(value)
            .id_salt(id)
            .desired_width(f32::INFINITY),
    );
    if let Some(error) = error {
        ui.label(egui::RichText::new(error).color(ui.visuals().error_fg_color).small());
    }
    response
}

/// Single-line field followed by an action button. Enter in the field counts
/// as pressing the button.
pub fn field_with_action(
    ui: &mut egui::Ui,
    id: &'static str,
    value: &mut String,
    hint: &str,
    width: f32,
    action: &str,
) -> bool {
    let edit = ui.add(
        egui::TextEdit::singleline(value)
            .id_salt(id)
            .hint_text(hint)
            .desired_width(width),
    );
    let entered = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
    // The button is drawn every frame, even when Enter already fired.
    let clicked = ui.button(action).clicked();
    entered || clicked
}

/// Prev/next buttons around the windowed page numbers. Returns the page the
/// user picked, if any.
pub fn page_strip(ui: &mut egui::Ui, current: u32, total_pages: u32) -> Option<u32> {
    let mut picked = None;
    ui.horizontal(|ui| {
        if ui
            .add_enabled(current > 1, egui::Button::new("‹ Prev"))
            .clicked()
        {
            picked = Some(current - 1);
        }
        for entry in default_page_window(total_pages, current) {
            match entry {
                Some(page) => {
                    if ui
                        .selectable_label(page == current, page.to_string())
                        .clicked()
                        && page != current
                    {
                        picked = Some(page);
                    }
                }
                None => {
                    ui.label("…");
                }
            }
        }
        if ui
            .add_enabled(current < total_pages, egui::Button::new("Next ›"))
            .clicked()
        {
            picked = Some(current + 1);
        }
    });
    picked
}
