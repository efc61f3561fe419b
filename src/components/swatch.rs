use eframe::egui;

use crate::model::HexColor;

/// A clickable color square from the company palette.
pub struct Swatch {
    pub color: HexColor,
    pub label: &'static str,
    pub selected: bool,
}

impl Swatch {
    pub fn new(color: HexColor, label: &'static str, selected: bool) -> Self {
        Self {
            color,
            label,
            selected,
        }
    }

    pub fn show(&self, ui: &mut egui::Ui) -> egui::Response {
        let size = egui::vec2(28.0, 28.0);
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());

        if ui.is_rect_visible(rect) {
            let rect = if response.hovered() { rect } else { rect.shrink(1.0) };
            ui.painter().rect_filled(rect, 4.0, self.color.to_color32());

            if self.selected {
                ui.painter().rect_stroke(
                    rect.expand(1.0),
                    4.0,
                    egui::Stroke::new(2.0, egui::Color32::from_rgb(33, 150, 243)),
                );
            }
        }

        response.on_hover_text(format!("{} {}", self.label, self.color))
    }
}
