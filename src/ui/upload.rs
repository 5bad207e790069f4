//! Upload panel: native picker, preview, clear.

use crate::image::{EncodedImage, UPLOAD_EXTENSIONS};
use crate::ui::preview::Preview;
use eframe::egui::{self, Color32, RichText};
use rfd::FileDialog;

/// What the user did in the upload panel this frame.
pub(crate) enum UploadAction {
    Picked(EncodedImage),
    Cleared,
    Failed(String),
}

pub(crate) fn upload_panel(
    ui: &mut egui::Ui,
    preview: &Preview,
    has_image: bool,
    disabled: bool,
) -> Option<UploadAction> {
    let size = egui::vec2(ui.available_width(), 320.0);

    if !has_image {
        let prompt = RichText::new(
            "📤 Upload your Photo\n\nChoose a selfie or a portrait with space on the sides for the best result.",
        )
        .size(16.0);
        let button = egui::Button::new(prompt).wrap().min_size(size);
        if ui.add_enabled(!disabled, button).clicked() {
            return pick_file();
        }
        return None;
    }

    let mut action = None;
    ui.horizontal(|ui| {
        ui.label(RichText::new("🖼 Original").strong());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if !disabled
                && ui
                    .button(RichText::new("✖").color(Color32::from_rgb(239, 68, 68)))
                    .on_hover_text("Remove photo")
                    .clicked()
            {
                action = Some(UploadAction::Cleared);
            }
        });
    });
    ui.vertical_centered(|ui| preview.show(ui, size));
    action
}

fn pick_file() -> Option<UploadAction> {
    let path = FileDialog::new()
        .add_filter("Image", UPLOAD_EXTENSIONS)
        .pick_file()?;
    Some(match EncodedImage::from_file(&path) {
        Ok(image) => UploadAction::Picked(image),
        Err(e) => UploadAction::Failed(format!("Failed to read '{}': {e}", path.display())),
    })
}
