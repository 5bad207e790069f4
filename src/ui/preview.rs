//! Decoded textures for the upload and result panels.

use crate::image::EncodedImage;
use eframe::egui::{self, ColorImage, TextureHandle, TextureOptions};

/// A texture built from an [`EncodedImage`], refreshed explicitly whenever
/// the source changes.
pub(crate) struct Preview {
    name: &'static str,
    texture: Option<TextureHandle>,
    error: Option<String>,
}

impl Preview {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            texture: None,
            error: None,
        }
    }

    pub(crate) fn update(&mut self, ctx: &egui::Context, image: Option<&EncodedImage>) {
        self.texture = None;
        self.error = None;
        let Some(image) = image else { return };

        match decode_color_image(image) {
            Ok(color_image) => {
                self.texture = Some(ctx.load_texture(self.name, color_image, TextureOptions::LINEAR));
            }
            Err(e) => {
                tracing::warn!(preview = self.name, error = %e, "could not decode preview");
                self.error = Some(e);
            }
        }
    }

    /// Draws the texture scaled to fit `max`, preserving aspect ratio.
    pub(crate) fn show(&self, ui: &mut egui::Ui, max: egui::Vec2) {
        if let Some(tex) = &self.texture {
            let [w, h] = tex.size().map(|v| v as f32);
            let scale = (max.x / w).min(max.y / h).clamp(0.05, 4.0);
            ui.add(egui::Image::new((tex.id(), egui::vec2(w * scale, h * scale))));
        } else if let Some(err) = &self.error {
            // Undecodable uploads still go to the service; only the preview is lost.
            ui.label(format!("Preview unavailable: {err}"));
        }
    }
}

fn decode_color_image(image: &EncodedImage) -> Result<ColorImage, String> {
    let bytes = image.decode().map_err(|e| e.to_string())?;
    let rgba = ::image::load_from_memory(&bytes)
        .map_err(|e| e.to_string())?
        .to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}
