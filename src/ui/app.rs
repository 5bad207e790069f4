use crate::app::{download_file_name, Controller, GenerationOutcome, ResultView};
use crate::config::Config;
use crate::error::{Result, SelfieError};
use crate::image::providers::GeminiProviderBuilder;
use crate::image::{EncodedImage, GenerationRequest, ImageProvider};
use crate::ui::preview::Preview;
use crate::ui::selector::scenario_selector;
use crate::ui::upload::{upload_panel, UploadAction};
use async_trait::async_trait;
use eframe::egui::{self, Color32, RichText};
use rfd::FileDialog;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

/// The desktop window.
pub struct SelfieApp {
    controller: Controller,
    runtime: tokio::runtime::Handle,
    outcome_tx: Sender<GenerationOutcome>,
    outcome_rx: Receiver<GenerationOutcome>,
    original_preview: Preview,
    result_preview: Preview,
    /// Problems outside the generation cycle (bad key, unreadable file, failed save).
    notice: Option<String>,
}

impl SelfieApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config, runtime: tokio::runtime::Handle) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::light());

        let (provider, notice): (Arc<dyn ImageProvider>, _) =
            match GeminiProviderBuilder::from_config(&config).build() {
                Ok(provider) => (Arc::new(provider), None),
                Err(e) => {
                    tracing::warn!(error = %e, "starting without a usable provider");
                    (Arc::new(Unconfigured(e.to_string())), Some(e.to_string()))
                }
            };

        let (outcome_tx, outcome_rx) = channel();
        Self {
            controller: Controller::new(provider),
            runtime,
            outcome_tx,
            outcome_rx,
            original_preview: Preview::new("original"),
            result_preview: Preview::new("generated"),
            notice,
        }
    }

    fn set_image(&mut self, ctx: &egui::Context, image: Option<EncodedImage>) {
        self.controller.set_image(image);
        let state = self.controller.state();
        self.original_preview.update(ctx, state.original_image.as_ref());
        self.result_preview.update(ctx, None);
    }

    fn start_generation(&mut self, ctx: &egui::Context) {
        let Some(pending) = self.controller.start_generation() else {
            return;
        };
        let provider = self.controller.provider();
        let tx = self.outcome_tx.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let outcome = pending.run(&*provider).await;
            // The window may already be gone.
            let _ = tx.send(outcome);
            ctx.request_repaint();
        });
    }

    fn poll_outcomes(&mut self, ctx: &egui::Context) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            if self.controller.finish_generation(outcome) {
                let generated = self.controller.state().generated_image.as_ref();
                self.result_preview.update(ctx, generated);
            }
        }
    }

    fn save_result(&mut self) {
        let file_name = download_file_name(chrono::Utc::now().timestamp_millis());
        let Some(path) = FileDialog::new()
            .set_file_name(file_name)
            .add_filter("PNG", &["png"])
            .save_file()
        else {
            return;
        };
        match self.controller.save_generated(&path) {
            Ok(_) => self.notice = None,
            Err(e) => self.notice = Some(format!("Failed to save '{}': {e}", path.display())),
        }
    }
}

impl eframe::App for SelfieApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_outcomes(ctx);

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(8.0);
                ui.heading(RichText::new("📷 Zootopia Selfie Maker").size(30.0).strong());
                ui.label(
                    "Transport yourself into the world of Zootopia! Upload a photo and get a \
                     custom group selfie with Judy Hopps and Nick Wilde.",
                );
                ui.add_space(8.0);
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let (selected, is_generating, has_original) = {
                let state = self.controller.state();
                (
                    state.selected_scenario,
                    state.is_generating,
                    state.original_image.is_some(),
                )
            };

            if let Some(id) = scenario_selector(ui, selected, is_generating) {
                self.controller.select_scenario(id);
            }
            ui.add_space(12.0);

            let mut upload_action = None;
            let mut save_clicked = false;
            ui.columns(2, |cols| {
                egui::Frame::group(cols[0].style()).show(&mut cols[0], |ui| {
                    upload_action =
                        upload_panel(ui, &self.original_preview, has_original, is_generating);
                });

                egui::Frame::group(cols[1].style()).show(&mut cols[1], |ui| {
                    ui.set_min_height(320.0);
                    ui.vertical_centered(|ui| match self.controller.state().view() {
                        ResultView::Progress => {
                            ui.add_space(80.0);
                            ui.add(egui::Spinner::new().size(48.0));
                            ui.label(RichText::new("Creating Magic...").size(20.0).strong());
                            ui.label("Inviting Judy and Nick to your photo.");
                            ui.small("This might take 10-20 seconds.");
                        }
                        ResultView::Result(_) => {
                            let max = egui::vec2(ui.available_width(), 320.0);
                            self.result_preview.show(ui, max);
                            if ui.button("💾 Save Image").clicked() {
                                save_clicked = true;
                            }
                        }
                        ResultView::Placeholder => {
                            ui.add_space(120.0);
                            ui.label(
                                RichText::new("✨ Your masterpiece will appear here")
                                    .size(18.0)
                                    .color(Color32::GRAY),
                            );
                        }
                    });
                });
            });

            match upload_action {
                Some(UploadAction::Picked(image)) => {
                    self.notice = None;
                    self.set_image(ctx, Some(image));
                }
                Some(UploadAction::Cleared) => self.set_image(ctx, None),
                Some(UploadAction::Failed(msg)) => self.notice = Some(msg),
                None => {}
            }
            if save_clicked {
                self.save_result();
            }

            let state = self.controller.state();
            let messages: Vec<String> = state.error.iter().chain(self.notice.iter()).cloned().collect();
            let can_generate = state.can_generate();
            let has_original = state.original_image.is_some();
            let label = if state.is_generating {
                "Processing..."
            } else if state.generated_image.is_some() {
                "🔄 Generate Another"
            } else {
                "🔄 Generate Selfie"
            };

            ui.add_space(16.0);
            ui.vertical_centered(|ui| {
                for message in &messages {
                    ui.colored_label(Color32::from_rgb(220, 38, 38), format!("⚠ {message}"));
                }

                let button = egui::Button::new(RichText::new(label).size(18.0).strong())
                    .min_size(egui::vec2(320.0, 44.0));
                if ui.add_enabled(can_generate, button).clicked() {
                    self.start_generation(ctx);
                }

                if !has_original {
                    ui.small("Upload a photo to get started");
                }
            });
        });
    }
}

/// Stand-in used when no API key is configured; every request fails with the
/// configuration error so it shows up in the banner.
struct Unconfigured(String);

#[async_trait]
impl ImageProvider for Unconfigured {
    async fn generate(&self, _request: &GenerationRequest) -> Result<EncodedImage> {
        Err(SelfieError::Auth(self.0.clone()))
    }

    fn model(&self) -> &str {
        "unconfigured"
    }
}
