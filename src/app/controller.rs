//! The root controller: owns [`AppState`] and applies every transition.
//!
//! Generation is split into [`Controller::start_generation`] and
//! [`Controller::finish_generation`] so a front end can run the request on
//! its own executor. Each start bumps an epoch; outcomes carrying an older
//! epoch are dropped, so a late response never overwrites newer state.

use crate::app::state::AppState;
use crate::error::Result;
use crate::image::{EncodedImage, GenerationRequest, ImageProvider};
use crate::scenario::ScenarioId;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Shown when a failure carries no message of its own.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong while generating the image.";

/// Prefix of saved selfie file names.
pub const DOWNLOAD_FILE_PREFIX: &str = "zootopia-selfie";

/// File name for a download made at `unix_millis`.
pub fn download_file_name(unix_millis: i64) -> String {
    format!("{DOWNLOAD_FILE_PREFIX}-{unix_millis}.png")
}

/// A request that has been admitted by the controller but not yet run.
#[derive(Debug)]
pub struct PendingGeneration {
    epoch: u64,
    request: GenerationRequest,
}

impl PendingGeneration {
    /// Epoch this request belongs to.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The request to send.
    pub fn request(&self) -> &GenerationRequest {
        &self.request
    }

    /// Performs the request.
    pub async fn run(self, provider: &dyn ImageProvider) -> GenerationOutcome {
        let result = provider.generate(&self.request).await;
        GenerationOutcome {
            epoch: self.epoch,
            result,
        }
    }
}

/// Result of a [`PendingGeneration`], tagged with its epoch.
#[derive(Debug)]
pub struct GenerationOutcome {
    epoch: u64,
    result: Result<EncodedImage>,
}

impl GenerationOutcome {
    /// Epoch of the request that produced this outcome.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Holds the application state and the provider used to generate selfies.
pub struct Controller {
    provider: Arc<dyn ImageProvider>,
    state: AppState,
    epoch: u64,
}

impl Controller {
    /// Creates a controller in the idle state.
    pub fn new(provider: Arc<dyn ImageProvider>) -> Self {
        Self {
            provider,
            state: AppState::default(),
            epoch: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Handle to the provider, for running a [`PendingGeneration`] elsewhere.
    pub fn provider(&self) -> Arc<dyn ImageProvider> {
        Arc::clone(&self.provider)
    }

    /// Replaces (or clears) the uploaded photo.
    ///
    /// Always clears the generated image and the error. A request still in
    /// flight keeps the controller busy until it returns, but its outcome is
    /// ignored.
    pub fn set_image(&mut self, image: Option<EncodedImage>) {
        tracing::debug!(present = image.is_some(), "set original image");
        if self.state.is_generating {
            tracing::debug!(epoch = self.epoch, "superseding in-flight request");
        }
        self.epoch += 1;
        self.state.original_image = image;
        self.state.generated_image = None;
        self.state.error = None;
    }

    /// Changes the selected scenario.
    pub fn select_scenario(&mut self, id: ScenarioId) {
        self.state.selected_scenario = id;
    }

    /// Admits a new request, or returns `None` without touching state when
    /// there is no photo or a request is already in flight.
    pub fn start_generation(&mut self) -> Option<PendingGeneration> {
        if self.state.is_generating {
            return None;
        }
        let image = self.state.original_image.clone()?;

        self.epoch += 1;
        self.state.is_generating = true;
        self.state.error = None;

        let scenario = self.state.selected_scenario.scenario();
        tracing::info!(scenario = %scenario.id, epoch = self.epoch, "starting generation");

        Some(PendingGeneration {
            epoch: self.epoch,
            request: GenerationRequest::new(image, scenario.prompt_modifier),
        })
    }

    /// Applies an outcome. Returns `false` if it belonged to a superseded request.
    ///
    /// A superseded outcome still ends the in-flight phase, since at most one
    /// request runs at a time, but leaves the images and the error alone.
    pub fn finish_generation(&mut self, outcome: GenerationOutcome) -> bool {
        if !self.state.is_generating {
            tracing::debug!(epoch = outcome.epoch, "ignoring outcome with nothing in flight");
            return false;
        }
        self.state.is_generating = false;

        if outcome.epoch != self.epoch {
            tracing::debug!(
                outcome_epoch = outcome.epoch,
                current_epoch = self.epoch,
                "discarding stale generation outcome"
            );
            return false;
        }

        match outcome.result {
            Ok(image) => {
                tracing::info!(epoch = outcome.epoch, "generation finished");
                self.state.generated_image = Some(image);
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!(epoch = outcome.epoch, error = %message, "generation failed");
                self.state.error = Some(if message.trim().is_empty() {
                    GENERIC_ERROR_MESSAGE.to_string()
                } else {
                    message
                });
            }
        }
        true
    }

    /// Runs one generation to completion. Returns whether a request was issued.
    pub async fn generate(&mut self) -> bool {
        let Some(pending) = self.start_generation() else {
            return false;
        };
        let provider = self.provider();
        let outcome = pending.run(&*provider).await;
        self.finish_generation(outcome);
        true
    }

    /// Writes the generated image into `dir` under a timestamped name.
    ///
    /// Returns `Ok(None)` and writes nothing when there is no result yet.
    pub fn download(&self, dir: impl AsRef<Path>) -> Result<Option<PathBuf>> {
        self.download_at(dir, chrono::Utc::now().timestamp_millis())
    }

    /// Like [`Controller::download`] with an explicit timestamp.
    pub fn download_at(&self, dir: impl AsRef<Path>, unix_millis: i64) -> Result<Option<PathBuf>> {
        if self.state.generated_image.is_none() {
            return Ok(None);
        }
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(download_file_name(unix_millis));
        self.save_generated(&path)?;
        Ok(Some(path))
    }

    /// Writes the generated image to an exact path. Returns `false` when
    /// there is nothing to save.
    pub fn save_generated(&self, path: impl AsRef<Path>) -> Result<bool> {
        let Some(image) = &self.state.generated_image else {
            return Ok(false);
        };
        let path = path.as_ref();
        std::fs::write(path, image.decode()?)?;
        tracing::info!(path = %path.display(), "saved selfie");
        Ok(true)
    }
}
