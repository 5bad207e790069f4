#![warn(missing_docs)]
//! Zootopia Selfie - drop yourself into a group selfie with Judy and Nick.
//!
//! Upload a photo, pick a scenario, and a Gemini image model edits the photo
//! into a themed group selfie.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use zootopia_selfie::{Config, Controller, EncodedImage, GeminiProviderBuilder, ScenarioId};
//!
//! #[tokio::main]
//! async fn main() -> zootopia_selfie::Result<()> {
//!     let config = Config::from_env();
//!     let provider = GeminiProviderBuilder::from_config(&config).build()?;
//!
//!     let mut controller = Controller::new(Arc::new(provider));
//!     controller.set_image(Some(EncodedImage::from_file("me.jpg")?));
//!     controller.select_scenario(ScenarioId::Christmas);
//!     controller.generate().await;
//!
//!     if let Some(path) = controller.download(&config.output_dir)? {
//!         println!("saved {}", path.display());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `cli` (default): the `zootopia-selfie` command-line tool
//! - `gui`: the desktop window (`zootopia-selfie gui`)

pub mod app;
mod config;
mod error;
pub mod image;
pub mod prompt;
pub mod scenario;

#[cfg(feature = "gui")]
pub mod ui;

pub use app::{AppState, Controller, Phase, ResultView};
pub use config::{Config, API_KEY_ENV_VARS, OUTPUT_DIR_ENV_VAR};
pub use error::{Result, SelfieError, NO_IMAGE_MESSAGE};
pub use crate::image::providers::{GeminiModel, GeminiProvider, GeminiProviderBuilder};
pub use crate::image::{EncodedImage, GenerationRequest, ImageFormat, ImageProvider};
pub use scenario::{Scenario, ScenarioId, SCENARIOS};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::app::{AppState, Controller};
    pub use crate::error::{Result, SelfieError};
    pub use crate::image::providers::GeminiProvider;
    pub use crate::image::{EncodedImage, ImageProvider};
    pub use crate::scenario::{Scenario, ScenarioId};
}
