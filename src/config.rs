//! Runtime configuration, resolved once at startup.

use crate::image::providers::{GeminiModel, DEFAULT_BASE_URL};
use std::fmt;
use std::path::PathBuf;

/// Environment variables consulted for the API key, in order.
pub const API_KEY_ENV_VARS: &[&str] = &["API_KEY", "GOOGLE_API_KEY", "GEMINI_API_KEY"];

/// Environment variable overriding the output directory for saved selfies.
pub const OUTPUT_DIR_ENV_VAR: &str = "ZOOTOPIA_SELFIE_OUTPUT_DIR";

/// Settings handed to the provider builder and the front ends.
#[derive(Clone)]
pub struct Config {
    /// Gemini API key.
    pub api_key: Option<String>,
    /// Image model to call.
    pub model: GeminiModel,
    /// API endpoint root.
    pub base_url: String,
    /// Directory downloads are written to.
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: GeminiModel::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Reads the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_key = API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .find(|value| !value.trim().is_empty());

        let mut config = Self {
            api_key,
            ..Self::default()
        };
        if let Some(dir) = lookup(OUTPUT_DIR_ENV_VAR).filter(|d| !d.is_empty()) {
            config.output_dir = PathBuf::from(dir);
        }
        config
    }

    /// Overrides the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Overrides the model.
    pub fn with_model(mut self, model: GeminiModel) -> Self {
        self.model = model;
        self
    }

    /// Overrides the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("output_dir", &self.output_dir)
            .finish()
    }
}
