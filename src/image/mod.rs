//! Image types, the provider trait and its Gemini implementation.

mod provider;
pub mod providers;
mod types;

pub use provider::{GenerationRequest, ImageProvider};
pub use types::{EncodedImage, ImageFormat, UPLOAD_EXTENSIONS};
