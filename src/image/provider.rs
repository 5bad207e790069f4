//! Image provider trait and the request it consumes.

use crate::error::Result;
use crate::image::types::EncodedImage;
use crate::prompt::compose_instruction;
use async_trait::async_trait;

/// One selfie edit: the uploaded photo plus the scenario's style fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// The user's photo.
    pub image: EncodedImage,
    /// Scenario prompt fragment, used verbatim as the style directive.
    pub style: String,
}

impl GenerationRequest {
    /// Creates a request for the given photo and style fragment.
    pub fn new(image: EncodedImage, style: impl Into<String>) -> Self {
        Self {
            image,
            style: style.into(),
        }
    }

    /// Full instruction text sent with the image.
    pub fn instruction(&self) -> String {
        compose_instruction(&self.style)
    }
}

/// A service that turns a photo into a group selfie.
///
/// Implementations perform exactly one round trip per call and never retry.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Performs the edit and returns the result as a PNG data URL.
    async fn generate(&self, request: &GenerationRequest) -> Result<EncodedImage>;

    /// Model identifier used upstream, for display.
    fn model(&self) -> &str;
}
