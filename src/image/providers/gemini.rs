//! Gemini (Google) image editing provider.

use crate::config::{Config, API_KEY_ENV_VARS};
use crate::error::{parse_retry_after, sanitize_error_message, Result, SelfieError};
use crate::image::provider::{GenerationRequest, ImageProvider};
use crate::image::types::{EncodedImage, ImageFormat};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Instant;

/// Public Gemini API root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini image model variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GeminiModel {
    /// Nano Banana - Gemini 2.5 Flash Image (fast, economical).
    #[default]
    NanoBanana,
    /// Nano Banana Pro - Gemini 3 Pro Image (highest quality).
    NanoBananaPro,
}

impl GeminiModel {
    /// Returns the API model identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NanoBanana => "gemini-2.5-flash-image",
            Self::NanoBananaPro => "nano-banana-pro-preview",
        }
    }
}

impl FromStr for GeminiModel {
    type Err = SelfieError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "gemini-2.5-flash-image" | "nano-banana" => Ok(Self::NanoBanana),
            "nano-banana-pro-preview" | "nano-banana-pro" => Ok(Self::NanoBananaPro),
            other => Err(SelfieError::InvalidRequest(format!(
                "unknown model '{other}'"
            ))),
        }
    }
}

/// Builder for GeminiProvider.
#[derive(Debug, Clone)]
pub struct GeminiProviderBuilder {
    api_key: Option<String>,
    model: GeminiModel,
    base_url: String,
}

impl Default for GeminiProviderBuilder {
    fn default() -> Self {
        Self {
            api_key: None,
            model: GeminiModel::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl GeminiProviderBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a resolved [`Config`].
    pub fn from_config(config: &Config) -> Self {
        Self {
            api_key: config.api_key.clone(),
            model: config.model,
            base_url: config.base_url.clone(),
        }
    }

    /// Sets the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the Gemini model variant.
    pub fn model(mut self, model: GeminiModel) -> Self {
        self.model = model;
        self
    }

    /// Points the provider at a different API root.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builds the provider. Fails when no API key was supplied.
    pub fn build(self) -> Result<GeminiProvider> {
        let api_key = self
            .api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                SelfieError::Auth(format!(
                    "no API key configured; pass --api-key or set one of {}",
                    API_KEY_ENV_VARS.join(", ")
                ))
            })?;

        Ok(GeminiProvider {
            client: reqwest::Client::new(),
            api_key,
            model: self.model,
            base_url: self.base_url.trim_end_matches('/').to_string(),
        })
    }
}

/// Gemini image editing provider.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: GeminiModel,
    base_url: String,
}

impl GeminiProvider {
    /// Creates a new `GeminiProviderBuilder`.
    pub fn builder() -> GeminiProviderBuilder {
        GeminiProviderBuilder::new()
    }

    async fn generate_impl(&self, request: &GenerationRequest) -> Result<EncodedImage> {
        let start = Instant::now();

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url,
            self.model.as_str(),
        );

        let body = GeminiRequest::from_generation_request(request);
        tracing::debug!(
            model = self.model.as_str(),
            media_type = request.image.media_type(),
            "sending generateContent request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let text = response.text().await.unwrap_or_default();
            return Err(parse_error(status.as_u16(), &text, &headers));
        }

        let gemini_response: GeminiResponse = response.json().await?;
        let image = gemini_response.into_image()?;

        tracing::debug!(
            duration_ms = start.elapsed().as_millis() as u64,
            payload_len = image.payload().len(),
            "selfie generated"
        );
        Ok(image)
    }
}

fn parse_error(status: u16, raw: &str, headers: &reqwest::header::HeaderMap) -> SelfieError {
    let text = sanitize_error_message(raw);
    match status {
        401 | 403 => SelfieError::Auth(text),
        404 => SelfieError::InvalidRequest(
            "Model not found. Verify the model name is correct.".into(),
        ),
        429 => SelfieError::RateLimited {
            retry_after: parse_retry_after(headers).map(std::time::Duration::from_secs),
        },
        _ => match GeminiErrorEnvelope::message_of(raw) {
            Some(message) => SelfieError::Service(sanitize_error_message(&message)),
            None => SelfieError::Api {
                status,
                message: text,
            },
        },
    }
}

#[async_trait]
impl ImageProvider for GeminiProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<EncodedImage> {
        let result = self.generate_impl(request).await;
        if let Err(ref e) = result {
            tracing::error!(error = %e, "Gemini API error");
        }
        result
    }

    fn model(&self) -> &str {
        self.model.as_str()
    }
}

// Request/Response types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiRequestPart>,
}

/// A part in a Gemini request - either inline image data or text.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiRequestPart {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

impl GeminiRequest {
    fn from_generation_request(req: &GenerationRequest) -> Self {
        let parts = vec![
            GeminiRequestPart::InlineData {
                inline_data: GeminiInlineData {
                    mime_type: req.image.media_type().to_string(),
                    data: req.image.payload().to_string(),
                },
            },
            GeminiRequestPart::Text {
                text: req.instruction(),
            },
        ];

        Self {
            contents: vec![GeminiContent { parts }],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContentResponse>,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPartResponse {
    #[serde(default)]
    inline_data: Option<InlineData>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    mime_type: Option<String>,
    #[serde(default)]
    data: String,
}

/// Google's `{"error": {"code", "message", "status"}}` error body.
#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    #[serde(default)]
    message: String,
}

impl GeminiErrorEnvelope {
    fn message_of(text: &str) -> Option<String> {
        let envelope: Self = serde_json::from_str(text).ok()?;
        let message = envelope.error.message.trim();
        (!message.is_empty()).then(|| message.to_string())
    }
}

impl GeminiResponse {
    /// First non-empty inline image of the first candidate, relabelled as PNG.
    fn into_image(self) -> Result<EncodedImage> {
        let parts = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts)
            .unwrap_or_default();

        for part in parts {
            match part.inline_data {
                Some(inline) if !inline.data.is_empty() => {
                    tracing::debug!(returned_mime = ?inline.mime_type, "found inline image part");
                    return Ok(EncodedImage::from_base64(ImageFormat::Png, &inline.data));
                }
                _ => {
                    if let Some(text) = part.text {
                        tracing::debug!(%text, "skipping text part");
                    }
                }
            }
        }

        Err(SelfieError::NoImageProduced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn jpeg_request() -> GenerationRequest {
        GenerationRequest::new(
            EncodedImage::from_data_url("data:image/jpeg;base64,/9j/AAAA"),
            "Background: snowy street.",
        )
    }

    #[test]
    fn test_gemini_model_as_str() {
        assert_eq!(GeminiModel::NanoBanana.as_str(), "gemini-2.5-flash-image");
        assert_eq!(
            GeminiModel::NanoBananaPro.as_str(),
            "nano-banana-pro-preview"
        );
    }

    #[test]
    fn test_gemini_model_default() {
        assert_eq!(GeminiModel::default(), GeminiModel::NanoBanana);
    }

    #[test]
    fn test_gemini_model_from_str() {
        assert_eq!(
            "gemini-2.5-flash-image".parse::<GeminiModel>().unwrap(),
            GeminiModel::NanoBanana
        );
        assert_eq!(
            "nano-banana-pro".parse::<GeminiModel>().unwrap(),
            GeminiModel::NanoBananaPro
        );
        assert!("dall-e-3".parse::<GeminiModel>().is_err());
    }

    #[test]
    fn test_builder_with_explicit_key() {
        let provider = GeminiProviderBuilder::new()
            .api_key("test-key")
            .model(GeminiModel::NanoBanana)
            .build();
        assert!(provider.is_ok());
    }

    #[test]
    fn test_builder_without_key_fails() {
        let result = GeminiProviderBuilder::new().build();
        assert!(matches!(result, Err(SelfieError::Auth(_))));

        let result = GeminiProviderBuilder::new().api_key("  ").build();
        match result {
            Err(SelfieError::Auth(message)) => {
                for var in API_KEY_ENV_VARS {
                    assert!(message.contains(var), "{message} should name {var}");
                }
            }
            other => panic!("unexpected result: {:?}", other.map(|p| p.model().to_string())),
        }
    }

    #[test]
    fn test_builder_from_config() {
        let config = Config::default()
            .with_api_key("k")
            .with_model(GeminiModel::NanoBananaPro);
        let provider = GeminiProviderBuilder::from_config(&config).build().unwrap();
        assert_eq!(provider.model(), "nano-banana-pro-preview");
        assert_eq!(provider.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_request_construction() {
        let gemini_req = GeminiRequest::from_generation_request(&jpeg_request());
        let json = serde_json::to_value(&gemini_req).unwrap();

        let parts = json["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[0]["inlineData"]["data"], "/9j/AAAA");
        let text = parts[1]["text"].as_str().unwrap();
        assert!(text.contains("Style: Background: snowy street."));
    }

    #[test]
    fn test_request_without_prefix_defaults_to_jpeg() {
        let req = GenerationRequest::new(EncodedImage::from_data_url("iVBORw0KGgo="), "x");
        let json = serde_json::to_value(GeminiRequest::from_generation_request(&req)).unwrap();
        let inline = &json["contents"][0]["parts"][0]["inlineData"];
        assert_eq!(inline["mimeType"], "image/jpeg");
        assert_eq!(inline["data"], "iVBORw0KGgo=");
    }

    #[test]
    fn test_response_image_is_relabelled_png() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "Here you go!"},
                        {"inlineData": {"mimeType": "image/jpeg", "data": "/9j/BBBB"}},
                        {"inlineData": {"mimeType": "image/png", "data": "iVBORw0KGgo="}}
                    ]
                },
                "finishReason": "STOP"
            }]
        }"#;
        let resp: GeminiResponse = serde_json::from_str(json).unwrap();
        let image = resp.into_image().unwrap();
        assert_eq!(image.as_str(), "data:image/png;base64,/9j/BBBB");
    }

    #[test]
    fn test_response_skips_empty_inline_data() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        {"inlineData": {"mimeType": "image/png", "data": ""}},
                        {"inlineData": {"data": "AAAA"}}
                    ]
                }
            }]
        }"#;
        let resp: GeminiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.into_image().unwrap().payload(), "AAAA");
    }

    #[test]
    fn test_response_text_only_is_no_image() {
        let json = r#"{
            "candidates": [{
                "content": {"parts": [{"text": "I can't do that."}]}
            }]
        }"#;
        let resp: GeminiResponse = serde_json::from_str(json).unwrap();
        let err = resp.into_image().unwrap_err();
        assert!(matches!(err, SelfieError::NoImageProduced));
        assert_eq!(err.to_string(), "No image was generated. Please try again.");
    }

    #[test]
    fn test_response_without_candidates_is_no_image() {
        let resp: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            resp.into_image(),
            Err(SelfieError::NoImageProduced)
        ));

        let json = r#"{"candidates": [{"finishReason": "IMAGE_SAFETY"}]}"#;
        let resp: GeminiResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(
            resp.into_image(),
            Err(SelfieError::NoImageProduced)
        ));
    }

    #[test]
    fn test_parse_error_classification() {
        let headers = reqwest::header::HeaderMap::new();
        assert!(matches!(
            parse_error(403, "denied", &headers),
            SelfieError::Auth(_)
        ));
        assert!(matches!(
            parse_error(404, "", &headers),
            SelfieError::InvalidRequest(_)
        ));
        assert!(matches!(
            parse_error(500, "boom", &headers),
            SelfieError::Api { status: 500, .. }
        ));
        assert!(matches!(
            parse_error(503, r#"{"error":{"message":"  "}}"#, &headers),
            SelfieError::Api { status: 503, .. }
        ));
        assert_eq!(
            parse_error(
                400,
                r#"{"error":{"code":400,"message":"Image too large","status":"INVALID_ARGUMENT"}}"#,
                &headers
            )
            .to_string(),
            "Image too large"
        );

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(reqwest::header::RETRY_AFTER, "7".parse().unwrap());
        match parse_error(429, "slow down", &headers) {
            SelfieError::RateLimited { retry_after } => {
                assert_eq!(retry_after, Some(std::time::Duration::from_secs(7)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    /// Serves a single canned HTTP response and hands back the raw request.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut chunk = [0u8; 8192];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&chunk[..n]);
                if request_complete(&received) {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&received).into_owned()
        });

        (format!("http://{addr}"), handle)
    }

    fn request_complete(buf: &[u8]) -> bool {
        let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
        let content_length = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        buf.len() >= header_end + 4 + content_length
    }

    #[tokio::test]
    async fn test_generate_round_trip() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"candidates":[{"content":{"parts":[{"inlineData":{"mimeType":"image/webp","data":"UklGRg=="}}]}}]}"#,
        )
        .await;

        let provider = GeminiProvider::builder()
            .api_key("test-key")
            .base_url(base_url)
            .build()
            .unwrap();

        let image = provider.generate(&jpeg_request()).await.unwrap();
        assert_eq!(image.as_str(), "data:image/png;base64,UklGRg==");

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /v1beta/models/gemini-2.5-flash-image:generateContent"));
        assert!(raw.to_lowercase().contains("x-goog-api-key: test-key"));
        assert!(raw.contains(r#""mimeType":"image/jpeg""#));
        assert!(raw.contains(r#""data":"/9j/AAAA""#));
    }

    #[tokio::test]
    async fn test_generate_surfaces_api_error() {
        let (base_url, server) = serve_once(
            "500 Internal Server Error",
            r#"{"error":{"message":"backend exploded"}}"#,
        )
        .await;

        let provider = GeminiProvider::builder()
            .api_key("test-key")
            .base_url(base_url)
            .build()
            .unwrap();

        let err = provider.generate(&jpeg_request()).await.unwrap_err();
        match err {
            SelfieError::Service(message) => assert_eq!(message, "backend exploded"),
            other => panic!("unexpected error: {other:?}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_generate_without_image_part() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"candidates":[{"content":{"parts":[{"text":"no"}]}}]}"#,
        )
        .await;

        let provider = GeminiProvider::builder()
            .api_key("test-key")
            .base_url(base_url)
            .build()
            .unwrap();

        let err = provider.generate(&jpeg_request()).await.unwrap_err();
        assert!(matches!(err, SelfieError::NoImageProduced));
        server.await.unwrap();
    }
}
