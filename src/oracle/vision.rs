// SPDX-License-Identifier: MIT

//! OpenAI-compatible vision client.
//!
//! Images are read from disk and inlined base64 as a data URL, which keeps
//! the oracle usable against any OpenAI-compatible multimodal endpoint.

use super::openai::ChatResponse;
use super::{OracleError, VisionOracle};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::Client;
use serde_json::json;
use std::env;
use std::path::Path;

/// Vision oracle over an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiVision {
    client: Client,
    api_key: String,
    model_name: String,
    base_url: String,
}

impl OpenAiVision {
    /// Requires `OPENAI_API_KEY` to be set. Optionally uses
    /// `OPENAI_BASE_URL` for custom endpoints.
    pub fn new(model_name: String) -> Result<Self, OracleError> {
        let api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| OracleError::Config("OPENAI_API_KEY must be set".to_string()))?;
        let base_url =
            env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".to_string());

        Ok(Self {
            client: Client::new(),
            api_key,
            model_name,
            base_url,
        })
    }
}

/// Guess the image MIME type from the file extension, defaulting to JPEG.
fn mime_for_path(path: &str) -> &'static str {
    match Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

/// Build the `data:` URL carrying the image bytes.
fn data_url(path: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_for_path(path), STANDARD.encode(bytes))
}

#[async_trait]
impl VisionOracle for OpenAiVision {
    async fn ask_about_image(
        &self,
        image_path: &str,
        question: &str,
    ) -> Result<String, OracleError> {
        let bytes = tokio::fs::read(image_path).await?;
        let url = data_url(image_path, &bytes);

        let body = json!({
            "model": self.model_name,
            "messages": [
                {
                    "role": "user",
                    "content": [
                        {"type": "text", "text": question},
                        {"type": "image_url", "image_url": {"url": url}}
                    ]
                }
            ],
            "temperature": 0.0,
        });

        log::debug!(
            "vision request to model '{}' for image '{}'",
            self.model_name,
            image_path
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?
            .json::<ChatResponse>()
            .await?;

        response.into_content()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(mime_for_path("bill.png"), "image/png");
        assert_eq!(mime_for_path("proof.JPG"), "image/jpeg");
        assert_eq!(mime_for_path("scan.webp"), "image/webp");
        assert_eq!(mime_for_path("no_extension"), "image/jpeg");
    }

    #[test]
    fn test_data_url_encodes_bytes() {
        let url = data_url("x.png", b"abc");
        assert_eq!(url, "data:image/png;base64,YWJj");
    }
}
