// SPDX-License-Identifier: MIT

//! OpenAI-compatible chat completion client.

use super::{ChatOracle, OracleError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::env;

/// Chat oracle over an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiChat {
    client: Client,
    api_key: String,
    model_name: String,
    base_url: String,
}

impl OpenAiChat {
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

/// Typed `/chat/completions` response body, shared with the vision client.
#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    error: Option<ApiError>,
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ChatResponse {
    /// The first choice's message content, or the service-reported error.
    pub(crate) fn into_content(self) -> Result<String, OracleError> {
        if let Some(error) = self.error {
            return Err(OracleError::Api(error.message));
        }
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| OracleError::Api("no message content in response".to_string()))
    }
}

#[async_trait]
impl ChatOracle for OpenAiChat {
    async fn complete(&self, prompt: &str) -> Result<String, OracleError> {
        let body = json!({
            "model": self.model_name,
            "messages": [
                {"role": "user", "content": prompt}
            ],
            "temperature": 0.0,
        });

        log::debug!("chat completion request to model '{}'", self.model_name);

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
    use serde_json::json;

    fn parse(value: serde_json::Value) -> ChatResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_response_yields_first_choice_content() {
        let response = parse(json!({
            "choices": [
                {"message": {"role": "assistant", "content": "refundable"}}
            ]
        }));
        assert_eq!(response.into_content().unwrap(), "refundable");
    }

    #[test]
    fn test_response_reports_api_error() {
        let response = parse(json!({
            "error": {"message": "invalid api key", "type": "auth"}
        }));
        let err = response.into_content().unwrap_err();
        assert!(err.to_string().contains("invalid api key"));
    }

    #[test]
    fn test_response_rejects_empty_choices() {
        let response = parse(json!({"choices": []}));
        assert!(response.into_content().is_err());
    }

    #[test]
    fn test_response_rejects_missing_content() {
        let response = parse(json!({
            "choices": [{"message": {"role": "assistant"}}]
        }));
        assert!(response.into_content().is_err());
    }
}
