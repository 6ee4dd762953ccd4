// SPDX-License-Identifier: MIT

//! Delegated oracle clients.
//!
//! Oracles are opaque external collaborators consulted by steps and
//! routers: a chat model for classification/conversation and a vision
//! model for image checks. The workflow core only ever sees these traits;
//! callers decide how to degrade when an oracle fails.

pub mod openai;
pub mod vision;

pub use openai::OpenAiChat;
pub use vision::OpenAiVision;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from oracle calls. Steps and routers catch these and degrade to
/// safe defaults; they never reach the executor.
#[derive(Debug, Error)]
pub enum OracleError {
    /// API-level failure reported by the service.
    #[error("oracle API error: {0}")]
    Api(String),

    /// Configuration errors (missing API key, bad endpoint).
    #[error("oracle configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Text-completion oracle used for classification, conversation, and
/// intent routing.
#[async_trait]
pub trait ChatOracle: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, OracleError>;
}

/// Vision oracle used to answer a question about an image on disk.
#[async_trait]
pub trait VisionOracle: Send + Sync {
    async fn ask_about_image(&self, image_path: &str, question: &str)
        -> Result<String, OracleError>;
}
