// SPDX-License-Identifier: MIT

//! Environment-driven configuration for the support workflow.

use std::env;

pub const DEFAULT_CLASSIFIER_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_AGENT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_VISION_MODEL: &str = "gpt-4o-mini";

/// System prompt for the conversational agent.
pub const AGENT_SYSTEM_PROMPT: &str = "\
You are a food delivery support agent. Follow these critical rules:
1. NEVER provide specific delivery times, ETAs, or dates unless you have access to that data.
2. When asked about order arrival or ETA, acknowledge you need to check the system.
3. DO NOT make up information about delivery times.
4. For complaints or specific order information, indicate you need to check the appropriate systems.
5. Your primary role is to route customer inquiries to the appropriate tools, not to provide specific order information directly.";

/// Model configuration, read from the environment with sensible defaults.
/// The API key itself is read by the oracle constructors.
#[derive(Debug, Clone)]
pub struct Config {
    pub classifier_model: String,
    pub agent_model: String,
    pub vision_model: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            classifier_model: env::var("CLASSIFIER_MODEL")
                .unwrap_or_else(|_| DEFAULT_CLASSIFIER_MODEL.to_string()),
            agent_model: env::var("AGENT_MODEL")
                .unwrap_or_else(|_| DEFAULT_AGENT_MODEL.to_string()),
            vision_model: env::var("VISION_MODEL")
                .unwrap_or_else(|_| DEFAULT_VISION_MODEL.to_string()),
        }
    }
}
