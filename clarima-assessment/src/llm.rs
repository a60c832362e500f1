//! LLM client seam for batch scoring
//!
//! The pipeline talks to a [`TextGenerator`] trait so scoring logic can be
//! tested against a scripted generator. The production implementation wraps
//! siumai and supports DeepSeek (OpenAI-compatible), OpenAI, and Anthropic.

use crate::types::{ScoringError, ScoringResult};
use clarima_core::LlmConfig;
use siumai::prelude::*;
use std::time::Instant;
use tracing::{debug, info};

/// Text generation seam used by the scoring pipeline
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Run one system + user exchange and return the raw response text
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> ScoringResult<String>;

    /// Identifier recorded against each scored measure, e.g. `deepseek-chat`
    fn model_identifier(&self) -> String;
}

/// Production generator backed by siumai
pub struct SiumaiGenerator {
    client: Box<dyn LlmClient>,
    model: String,
}

impl SiumaiGenerator {
    /// Build a client for the configured provider.
    ///
    /// DeepSeek is reached through the OpenAI-compatible surface with a
    /// custom base URL, which is why it shares the `openai` builder arm.
    pub async fn new(config: &LlmConfig) -> ScoringResult<Self> {
        let client = Self::create_client(config).await?;
        info!(
            "Initialized LLM client: provider={}, model={}",
            config.provider, config.model
        );
        Ok(Self {
            client,
            model: config.model.clone(),
        })
    }

    async fn create_client(config: &LlmConfig) -> ScoringResult<Box<dyn LlmClient>> {
        match config.provider.as_str() {
            "deepseek" | "openai" => {
                let api_key = config
                    .api_key
                    .clone()
                    .or_else(|| match config.provider.as_str() {
                        "deepseek" => std::env::var("DEEPSEEK_API_KEY").ok(),
                        _ => std::env::var("OPENAI_API_KEY").ok(),
                    })
                    .ok_or_else(|| {
                        ScoringError::Config(format!(
                            "{} API key not found",
                            config.provider
                        ))
                    })?;

                let mut builder = LlmBuilder::new()
                    .openai()
                    .api_key(&api_key)
                    .model(&config.model)
                    .temperature(config.temperature)
                    .max_tokens(config.max_tokens);

                if let Some(base_url) = &config.base_url {
                    builder = builder.base_url(base_url);
                }

                let client = builder.build().await.map_err(|e| {
                    ScoringError::Llm(format!("Failed to build {} client: {}", config.provider, e))
                })?;

                Ok(Box::new(client))
            }
            "anthropic" => {
                let api_key = config
                    .api_key
                    .clone()
                    .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
                    .ok_or_else(|| {
                        ScoringError::Config("Anthropic API key not found".to_string())
                    })?;

                let builder = LlmBuilder::new()
                    .anthropic()
                    .api_key(&api_key)
                    .model(&config.model)
                    .temperature(config.temperature)
                    .max_tokens(config.max_tokens);

                let client = builder.build().await.map_err(|e| {
                    ScoringError::Llm(format!("Failed to build Anthropic client: {}", e))
                })?;

                Ok(Box::new(client))
            }
            provider => Err(ScoringError::Config(format!(
                "Unsupported LLM provider: {}",
                provider
            ))),
        }
    }
}

#[async_trait::async_trait]
impl TextGenerator for SiumaiGenerator {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> ScoringResult<String> {
        let start_time = Instant::now();
        let messages = vec![system!(system_prompt), user!(user_prompt)];

        let response = self
            .client
            .chat(messages)
            .await
            .map_err(|e| ScoringError::Llm(format!("LLM generation failed: {}", e)))?;

        let generation_time = start_time.elapsed();

        if let Some(content) = response.content_text() {
            debug!(
                "Generated response in {:?} ({} chars)",
                generation_time,
                content.len()
            );
            Ok(content.to_string())
        } else {
            Err(ScoringError::Llm("LLM returned empty response".to_string()))
        }
    }

    fn model_identifier(&self) -> String {
        self.model.clone()
    }
}
