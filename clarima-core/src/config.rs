//! Configuration management

use crate::error::{ClarimaError, ClarimaResult};
use crate::types::{ClarimaConfig, DiscoveryConfig, LlmConfig, ScoringConfig, SearchConfig};

use std::path::Path;

impl Default for ClarimaConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig {
                provider: "deepseek".to_string(),
                model: "deepseek-chat".to_string(),
                api_key: None,
                base_url: Some("https://api.deepseek.com".to_string()),
                // Maximum determinism for repeatable scoring
                temperature: 0.0,
                max_tokens: 8000,
            },
            search: SearchConfig {
                api_key: None,
                endpoint: "https://api.search.brave.com/res/v1/web/search".to_string(),
                timeout_secs: 10,
            },
            discovery: DiscoveryConfig {
                max_iterations: 10,
                max_documents: 150,
                results_per_query: 20,
                query_delay_ms: 100,
                extract_content: false,
                extract_top_n: 5,
            },
            scoring: ScoringConfig {
                corpus_char_budget: 60_000,
                methodology_char_budget: 40_000,
                max_concurrent_batches: 2,
                enable_retry_pass: true,
            },
            logging: crate::LoggingConfig::default(),
        }
    }
}

impl ClarimaConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> ClarimaResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ClarimaError::Config {
            message: format!("Failed to read config file: {}", e),
            source: Some(Box::new(e)),
            context: crate::ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        let config: ClarimaConfig = toml::from_str(&content).map_err(|e| ClarimaError::Config {
            message: format!("Failed to parse config: {}", e),
            source: Some(Box::new(e)),
            context: crate::ErrorContext::new("config")
                .with_operation("parse_toml")
                .with_suggestion("Check TOML syntax in config file"),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> ClarimaResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ClarimaError::Config {
            message: format!("Failed to serialize config: {}", e),
            source: Some(Box::new(e)),
            context: crate::ErrorContext::new("config").with_operation("serialize_toml"),
        })?;

        std::fs::write(path, content).map_err(|e| ClarimaError::Config {
            message: format!("Failed to write config file: {}", e),
            source: Some(Box::new(e)),
            context: crate::ErrorContext::new("config")
                .with_operation("write_file")
                .with_suggestion("Check if the directory exists and is writable"),
        })?;

        Ok(())
    }

    /// Validate configuration invariants
    pub fn validate(&self) -> ClarimaResult<()> {
        if self.llm.max_tokens == 0 {
            return Err(crate::validation_error!(
                "llm.max_tokens must be greater than 0",
                "llm.max_tokens",
                "config"
            ));
        }

        if self.discovery.max_iterations == 0 {
            return Err(crate::validation_error!(
                "discovery.max_iterations must be greater than 0",
                "discovery.max_iterations",
                "config"
            ));
        }

        if self.discovery.max_documents == 0 {
            return Err(crate::validation_error!(
                "discovery.max_documents must be greater than 0",
                "discovery.max_documents",
                "config"
            ));
        }

        if self.scoring.max_concurrent_batches == 0 {
            return Err(crate::validation_error!(
                "scoring.max_concurrent_batches must be greater than 0",
                "scoring.max_concurrent_batches",
                "config"
            ));
        }

        Ok(())
    }
}
