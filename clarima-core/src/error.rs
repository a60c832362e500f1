//! Unified error handling
//!
//! Structured error types with context, recovery hints, and proper chaining

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

pub type ClarimaResult<T> = Result<T, ClarimaError>;

/// Error context carried by every domain error for debugging and recovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
    /// Component where the error originated
    pub component: String,
    /// Operation being performed when the error occurred
    pub operation: Option<String>,
    /// Recovery suggestions
    pub recovery_suggestions: Vec<String>,
}

impl ErrorContext {
    pub fn new(component: &str) -> Self {
        Self {
            error_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            component: component.to_string(),
            operation: None,
            recovery_suggestions: Vec::new(),
        }
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.recovery_suggestions.push(suggestion.to_string());
        self
    }
}

/// Main error type for the clarima system
#[derive(Error, Debug)]
pub enum ClarimaError {
    #[error("Search error: {message}")]
    Search {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Discovery error: {message}")]
    Discovery {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("LLM error: {message}")]
    Llm {
        message: String,
        provider: Option<String>,
        model: Option<String>,
        context: ErrorContext,
    },

    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
        context: ErrorContext,
    },

    #[error("Resource not found: {resource}")]
    NotFound {
        resource: String,
        context: ErrorContext,
    },

    #[error("Operation timeout: {operation}")]
    Timeout {
        operation: String,
        duration_ms: u64,
        context: ErrorContext,
    },

    #[error("Rate limit exceeded: {message}")]
    RateLimit {
        message: String,
        retry_after_ms: Option<u64>,
        context: ErrorContext,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },
}

impl ClarimaError {
    /// Get the error context
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            ClarimaError::Search { context, .. } => Some(context),
            ClarimaError::Discovery { context, .. } => Some(context),
            ClarimaError::Llm { context, .. } => Some(context),
            ClarimaError::Storage { context, .. } => Some(context),
            ClarimaError::Config { context, .. } => Some(context),
            ClarimaError::Network { context, .. } => Some(context),
            ClarimaError::Validation { context, .. } => Some(context),
            ClarimaError::NotFound { context, .. } => Some(context),
            ClarimaError::Timeout { context, .. } => Some(context),
            ClarimaError::RateLimit { context, .. } => Some(context),
            ClarimaError::Internal { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Check if the error is recoverable by retrying the unit of work
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ClarimaError::Search { .. }
                | ClarimaError::Network { .. }
                | ClarimaError::Timeout { .. }
                | ClarimaError::RateLimit { .. }
        )
    }

    /// Suggested retry delay in milliseconds for recoverable errors
    pub fn retry_delay_ms(&self) -> Option<u64> {
        match self {
            ClarimaError::Search { .. } | ClarimaError::Network { .. } => Some(1000),
            ClarimaError::Timeout { .. } => Some(2000),
            ClarimaError::RateLimit { retry_after_ms, .. } => *retry_after_ms,
            _ => None,
        }
    }

    /// Log the error with an appropriate level
    pub fn log(&self) {
        match self {
            ClarimaError::Config { .. } | ClarimaError::Validation { .. } => {
                error!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Configuration or validation error"
                );
            }
            ClarimaError::Search { .. }
            | ClarimaError::Network { .. }
            | ClarimaError::Timeout { .. }
            | ClarimaError::RateLimit { .. } => {
                warn!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Transient error (may be recoverable)"
                );
            }
            _ => {
                error!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Error occurred"
                );
            }
        }
    }
}

/// Convenience macros for creating errors with context
#[macro_export]
macro_rules! config_error {
    ($msg:expr, $component:expr) => {
        $crate::ClarimaError::Config {
            message: $msg.to_string(),
            source: None,
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Check your configuration file")
                .with_suggestion("Run 'clarima config --init' to create a default config"),
        }
    };
}

#[macro_export]
macro_rules! validation_error {
    ($msg:expr, $field:expr, $component:expr) => {
        $crate::ClarimaError::Validation {
            message: $msg.to_string(),
            field: Some($field.to_string()),
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Check the field value and format"),
        }
    };
}

#[macro_export]
macro_rules! not_found_error {
    ($resource:expr, $component:expr) => {
        $crate::ClarimaError::NotFound {
            resource: $resource.to_string(),
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Verify the resource identifier")
                .with_suggestion("Check if the resource exists and is accessible"),
        }
    };
}
