//! Clarima Core - shared data structures, configuration, and error handling
//!
//! This crate defines the abstractions used by every other clarima crate:
//! the unified error type, logging setup, configuration model, and the
//! company/job types shared between discovery and assessment.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;

// Re-export commonly used external types
pub use async_trait::async_trait;
pub use tokio;
pub use tracing;
