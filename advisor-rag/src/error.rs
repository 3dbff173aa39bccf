//! Error types for the `advisor-rag` crate.

use thiserror::Error;

/// Errors that can occur while configuring the retrieval core.
///
/// Query answering itself never returns this type: [`QaPipeline::ask`]
/// folds every failure into a well-formed response. These errors surface
/// from the configuration and pipeline builders.
///
/// [`QaPipeline::ask`]: crate::pipeline::QaPipeline::ask
#[derive(Debug, Error)]
pub enum AdvisorError {
    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// A convenience result type for advisor operations.
pub type Result<T> = std::result::Result<T, AdvisorError>;
