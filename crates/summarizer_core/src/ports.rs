//! crates/summarizer_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the summarizer's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of a specific model provider.

use async_trait::async_trait;

//=========================================================================================
// Port Error and Result Types
//=========================================================================================

/// Errors raised by a remote text-generation provider.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// The credential is missing or was rejected by the provider.
    #[error("Authentication with the model provider failed: {0}")]
    Authentication(String),
    /// Non-success response, transport failure or timeout.
    #[error("The model provider request failed: {0}")]
    Upstream(String),
    #[error("The model provider returned no generated content")]
    EmptyResponse,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait SummarizationService: Send + Sync {
    /// Sends a rendered prompt to the model and returns the generated text unmodified.
    ///
    /// Exactly one attempt is made per call.
    async fn summarize(&self, prompt: &str) -> PortResult<String>;
}
