//! Advisor client abstraction.
//!
//! Transport is not this crate's concern: callers bring their own client
//! (an HTTP integration, a local model, a test stub) behind [`LlmClient`].

use crate::error::AdvisorError;

/// A text-completion client used by the advisory plan path.
pub trait LlmClient {
    /// Complete a prompt and return the raw response text.
    fn complete(&self, prompt: &str) -> Result<String, AdvisorError>;
}

/// Settings passed through to whatever client implementation is wired in.
#[derive(Debug, Clone, Default)]
pub struct LlmConfig {
    /// Model identifier, client-specific.
    pub model: Option<String>,
}
