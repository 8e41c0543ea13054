pub mod ollama;

use thiserror::Error;

pub use ollama::{OllamaModel, OllamaSettings};

/// Errors raised by a model backend.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The model server could not be reached at startup
    #[error("model server unavailable at {url}: {reason}")]
    Unavailable { url: String, reason: String },

    /// The server is up but does not have the requested model installed
    #[error("model '{name}' not found on {url} (installed: {installed})")]
    MissingModel {
        name: String,
        url: String,
        installed: String,
    },

    #[error("model request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model server returned HTTP {code}: {body}")]
    Status { code: u16, body: String },
}

/// A text-generation capability.
///
/// Each call is independent: no conversation state is carried between
/// prompts. Implementations own their timeout policy.
pub trait Model {
    /// Name of the loaded model, used in reports and logs
    fn name(&self) -> &str;

    /// Generate a completion for `prompt`, producing at most `max_tokens`
    /// tokens. `system_prompt` sets the reviewer persona when the backend
    /// supports one.
    fn generate(
        &self,
        prompt: &str,
        max_tokens: usize,
        system_prompt: Option<&str>,
    ) -> Result<String, ModelError>;
}
