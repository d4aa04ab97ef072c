//! Completion agent seam.

use async_trait::async_trait;
use ttcbot_core::Result;

/// A text-completion backend.
///
/// The chat layer only ever talks to this trait, so tests swap the real
/// HTTP client for a canned implementation.
#[async_trait]
pub trait CompletionAgent: Send + Sync {
    /// Generates a completion for `prompt`.
    ///
    /// Fails with a transport-level error on non-2xx responses; the caller
    /// converts that into a one-line user message.
    async fn complete(&self, prompt: &str, temperature: f32, max_tokens: u32) -> Result<String>;
}
