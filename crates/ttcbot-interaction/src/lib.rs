//! Chat assistant layer: the completion agent abstraction, the Gemini REST
//! client, and per-user conversation sessions.

pub mod agent;
pub mod chat;
pub mod gemini;

pub use agent::CompletionAgent;
pub use chat::{ChatParams, ChatSession, ChatSessions, UserId, AVAILABLE_MODELS};
pub use gemini::GeminiClient;
