//! Core domain for ttcbot.
//!
//! Hosts the shared error type, configuration and secret models, the
//! command registry, uptime tracking, and the paginated interactive
//! browser that backs the route/stop listing commands.

pub mod browser;
pub mod command;
pub mod config;
pub mod error;
pub mod secret;
pub mod uptime;

// Re-export common error type
pub use error::{BotError, Result};
