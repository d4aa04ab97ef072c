//! Paginated interactive browser.
//!
//! The one genuinely stateful piece of the bot: a result-set browser bound
//! to a single rendered message, with page controls, live search over the
//! unfiltered base set, a secondary detail fetch on row selection, and a
//! one-shot idle expiry that disables its own controls.
//!
//! # Module Structure
//!
//! - `model`: result set, derived pages, control flags, rendered page
//! - `session`: the pure state machine (`BrowserSession`, `BrowserAction`)
//! - `runtime`: per-session tokio task, FIFO event delivery, idle timer

mod model;
mod runtime;
mod session;

pub use model::{ControlFlags, DisplayRecord, PAGE_SIZE, RenderedPage, ResultSet};
pub use runtime::{
    BrowserHandle, DEFAULT_IDLE_TIMEOUT, DetailSource, MessageSurface, spawn_browser,
};
pub use session::{Activation, BrowserAction, BrowserSession};
