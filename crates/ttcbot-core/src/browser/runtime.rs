//! Async driver for browser sessions.
//!
//! Each open browser gets its own tokio task that owns the
//! [`BrowserSession`] exclusively. Control activations arrive over an mpsc
//! channel and are handled one at a time in FIFO order, so no locking is
//! needed on session fields. The same task arms the idle-expiry timer:
//! every accepted event pushes the deadline out, and once it fires the
//! session is sealed, the final render is emitted, and any event still
//! queued behind the timer is rejected instead of mutating dead state.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

use super::model::RenderedPage;
use super::session::{Activation, BrowserAction, BrowserSession};
use crate::error::{BotError, Result};

/// Default idle window before a browser disables itself.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

const EVENT_QUEUE_DEPTH: usize = 16;

/// The rendered message a browser session is bound to.
///
/// `edit` replaces the message content in place; `ephemeral` sends a reply
/// visible only to the triggering user, independent of the shared message.
#[async_trait]
pub trait MessageSurface: Send + Sync {
    async fn edit(&self, page: &RenderedPage) -> Result<()>;
    async fn ephemeral(&self, text: &str) -> Result<()>;
}

/// Secondary data source queried when a row is selected.
#[async_trait]
pub trait DetailSource: Send + Sync {
    /// Fetches and formats the detail view for the selected record id.
    async fn fetch_detail(&self, row_id: &str) -> Result<String>;
}

/// Handle for delivering control activations to a running browser task.
///
/// Cheap to clone; all clones feed the same FIFO queue. Once the session
/// expires the task is gone and `activate` fails with `SessionExpired`.
#[derive(Clone)]
pub struct BrowserHandle {
    id: Uuid,
    tx: mpsc::Sender<BrowserAction>,
}

impl BrowserHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Queues one control activation for the session.
    pub async fn activate(&self, action: BrowserAction) -> Result<()> {
        self.tx
            .send(action)
            .await
            .map_err(|_| BotError::SessionExpired)
    }

    /// Whether the driving task has already shut down.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Spawns the driving task for an opened session.
///
/// Emits the initial render through `surface` before accepting events, so
/// the caller only needs [`BrowserSession::open`] plus this.
pub fn spawn_browser(
    session: BrowserSession,
    surface: Arc<dyn MessageSurface>,
    detail: Arc<dyn DetailSource>,
    idle_timeout: Duration,
) -> BrowserHandle {
    let id = Uuid::new_v4();
    let (tx, rx) = mpsc::channel(EVENT_QUEUE_DEPTH);

    tokio::spawn(run_browser(id, session, rx, surface, detail, idle_timeout));

    BrowserHandle { id, tx }
}

async fn run_browser(
    id: Uuid,
    mut session: BrowserSession,
    mut rx: mpsc::Receiver<BrowserAction>,
    surface: Arc<dyn MessageSurface>,
    detail: Arc<dyn DetailSource>,
    idle_timeout: Duration,
) {
    if let Err(err) = surface.edit(&session.render()).await {
        warn!(browser = %id, error = %err, "failed to emit initial browser render");
        return;
    }

    let mut deadline = Instant::now() + idle_timeout;

    loop {
        tokio::select! {
            maybe_action = rx.recv() => {
                let Some(action) = maybe_action else {
                    // Every handle dropped; nothing can activate us again.
                    debug!(browser = %id, "browser handle dropped, shutting down");
                    return;
                };
                deadline = Instant::now() + idle_timeout;
                handle_action(&mut session, action, &surface, &detail).await;
            }
            _ = tokio::time::sleep_until(deadline) => {
                break;
            }
        }
    }

    debug!(browser = %id, "browser idle timeout reached");
    if let Some(last) = session.expire()
        && let Err(err) = surface.edit(&last).await
    {
        warn!(browser = %id, error = %err, "failed to emit final browser render");
    }

    // The control framework may have queued events behind the timer;
    // reject them instead of silently dropping.
    while rx.try_recv().is_ok() {
        notify(&surface, &BotError::SessionExpired.user_message()).await;
    }
}

async fn handle_action(
    session: &mut BrowserSession,
    action: BrowserAction,
    surface: &Arc<dyn MessageSurface>,
    detail: &Arc<dyn DetailSource>,
) {
    match session.apply(action) {
        Activation::Updated(page) => {
            if let Err(err) = surface.edit(&page).await {
                // The last successful render stays valid and interactive.
                warn!(error = %err, "failed to edit browser message");
            }
        }
        Activation::Unchanged => {}
        Activation::NoMatches { query } => {
            notify(surface, &format!("no results found for '{query}'")).await;
        }
        Activation::Detail { record } => {
            match detail.fetch_detail(&record.id).await {
                Ok(text) => notify(surface, &text).await,
                Err(err) => {
                    debug!(row = %record.id, error = %err, "detail fetch failed");
                    notify(surface, &err.user_message()).await;
                }
            }
        }
        Activation::UnknownRow { row_id } => {
            notify(surface, &format!("row '{row_id}' is not in this list")).await;
        }
        Activation::Expired => {
            notify(surface, &BotError::SessionExpired.user_message()).await;
        }
    }
}

async fn notify(surface: &Arc<dyn MessageSurface>, text: &str) {
    if let Err(err) = surface.ephemeral(text).await {
        warn!(error = %err, "failed to send ephemeral reply");
    }
}
