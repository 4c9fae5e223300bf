// Refresh cycle.
// Runs fetch -> save -> publish for the widget, one cycle at a time.

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, watch};

use crate::cache::SnapshotStore;
use crate::error::{FetchError, Result, TrendlyError};
use crate::feed::{Fetch, WidgetSnapshot};
use crate::render::{ViewModel, render};

/// What caused a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Startup,
    Tick,
    Manual,
}

impl Trigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::Startup => "startup",
            Trigger::Tick => "tick",
            Trigger::Manual => "manual",
        }
    }
}

/// Result of one refresh attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new snapshot with this many entries was stored.
    Updated(usize),
    /// The feed had no usable entries; the stored snapshot was left alone.
    NoEntries,
    /// The refresh failed with this message; the stored snapshot was left alone.
    Failed(String),
    /// Another refresh was already in flight.
    Skipped,
}

impl RefreshOutcome {
    /// Turn a failed refresh into an error, passing every other outcome through.
    pub fn into_result(self) -> Result<Self> {
        match self {
            RefreshOutcome::Failed(message) => Err(TrendlyError::RefreshFailed(message)),
            outcome => Ok(outcome),
        }
    }
}

/// Data the widget is drawn from. Published after every refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetState {
    pub snapshot: Option<WidgetSnapshot>,
    /// Message of the last failed refresh, cleared by the next successful one.
    pub last_error: Option<String>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl WidgetState {
    /// Render this state for a widget with `slots` rows.
    pub fn view(&self, slots: usize, dark_mode: bool) -> ViewModel {
        render(
            self.snapshot.as_ref(),
            self.last_error.as_deref(),
            slots,
            dark_mode,
        )
    }
}

/// Owns the fetcher and store and serializes refresh cycles between them.
pub struct Refresher<F, S> {
    fetcher: F,
    store: S,
    in_flight: Mutex<()>,
    state_tx: watch::Sender<WidgetState>,
}

impl<F: Fetch, S: SnapshotStore> Refresher<F, S> {
    /// Create a refresher, seeding its state from whatever the store holds.
    pub fn new(fetcher: F, store: S) -> Self {
        let initial = match store.load() {
            Ok(snapshot) => WidgetState {
                snapshot,
                ..WidgetState::default()
            },
            Err(e) => {
                tracing::warn!(
                    event = "store.load_failed",
                    error = %e,
                    "Failed to load stored widget snapshot"
                );
                WidgetState {
                    last_error: Some(e.to_string()),
                    ..WidgetState::default()
                }
            }
        };
        let (state_tx, _) = watch::channel(initial);

        Self {
            fetcher,
            store,
            in_flight: Mutex::new(()),
            state_tx,
        }
    }

    /// Receive a notification whenever the widget should be redrawn.
    pub fn subscribe(&self) -> watch::Receiver<WidgetState> {
        self.state_tx.subscribe()
    }

    /// Current widget state.
    pub fn state(&self) -> WidgetState {
        self.state_tx.borrow().clone()
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run one fetch -> save -> publish cycle.
    ///
    /// Returns [`RefreshOutcome::Skipped`] without fetching if another cycle is running.
    pub async fn refresh(&self, trigger: Trigger) -> RefreshOutcome {
        let Ok(_guard) = self.in_flight.try_lock() else {
            tracing::info!(
                event = "refresh.skipped",
                trigger = trigger.as_str(),
                "Refresh already in flight"
            );
            return RefreshOutcome::Skipped;
        };

        tracing::info!(
            event = "refresh.started",
            trigger = trigger.as_str(),
            "Refreshing trending keywords"
        );

        match self.fetcher.fetch().await {
            Ok(snapshot) if snapshot.is_empty() => {
                let err = FetchError::EmptyResult;
                tracing::warn!(event = "refresh.empty", error = %err, "Nothing to store");
                self.state_tx.send_modify(|state| {
                    state.last_error = None;
                    state.refreshed_at = Some(Utc::now());
                });
                RefreshOutcome::NoEntries
            }
            Ok(mut snapshot) => match self.store.save(&snapshot) {
                Ok(at) => {
                    snapshot.last_updated = Some(at);
                    let count = snapshot.len();
                    tracing::info!(
                        event = "refresh.saved",
                        entries = count,
                        "Stored new keyword snapshot"
                    );
                    self.state_tx.send_modify(|state| {
                        state.snapshot = Some(snapshot);
                        state.last_error = None;
                        state.refreshed_at = Some(at);
                    });
                    RefreshOutcome::Updated(count)
                }
                Err(e) => self.fail(e.to_string()),
            },
            Err(e) => self.fail(e.to_string()),
        }
    }

    fn fail(&self, message: String) -> RefreshOutcome {
        tracing::error!(event = "refresh.failed", error = %message, "Refresh failed");
        self.state_tx.send_modify(|state| {
            state.last_error = Some(message.clone());
            state.refreshed_at = Some(Utc::now());
        });
        RefreshOutcome::Failed(message)
    }
}
