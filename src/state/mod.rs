//! Shared application state wiring the stores, the SSE hub, and configuration.

mod sse;

use std::sync::Arc;

use tokio::sync::{Mutex, watch};

use crate::{
    config::AppConfig,
    dao::{pending::PendingChangeSource, score_store::ScoreStore},
};

pub use self::sse::SseHub;

/// Cheaply clonable handle to the central application state.
pub type SharedState = Arc<AppState>;

/// Central application state owning the authoritative scores, the pending
/// inbox, and the broadcast hub.
pub struct AppState {
    config: AppConfig,
    scores: Mutex<ScoreStore>,
    pending: PendingChangeSource,
    sse: SseHub,
    degraded: watch::Sender<bool>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The durable score record is loaded here, once, failing soft to zero
    /// totals for the whole roster.
    pub fn new(config: AppConfig) -> SharedState {
        let scores = ScoreStore::load(config.score_file().to_path_buf(), config.teams());
        let pending = PendingChangeSource::new(config.pending_file().to_path_buf());
        let (degraded_tx, _rx) = watch::channel(false);

        Arc::new(Self {
            config,
            scores: Mutex::new(scores),
            pending,
            sse: SseHub::new(16),
            degraded: degraded_tx,
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Mutex serializing every mutation of the authoritative scores.
    ///
    /// Both mutation paths, manual and reconciled, take this lock for the
    /// whole read-modify-write-persist sequence.
    pub fn scores(&self) -> &Mutex<ScoreStore> {
        &self.scores
    }

    /// Inbox of externally requested deltas, consumed by the reconciler.
    pub fn pending(&self) -> &PendingChangeSource {
        &self.pending
    }

    /// Broadcast hub used for the scoreboard SSE stream.
    pub fn sse(&self) -> &SseHub {
        &self.sse
    }

    /// Whether the in-memory scores currently diverge from the durable record.
    pub fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Record the outcome of the latest persist attempt.
    pub fn set_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|slot| {
            let changed = *slot != value;
            *slot = value;
            changed
        });
    }

    /// Subscribe to divergence flag updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }
}
