//! The single path through which the score record changes.

use tracing::warn;

use crate::{
    dto::score::ScoreboardResponse,
    error::ServiceError,
    services::sse_events,
    state::SharedState,
};

/// Apply a signed delta to a team's total and return the new total.
///
/// Every mutation, whether from an operator request or from the reconciler,
/// goes through here. The score-store lock is held across the whole
/// read-modify-write-persist sequence, so concurrent callers are applied one
/// at a time and each rewrite of the durable record completes before the next
/// mutation begins.
///
/// A persist failure keeps the in-memory total and is not surfaced to the
/// caller; the durable record catches up on the next successful rewrite.
pub async fn apply_delta(
    state: &SharedState,
    team: &str,
    delta: i32,
) -> Result<i32, ServiceError> {
    let mut store = state.scores().lock().await;

    let Some((total, persisted)) = store.apply_delta(team, delta) else {
        return Err(ServiceError::InvalidTeam(team.to_string()));
    };

    match persisted {
        Ok(()) => state.set_degraded(false),
        Err(err) => {
            warn!(team, delta, error = %err, "failed to persist score record");
            state.set_degraded(true);
        }
    }

    // Broadcast before releasing the lock so subscribers observe totals in
    // application order.
    sse_events::broadcast_score_changed(state, team, total, delta);

    Ok(total)
}

/// Ordered snapshot of every team's current total.
pub async fn scoreboard(state: &SharedState) -> ScoreboardResponse {
    let store = state.scores().lock().await;
    ScoreboardResponse::from(store.totals())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tempfile::tempdir;

    use super::*;
    use crate::{config::AppConfig, state::AppState};

    fn test_state(dir: &std::path::Path) -> SharedState {
        let config = AppConfig::new(
            vec!["Blue Boys".into(), "Red Girls".into()],
            dir.join("teamScores.json"),
            dir.join("changesFromAPI.json"),
            Duration::from_millis(50),
            true,
        );
        AppState::new(config)
    }

    #[tokio::test]
    async fn apply_delta_returns_running_total() {
        let dir = tempdir().unwrap();
        let state = test_state(dir.path());

        assert_eq!(apply_delta(&state, "Blue Boys", 10).await, Ok(10));
        assert_eq!(apply_delta(&state, "Blue Boys", -30).await, Ok(-20));
    }

    #[tokio::test]
    async fn unknown_team_is_rejected_and_leaves_record_unchanged() {
        let dir = tempdir().unwrap();
        let state = test_state(dir.path());

        apply_delta(&state, "Blue Boys", 10).await.unwrap();
        let err = apply_delta(&state, "Unknown Team", 5).await.unwrap_err();
        assert_eq!(err, ServiceError::InvalidTeam("Unknown Team".into()));

        let snapshot = scoreboard(&state).await;
        assert_eq!(snapshot.teams.len(), 2);
        assert_eq!(snapshot.teams[0].score, 10);
        assert_eq!(snapshot.teams[1].score, 0);
    }

    #[tokio::test]
    async fn concurrent_deltas_all_land() {
        let dir = tempdir().unwrap();
        let state = test_state(dir.path());

        let mut handles = Vec::new();
        for delta in [10, -10, 20, 5, -5, 10, 10, -20] {
            let state = state.clone();
            handles.push(tokio::spawn(async move {
                apply_delta(&state, "Red Girls", delta).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let store = state.scores().lock().await;
        assert_eq!(store.get("Red Girls"), Some(20));
    }

    #[tokio::test]
    async fn persist_failure_keeps_in_memory_total_and_flags_divergence() {
        let dir = tempdir().unwrap();
        // Point the durable record into a directory that does not exist so
        // every rewrite fails.
        let config = AppConfig::new(
            vec!["Blue Boys".into()],
            dir.path().join("missing").join("teamScores.json"),
            dir.path().join("changesFromAPI.json"),
            Duration::from_millis(50),
            true,
        );
        let state = AppState::new(config);

        assert_eq!(apply_delta(&state, "Blue Boys", 10).await, Ok(10));
        assert_eq!(apply_delta(&state, "Blue Boys", 5).await, Ok(15));
        assert!(state.is_degraded());
    }

    #[tokio::test]
    async fn events_are_broadcast_for_each_mutation() {
        let dir = tempdir().unwrap();
        let state = test_state(dir.path());
        let mut receiver = state.sse().subscribe();

        apply_delta(&state, "Blue Boys", 10).await.unwrap();

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.event.as_deref(), Some("score_changed"));
        assert!(event.data.contains("\"score\":10"));
    }
}
