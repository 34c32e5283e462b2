//! Construction and broadcast of the events pushed to display clients.

use serde::Serialize;
use tracing::warn;

use crate::{
    dto::{score::ScoreboardResponse, sse::{ScoreChangedEvent, ServerEvent}},
    state::SharedState,
};

const EVENT_SCORE_CHANGED: &str = "score_changed";
const EVENT_SCOREBOARD: &str = "scoreboard";

/// Broadcast a score change for a specific team.
pub fn broadcast_score_changed(state: &SharedState, team: &str, score: i32, delta: i32) {
    let payload = ScoreChangedEvent {
        team: team.to_string(),
        score,
        delta,
    };
    send_event(state, EVENT_SCORE_CHANGED, &payload);
}

/// Broadcast a full snapshot of the scoreboard.
pub fn broadcast_scoreboard(state: &SharedState, snapshot: &ScoreboardResponse) {
    send_event(state, EVENT_SCOREBOARD, snapshot);
}

fn send_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize SSE payload"),
    }
}
