use std::convert::Infallible;

use axum::{Router, extract::State, response::sse::Sse, routing::get};
use futures::Stream;
use tracing::info;

use crate::{
    services::{score_service, sse_events, sse_service},
    state::SharedState,
};

#[utoipa::path(
    get,
    path = "/sse/scores",
    tag = "sse",
    responses((status = 200, description = "Scoreboard event stream", content_type = "text/event-stream", body = String))
)]
/// Stream realtime score events to connected displays.
///
/// Every new connection triggers a full scoreboard snapshot broadcast so the
/// display starts from current totals instead of waiting for the next change.
pub async fn scores_stream(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>> {
    let receiver = sse_service::subscribe(&state);
    info!("new scoreboard SSE connection");

    let snapshot = score_service::scoreboard(&state).await;
    sse_events::broadcast_scoreboard(&state, &snapshot);

    sse_service::to_sse_stream(receiver)
}

/// Configure the SSE endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/sse/scores", get(scores_stream))
}
