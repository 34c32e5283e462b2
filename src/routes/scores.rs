use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use crate::{
    dto::score::{ScoreAdjustmentRequest, ScoreUpdateResponse, ScoreboardResponse},
    error::AppError,
    services::score_service,
    state::SharedState,
};

/// Routes exposing the scoreboard and the manual adjustment entry point.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/scores", get(scoreboard))
        .route("/scores/{team}", post(adjust_score))
}

/// Return every team's current total in roster order.
#[utoipa::path(
    get,
    path = "/scores",
    tag = "scores",
    responses(
        (status = 200, description = "Current scoreboard", body = ScoreboardResponse)
    )
)]
pub async fn scoreboard(State(state): State<SharedState>) -> Json<ScoreboardResponse> {
    Json(score_service::scoreboard(&state).await)
}

/// Apply a manual point adjustment to one team.
#[utoipa::path(
    post,
    path = "/scores/{team}",
    tag = "scores",
    params(("team" = String, Path, description = "Name of the team to adjust")),
    request_body = ScoreAdjustmentRequest,
    responses(
        (status = 200, description = "Score adjusted", body = ScoreUpdateResponse),
        (status = 404, description = "Team is not on the configured roster")
    )
)]
pub async fn adjust_score(
    State(state): State<SharedState>,
    Path(team): Path<String>,
    Json(payload): Json<ScoreAdjustmentRequest>,
) -> Result<Json<ScoreUpdateResponse>, AppError> {
    let score = score_service::apply_delta(&state, &team, payload.delta).await?;
    Ok(Json(ScoreUpdateResponse { team, score }))
}
