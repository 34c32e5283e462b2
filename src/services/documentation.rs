use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Scoreboard Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::scores::scoreboard,
        crate::routes::scores::adjust_score,
        crate::routes::sse::scores_stream,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::score::ScoreAdjustmentRequest,
            crate::dto::score::ScoreUpdateResponse,
            crate::dto::score::ScoreboardResponse,
            crate::dto::score::TeamScore,
            crate::dto::sse::ScoreChangedEvent,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "scores", description = "Scoreboard reads and manual adjustments"),
        (name = "sse", description = "Server-sent events stream for displays"),
    )
)]
pub struct ApiDoc;
