use crate::{dto::health::HealthResponse, state::SharedState};

/// Report whether the durable record currently matches the in-memory totals.
pub fn health_status(state: &SharedState) -> HealthResponse {
    if state.is_degraded() {
        HealthResponse::degraded()
    } else {
        HealthResponse::ok()
    }
}
