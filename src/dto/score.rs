use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request to adjust a team's score by a signed delta.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ScoreAdjustmentRequest {
    /// Amount added to the current total; negative values remove points.
    pub delta: i32,
}

/// Result of a score adjustment, returning the updated tally.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScoreUpdateResponse {
    /// Name of the adjusted team.
    pub team: String,
    /// Total after the delta was applied.
    pub score: i32,
}

#[derive(Clone, Debug, Serialize, ToSchema)]
/// One team's current total as displayed on the scoreboard.
pub struct TeamScore {
    /// Team name from the configured roster.
    pub team: String,
    /// Current point total.
    pub score: i32,
}

/// Ordered snapshot of every team's total.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScoreboardResponse {
    /// Totals in roster order.
    pub teams: Vec<TeamScore>,
}

impl From<&IndexMap<String, i32>> for ScoreboardResponse {
    fn from(totals: &IndexMap<String, i32>) -> Self {
        Self {
            teams: totals
                .iter()
                .map(|(team, score)| TeamScore {
                    team: team.clone(),
                    score: *score,
                })
                .collect(),
        }
    }
}
