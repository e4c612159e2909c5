use serde::{Deserialize, Serialize};

/// Point values and goal-gap thresholds applied to every prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRules {
    pub winner_correct: i32,
    pub winner_incorrect: i32,
    /// No winner malus when either the pick or the real result is a draw.
    pub waive_winner_malus_on_draw: bool,
    pub half_time_exact: i32,
    pub half_time_goal_gap: u32,
    pub half_time_goals_malus: i32,
    pub full_time_exact: i32,
    pub full_time_goal_gap: u32,
    pub full_time_goals_malus: i32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            winner_correct: 1,
            winner_incorrect: -1,
            waive_winner_malus_on_draw: true,
            half_time_exact: 1,
            half_time_goal_gap: 3,
            half_time_goals_malus: -1,
            full_time_exact: 2,
            full_time_goal_gap: 5,
            full_time_goals_malus: -1,
        }
    }
}
