mod config;
mod rules;

pub use config::ScoringRules;

use super::domain::{Match, Prediction};
use serde::{Deserialize, Serialize};

/// Stateless evaluator comparing one prediction with one finished match.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    rules: ScoringRules,
}

impl ScoringEngine {
    pub fn new(rules: ScoringRules) -> Self {
        Self { rules }
    }

    /// Returns a neutral result while the match has no outcome.
    pub fn score(&self, prediction: &Prediction, fixture: &Match) -> PointResult {
        let Some(outcome) = fixture.outcome.as_ref() else {
            return PointResult::neutral();
        };
        let forecast = &prediction.forecast;
        let rules = &self.rules;

        let (winner_correct, winner_incorrect) =
            rules::winner_points(forecast.winner(), outcome.winner(), rules);

        let (half_time_exact, half_time_goals_malus) = rules::score_points(
            forecast.half_time,
            outcome.half_time,
            rules.half_time_exact,
            rules.half_time_goal_gap,
            rules.half_time_goals_malus,
        );

        // Penalties never feed the score-based rules.
        let (full_time_exact, full_time_goals_malus) = rules::score_points(
            forecast.full_time,
            outcome.full_time,
            rules.full_time_exact,
            rules.full_time_goal_gap,
            rules.full_time_goals_malus,
        );

        PointResult {
            winner_correct,
            winner_incorrect,
            half_time_exact,
            half_time_goals_malus,
            full_time_exact,
            full_time_goals_malus,
            total: winner_correct
                + winner_incorrect
                + half_time_exact
                + half_time_goals_malus
                + full_time_exact
                + full_time_goals_malus,
        }
    }
}

/// Scores a prediction with the default rules.
pub fn score(prediction: &Prediction, fixture: &Match) -> PointResult {
    ScoringEngine::default().score(prediction, fixture)
}

/// Breakdown of which rules fired for a prediction, allowing transparent audits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointResult {
    pub winner_correct: i32,
    pub winner_incorrect: i32,
    pub half_time_exact: i32,
    pub half_time_goals_malus: i32,
    pub full_time_exact: i32,
    pub full_time_goals_malus: i32,
    pub total: i32,
}

impl PointResult {
    pub const fn neutral() -> Self {
        Self {
            winner_correct: 0,
            winner_incorrect: 0,
            half_time_exact: 0,
            half_time_goals_malus: 0,
            full_time_exact: 0,
            full_time_goals_malus: 0,
            total: 0,
        }
    }

    pub const fn winner_points(&self) -> i32 {
        self.winner_correct + self.winner_incorrect
    }
}
