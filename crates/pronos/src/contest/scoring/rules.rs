use super::super::domain::{Score, Winner};
use super::config::ScoringRules;

/// Signed pair of (bonus, malus) for one family of rules. At most one side is non-zero.
pub(crate) type RuleOutcome = (i32, i32);

pub(crate) fn winner_points(
    predicted: Option<Winner>,
    actual: Option<Winner>,
    rules: &ScoringRules,
) -> RuleOutcome {
    let (Some(predicted), Some(actual)) = (predicted, actual) else {
        return (0, 0);
    };

    if predicted == actual {
        return (rules.winner_correct, 0);
    }

    if rules.waive_winner_malus_on_draw && (predicted.is_draw() || actual.is_draw()) {
        (0, 0)
    } else {
        (0, rules.winner_incorrect)
    }
}

/// Exact score bonus, or a malus when the total goal count misses by at least `gap`.
pub(crate) fn score_points(
    predicted: Option<Score>,
    actual: Option<Score>,
    exact_bonus: i32,
    gap: u32,
    malus: i32,
) -> RuleOutcome {
    let (Some(predicted), Some(actual)) = (predicted, actual) else {
        return (0, 0);
    };

    if predicted == actual {
        return (exact_bonus, 0);
    }

    if predicted.total_goals().abs_diff(actual.total_goals()) >= u64::from(gap) {
        (0, malus)
    } else {
        (0, 0)
    }
}
