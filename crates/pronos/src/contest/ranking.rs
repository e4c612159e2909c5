//! Leaderboard aggregation over a tournament's predictions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{Match, MatchId, Participant, ParticipantId, Prediction};
use super::scoring::{PointResult, ScoringEngine};

/// How positions are assigned to participants with equal totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionPolicy {
    /// 1-based index in the sorted table; ties keep participant input order.
    #[default]
    Sequential,
    /// Standard competition ranking ("1, 2, 2, 4").
    SharedTies,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub participant: Participant,
    pub total_points: i32,
    pub position: usize,
    /// Predictions in scope, including those on matches still open.
    pub predictions: usize,
    /// Predictions whose match has a result.
    pub scored: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredPrediction {
    pub prediction: Prediction,
    pub fixture: Match,
    pub points: PointResult,
}

#[derive(Default)]
struct Tally {
    total_points: i32,
    predictions: usize,
    scored: usize,
}

/// Ranks participants with the default rules and sequential positions.
pub fn rank(
    participants: &[Participant],
    predictions: &[Prediction],
    matches: &[Match],
) -> Vec<RankingEntry> {
    rank_with(
        &ScoringEngine::default(),
        PositionPolicy::Sequential,
        participants,
        predictions,
        matches,
    )
}

pub fn rank_with(
    engine: &ScoringEngine,
    policy: PositionPolicy,
    participants: &[Participant],
    predictions: &[Prediction],
    matches: &[Match],
) -> Vec<RankingEntry> {
    let fixtures = index_matches(matches);
    let mut tallies: HashMap<&ParticipantId, Tally> = participants
        .iter()
        .map(|participant| (&participant.id, Tally::default()))
        .collect();

    let mut orphaned = 0usize;
    for prediction in predictions {
        let Some(fixture) = fixtures.get(&prediction.match_id) else {
            // Outside the tournament, or pointing at a match that no longer exists.
            continue;
        };
        let Some(tally) = tallies.get_mut(&prediction.participant_id) else {
            orphaned += 1;
            continue;
        };

        tally.predictions += 1;
        if fixture.is_finished() {
            tally.scored += 1;
            tally.total_points += engine.score(prediction, fixture).total;
        }
    }

    if orphaned > 0 {
        debug!(orphaned, "dropped predictions from unknown participants");
    }

    let mut entries: Vec<RankingEntry> = participants
        .iter()
        .map(|participant| {
            let tally = tallies.remove(&participant.id).unwrap_or_default();
            RankingEntry {
                participant: participant.clone(),
                total_points: tally.total_points,
                position: 0,
                predictions: tally.predictions,
                scored: tally.scored,
            }
        })
        .collect();

    // `sort_by` is stable, so equal totals keep participant input order.
    entries.sort_by(|a, b| b.total_points.cmp(&a.total_points));
    assign_positions(&mut entries, policy);
    entries
}

fn assign_positions(entries: &mut [RankingEntry], policy: PositionPolicy) {
    let mut previous: Option<(i32, usize)> = None;
    for (index, entry) in entries.iter_mut().enumerate() {
        let sequential = index + 1;
        entry.position = match (policy, previous) {
            (PositionPolicy::SharedTies, Some((points, position)))
                if points == entry.total_points =>
            {
                position
            }
            _ => sequential,
        };
        previous = Some((entry.total_points, entry.position));
    }
}

/// Per-prediction breakdown for one participant, in prediction input order.
pub fn participant_breakdown(
    engine: &ScoringEngine,
    participant_id: &ParticipantId,
    predictions: &[Prediction],
    matches: &[Match],
) -> Vec<ScoredPrediction> {
    let fixtures = index_matches(matches);
    predictions
        .iter()
        .filter(|prediction| &prediction.participant_id == participant_id)
        .filter_map(|prediction| {
            let fixture = fixtures.get(&prediction.match_id)?;
            Some(ScoredPrediction {
                prediction: prediction.clone(),
                fixture: (*fixture).clone(),
                points: engine.score(prediction, fixture),
            })
        })
        .collect()
}

fn index_matches(matches: &[Match]) -> HashMap<&MatchId, &Match> {
    matches.iter().map(|fixture| (&fixture.id, fixture)).collect()
}
