//! Prediction contests: tournaments, matches, participant predictions, and the
//! scoring and ranking rules that turn finished results into a leaderboard.

pub mod domain;
pub mod ranking;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod store;
pub(crate) mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    Match, MatchId, MatchStatus, Outcome, Participant, ParticipantId, PredictedOutcome,
    Prediction, PredictionId, Score, Team, TeamId, Tournament, TournamentId, TournamentStatus,
    Winner,
};
pub use ranking::{
    participant_breakdown, rank, rank_with, PositionPolicy, RankingEntry, ScoredPrediction,
};
pub use repository::{ContestRepository, ContestSnapshot, RepositoryError};
pub use router::contest_router;
pub use scoring::{score, PointResult, ScoringEngine, ScoringRules};
pub use service::{ContestError, ContestService, Leaderboard, MatchDraft, PredictionDraft};
pub use store::JsonFileRepository;
pub use validation::OutcomeViolation;
