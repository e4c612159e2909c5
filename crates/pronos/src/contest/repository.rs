use serde::{Deserialize, Serialize};

use super::domain::{
    Match, MatchId, Participant, ParticipantId, Prediction, Team, TeamId, Tournament,
    TournamentId,
};

/// Storage abstraction so the contest service can be exercised in isolation.
///
/// Writers are assumed to be single and last-write-wins; `save_*` methods upsert by id.
pub trait ContestRepository: Send + Sync {
    fn tournaments(&self) -> Result<Vec<Tournament>, RepositoryError>;
    fn save_tournament(&self, tournament: Tournament) -> Result<(), RepositoryError>;

    fn teams(&self) -> Result<Vec<Team>, RepositoryError>;
    fn save_team(&self, team: Team) -> Result<(), RepositoryError>;

    fn participants(&self) -> Result<Vec<Participant>, RepositoryError>;
    fn save_participant(&self, participant: Participant) -> Result<(), RepositoryError>;

    fn matches(&self, tournament_id: &TournamentId) -> Result<Vec<Match>, RepositoryError>;
    fn fetch_match(&self, id: &MatchId) -> Result<Option<Match>, RepositoryError>;
    fn save_match(&self, fixture: Match) -> Result<(), RepositoryError>;

    fn predictions(&self) -> Result<Vec<Prediction>, RepositoryError>;
    fn save_prediction(&self, prediction: Prediction) -> Result<(), RepositoryError>;

    fn tournament(&self, id: &TournamentId) -> Result<Option<Tournament>, RepositoryError> {
        Ok(self
            .tournaments()?
            .into_iter()
            .find(|tournament| &tournament.id == id))
    }

    fn team(&self, id: &TeamId) -> Result<Option<Team>, RepositoryError> {
        Ok(self.teams()?.into_iter().find(|team| &team.id == id))
    }

    fn participant(&self, id: &ParticipantId) -> Result<Option<Participant>, RepositoryError> {
        Ok(self
            .participants()?
            .into_iter()
            .find(|participant| &participant.id == id))
    }
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("storage io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored collection is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Every stored collection, one flat JSON array per entity type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContestSnapshot {
    #[serde(default)]
    pub tournaments: Vec<Tournament>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub matches: Vec<Match>,
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

impl ContestSnapshot {
    pub fn upsert_tournament(&mut self, tournament: Tournament) {
        upsert(&mut self.tournaments, tournament, |a, b| a.id == b.id);
    }

    pub fn upsert_team(&mut self, team: Team) {
        upsert(&mut self.teams, team, |a, b| a.id == b.id);
    }

    pub fn upsert_participant(&mut self, participant: Participant) {
        upsert(&mut self.participants, participant, |a, b| a.id == b.id);
    }

    pub fn upsert_match(&mut self, fixture: Match) {
        upsert(&mut self.matches, fixture, |a, b| a.id == b.id);
    }

    pub fn upsert_prediction(&mut self, prediction: Prediction) {
        upsert(&mut self.predictions, prediction, |a, b| a.id == b.id);
    }

    pub fn tournament_matches(&self, tournament_id: &TournamentId) -> Vec<Match> {
        self.matches
            .iter()
            .filter(|fixture| &fixture.tournament_id == tournament_id)
            .cloned()
            .collect()
    }

    pub fn find_match(&self, id: &MatchId) -> Option<Match> {
        self.matches.iter().find(|fixture| &fixture.id == id).cloned()
    }
}

pub(crate) fn upsert<T>(records: &mut Vec<T>, record: T, same: impl Fn(&T, &T) -> bool) {
    match records.iter_mut().find(|existing| same(existing, &record)) {
        Some(existing) => *existing = record,
        None => records.push(record),
    }
}
