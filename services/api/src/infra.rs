use metrics_exporter_prometheus::PrometheusHandle;
use pronos::contest::{
    ContestRepository, ContestSnapshot, Match, MatchId, Participant, Prediction,
    RepositoryError, Team, Tournament, TournamentId,
};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local contest storage used when no data directory is configured.
#[derive(Default, Clone)]
pub(crate) struct InMemoryContestRepository {
    snapshot: Arc<Mutex<ContestSnapshot>>,
}

impl InMemoryContestRepository {
    fn guard(&self) -> Result<MutexGuard<'_, ContestSnapshot>, RepositoryError> {
        self.snapshot
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

impl ContestRepository for InMemoryContestRepository {
    fn tournaments(&self) -> Result<Vec<Tournament>, RepositoryError> {
        Ok(self.guard()?.tournaments.clone())
    }

    fn save_tournament(&self, tournament: Tournament) -> Result<(), RepositoryError> {
        self.guard()?.upsert_tournament(tournament);
        Ok(())
    }

    fn teams(&self) -> Result<Vec<Team>, RepositoryError> {
        Ok(self.guard()?.teams.clone())
    }

    fn save_team(&self, team: Team) -> Result<(), RepositoryError> {
        self.guard()?.upsert_team(team);
        Ok(())
    }

    fn participants(&self) -> Result<Vec<Participant>, RepositoryError> {
        Ok(self.guard()?.participants.clone())
    }

    fn save_participant(&self, participant: Participant) -> Result<(), RepositoryError> {
        self.guard()?.upsert_participant(participant);
        Ok(())
    }

    fn matches(&self, tournament_id: &TournamentId) -> Result<Vec<Match>, RepositoryError> {
        Ok(self.guard()?.tournament_matches(tournament_id))
    }

    fn fetch_match(&self, id: &MatchId) -> Result<Option<Match>, RepositoryError> {
        Ok(self.guard()?.find_match(id))
    }

    fn save_match(&self, fixture: Match) -> Result<(), RepositoryError> {
        self.guard()?.upsert_match(fixture);
        Ok(())
    }

    fn predictions(&self) -> Result<Vec<Prediction>, RepositoryError> {
        Ok(self.guard()?.predictions.clone())
    }

    fn save_prediction(&self, prediction: Prediction) -> Result<(), RepositoryError> {
        self.guard()?.upsert_prediction(prediction);
        Ok(())
    }
}

pub(crate) fn parse_json_arg<T>(raw: &str) -> Result<T, serde_json::Error>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(raw.trim())
}
