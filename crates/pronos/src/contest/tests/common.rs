use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::contest::domain::{
    Match, MatchId, Outcome, Participant, ParticipantId, PredictedOutcome, Prediction,
    PredictionId, Score, Team, TeamId, Tournament, TournamentId, Winner,
};
use crate::contest::repository::{ContestRepository, ContestSnapshot, RepositoryError};
use crate::contest::{ContestService, ScoringRules};

#[derive(Default)]
pub(super) struct MemoryRepository {
    snapshot: Mutex<ContestSnapshot>,
    reject_prediction_writes: AtomicBool,
}

impl MemoryRepository {
    pub(super) fn snapshot(&self) -> ContestSnapshot {
        self.snapshot.lock().expect("repository mutex poisoned").clone()
    }

    pub(super) fn reject_prediction_writes(&self, reject: bool) {
        self.reject_prediction_writes.store(reject, Ordering::SeqCst);
    }
}

impl ContestRepository for MemoryRepository {
    fn tournaments(&self) -> Result<Vec<Tournament>, RepositoryError> {
        Ok(self.snapshot().tournaments)
    }

    fn save_tournament(&self, tournament: Tournament) -> Result<(), RepositoryError> {
        let mut guard = self.snapshot.lock().expect("repository mutex poisoned");
        guard.upsert_tournament(tournament);
        Ok(())
    }

    fn teams(&self) -> Result<Vec<Team>, RepositoryError> {
        Ok(self.snapshot().teams)
    }

    fn save_team(&self, team: Team) -> Result<(), RepositoryError> {
        let mut guard = self.snapshot.lock().expect("repository mutex poisoned");
        guard.upsert_team(team);
        Ok(())
    }

    fn participants(&self) -> Result<Vec<Participant>, RepositoryError> {
        Ok(self.snapshot().participants)
    }

    fn save_participant(&self, participant: Participant) -> Result<(), RepositoryError> {
        let mut guard = self.snapshot.lock().expect("repository mutex poisoned");
        guard.upsert_participant(participant);
        Ok(())
    }

    fn matches(&self, tournament_id: &TournamentId) -> Result<Vec<Match>, RepositoryError> {
        Ok(self.snapshot().tournament_matches(tournament_id))
    }

    fn fetch_match(&self, id: &MatchId) -> Result<Option<Match>, RepositoryError> {
        Ok(self.snapshot().find_match(id))
    }

    fn save_match(&self, fixture: Match) -> Result<(), RepositoryError> {
        let mut guard = self.snapshot.lock().expect("repository mutex poisoned");
        guard.upsert_match(fixture);
        Ok(())
    }

    fn predictions(&self) -> Result<Vec<Prediction>, RepositoryError> {
        Ok(self.snapshot().predictions)
    }

    fn save_prediction(&self, prediction: Prediction) -> Result<(), RepositoryError> {
        if self.reject_prediction_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("disk full".to_string()));
        }
        let mut guard = self.snapshot.lock().expect("repository mutex poisoned");
        guard.upsert_prediction(prediction);
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl ContestRepository for UnavailableRepository {
    fn tournaments(&self) -> Result<Vec<Tournament>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn save_tournament(&self, _tournament: Tournament) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn teams(&self) -> Result<Vec<Team>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn save_team(&self, _team: Team) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn participants(&self) -> Result<Vec<Participant>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn save_participant(&self, _participant: Participant) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn matches(&self, _tournament_id: &TournamentId) -> Result<Vec<Match>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn fetch_match(&self, _id: &MatchId) -> Result<Option<Match>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn save_match(&self, _fixture: Match) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn predictions(&self) -> Result<Vec<Prediction>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn save_prediction(&self, _prediction: Prediction) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }
}

pub(super) fn build_service() -> (Arc<ContestService<MemoryRepository>>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = Arc::new(ContestService::new(
        repository.clone(),
        ScoringRules::default(),
    ));
    (service, repository)
}

pub(super) fn participant(id: &str) -> Participant {
    Participant {
        id: ParticipantId::from(id),
        name: id.to_uppercase(),
    }
}

pub(super) fn open_match(id: &str) -> Match {
    Match {
        id: MatchId::from(id),
        tournament_id: TournamentId::from("world-cup"),
        home: TeamId::from("france"),
        away: TeamId::from("brazil"),
        name: None,
        scheduled_for: None,
        outcome: None,
    }
}

pub(super) fn finished_match(id: &str, half_time: Option<Score>, full_time: Score) -> Match {
    Match {
        outcome: Some(Outcome::new(half_time, full_time)),
        ..open_match(id)
    }
}

/// Finished 2-1 with a 1-0 half time, no penalties.
pub(super) fn match_m() -> Match {
    finished_match("m", Some(Score::new(1, 0)), Score::new(2, 1))
}

pub(super) fn prediction(
    id: &str,
    participant_id: &str,
    match_id: &str,
    winner: Option<Winner>,
    half_time: Option<Score>,
    full_time: Option<Score>,
) -> Prediction {
    Prediction {
        id: PredictionId::from(id),
        participant_id: ParticipantId::from(participant_id),
        match_id: MatchId::from(match_id),
        forecast: PredictedOutcome {
            winner,
            half_time,
            full_time,
        },
        points: None,
    }
}

/// A prediction on `match_id` that scores exactly `points` against a 2-1 (1-0) result.
///
/// Only valid for 0..=4 points.
pub(super) fn prediction_worth(
    id: &str,
    participant_id: &str,
    match_id: &str,
    points: i32,
) -> Prediction {
    let (winner, half_time, full_time) = match points {
        0 => (Some(Winner::Draw), None, None),
        1 => (Some(Winner::Home), None, None),
        2 => (Some(Winner::Home), Some(Score::new(1, 0)), None),
        3 => (Some(Winner::Home), None, Some(Score::new(2, 1))),
        4 => (
            Some(Winner::Home),
            Some(Score::new(1, 0)),
            Some(Score::new(2, 1)),
        ),
        other => panic!("no canned prediction worth {other} points"),
    };
    prediction(id, participant_id, match_id, winner, half_time, full_time)
}
