use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::domain::{
    Match, MatchId, Outcome, Participant, ParticipantId, PredictedOutcome, Prediction,
    PredictionId, Team, TeamId, Tournament, TournamentId, TournamentStatus,
};
use super::ranking::{self, PositionPolicy, RankingEntry, ScoredPrediction};
use super::repository::{ContestRepository, RepositoryError};
use super::scoring::{ScoringEngine, ScoringRules};
use super::validation::{self, OutcomeViolation};

/// Service composing the repository with the scoring and ranking rules.
pub struct ContestService<R> {
    repository: Arc<R>,
    engine: ScoringEngine,
    policy: PositionPolicy,
}

/// Fixture to add to a tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchDraft {
    pub home: TeamId,
    pub away: TeamId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub scheduled_for: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionDraft {
    pub participant_id: ParticipantId,
    pub match_id: MatchId,
    #[serde(flatten)]
    pub forecast: PredictedOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct Leaderboard {
    pub tournament: Tournament,
    pub entries: Vec<RankingEntry>,
}

fn new_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

impl<R> ContestService<R>
where
    R: ContestRepository + 'static,
{
    pub fn new(repository: Arc<R>, rules: ScoringRules) -> Self {
        Self {
            repository,
            engine: ScoringEngine::new(rules),
            policy: PositionPolicy::default(),
        }
    }

    pub fn with_position_policy(mut self, policy: PositionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    pub fn create_tournament(&self, name: &str) -> Result<Tournament, ContestError> {
        let now = Utc::now();
        let tournament = Tournament {
            id: TournamentId(new_id("trn")),
            name: name.trim().to_string(),
            status: TournamentStatus::Upcoming,
            created_at: now,
            updated_at: now,
        };
        self.repository.save_tournament(tournament.clone())?;
        info!(tournament = %tournament.id, name = %tournament.name, "tournament created");
        Ok(tournament)
    }

    pub fn tournaments(&self) -> Result<Vec<Tournament>, ContestError> {
        Ok(self.repository.tournaments()?)
    }

    pub fn tournament(&self, id: &TournamentId) -> Result<Tournament, ContestError> {
        self.repository
            .tournament(id)?
            .ok_or_else(|| ContestError::UnknownTournament(id.clone()))
    }

    pub fn register_team(&self, name: &str) -> Result<Team, ContestError> {
        let team = Team {
            id: TeamId(new_id("team")),
            name: name.trim().to_string(),
        };
        self.repository.save_team(team.clone())?;
        Ok(team)
    }

    pub fn register_participant(&self, name: &str) -> Result<Participant, ContestError> {
        let participant = Participant {
            id: ParticipantId(new_id("pp")),
            name: name.trim().to_string(),
        };
        self.repository.save_participant(participant.clone())?;
        Ok(participant)
    }

    pub fn schedule_match(
        &self,
        tournament_id: &TournamentId,
        draft: MatchDraft,
    ) -> Result<Match, ContestError> {
        self.tournament(tournament_id)?;
        validation::check_fixture(&draft.home, &draft.away).map_err(ContestError::InvalidMatch)?;
        for team in [&draft.home, &draft.away] {
            if self.repository.team(team)?.is_none() {
                return Err(ContestError::UnknownTeam(team.clone()));
            }
        }

        let fixture = Match {
            id: MatchId(new_id("match")),
            tournament_id: tournament_id.clone(),
            home: draft.home,
            away: draft.away,
            name: draft.name,
            scheduled_for: draft.scheduled_for,
            outcome: None,
        };
        self.repository.save_match(fixture.clone())?;
        Ok(fixture)
    }

    pub fn matches(&self, tournament_id: &TournamentId) -> Result<Vec<Match>, ContestError> {
        self.tournament(tournament_id)?;
        Ok(self.repository.matches(tournament_id)?)
    }

    /// Creates or replaces the participant's prediction while the match is open.
    pub fn submit_prediction(&self, draft: PredictionDraft) -> Result<Prediction, ContestError> {
        if self.repository.participant(&draft.participant_id)?.is_none() {
            return Err(ContestError::UnknownParticipant(draft.participant_id));
        }
        let fixture = self.fetch_match(&draft.match_id)?;
        if fixture.is_finished() {
            return Err(ContestError::MatchFinished(fixture.id));
        }

        let existing = self.repository.predictions()?.into_iter().find(|prediction| {
            prediction.participant_id == draft.participant_id
                && prediction.match_id == draft.match_id
        });

        let prediction = Prediction {
            id: existing
                .map(|prediction| prediction.id)
                .unwrap_or_else(|| PredictionId(new_id("prono"))),
            participant_id: draft.participant_id,
            match_id: draft.match_id,
            forecast: draft.forecast,
            points: None,
        };
        self.repository.save_prediction(prediction.clone())?;
        Ok(prediction)
    }

    /// Finishes a match and records points on every prediction made for it.
    pub fn record_outcome(
        &self,
        match_id: &MatchId,
        outcome: Outcome,
    ) -> Result<Vec<Prediction>, ContestError> {
        let mut fixture = self.fetch_match(match_id)?;
        if fixture.is_finished() {
            return Err(ContestError::MatchFinished(fixture.id));
        }
        validation::check_outcome(&outcome).map_err(ContestError::InvalidOutcome)?;

        fixture.outcome = Some(outcome);

        // The match is only stored as finished once every prediction carries its points,
        // so a failed write leaves it open and the call can be retried.
        let mut scored = Vec::new();
        for mut prediction in self.repository.predictions()? {
            if prediction.match_id != fixture.id {
                continue;
            }
            prediction.points = Some(self.engine.score(&prediction, &fixture).total);
            self.repository.save_prediction(prediction.clone())?;
            scored.push(prediction);
        }
        self.repository.save_match(fixture.clone())?;

        self.advance_tournament(&fixture.tournament_id)?;
        info!(
            match_id = %fixture.id,
            predictions = scored.len(),
            "match outcome recorded"
        );
        Ok(scored)
    }

    pub fn leaderboard(&self, tournament_id: &TournamentId) -> Result<Leaderboard, ContestError> {
        let tournament = self.tournament(tournament_id)?;
        let matches = self.repository.matches(tournament_id)?;
        let participants = self.repository.participants()?;
        let predictions = self.repository.predictions()?;

        let entries = ranking::rank_with(
            &self.engine,
            self.policy,
            &participants,
            &predictions,
            &matches,
        );
        Ok(Leaderboard {
            tournament,
            entries,
        })
    }

    pub fn participant_report(
        &self,
        tournament_id: &TournamentId,
        participant_id: &ParticipantId,
    ) -> Result<Vec<ScoredPrediction>, ContestError> {
        self.tournament(tournament_id)?;
        if self.repository.participant(participant_id)?.is_none() {
            return Err(ContestError::UnknownParticipant(participant_id.clone()));
        }
        let matches = self.repository.matches(tournament_id)?;
        let predictions = self.repository.predictions()?;
        Ok(ranking::participant_breakdown(
            &self.engine,
            participant_id,
            &predictions,
            &matches,
        ))
    }

    fn fetch_match(&self, id: &MatchId) -> Result<Match, ContestError> {
        self.repository
            .fetch_match(id)?
            .ok_or_else(|| ContestError::UnknownMatch(id.clone()))
    }

    fn advance_tournament(&self, tournament_id: &TournamentId) -> Result<(), ContestError> {
        let Some(mut tournament) = self.repository.tournament(tournament_id)? else {
            return Ok(());
        };
        let matches = self.repository.matches(tournament_id)?;
        let status = if matches.iter().all(Match::is_finished) {
            TournamentStatus::Finished
        } else {
            TournamentStatus::InProgress
        };

        if tournament.status != status {
            tournament.status = status;
            tournament.updated_at = Utc::now();
            self.repository.save_tournament(tournament)?;
        }
        Ok(())
    }
}

/// Error raised by the contest service.
#[derive(Debug, thiserror::Error)]
pub enum ContestError {
    #[error("unknown tournament {0}")]
    UnknownTournament(TournamentId),
    #[error("unknown team {0}")]
    UnknownTeam(TeamId),
    #[error("unknown participant {0}")]
    UnknownParticipant(ParticipantId),
    #[error("unknown match {0}")]
    UnknownMatch(MatchId),
    #[error("match {0} is already finished")]
    MatchFinished(MatchId),
    #[error("invalid outcome: {0}")]
    InvalidOutcome(OutcomeViolation),
    #[error("invalid match: {0}")]
    InvalidMatch(OutcomeViolation),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
