use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{MatchId, Outcome, ParticipantId, TournamentId};
use super::repository::ContestRepository;
use super::service::{ContestError, ContestService, MatchDraft, PredictionDraft};

#[derive(Debug, Deserialize)]
pub(crate) struct NamedRequest {
    pub(crate) name: String,
}

/// Router builder exposing the contest lifecycle and leaderboard over HTTP.
pub fn contest_router<R>(service: Arc<ContestService<R>>) -> Router
where
    R: ContestRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/tournaments",
            get(list_tournaments_handler::<R>).post(create_tournament_handler::<R>),
        )
        .route("/api/v1/teams", post(register_team_handler::<R>))
        .route(
            "/api/v1/participants",
            post(register_participant_handler::<R>),
        )
        .route(
            "/api/v1/tournaments/:tournament_id/matches",
            get(list_matches_handler::<R>).post(schedule_match_handler::<R>),
        )
        .route(
            "/api/v1/matches/:match_id/outcome",
            put(record_outcome_handler::<R>),
        )
        .route("/api/v1/predictions", post(submit_prediction_handler::<R>))
        .route(
            "/api/v1/tournaments/:tournament_id/ranking",
            get(ranking_handler::<R>),
        )
        .route(
            "/api/v1/tournaments/:tournament_id/participants/:participant_id",
            get(participant_report_handler::<R>),
        )
        .with_state(service)
}

fn error_response(error: ContestError) -> Response {
    let status = match &error {
        ContestError::UnknownTournament(_)
        | ContestError::UnknownTeam(_)
        | ContestError::UnknownParticipant(_)
        | ContestError::UnknownMatch(_) => StatusCode::NOT_FOUND,
        ContestError::MatchFinished(_) => StatusCode::CONFLICT,
        ContestError::InvalidOutcome(_) | ContestError::InvalidMatch(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ContestError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(%error, "contest request failed");
    }
    (status, Json(json!({ "error": error.to_string() }))).into_response()
}

fn respond<T: serde::Serialize>(status: StatusCode, result: Result<T, ContestError>) -> Response {
    match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_tournaments_handler<R>(
    State(service): State<Arc<ContestService<R>>>,
) -> Response
where
    R: ContestRepository + 'static,
{
    respond(StatusCode::OK, service.tournaments())
}

pub(crate) async fn create_tournament_handler<R>(
    State(service): State<Arc<ContestService<R>>>,
    Json(request): Json<NamedRequest>,
) -> Response
where
    R: ContestRepository + 'static,
{
    respond(
        StatusCode::CREATED,
        service.create_tournament(&request.name),
    )
}

pub(crate) async fn register_team_handler<R>(
    State(service): State<Arc<ContestService<R>>>,
    Json(request): Json<NamedRequest>,
) -> Response
where
    R: ContestRepository + 'static,
{
    respond(StatusCode::CREATED, service.register_team(&request.name))
}

pub(crate) async fn register_participant_handler<R>(
    State(service): State<Arc<ContestService<R>>>,
    Json(request): Json<NamedRequest>,
) -> Response
where
    R: ContestRepository + 'static,
{
    respond(
        StatusCode::CREATED,
        service.register_participant(&request.name),
    )
}

pub(crate) async fn list_matches_handler<R>(
    State(service): State<Arc<ContestService<R>>>,
    Path(tournament_id): Path<String>,
) -> Response
where
    R: ContestRepository + 'static,
{
    respond(
        StatusCode::OK,
        service.matches(&TournamentId(tournament_id)),
    )
}

pub(crate) async fn schedule_match_handler<R>(
    State(service): State<Arc<ContestService<R>>>,
    Path(tournament_id): Path<String>,
    Json(draft): Json<MatchDraft>,
) -> Response
where
    R: ContestRepository + 'static,
{
    respond(
        StatusCode::CREATED,
        service.schedule_match(&TournamentId(tournament_id), draft),
    )
}

pub(crate) async fn record_outcome_handler<R>(
    State(service): State<Arc<ContestService<R>>>,
    Path(match_id): Path<String>,
    Json(outcome): Json<Outcome>,
) -> Response
where
    R: ContestRepository + 'static,
{
    let match_id = MatchId(match_id);
    match service.record_outcome(&match_id, outcome) {
        Ok(scored) => {
            let payload = json!({
                "match_id": match_id,
                "status": "finished",
                "scored_predictions": scored,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_prediction_handler<R>(
    State(service): State<Arc<ContestService<R>>>,
    Json(draft): Json<PredictionDraft>,
) -> Response
where
    R: ContestRepository + 'static,
{
    respond(StatusCode::ACCEPTED, service.submit_prediction(draft))
}

pub(crate) async fn ranking_handler<R>(
    State(service): State<Arc<ContestService<R>>>,
    Path(tournament_id): Path<String>,
) -> Response
where
    R: ContestRepository + 'static,
{
    respond(
        StatusCode::OK,
        service.leaderboard(&TournamentId(tournament_id)),
    )
}

pub(crate) async fn participant_report_handler<R>(
    State(service): State<Arc<ContestService<R>>>,
    Path((tournament_id, participant_id)): Path<(String, String)>,
) -> Response
where
    R: ContestRepository + 'static,
{
    let tournament_id = TournamentId(tournament_id);
    let participant_id = ParticipantId(participant_id);
    match service.participant_report(&tournament_id, &participant_id) {
        Ok(predictions) => {
            let total_points: i32 = predictions.iter().map(|scored| scored.points.total).sum();
            let payload = json!({
                "tournament_id": tournament_id,
                "participant_id": participant_id,
                "total_points": total_points,
                "predictions": predictions,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}
