use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use pronos::contest::{
    contest_router, rank_with, ContestRepository, ContestService, Match, Participant,
    PointResult, PositionPolicy, Prediction, RankingEntry, ScoringEngine,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct ScoreRequest {
    pub(crate) prediction: Prediction,
    #[serde(rename = "match")]
    pub(crate) fixture: Match,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RankRequest {
    pub(crate) participants: Vec<Participant>,
    pub(crate) predictions: Vec<Prediction>,
    pub(crate) matches: Vec<Match>,
    #[serde(default)]
    pub(crate) position_policy: PositionPolicy,
}

#[derive(Debug, Serialize)]
pub(crate) struct RankResponse {
    pub(crate) entries: Vec<RankingEntry>,
}

pub(crate) fn with_contest_routes<R>(service: Arc<ContestService<R>>) -> axum::Router
where
    R: ContestRepository + 'static,
{
    let engine = Arc::new(service.engine().clone());
    contest_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/score", axum::routing::post(score_endpoint))
        .route("/api/v1/rank", axum::routing::post(rank_endpoint))
        .layer(Extension(engine))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Scores one prediction against the supplied match without touching storage.
pub(crate) async fn score_endpoint(
    Extension(engine): Extension<Arc<ScoringEngine>>,
    Json(payload): Json<ScoreRequest>,
) -> Json<PointResult> {
    Json(engine.score(&payload.prediction, &payload.fixture))
}

/// Ranks caller-supplied collections; nothing is read from or written to storage.
pub(crate) async fn rank_endpoint(
    Extension(engine): Extension<Arc<ScoringEngine>>,
    Json(payload): Json<RankRequest>,
) -> Json<RankResponse> {
    let RankRequest {
        participants,
        predictions,
        matches,
        position_policy,
    } = payload;

    let entries = rank_with(
        &engine,
        position_policy,
        &participants,
        &predictions,
        &matches,
    );
    Json(RankResponse { entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryContestRepository;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use pronos::contest::{
        MatchId, Outcome, ParticipantId, PredictedOutcome, PredictionId, Score, ScoringRules,
        TeamId, TournamentId, Winner,
    };
    use tower::ServiceExt;

    fn app_state(ready: bool) -> AppState {
        let handle = metrics_exporter_prometheus::PrometheusBuilder::new()
            .build_recorder()
            .handle();
        AppState {
            readiness: Arc::new(std::sync::atomic::AtomicBool::new(ready)),
            metrics: Arc::new(handle),
        }
    }

    fn app() -> axum::Router {
        let repository = Arc::new(InMemoryContestRepository::default());
        let service = Arc::new(ContestService::new(repository, ScoringRules::default()));
        with_contest_routes(service).layer(Extension(app_state(true)))
    }

    fn finished_match() -> Match {
        Match {
            id: MatchId::new("m1"),
            tournament_id: TournamentId::new("t1"),
            home: TeamId::new("fra"),
            away: TeamId::new("bra"),
            name: None,
            scheduled_for: None,
            outcome: Some(Outcome::new(Some(Score::new(1, 0)), Score::new(2, 1))),
        }
    }

    fn prediction(id: &str, participant: &str, full_time: Score) -> Prediction {
        Prediction {
            id: PredictionId::new(id),
            participant_id: ParticipantId::new(participant),
            match_id: MatchId::new("m1"),
            forecast: PredictedOutcome {
                winner: Some(Winner::Home),
                half_time: Some(Score::new(1, 0)),
                full_time: Some(full_time),
            },
            points: None,
        }
    }

    fn participant(id: &str) -> Participant {
        Participant {
            id: ParticipantId::new(id),
            name: id.to_uppercase(),
        }
    }

    #[tokio::test]
    async fn score_endpoint_returns_breakdown() {
        let request = ScoreRequest {
            prediction: prediction("p1", "alice", Score::new(2, 1)),
            fixture: finished_match(),
        };

        let Json(points) =
            score_endpoint(Extension(Arc::new(ScoringEngine::default())), Json(request)).await;

        assert_eq!(points.winner_correct, 1);
        assert_eq!(points.half_time_exact, 1);
        assert_eq!(points.full_time_exact, 2);
        assert_eq!(points.total, 4);
    }

    #[tokio::test]
    async fn rank_endpoint_orders_supplied_collections() {
        let request = RankRequest {
            participants: vec![participant("alice"), participant("bob")],
            predictions: vec![
                prediction("p1", "alice", Score::new(3, 0)),
                prediction("p2", "bob", Score::new(2, 1)),
            ],
            matches: vec![finished_match()],
            position_policy: PositionPolicy::Sequential,
        };

        let Json(body) =
            rank_endpoint(Extension(Arc::new(ScoringEngine::default())), Json(request)).await;

        let order: Vec<(&str, i32, usize)> = body
            .entries
            .iter()
            .map(|entry| {
                (
                    entry.participant.id.as_str(),
                    entry.total_points,
                    entry.position,
                )
            })
            .collect();
        assert_eq!(order, vec![("bob", 4, 1), ("alice", 2, 2)]);
    }

    #[tokio::test]
    async fn readiness_reports_initializing_until_flagged() {
        let state = app_state(false);

        let response = readiness_endpoint(Extension(state.clone()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        state
            .readiness
            .store(true, std::sync::atomic::Ordering::Release);
        let response = readiness_endpoint(Extension(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn merged_router_serves_health_and_stateless_scoring() {
        let response = app()
            .oneshot(
                Request::get("/health")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);

        let body = json!({
            "prediction": {
                "id": "p1",
                "participant_id": "alice",
                "match_id": "m1",
                "forecast": { "winner": "draw", "full_time": { "home": 5, "away": 0 } }
            },
            "match": {
                "id": "m1",
                "tournament_id": "t1",
                "home": "fra",
                "away": "bra",
                "outcome": {
                    "half_time": { "home": 1, "away": 0 },
                    "full_time": { "home": 2, "away": 1 }
                }
            }
        });
        let response = app()
            .oneshot(
                Request::post("/api/v1/score")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let points: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        // Draw pick waives the winner malus; full-time goal gap of 2 stays under the threshold.
        assert_eq!(points["total"], 0);
    }

    #[tokio::test]
    async fn merged_router_keeps_contest_routes() {
        let response = app()
            .oneshot(
                Request::get("/api/v1/tournaments")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        assert_eq!(&bytes[..], b"[]");
    }
}
