use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryContestRepository};
use crate::routes::with_contest_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use pronos::config::AppConfig;
use pronos::contest::{ContestService, JsonFileRepository, ScoringRules};
use pronos::error::AppError;
use pronos::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let routes = match &config.storage.data_dir {
        Some(dir) => {
            let repository = Arc::new(JsonFileRepository::open(dir)?);
            info!(data_dir = %dir.display(), "contest collections stored on disk");
            with_contest_routes(Arc::new(ContestService::new(
                repository,
                ScoringRules::default(),
            )))
        }
        None => {
            let repository = Arc::new(InMemoryContestRepository::default());
            info!("contest collections kept in memory");
            with_contest_routes(Arc::new(ContestService::new(
                repository,
                ScoringRules::default(),
            )))
        }
    };

    let app = routes
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "prediction contest service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
