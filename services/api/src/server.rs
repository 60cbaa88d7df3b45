use crate::cli::ServeArgs;
use crate::infra::{build_service, AppState};
use crate::routes::with_quiz_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use quiz_funnel::config::AppConfig;
use quiz_funnel::error::AppError;
use quiz_funnel::telemetry;
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

    let bank = config.funnel.question_bank()?;
    info!(
        questions = bank.len(),
        per_category = bank.questions_per_category(),
        custom_bank = config.funnel.question_bank_path.is_some(),
        "question bank loaded"
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let (service, _outbox) = build_service(bank, config.funnel.settings());

    let app = with_quiz_routes(Arc::new(service))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "quiz funnel ready");

    axum::serve(listener, app).await?;
    Ok(())
}
