use crate::cli::ServeArgs;
use crate::infra::{evaluator_settings, language_model, AppState};
use crate::routes::with_evaluation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use cv_evaluator::config::AppConfig;
use cv_evaluator::error::AppError;
use cv_evaluator::telemetry;
use cv_evaluator::workflows::evaluation::EvaluationService;
use std::sync::atomic::{AtomicBool, Ordering};
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

    let settings = evaluator_settings(&config.evaluator)?;
    let model = language_model(&config.evaluator);
    let method = settings.method;
    let service = Arc::new(EvaluationService::new(settings, model));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        method,
    };

    let app = with_evaluation_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, method = method.label(), "cv evaluator ready");

    axum::serve(listener, app).await?;
    Ok(())
}
