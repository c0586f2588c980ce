use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_application_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use freesite_intake::applications::{ApplicationService, SupabaseStore};
use freesite_intake::config::AppConfig;
use freesite_intake::error::AppError;
use freesite_intake::telemetry;
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

    let store = Arc::new(SupabaseStore::new(&config.store)?);
    info!(endpoint = %store.endpoint(), "application store configured");
    let application_service = Arc::new(ApplicationService::new(store, config.promotion));

    let app = with_application_routes(application_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        capacity = config.promotion.capacity,
        "application intake ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
