use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::fleet_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use fleet_upkeep::config::AppConfig;
use fleet_upkeep::error::AppError;
use fleet_upkeep::telemetry;
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        fleet: Arc::new(config.fleet.clone()),
    };

    let app = fleet_router()
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        default_sort = %config.fleet.default_sort,
        fleet_export = ?config.fleet.csv_path,
        "fleet urgency service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
