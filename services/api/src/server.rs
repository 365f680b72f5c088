use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryLotRepository, InMemoryReportRepository, InMemoryTransactionRepository,
};
use crate::routes::with_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use vinecrest::config::AppConfig;
use vinecrest::error::AppError;
use vinecrest::telemetry;
use vinecrest::workflows::production::LotService;
use vinecrest::workflows::ttb::TtbReportService;

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

    let lot_service = Arc::new(LotService::new(
        Arc::new(InMemoryLotRepository::default()),
        config.readiness_config(),
    ));
    let report_service = Arc::new(TtbReportService::new(
        Arc::new(InMemoryTransactionRepository::default()),
        Arc::new(InMemoryReportRepository::default()),
    ));

    let app = with_routes(lot_service, report_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        min_bottling_gallons = config.rules.min_bottling_volume_gallons,
        "vinecrest api ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
