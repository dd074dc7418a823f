use crate::cli::ServeArgs;
use crate::demo::seed_demo_dataset;
use crate::infra::{bootstrap_admin, AppState, InMemorySessionStore, InMemoryUserDirectory};
use crate::routes::{api_router, ApiServices};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Local;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use frontdesk::auth::AuthService;
use frontdesk::config::AppConfig;
use frontdesk::error::AppError;
use frontdesk::hotel::memory::InMemoryHotelRepository;
use frontdesk::telemetry;
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

    let store = Arc::new(InMemoryHotelRepository::default());
    let directory = InMemoryUserDirectory::default();
    let sessions = InMemorySessionStore::default();

    let today = Local::now().date_naive();
    bootstrap_admin(&directory, today);

    let auth = Arc::new(AuthService::new(
        Arc::new(directory.clone()),
        Arc::new(sessions),
    ));
    let services = ApiServices::new(store, auth);

    if args.seed_demo {
        seed_demo_dataset(&services, &directory, today)?;
        info!("demo dataset seeded");
    }

    let app = api_router(&services)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "front desk service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
