use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::json;
use std::sync::Arc;

use frontdesk::auth::{auth_router, AuthService};
use frontdesk::hotel::guests::{directory_router, DirectoryService, DirectoryState};
use frontdesk::hotel::repository::HotelRepository;
use frontdesk::hotel::reports::{reports_router, ReportService, ReportState};
use frontdesk::hotel::reservations::{
    desk_reservations_router, portal_router, public_router, DeskService, ReservationState,
};
use frontdesk::hotel::rooms::{property_router, PropertyService, PropertyState};

/// Everything the HTTP layer needs, built once over a shared store.
pub(crate) struct ApiServices<S> {
    pub(crate) desk: Arc<DeskService<S>>,
    pub(crate) property: Arc<PropertyService<S>>,
    pub(crate) directory: Arc<DirectoryService<S>>,
    pub(crate) reports: Arc<ReportService<S>>,
    pub(crate) auth: Arc<AuthService>,
}

impl<S> ApiServices<S>
where
    S: HotelRepository + 'static,
{
    pub(crate) fn new(store: Arc<S>, auth: Arc<AuthService>) -> Self {
        Self {
            desk: Arc::new(DeskService::new(store.clone())),
            property: Arc::new(PropertyService::new(store.clone())),
            directory: Arc::new(DirectoryService::new(store.clone())),
            reports: Arc::new(ReportService::new(store)),
            auth,
        }
    }
}

/// Compose the full API surface plus the health endpoints.
pub(crate) fn api_router<S>(services: &ApiServices<S>) -> Router
where
    S: HotelRepository + 'static,
{
    let reservations = ReservationState {
        desk: services.desk.clone(),
        auth: services.auth.clone(),
    };

    Router::new()
        .merge(auth_router(services.auth.clone()))
        .merge(portal_router(reservations.clone()))
        .merge(public_router(reservations.clone()))
        .merge(desk_reservations_router(reservations))
        .merge(property_router(PropertyState {
            property: services.property.clone(),
            auth: services.auth.clone(),
        }))
        .merge(directory_router(DirectoryState {
            directory: services.directory.clone(),
            auth: services.auth.clone(),
        }))
        .merge(reports_router(ReportState {
            reports: services.reports.clone(),
            auth: services.auth.clone(),
        }))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
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
