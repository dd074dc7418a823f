use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{Local, NaiveDate};
use serde::Deserialize;

use crate::auth::AuthService;
use crate::error::AppError;
use crate::hotel::repository::HotelRepository;

use super::{revenue_csv, OperationsSummary, ReportService};

const DEFAULT_RECENT_LIMIT: usize = 10;

pub struct ReportState<S> {
    pub reports: Arc<ReportService<S>>,
    pub auth: Arc<AuthService>,
}

impl<S> Clone for ReportState<S> {
    fn clone(&self) -> Self {
        Self {
            reports: self.reports.clone(),
            auth: self.auth.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DashboardParams {
    date: Option<NaiveDate>,
    recent: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RevenueParams {
    from: NaiveDate,
    to: NaiveDate,
}

/// Dashboard for any staff member; revenue reporting for managers.
pub fn reports_router<S>(state: ReportState<S>) -> Router
where
    S: HotelRepository + 'static,
{
    Router::new()
        .route("/api/v1/desk/dashboard", get(dashboard_handler::<S>))
        .route("/api/v1/reports/revenue", get(revenue_handler::<S>))
        .route("/api/v1/reports/revenue.csv", get(revenue_csv_handler::<S>))
        .with_state(state)
}

async fn dashboard_handler<S>(
    State(state): State<ReportState<S>>,
    headers: HeaderMap,
    Query(params): Query<DashboardParams>,
) -> Result<Json<OperationsSummary>, AppError>
where
    S: HotelRepository + 'static,
{
    state.auth.require_staff(&headers)?;
    let date = params.date.unwrap_or_else(|| Local::now().date_naive());
    let recent = params.recent.unwrap_or(DEFAULT_RECENT_LIMIT);
    let summary = state.reports.operations_summary(date, recent)?;
    Ok(Json(summary))
}

async fn revenue_handler<S>(
    State(state): State<ReportState<S>>,
    headers: HeaderMap,
    Query(params): Query<RevenueParams>,
) -> Result<impl IntoResponse, AppError>
where
    S: HotelRepository + 'static,
{
    state.auth.require_manager(&headers)?;
    let report = state.reports.revenue_report(params.from, params.to)?;
    Ok(Json(report))
}

async fn revenue_csv_handler<S>(
    State(state): State<ReportState<S>>,
    headers: HeaderMap,
    Query(params): Query<RevenueParams>,
) -> Result<impl IntoResponse, AppError>
where
    S: HotelRepository + 'static,
{
    state.auth.require_manager(&headers)?;
    let report = state.reports.revenue_report(params.from, params.to)?;
    let csv = revenue_csv(&report)?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/csv")],
        csv,
    ))
}
