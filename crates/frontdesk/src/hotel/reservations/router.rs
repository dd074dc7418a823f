use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::AuthService;
use crate::error::AppError;
use crate::hotel::domain::{format_cents, GuestId, RoomId};
use crate::hotel::pricing::StayQuote;
use crate::hotel::repository::HotelRepository;
use crate::hotel::rooms::RoomView;

use super::domain::{
    Payment, PaymentRequest, Reservation, ReservationId, ReservationStatus, StayBalance,
    StayRequest,
};
use super::service::{DeskError, DeskService};

pub struct ReservationState<S> {
    pub desk: Arc<DeskService<S>>,
    pub auth: Arc<AuthService>,
}

impl<S> Clone for ReservationState<S> {
    fn clone(&self) -> Self {
        Self {
            desk: self.desk.clone(),
            auth: self.auth.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReservationView {
    pub id: ReservationId,
    pub guest_id: GuestId,
    pub room_id: RoomId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: i64,
    pub party_size: u8,
    pub status: ReservationStatus,
    pub status_label: &'static str,
    pub total: String,
    pub total_cents: u32,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Reservation> for ReservationView {
    fn from(reservation: &Reservation) -> Self {
        Self {
            id: reservation.id,
            guest_id: reservation.guest_id,
            room_id: reservation.room_id,
            check_in: reservation.check_in,
            check_out: reservation.check_out,
            nights: reservation.nights(),
            party_size: reservation.party_size,
            status: reservation.status,
            status_label: reservation.status.label(),
            total: format_cents(reservation.total_cents),
            total_cents: reservation.total_cents,
            notes: reservation.notes.clone(),
            created_at: reservation.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentView {
    pub id: u64,
    pub amount: String,
    pub amount_cents: u32,
    pub method_label: &'static str,
    pub status_label: &'static str,
    pub paid_on: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

impl From<&Payment> for PaymentView {
    fn from(payment: &Payment) -> Self {
        Self {
            id: payment.id.0,
            amount: format_cents(payment.amount_cents),
            amount_cents: payment.amount_cents,
            method_label: payment.method.label(),
            status_label: payment.status.label(),
            paid_on: payment.paid_on,
            transaction_id: payment.transaction_id.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReservationDetailView {
    pub reservation: ReservationView,
    pub payments: Vec<PaymentView>,
    pub balance: StayBalance,
}

#[derive(Debug, Serialize)]
struct PortalDashboardView {
    recent: Vec<ReservationView>,
    upcoming: Vec<ReservationView>,
}

#[derive(Debug, Serialize)]
struct DoorAccessView {
    reservation_id: ReservationId,
    room_number: u32,
    door_pin: String,
}

#[derive(Debug, Serialize)]
struct CheckInView {
    reservation: ReservationView,
    door_pin: String,
}

#[derive(Debug, Serialize)]
struct SettlementView {
    reservation: ReservationView,
    payment: PaymentView,
}

#[derive(Debug, Deserialize)]
struct AvailabilityParams {
    check_in: NaiveDate,
    check_out: NaiveDate,
    capacity: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct ReservationListParams {
    status: Option<ReservationStatus>,
}

#[derive(Debug, Deserialize)]
struct QuoteParams {
    room_id: u64,
    check_in: NaiveDate,
    check_out: NaiveDate,
}

#[derive(Debug, Deserialize)]
struct PublicAccessParams {
    email: String,
}

#[derive(Debug, Deserialize)]
struct PublicActionRequest {
    email: String,
}

/// Booking request as submitted from the guest portal; the guest comes from
/// the session, never the payload.
#[derive(Debug, Deserialize)]
struct PortalReservationRequest {
    room_id: u64,
    check_in: NaiveDate,
    check_out: NaiveDate,
    party_size: u8,
    #[serde(default)]
    notes: String,
}

const PORTAL_RECENT_LIMIT: usize = 5;

/// Self-service endpoints for authenticated guests.
pub fn portal_router<S>(state: ReservationState<S>) -> Router
where
    S: HotelRepository + 'static,
{
    Router::new()
        .route("/api/v1/portal/dashboard", get(portal_dashboard_handler::<S>))
        .route(
            "/api/v1/portal/reservations",
            get(portal_reservations_handler::<S>).post(portal_create_handler::<S>),
        )
        .route(
            "/api/v1/portal/reservations/:reservation_id",
            get(portal_reservation_detail_handler::<S>),
        )
        .route(
            "/api/v1/portal/rooms/available",
            get(portal_availability_handler::<S>),
        )
        .with_state(state)
}

/// Unauthenticated endpoints: availability search plus email-gated
/// reservation access (detail, pre-check-in, online payment).
pub fn public_router<S>(state: ReservationState<S>) -> Router
where
    S: HotelRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/public/rooms/availability",
            get(public_availability_handler::<S>),
        )
        .route(
            "/api/v1/public/reservations/:reservation_id",
            get(public_reservation_handler::<S>),
        )
        .route(
            "/api/v1/public/reservations/:reservation_id/precheckin",
            post(public_precheckin_handler::<S>),
        )
        .route(
            "/api/v1/public/reservations/:reservation_id/pay",
            post(public_payment_handler::<S>),
        )
        .with_state(state)
}

/// Staff-side reservation management.
pub fn desk_reservations_router<S>(state: ReservationState<S>) -> Router
where
    S: HotelRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/desk/reservations",
            get(desk_list_handler::<S>).post(desk_create_handler::<S>),
        )
        .route(
            "/api/v1/desk/reservations/:reservation_id",
            get(desk_detail_handler::<S>).delete(desk_delete_handler::<S>),
        )
        .route(
            "/api/v1/desk/reservations/:reservation_id/confirm",
            post(desk_confirm_handler::<S>),
        )
        .route(
            "/api/v1/desk/reservations/:reservation_id/cancel",
            post(desk_cancel_handler::<S>),
        )
        .route(
            "/api/v1/desk/reservations/:reservation_id/checkin",
            post(desk_checkin_handler::<S>),
        )
        .route(
            "/api/v1/desk/reservations/:reservation_id/checkout",
            post(desk_checkout_handler::<S>),
        )
        .route(
            "/api/v1/desk/reservations/:reservation_id/payments",
            get(desk_payments_handler::<S>).post(desk_record_payment_handler::<S>),
        )
        .route("/api/v1/desk/quote", get(desk_quote_handler::<S>))
        .with_state(state)
}

async fn portal_dashboard_handler<S>(
    State(state): State<ReservationState<S>>,
    headers: HeaderMap,
) -> Result<Json<PortalDashboardView>, AppError>
where
    S: HotelRepository + 'static,
{
    let guest_id = state.auth.require_guest(&headers)?;
    let reservations = state.desk.reservations_for_guest(guest_id)?;
    let today = Local::now().date_naive();

    let recent = reservations
        .iter()
        .take(PORTAL_RECENT_LIMIT)
        .map(ReservationView::from)
        .collect();
    let mut upcoming: Vec<&Reservation> = reservations
        .iter()
        .filter(|r| {
            r.check_in >= today
                && matches!(
                    r.status,
                    ReservationStatus::Pending | ReservationStatus::Confirmed
                )
        })
        .collect();
    upcoming.sort_by_key(|r| r.check_in);

    Ok(Json(PortalDashboardView {
        recent,
        upcoming: upcoming.into_iter().map(ReservationView::from).collect(),
    }))
}

async fn portal_reservations_handler<S>(
    State(state): State<ReservationState<S>>,
    headers: HeaderMap,
) -> Result<Json<Vec<ReservationView>>, AppError>
where
    S: HotelRepository + 'static,
{
    let guest_id = state.auth.require_guest(&headers)?;
    let reservations = state.desk.reservations_for_guest(guest_id)?;
    Ok(Json(reservations.iter().map(ReservationView::from).collect()))
}

async fn portal_create_handler<S>(
    State(state): State<ReservationState<S>>,
    headers: HeaderMap,
    Json(request): Json<PortalReservationRequest>,
) -> Result<(StatusCode, Json<ReservationView>), AppError>
where
    S: HotelRepository + 'static,
{
    let guest_id = state.auth.require_guest(&headers)?;
    let reservation = state.desk.create_reservation(StayRequest {
        guest_id,
        room_id: RoomId(request.room_id),
        check_in: request.check_in,
        check_out: request.check_out,
        party_size: request.party_size,
        notes: request.notes,
    })?;
    Ok((
        StatusCode::CREATED,
        Json(ReservationView::from(&reservation)),
    ))
}

async fn portal_reservation_detail_handler<S>(
    State(state): State<ReservationState<S>>,
    headers: HeaderMap,
    Path(reservation_id): Path<u64>,
) -> Result<Json<ReservationDetailView>, AppError>
where
    S: HotelRepository + 'static,
{
    let guest_id = state.auth.require_guest(&headers)?;
    let id = ReservationId(reservation_id);
    let reservation = state.desk.reservation(id)?;
    // A guest can only open their own bookings; anything else reads as absent.
    if reservation.guest_id != guest_id {
        return Err(DeskError::UnknownReservation(id).into());
    }
    detail_view(&state, &reservation).map(Json)
}

async fn portal_availability_handler<S>(
    State(state): State<ReservationState<S>>,
    headers: HeaderMap,
    Query(params): Query<AvailabilityParams>,
) -> Result<Json<Vec<RoomView>>, AppError>
where
    S: HotelRepository + 'static,
{
    state.auth.require_guest(&headers)?;
    availability(&state, params)
}

async fn public_availability_handler<S>(
    State(state): State<ReservationState<S>>,
    Query(params): Query<AvailabilityParams>,
) -> Result<Json<Vec<RoomView>>, AppError>
where
    S: HotelRepository + 'static,
{
    availability(&state, params)
}

async fn public_reservation_handler<S>(
    State(state): State<ReservationState<S>>,
    Path(reservation_id): Path<u64>,
    Query(params): Query<PublicAccessParams>,
) -> Result<Json<ReservationDetailView>, AppError>
where
    S: HotelRepository + 'static,
{
    let reservation = state
        .desk
        .public_reservation(ReservationId(reservation_id), &params.email)?;
    detail_view(&state, &reservation).map(Json)
}

async fn public_precheckin_handler<S>(
    State(state): State<ReservationState<S>>,
    Path(reservation_id): Path<u64>,
    Json(request): Json<PublicActionRequest>,
) -> Result<Json<DoorAccessView>, AppError>
where
    S: HotelRepository + 'static,
{
    let access = state
        .desk
        .pre_checkin(ReservationId(reservation_id), &request.email)?;
    Ok(Json(DoorAccessView {
        reservation_id: access.reservation_id,
        room_number: access.room_number,
        door_pin: access.door_pin,
    }))
}

async fn public_payment_handler<S>(
    State(state): State<ReservationState<S>>,
    Path(reservation_id): Path<u64>,
    Json(request): Json<PublicActionRequest>,
) -> Result<Json<SettlementView>, AppError>
where
    S: HotelRepository + 'static,
{
    let id = ReservationId(reservation_id);
    let payment = state
        .desk
        .settle_online(id, &request.email, Local::now().date_naive())?;
    let reservation = state.desk.reservation(id)?;
    Ok(Json(SettlementView {
        reservation: ReservationView::from(&reservation),
        payment: PaymentView::from(&payment),
    }))
}

#[derive(Debug, Serialize)]
struct DeskReservationEntry {
    reservation: ReservationView,
    balance: StayBalance,
}

async fn desk_list_handler<S>(
    State(state): State<ReservationState<S>>,
    headers: HeaderMap,
    Query(params): Query<ReservationListParams>,
) -> Result<Json<Vec<DeskReservationEntry>>, AppError>
where
    S: HotelRepository + 'static,
{
    state.auth.require_staff(&headers)?;
    let reservations = state.desk.reservations(params.status)?;
    let mut entries = Vec::with_capacity(reservations.len());
    for reservation in &reservations {
        entries.push(DeskReservationEntry {
            reservation: ReservationView::from(reservation),
            balance: state.desk.balance(reservation.id)?,
        });
    }
    Ok(Json(entries))
}

async fn desk_create_handler<S>(
    State(state): State<ReservationState<S>>,
    headers: HeaderMap,
    Json(request): Json<StayRequest>,
) -> Result<(StatusCode, Json<ReservationView>), AppError>
where
    S: HotelRepository + 'static,
{
    state.auth.require_staff(&headers)?;
    let reservation = state.desk.create_reservation(request)?;
    Ok((
        StatusCode::CREATED,
        Json(ReservationView::from(&reservation)),
    ))
}

async fn desk_detail_handler<S>(
    State(state): State<ReservationState<S>>,
    headers: HeaderMap,
    Path(reservation_id): Path<u64>,
) -> Result<Json<ReservationDetailView>, AppError>
where
    S: HotelRepository + 'static,
{
    state.auth.require_staff(&headers)?;
    let reservation = state.desk.reservation(ReservationId(reservation_id))?;
    detail_view(&state, &reservation).map(Json)
}

async fn desk_delete_handler<S>(
    State(state): State<ReservationState<S>>,
    headers: HeaderMap,
    Path(reservation_id): Path<u64>,
) -> Result<StatusCode, AppError>
where
    S: HotelRepository + 'static,
{
    state.auth.require_staff(&headers)?;
    state.desk.delete_reservation(ReservationId(reservation_id))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn desk_confirm_handler<S>(
    State(state): State<ReservationState<S>>,
    headers: HeaderMap,
    Path(reservation_id): Path<u64>,
) -> Result<Json<ReservationView>, AppError>
where
    S: HotelRepository + 'static,
{
    state.auth.require_staff(&headers)?;
    let reservation = state
        .desk
        .confirm_reservation(ReservationId(reservation_id))?;
    Ok(Json(ReservationView::from(&reservation)))
}

async fn desk_cancel_handler<S>(
    State(state): State<ReservationState<S>>,
    headers: HeaderMap,
    Path(reservation_id): Path<u64>,
) -> Result<Json<ReservationView>, AppError>
where
    S: HotelRepository + 'static,
{
    state.auth.require_staff(&headers)?;
    let reservation = state
        .desk
        .cancel_reservation(ReservationId(reservation_id))?;
    Ok(Json(ReservationView::from(&reservation)))
}

async fn desk_checkin_handler<S>(
    State(state): State<ReservationState<S>>,
    headers: HeaderMap,
    Path(reservation_id): Path<u64>,
) -> Result<Json<CheckInView>, AppError>
where
    S: HotelRepository + 'static,
{
    state.auth.require_staff(&headers)?;
    let outcome = state.desk.check_in_guest(ReservationId(reservation_id))?;
    Ok(Json(CheckInView {
        reservation: ReservationView::from(&outcome.reservation),
        door_pin: outcome.door_pin,
    }))
}

async fn desk_checkout_handler<S>(
    State(state): State<ReservationState<S>>,
    headers: HeaderMap,
    Path(reservation_id): Path<u64>,
) -> Result<Json<ReservationView>, AppError>
where
    S: HotelRepository + 'static,
{
    state.auth.require_staff(&headers)?;
    let reservation = state
        .desk
        .check_out_guest(ReservationId(reservation_id))?;
    Ok(Json(ReservationView::from(&reservation)))
}

async fn desk_payments_handler<S>(
    State(state): State<ReservationState<S>>,
    headers: HeaderMap,
    Path(reservation_id): Path<u64>,
) -> Result<Json<Vec<PaymentView>>, AppError>
where
    S: HotelRepository + 'static,
{
    state.auth.require_staff(&headers)?;
    let payments = state.desk.payments(ReservationId(reservation_id))?;
    Ok(Json(payments.iter().map(PaymentView::from).collect()))
}

async fn desk_record_payment_handler<S>(
    State(state): State<ReservationState<S>>,
    headers: HeaderMap,
    Path(reservation_id): Path<u64>,
    Json(request): Json<PaymentRequest>,
) -> Result<(StatusCode, Json<PaymentView>), AppError>
where
    S: HotelRepository + 'static,
{
    state.auth.require_staff(&headers)?;
    let payment = state
        .desk
        .record_payment(ReservationId(reservation_id), request)?;
    Ok((StatusCode::CREATED, Json(PaymentView::from(&payment))))
}

async fn desk_quote_handler<S>(
    State(state): State<ReservationState<S>>,
    headers: HeaderMap,
    Query(params): Query<QuoteParams>,
) -> Result<Json<StayQuote>, AppError>
where
    S: HotelRepository + 'static,
{
    state.auth.require_staff(&headers)?;
    let quote = state
        .desk
        .quote(RoomId(params.room_id), params.check_in, params.check_out)?;
    Ok(Json(quote))
}

fn availability<S>(
    state: &ReservationState<S>,
    params: AvailabilityParams,
) -> Result<Json<Vec<RoomView>>, AppError>
where
    S: HotelRepository + 'static,
{
    let rooms = state
        .desk
        .available_rooms(params.check_in, params.check_out, params.capacity)?;
    Ok(Json(rooms.iter().map(RoomView::from).collect()))
}

fn detail_view<S>(
    state: &ReservationState<S>,
    reservation: &Reservation,
) -> Result<ReservationDetailView, AppError>
where
    S: HotelRepository + 'static,
{
    let payments = state.desk.payments(reservation.id)?;
    let balance = state.desk.balance(reservation.id)?;
    Ok(ReservationDetailView {
        reservation: ReservationView::from(reservation),
        payments: payments.iter().map(PaymentView::from).collect(),
        balance,
    })
}
