use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::auth::AuthService;
use crate::error::AppError;
use crate::hotel::domain::{format_cents, Room, RoomId, RoomStatus, RoomType, Season, SeasonPriceRule};
use crate::hotel::repository::HotelRepository;

use super::service::{NewPriceRule, NewRoom, NewSeason, PropertyService, RateCalendarEntry, RoomUpdate};

pub struct PropertyState<S> {
    pub property: Arc<PropertyService<S>>,
    pub auth: Arc<AuthService>,
}

impl<S> Clone for PropertyState<S> {
    fn clone(&self) -> Self {
        Self {
            property: self.property.clone(),
            auth: self.auth.clone(),
        }
    }
}

/// Room as exposed over HTTP. The door PIN stays server-side; it only
/// travels through check-in and pre-check-in responses.
#[derive(Debug, Clone, Serialize)]
pub struct RoomView {
    pub id: RoomId,
    pub number: u32,
    pub room_type: RoomType,
    pub room_type_label: &'static str,
    pub capacity: u8,
    pub nightly_rate: String,
    pub nightly_rate_cents: u32,
    pub status: RoomStatus,
    pub status_label: &'static str,
    pub notes: String,
}

impl From<&Room> for RoomView {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id,
            number: room.number,
            room_type: room.room_type,
            room_type_label: room.room_type.label(),
            capacity: room.capacity,
            nightly_rate: format_cents(room.nightly_rate_cents),
            nightly_rate_cents: room.nightly_rate_cents,
            status: room.status,
            status_label: room.status.label(),
            notes: room.notes.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct StatusUpdateRequest {
    status: RoomStatus,
}

#[derive(Debug, Serialize)]
struct SeasonView {
    season: Season,
    rules: Vec<SeasonPriceRule>,
}

impl From<RateCalendarEntry> for SeasonView {
    fn from(entry: RateCalendarEntry) -> Self {
        Self {
            season: entry.season,
            rules: entry.rules,
        }
    }
}

/// Room management and housekeeping for staff; rate calendar for managers.
pub fn property_router<S>(state: PropertyState<S>) -> Router
where
    S: HotelRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/desk/rooms",
            get(list_rooms_handler::<S>).post(create_room_handler::<S>),
        )
        .route("/api/v1/desk/rooms/:room_id", put(update_room_handler::<S>))
        .route(
            "/api/v1/desk/rooms/:room_id/status",
            put(set_status_handler::<S>),
        )
        .route(
            "/api/v1/desk/rooms/:room_id/clean",
            post(mark_clean_handler::<S>),
        )
        .route(
            "/api/v1/desk/rooms/:room_id/maintenance",
            post(open_maintenance_handler::<S>).delete(close_maintenance_handler::<S>),
        )
        .route(
            "/api/v1/desk/housekeeping",
            get(housekeeping_board_handler::<S>),
        )
        .route(
            "/api/v1/desk/pricing",
            get(rate_calendar_handler::<S>),
        )
        .route(
            "/api/v1/desk/pricing/seasons",
            post(create_season_handler::<S>),
        )
        .route(
            "/api/v1/desk/pricing/rules",
            post(add_price_rule_handler::<S>),
        )
        .with_state(state)
}

async fn list_rooms_handler<S>(
    State(state): State<PropertyState<S>>,
    headers: HeaderMap,
) -> Result<Json<Vec<RoomView>>, AppError>
where
    S: HotelRepository + 'static,
{
    state.auth.require_staff(&headers)?;
    let rooms = state.property.rooms()?;
    Ok(Json(rooms.iter().map(RoomView::from).collect()))
}

async fn create_room_handler<S>(
    State(state): State<PropertyState<S>>,
    headers: HeaderMap,
    Json(request): Json<NewRoom>,
) -> Result<(StatusCode, Json<RoomView>), AppError>
where
    S: HotelRepository + 'static,
{
    state.auth.require_staff(&headers)?;
    let room = state.property.create_room(request)?;
    Ok((StatusCode::CREATED, Json(RoomView::from(&room))))
}

async fn update_room_handler<S>(
    State(state): State<PropertyState<S>>,
    headers: HeaderMap,
    Path(room_id): Path<u64>,
    Json(update): Json<RoomUpdate>,
) -> Result<Json<RoomView>, AppError>
where
    S: HotelRepository + 'static,
{
    state.auth.require_staff(&headers)?;
    let room = state.property.update_room(RoomId(room_id), update)?;
    Ok(Json(RoomView::from(&room)))
}

async fn set_status_handler<S>(
    State(state): State<PropertyState<S>>,
    headers: HeaderMap,
    Path(room_id): Path<u64>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<Json<RoomView>, AppError>
where
    S: HotelRepository + 'static,
{
    state.auth.require_staff(&headers)?;
    let room = state
        .property
        .set_room_status(RoomId(room_id), request.status)?;
    Ok(Json(RoomView::from(&room)))
}

async fn mark_clean_handler<S>(
    State(state): State<PropertyState<S>>,
    headers: HeaderMap,
    Path(room_id): Path<u64>,
) -> Result<Json<RoomView>, AppError>
where
    S: HotelRepository + 'static,
{
    state.auth.require_staff(&headers)?;
    let room = state.property.mark_room_clean(RoomId(room_id))?;
    Ok(Json(RoomView::from(&room)))
}

async fn open_maintenance_handler<S>(
    State(state): State<PropertyState<S>>,
    headers: HeaderMap,
    Path(room_id): Path<u64>,
) -> Result<Json<RoomView>, AppError>
where
    S: HotelRepository + 'static,
{
    state.auth.require_staff(&headers)?;
    let room = state.property.open_maintenance(RoomId(room_id))?;
    Ok(Json(RoomView::from(&room)))
}

async fn close_maintenance_handler<S>(
    State(state): State<PropertyState<S>>,
    headers: HeaderMap,
    Path(room_id): Path<u64>,
) -> Result<Json<RoomView>, AppError>
where
    S: HotelRepository + 'static,
{
    state.auth.require_staff(&headers)?;
    let room = state.property.close_maintenance(RoomId(room_id))?;
    Ok(Json(RoomView::from(&room)))
}

async fn housekeeping_board_handler<S>(
    State(state): State<PropertyState<S>>,
    headers: HeaderMap,
) -> Result<Json<Vec<RoomView>>, AppError>
where
    S: HotelRepository + 'static,
{
    state.auth.require_staff(&headers)?;
    let rooms = state.property.housekeeping_board()?;
    Ok(Json(rooms.iter().map(RoomView::from).collect()))
}

async fn rate_calendar_handler<S>(
    State(state): State<PropertyState<S>>,
    headers: HeaderMap,
) -> Result<Json<Vec<SeasonView>>, AppError>
where
    S: HotelRepository + 'static,
{
    state.auth.require_manager(&headers)?;
    let calendar = state.property.rate_calendar()?;
    Ok(Json(calendar.into_iter().map(SeasonView::from).collect()))
}

async fn create_season_handler<S>(
    State(state): State<PropertyState<S>>,
    headers: HeaderMap,
    Json(request): Json<NewSeason>,
) -> Result<(StatusCode, Json<Season>), AppError>
where
    S: HotelRepository + 'static,
{
    state.auth.require_manager(&headers)?;
    let season = state.property.create_season(request)?;
    Ok((StatusCode::CREATED, Json(season)))
}

async fn add_price_rule_handler<S>(
    State(state): State<PropertyState<S>>,
    headers: HeaderMap,
    Json(request): Json<NewPriceRule>,
) -> Result<(StatusCode, Json<SeasonPriceRule>), AppError>
where
    S: HotelRepository + 'static,
{
    state.auth.require_manager(&headers)?;
    let rule = state.property.add_price_rule(request)?;
    Ok((StatusCode::CREATED, Json(rule)))
}
