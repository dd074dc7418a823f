//! Guest directory: staff-side search and detail plus the portal profile.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::AuthService;
use crate::error::AppError;
use crate::hotel::domain::{Guest, GuestId};
use crate::hotel::repository::{HotelRepository, RepositoryError};
use crate::hotel::reservations::Reservation;

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("guest {0:?} not found")]
    UnknownGuest(GuestId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewGuest {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: String,
}

/// Portal profile edit; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GuestProfileUpdate {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Staff view of a guest with their booking history, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct GuestDetail {
    pub guest: Guest,
    pub reservations: Vec<Reservation>,
}

static GUEST_SEQUENCE: AtomicU64 = AtomicU64::new(1);

pub struct DirectoryService<S> {
    store: Arc<S>,
}

impl<S> DirectoryService<S>
where
    S: HotelRepository + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn register_guest(&self, request: NewGuest) -> Result<Guest, DirectoryError> {
        let guest = Guest {
            id: GuestId(GUEST_SEQUENCE.fetch_add(1, Ordering::Relaxed)),
            name: request.name,
            surname: request.surname,
            email: request.email,
            phone: request.phone,
            created_at: Utc::now(),
        };
        Ok(self.store.insert_guest(guest)?)
    }

    /// Newest guests first, optionally narrowed by a case-insensitive
    /// substring over name, surname, and email.
    pub fn guests(&self, search: Option<&str>) -> Result<Vec<Guest>, DirectoryError> {
        let mut guests = self.store.guests()?;
        if let Some(needle) = search.map(str::to_lowercase).filter(|s| !s.is_empty()) {
            guests.retain(|guest| {
                guest.name.to_lowercase().contains(&needle)
                    || guest.surname.to_lowercase().contains(&needle)
                    || guest.email.to_lowercase().contains(&needle)
            });
        }
        guests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(guests)
    }

    pub fn guest_detail(&self, id: GuestId) -> Result<GuestDetail, DirectoryError> {
        let guest = self.require_guest(id)?;
        let mut reservations = self.store.reservations_for_guest(id)?;
        reservations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(GuestDetail {
            guest,
            reservations,
        })
    }

    pub fn profile(&self, id: GuestId) -> Result<Guest, DirectoryError> {
        self.require_guest(id)
    }

    pub fn update_profile(
        &self,
        id: GuestId,
        update: GuestProfileUpdate,
    ) -> Result<Guest, DirectoryError> {
        let mut guest = self.require_guest(id)?;
        if let Some(name) = update.name {
            guest.name = name;
        }
        if let Some(surname) = update.surname {
            guest.surname = surname;
        }
        if let Some(email) = update.email {
            guest.email = email;
        }
        if let Some(phone) = update.phone {
            guest.phone = phone;
        }
        self.store.update_guest(guest.clone())?;
        Ok(guest)
    }

    fn require_guest(&self, id: GuestId) -> Result<Guest, DirectoryError> {
        self.store
            .guest(id)?
            .ok_or(DirectoryError::UnknownGuest(id))
    }
}

pub struct DirectoryState<S> {
    pub directory: Arc<DirectoryService<S>>,
    pub auth: Arc<AuthService>,
}

impl<S> Clone for DirectoryState<S> {
    fn clone(&self) -> Self {
        Self {
            directory: self.directory.clone(),
            auth: self.auth.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GuestListParams {
    search: Option<String>,
}

/// Staff directory endpoints plus the guest-facing profile pair.
pub fn directory_router<S>(state: DirectoryState<S>) -> Router
where
    S: HotelRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/desk/guests",
            get(list_guests_handler::<S>).post(register_guest_handler::<S>),
        )
        .route("/api/v1/desk/guests/:guest_id", get(guest_detail_handler::<S>))
        .route(
            "/api/v1/portal/profile",
            get(profile_handler::<S>).put(update_profile_handler::<S>),
        )
        .with_state(state)
}

async fn list_guests_handler<S>(
    State(state): State<DirectoryState<S>>,
    headers: HeaderMap,
    Query(params): Query<GuestListParams>,
) -> Result<Json<Vec<Guest>>, AppError>
where
    S: HotelRepository + 'static,
{
    state.auth.require_staff(&headers)?;
    let guests = state.directory.guests(params.search.as_deref())?;
    Ok(Json(guests))
}

async fn register_guest_handler<S>(
    State(state): State<DirectoryState<S>>,
    headers: HeaderMap,
    Json(request): Json<NewGuest>,
) -> Result<Json<Guest>, AppError>
where
    S: HotelRepository + 'static,
{
    state.auth.require_staff(&headers)?;
    let guest = state.directory.register_guest(request)?;
    Ok(Json(guest))
}

async fn guest_detail_handler<S>(
    State(state): State<DirectoryState<S>>,
    headers: HeaderMap,
    Path(guest_id): Path<u64>,
) -> Result<Json<GuestDetail>, AppError>
where
    S: HotelRepository + 'static,
{
    state.auth.require_staff(&headers)?;
    let detail = state.directory.guest_detail(GuestId(guest_id))?;
    Ok(Json(detail))
}

async fn profile_handler<S>(
    State(state): State<DirectoryState<S>>,
    headers: HeaderMap,
) -> Result<Json<Guest>, AppError>
where
    S: HotelRepository + 'static,
{
    let guest_id = state.auth.require_guest(&headers)?;
    let guest = state.directory.profile(guest_id)?;
    Ok(Json(guest))
}

async fn update_profile_handler<S>(
    State(state): State<DirectoryState<S>>,
    headers: HeaderMap,
    Json(update): Json<GuestProfileUpdate>,
) -> Result<Json<Guest>, AppError>
where
    S: HotelRepository + 'static,
{
    let guest_id = state.auth.require_guest(&headers)?;
    let guest = state.directory.update_profile(guest_id, update)?;
    Ok(Json(guest))
}
