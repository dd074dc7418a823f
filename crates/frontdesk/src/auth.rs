//! Token-based sessions and role gating for the portal and desk APIs.
//!
//! A principal is either a registered guest or a staff member; routes ask the
//! [`AuthService`] for the flavor they need and translate the error into
//! 401/403 responses.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::hotel::domain::{Employee, GuestId, StaffRole};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("account is disabled")]
    AccountDisabled,
    #[error("missing bearer token")]
    MissingToken,
    #[error("session is not valid")]
    InvalidToken,
    #[error("staff access required")]
    StaffOnly,
    #[error("manager access required")]
    ManagerOnly,
    #[error("guest access required")]
    GuestOnly,
    #[error("auth backend unavailable: {0}")]
    Unavailable(String),
}

/// Who a session belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Principal {
    Guest { guest_id: GuestId },
    Staff { employee: Employee },
}

impl Principal {
    pub fn role(&self) -> Option<StaffRole> {
        match self {
            Principal::Guest { .. } => None,
            Principal::Staff { employee } => Some(employee.role),
        }
    }
}

/// Login credential paired with the principal it unlocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub username: String,
    pub password: String,
    pub principal: Principal,
}

/// Lookup of login accounts, kept behind a trait so tests and the in-memory
/// service share the same auth path.
pub trait UserDirectory: Send + Sync {
    fn find(&self, username: &str) -> Result<Option<UserAccount>, AuthError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken(pub String);

/// Active session storage. Tokens are opaque; expiry policy belongs to the
/// implementation.
pub trait SessionStore: Send + Sync {
    fn open(&self, principal: Principal) -> Result<SessionToken, AuthError>;
    fn resolve(&self, token: &str) -> Result<Option<Principal>, AuthError>;
    fn close(&self, token: &str) -> Result<(), AuthError>;
}

/// 128 random bits, hex-encoded.
pub fn issue_token() -> String {
    format!("{:032x}", rand::rng().random::<u128>())
}

// Comparison must not short-circuit on the first mismatched byte.
fn password_matches(expected: &str, provided: &str) -> bool {
    let expected = expected.as_bytes();
    let provided = provided.as_bytes();
    if expected.len() != provided.len() {
        return false;
    }
    expected
        .iter()
        .zip(provided)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Login, logout, and per-request gating over a directory and session store.
pub struct AuthService {
    directory: Arc<dyn UserDirectory>,
    sessions: Arc<dyn SessionStore>,
}

impl AuthService {
    pub fn new(directory: Arc<dyn UserDirectory>, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            directory,
            sessions,
        }
    }

    pub fn login(&self, username: &str, password: &str) -> Result<SessionToken, AuthError> {
        let account = self
            .directory
            .find(username)?
            .ok_or(AuthError::InvalidCredentials)?;
        if !password_matches(&account.password, password) {
            return Err(AuthError::InvalidCredentials);
        }
        if let Principal::Staff { employee } = &account.principal {
            if !employee.active {
                return Err(AuthError::AccountDisabled);
            }
        }

        let token = self.sessions.open(account.principal)?;
        tracing::info!(%username, "session opened");
        Ok(token)
    }

    pub fn logout(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        let token = bearer_token(headers).ok_or(AuthError::MissingToken)?;
        self.sessions.close(token)
    }

    pub fn principal(&self, headers: &HeaderMap) -> Result<Principal, AuthError> {
        let token = bearer_token(headers).ok_or(AuthError::MissingToken)?;
        self.sessions
            .resolve(token)?
            .ok_or(AuthError::InvalidToken)
    }

    pub fn require_guest(&self, headers: &HeaderMap) -> Result<GuestId, AuthError> {
        match self.principal(headers)? {
            Principal::Guest { guest_id } => Ok(guest_id),
            Principal::Staff { .. } => Err(AuthError::GuestOnly),
        }
    }

    pub fn require_staff(&self, headers: &HeaderMap) -> Result<Employee, AuthError> {
        match self.principal(headers)? {
            Principal::Staff { employee } => Ok(employee),
            Principal::Guest { .. } => Err(AuthError::StaffOnly),
        }
    }

    pub fn require_manager(&self, headers: &HeaderMap) -> Result<Employee, AuthError> {
        let employee = self.require_staff(headers)?;
        if !employee.role.is_managerial() {
            return Err(AuthError::ManagerOnly);
        }
        Ok(employee)
    }
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

pub fn auth_router(auth: Arc<AuthService>) -> Router {
    Router::new()
        .route("/api/v1/auth/login", post(login_handler))
        .route("/api/v1/auth/logout", post(logout_handler))
        .with_state(auth)
}

async fn login_handler(
    State(auth): State<Arc<AuthService>>,
    Json(request): Json<LoginRequest>,
) -> Response {
    match auth.login(&request.username, &request.password) {
        Ok(token) => (StatusCode::OK, Json(json!({ "token": token.0 }))).into_response(),
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
        }
    }
}

async fn logout_handler(State(auth): State<Arc<AuthService>>, headers: HeaderMap) -> Response {
    match auth.logout(&headers) {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "logged_out" }))).into_response(),
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
        }
    }
}
