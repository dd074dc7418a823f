use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

use crate::auth::AuthError;
use crate::config::ConfigError;
use crate::hotel::guests::DirectoryError;
use crate::hotel::repository::RepositoryError;
use crate::hotel::reports::ReportError;
use crate::hotel::reservations::DeskError;
use crate::hotel::rooms::PropertyError;
use crate::telemetry::TelemetryError;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Auth(AuthError),
    Desk(DeskError),
    Property(PropertyError),
    Directory(DirectoryError),
    Report(ReportError),
    Repository(RepositoryError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Auth(err) => write!(f, "{}", err),
            AppError::Desk(err) => write!(f, "{}", err),
            AppError::Property(err) => write!(f, "{}", err),
            AppError::Directory(err) => write!(f, "{}", err),
            AppError::Report(err) => write!(f, "{}", err),
            AppError::Repository(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Auth(err) => Some(err),
            AppError::Desk(err) => Some(err),
            AppError::Property(err) => Some(err),
            AppError::Directory(err) => Some(err),
            AppError::Report(err) => Some(err),
            AppError::Repository(err) => Some(err),
        }
    }
}

fn repository_status(error: &RepositoryError) -> StatusCode {
    match error {
        RepositoryError::Conflict => StatusCode::CONFLICT,
        RepositoryError::NotFound => StatusCode::NOT_FOUND,
        RepositoryError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Auth(err) => match err {
                AuthError::InvalidCredentials
                | AuthError::AccountDisabled
                | AuthError::MissingToken
                | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
                AuthError::StaffOnly | AuthError::ManagerOnly | AuthError::GuestOnly => {
                    StatusCode::FORBIDDEN
                }
                AuthError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Desk(err) => match err {
                DeskError::UnknownGuest(_)
                | DeskError::UnknownRoom(_)
                | DeskError::UnknownReservation(_) => StatusCode::NOT_FOUND,
                DeskError::RoomUnavailable { .. } => StatusCode::CONFLICT,
                DeskError::Repository(inner) => repository_status(inner),
                DeskError::PartyTooLarge { .. }
                | DeskError::RoomOutOfService { .. }
                | DeskError::InvalidTransition { .. }
                | DeskError::OutstandingBalance { .. }
                | DeskError::AlreadySettled
                | DeskError::ZeroPayment
                | DeskError::Pricing(_) => StatusCode::UNPROCESSABLE_ENTITY,
            },
            AppError::Property(err) => match err {
                PropertyError::DuplicateRoomNumber(_) => StatusCode::CONFLICT,
                PropertyError::UnknownRoom(_) | PropertyError::UnknownSeason(_) => {
                    StatusCode::NOT_FOUND
                }
                PropertyError::Repository(inner) => repository_status(inner),
                PropertyError::InvalidRoomState { .. }
                | PropertyError::InvalidCapacity
                | PropertyError::InvalidSeasonRange { .. }
                | PropertyError::InvalidMultiplier(_) => StatusCode::UNPROCESSABLE_ENTITY,
            },
            AppError::Directory(err) => match err {
                DirectoryError::UnknownGuest(_) => StatusCode::NOT_FOUND,
                DirectoryError::Repository(inner) => repository_status(inner),
            },
            AppError::Report(err) => match err {
                ReportError::InvalidRange { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                ReportError::Csv(_) => StatusCode::INTERNAL_SERVER_ERROR,
                ReportError::Repository(inner) => repository_status(inner),
            },
            AppError::Repository(err) => repository_status(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<AuthError> for AppError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

impl From<DeskError> for AppError {
    fn from(value: DeskError) -> Self {
        Self::Desk(value)
    }
}

impl From<PropertyError> for AppError {
    fn from(value: PropertyError) -> Self {
        Self::Property(value)
    }
}

impl From<DirectoryError> for AppError {
    fn from(value: DirectoryError) -> Self {
        Self::Directory(value)
    }
}

impl From<ReportError> for AppError {
    fn from(value: ReportError) -> Self {
        Self::Report(value)
    }
}

impl From<RepositoryError> for AppError {
    fn from(value: RepositoryError) -> Self {
        Self::Repository(value)
    }
}
