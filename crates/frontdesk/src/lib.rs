//! Core library for the hotel front desk service: domain model, seasonal
//! pricing, the reservation lifecycle, housekeeping, reporting, and the
//! HTTP routers the API binary composes.

pub mod auth;
pub mod config;
pub mod error;
pub mod hotel;
pub mod telemetry;
