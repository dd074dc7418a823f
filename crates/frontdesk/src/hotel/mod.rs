//! Hotel operations: shared domain model, seasonal pricing, the reservation
//! lifecycle, room inventory and housekeeping, the guest directory, and
//! reporting.

pub mod domain;
pub mod guests;
pub mod memory;
pub mod pricing;
pub mod repository;
pub mod reports;
pub mod reservations;
pub mod rooms;
