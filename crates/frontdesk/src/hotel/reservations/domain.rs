use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::hotel::domain::{GuestId, RoomId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReservationId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PaymentId(pub u64);

/// Booking lifecycle. Active states hold a claim on the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    CheckedIn,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::CheckedIn => "Checked In",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Active reservations block conflicting stays and keep rooms claimed.
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed | Self::CheckedIn)
    }
}

/// Booking record linking a guest, a room, and a half-open stay
/// (`check_in` inclusive, `check_out` exclusive).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub guest_id: GuestId,
    pub room_id: RoomId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub party_size: u8,
    pub status: ReservationStatus,
    pub total_cents: u32,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Online,
}

impl PaymentMethod {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::Card => "Card",
            Self::Online => "Online",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
            Self::Refunded => "Refunded",
        }
    }
}

/// Money received against a reservation. Only `Completed` payments count
/// toward the balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub reservation_id: ReservationId,
    pub amount_cents: u32,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub paid_on: NaiveDate,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Inbound booking request, before validation and pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayRequest {
    pub guest_id: GuestId,
    pub room_id: RoomId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub party_size: u8,
    #[serde(default)]
    pub notes: String,
}

/// Desk payment entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub amount_cents: u32,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub paid_on: NaiveDate,
    #[serde(default)]
    pub transaction_id: Option<String>,
}

/// Ledger position of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StayBalance {
    pub total_cents: u32,
    pub paid_cents: u32,
    pub remaining_cents: u32,
    pub fully_paid: bool,
}

impl StayBalance {
    pub fn settle(total_cents: u32, payments: &[Payment]) -> Self {
        let paid: u64 = payments
            .iter()
            .filter(|payment| payment.status == PaymentStatus::Completed)
            .map(|payment| u64::from(payment.amount_cents))
            .sum();
        let paid_cents = paid.min(u64::from(u32::MAX)) as u32;
        let remaining_cents = total_cents.saturating_sub(paid_cents);

        Self {
            total_cents,
            paid_cents,
            remaining_cents,
            fully_paid: remaining_cents == 0,
        }
    }
}

/// Half-open interval overlap: stays touching only at a boundary do not
/// conflict (check-out morning frees the night for the next check-in).
pub fn stays_overlap(
    first_in: NaiveDate,
    first_out: NaiveDate,
    second_in: NaiveDate,
    second_out: NaiveDate,
) -> bool {
    first_in < second_out && first_out > second_in
}
