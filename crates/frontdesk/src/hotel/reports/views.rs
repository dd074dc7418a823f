use chrono::NaiveDate;
use serde::Serialize;

use crate::hotel::domain::{Room, RoomStatus};
use crate::hotel::reservations::{PaymentMethod, ReservationId};

/// Room inventory split by operational status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoomStatusCounts {
    pub available: usize,
    pub reserved: usize,
    pub occupied: usize,
    pub to_clean: usize,
    pub maintenance: usize,
}

impl RoomStatusCounts {
    pub fn tally(rooms: &[Room]) -> Self {
        let mut counts = Self::default();
        for room in rooms {
            match room.status {
                RoomStatus::Available => counts.available += 1,
                RoomStatus::Reserved => counts.reserved += 1,
                RoomStatus::Occupied => counts.occupied += 1,
                RoomStatus::ToClean => counts.to_clean += 1,
                RoomStatus::Maintenance => counts.maintenance += 1,
            }
        }
        counts
    }
}

/// Compact reservation line for the dashboard's recent list.
#[derive(Debug, Clone, Serialize)]
pub struct ReservationSnapshot {
    pub reservation_id: ReservationId,
    pub guest_name: String,
    pub room_number: Option<u32>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub status_label: &'static str,
    pub total: String,
}

/// The desk dashboard payload.
#[derive(Debug, Clone, Serialize)]
pub struct OperationsSummary {
    pub date: NaiveDate,
    pub total_rooms: usize,
    pub rooms: RoomStatusCounts,
    pub arrivals_due: usize,
    pub departures_due: usize,
    pub pending_reservations: usize,
    pub occupancy_pct: f32,
    pub recent_reservations: Vec<ReservationSnapshot>,
}

/// Takings for one payment method across the reported range.
#[derive(Debug, Clone, Serialize)]
pub struct MethodRevenue {
    pub method_label: &'static str,
    pub payments: usize,
    pub amount_cents: u32,
}

/// Takings for a single day, split by method.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub cash_cents: u32,
    pub card_cents: u32,
    pub online_cents: u32,
    pub total_cents: u32,
}

impl DailyRevenue {
    pub(crate) fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            cash_cents: 0,
            card_cents: 0,
            online_cents: 0,
            total_cents: 0,
        }
    }

    pub(crate) fn add(&mut self, method: PaymentMethod, amount_cents: u32) {
        match method {
            PaymentMethod::Cash => self.cash_cents = self.cash_cents.saturating_add(amount_cents),
            PaymentMethod::Card => self.card_cents = self.card_cents.saturating_add(amount_cents),
            PaymentMethod::Online => {
                self.online_cents = self.online_cents.saturating_add(amount_cents)
            }
        }
        self.total_cents = self.total_cents.saturating_add(amount_cents);
    }
}

/// Revenue over an inclusive date range, completed payments only.
#[derive(Debug, Clone, Serialize)]
pub struct RevenueReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub total_collected_cents: u32,
    pub by_method: Vec<MethodRevenue>,
    pub daily: Vec<DailyRevenue>,
}
