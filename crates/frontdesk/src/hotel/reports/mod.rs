//! Operational and financial reporting for the desk dashboard and managers.

mod export;
mod router;
mod views;

pub use export::revenue_csv;
pub use router::{reports_router, ReportState};
pub use views::{
    DailyRevenue, MethodRevenue, OperationsSummary, ReservationSnapshot, RevenueReport,
    RoomStatusCounts,
};

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;

use super::domain::format_cents;
use super::repository::{HotelRepository, RepositoryError};
use super::reservations::{PaymentMethod, PaymentStatus, ReservationStatus};

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("report range must start on or before its end ({from} -> {to})")]
    InvalidRange { from: NaiveDate, to: NaiveDate },
    #[error("csv export failed: {0}")]
    Csv(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Read-only aggregation over the repository; nothing here mutates state.
pub struct ReportService<S> {
    store: Arc<S>,
}

impl<S> ReportService<S>
where
    S: HotelRepository + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// The desk dashboard numbers for one date.
    pub fn operations_summary(
        &self,
        date: NaiveDate,
        recent_limit: usize,
    ) -> Result<OperationsSummary, ReportError> {
        let rooms = self.store.rooms()?;
        let mut reservations = self.store.reservations()?;

        let counts = RoomStatusCounts::tally(&rooms);
        let occupancy_pct = if rooms.is_empty() {
            0.0
        } else {
            counts.occupied as f32 / rooms.len() as f32 * 100.0
        };

        let arrivals_due = reservations
            .iter()
            .filter(|r| {
                r.check_in == date
                    && matches!(
                        r.status,
                        ReservationStatus::Confirmed | ReservationStatus::CheckedIn
                    )
            })
            .count();
        let departures_due = reservations
            .iter()
            .filter(|r| r.check_out == date && r.status == ReservationStatus::CheckedIn)
            .count();
        let pending_reservations = reservations
            .iter()
            .filter(|r| r.status == ReservationStatus::Pending)
            .count();

        reservations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let guests = self.store.guests()?;
        let recent_reservations = reservations
            .iter()
            .take(recent_limit)
            .map(|reservation| {
                let guest_name = guests
                    .iter()
                    .find(|guest| guest.id == reservation.guest_id)
                    .map(|guest| guest.full_name())
                    .unwrap_or_else(|| "(unknown guest)".to_string());
                let room_number = rooms
                    .iter()
                    .find(|room| room.id == reservation.room_id)
                    .map(|room| room.number);
                ReservationSnapshot {
                    reservation_id: reservation.id,
                    guest_name,
                    room_number,
                    check_in: reservation.check_in,
                    check_out: reservation.check_out,
                    status_label: reservation.status.label(),
                    total: format_cents(reservation.total_cents),
                }
            })
            .collect();

        Ok(OperationsSummary {
            date,
            total_rooms: rooms.len(),
            rooms: counts,
            arrivals_due,
            departures_due,
            pending_reservations,
            occupancy_pct,
            recent_reservations,
        })
    }

    /// Completed payments over an inclusive date range, broken down by day
    /// and by method. Days without takings are omitted.
    pub fn revenue_report(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<RevenueReport, ReportError> {
        if from > to {
            return Err(ReportError::InvalidRange { from, to });
        }

        let payments: Vec<_> = self
            .store
            .payments()?
            .into_iter()
            .filter(|payment| {
                payment.status == PaymentStatus::Completed
                    && payment.paid_on >= from
                    && payment.paid_on <= to
            })
            .collect();

        let mut by_day: BTreeMap<NaiveDate, DailyRevenue> = BTreeMap::new();
        let mut total: u64 = 0;
        for payment in &payments {
            let entry = by_day
                .entry(payment.paid_on)
                .or_insert_with(|| DailyRevenue::empty(payment.paid_on));
            entry.add(payment.method, payment.amount_cents);
            total += u64::from(payment.amount_cents);
        }

        let by_method = [PaymentMethod::Cash, PaymentMethod::Card, PaymentMethod::Online]
            .into_iter()
            .map(|method| {
                let relevant = payments.iter().filter(|p| p.method == method);
                MethodRevenue {
                    method_label: method.label(),
                    payments: relevant.clone().count(),
                    amount_cents: relevant.map(|p| u64::from(p.amount_cents)).sum::<u64>()
                        .min(u64::from(u32::MAX)) as u32,
                }
            })
            .collect();

        Ok(RevenueReport {
            from,
            to,
            total_collected_cents: total.min(u64::from(u32::MAX)) as u32,
            by_method,
            daily: by_day.into_values().collect(),
        })
    }
}

#[cfg(test)]
mod tests;
