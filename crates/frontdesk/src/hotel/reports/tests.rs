use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::hotel::domain::{Guest, GuestId, Room, RoomId, RoomStatus, RoomType};
use crate::hotel::memory::InMemoryHotelRepository;
use crate::hotel::repository::HotelRepository;
use crate::hotel::reservations::{
    Payment, PaymentId, PaymentMethod, PaymentStatus, Reservation, ReservationId,
    ReservationStatus,
};

use super::{revenue_csv, ReportError, ReportService};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn room(id: u64, number: u32, status: RoomStatus) -> Room {
    Room {
        id: RoomId(id),
        number,
        room_type: RoomType::Double,
        capacity: 2,
        nightly_rate_cents: 10000,
        status,
        notes: String::new(),
        door_pin: None,
    }
}

fn guest(id: u64) -> Guest {
    Guest {
        id: GuestId(id),
        name: "Jan".to_string(),
        surname: "Kowalski".to_string(),
        email: format!("guest{id}@example.com"),
        phone: "555-0101".to_string(),
        created_at: Utc::now(),
    }
}

fn reservation(
    id: u64,
    room: u64,
    check_in: NaiveDate,
    check_out: NaiveDate,
    status: ReservationStatus,
) -> Reservation {
    Reservation {
        id: ReservationId(id),
        guest_id: GuestId(1),
        room_id: RoomId(room),
        check_in,
        check_out,
        party_size: 2,
        status,
        total_cents: 30000,
        notes: String::new(),
        created_at: Utc::now(),
    }
}

fn payment(
    id: u64,
    paid_on: NaiveDate,
    method: PaymentMethod,
    status: PaymentStatus,
    amount_cents: u32,
) -> Payment {
    Payment {
        id: PaymentId(id),
        reservation_id: ReservationId(1),
        amount_cents,
        method,
        status,
        paid_on,
        transaction_id: None,
        created_at: Utc::now(),
    }
}

fn seeded_service() -> ReportService<InMemoryHotelRepository> {
    let store = Arc::new(InMemoryHotelRepository::default());
    store.insert_guest(guest(1)).expect("guest stored");
    store
        .insert_room(room(1, 101, RoomStatus::Occupied))
        .expect("room stored");
    store
        .insert_room(room(2, 102, RoomStatus::Available))
        .expect("room stored");
    store
        .insert_room(room(3, 103, RoomStatus::ToClean))
        .expect("room stored");
    store
        .insert_room(room(4, 104, RoomStatus::Maintenance))
        .expect("room stored");
    ReportService::new(store)
}

#[test]
fn operations_summary_counts_rooms_and_movements() {
    let today = date(2026, 7, 1);
    let service_store = Arc::new(InMemoryHotelRepository::default());
    service_store.insert_guest(guest(1)).expect("guest stored");
    service_store
        .insert_room(room(1, 101, RoomStatus::Occupied))
        .expect("room stored");
    service_store
        .insert_room(room(2, 102, RoomStatus::Available))
        .expect("room stored");
    service_store
        .insert_reservation(reservation(
            1,
            1,
            today,
            date(2026, 7, 4),
            ReservationStatus::Confirmed,
        ))
        .expect("reservation stored");
    service_store
        .insert_reservation(reservation(
            2,
            2,
            date(2026, 6, 28),
            today,
            ReservationStatus::CheckedIn,
        ))
        .expect("reservation stored");
    service_store
        .insert_reservation(reservation(
            3,
            2,
            date(2026, 8, 1),
            date(2026, 8, 3),
            ReservationStatus::Pending,
        ))
        .expect("reservation stored");

    let service = ReportService::new(service_store);
    let summary = service
        .operations_summary(today, 2)
        .expect("summary builds");

    assert_eq!(summary.total_rooms, 2);
    assert_eq!(summary.rooms.occupied, 1);
    assert_eq!(summary.rooms.available, 1);
    assert_eq!(summary.arrivals_due, 1);
    assert_eq!(summary.departures_due, 1);
    assert_eq!(summary.pending_reservations, 1);
    assert_eq!(summary.occupancy_pct, 50.0);
    assert_eq!(summary.recent_reservations.len(), 2);
    assert_eq!(summary.recent_reservations[0].guest_name, "Jan Kowalski");
}

#[test]
fn status_tally_covers_every_room_state() {
    let service = seeded_service();
    let summary = service
        .operations_summary(date(2026, 7, 1), 5)
        .expect("summary builds");

    assert_eq!(summary.rooms.occupied, 1);
    assert_eq!(summary.rooms.available, 1);
    assert_eq!(summary.rooms.to_clean, 1);
    assert_eq!(summary.rooms.maintenance, 1);
    assert_eq!(summary.occupancy_pct, 25.0);
}

#[test]
fn revenue_report_keeps_completed_payments_within_range() {
    let store = Arc::new(InMemoryHotelRepository::default());
    store
        .insert_payment(payment(
            1,
            date(2026, 7, 1),
            PaymentMethod::Cash,
            PaymentStatus::Completed,
            10000,
        ))
        .expect("payment stored");
    store
        .insert_payment(payment(
            2,
            date(2026, 7, 1),
            PaymentMethod::Card,
            PaymentStatus::Completed,
            5000,
        ))
        .expect("payment stored");
    store
        .insert_payment(payment(
            3,
            date(2026, 7, 2),
            PaymentMethod::Online,
            PaymentStatus::Pending,
            99900,
        ))
        .expect("payment stored");
    store
        .insert_payment(payment(
            4,
            date(2026, 8, 2),
            PaymentMethod::Cash,
            PaymentStatus::Completed,
            77700,
        ))
        .expect("payment stored");

    let service = ReportService::new(store);
    let report = service
        .revenue_report(date(2026, 7, 1), date(2026, 7, 31))
        .expect("report builds");

    assert_eq!(report.total_collected_cents, 15000);
    assert_eq!(report.daily.len(), 1);
    assert_eq!(report.daily[0].cash_cents, 10000);
    assert_eq!(report.daily[0].card_cents, 5000);
    assert_eq!(report.daily[0].total_cents, 15000);

    let cash = &report.by_method[0];
    assert_eq!(cash.method_label, "Cash");
    assert_eq!(cash.payments, 1);
    assert_eq!(cash.amount_cents, 10000);
}

#[test]
fn revenue_report_rejects_inverted_range() {
    let service = seeded_service();
    let result = service.revenue_report(date(2026, 7, 31), date(2026, 7, 1));
    assert!(matches!(result, Err(ReportError::InvalidRange { .. })));
}

#[test]
fn csv_export_has_header_daily_rows_and_totals() {
    let store = Arc::new(InMemoryHotelRepository::default());
    store
        .insert_payment(payment(
            1,
            date(2026, 7, 1),
            PaymentMethod::Card,
            PaymentStatus::Completed,
            45000,
        ))
        .expect("payment stored");

    let service = ReportService::new(store);
    let report = service
        .revenue_report(date(2026, 7, 1), date(2026, 7, 2))
        .expect("report builds");
    let csv = revenue_csv(&report).expect("csv renders");

    let lines: Vec<&str> = csv.trim_end().lines().collect();
    assert_eq!(lines[0], "date,cash,card,online,total");
    assert_eq!(lines[1], "2026-07-01,0.00,450.00,0.00,450.00");
    assert_eq!(lines[2], "total,0.00,450.00,0.00,450.00");
}
