use chrono::{Datelike, Duration, Local, NaiveDate};
use clap::Args;
use std::sync::Arc;

use frontdesk::auth::{AuthService, Principal, UserAccount};
use frontdesk::error::AppError;
use frontdesk::hotel::domain::{
    format_cents, Guest, RateAdjustment, Room, RoomType, StaffRole,
};
use frontdesk::hotel::guests::NewGuest;
use frontdesk::hotel::memory::InMemoryHotelRepository;
use frontdesk::hotel::reports::{revenue_csv, OperationsSummary, RevenueReport};
use frontdesk::hotel::reservations::{
    DeskError, PaymentMethod, PaymentRequest, PaymentStatus, StayRequest,
};
use frontdesk::hotel::rooms::{NewPriceRule, NewRoom, NewSeason};

use crate::infra::{parse_date, staff_member, InMemorySessionStore, InMemoryUserDirectory};
use crate::routes::ApiServices;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Check-in date for the demo stay (defaults to a week from today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) check_in: Option<NaiveDate>,
    /// Length of the demo stay in nights
    #[arg(long, default_value_t = 3)]
    pub(crate) nights: u16,
    /// Override the reporting date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct OperationsReportArgs {
    /// Report date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// How many recent reservations to list
    #[arg(long, default_value_t = 10)]
    pub(crate) recent: usize,
}

#[derive(Args, Debug, Default)]
pub(crate) struct RevenueReportArgs {
    /// Range start (defaults to thirty days before the end)
    #[arg(long, value_parser = parse_date)]
    pub(crate) from: Option<NaiveDate>,
    /// Range end (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) to: Option<NaiveDate>,
    /// Print CSV instead of the text summary
    #[arg(long)]
    pub(crate) csv: bool,
}

pub(crate) struct DemoSeed {
    pub(crate) jan: Guest,
    pub(crate) double_room: Room,
}

/// Seed rooms, guests, accounts, and the seasonal rate calendar.
pub(crate) fn seed_demo_dataset<S>(
    services: &ApiServices<S>,
    directory: &InMemoryUserDirectory,
    today: NaiveDate,
) -> Result<DemoSeed, AppError>
where
    S: frontdesk::hotel::repository::HotelRepository + 'static,
{
    let rooms = [
        NewRoom {
            number: 101,
            room_type: RoomType::Single,
            capacity: 1,
            nightly_rate_cents: 18000,
            notes: String::new(),
        },
        NewRoom {
            number: 102,
            room_type: RoomType::Double,
            capacity: 2,
            nightly_rate_cents: 25000,
            notes: String::new(),
        },
        NewRoom {
            number: 201,
            room_type: RoomType::Double,
            capacity: 2,
            nightly_rate_cents: 25000,
            notes: "Street side".to_string(),
        },
        NewRoom {
            number: 202,
            room_type: RoomType::Twin,
            capacity: 2,
            nightly_rate_cents: 22000,
            notes: String::new(),
        },
        NewRoom {
            number: 301,
            room_type: RoomType::Suite,
            capacity: 4,
            nightly_rate_cents: 48000,
            notes: "Top floor".to_string(),
        },
    ];

    let mut double_room = None;
    for request in rooms {
        let number = request.number;
        let room = services.property.create_room(request)?;
        if number == 102 {
            double_room = Some(room);
        }
    }
    let double_room = double_room.expect("room 102 seeded");

    let jan = services.directory.register_guest(NewGuest {
        name: "Jan".to_string(),
        surname: "Kowalski".to_string(),
        email: "jan.kowalski@example.com".to_string(),
        phone: "555-0101".to_string(),
    })?;
    let maria = services.directory.register_guest(NewGuest {
        name: "Maria".to_string(),
        surname: "Nowak".to_string(),
        email: "maria.nowak@example.com".to_string(),
        phone: "555-0102".to_string(),
    })?;

    directory.register(UserAccount {
        username: "jan".to_string(),
        password: "guest123".to_string(),
        principal: Principal::Guest { guest_id: jan.id },
    });
    directory.register(UserAccount {
        username: "maria".to_string(),
        password: "guest123".to_string(),
        principal: Principal::Guest { guest_id: maria.id },
    });
    for (username, password, role) in [
        ("anna", "desk123", StaffRole::Receptionist),
        ("olga", "rooms123", StaffRole::Housekeeper),
        ("marek", "manager123", StaffRole::Manager),
    ] {
        directory.register(UserAccount {
            username: username.to_string(),
            password: password.to_string(),
            principal: Principal::Staff {
                employee: staff_member(username, role, today - Duration::days(400)),
            },
        });
    }

    let year = today.year();
    let summer = services.property.create_season(NewSeason {
        name: "Summer high season".to_string(),
        start_date: NaiveDate::from_ymd_opt(year, 6, 1).expect("valid date"),
        end_date: NaiveDate::from_ymd_opt(year, 8, 31).expect("valid date"),
    })?;
    services.property.add_price_rule(NewPriceRule {
        season_id: summer.id,
        room_type: RoomType::Double,
        adjustment: RateAdjustment::Multiplier { factor: 1.5 },
        priority: 1,
    })?;
    services.property.add_price_rule(NewPriceRule {
        season_id: summer.id,
        room_type: RoomType::Suite,
        adjustment: RateAdjustment::NightlyOverride { rate_cents: 62000 },
        priority: 1,
    })?;

    Ok(DemoSeed { jan, double_room })
}

struct DemoEnvironment {
    services: ApiServices<InMemoryHotelRepository>,
    seed: DemoSeed,
}

fn build_demo_environment(today: NaiveDate) -> Result<DemoEnvironment, AppError> {
    let store = Arc::new(InMemoryHotelRepository::default());
    let directory = InMemoryUserDirectory::default();
    let auth = Arc::new(AuthService::new(
        Arc::new(directory.clone()),
        Arc::new(InMemorySessionStore::default()),
    ));
    let services = ApiServices::new(store, auth);
    let seed = seed_demo_dataset(&services, &directory, today)?;
    Ok(DemoEnvironment { services, seed })
}

/// A short booking history so the report commands have something to show:
/// one settled stay already checked out and one confirmed upcoming stay.
fn seed_sample_history(env: &DemoEnvironment, today: NaiveDate) -> Result<(), AppError> {
    let past_in = today - Duration::days(9);
    let past_out = today - Duration::days(6);
    let past = env.services.desk.create_reservation(StayRequest {
        guest_id: env.seed.jan.id,
        room_id: env.seed.double_room.id,
        check_in: past_in,
        check_out: past_out,
        party_size: 2,
        notes: String::new(),
    })?;
    env.services.desk.confirm_reservation(past.id)?;
    env.services.desk.record_payment(
        past.id,
        PaymentRequest {
            amount_cents: past.total_cents,
            method: PaymentMethod::Card,
            status: PaymentStatus::Completed,
            paid_on: past_in - Duration::days(1),
            transaction_id: Some("demo-hist-1".to_string()),
        },
    )?;
    env.services.desk.check_in_guest(past.id)?;
    env.services.desk.check_out_guest(past.id)?;
    env.services
        .property
        .mark_room_clean(env.seed.double_room.id)?;

    let upcoming = env.services.desk.create_reservation(StayRequest {
        guest_id: env.seed.jan.id,
        room_id: env.seed.double_room.id,
        check_in: today + Duration::days(7),
        check_out: today + Duration::days(10),
        party_size: 2,
        notes: "Late arrival".to_string(),
    })?;
    env.services.desk.confirm_reservation(upcoming.id)?;
    env.services.desk.settle_online(
        upcoming.id,
        &env.seed.jan.email,
        today - Duration::days(1),
    )?;

    Ok(())
}

pub(crate) fn run_operations_report(args: OperationsReportArgs) -> Result<(), AppError> {
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let env = build_demo_environment(date)?;
    seed_sample_history(&env, date)?;

    let summary = env.services.reports.operations_summary(date, args.recent)?;
    render_operations_summary(&summary);
    Ok(())
}

pub(crate) fn run_revenue_report(args: RevenueReportArgs) -> Result<(), AppError> {
    let to = args.to.unwrap_or_else(|| Local::now().date_naive());
    let from = args.from.unwrap_or(to - Duration::days(30));
    let env = build_demo_environment(to)?;
    seed_sample_history(&env, to)?;

    let report = env.services.reports.revenue_report(from, to)?;
    if args.csv {
        print!("{}", revenue_csv(&report)?);
    } else {
        render_revenue_report(&report);
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let check_in = args.check_in.unwrap_or(today + Duration::days(7));
    let check_out = check_in + Duration::days(i64::from(args.nights.max(1)));

    let env = build_demo_environment(today)?;
    let desk = &env.services.desk;
    let guest = &env.seed.jan;
    let room = &env.seed.double_room;

    println!("Front desk demo");
    println!(
        "Stay window: {} -> {} ({} nights), guest {}",
        check_in,
        check_out,
        (check_out - check_in).num_days(),
        guest.full_name()
    );

    let open_rooms = desk.available_rooms(check_in, check_out, Some(2))?;
    println!("\nAvailable rooms for two");
    for candidate in &open_rooms {
        println!(
            "- room {} ({}), {} per night",
            candidate.number,
            candidate.room_type.label(),
            format_cents(candidate.nightly_rate_cents)
        );
    }

    let quote = desk.quote(room.id, check_in, check_out)?;
    println!("\nQuote for room {}", room.number);
    for night in &quote.nights {
        match &night.applied {
            Some(rule) => println!(
                "- {}: {} ({})",
                night.date,
                format_cents(night.rate_cents),
                rule.season
            ),
            None => println!(
                "- {}: {} (base rate)",
                night.date,
                format_cents(night.rate_cents)
            ),
        }
    }
    println!("Total: {}", format_cents(quote.total_cents));

    let reservation = desk.create_reservation(StayRequest {
        guest_id: guest.id,
        room_id: room.id,
        check_in,
        check_out,
        party_size: 2,
        notes: "Demo booking".to_string(),
    })?;
    println!(
        "\nReservation {} created -> {}",
        reservation.id.0,
        reservation.status.label()
    );

    let reservation = desk.confirm_reservation(reservation.id)?;
    println!(
        "Reservation confirmed -> room {} is {}",
        room.number,
        env.services.property.room(room.id)?.status.label()
    );

    let deposit = reservation.total_cents / 2;
    desk.record_payment(
        reservation.id,
        PaymentRequest {
            amount_cents: deposit,
            method: PaymentMethod::Cash,
            status: PaymentStatus::Completed,
            paid_on: today,
            transaction_id: None,
        },
    )?;
    let balance = desk.balance(reservation.id)?;
    println!(
        "\nDeposit of {} taken at the desk; remaining {}",
        format_cents(deposit),
        format_cents(balance.remaining_cents)
    );

    match desk.check_in_guest(reservation.id) {
        Err(DeskError::OutstandingBalance { remaining_cents }) => println!(
            "Check-in refused: {} still outstanding",
            format_cents(remaining_cents)
        ),
        Ok(_) => println!("Check-in unexpectedly succeeded"),
        Err(err) => println!("Check-in failed: {err}"),
    }

    let payment = desk.settle_online(reservation.id, &guest.email, today)?;
    println!(
        "Online payment of {} settled the balance",
        format_cents(payment.amount_cents)
    );

    let outcome = desk.check_in_guest(reservation.id)?;
    println!(
        "Guest checked in -> door PIN {} for room {}",
        outcome.door_pin, room.number
    );

    desk.check_out_guest(reservation.id)?;
    println!("Guest checked out -> room sent to housekeeping");

    let board = env.services.property.housekeeping_board()?;
    println!("\nHousekeeping board");
    for dirty in &board {
        println!("- room {} ({})", dirty.number, dirty.status.label());
    }
    env.services.property.mark_room_clean(room.id)?;
    println!("Room {} cleaned and back in service", room.number);

    let summary = env.services.reports.operations_summary(today, 5)?;
    println!();
    render_operations_summary(&summary);

    let report = env
        .services
        .reports
        .revenue_report(today - Duration::days(30), today)?;
    println!();
    render_revenue_report(&report);

    println!("\nDemo accounts: jan/guest123 (portal), anna/desk123, marek/manager123");
    Ok(())
}

fn render_operations_summary(summary: &OperationsSummary) {
    println!("Operations summary for {}", summary.date);
    println!(
        "Rooms: {} total | {} available | {} reserved | {} occupied | {} to clean | {} maintenance",
        summary.total_rooms,
        summary.rooms.available,
        summary.rooms.reserved,
        summary.rooms.occupied,
        summary.rooms.to_clean,
        summary.rooms.maintenance
    );
    println!(
        "Today: {} arrivals | {} departures | {} pending reservations | occupancy {:.0}%",
        summary.arrivals_due,
        summary.departures_due,
        summary.pending_reservations,
        summary.occupancy_pct
    );

    if summary.recent_reservations.is_empty() {
        println!("Recent reservations: none");
    } else {
        println!("Recent reservations");
        for entry in &summary.recent_reservations {
            let room = entry
                .room_number
                .map(|number| number.to_string())
                .unwrap_or_else(|| "?".to_string());
            println!(
                "- #{} {} | room {} | {} -> {} | {} | {}",
                entry.reservation_id.0,
                entry.guest_name,
                room,
                entry.check_in,
                entry.check_out,
                entry.status_label,
                entry.total
            );
        }
    }
}

fn render_revenue_report(report: &RevenueReport) {
    println!("Revenue {} -> {}", report.from, report.to);
    println!("Collected: {}", format_cents(report.total_collected_cents));
    for method in &report.by_method {
        println!(
            "- {}: {} across {} payment(s)",
            method.method_label,
            format_cents(method.amount_cents),
            method.payments
        );
    }
    if report.daily.is_empty() {
        println!("No takings in range");
    } else {
        println!("By day");
        for day in &report.daily {
            println!("- {}: {}", day.date, format_cents(day.total_cents));
        }
    }
}
