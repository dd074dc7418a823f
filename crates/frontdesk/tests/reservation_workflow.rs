//! Integration scenarios for the reservation lifecycle, driven through the
//! public service facade and the HTTP routers so room-state bookkeeping,
//! payment gating, and role checks are exercised end to end.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use chrono::NaiveDate;

    use frontdesk::auth::{
        issue_token, AuthError, AuthService, Principal, SessionStore, SessionToken, UserAccount,
        UserDirectory,
    };
    use frontdesk::hotel::domain::{Employee, EmployeeId, Guest, GuestId, Room, RoomType, StaffRole};
    use frontdesk::hotel::guests::{DirectoryService, NewGuest};
    use frontdesk::hotel::memory::InMemoryHotelRepository;
    use frontdesk::hotel::reservations::DeskService;
    use frontdesk::hotel::rooms::{NewPriceRule, NewRoom, NewSeason, PropertyService};
    use frontdesk::hotel::domain::RateAdjustment;

    pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    pub(super) struct Desk {
        pub(super) store: Arc<InMemoryHotelRepository>,
        pub(super) desk: Arc<DeskService<InMemoryHotelRepository>>,
        pub(super) property: Arc<PropertyService<InMemoryHotelRepository>>,
        pub(super) directory: Arc<DirectoryService<InMemoryHotelRepository>>,
        pub(super) guest: Guest,
        pub(super) room: Room,
        pub(super) second_room: Room,
    }

    /// Two double rooms, one registered guest, and a June season that
    /// multiplies double rates by 1.5.
    pub(super) fn seeded_desk() -> Desk {
        let store = Arc::new(InMemoryHotelRepository::default());
        let desk = Arc::new(DeskService::new(store.clone()));
        let property = Arc::new(PropertyService::new(store.clone()));
        let directory = Arc::new(DirectoryService::new(store.clone()));

        let room = property
            .create_room(NewRoom {
                number: next_room_number(),
                room_type: RoomType::Double,
                capacity: 2,
                nightly_rate_cents: 10000,
                notes: String::new(),
            })
            .expect("room created");
        let second_room = property
            .create_room(NewRoom {
                number: next_room_number(),
                room_type: RoomType::Double,
                capacity: 2,
                nightly_rate_cents: 12000,
                notes: String::new(),
            })
            .expect("room created");

        let guest = directory
            .register_guest(NewGuest {
                name: "Jan".to_string(),
                surname: "Kowalski".to_string(),
                email: "jan.kowalski@example.com".to_string(),
                phone: "555-0101".to_string(),
            })
            .expect("guest registered");

        let season = property
            .create_season(NewSeason {
                name: "Summer season".to_string(),
                start_date: date(2026, 6, 1),
                end_date: date(2026, 6, 30),
            })
            .expect("season created");
        property
            .add_price_rule(NewPriceRule {
                season_id: season.id,
                room_type: RoomType::Double,
                adjustment: RateAdjustment::Multiplier { factor: 1.5 },
                priority: 1,
            })
            .expect("rule created");

        Desk {
            store,
            desk,
            property,
            directory,
            guest,
            room,
            second_room,
        }
    }

    // Distinct numbers keep fixtures readable when several desks exist at
    // once; availability listings sort by number, lowest first.
    fn next_room_number() -> u32 {
        use std::sync::atomic::{AtomicU32, Ordering};
        static NEXT: AtomicU32 = AtomicU32::new(100);
        NEXT.fetch_add(1, Ordering::Relaxed)
    }

    #[derive(Default)]
    pub(super) struct MemoryDirectory {
        accounts: Mutex<Vec<UserAccount>>,
    }

    impl MemoryDirectory {
        pub(super) fn register(&self, account: UserAccount) {
            self.accounts.lock().expect("lock").push(account);
        }
    }

    impl UserDirectory for MemoryDirectory {
        fn find(&self, username: &str) -> Result<Option<UserAccount>, AuthError> {
            Ok(self
                .accounts
                .lock()
                .expect("lock")
                .iter()
                .find(|account| account.username == username)
                .cloned())
        }
    }

    #[derive(Default)]
    pub(super) struct MemorySessions {
        open: Mutex<HashMap<String, Principal>>,
    }

    impl SessionStore for MemorySessions {
        fn open(&self, principal: Principal) -> Result<SessionToken, AuthError> {
            let token = issue_token();
            self.open
                .lock()
                .expect("lock")
                .insert(token.clone(), principal);
            Ok(SessionToken(token))
        }

        fn resolve(&self, token: &str) -> Result<Option<Principal>, AuthError> {
            Ok(self.open.lock().expect("lock").get(token).cloned())
        }

        fn close(&self, token: &str) -> Result<(), AuthError> {
            self.open.lock().expect("lock").remove(token);
            Ok(())
        }
    }

    pub(super) fn staff(username: &str, role: StaffRole) -> Employee {
        Employee {
            id: EmployeeId(1),
            username: username.to_string(),
            role,
            phone: String::new(),
            active: true,
            hire_date: date(2024, 1, 15),
        }
    }

    /// Auth service with one receptionist, one manager, and one portal guest
    /// bound to `guest_id`.
    pub(super) fn auth_with_accounts(guest_id: GuestId) -> Arc<AuthService> {
        let directory = MemoryDirectory::default();
        directory.register(UserAccount {
            username: "anna".to_string(),
            password: "pw".to_string(),
            principal: Principal::Staff {
                employee: staff("anna", StaffRole::Receptionist),
            },
        });
        directory.register(UserAccount {
            username: "marek".to_string(),
            password: "pw".to_string(),
            principal: Principal::Staff {
                employee: staff("marek", StaffRole::Manager),
            },
        });
        directory.register(UserAccount {
            username: "jan".to_string(),
            password: "pw".to_string(),
            principal: Principal::Guest { guest_id },
        });
        Arc::new(AuthService::new(
            Arc::new(directory),
            Arc::new(MemorySessions::default()),
        ))
    }
}

mod lifecycle {
    use super::common::*;
    use frontdesk::hotel::domain::RoomStatus;
    use frontdesk::hotel::repository::HotelRepository;
    use frontdesk::hotel::reservations::{
        DeskError, PaymentMethod, PaymentRequest, PaymentStatus, ReservationStatus, StayRequest,
    };

    fn stay(desk: &Desk, check_in: chrono::NaiveDate, check_out: chrono::NaiveDate) -> StayRequest {
        StayRequest {
            guest_id: desk.guest.id,
            room_id: desk.room.id,
            check_in,
            check_out,
            party_size: 2,
            notes: String::new(),
        }
    }

    fn pay_in_full(desk: &Desk, id: frontdesk::hotel::reservations::ReservationId) {
        let balance = desk.desk.balance(id).expect("balance");
        desk.desk
            .record_payment(
                id,
                PaymentRequest {
                    amount_cents: balance.remaining_cents,
                    method: PaymentMethod::Card,
                    status: PaymentStatus::Completed,
                    paid_on: date(2026, 5, 1),
                    transaction_id: None,
                },
            )
            .expect("payment recorded");
    }

    #[test]
    fn full_lifecycle_walks_room_through_its_states() {
        let desk = seeded_desk();
        let reservation = desk
            .desk
            .create_reservation(stay(&desk, date(2026, 3, 10), date(2026, 3, 13)))
            .expect("reservation created");
        assert_eq!(reservation.status, ReservationStatus::Pending);
        assert_eq!(reservation.total_cents, 30000);

        desk.desk
            .confirm_reservation(reservation.id)
            .expect("confirmed");
        assert_eq!(
            desk.property.room(desk.room.id).expect("room").status,
            RoomStatus::Reserved
        );

        pay_in_full(&desk, reservation.id);
        let outcome = desk.desk.check_in_guest(reservation.id).expect("check-in");
        assert_eq!(outcome.reservation.status, ReservationStatus::CheckedIn);
        assert_eq!(outcome.door_pin.len(), 4);
        assert!(outcome.door_pin.chars().all(|c| c.is_ascii_digit()));

        let room = desk.property.room(desk.room.id).expect("room");
        assert_eq!(room.status, RoomStatus::Occupied);

        let reservation = desk
            .desk
            .check_out_guest(reservation.id)
            .expect("check-out");
        assert_eq!(reservation.status, ReservationStatus::Completed);

        let room = desk.property.room(desk.room.id).expect("room");
        assert_eq!(room.status, RoomStatus::ToClean);
        assert!(room.door_pin.is_none());

        let cleaned = desk.property.mark_room_clean(desk.room.id).expect("cleaned");
        assert_eq!(cleaned.status, RoomStatus::Available);
    }

    #[test]
    fn overlapping_stay_is_rejected_but_back_to_back_is_not() {
        let desk = seeded_desk();
        desk.desk
            .create_reservation(stay(&desk, date(2026, 3, 10), date(2026, 3, 13)))
            .expect("first stay");

        let overlap = desk
            .desk
            .create_reservation(stay(&desk, date(2026, 3, 12), date(2026, 3, 14)));
        assert!(matches!(overlap, Err(DeskError::RoomUnavailable { .. })));

        desk.desk
            .create_reservation(stay(&desk, date(2026, 3, 13), date(2026, 3, 15)))
            .expect("back-to-back stay");
    }

    #[test]
    fn cancelled_reservations_stop_blocking_the_dates() {
        let desk = seeded_desk();
        let first = desk
            .desk
            .create_reservation(stay(&desk, date(2026, 3, 10), date(2026, 3, 13)))
            .expect("first stay");
        desk.desk.cancel_reservation(first.id).expect("cancelled");

        desk.desk
            .create_reservation(stay(&desk, date(2026, 3, 10), date(2026, 3, 13)))
            .expect("dates reopened");
    }

    #[test]
    fn check_in_requires_the_balance_settled() {
        let desk = seeded_desk();
        let reservation = desk
            .desk
            .create_reservation(stay(&desk, date(2026, 3, 10), date(2026, 3, 13)))
            .expect("reservation created");
        desk.desk
            .confirm_reservation(reservation.id)
            .expect("confirmed");

        desk.desk
            .record_payment(
                reservation.id,
                PaymentRequest {
                    amount_cents: 10000,
                    method: PaymentMethod::Cash,
                    status: PaymentStatus::Completed,
                    paid_on: date(2026, 3, 1),
                    transaction_id: None,
                },
            )
            .expect("deposit recorded");

        match desk.desk.check_in_guest(reservation.id) {
            Err(DeskError::OutstandingBalance { remaining_cents }) => {
                assert_eq!(remaining_cents, 20000);
            }
            other => panic!("expected outstanding balance, got {other:?}"),
        }

        pay_in_full(&desk, reservation.id);
        desk.desk
            .check_in_guest(reservation.id)
            .expect("check-in succeeds once settled");
    }

    #[test]
    fn pending_payments_do_not_count_toward_the_balance() {
        let desk = seeded_desk();
        let reservation = desk
            .desk
            .create_reservation(stay(&desk, date(2026, 3, 10), date(2026, 3, 13)))
            .expect("reservation created");
        desk.desk
            .record_payment(
                reservation.id,
                PaymentRequest {
                    amount_cents: reservation.total_cents,
                    method: PaymentMethod::Online,
                    status: PaymentStatus::Pending,
                    paid_on: date(2026, 3, 1),
                    transaction_id: Some("tx-42".to_string()),
                },
            )
            .expect("pending payment recorded");

        let balance = desk.desk.balance(reservation.id).expect("balance");
        assert_eq!(balance.paid_cents, 0);
        assert!(!balance.fully_paid);
    }

    #[test]
    fn cancel_releases_the_room_only_once_no_active_claim_remains() {
        let desk = seeded_desk();
        let first = desk
            .desk
            .create_reservation(stay(&desk, date(2026, 3, 10), date(2026, 3, 13)))
            .expect("first stay");
        let second = desk
            .desk
            .create_reservation(stay(&desk, date(2026, 4, 10), date(2026, 4, 13)))
            .expect("second stay");

        desk.desk.confirm_reservation(first.id).expect("confirmed");
        desk.desk.cancel_reservation(first.id).expect("cancelled");
        // The April booking still holds the room.
        assert_eq!(
            desk.property.room(desk.room.id).expect("room").status,
            RoomStatus::Reserved
        );

        desk.desk.cancel_reservation(second.id).expect("cancelled");
        assert_eq!(
            desk.property.room(desk.room.id).expect("room").status,
            RoomStatus::Available
        );
    }

    #[test]
    fn delete_cascades_payments_and_releases_the_room() {
        let desk = seeded_desk();
        let reservation = desk
            .desk
            .create_reservation(stay(&desk, date(2026, 3, 10), date(2026, 3, 13)))
            .expect("reservation created");
        desk.desk
            .confirm_reservation(reservation.id)
            .expect("confirmed");
        pay_in_full(&desk, reservation.id);

        desk.desk
            .delete_reservation(reservation.id)
            .expect("deleted");

        assert!(matches!(
            desk.desk.reservation(reservation.id),
            Err(DeskError::UnknownReservation(_))
        ));
        assert_eq!(
            desk.property.room(desk.room.id).expect("room").status,
            RoomStatus::Available
        );
        let orphaned = desk
            .store
            .payments_for_reservation(reservation.id)
            .expect("payments query");
        assert!(orphaned.is_empty());
    }

    #[test]
    fn seasonal_rates_flow_into_the_reservation_total() {
        let desk = seeded_desk();
        let reservation = desk
            .desk
            .create_reservation(stay(&desk, date(2026, 6, 10), date(2026, 6, 13)))
            .expect("reservation created");
        // 3 nights at 100.00 * 1.5
        assert_eq!(reservation.total_cents, 45000);
    }

    #[test]
    fn party_size_is_checked_against_capacity() {
        let desk = seeded_desk();
        let mut request = stay(&desk, date(2026, 3, 10), date(2026, 3, 13));
        request.party_size = 3;
        assert!(matches!(
            desk.desk.create_reservation(request),
            Err(DeskError::PartyTooLarge { .. })
        ));
    }

    #[test]
    fn rooms_under_maintenance_never_show_as_available() {
        let desk = seeded_desk();
        desk.property
            .open_maintenance(desk.second_room.id)
            .expect("maintenance opened");

        let open = desk
            .desk
            .available_rooms(date(2026, 3, 10), date(2026, 3, 13), None)
            .expect("availability");
        assert!(open.iter().any(|room| room.id == desk.room.id));
        assert!(open.iter().all(|room| room.id != desk.second_room.id));
    }

    #[test]
    fn online_settlement_confirms_a_pending_reservation() {
        let desk = seeded_desk();
        let reservation = desk
            .desk
            .create_reservation(stay(&desk, date(2026, 3, 10), date(2026, 3, 13)))
            .expect("reservation created");

        let payment = desk
            .desk
            .settle_online(reservation.id, &desk.guest.email, date(2026, 3, 1))
            .expect("settled");
        assert_eq!(payment.amount_cents, reservation.total_cents);

        let reservation = desk.desk.reservation(reservation.id).expect("reloaded");
        assert_eq!(reservation.status, ReservationStatus::Confirmed);
        assert!(desk.desk.balance(reservation.id).expect("balance").fully_paid);
    }

    #[test]
    fn public_lookups_require_the_matching_email() {
        let desk = seeded_desk();
        let reservation = desk
            .desk
            .create_reservation(stay(&desk, date(2026, 3, 10), date(2026, 3, 13)))
            .expect("reservation created");

        assert!(desk
            .desk
            .public_reservation(reservation.id, "JAN.KOWALSKI@example.com")
            .is_ok());
        assert!(matches!(
            desk.desk
                .public_reservation(reservation.id, "someone.else@example.com"),
            Err(DeskError::UnknownReservation(_))
        ));
    }

    #[test]
    fn pre_checkin_hands_out_the_door_pin_once_paid() {
        let desk = seeded_desk();
        let reservation = desk
            .desk
            .create_reservation(stay(&desk, date(2026, 3, 10), date(2026, 3, 13)))
            .expect("reservation created");

        // Unpaid and unconfirmed: no PIN.
        assert!(desk
            .desk
            .pre_checkin(reservation.id, &desk.guest.email)
            .is_err());

        desk.desk
            .settle_online(reservation.id, &desk.guest.email, date(2026, 3, 1))
            .expect("settled");
        let access = desk
            .desk
            .pre_checkin(reservation.id, &desk.guest.email)
            .expect("pre-check-in");
        assert_eq!(access.door_pin.len(), 4);

        // Stable across repeated calls until the room is released.
        let again = desk
            .desk
            .pre_checkin(reservation.id, &desk.guest.email)
            .expect("pre-check-in repeat");
        assert_eq!(access.door_pin, again.door_pin);
    }
}

mod directory {
    use super::common::*;
    use frontdesk::hotel::guests::GuestProfileUpdate;

    #[test]
    fn search_matches_name_surname_and_email_case_insensitively() {
        let desk = seeded_desk();
        let all = desk.directory.guests(None).expect("guests listed");
        assert_eq!(all.len(), 1);

        for needle in ["jan", "KOWALSKI", "kowalski@example"] {
            let hits = desk.directory.guests(Some(needle)).expect("search");
            assert_eq!(hits.len(), 1, "expected a hit for {needle}");
        }

        let misses = desk.directory.guests(Some("nowak")).expect("search");
        assert!(misses.is_empty());
    }

    #[test]
    fn profile_updates_keep_unspecified_fields() {
        let desk = seeded_desk();
        let updated = desk
            .directory
            .update_profile(
                desk.guest.id,
                GuestProfileUpdate {
                    phone: Some("555-9999".to_string()),
                    ..GuestProfileUpdate::default()
                },
            )
            .expect("profile updated");

        assert_eq!(updated.phone, "555-9999");
        assert_eq!(updated.name, "Jan");
        assert_eq!(updated.email, "jan.kowalski@example.com");
    }
}

mod routing {
    use super::common::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use frontdesk::hotel::reservations::{
        desk_reservations_router, portal_router, public_router, ReservationState,
    };

    fn router_and_tokens() -> (axum::Router, String, String) {
        let desk = seeded_desk();
        let auth = auth_with_accounts(desk.guest.id);
        let state = ReservationState {
            desk: desk.desk.clone(),
            auth: auth.clone(),
        };
        let router = portal_router(state.clone())
            .merge(public_router(state.clone()))
            .merge(desk_reservations_router(state));

        let guest_token = auth.login("jan", "pw").expect("guest login").0;
        let staff_token = auth.login("anna", "pw").expect("staff login").0;
        (router, guest_token, staff_token)
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        serde_json::from_slice(&body).expect("json")
    }

    #[tokio::test]
    async fn portal_guest_books_and_reads_their_reservation() {
        let (router, guest_token, _) = router_and_tokens();

        // Discover the bookable room through the public availability search.
        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/public/rooms/availability?check_in=2026-03-10&check_out=2026-03-13")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("dispatch");
        assert_eq!(response.status(), StatusCode::OK);
        let rooms = json_body(response).await;
        let room_id = rooms
            .as_array()
            .and_then(|list| list.first())
            .and_then(|room| room.get("id"))
            .and_then(Value::as_u64)
            .expect("room id");

        let payload = json!({
            "room_id": room_id,
            "check_in": "2026-03-10",
            "check_out": "2026-03-13",
            "party_size": 2,
        });
        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/portal/reservations")
                    .header("content-type", "application/json")
                    .header("authorization", format!("Bearer {guest_token}"))
                    .body(Body::from(payload.to_string()))
                    .expect("request"),
            )
            .await
            .expect("dispatch");
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = json_body(response).await;
        assert_eq!(created.get("status"), Some(&json!("pending")));
        let reservation_id = created
            .get("id")
            .and_then(Value::as_u64)
            .expect("reservation id");

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/portal/reservations/{reservation_id}"))
                    .header("authorization", format!("Bearer {guest_token}"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("dispatch");
        assert_eq!(response.status(), StatusCode::OK);
        let detail = json_body(response).await;
        assert_eq!(
            detail
                .get("balance")
                .and_then(|balance| balance.get("fully_paid")),
            Some(&json!(false))
        );
    }

    #[tokio::test]
    async fn desk_routes_enforce_roles() {
        let (router, guest_token, staff_token) = router_and_tokens();

        let anonymous = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/desk/reservations")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("dispatch");
        assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

        let as_guest = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/desk/reservations")
                    .header("authorization", format!("Bearer {guest_token}"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("dispatch");
        assert_eq!(as_guest.status(), StatusCode::FORBIDDEN);

        let as_staff = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/desk/reservations")
                    .header("authorization", format!("Bearer {staff_token}"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("dispatch");
        assert_eq!(as_staff.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn conflicting_portal_booking_returns_conflict_status() {
        let (router, guest_token, _) = router_and_tokens();

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/public/rooms/availability?check_in=2026-03-10&check_out=2026-03-13")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("dispatch");
        let rooms = json_body(response).await;
        let room_id = rooms
            .as_array()
            .and_then(|list| list.first())
            .and_then(|room| room.get("id"))
            .and_then(Value::as_u64)
            .expect("room id");

        let payload = json!({
            "room_id": room_id,
            "check_in": "2026-03-10",
            "check_out": "2026-03-13",
            "party_size": 2,
        })
        .to_string();

        let book = |body: String| {
            Request::builder()
                .method("POST")
                .uri("/api/v1/portal/reservations")
                .header("content-type", "application/json")
                .header("authorization", format!("Bearer {guest_token}"))
                .body(Body::from(body))
                .expect("request")
        };

        let first = router
            .clone()
            .oneshot(book(payload.clone()))
            .await
            .expect("dispatch");
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = router.clone().oneshot(book(payload)).await.expect("dispatch");
        assert_eq!(second.status(), StatusCode::CONFLICT);
        let error = json_body(second).await;
        assert!(error
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .contains("already booked"));
    }

    #[tokio::test]
    async fn public_payment_settles_and_confirms() {
        let (router, guest_token, staff_token) = router_and_tokens();

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/public/rooms/availability?check_in=2026-05-01&check_out=2026-05-03")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("dispatch");
        let rooms = json_body(response).await;
        let room_id = rooms
            .as_array()
            .and_then(|list| list.first())
            .and_then(|room| room.get("id"))
            .and_then(Value::as_u64)
            .expect("room id");

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/portal/reservations")
                    .header("content-type", "application/json")
                    .header("authorization", format!("Bearer {guest_token}"))
                    .body(Body::from(
                        json!({
                            "room_id": room_id,
                            "check_in": "2026-05-01",
                            "check_out": "2026-05-03",
                            "party_size": 2,
                        })
                        .to_string(),
                    ))
                    .expect("request"),
            )
            .await
            .expect("dispatch");
        let created = json_body(response).await;
        let reservation_id = created
            .get("id")
            .and_then(Value::as_u64)
            .expect("reservation id");

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!(
                        "/api/v1/public/reservations/{reservation_id}/pay"
                    ))
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({ "email": "jan.kowalski@example.com" }).to_string(),
                    ))
                    .expect("request"),
            )
            .await
            .expect("dispatch");
        assert_eq!(response.status(), StatusCode::OK);
        let settled = json_body(response).await;
        assert_eq!(
            settled
                .get("reservation")
                .and_then(|r| r.get("status")),
            Some(&json!("confirmed"))
        );

        // The desk now sees the booking as fully paid.
        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/desk/reservations?status=confirmed")
                    .header("authorization", format!("Bearer {staff_token}"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("dispatch");
        let entries = json_body(response).await;
        let entry = entries
            .as_array()
            .and_then(|list| {
                list.iter().find(|entry| {
                    entry
                        .get("reservation")
                        .and_then(|r| r.get("id"))
                        .and_then(Value::as_u64)
                        == Some(reservation_id)
                })
            })
            .expect("entry present");
        assert_eq!(
            entry.get("balance").and_then(|b| b.get("fully_paid")),
            Some(&json!(true))
        );
    }
}
