use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rand::Rng;

use crate::hotel::domain::{GuestId, Room, RoomId, RoomStatus};
use crate::hotel::pricing::{self, PricingError, StayQuote};
use crate::hotel::repository::{HotelRepository, RepositoryError};

use super::domain::{
    stays_overlap, Payment, PaymentId, PaymentMethod, PaymentRequest, PaymentStatus, Reservation,
    ReservationId, ReservationStatus, StayBalance, StayRequest,
};

/// Error raised by front desk reservation operations.
#[derive(Debug, thiserror::Error)]
pub enum DeskError {
    #[error("guest {0:?} not found")]
    UnknownGuest(GuestId),
    #[error("room {0:?} not found")]
    UnknownRoom(RoomId),
    #[error("reservation {0:?} not found")]
    UnknownReservation(ReservationId),
    #[error("party of {party_size} exceeds room capacity {capacity}")]
    PartyTooLarge { party_size: u8, capacity: u8 },
    #[error("room {room:?} is already booked for the selected dates")]
    RoomUnavailable { room: RoomId },
    #[error("room {room:?} is out of service")]
    RoomOutOfService { room: RoomId },
    #[error("cannot {action} a {} reservation", .from.label())]
    InvalidTransition {
        from: ReservationStatus,
        action: &'static str,
    },
    #[error("outstanding balance of {remaining_cents} cents must be settled first")]
    OutstandingBalance { remaining_cents: u32 },
    #[error("reservation is already fully paid")]
    AlreadySettled,
    #[error("payment amount must be greater than zero")]
    ZeroPayment,
    #[error(transparent)]
    Pricing(#[from] PricingError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Result of a successful check-in: the updated reservation plus the door
/// code issued for the stay.
#[derive(Debug, Clone)]
pub struct CheckInOutcome {
    pub reservation: Reservation,
    pub door_pin: String,
}

/// Door access details handed to a guest at pre-check-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoorAccess {
    pub reservation_id: ReservationId,
    pub room_number: u32,
    pub door_pin: String,
}

static RESERVATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static PAYMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_reservation_id() -> ReservationId {
    ReservationId(RESERVATION_SEQUENCE.fetch_add(1, Ordering::Relaxed))
}

fn next_payment_id() -> PaymentId {
    PaymentId(PAYMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed))
}

/// Four secure random digits, regenerated for every stay.
fn generate_door_pin() -> String {
    let mut rng = rand::rng();
    (0..4)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

/// Front desk facade over the reservation lifecycle: booking, confirmation,
/// payments, check-in/out, and the room-state bookkeeping each step implies.
pub struct DeskService<S> {
    store: Arc<S>,
}

impl<S> DeskService<S>
where
    S: HotelRepository + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Rooms open for the given stay: bookable status, enough capacity, and
    /// no conflicting active reservation.
    pub fn available_rooms(
        &self,
        check_in: NaiveDate,
        check_out: NaiveDate,
        min_capacity: Option<u8>,
    ) -> Result<Vec<Room>, DeskError> {
        if check_in >= check_out {
            return Err(PricingError::EmptyStay {
                check_in,
                check_out,
            }
            .into());
        }

        let mut open = Vec::new();
        for room in self.store.rooms()? {
            if !room.status.accepts_bookings() {
                continue;
            }
            if let Some(capacity) = min_capacity {
                if room.capacity < capacity {
                    continue;
                }
            }
            if !self.has_conflict(room.id, check_in, check_out, None)? {
                open.push(room);
            }
        }
        open.sort_by_key(|room| room.number);
        Ok(open)
    }

    /// Price a stay without creating anything.
    pub fn quote(
        &self,
        room_id: RoomId,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<StayQuote, DeskError> {
        let room = self.require_room(room_id)?;
        let seasons = self.store.seasons()?;
        let rules = self.store.price_rules()?;
        Ok(pricing::quote_stay(
            &room, check_in, check_out, &seasons, &rules,
        )?)
    }

    /// Validate and store a new booking in `Pending` state.
    pub fn create_reservation(&self, request: StayRequest) -> Result<Reservation, DeskError> {
        let StayRequest {
            guest_id,
            room_id,
            check_in,
            check_out,
            party_size,
            notes,
        } = request;

        self.store
            .guest(guest_id)?
            .ok_or(DeskError::UnknownGuest(guest_id))?;
        let room = self.require_room(room_id)?;

        if !room.status.accepts_bookings() {
            return Err(DeskError::RoomOutOfService { room: room_id });
        }
        if party_size == 0 || party_size > room.capacity {
            return Err(DeskError::PartyTooLarge {
                party_size,
                capacity: room.capacity,
            });
        }
        if self.has_conflict(room_id, check_in, check_out, None)? {
            return Err(DeskError::RoomUnavailable { room: room_id });
        }

        let seasons = self.store.seasons()?;
        let rules = self.store.price_rules()?;
        let quote = pricing::quote_stay(&room, check_in, check_out, &seasons, &rules)?;

        let reservation = Reservation {
            id: next_reservation_id(),
            guest_id,
            room_id,
            check_in,
            check_out,
            party_size,
            status: ReservationStatus::Pending,
            total_cents: quote.total_cents,
            notes,
            created_at: Utc::now(),
        };

        let stored = self.store.insert_reservation(reservation)?;
        tracing::info!(
            reservation = stored.id.0,
            room = room.number,
            %check_in,
            %check_out,
            "reservation created"
        );
        Ok(stored)
    }

    pub fn reservation(&self, id: ReservationId) -> Result<Reservation, DeskError> {
        self.store
            .reservation(id)?
            .ok_or(DeskError::UnknownReservation(id))
    }

    /// All reservations, newest first, optionally filtered by status.
    pub fn reservations(
        &self,
        status: Option<ReservationStatus>,
    ) -> Result<Vec<Reservation>, DeskError> {
        let mut list = self.store.reservations()?;
        if let Some(status) = status {
            list.retain(|reservation| reservation.status == status);
        }
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    pub fn reservations_for_guest(
        &self,
        guest: GuestId,
    ) -> Result<Vec<Reservation>, DeskError> {
        let mut list = self.store.reservations_for_guest(guest)?;
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    /// `pending -> confirmed`; the room is marked reserved.
    pub fn confirm_reservation(&self, id: ReservationId) -> Result<Reservation, DeskError> {
        let mut reservation = self.reservation(id)?;
        if reservation.status != ReservationStatus::Pending {
            return Err(DeskError::InvalidTransition {
                from: reservation.status,
                action: "confirm",
            });
        }

        reservation.status = ReservationStatus::Confirmed;
        self.store.update_reservation(reservation.clone())?;

        let mut room = self.require_room(reservation.room_id)?;
        room.status = RoomStatus::Reserved;
        self.store.update_room(room)?;

        Ok(reservation)
    }

    /// Cancel an active reservation, releasing the room when nothing else
    /// holds it.
    pub fn cancel_reservation(&self, id: ReservationId) -> Result<Reservation, DeskError> {
        let mut reservation = self.reservation(id)?;
        if !reservation.status.is_active() {
            return Err(DeskError::InvalidTransition {
                from: reservation.status,
                action: "cancel",
            });
        }

        reservation.status = ReservationStatus::Cancelled;
        self.store.update_reservation(reservation.clone())?;
        self.release_room_if_unclaimed(reservation.room_id, reservation.id)?;

        tracing::info!(reservation = id.0, "reservation cancelled");
        Ok(reservation)
    }

    /// Check a confirmed, fully-paid guest in. Issues a fresh door PIN and
    /// marks the room occupied.
    pub fn check_in_guest(&self, id: ReservationId) -> Result<CheckInOutcome, DeskError> {
        let mut reservation = self.reservation(id)?;
        if reservation.status != ReservationStatus::Confirmed {
            return Err(DeskError::InvalidTransition {
                from: reservation.status,
                action: "check in",
            });
        }

        let balance = self.balance(id)?;
        if !balance.fully_paid {
            return Err(DeskError::OutstandingBalance {
                remaining_cents: balance.remaining_cents,
            });
        }

        reservation.status = ReservationStatus::CheckedIn;
        self.store.update_reservation(reservation.clone())?;

        let mut room = self.require_room(reservation.room_id)?;
        let door_pin = generate_door_pin();
        room.status = RoomStatus::Occupied;
        room.door_pin = Some(door_pin.clone());
        self.store.update_room(room)?;

        tracing::info!(reservation = id.0, "guest checked in");
        Ok(CheckInOutcome {
            reservation,
            door_pin,
        })
    }

    /// `checked_in -> completed`; the room goes to housekeeping and its door
    /// code is retired.
    pub fn check_out_guest(&self, id: ReservationId) -> Result<Reservation, DeskError> {
        let mut reservation = self.reservation(id)?;
        if reservation.status != ReservationStatus::CheckedIn {
            return Err(DeskError::InvalidTransition {
                from: reservation.status,
                action: "check out",
            });
        }

        reservation.status = ReservationStatus::Completed;
        self.store.update_reservation(reservation.clone())?;

        let mut room = self.require_room(reservation.room_id)?;
        room.status = RoomStatus::ToClean;
        room.door_pin = None;
        self.store.update_room(room)?;

        tracing::info!(reservation = id.0, "guest checked out");
        Ok(reservation)
    }

    /// Remove a reservation and its payments. The room is released under the
    /// same rule as cancellation.
    pub fn delete_reservation(&self, id: ReservationId) -> Result<(), DeskError> {
        let reservation = self.reservation(id)?;
        self.store.remove_payments_for_reservation(id)?;
        self.store.remove_reservation(id)?;
        self.release_room_if_unclaimed(reservation.room_id, id)?;
        tracing::info!(reservation = id.0, "reservation deleted");
        Ok(())
    }

    /// Attach a payment recorded at the desk.
    pub fn record_payment(
        &self,
        id: ReservationId,
        request: PaymentRequest,
    ) -> Result<Payment, DeskError> {
        self.reservation(id)?;
        if request.amount_cents == 0 {
            return Err(DeskError::ZeroPayment);
        }

        let payment = Payment {
            id: next_payment_id(),
            reservation_id: id,
            amount_cents: request.amount_cents,
            method: request.method,
            status: request.status,
            paid_on: request.paid_on,
            transaction_id: request.transaction_id,
            created_at: Utc::now(),
        };
        Ok(self.store.insert_payment(payment)?)
    }

    pub fn payments(&self, id: ReservationId) -> Result<Vec<Payment>, DeskError> {
        self.reservation(id)?;
        Ok(self.store.payments_for_reservation(id)?)
    }

    pub fn balance(&self, id: ReservationId) -> Result<StayBalance, DeskError> {
        let reservation = self.reservation(id)?;
        let payments = self.store.payments_for_reservation(id)?;
        Ok(StayBalance::settle(reservation.total_cents, &payments))
    }

    /// Reservation lookup for unauthenticated guests: the id alone is not
    /// enough, the registered email must match too.
    pub fn public_reservation(
        &self,
        id: ReservationId,
        email: &str,
    ) -> Result<Reservation, DeskError> {
        let reservation = self.reservation(id)?;
        let guest = self
            .store
            .guest(reservation.guest_id)?
            .ok_or(DeskError::UnknownGuest(reservation.guest_id))?;
        if !guest.email.eq_ignore_ascii_case(email.trim()) {
            return Err(DeskError::UnknownReservation(id));
        }
        Ok(reservation)
    }

    /// Settle the outstanding balance in one online payment. A pending
    /// reservation is confirmed as part of the successful payment.
    pub fn settle_online(
        &self,
        id: ReservationId,
        email: &str,
        paid_on: NaiveDate,
    ) -> Result<Payment, DeskError> {
        let reservation = self.public_reservation(id, email)?;
        if !reservation.status.is_active() {
            return Err(DeskError::InvalidTransition {
                from: reservation.status,
                action: "pay for",
            });
        }

        let balance = self.balance(id)?;
        if balance.fully_paid {
            return Err(DeskError::AlreadySettled);
        }

        let payment = self.record_payment(
            id,
            PaymentRequest {
                amount_cents: balance.remaining_cents,
                method: PaymentMethod::Online,
                status: PaymentStatus::Completed,
                paid_on,
                transaction_id: None,
            },
        )?;

        if reservation.status == ReservationStatus::Pending {
            self.confirm_reservation(id)?;
        }

        Ok(payment)
    }

    /// Hand a confirmed, fully-paid guest their door code before arrival.
    /// The PIN is issued now if the room does not have one yet.
    pub fn pre_checkin(&self, id: ReservationId, email: &str) -> Result<DoorAccess, DeskError> {
        let reservation = self.public_reservation(id, email)?;
        if reservation.status != ReservationStatus::Confirmed {
            return Err(DeskError::InvalidTransition {
                from: reservation.status,
                action: "pre-check-in",
            });
        }

        let balance = self.balance(id)?;
        if !balance.fully_paid {
            return Err(DeskError::OutstandingBalance {
                remaining_cents: balance.remaining_cents,
            });
        }

        let mut room = self.require_room(reservation.room_id)?;
        let door_pin = match room.door_pin.clone() {
            Some(pin) => pin,
            None => {
                let pin = generate_door_pin();
                room.door_pin = Some(pin.clone());
                self.store.update_room(room.clone())?;
                pin
            }
        };

        Ok(DoorAccess {
            reservation_id: id,
            room_number: room.number,
            door_pin,
        })
    }

    fn require_room(&self, id: RoomId) -> Result<Room, DeskError> {
        self.store.room(id)?.ok_or(DeskError::UnknownRoom(id))
    }

    fn has_conflict(
        &self,
        room: RoomId,
        check_in: NaiveDate,
        check_out: NaiveDate,
        excluding: Option<ReservationId>,
    ) -> Result<bool, DeskError> {
        let existing = self.store.reservations_for_room(room)?;
        Ok(existing.iter().any(|other| {
            other.status.is_active()
                && excluding != Some(other.id)
                && stays_overlap(check_in, check_out, other.check_in, other.check_out)
        }))
    }

    /// Release a room held by `Reserved`/`Occupied` once no other active
    /// reservation references it — the cascade the original ran before
    /// deleting a reservation, applied on cancel and delete alike.
    fn release_room_if_unclaimed(
        &self,
        room_id: RoomId,
        excluding: ReservationId,
    ) -> Result<(), DeskError> {
        let mut room = self.require_room(room_id)?;
        if !matches!(room.status, RoomStatus::Reserved | RoomStatus::Occupied) {
            return Ok(());
        }

        let still_claimed = self
            .store
            .reservations_for_room(room_id)?
            .iter()
            .any(|other| other.id != excluding && other.status.is_active());
        if still_claimed {
            return Ok(());
        }

        room.status = RoomStatus::Available;
        room.door_pin = None;
        self.store.update_room(room)?;
        tracing::debug!(room = room_id.0, "room released");
        Ok(())
    }
}
