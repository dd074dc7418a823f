//! In-memory [`HotelRepository`] used by the API service's default wiring,
//! the demo command, and the test suites.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::domain::{Guest, GuestId, Room, RoomId, Season, SeasonId, SeasonPriceRule};
use super::repository::{HotelRepository, RepositoryError};
use super::reservations::{Payment, Reservation, ReservationId};

#[derive(Default)]
struct Tables {
    guests: HashMap<GuestId, Guest>,
    rooms: HashMap<RoomId, Room>,
    reservations: HashMap<ReservationId, Reservation>,
    payments: Vec<Payment>,
    seasons: HashMap<SeasonId, Season>,
    price_rules: Vec<SeasonPriceRule>,
}

#[derive(Default, Clone)]
pub struct InMemoryHotelRepository {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryHotelRepository {
    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().expect("repository mutex poisoned")
    }
}

impl HotelRepository for InMemoryHotelRepository {
    fn insert_guest(&self, guest: Guest) -> Result<Guest, RepositoryError> {
        let mut tables = self.lock();
        if tables.guests.contains_key(&guest.id) {
            return Err(RepositoryError::Conflict);
        }
        tables.guests.insert(guest.id, guest.clone());
        Ok(guest)
    }

    fn update_guest(&self, guest: Guest) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        if !tables.guests.contains_key(&guest.id) {
            return Err(RepositoryError::NotFound);
        }
        tables.guests.insert(guest.id, guest);
        Ok(())
    }

    fn guest(&self, id: GuestId) -> Result<Option<Guest>, RepositoryError> {
        Ok(self.lock().guests.get(&id).cloned())
    }

    fn guests(&self) -> Result<Vec<Guest>, RepositoryError> {
        Ok(self.lock().guests.values().cloned().collect())
    }

    fn insert_room(&self, room: Room) -> Result<Room, RepositoryError> {
        let mut tables = self.lock();
        let number_taken = tables
            .rooms
            .values()
            .any(|existing| existing.number == room.number);
        if number_taken || tables.rooms.contains_key(&room.id) {
            return Err(RepositoryError::Conflict);
        }
        tables.rooms.insert(room.id, room.clone());
        Ok(room)
    }

    fn update_room(&self, room: Room) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        if !tables.rooms.contains_key(&room.id) {
            return Err(RepositoryError::NotFound);
        }
        tables.rooms.insert(room.id, room);
        Ok(())
    }

    fn room(&self, id: RoomId) -> Result<Option<Room>, RepositoryError> {
        Ok(self.lock().rooms.get(&id).cloned())
    }

    fn rooms(&self) -> Result<Vec<Room>, RepositoryError> {
        Ok(self.lock().rooms.values().cloned().collect())
    }

    fn insert_reservation(
        &self,
        reservation: Reservation,
    ) -> Result<Reservation, RepositoryError> {
        let mut tables = self.lock();
        if tables.reservations.contains_key(&reservation.id) {
            return Err(RepositoryError::Conflict);
        }
        tables
            .reservations
            .insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    fn update_reservation(&self, reservation: Reservation) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        if !tables.reservations.contains_key(&reservation.id) {
            return Err(RepositoryError::NotFound);
        }
        tables.reservations.insert(reservation.id, reservation);
        Ok(())
    }

    fn reservation(&self, id: ReservationId) -> Result<Option<Reservation>, RepositoryError> {
        Ok(self.lock().reservations.get(&id).cloned())
    }

    fn reservations(&self) -> Result<Vec<Reservation>, RepositoryError> {
        Ok(self.lock().reservations.values().cloned().collect())
    }

    fn reservations_for_room(&self, room: RoomId) -> Result<Vec<Reservation>, RepositoryError> {
        Ok(self
            .lock()
            .reservations
            .values()
            .filter(|reservation| reservation.room_id == room)
            .cloned()
            .collect())
    }

    fn reservations_for_guest(&self, guest: GuestId) -> Result<Vec<Reservation>, RepositoryError> {
        Ok(self
            .lock()
            .reservations
            .values()
            .filter(|reservation| reservation.guest_id == guest)
            .cloned()
            .collect())
    }

    fn remove_reservation(&self, id: ReservationId) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        tables
            .reservations
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn insert_payment(&self, payment: Payment) -> Result<Payment, RepositoryError> {
        let mut tables = self.lock();
        if tables.payments.iter().any(|p| p.id == payment.id) {
            return Err(RepositoryError::Conflict);
        }
        tables.payments.push(payment.clone());
        Ok(payment)
    }

    fn payments_for_reservation(
        &self,
        reservation: ReservationId,
    ) -> Result<Vec<Payment>, RepositoryError> {
        Ok(self
            .lock()
            .payments
            .iter()
            .filter(|payment| payment.reservation_id == reservation)
            .cloned()
            .collect())
    }

    fn payments(&self) -> Result<Vec<Payment>, RepositoryError> {
        Ok(self.lock().payments.clone())
    }

    fn remove_payments_for_reservation(
        &self,
        reservation: ReservationId,
    ) -> Result<(), RepositoryError> {
        self.lock()
            .payments
            .retain(|payment| payment.reservation_id != reservation);
        Ok(())
    }

    fn insert_season(&self, season: Season) -> Result<Season, RepositoryError> {
        let mut tables = self.lock();
        if tables.seasons.contains_key(&season.id) {
            return Err(RepositoryError::Conflict);
        }
        tables.seasons.insert(season.id, season.clone());
        Ok(season)
    }

    fn season(&self, id: SeasonId) -> Result<Option<Season>, RepositoryError> {
        Ok(self.lock().seasons.get(&id).cloned())
    }

    fn seasons(&self) -> Result<Vec<Season>, RepositoryError> {
        Ok(self.lock().seasons.values().cloned().collect())
    }

    fn insert_price_rule(
        &self,
        rule: SeasonPriceRule,
    ) -> Result<SeasonPriceRule, RepositoryError> {
        let mut tables = self.lock();
        if tables.price_rules.iter().any(|r| r.id == rule.id) {
            return Err(RepositoryError::Conflict);
        }
        tables.price_rules.push(rule.clone());
        Ok(rule)
    }

    fn price_rules(&self) -> Result<Vec<SeasonPriceRule>, RepositoryError> {
        Ok(self.lock().price_rules.clone())
    }
}
