use super::domain::{Guest, GuestId, Room, RoomId, Season, SeasonId, SeasonPriceRule};
use super::reservations::{Payment, Reservation, ReservationId};

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction over the hotel's relational data, standing in for the
/// original ORM layer. Services hold it behind `Arc` so the same code runs
/// against production storage and the in-memory fakes used in tests.
pub trait HotelRepository: Send + Sync {
    // Guests
    fn insert_guest(&self, guest: Guest) -> Result<Guest, RepositoryError>;
    fn update_guest(&self, guest: Guest) -> Result<(), RepositoryError>;
    fn guest(&self, id: GuestId) -> Result<Option<Guest>, RepositoryError>;
    fn guests(&self) -> Result<Vec<Guest>, RepositoryError>;

    // Rooms. `insert_room` must reject a duplicate door number with
    // `RepositoryError::Conflict`.
    fn insert_room(&self, room: Room) -> Result<Room, RepositoryError>;
    fn update_room(&self, room: Room) -> Result<(), RepositoryError>;
    fn room(&self, id: RoomId) -> Result<Option<Room>, RepositoryError>;
    fn rooms(&self) -> Result<Vec<Room>, RepositoryError>;

    // Reservations
    fn insert_reservation(&self, reservation: Reservation)
        -> Result<Reservation, RepositoryError>;
    fn update_reservation(&self, reservation: Reservation) -> Result<(), RepositoryError>;
    fn reservation(&self, id: ReservationId) -> Result<Option<Reservation>, RepositoryError>;
    fn reservations(&self) -> Result<Vec<Reservation>, RepositoryError>;
    fn reservations_for_room(&self, room: RoomId) -> Result<Vec<Reservation>, RepositoryError>;
    fn reservations_for_guest(&self, guest: GuestId) -> Result<Vec<Reservation>, RepositoryError>;
    fn remove_reservation(&self, id: ReservationId) -> Result<(), RepositoryError>;

    // Payments
    fn insert_payment(&self, payment: Payment) -> Result<Payment, RepositoryError>;
    fn payments_for_reservation(
        &self,
        reservation: ReservationId,
    ) -> Result<Vec<Payment>, RepositoryError>;
    fn payments(&self) -> Result<Vec<Payment>, RepositoryError>;
    fn remove_payments_for_reservation(
        &self,
        reservation: ReservationId,
    ) -> Result<(), RepositoryError>;

    // Rate calendar
    fn insert_season(&self, season: Season) -> Result<Season, RepositoryError>;
    fn season(&self, id: SeasonId) -> Result<Option<Season>, RepositoryError>;
    fn seasons(&self) -> Result<Vec<Season>, RepositoryError>;
    fn insert_price_rule(
        &self,
        rule: SeasonPriceRule,
    ) -> Result<SeasonPriceRule, RepositoryError>;
    fn price_rules(&self) -> Result<Vec<SeasonPriceRule>, RepositoryError>;
}
