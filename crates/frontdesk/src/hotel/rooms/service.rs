use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::hotel::domain::{
    PriceRuleId, RateAdjustment, Room, RoomId, RoomStatus, RoomType, Season, SeasonId,
    SeasonPriceRule,
};
use crate::hotel::repository::{HotelRepository, RepositoryError};

#[derive(Debug, thiserror::Error)]
pub enum PropertyError {
    #[error("room number {0} is already in use")]
    DuplicateRoomNumber(u32),
    #[error("room {0:?} not found")]
    UnknownRoom(RoomId),
    #[error("season {0:?} not found")]
    UnknownSeason(SeasonId),
    #[error("cannot {action} a {} room", .status.label())]
    InvalidRoomState {
        status: RoomStatus,
        action: &'static str,
    },
    #[error("room capacity must be at least one")]
    InvalidCapacity,
    #[error("season must start on or before its end ({start} -> {end})")]
    InvalidSeasonRange { start: NaiveDate, end: NaiveDate },
    #[error("price multiplier must be a positive finite number, got {0}")]
    InvalidMultiplier(f64),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewRoom {
    pub number: u32,
    pub room_type: RoomType,
    pub capacity: u8,
    pub nightly_rate_cents: u32,
    #[serde(default)]
    pub notes: String,
}

/// Partial room edit; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomUpdate {
    pub number: Option<u32>,
    pub room_type: Option<RoomType>,
    pub capacity: Option<u8>,
    pub nightly_rate_cents: Option<u32>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSeason {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPriceRule {
    pub season_id: SeasonId,
    pub room_type: RoomType,
    pub adjustment: RateAdjustment,
    #[serde(default)]
    pub priority: u8,
}

/// One season with its attached rules, as served to the pricing screen.
#[derive(Debug, Clone, Serialize)]
pub struct RateCalendarEntry {
    pub season: Season,
    pub rules: Vec<SeasonPriceRule>,
}

static ROOM_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static SEASON_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static RULE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Room inventory, housekeeping actions, and rate calendar administration.
pub struct PropertyService<S> {
    store: Arc<S>,
}

impl<S> PropertyService<S>
where
    S: HotelRepository + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn create_room(&self, request: NewRoom) -> Result<Room, PropertyError> {
        if request.capacity == 0 {
            return Err(PropertyError::InvalidCapacity);
        }
        self.ensure_number_free(request.number, None)?;

        let room = Room {
            id: RoomId(ROOM_SEQUENCE.fetch_add(1, Ordering::Relaxed)),
            number: request.number,
            room_type: request.room_type,
            capacity: request.capacity,
            nightly_rate_cents: request.nightly_rate_cents,
            status: RoomStatus::Available,
            notes: request.notes,
            door_pin: None,
        };

        let stored = self.store.insert_room(room)?;
        tracing::info!(room = stored.number, "room created");
        Ok(stored)
    }

    pub fn update_room(&self, id: RoomId, update: RoomUpdate) -> Result<Room, PropertyError> {
        let mut room = self.require_room(id)?;

        if let Some(number) = update.number {
            if number != room.number {
                self.ensure_number_free(number, Some(id))?;
                room.number = number;
            }
        }
        if let Some(room_type) = update.room_type {
            room.room_type = room_type;
        }
        if let Some(capacity) = update.capacity {
            if capacity == 0 {
                return Err(PropertyError::InvalidCapacity);
            }
            room.capacity = capacity;
        }
        if let Some(rate) = update.nightly_rate_cents {
            room.nightly_rate_cents = rate;
        }
        if let Some(notes) = update.notes {
            room.notes = notes;
        }

        self.store.update_room(room.clone())?;
        Ok(room)
    }

    pub fn room(&self, id: RoomId) -> Result<Room, PropertyError> {
        self.require_room(id)
    }

    pub fn rooms(&self) -> Result<Vec<Room>, PropertyError> {
        let mut rooms = self.store.rooms()?;
        rooms.sort_by_key(|room| room.number);
        Ok(rooms)
    }

    /// Direct status override from the rooms screen.
    pub fn set_room_status(&self, id: RoomId, status: RoomStatus) -> Result<Room, PropertyError> {
        let mut room = self.require_room(id)?;
        room.status = status;
        if !matches!(status, RoomStatus::Occupied | RoomStatus::Reserved) {
            room.door_pin = None;
        }
        self.store.update_room(room.clone())?;
        tracing::info!(room = room.number, status = status.label(), "room status set");
        Ok(room)
    }

    /// Rooms waiting on housekeeping or repairs, lowest number first.
    pub fn housekeeping_board(&self) -> Result<Vec<Room>, PropertyError> {
        let mut rooms = self.store.rooms()?;
        rooms.retain(|room| {
            matches!(room.status, RoomStatus::ToClean | RoomStatus::Maintenance)
        });
        rooms.sort_by_key(|room| room.number);
        Ok(rooms)
    }

    pub fn mark_room_clean(&self, id: RoomId) -> Result<Room, PropertyError> {
        let mut room = self.require_room(id)?;
        if room.status != RoomStatus::ToClean {
            return Err(PropertyError::InvalidRoomState {
                status: room.status,
                action: "mark clean",
            });
        }
        room.status = RoomStatus::Available;
        self.store.update_room(room.clone())?;
        Ok(room)
    }

    pub fn open_maintenance(&self, id: RoomId) -> Result<Room, PropertyError> {
        let mut room = self.require_room(id)?;
        if room.status == RoomStatus::Occupied {
            return Err(PropertyError::InvalidRoomState {
                status: room.status,
                action: "take out of service",
            });
        }
        room.status = RoomStatus::Maintenance;
        room.door_pin = None;
        self.store.update_room(room.clone())?;
        Ok(room)
    }

    pub fn close_maintenance(&self, id: RoomId) -> Result<Room, PropertyError> {
        let mut room = self.require_room(id)?;
        if room.status != RoomStatus::Maintenance {
            return Err(PropertyError::InvalidRoomState {
                status: room.status,
                action: "return to service",
            });
        }
        room.status = RoomStatus::Available;
        self.store.update_room(room.clone())?;
        Ok(room)
    }

    pub fn create_season(&self, request: NewSeason) -> Result<Season, PropertyError> {
        if request.start_date > request.end_date {
            return Err(PropertyError::InvalidSeasonRange {
                start: request.start_date,
                end: request.end_date,
            });
        }

        let season = Season {
            id: SeasonId(SEASON_SEQUENCE.fetch_add(1, Ordering::Relaxed)),
            name: request.name,
            start_date: request.start_date,
            end_date: request.end_date,
        };
        Ok(self.store.insert_season(season)?)
    }

    pub fn add_price_rule(
        &self,
        request: NewPriceRule,
    ) -> Result<SeasonPriceRule, PropertyError> {
        self.store
            .season(request.season_id)?
            .ok_or(PropertyError::UnknownSeason(request.season_id))?;

        if let RateAdjustment::Multiplier { factor } = request.adjustment {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(PropertyError::InvalidMultiplier(factor));
            }
        }

        let rule = SeasonPriceRule {
            id: PriceRuleId(RULE_SEQUENCE.fetch_add(1, Ordering::Relaxed)),
            season_id: request.season_id,
            room_type: request.room_type,
            adjustment: request.adjustment,
            priority: request.priority,
        };
        Ok(self.store.insert_price_rule(rule)?)
    }

    /// Seasons with their rules, soonest season first.
    pub fn rate_calendar(&self) -> Result<Vec<RateCalendarEntry>, PropertyError> {
        let mut seasons = self.store.seasons()?;
        seasons.sort_by_key(|season| season.start_date);
        let rules = self.store.price_rules()?;

        Ok(seasons
            .into_iter()
            .map(|season| {
                let rules = rules
                    .iter()
                    .filter(|rule| rule.season_id == season.id)
                    .cloned()
                    .collect();
                RateCalendarEntry { season, rules }
            })
            .collect())
    }

    fn require_room(&self, id: RoomId) -> Result<Room, PropertyError> {
        self.store.room(id)?.ok_or(PropertyError::UnknownRoom(id))
    }

    fn ensure_number_free(
        &self,
        number: u32,
        excluding: Option<RoomId>,
    ) -> Result<(), PropertyError> {
        let taken = self
            .store
            .rooms()?
            .iter()
            .any(|room| room.number == number && excluding != Some(room.id));
        if taken {
            return Err(PropertyError::DuplicateRoomNumber(number));
        }
        Ok(())
    }
}
