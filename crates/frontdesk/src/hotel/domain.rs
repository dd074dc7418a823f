use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for guest records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GuestId(pub u64);

/// Identifier wrapper for physical rooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EmployeeId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeasonId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PriceRuleId(pub u64);

/// Guest contact record. Guests double as portal users via the auth directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    pub id: GuestId,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

impl Guest {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    Single,
    Double,
    Twin,
    Suite,
}

impl RoomType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::Double => "Double",
            Self::Twin => "Twin",
            Self::Suite => "Suite",
        }
    }
}

/// Operational state of a physical room.
///
/// `Reserved` and `Occupied` are driven by reservation lifecycle transitions;
/// `ToClean` and `Maintenance` by housekeeping actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Available,
    Reserved,
    Occupied,
    ToClean,
    Maintenance,
}

impl RoomStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Reserved => "Reserved",
            Self::Occupied => "Occupied",
            Self::ToClean => "To Clean",
            Self::Maintenance => "Maintenance",
        }
    }

    /// Rooms under maintenance never appear in availability listings.
    pub const fn accepts_bookings(self) -> bool {
        !matches!(self, Self::Maintenance)
    }
}

/// A physical room. `number` is the printed door number, kept distinct from
/// the record id so rooms can be renumbered without breaking references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub number: u32,
    pub room_type: RoomType,
    pub capacity: u8,
    /// Base nightly rate in minor units (cents) before seasonal adjustment.
    pub nightly_rate_cents: u32,
    pub status: RoomStatus,
    pub notes: String,
    /// Door code issued at check-in (or pre-check-in), cleared on release.
    pub door_pin: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    Receptionist,
    Housekeeper,
    Manager,
    Admin,
}

impl StaffRole {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Receptionist => "Receptionist",
            Self::Housekeeper => "Housekeeper",
            Self::Manager => "Manager",
            Self::Admin => "Administrator",
        }
    }

    /// Pricing administration and reports are limited to managerial roles.
    pub const fn is_managerial(self) -> bool {
        matches!(self, Self::Manager | Self::Admin)
    }
}

/// Staff record backing desk logins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub username: String,
    pub role: StaffRole,
    pub phone: String,
    pub active: bool,
    pub hire_date: NaiveDate,
}

/// A named date range during which price rules may apply. Both bounds are
/// inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub id: SeasonId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Season {
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// How a season changes the nightly rate for a matching room type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateAdjustment {
    /// Replace the base rate outright.
    NightlyOverride { rate_cents: u32 },
    /// Scale the base rate; the result is rounded to the nearest cent.
    Multiplier { factor: f64 },
}

/// Season-scoped price rule for one room type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonPriceRule {
    pub id: PriceRuleId,
    pub season_id: SeasonId,
    pub room_type: RoomType,
    pub adjustment: RateAdjustment,
    /// Higher priority wins when several rules cover the same night.
    pub priority: u8,
}

/// Render minor units as a decimal amount, e.g. `45000` -> `"450.00"`.
pub fn format_cents(cents: u32) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}
