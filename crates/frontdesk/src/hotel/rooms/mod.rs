//! Room inventory, housekeeping, and rate calendar administration.

mod router;
mod service;

pub use router::{property_router, PropertyState, RoomView};
pub use service::{
    NewPriceRule, NewRoom, NewSeason, PropertyError, PropertyService, RateCalendarEntry,
    RoomUpdate,
};
