//! Reservation lifecycle: booking, confirmation, payments, check-in/out, and
//! the portal/public/desk HTTP surfaces over it.

pub mod domain;
pub mod router;
pub mod service;

pub use domain::{
    stays_overlap, Payment, PaymentId, PaymentMethod, PaymentRequest, PaymentStatus, Reservation,
    ReservationId, ReservationStatus, StayBalance, StayRequest,
};
pub use router::{
    desk_reservations_router, portal_router, public_router, PaymentView, ReservationDetailView,
    ReservationState, ReservationView,
};
pub use service::{CheckInOutcome, DeskError, DeskService, DoorAccess};
