/// Chain protocol - Output reservations.
///
/// Transaction builders reserve the outputs they intend to spend so two
/// concurrent builders never pick the same one. Reservations are keyed by
/// output ID and lapse after a time-to-live unless cancelled first.

pub mod reserver;

mod error;
pub use error::ReserveError;
pub use reserver::{
    MemoryReserver, Reservation, ReservationId, Reserver, DEFAULT_RESERVATION_TTL_MS,
};
