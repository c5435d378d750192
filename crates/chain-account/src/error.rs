use crate::reserver::ReservationId;

/// Error types for reservation operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReserveError {
    /// The output is held by another live reservation.
    #[error("output already reserved")]
    Reserved,
    /// No live reservation has this ID.
    #[error("reservation {0} not found")]
    NotFound(ReservationId),
}
