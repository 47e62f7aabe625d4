pub mod model;
pub mod repository;

pub use model::{
    dates_overlap, HistoryEntry, PriceBreakdown, Reservation, ReservationLine, ReservationState,
};
pub use repository::{HistoryRepository, NewReservation, ReservationRepository};
