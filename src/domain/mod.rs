pub mod client;
pub mod clock;
pub mod destination;
pub mod equipment;
pub mod error;
pub mod policy;
pub mod reservation;

// Re-export commonly used types
pub use client::{Client, ClientRepository, LoyaltyTier};
pub use clock::{Clock, FixedClock, SystemClock};
pub use destination::{Destination, DestinationRepository};
pub use equipment::{Equipment, EquipmentRepository, EquipmentType};
pub use error::{DomainError, DomainResult};
pub use policy::{PolicyKind, PolicyRepository, PricingPolicy};
pub use reservation::{
    dates_overlap, HistoryEntry, HistoryRepository, PriceBreakdown, Reservation, ReservationLine,
    ReservationRepository, ReservationState,
};
