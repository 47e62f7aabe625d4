pub mod availability;
pub mod client_admin;
pub mod lifecycle;
pub mod policy_admin;
pub mod pricing;
pub mod sweep;

pub use availability::AvailabilityService;
pub use client_admin::ClientService;
pub use lifecycle::{ReservationService, ACTOR_SYSTEM, ACTOR_USER};
pub use policy_admin::PolicyService;
pub use pricing::{PricedItem, PricingInput, PricingService};
pub use sweep::{StatusSweeper, SweepConfig};
