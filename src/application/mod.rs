pub mod services;

pub use services::{
    AvailabilityService, ClientService, PolicyService, PricingService, ReservationService,
    StatusSweeper, SweepConfig,
};
