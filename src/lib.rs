//! # Altamar Rental Service
//!
//! Reservation and dynamic pricing engine for physical sports-equipment
//! rentals across tourist destinations.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, state machine and repository traits
//! - **application**: Availability checking, policy-stacked pricing, the
//!   reservation lifecycle and the scheduled status sweep
//! - **infrastructure**: SeaORM persistence, in-memory storage, shutdown
//!   handling

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig};
