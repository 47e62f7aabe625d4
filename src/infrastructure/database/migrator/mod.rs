//! Database migrations

pub mod m20250301_000001_create_destinations;
pub mod m20250301_000002_create_equipment_types;
pub mod m20250301_000003_create_equipment;
pub mod m20250301_000004_create_clients;
pub mod m20250301_000005_create_pricing_policies;
pub mod m20250301_000006_create_reservations;
pub mod m20250301_000007_create_reservation_lines;
pub mod m20250301_000008_create_reservation_history;

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_destinations::Migration),
            Box::new(m20250301_000002_create_equipment_types::Migration),
            Box::new(m20250301_000003_create_equipment::Migration),
            Box::new(m20250301_000004_create_clients::Migration),
            Box::new(m20250301_000005_create_pricing_policies::Migration),
            Box::new(m20250301_000006_create_reservations::Migration),
            Box::new(m20250301_000007_create_reservation_lines::Migration),
            Box::new(m20250301_000008_create_reservation_history::Migration),
        ]
    }
}
