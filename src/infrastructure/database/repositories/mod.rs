pub mod client_repository;
pub mod destination_repository;
pub mod equipment_repository;
pub mod history_repository;
pub mod policy_repository;
pub mod reservation_repository;

pub use client_repository::SeaOrmClientRepository;
pub use destination_repository::SeaOrmDestinationRepository;
pub use equipment_repository::SeaOrmEquipmentRepository;
pub use history_repository::SeaOrmHistoryRepository;
pub use policy_repository::SeaOrmPolicyRepository;
pub use reservation_repository::SeaOrmReservationRepository;

use crate::domain::DomainError;

pub(crate) fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}
