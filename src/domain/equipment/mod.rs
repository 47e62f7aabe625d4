pub mod model;
pub mod repository;

pub use model::{Equipment, EquipmentType};
pub use repository::EquipmentRepository;
