pub mod model;
pub mod repository;

pub use model::{PolicyKind, PricingPolicy};
pub use repository::PolicyRepository;
