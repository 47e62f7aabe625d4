pub mod model;
pub mod repository;

pub use model::{Client, LoyaltyTier};
pub use repository::ClientRepository;
