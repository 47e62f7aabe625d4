pub mod model;
pub mod repository;

pub use model::Destination;
pub use repository::DestinationRepository;
