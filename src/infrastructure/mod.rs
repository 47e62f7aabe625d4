//! Infrastructure layer - external concerns

pub mod database;
pub mod shutdown;
pub mod storage;

pub use database::{init_database, DatabaseConfig};
pub use shutdown::{ShutdownCoordinator, ShutdownSignal};
pub use storage::InMemoryStore;
