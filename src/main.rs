//!
//! Equipment rental reservation daemon. Reads configuration from a TOML
//! file (~/.config/altamar-rental/config.toml), runs migrations, then keeps
//! the status sweeper advancing reservations until shutdown. The booking,
//! pricing and administration services live in the library crate for
//! whatever transport layer mounts on top.

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use altamar_rental::application::services::{StatusSweeper, SweepConfig};
use altamar_rental::domain::{Clock, SystemClock};
use altamar_rental::infrastructure::database::migrator::Migrator;
use altamar_rental::infrastructure::database::repositories::{
    SeaOrmHistoryRepository, SeaOrmReservationRepository,
};
use altamar_rental::infrastructure::ShutdownCoordinator;
use altamar_rental::{default_config_path, init_database, AppConfig, DatabaseConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("RENTAL_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            warn!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting Altamar Rental Service...");

    // ── Database ───────────────────────────────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.connection_url(),
    };
    info!("Database: {}", db_config.url);

    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // ── Shutdown handling ──────────────────────────────────────
    let shutdown = ShutdownCoordinator::new();
    let shutdown_signal = shutdown.signal();
    shutdown.start_signal_listener();

    // ── Status sweeper ─────────────────────────────────────────
    let reservations = Arc::new(SeaOrmReservationRepository::new(db.clone()));
    let history = Arc::new(SeaOrmHistoryRepository::new(db.clone()));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let sweeper = StatusSweeper::new(reservations, history, clock).with_config(SweepConfig {
        interval_secs: app_cfg.sweep.interval_secs,
    });
    sweeper.start(shutdown_signal.clone());

    info!("Service started. Press Ctrl+C to shutdown gracefully.");
    shutdown.wait_for_shutdown().await;

    info!("Performing final cleanup...");
    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("Database connection closed");
    }

    info!("Altamar Rental Service shutdown complete");
    Ok(())
}
