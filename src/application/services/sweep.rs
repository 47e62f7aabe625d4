//! Reservation status sweep
//!
//! Walks confirmed and in-progress reservations on a timer and advances
//! them along the calendar: a confirmed booking whose start date has come
//! goes in progress, and any of the two whose end date has passed finishes.
//! Transitions only fire when the state actually changes, so a second run in
//! the same tick is a no-op.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::lifecycle::ACTOR_SYSTEM;
use crate::domain::{
    Clock, DomainResult, HistoryEntry, HistoryRepository, ReservationRepository, ReservationState,
};
use crate::infrastructure::shutdown::ShutdownSignal;

/// Configuration for the status sweep
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// How often to walk active reservations (in seconds)
    pub interval_secs: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval_secs: 3600, // hourly
        }
    }
}

/// Background task advancing reservation states by date
pub struct StatusSweeper {
    reservations: Arc<dyn ReservationRepository>,
    history: Arc<dyn HistoryRepository>,
    clock: Arc<dyn Clock>,
    config: SweepConfig,
    running: Arc<RwLock<bool>>,
}

impl StatusSweeper {
    pub fn new(
        reservations: Arc<dyn ReservationRepository>,
        history: Arc<dyn HistoryRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            reservations,
            history,
            clock,
            config: SweepConfig::default(),
            running: Arc::new(RwLock::new(false)),
        }
    }

    pub fn with_config(mut self, config: SweepConfig) -> Self {
        self.config = config;
        self
    }

    /// Start the sweep background task
    pub fn start(&self, shutdown: ShutdownSignal) {
        let reservations = self.reservations.clone();
        let history = self.history.clone();
        let clock = self.clock.clone();
        let config = self.config.clone();
        let running = self.running.clone();

        tokio::spawn(async move {
            {
                let mut r = running.write().await;
                *r = true;
            }

            info!(interval_secs = config.interval_secs, "Status sweeper started");

            let mut interval = tokio::time::interval(Duration::from_secs(config.interval_secs));

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        match sweep_once(&reservations, &history, clock.as_ref()).await {
                            Ok(0) => debug!("Sweep tick: nothing to advance"),
                            Ok(n) => info!(transitions = n, "Sweep tick completed"),
                            Err(e) => warn!("Sweep tick failed: {}", e),
                        }
                    }
                    _ = shutdown.notified().wait() => {
                        info!("Status sweeper shutting down");
                        break;
                    }
                }
            }

            {
                let mut r = running.write().await;
                *r = false;
            }

            info!("Status sweeper stopped");
        });
    }

    /// Check if the sweeper task is running
    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }

    /// Run a single sweep pass; returns the number of transitions applied.
    pub async fn run_once(&self) -> DomainResult<u32> {
        sweep_once(&self.reservations, &self.history, self.clock.as_ref()).await
    }
}

/// One pass over all active reservations.
///
/// A single reservation's failure is logged and skipped; the rest of the
/// batch still runs.
async fn sweep_once(
    reservations: &Arc<dyn ReservationRepository>,
    history: &Arc<dyn HistoryRepository>,
    clock: &dyn Clock,
) -> DomainResult<u32> {
    let today = clock.today();
    let candidates = reservations
        .find_in_states(&[ReservationState::Confirmed, ReservationState::InProgress])
        .await?;

    let mut transitions = 0;
    for reservation in candidates {
        let Some(target) = reservation.sweep_target(today) else {
            continue;
        };

        if let Err(e) = reservations.set_state(reservation.id, target).await {
            warn!(
                reservation_id = reservation.id,
                "Sweep transition failed, skipping: {}", e
            );
            continue;
        }

        let note = match target {
            ReservationState::InProgress => "Rental period started",
            ReservationState::Finished => "Rental period ended",
            _ => "State advanced",
        };
        if let Err(e) = history
            .append(HistoryEntry {
                id: 0,
                reservation_id: reservation.id,
                previous: Some(reservation.state),
                new_state: target,
                actor: ACTOR_SYSTEM.to_string(),
                note: note.to_string(),
                changed_at: clock.now(),
            })
            .await
        {
            warn!(
                reservation_id = reservation.id,
                "Failed to record sweep transition: {}", e
            );
        }

        info!(
            reservation_id = reservation.id,
            from = %reservation.state,
            to = %target,
            "Reservation advanced by sweep"
        );
        transitions += 1;
    }

    Ok(transitions)
}

// ── Tests ──────────────────────────────────────────────────────
