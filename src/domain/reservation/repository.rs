//! Reservation and history repository interfaces

use async_trait::async_trait;
use chrono::NaiveDate;

use super::model::{HistoryEntry, Reservation, ReservationState};
use crate::domain::DomainResult;

/// Alias kept for readability at call sites: an aggregate whose ids (and its
/// lines' ids) have not been assigned yet.
pub type NewReservation = Reservation;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Persist a new reservation with its lines as one atomic unit.
    ///
    /// The overlap check for every line's equipment MUST run inside the same
    /// transaction (or critical section) as the insert, so that two
    /// concurrent bookings of the same item cannot both succeed; the loser
    /// gets `Conflict`. Returns the aggregate with assigned ids.
    async fn insert_checked(&self, reservation: NewReservation) -> DomainResult<Reservation>;

    /// Replace a reservation's fields and lines atomically, re-checking
    /// overlap for the new lines while ignoring the reservation's own rows.
    async fn update_checked(&self, reservation: Reservation) -> DomainResult<Reservation>;

    /// Fetch one reservation with its lines
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Reservation>>;

    /// All reservations, newest creation first
    async fn find_all(&self) -> DomainResult<Vec<Reservation>>;

    /// A client's reservations, newest creation first
    async fn find_by_client(&self, client_id: i64) -> DomainResult<Vec<Reservation>>;

    /// Reservations currently in any of the given states
    async fn find_in_states(
        &self,
        states: &[ReservationState],
    ) -> DomainResult<Vec<Reservation>>;

    /// Write a state transition
    async fn set_state(&self, id: i64, state: ReservationState) -> DomainResult<()>;

    /// Whether any active-state reservation line for the equipment overlaps
    /// the inclusive range. `exclude_reservation` ignores one reservation's
    /// own rows, for modification re-checks.
    async fn has_overlap(
        &self,
        equipment_id: i64,
        start: NaiveDate,
        end: NaiveDate,
        exclude_reservation: Option<i64>,
    ) -> DomainResult<bool>;

    /// Of the given equipment ids, the ones blocked by an active-state
    /// reservation overlapping the range. One query for a whole catalog page.
    async fn busy_equipment_ids(
        &self,
        equipment_ids: &[i64],
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<Vec<i64>>;

    /// Authoritative count of a client's non-cancelled reservations
    async fn count_non_cancelled(&self, client_id: i64) -> DomainResult<i64>;

    /// Count of all reservations referencing a client, any state
    async fn count_for_client(&self, client_id: i64) -> DomainResult<i64>;
}

/// Append-only sink for lifecycle transitions.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Append an entry; entries are never updated or deleted
    async fn append(&self, entry: HistoryEntry) -> DomainResult<HistoryEntry>;

    /// A reservation's trail, newest change first
    async fn find_by_reservation(&self, reservation_id: i64) -> DomainResult<Vec<HistoryEntry>>;
}
