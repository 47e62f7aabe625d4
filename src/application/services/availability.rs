//! Equipment availability checking
//!
//! A booking blocks an item for its whole inclusive date range while the
//! owning reservation is in an active state. Cancelled and finished
//! reservations never block.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::{
    Clock, DestinationRepository, DomainError, DomainResult, Equipment, EquipmentRepository,
    ReservationRepository,
};

pub struct AvailabilityService {
    equipment: Arc<dyn EquipmentRepository>,
    destinations: Arc<dyn DestinationRepository>,
    reservations: Arc<dyn ReservationRepository>,
    clock: Arc<dyn Clock>,
}

impl AvailabilityService {
    pub fn new(
        equipment: Arc<dyn EquipmentRepository>,
        destinations: Arc<dyn DestinationRepository>,
        reservations: Arc<dyn ReservationRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            equipment,
            destinations,
            reservations,
            clock,
        }
    }

    /// Reject inverted ranges and ranges starting in the past.
    pub fn validate_range(&self, start: NaiveDate, end: NaiveDate) -> DomainResult<()> {
        if start > end {
            return Err(DomainError::InvalidRange { start, end });
        }
        let today = self.clock.today();
        if start < today {
            return Err(DomainError::PastDate { start, today });
        }
        Ok(())
    }

    /// Whether one item can be booked for the inclusive range.
    ///
    /// The item must exist, carry its general-availability flag, and have no
    /// overlapping line owned by an active-state reservation.
    pub async fn is_available(
        &self,
        equipment_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<bool> {
        self.validate_range(start, end)?;

        let equipment = self
            .equipment
            .find_by_id(equipment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Equipment", equipment_id))?;

        if !equipment.available {
            return Ok(false);
        }

        let blocked = self
            .reservations
            .has_overlap(equipment_id, start, end, None)
            .await?;
        Ok(!blocked)
    }

    /// A destination's equipment that can still be booked for the range.
    ///
    /// Uses one busy-equipment query for the whole destination instead of an
    /// overlap check per item.
    pub async fn available_equipment(
        &self,
        destination_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<Vec<Equipment>> {
        self.validate_range(start, end)?;

        if !self.destinations.exists(destination_id).await? {
            return Err(DomainError::not_found("Destination", destination_id));
        }

        let candidates: Vec<Equipment> = self
            .equipment
            .find_by_destination(destination_id)
            .await?
            .into_iter()
            .filter(|e| e.available)
            .collect();

        let ids: Vec<i64> = candidates.iter().map(|e| e.id).collect();
        let busy = self.reservations.busy_equipment_ids(&ids, start, end).await?;

        Ok(candidates
            .into_iter()
            .filter(|e| !busy.contains(&e.id))
            .collect())
    }

    /// Whether the destination can still take a booking in the range.
    ///
    /// A destination without a capacity limit always can; otherwise at least
    /// one unit must remain available.
    pub async fn destination_has_capacity(
        &self,
        destination_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<bool> {
        let destination = self
            .destinations
            .find_by_id(destination_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Destination", destination_id))?;

        match destination.max_capacity {
            None => Ok(true),
            Some(cap) if cap <= 0 => Ok(true),
            Some(_) => {
                let open = self.available_equipment(destination_id, start, end).await?;
                Ok(!open.is_empty())
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FixedClock, Reservation, ReservationState};
    use crate::infrastructure::storage::memory::InMemoryStore;
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2026, 8, 1)
    }

    fn service(store: &Arc<InMemoryStore>) -> AvailabilityService {
        AvailabilityService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            Arc::new(FixedClock::on_date(today())),
        )
    }

    async fn seed_booking(
        store: &Arc<InMemoryStore>,
        equipment_id: i64,
        start: NaiveDate,
        end: NaiveDate,
        state: ReservationState,
    ) {
        let mut r = Reservation::new(0, 1, 1, start, end, Utc::now());
        r.lines.push(crate::domain::ReservationLine {
            id: 0,
            reservation_id: 0,
            equipment_id,
            unit_price: "100".parse().unwrap(),
        });
        let saved = store.insert_checked(r).await.unwrap();
        store.set_state(saved.id, state).await.unwrap();
    }

    fn seeded_store() -> Arc<InMemoryStore> {
        let store = Arc::new(InMemoryStore::new());
        store.seed_destination("Playa Blanca", "Caribe");
        store.seed_equipment_type("Kayak");
        store.seed_equipment("Kayak #1", 1, 1, "100");
        store.seed_equipment("Kayak #2", 1, 1, "120");
        store.seed_client("Ana Rojas", "CC-1001");
        store
    }

    #[tokio::test]
    async fn unknown_equipment_is_not_found() {
        let store = seeded_store();
        let svc = service(&store);
        let err = svc
            .is_available(99, date(2026, 9, 1), date(2026, 9, 5))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Equipment", .. }));
    }

    #[tokio::test]
    async fn inverted_range_is_rejected() {
        let store = seeded_store();
        let svc = service(&store);
        let err = svc
            .is_available(1, date(2026, 9, 5), date(2026, 9, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidRange { .. }));
    }

    #[tokio::test]
    async fn past_start_is_rejected() {
        let store = seeded_store();
        let svc = service(&store);
        let err = svc
            .is_available(1, date(2026, 7, 31), date(2026, 9, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::PastDate { .. }));
    }

    #[tokio::test]
    async fn flagged_off_equipment_is_unavailable() {
        let store = seeded_store();
        store.set_equipment_available(1, false);
        let svc = service(&store);
        assert!(!svc
            .is_available(1, date(2026, 9, 1), date(2026, 9, 5))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn overlapping_active_booking_blocks() {
        let store = seeded_store();
        seed_booking(
            &store,
            1,
            date(2026, 9, 3),
            date(2026, 9, 8),
            ReservationState::Confirmed,
        )
        .await;
        let svc = service(&store);

        assert!(!svc
            .is_available(1, date(2026, 9, 1), date(2026, 9, 3))
            .await
            .unwrap());
        // disjoint range is fine
        assert!(svc
            .is_available(1, date(2026, 9, 9), date(2026, 9, 12))
            .await
            .unwrap());
        // other item untouched
        assert!(svc
            .is_available(2, date(2026, 9, 1), date(2026, 9, 5))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn cancelled_and_finished_bookings_never_block() {
        let store = seeded_store();
        seed_booking(
            &store,
            1,
            date(2026, 9, 3),
            date(2026, 9, 8),
            ReservationState::Cancelled,
        )
        .await;
        seed_booking(
            &store,
            1,
            date(2026, 9, 3),
            date(2026, 9, 8),
            ReservationState::Finished,
        )
        .await;
        let svc = service(&store);
        assert!(svc
            .is_available(1, date(2026, 9, 1), date(2026, 9, 10))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn available_equipment_filters_busy_and_flagged() {
        let store = seeded_store();
        store.seed_equipment("Kayak #3", 1, 1, "90");
        store.set_equipment_available(3, false);
        seed_booking(
            &store,
            1,
            date(2026, 9, 1),
            date(2026, 9, 10),
            ReservationState::InProgress,
        )
        .await;
        let svc = service(&store);

        let open = svc
            .available_equipment(1, date(2026, 9, 5), date(2026, 9, 6))
            .await
            .unwrap();
        let ids: Vec<i64> = open.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[tokio::test]
    async fn unknown_destination_is_not_found() {
        let store = seeded_store();
        let svc = service(&store);
        let err = svc
            .available_equipment(42, date(2026, 9, 1), date(2026, 9, 5))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Destination", .. }));
    }

    #[tokio::test]
    async fn capacity_unlimited_when_no_cap() {
        let store = seeded_store();
        let svc = service(&store);
        assert!(svc
            .destination_has_capacity(1, date(2026, 9, 1), date(2026, 9, 5))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn capacity_requires_an_open_unit() {
        let store = seeded_store();
        store.set_destination_capacity(1, Some(2));
        store.set_equipment_available(2, false);
        seed_booking(
            &store,
            1,
            date(2026, 9, 1),
            date(2026, 9, 10),
            ReservationState::Confirmed,
        )
        .await;
        let svc = service(&store);
        assert!(!svc
            .destination_has_capacity(1, date(2026, 9, 2), date(2026, 9, 4))
            .await
            .unwrap());
    }
}
