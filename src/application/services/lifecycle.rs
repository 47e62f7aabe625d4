//! Reservation lifecycle orchestration
//!
//! Create and Modify run the full pipeline: validation, per-item
//! availability, line building at frozen catalog prices, pricing, one atomic
//! persist, then the audit entry and client loyalty refresh. Confirm and
//! Cancel are pure state transitions gated by the domain state machine.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use super::availability::AvailabilityService;
use super::pricing::{PricedItem, PricingInput, PricingService};
use crate::domain::{
    Clock, ClientRepository, DestinationRepository, DomainError, DomainResult, Equipment,
    EquipmentRepository, HistoryEntry, HistoryRepository, Reservation, ReservationLine,
    ReservationRepository, ReservationState,
};

/// Actor tag recorded on interactively triggered transitions
pub const ACTOR_USER: &str = "USER";
/// Actor tag recorded on sweep-driven transitions
pub const ACTOR_SYSTEM: &str = "SYSTEM";

pub struct ReservationService {
    clients: Arc<dyn ClientRepository>,
    destinations: Arc<dyn DestinationRepository>,
    equipment: Arc<dyn EquipmentRepository>,
    reservations: Arc<dyn ReservationRepository>,
    history: Arc<dyn HistoryRepository>,
    availability: Arc<AvailabilityService>,
    pricing: Arc<PricingService>,
    clock: Arc<dyn Clock>,
}

impl ReservationService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        clients: Arc<dyn ClientRepository>,
        destinations: Arc<dyn DestinationRepository>,
        equipment: Arc<dyn EquipmentRepository>,
        reservations: Arc<dyn ReservationRepository>,
        history: Arc<dyn HistoryRepository>,
        availability: Arc<AvailabilityService>,
        pricing: Arc<PricingService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            clients,
            destinations,
            equipment,
            reservations,
            history,
            availability,
            pricing,
            clock,
        }
    }

    /// Book equipment for a client over an inclusive date range.
    pub async fn create(
        &self,
        client_id: i64,
        start: NaiveDate,
        end: NaiveDate,
        destination_id: i64,
        equipment_ids: &[i64],
    ) -> DomainResult<Reservation> {
        let client = self
            .clients
            .find_by_id(client_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Client", client_id))?;

        if !self.destinations.exists(destination_id).await? {
            return Err(DomainError::not_found("Destination", destination_id));
        }

        self.availability.validate_range(start, end)?;

        let items = self
            .checked_items(equipment_ids, start, end, None)
            .await?;

        let mut reservation =
            Reservation::new(0, client_id, destination_id, start, end, self.clock.now());
        reservation.lines = items
            .iter()
            .map(|e| ReservationLine {
                id: 0,
                reservation_id: 0,
                equipment_id: e.id,
                unit_price: e.rental_price,
            })
            .collect();

        let quote = self
            .pricing
            .quote(&Self::pricing_input(&reservation, &items, client.tier))
            .await?;
        reservation.apply_pricing(&quote);

        let saved = self.reservations.insert_checked(reservation).await?;

        self.record(&saved, None, ACTOR_USER, "Reservation created")
            .await?;

        self.refresh_loyalty(client_id).await?;
        self.equipment.increment_usage(equipment_ids).await?;

        info!(
            reservation_id = saved.id,
            client_id,
            destination_id,
            total = %saved.total,
            "Reservation created"
        );
        Ok(saved)
    }

    /// Replace a reservation's client, dates, destination and lines, then
    /// re-price. Illegal once the reservation is finished or cancelled.
    pub async fn modify(
        &self,
        id: i64,
        client_id: i64,
        start: NaiveDate,
        end: NaiveDate,
        destination_id: i64,
        equipment_ids: &[i64],
    ) -> DomainResult<Reservation> {
        let mut reservation = self.get(id).await?;
        reservation.ensure_modifiable()?;

        let client = self
            .clients
            .find_by_id(client_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Client", client_id))?;

        if !self.destinations.exists(destination_id).await? {
            return Err(DomainError::not_found("Destination", destination_id));
        }

        self.availability.validate_range(start, end)?;

        let items = self
            .checked_items(equipment_ids, start, end, Some(id))
            .await?;

        reservation.client_id = client_id;
        reservation.destination_id = destination_id;
        reservation.start_date = start;
        reservation.end_date = end;
        reservation.lines = items
            .iter()
            .map(|e| ReservationLine {
                id: 0,
                reservation_id: id,
                equipment_id: e.id,
                unit_price: e.rental_price,
            })
            .collect();

        let quote = self
            .pricing
            .quote(&Self::pricing_input(&reservation, &items, client.tier))
            .await?;
        reservation.apply_pricing(&quote);

        let state = reservation.state;
        let saved = self.reservations.update_checked(reservation).await?;

        // state unchanged; the trail still records the edit
        self.record(&saved, Some(state), ACTOR_USER, "Reservation modified")
            .await?;

        info!(reservation_id = id, total = %saved.total, "Reservation modified");
        Ok(saved)
    }

    /// Confirm a pending reservation.
    pub async fn confirm(&self, id: i64) -> DomainResult<Reservation> {
        let mut reservation = self.get(id).await?;
        let previous = reservation.state;
        reservation.confirm()?;
        self.reservations.set_state(id, reservation.state).await?;
        self.record(&reservation, Some(previous), ACTOR_USER, "Reservation confirmed")
            .await?;
        info!(reservation_id = id, "Reservation confirmed");
        Ok(reservation)
    }

    /// Cancel a reservation that has not finished. Usage counters and the
    /// priced amounts stay as they are; the client's loyalty count is
    /// recomputed because cancelled bookings no longer count.
    pub async fn cancel(&self, id: i64) -> DomainResult<Reservation> {
        let mut reservation = self.get(id).await?;
        let previous = reservation.state;
        reservation.cancel()?;
        self.reservations.set_state(id, reservation.state).await?;
        self.record(&reservation, Some(previous), ACTOR_USER, "Reservation cancelled")
            .await?;

        self.refresh_loyalty(reservation.client_id).await?;

        info!(reservation_id = id, "Reservation cancelled");
        Ok(reservation)
    }

    pub async fn get(&self, id: i64) -> DomainResult<Reservation> {
        self.reservations
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Reservation", id))
    }

    /// All reservations, newest first.
    pub async fn list(&self) -> DomainResult<Vec<Reservation>> {
        self.reservations.find_all().await
    }

    /// A client's reservations, newest first.
    pub async fn list_by_client(&self, client_id: i64) -> DomainResult<Vec<Reservation>> {
        if self.clients.find_by_id(client_id).await?.is_none() {
            return Err(DomainError::not_found("Client", client_id));
        }
        self.reservations.find_by_client(client_id).await
    }

    /// A reservation's audit trail, newest change first.
    pub async fn history_of(&self, id: i64) -> DomainResult<Vec<HistoryEntry>> {
        // existence check keeps NotFound distinct from an empty trail
        self.get(id).await?;
        self.history.find_by_reservation(id).await
    }

    /// Recompute a client's reservation count and tier from the store.
    ///
    /// Always recomputed from the authoritative non-cancelled count, never
    /// incremented in place, so the pair cannot drift.
    pub async fn refresh_loyalty(&self, client_id: i64) -> DomainResult<()> {
        let mut client = self
            .clients
            .find_by_id(client_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Client", client_id))?;
        let count = self.reservations.count_non_cancelled(client_id).await?;
        client.set_reservation_count(count);
        self.clients.update(client).await
    }

    /// Resolve and vet each requested item: it must exist, carry its
    /// availability flag, and be free of overlapping active bookings. Fails
    /// fast naming the first offending item.
    async fn checked_items(
        &self,
        equipment_ids: &[i64],
        start: NaiveDate,
        end: NaiveDate,
        exclude_reservation: Option<i64>,
    ) -> DomainResult<Vec<Equipment>> {
        if equipment_ids.is_empty() {
            return Err(DomainError::Unavailable(
                "a reservation must include at least one equipment item".into(),
            ));
        }

        let mut items = Vec::with_capacity(equipment_ids.len());
        for &equipment_id in equipment_ids {
            let equipment = self
                .equipment
                .find_by_id(equipment_id)
                .await?
                .ok_or_else(|| DomainError::not_found("Equipment", equipment_id))?;

            if !equipment.available {
                return Err(DomainError::Unavailable(format!(
                    "equipment '{}' is not available",
                    equipment.name
                )));
            }

            if self
                .reservations
                .has_overlap(equipment_id, start, end, exclude_reservation)
                .await?
            {
                return Err(DomainError::Conflict(format!(
                    "equipment '{}' is already booked in the selected dates",
                    equipment.name
                )));
            }

            items.push(equipment);
        }
        Ok(items)
    }

    fn pricing_input(
        reservation: &Reservation,
        items: &[Equipment],
        tier: crate::domain::LoyaltyTier,
    ) -> PricingInput {
        PricingInput {
            start_date: reservation.start_date,
            end_date: reservation.end_date,
            destination_id: reservation.destination_id,
            tier,
            items: items
                .iter()
                .map(|e| PricedItem {
                    equipment_id: e.id,
                    equipment_type_id: e.type_id,
                    unit_price: e.rental_price,
                })
                .collect(),
        }
    }

    async fn record(
        &self,
        reservation: &Reservation,
        previous: Option<ReservationState>,
        actor: &str,
        note: &str,
    ) -> DomainResult<()> {
        self.history
            .append(HistoryEntry {
                id: 0,
                reservation_id: reservation.id,
                previous,
                new_state: reservation.state,
                actor: actor.to_string(),
                note: note.to_string(),
                changed_at: self.clock.now(),
            })
            .await?;
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FixedClock, LoyaltyTier, PolicyKind, PricingPolicy};
    use crate::infrastructure::storage::memory::InMemoryStore;
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2026, 8, 1)
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    struct Fixture {
        store: Arc<InMemoryStore>,
        service: ReservationService,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        store.seed_destination("Playa Blanca", "Caribe");
        store.seed_equipment_type("Kayak");
        store.seed_equipment("Kayak #1", 1, 1, "100000");
        store.seed_equipment("Kayak #2", 1, 1, "50000");
        store.seed_client("Ana Rojas", "CC-1001");

        let clock = Arc::new(FixedClock::on_date(today()));
        let availability = Arc::new(AvailabilityService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            clock.clone(),
        ));
        let pricing = Arc::new(PricingService::new(store.clone()));
        let service = ReservationService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            availability,
            pricing,
            clock,
        );
        Fixture { store, service }
    }

    #[tokio::test]
    async fn create_prices_and_records_history() {
        let f = fixture();
        let mut duration = PricingPolicy::new(0, "Week off", PolicyKind::DurationDiscount, dec("10"));
        duration.min_days = Some(7);
        f.store.seed_policy(duration);

        let r = f
            .service
            .create(1, date(2026, 9, 1), date(2026, 9, 7), 1, &[1])
            .await
            .unwrap();

        assert_eq!(r.state, ReservationState::Pending);
        assert_eq!(r.subtotal, dec("100000"));
        assert_eq!(r.discounts, dec("10000.00"));
        assert_eq!(r.total, dec("90000.00"));
        assert_eq!(r.lines.len(), 1);
        assert_eq!(r.lines[0].unit_price, dec("100000"));

        let trail = f.service.history_of(r.id).await.unwrap();
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].previous, None);
        assert_eq!(trail[0].new_state, ReservationState::Pending);

        // loyalty count picked up the booking, usage counter bumped
        let client = f.store.client(1).unwrap();
        assert_eq!(client.reservation_count, 1);
        assert_eq!(f.store.equipment_usage(1), 1);
    }

    #[tokio::test]
    async fn create_requires_equipment() {
        let f = fixture();
        let err = f
            .service
            .create(1, date(2026, 9, 1), date(2026, 9, 7), 1, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unavailable(_)));
    }

    #[tokio::test]
    async fn create_fails_fast_on_flagged_item() {
        let f = fixture();
        f.store.set_equipment_available(2, false);
        let err = f
            .service
            .create(1, date(2026, 9, 1), date(2026, 9, 7), 1, &[1, 2])
            .await
            .unwrap_err();
        match err {
            DomainError::Unavailable(msg) => assert!(msg.contains("Kayak #2")),
            other => panic!("expected Unavailable, got {:?}", other),
        }
        // nothing was persisted for the partially validated request
        assert!(f.service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn overlapping_create_conflicts() {
        let f = fixture();
        f.service
            .create(1, date(2026, 9, 1), date(2026, 9, 7), 1, &[1])
            .await
            .unwrap();

        let err = f
            .service
            .create(1, date(2026, 9, 7), date(2026, 9, 9), 1, &[1])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        // disjoint range books fine
        f.service
            .create(1, date(2026, 9, 8), date(2026, 9, 10), 1, &[1])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn unknown_references_are_not_found() {
        let f = fixture();
        let err = f
            .service
            .create(9, date(2026, 9, 1), date(2026, 9, 2), 1, &[1])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Client", .. }));

        let err = f
            .service
            .create(1, date(2026, 9, 1), date(2026, 9, 2), 9, &[1])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Destination", .. }));

        let err = f
            .service
            .create(1, date(2026, 9, 1), date(2026, 9, 2), 1, &[9])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Equipment", .. }));
    }

    #[tokio::test]
    async fn modify_replaces_lines_and_reprices() {
        let f = fixture();
        let r = f
            .service
            .create(1, date(2026, 9, 1), date(2026, 9, 7), 1, &[1])
            .await
            .unwrap();

        let updated = f
            .service
            .modify(r.id, 1, date(2026, 9, 2), date(2026, 9, 5), 1, &[2])
            .await
            .unwrap();

        assert_eq!(updated.state, ReservationState::Pending);
        assert_eq!(updated.subtotal, dec("50000"));
        assert_eq!(updated.lines.len(), 1);
        assert_eq!(updated.lines[0].equipment_id, 2);

        let trail = f.service.history_of(r.id).await.unwrap();
        assert_eq!(trail.len(), 2);
        assert_eq!(trail[0].previous, Some(ReservationState::Pending));
        assert_eq!(trail[0].new_state, ReservationState::Pending);
        assert!(trail[0].note.contains("modified"));
    }

    #[tokio::test]
    async fn modify_keeps_own_dates_out_of_the_overlap_check() {
        let f = fixture();
        let r = f
            .service
            .create(1, date(2026, 9, 1), date(2026, 9, 7), 1, &[1])
            .await
            .unwrap();

        // same item, shifted inside its own original range
        f.service
            .modify(r.id, 1, date(2026, 9, 2), date(2026, 9, 6), 1, &[1])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn modify_terminal_is_illegal() {
        let f = fixture();
        let r = f
            .service
            .create(1, date(2026, 9, 1), date(2026, 9, 7), 1, &[1])
            .await
            .unwrap();
        f.service.cancel(r.id).await.unwrap();

        let err = f
            .service
            .modify(r.id, 1, date(2026, 9, 2), date(2026, 9, 6), 1, &[1])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::IllegalTransition { action: "modify", .. }));
    }

    #[tokio::test]
    async fn confirm_then_cancel_lifecycle() {
        let f = fixture();
        let r = f
            .service
            .create(1, date(2026, 9, 1), date(2026, 9, 7), 1, &[1])
            .await
            .unwrap();

        let confirmed = f.service.confirm(r.id).await.unwrap();
        assert_eq!(confirmed.state, ReservationState::Confirmed);

        // confirm again is illegal
        let err = f.service.confirm(r.id).await.unwrap_err();
        assert!(matches!(err, DomainError::IllegalTransition { action: "confirm", .. }));

        let cancelled = f.service.cancel(r.id).await.unwrap();
        assert_eq!(cancelled.state, ReservationState::Cancelled);

        // cancel again is illegal too
        let err = f.service.cancel(r.id).await.unwrap_err();
        assert!(matches!(err, DomainError::IllegalTransition { action: "cancel", .. }));

        let trail = f.service.history_of(r.id).await.unwrap();
        assert_eq!(trail.len(), 3);
        // newest first
        assert_eq!(trail[0].new_state, ReservationState::Cancelled);
        assert_eq!(trail[1].new_state, ReservationState::Confirmed);
        assert_eq!(trail[2].previous, None);
    }

    #[tokio::test]
    async fn cancel_recomputes_loyalty_count() {
        let f = fixture();
        let r = f
            .service
            .create(1, date(2026, 9, 1), date(2026, 9, 7), 1, &[1])
            .await
            .unwrap();
        f.service
            .create(1, date(2026, 10, 1), date(2026, 10, 3), 1, &[2])
            .await
            .unwrap();

        assert_eq!(f.store.client(1).unwrap().reservation_count, 2);

        f.service.cancel(r.id).await.unwrap();
        let client = f.store.client(1).unwrap();
        assert_eq!(client.reservation_count, 1);
        assert_eq!(client.tier, LoyaltyTier::Bronze);
    }

    #[tokio::test]
    async fn loyalty_tier_rises_with_bookings() {
        let f = fixture();
        for i in 0..5 {
            let start = date(2026, 9, 1) + chrono::Duration::days(i * 3);
            f.service
                .create(1, start, start + chrono::Duration::days(1), 1, &[1])
                .await
                .unwrap();
        }
        let client = f.store.client(1).unwrap();
        assert_eq!(client.reservation_count, 5);
        assert_eq!(client.tier, LoyaltyTier::Silver);
    }

    #[tokio::test]
    async fn gold_client_gets_loyalty_pricing() {
        let f = fixture();
        let mut loyalty = PricingPolicy::new(0, "Gold perk", PolicyKind::LoyaltyDiscount, dec("15"));
        loyalty.tier = Some(LoyaltyTier::Gold);
        f.store.seed_policy(loyalty);
        f.store.set_client_count(1, 12);

        let r = f
            .service
            .create(1, date(2026, 9, 1), date(2026, 9, 3), 1, &[1])
            .await
            .unwrap();
        assert_eq!(r.discounts, dec("15000.00"));
        assert_eq!(r.total, dec("85000.00"));
    }

    #[tokio::test]
    async fn line_prices_survive_catalog_changes() {
        let f = fixture();
        let r = f
            .service
            .create(1, date(2026, 9, 1), date(2026, 9, 7), 1, &[1])
            .await
            .unwrap();

        f.store.set_equipment_price(1, "999999");

        let same = f.service.get(r.id).await.unwrap();
        assert_eq!(same.lines[0].unit_price, dec("100000"));
    }
}
