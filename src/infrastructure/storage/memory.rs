//! In-memory repository implementations
//!
//! Backs development runs and the service test suites. Reservations live
//! behind a single mutex so the overlap re-check and the write of
//! `insert_checked`/`update_checked` happen in one critical section, giving
//! the same no-double-booking guarantee the database transaction provides.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;

use crate::domain::policy::repository::PolicyScopeFilter;
use crate::domain::{
    dates_overlap, Client, ClientRepository, Destination, DestinationRepository, DomainError,
    DomainResult, Equipment, EquipmentRepository, EquipmentType, HistoryEntry, HistoryRepository,
    PolicyKind, PolicyRepository, PricingPolicy, Reservation, ReservationRepository,
    ReservationState,
};

/// In-memory store for development and testing
pub struct InMemoryStore {
    clients: DashMap<i64, Client>,
    destinations: DashMap<i64, Destination>,
    equipment_types: DashMap<i64, EquipmentType>,
    equipment: DashMap<i64, Equipment>,
    policies: DashMap<i64, PricingPolicy>,
    reservations: Mutex<HashMap<i64, Reservation>>,
    history: Mutex<Vec<HistoryEntry>>,
    client_counter: AtomicI64,
    destination_counter: AtomicI64,
    equipment_type_counter: AtomicI64,
    equipment_counter: AtomicI64,
    policy_counter: AtomicI64,
    reservation_counter: AtomicI64,
    line_counter: AtomicI64,
    history_counter: AtomicI64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            clients: DashMap::new(),
            destinations: DashMap::new(),
            equipment_types: DashMap::new(),
            equipment: DashMap::new(),
            policies: DashMap::new(),
            reservations: Mutex::new(HashMap::new()),
            history: Mutex::new(Vec::new()),
            client_counter: AtomicI64::new(1),
            destination_counter: AtomicI64::new(1),
            equipment_type_counter: AtomicI64::new(1),
            equipment_counter: AtomicI64::new(1),
            policy_counter: AtomicI64::new(1),
            reservation_counter: AtomicI64::new(1),
            line_counter: AtomicI64::new(1),
            history_counter: AtomicI64::new(1),
        }
    }

    // ── Seeding helpers ────────────────────────────────────────

    pub fn seed_destination(&self, name: &str, region: &str) -> i64 {
        let id = self.destination_counter.fetch_add(1, Ordering::SeqCst);
        self.destinations.insert(id, Destination::new(id, name, region));
        id
    }

    pub fn set_destination_capacity(&self, id: i64, capacity: Option<i32>) {
        if let Some(mut d) = self.destinations.get_mut(&id) {
            d.max_capacity = capacity;
        }
    }

    pub fn seed_equipment_type(&self, name: &str) -> i64 {
        let id = self.equipment_type_counter.fetch_add(1, Ordering::SeqCst);
        self.equipment_types.insert(
            id,
            EquipmentType {
                id,
                name: name.to_string(),
            },
        );
        id
    }

    pub fn seed_equipment(&self, name: &str, type_id: i64, destination_id: i64, price: &str) -> i64 {
        let id = self.equipment_counter.fetch_add(1, Ordering::SeqCst);
        self.equipment.insert(
            id,
            Equipment::new(id, name, type_id, destination_id, price.parse().expect("price")),
        );
        id
    }

    pub fn set_equipment_available(&self, id: i64, available: bool) {
        if let Some(mut e) = self.equipment.get_mut(&id) {
            e.available = available;
        }
    }

    pub fn set_equipment_price(&self, id: i64, price: &str) {
        if let Some(mut e) = self.equipment.get_mut(&id) {
            e.rental_price = price.parse().expect("price");
        }
    }

    pub fn equipment_usage(&self, id: i64) -> i64 {
        self.equipment.get(&id).map(|e| e.usage_count).unwrap_or(0)
    }

    pub fn seed_client(&self, name: &str, document: &str) -> i64 {
        let id = self.client_counter.fetch_add(1, Ordering::SeqCst);
        self.clients.insert(id, Client::new(id, name, document));
        id
    }

    pub fn set_client_count(&self, id: i64, count: i64) {
        if let Some(mut c) = self.clients.get_mut(&id) {
            c.set_reservation_count(count);
        }
    }

    pub fn client(&self, id: i64) -> Option<Client> {
        self.clients.get(&id).map(|c| c.clone())
    }

    /// Insert a policy, keeping a non-zero id as given
    pub fn seed_policy(&self, mut policy: PricingPolicy) -> i64 {
        if policy.id == 0 {
            policy.id = self.policy_counter.fetch_add(1, Ordering::SeqCst);
        } else {
            // keep the counter ahead of explicit ids
            self.policy_counter
                .fetch_max(policy.id + 1, Ordering::SeqCst);
        }
        let id = policy.id;
        self.policies.insert(id, policy);
        id
    }

    pub fn reservation(&self, id: i64) -> Option<Reservation> {
        self.reservations.lock().expect("lock").get(&id).cloned()
    }

    // ── Internals ──────────────────────────────────────────────

    /// Overlap check against the locked reservation map.
    fn conflicting_equipment(
        reservations: &HashMap<i64, Reservation>,
        equipment_id: i64,
        start: NaiveDate,
        end: NaiveDate,
        exclude: Option<i64>,
    ) -> bool {
        reservations.values().any(|r| {
            Some(r.id) != exclude
                && r.state.blocks_availability()
                && dates_overlap(r.start_date, r.end_date, start, end)
                && r.lines.iter().any(|line| line.equipment_id == equipment_id)
        })
    }

    fn assign_line_ids(&self, reservation: &mut Reservation) {
        for line in &mut reservation.lines {
            line.id = self.line_counter.fetch_add(1, Ordering::SeqCst);
            line.reservation_id = reservation.id;
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

// ── ClientRepository ───────────────────────────────────────────

#[async_trait]
impl ClientRepository for InMemoryStore {
    async fn save(&self, mut client: Client) -> DomainResult<Client> {
        client.id = self.client_counter.fetch_add(1, Ordering::SeqCst);
        self.clients.insert(client.id, client.clone());
        Ok(client)
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Client>> {
        Ok(self.clients.get(&id).map(|c| c.clone()))
    }

    async fn find_by_document(&self, document: &str) -> DomainResult<Option<Client>> {
        Ok(self
            .clients
            .iter()
            .find(|c| c.document == document)
            .map(|c| c.clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<Client>> {
        let mut all: Vec<Client> = self.clients.iter().map(|c| c.clone()).collect();
        all.sort_by_key(|c| c.id);
        Ok(all)
    }

    async fn update(&self, client: Client) -> DomainResult<()> {
        if !self.clients.contains_key(&client.id) {
            return Err(DomainError::not_found("Client", client.id));
        }
        self.clients.insert(client.id, client);
        Ok(())
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        self.clients
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("Client", id))?;
        Ok(())
    }
}

// ── DestinationRepository ──────────────────────────────────────

#[async_trait]
impl DestinationRepository for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Destination>> {
        Ok(self.destinations.get(&id).map(|d| d.clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<Destination>> {
        let mut all: Vec<Destination> = self.destinations.iter().map(|d| d.clone()).collect();
        all.sort_by_key(|d| d.id);
        Ok(all)
    }
}

// ── EquipmentRepository ────────────────────────────────────────

#[async_trait]
impl EquipmentRepository for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Equipment>> {
        Ok(self.equipment.get(&id).map(|e| e.clone()))
    }

    async fn find_by_destination(&self, destination_id: i64) -> DomainResult<Vec<Equipment>> {
        let mut found: Vec<Equipment> = self
            .equipment
            .iter()
            .filter(|e| e.destination_id == destination_id)
            .map(|e| e.clone())
            .collect();
        found.sort_by_key(|e| e.id);
        Ok(found)
    }

    async fn find_type_by_id(&self, type_id: i64) -> DomainResult<Option<EquipmentType>> {
        Ok(self.equipment_types.get(&type_id).map(|t| t.clone()))
    }

    async fn increment_usage(&self, equipment_ids: &[i64]) -> DomainResult<()> {
        for id in equipment_ids {
            let mut e = self
                .equipment
                .get_mut(id)
                .ok_or_else(|| DomainError::not_found("Equipment", *id))?;
            e.usage_count += 1;
        }
        Ok(())
    }
}

// ── PolicyRepository ───────────────────────────────────────────

#[async_trait]
impl PolicyRepository for InMemoryStore {
    async fn save(&self, mut policy: PricingPolicy) -> DomainResult<PricingPolicy> {
        policy.id = self.policy_counter.fetch_add(1, Ordering::SeqCst);
        self.policies.insert(policy.id, policy.clone());
        Ok(policy)
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<PricingPolicy>> {
        Ok(self.policies.get(&id).map(|p| p.clone()))
    }

    async fn update(&self, policy: PricingPolicy) -> DomainResult<()> {
        if !self.policies.contains_key(&policy.id) {
            return Err(DomainError::not_found("PricingPolicy", policy.id));
        }
        self.policies.insert(policy.id, policy);
        Ok(())
    }

    async fn find_all(&self) -> DomainResult<Vec<PricingPolicy>> {
        let mut all: Vec<PricingPolicy> = self.policies.iter().map(|p| p.clone()).collect();
        all.sort_by_key(|p| p.id);
        Ok(all)
    }

    async fn find_active_by_kind(
        &self,
        kind: PolicyKind,
        date: NaiveDate,
    ) -> DomainResult<Vec<PricingPolicy>> {
        let mut found: Vec<PricingPolicy> = self
            .policies
            .iter()
            .filter(|p| p.kind == kind && p.valid_on(date))
            .map(|p| p.clone())
            .collect();
        found.sort_by_key(|p| p.id);
        Ok(found)
    }

    async fn find_applicable(
        &self,
        kind: PolicyKind,
        date: NaiveDate,
        scope: PolicyScopeFilter,
    ) -> DomainResult<Vec<PricingPolicy>> {
        let matches_axis = |policy_axis: Option<i64>, wanted: Option<i64>| match wanted {
            None => true,
            Some(id) => policy_axis.is_none() || policy_axis == Some(id),
        };

        let mut found: Vec<PricingPolicy> = self
            .policies
            .iter()
            .filter(|p| {
                p.kind == kind
                    && p.valid_on(date)
                    && matches_axis(p.destination_id, scope.destination_id)
                    && matches_axis(p.equipment_type_id, scope.equipment_type_id)
                    && matches_axis(p.equipment_id, scope.equipment_id)
            })
            .map(|p| p.clone())
            .collect();
        found.sort_by_key(|p| p.id);
        Ok(found)
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        self.policies
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("PricingPolicy", id))?;
        Ok(())
    }
}

// ── ReservationRepository ──────────────────────────────────────

#[async_trait]
impl ReservationRepository for InMemoryStore {
    async fn insert_checked(&self, mut reservation: Reservation) -> DomainResult<Reservation> {
        let mut map = self.reservations.lock().expect("lock");

        for line in &reservation.lines {
            if Self::conflicting_equipment(
                &map,
                line.equipment_id,
                reservation.start_date,
                reservation.end_date,
                None,
            ) {
                return Err(DomainError::Conflict(format!(
                    "equipment {} is already booked in the selected dates",
                    line.equipment_id
                )));
            }
        }

        reservation.id = self.reservation_counter.fetch_add(1, Ordering::SeqCst);
        self.assign_line_ids(&mut reservation);
        map.insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    async fn update_checked(&self, mut reservation: Reservation) -> DomainResult<Reservation> {
        let mut map = self.reservations.lock().expect("lock");

        if !map.contains_key(&reservation.id) {
            return Err(DomainError::not_found("Reservation", reservation.id));
        }

        for line in &reservation.lines {
            if Self::conflicting_equipment(
                &map,
                line.equipment_id,
                reservation.start_date,
                reservation.end_date,
                Some(reservation.id),
            ) {
                return Err(DomainError::Conflict(format!(
                    "equipment {} is already booked in the selected dates",
                    line.equipment_id
                )));
            }
        }

        self.assign_line_ids(&mut reservation);
        map.insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Reservation>> {
        Ok(self.reservations.lock().expect("lock").get(&id).cloned())
    }

    async fn find_all(&self) -> DomainResult<Vec<Reservation>> {
        let map = self.reservations.lock().expect("lock");
        let mut all: Vec<Reservation> = map.values().cloned().collect();
        all.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(all)
    }

    async fn find_by_client(&self, client_id: i64) -> DomainResult<Vec<Reservation>> {
        let map = self.reservations.lock().expect("lock");
        let mut found: Vec<Reservation> = map
            .values()
            .filter(|r| r.client_id == client_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(found)
    }

    async fn find_in_states(
        &self,
        states: &[ReservationState],
    ) -> DomainResult<Vec<Reservation>> {
        let map = self.reservations.lock().expect("lock");
        let mut found: Vec<Reservation> = map
            .values()
            .filter(|r| states.contains(&r.state))
            .cloned()
            .collect();
        found.sort_by_key(|r| r.id);
        Ok(found)
    }

    async fn set_state(&self, id: i64, state: ReservationState) -> DomainResult<()> {
        let mut map = self.reservations.lock().expect("lock");
        let reservation = map
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("Reservation", id))?;
        reservation.state = state;
        Ok(())
    }

    async fn has_overlap(
        &self,
        equipment_id: i64,
        start: NaiveDate,
        end: NaiveDate,
        exclude_reservation: Option<i64>,
    ) -> DomainResult<bool> {
        let map = self.reservations.lock().expect("lock");
        Ok(Self::conflicting_equipment(
            &map,
            equipment_id,
            start,
            end,
            exclude_reservation,
        ))
    }

    async fn busy_equipment_ids(
        &self,
        equipment_ids: &[i64],
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<Vec<i64>> {
        let map = self.reservations.lock().expect("lock");
        let mut busy: Vec<i64> = map
            .values()
            .filter(|r| r.state.blocks_availability() && dates_overlap(r.start_date, r.end_date, start, end))
            .flat_map(|r| r.lines.iter().map(|line| line.equipment_id))
            .filter(|id| equipment_ids.contains(id))
            .collect();
        busy.sort_unstable();
        busy.dedup();
        Ok(busy)
    }

    async fn count_non_cancelled(&self, client_id: i64) -> DomainResult<i64> {
        let map = self.reservations.lock().expect("lock");
        Ok(map
            .values()
            .filter(|r| r.client_id == client_id && r.state != ReservationState::Cancelled)
            .count() as i64)
    }

    async fn count_for_client(&self, client_id: i64) -> DomainResult<i64> {
        let map = self.reservations.lock().expect("lock");
        Ok(map.values().filter(|r| r.client_id == client_id).count() as i64)
    }
}

// ── HistoryRepository ──────────────────────────────────────────

#[async_trait]
impl HistoryRepository for InMemoryStore {
    async fn append(&self, mut entry: HistoryEntry) -> DomainResult<HistoryEntry> {
        entry.id = self.history_counter.fetch_add(1, Ordering::SeqCst);
        self.history.lock().expect("lock").push(entry.clone());
        Ok(entry)
    }

    async fn find_by_reservation(&self, reservation_id: i64) -> DomainResult<Vec<HistoryEntry>> {
        let log = self.history.lock().expect("lock");
        let mut found: Vec<HistoryEntry> = log
            .iter()
            .filter(|e| e.reservation_id == reservation_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| (b.changed_at, b.id).cmp(&(a.changed_at, a.id)));
        Ok(found)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn booking(equipment_id: i64, start: NaiveDate, end: NaiveDate) -> Reservation {
        let mut r = Reservation::new(0, 1, 1, start, end, Utc::now());
        r.lines.push(crate::domain::ReservationLine {
            id: 0,
            reservation_id: 0,
            equipment_id,
            unit_price: Decimal::ONE,
        });
        r
    }

    #[tokio::test]
    async fn insert_checked_rejects_overlap() {
        let store = InMemoryStore::new();
        store
            .insert_checked(booking(1, date(2026, 9, 1), date(2026, 9, 5)))
            .await
            .unwrap();

        let err = store
            .insert_checked(booking(1, date(2026, 9, 5), date(2026, 9, 8)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        // different item is fine
        store
            .insert_checked(booking(2, date(2026, 9, 5), date(2026, 9, 8)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn concurrent_creates_cannot_both_win() {
        let store = std::sync::Arc::new(InMemoryStore::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .insert_checked(booking(1, date(2026, 9, 1), date(2026, 9, 5)))
                    .await
            }));
        }

        let mut won = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                won += 1;
            }
        }
        assert_eq!(won, 1);
    }

    #[tokio::test]
    async fn update_checked_ignores_own_rows() {
        let store = InMemoryStore::new();
        let saved = store
            .insert_checked(booking(1, date(2026, 9, 1), date(2026, 9, 5)))
            .await
            .unwrap();

        let mut moved = saved.clone();
        moved.start_date = date(2026, 9, 2);
        moved.end_date = date(2026, 9, 6);
        store.update_checked(moved).await.unwrap();
    }

    #[tokio::test]
    async fn counts_exclude_cancelled() {
        let store = InMemoryStore::new();
        let a = store
            .insert_checked(booking(1, date(2026, 9, 1), date(2026, 9, 2)))
            .await
            .unwrap();
        store
            .insert_checked(booking(2, date(2026, 9, 1), date(2026, 9, 2)))
            .await
            .unwrap();
        store.set_state(a.id, ReservationState::Cancelled).await.unwrap();

        assert_eq!(store.count_non_cancelled(1).await.unwrap(), 1);
        assert_eq!(store.count_for_client(1).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn busy_ids_are_deduplicated() {
        let store = InMemoryStore::new();
        store
            .insert_checked(booking(1, date(2026, 9, 1), date(2026, 9, 3)))
            .await
            .unwrap();
        store
            .insert_checked(booking(1, date(2026, 9, 4), date(2026, 9, 6)))
            .await
            .unwrap();

        let busy = store
            .busy_equipment_ids(&[1, 2], date(2026, 9, 1), date(2026, 9, 30))
            .await
            .unwrap();
        assert_eq!(busy, vec![1]);
    }
}
