//! Client registry
//!
//! Registration and upkeep of rental clients. The loyalty pair
//! (count + tier) is refreshed from the reservation store on reads that
//! need it fresh, never adjusted in place.

use std::sync::Arc;

use tracing::info;

use crate::domain::{
    Client, ClientRepository, DomainError, DomainResult, ReservationRepository,
};

pub struct ClientService {
    clients: Arc<dyn ClientRepository>,
    reservations: Arc<dyn ReservationRepository>,
}

impl ClientService {
    pub fn new(
        clients: Arc<dyn ClientRepository>,
        reservations: Arc<dyn ReservationRepository>,
    ) -> Self {
        Self {
            clients,
            reservations,
        }
    }

    pub async fn register(&self, client: Client) -> DomainResult<Client> {
        Self::validate(&client)?;

        if let Some(existing) = self.clients.find_by_document(&client.document).await? {
            return Err(DomainError::Conflict(format!(
                "a client with document {} is already registered (id {})",
                existing.document, existing.id
            )));
        }

        let saved = self.clients.save(client).await?;
        info!(client_id = saved.id, "Client registered");
        Ok(saved)
    }

    pub async fn update(&self, id: i64, mut client: Client) -> DomainResult<Client> {
        if self.clients.find_by_id(id).await?.is_none() {
            return Err(DomainError::not_found("Client", id));
        }
        Self::validate(&client)?;

        if let Some(other) = self.clients.find_by_document(&client.document).await? {
            if other.id != id {
                return Err(DomainError::Conflict(format!(
                    "another client already uses document {}",
                    client.document
                )));
            }
        }

        client.id = id;
        self.clients.update(client.clone()).await?;
        Ok(client)
    }

    /// Fetch a client with the loyalty pair recomputed from the store.
    pub async fn find_fresh(&self, id: i64) -> DomainResult<Client> {
        let mut client = self
            .clients
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Client", id))?;

        let count = self.reservations.count_non_cancelled(id).await?;
        if count != client.reservation_count {
            client.set_reservation_count(count);
            self.clients.update(client.clone()).await?;
        }
        Ok(client)
    }

    pub async fn list(&self) -> DomainResult<Vec<Client>> {
        self.clients.find_all().await
    }

    /// Remove a client. Refused while any reservation still references them.
    pub async fn delete(&self, id: i64) -> DomainResult<()> {
        if self.clients.find_by_id(id).await?.is_none() {
            return Err(DomainError::not_found("Client", id));
        }
        let referenced = self.reservations.count_for_client(id).await?;
        if referenced > 0 {
            return Err(DomainError::Conflict(format!(
                "client {} has {} reservation(s) and cannot be deleted",
                id, referenced
            )));
        }
        self.clients.delete(id).await?;
        info!(client_id = id, "Client deleted");
        Ok(())
    }

    fn validate(client: &Client) -> DomainResult<()> {
        if client.name.trim().is_empty() {
            return Err(DomainError::Validation("client name is required".into()));
        }
        if client.document.trim().is_empty() {
            return Err(DomainError::Validation(
                "client identity document is required".into(),
            ));
        }
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LoyaltyTier, Reservation, ReservationState};
    use crate::infrastructure::storage::memory::InMemoryStore;
    use chrono::{NaiveDate, Utc};

    fn service() -> (Arc<InMemoryStore>, ClientService) {
        let store = Arc::new(InMemoryStore::new());
        let svc = ClientService::new(store.clone(), store.clone());
        (store, svc)
    }

    fn draft(name: &str, document: &str) -> Client {
        Client::new(0, name, document)
    }

    #[tokio::test]
    async fn register_and_fetch() {
        let (_, svc) = service();
        let saved = svc.register(draft("Ana Rojas", "CC-1001")).await.unwrap();
        assert!(saved.id > 0);
        assert_eq!(saved.tier, LoyaltyTier::Bronze);
    }

    #[tokio::test]
    async fn blank_fields_are_rejected() {
        let (_, svc) = service();
        assert!(matches!(
            svc.register(draft("", "CC-1")).await.unwrap_err(),
            DomainError::Validation(_)
        ));
        assert!(matches!(
            svc.register(draft("Ana", "  ")).await.unwrap_err(),
            DomainError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn duplicate_document_conflicts() {
        let (_, svc) = service();
        svc.register(draft("Ana Rojas", "CC-1001")).await.unwrap();
        assert!(matches!(
            svc.register(draft("Luis Mora", "CC-1001")).await.unwrap_err(),
            DomainError::Conflict(_)
        ));
    }

    #[tokio::test]
    async fn update_may_keep_own_document() {
        let (_, svc) = service();
        let saved = svc.register(draft("Ana Rojas", "CC-1001")).await.unwrap();

        let mut renamed = saved.clone();
        renamed.name = "Ana Rojas de Silva".to_string();
        let updated = svc.update(saved.id, renamed).await.unwrap();
        assert_eq!(updated.name, "Ana Rojas de Silva");

        svc.register(draft("Luis Mora", "CC-2002")).await.unwrap();
        let mut stolen = saved.clone();
        stolen.document = "CC-2002".to_string();
        assert!(matches!(
            svc.update(saved.id, stolen).await.unwrap_err(),
            DomainError::Conflict(_)
        ));
    }

    #[tokio::test]
    async fn find_fresh_recomputes_loyalty() {
        let (store, svc) = service();
        let saved = svc.register(draft("Ana Rojas", "CC-1001")).await.unwrap();

        // six bookings land directly in the store, one of them cancelled
        for i in 0..6 {
            let start = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()
                + chrono::Duration::days(i * 5);
            let mut r = Reservation::new(0, saved.id, 1, start, start, Utc::now());
            r.lines.push(crate::domain::ReservationLine {
                id: 0,
                reservation_id: 0,
                equipment_id: i + 1,
                unit_price: "10".parse().unwrap(),
            });
            let persisted = store.insert_checked(r).await.unwrap();
            if i == 0 {
                store
                    .set_state(persisted.id, ReservationState::Cancelled)
                    .await
                    .unwrap();
            }
        }

        let fresh = svc.find_fresh(saved.id).await.unwrap();
        assert_eq!(fresh.reservation_count, 5);
        assert_eq!(fresh.tier, LoyaltyTier::Silver);
    }

    #[tokio::test]
    async fn delete_refused_while_referenced() {
        let (store, svc) = service();
        let saved = svc.register(draft("Ana Rojas", "CC-1001")).await.unwrap();

        let start = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let mut r = Reservation::new(0, saved.id, 1, start, start, Utc::now());
        r.lines.push(crate::domain::ReservationLine {
            id: 0,
            reservation_id: 0,
            equipment_id: 1,
            unit_price: "10".parse().unwrap(),
        });
        store.insert_checked(r).await.unwrap();

        assert!(matches!(
            svc.delete(saved.id).await.unwrap_err(),
            DomainError::Conflict(_)
        ));
    }

    #[tokio::test]
    async fn delete_unreferenced_client() {
        let (_, svc) = service();
        let saved = svc.register(draft("Ana Rojas", "CC-1001")).await.unwrap();
        svc.delete(saved.id).await.unwrap();
        assert!(matches!(
            svc.find_fresh(saved.id).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
    }
}
