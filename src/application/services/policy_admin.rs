//! Pricing policy administration
//!
//! CRUD over the configurable policy rows the pricing engine reads. The
//! engine itself never writes policies.

use std::sync::Arc;

use tracing::info;

use crate::domain::{
    DestinationRepository, DomainError, DomainResult, EquipmentRepository, PolicyRepository,
    PricingPolicy,
};
use rust_decimal::Decimal;

pub struct PolicyService {
    policies: Arc<dyn PolicyRepository>,
    destinations: Arc<dyn DestinationRepository>,
    equipment: Arc<dyn EquipmentRepository>,
}

impl PolicyService {
    pub fn new(
        policies: Arc<dyn PolicyRepository>,
        destinations: Arc<dyn DestinationRepository>,
        equipment: Arc<dyn EquipmentRepository>,
    ) -> Self {
        Self {
            policies,
            destinations,
            equipment,
        }
    }

    pub async fn create(&self, policy: PricingPolicy) -> DomainResult<PricingPolicy> {
        self.validate(&policy).await?;
        let saved = self.policies.save(policy).await?;
        info!(policy_id = saved.id, name = %saved.name, kind = %saved.kind, "Policy created");
        Ok(saved)
    }

    pub async fn update(&self, id: i64, mut policy: PricingPolicy) -> DomainResult<PricingPolicy> {
        if self.policies.find_by_id(id).await?.is_none() {
            return Err(DomainError::not_found("PricingPolicy", id));
        }
        policy.id = id;
        self.validate(&policy).await?;
        self.policies.update(policy.clone()).await?;
        info!(policy_id = id, "Policy updated");
        Ok(policy)
    }

    /// Activate or deactivate without touching the rest of the row.
    pub async fn set_active(&self, id: i64, active: bool) -> DomainResult<PricingPolicy> {
        let mut policy = self
            .policies
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("PricingPolicy", id))?;
        policy.active = active;
        self.policies.update(policy.clone()).await?;
        info!(policy_id = id, active, "Policy state changed");
        Ok(policy)
    }

    pub async fn find(&self, id: i64) -> DomainResult<PricingPolicy> {
        self.policies
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("PricingPolicy", id))
    }

    pub async fn list(&self) -> DomainResult<Vec<PricingPolicy>> {
        self.policies.find_all().await
    }

    pub async fn delete(&self, id: i64) -> DomainResult<()> {
        self.policies.delete(id).await
    }

    async fn validate(&self, policy: &PricingPolicy) -> DomainResult<()> {
        if policy.name.trim().is_empty() {
            return Err(DomainError::Validation("policy name is required".into()));
        }

        if policy.percentage < Decimal::ZERO || policy.percentage > Decimal::ONE_HUNDRED {
            return Err(DomainError::Validation(
                "percentage must be between 0 and 100".into(),
            ));
        }

        if let (Some(from), Some(until)) = (policy.valid_from, policy.valid_until) {
            if from > until {
                return Err(DomainError::Validation(
                    "validity window start is after its end".into(),
                ));
            }
        }

        if let Some(min) = policy.min_days {
            if min <= 0 {
                return Err(DomainError::Validation("min_days must be positive".into()));
            }
        }
        if let Some(max) = policy.max_days {
            if max <= 0 {
                return Err(DomainError::Validation("max_days must be positive".into()));
            }
        }
        if let (Some(min), Some(max)) = (policy.min_days, policy.max_days) {
            if min > max {
                return Err(DomainError::Validation(
                    "min_days cannot exceed max_days".into(),
                ));
            }
        }

        if let Some(destination_id) = policy.destination_id {
            if !self.destinations.exists(destination_id).await? {
                return Err(DomainError::not_found("Destination", destination_id));
            }
        }
        if let Some(type_id) = policy.equipment_type_id {
            if self.equipment.find_type_by_id(type_id).await?.is_none() {
                return Err(DomainError::not_found("EquipmentType", type_id));
            }
        }
        if let Some(equipment_id) = policy.equipment_id {
            if !self.equipment.exists(equipment_id).await? {
                return Err(DomainError::not_found("Equipment", equipment_id));
            }
        }

        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PolicyKind;
    use crate::infrastructure::storage::memory::InMemoryStore;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn service() -> (Arc<InMemoryStore>, PolicyService) {
        let store = Arc::new(InMemoryStore::new());
        store.seed_destination("Playa Blanca", "Caribe");
        store.seed_equipment_type("Kayak");
        store.seed_equipment("Kayak #1", 1, 1, "100");
        let svc = PolicyService::new(store.clone(), store.clone(), store.clone());
        (store, svc)
    }

    fn draft(pct: &str) -> PricingPolicy {
        PricingPolicy::new(0, "Low season", PolicyKind::SeasonalDiscount, dec(pct))
    }

    #[tokio::test]
    async fn create_assigns_id() {
        let (_, svc) = service();
        let saved = svc.create(draft("12.5")).await.unwrap();
        assert!(saved.id > 0);
        assert_eq!(svc.find(saved.id).await.unwrap().percentage, dec("12.5"));
    }

    #[tokio::test]
    async fn percentage_out_of_range_is_rejected() {
        let (_, svc) = service();
        assert!(matches!(
            svc.create(draft("100.01")).await.unwrap_err(),
            DomainError::Validation(_)
        ));
        assert!(matches!(
            svc.create(draft("-1")).await.unwrap_err(),
            DomainError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn inverted_window_is_rejected() {
        let (_, svc) = service();
        let mut p = draft("10");
        p.valid_from = chrono::NaiveDate::from_ymd_opt(2026, 9, 1);
        p.valid_until = chrono::NaiveDate::from_ymd_opt(2026, 8, 1);
        assert!(matches!(
            svc.create(p).await.unwrap_err(),
            DomainError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn day_bounds_must_be_ordered_and_positive() {
        let (_, svc) = service();

        let mut p = draft("10");
        p.min_days = Some(0);
        assert!(svc.create(p).await.is_err());

        let mut p = draft("10");
        p.min_days = Some(10);
        p.max_days = Some(5);
        assert!(matches!(
            svc.create(p).await.unwrap_err(),
            DomainError::Validation(_)
        ));

        let mut p = draft("10");
        p.min_days = Some(5);
        p.max_days = Some(10);
        svc.create(p).await.unwrap();
    }

    #[tokio::test]
    async fn scope_references_must_exist() {
        let (_, svc) = service();

        let mut p = draft("10");
        p.destination_id = Some(42);
        assert!(matches!(
            svc.create(p).await.unwrap_err(),
            DomainError::NotFound { entity: "Destination", .. }
        ));

        let mut p = draft("10");
        p.equipment_id = Some(42);
        assert!(matches!(
            svc.create(p).await.unwrap_err(),
            DomainError::NotFound { entity: "Equipment", .. }
        ));

        let mut p = draft("10");
        p.destination_id = Some(1);
        p.equipment_type_id = Some(1);
        p.equipment_id = Some(1);
        svc.create(p).await.unwrap();
    }

    #[tokio::test]
    async fn set_active_flips_only_the_flag() {
        let (_, svc) = service();
        let saved = svc.create(draft("10")).await.unwrap();

        let off = svc.set_active(saved.id, false).await.unwrap();
        assert!(!off.active);
        assert_eq!(off.percentage, dec("10"));

        let on = svc.set_active(saved.id, true).await.unwrap();
        assert!(on.active);
    }

    #[tokio::test]
    async fn update_unknown_policy_is_not_found() {
        let (_, svc) = service();
        assert!(matches!(
            svc.update(99, draft("10")).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
    }
}
