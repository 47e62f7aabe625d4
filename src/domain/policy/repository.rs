//! Pricing policy repository interface

use async_trait::async_trait;
use chrono::NaiveDate;

use super::model::{PolicyKind, PricingPolicy};
use crate::domain::DomainResult;

/// Optional scope pre-filter for policy queries. Each set field narrows the
/// result to policies scoped to that id or unscoped on that axis.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyScopeFilter {
    pub destination_id: Option<i64>,
    pub equipment_type_id: Option<i64>,
    pub equipment_id: Option<i64>,
}

#[async_trait]
pub trait PolicyRepository: Send + Sync {
    /// Save a new policy, assigning its id
    async fn save(&self, policy: PricingPolicy) -> DomainResult<PricingPolicy>;

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<PricingPolicy>>;

    /// Update an existing policy
    async fn update(&self, policy: PricingPolicy) -> DomainResult<()>;

    async fn find_all(&self) -> DomainResult<Vec<PricingPolicy>>;

    /// Active policies of a kind whose validity window contains the date
    async fn find_active_by_kind(
        &self,
        kind: PolicyKind,
        date: NaiveDate,
    ) -> DomainResult<Vec<PricingPolicy>>;

    /// Active policies of a kind valid at the date, pre-filtered by scope
    async fn find_applicable(
        &self,
        kind: PolicyKind,
        date: NaiveDate,
        scope: PolicyScopeFilter,
    ) -> DomainResult<Vec<PricingPolicy>>;

    async fn delete(&self, id: i64) -> DomainResult<()>;
}
