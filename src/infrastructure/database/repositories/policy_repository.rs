//! SeaORM implementation of PolicyRepository

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, NotSet,
    QueryFilter, QueryOrder, Set,
};
use tracing::debug;

use super::db_err;
use crate::domain::policy::repository::PolicyScopeFilter;
use crate::domain::{
    DomainError, DomainResult, LoyaltyTier, PolicyKind, PolicyRepository, PricingPolicy,
};
use crate::infrastructure::database::entities::pricing_policy;

pub struct SeaOrmPolicyRepository {
    db: DatabaseConnection,
}

impl SeaOrmPolicyRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: pricing_policy::Model) -> PricingPolicy {
    PricingPolicy {
        id: m.id,
        name: m.name,
        description: m.description,
        kind: PolicyKind::from_str(&m.kind),
        percentage: m.percentage,
        valid_from: m.valid_from,
        valid_until: m.valid_until,
        min_days: m.min_days,
        max_days: m.max_days,
        tier: m.tier.as_deref().map(LoyaltyTier::from_str),
        destination_id: m.destination_id,
        equipment_type_id: m.equipment_type_id,
        equipment_id: m.equipment_id,
        active: m.active,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn to_active(p: &PricingPolicy) -> pricing_policy::ActiveModel {
    pricing_policy::ActiveModel {
        id: Set(p.id),
        name: Set(p.name.clone()),
        description: Set(p.description.clone()),
        kind: Set(p.kind.as_str().to_string()),
        percentage: Set(p.percentage),
        valid_from: Set(p.valid_from),
        valid_until: Set(p.valid_until),
        min_days: Set(p.min_days),
        max_days: Set(p.max_days),
        tier: Set(p.tier.map(|t| t.as_str().to_string())),
        destination_id: Set(p.destination_id),
        equipment_type_id: Set(p.equipment_type_id),
        equipment_id: Set(p.equipment_id),
        active: Set(p.active),
        created_at: Set(p.created_at),
        updated_at: Set(p.updated_at),
    }
}

/// Validity window contains the date; a NULL bound is unbounded
fn window_contains(date: NaiveDate) -> Condition {
    Condition::all()
        .add(
            Condition::any()
                .add(pricing_policy::Column::ValidFrom.is_null())
                .add(pricing_policy::Column::ValidFrom.lte(date)),
        )
        .add(
            Condition::any()
                .add(pricing_policy::Column::ValidUntil.is_null())
                .add(pricing_policy::Column::ValidUntil.gte(date)),
        )
}

/// A set scope axis matches rows scoped to that id or unscoped
fn axis_matches(column: pricing_policy::Column, wanted: Option<i64>) -> Condition {
    match wanted {
        None => Condition::all(),
        Some(id) => Condition::any().add(column.is_null()).add(column.eq(id)),
    }
}

// ── PolicyRepository impl ───────────────────────────────────────

#[async_trait]
impl PolicyRepository for SeaOrmPolicyRepository {
    async fn save(&self, policy: PricingPolicy) -> DomainResult<PricingPolicy> {
        debug!(name = %policy.name, kind = %policy.kind, "Saving pricing policy");

        let mut model = to_active(&policy);
        model.id = NotSet;
        let inserted = model.insert(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(inserted))
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<PricingPolicy>> {
        let model = pricing_policy::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn update(&self, policy: PricingPolicy) -> DomainResult<()> {
        let existing = pricing_policy::Entity::find_by_id(policy.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Err(DomainError::not_found("PricingPolicy", policy.id));
        }

        to_active(&policy).update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_all(&self) -> DomainResult<Vec<PricingPolicy>> {
        let models = pricing_policy::Entity::find()
            .order_by_asc(pricing_policy::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_active_by_kind(
        &self,
        kind: PolicyKind,
        date: NaiveDate,
    ) -> DomainResult<Vec<PricingPolicy>> {
        let models = pricing_policy::Entity::find()
            .filter(pricing_policy::Column::Active.eq(true))
            .filter(pricing_policy::Column::Kind.eq(kind.as_str()))
            .filter(window_contains(date))
            .order_by_asc(pricing_policy::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_applicable(
        &self,
        kind: PolicyKind,
        date: NaiveDate,
        scope: PolicyScopeFilter,
    ) -> DomainResult<Vec<PricingPolicy>> {
        let models = pricing_policy::Entity::find()
            .filter(pricing_policy::Column::Active.eq(true))
            .filter(pricing_policy::Column::Kind.eq(kind.as_str()))
            .filter(window_contains(date))
            .filter(axis_matches(
                pricing_policy::Column::DestinationId,
                scope.destination_id,
            ))
            .filter(axis_matches(
                pricing_policy::Column::EquipmentTypeId,
                scope.equipment_type_id,
            ))
            .filter(axis_matches(
                pricing_policy::Column::EquipmentId,
                scope.equipment_id,
            ))
            .order_by_asc(pricing_policy::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        let result = pricing_policy::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("PricingPolicy", id));
        }
        Ok(())
    }
}
