//! Pricing policy engine
//!
//! Stacks every matching policy of each kind additively on the booking
//! subtotal, in a fixed order: duration discounts, loyalty discounts,
//! seasonal discounts (combined and clamped at the subtotal), then peak
//! surcharges and taxes, both computed on the original subtotal. There is no
//! built-in rate: a kind with no matching policy contributes zero.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::policy::repository::PolicyScopeFilter;
use crate::domain::{
    DomainResult, LoyaltyTier, PolicyKind, PolicyRepository, PriceBreakdown, PricingPolicy,
};

/// One line item as the pricing engine sees it
#[derive(Debug, Clone)]
pub struct PricedItem {
    pub equipment_id: i64,
    pub equipment_type_id: i64,
    pub unit_price: Decimal,
}

/// The shape of a reservation being priced; decoupled from the persisted
/// aggregate so quotes can be computed before anything exists in the store.
#[derive(Debug, Clone)]
pub struct PricingInput {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub destination_id: i64,
    pub tier: LoyaltyTier,
    pub items: Vec<PricedItem>,
}

impl PricingInput {
    /// Inclusive rental length in days
    pub fn rental_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

pub struct PricingService {
    policies: Arc<dyn PolicyRepository>,
}

impl PricingService {
    pub fn new(policies: Arc<dyn PolicyRepository>) -> Self {
        Self { policies }
    }

    /// Compute the full price breakdown for a reservation shape.
    ///
    /// Pure with respect to the policy set: no side effects beyond the
    /// returned numbers. Cannot fail on valid input; an error here is a
    /// storage failure, not a pricing condition.
    pub async fn quote(&self, input: &PricingInput) -> DomainResult<PriceBreakdown> {
        let subtotal: Decimal = input.items.iter().map(|item| item.unit_price).sum();
        let days = input.rental_days();

        let equipment_ids: Vec<i64> = input.items.iter().map(|i| i.equipment_id).collect();
        let type_ids: Vec<i64> = input.items.iter().map(|i| i.equipment_type_id).collect();

        let duration = self
            .stacked(PolicyKind::DurationDiscount, input, subtotal, |p| {
                p.matches_duration(days)
            })
            .await?;
        let loyalty = self
            .stacked(PolicyKind::LoyaltyDiscount, input, subtotal, |p| {
                p.matches_tier(input.tier)
            })
            .await?;
        let seasonal = self
            .stacked(PolicyKind::SeasonalDiscount, input, subtotal, |_| true)
            .await?;

        // Discounts never exceed the subtotal
        let discounts = (duration + loyalty + seasonal).min(subtotal);

        // Surcharges and taxes apply to the original subtotal, not the
        // discounted amount
        let surcharges = self
            .stacked(PolicyKind::PeakSurcharge, input, subtotal, |_| true)
            .await?;
        let taxes = self
            .stacked(PolicyKind::Tax, input, subtotal, |_| true)
            .await?;

        let total = subtotal - discounts + surcharges + taxes;

        debug!(
            %subtotal, %discounts, %surcharges, %taxes, %total,
            equipment_ids = ?equipment_ids,
            ?type_ids,
            "Quote computed"
        );

        Ok(PriceBreakdown {
            subtotal,
            discounts,
            surcharges,
            taxes,
            total,
        })
    }

    /// Sum of contributions from active policies of one kind that are valid
    /// at the start date, in scope for the reservation, and pass the
    /// kind-specific filter. Scope runs before any percentage math.
    async fn stacked(
        &self,
        kind: PolicyKind,
        input: &PricingInput,
        subtotal: Decimal,
        extra: impl Fn(&PricingPolicy) -> bool,
    ) -> DomainResult<Decimal> {
        let scope = PolicyScopeFilter {
            destination_id: Some(input.destination_id),
            ..Default::default()
        };
        let candidates = self
            .policies
            .find_applicable(kind, input.start_date, scope)
            .await?;

        let equipment_ids: Vec<i64> = input.items.iter().map(|i| i.equipment_id).collect();
        let type_ids: Vec<i64> = input.items.iter().map(|i| i.equipment_type_id).collect();

        let mut sum = Decimal::ZERO;
        for policy in candidates {
            if !policy.in_scope(input.destination_id, &equipment_ids, &type_ids) {
                continue;
            }
            if !extra(&policy) {
                continue;
            }
            sum += policy.contribution(subtotal);
        }
        Ok(sum)
    }
}

// ── Tests ──────────────────────────────────────────────────────
