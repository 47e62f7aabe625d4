//! Pricing policy domain entity
//!
//! A policy is a single percentage rule. The pricing engine stacks every
//! matching rule of a kind additively; absence of rules means zero
//! contribution for that kind.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::client::LoyaltyTier;

/// Policy kind tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    /// Low-season percentage off the subtotal
    SeasonalDiscount,
    /// Percentage off for bookings within a day-count band
    DurationDiscount,
    /// Percentage off for a loyalty tier
    LoyaltyDiscount,
    /// High-season percentage added on top of the subtotal
    PeakSurcharge,
    /// Tax or levy on the subtotal
    Tax,
}

impl PolicyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SeasonalDiscount => "SEASONAL_DISCOUNT",
            Self::DurationDiscount => "DURATION_DISCOUNT",
            Self::LoyaltyDiscount => "LOYALTY_DISCOUNT",
            Self::PeakSurcharge => "PEAK_SURCHARGE",
            Self::Tax => "TAX",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "SEASONAL_DISCOUNT" => Self::SeasonalDiscount,
            "DURATION_DISCOUNT" => Self::DurationDiscount,
            "LOYALTY_DISCOUNT" => Self::LoyaltyDiscount,
            "PEAK_SURCHARGE" => Self::PeakSurcharge,
            _ => Self::Tax,
        }
    }
}

impl std::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configurable pricing rule
#[derive(Debug, Clone)]
pub struct PricingPolicy {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub kind: PolicyKind,
    /// Percentage of the subtotal, 0..=100
    pub percentage: Decimal,
    /// Validity window; either bound may be absent (unbounded)
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
    /// Day-count band for duration discounts; invariant min <= max when both set
    pub min_days: Option<i32>,
    pub max_days: Option<i32>,
    /// Target tier for loyalty discounts, None = every tier
    pub tier: Option<LoyaltyTier>,
    /// Scope restriction; an unset axis applies universally
    pub destination_id: Option<i64>,
    pub equipment_type_id: Option<i64>,
    pub equipment_id: Option<i64>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PricingPolicy {
    pub fn new(id: i64, name: impl Into<String>, kind: PolicyKind, percentage: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            description: None,
            kind,
            percentage,
            valid_from: None,
            valid_until: None,
            min_days: None,
            max_days: None,
            tier: None,
            destination_id: None,
            equipment_type_id: None,
            equipment_id: None,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the policy is in force on the given date.
    ///
    /// A missing window bound is unbounded on that side.
    pub fn valid_on(&self, date: NaiveDate) -> bool {
        if !self.active {
            return false;
        }
        if let Some(from) = self.valid_from {
            if date < from {
                return false;
            }
        }
        if let Some(until) = self.valid_until {
            if date > until {
                return false;
            }
        }
        true
    }

    /// Whether an inclusive rental length falls inside the day-count band.
    pub fn matches_duration(&self, days: i64) -> bool {
        let min_ok = self.min_days.map_or(true, |min| days >= i64::from(min));
        let max_ok = self.max_days.map_or(true, |max| days <= i64::from(max));
        min_ok && max_ok
    }

    /// Whether the policy targets the given loyalty tier.
    pub fn matches_tier(&self, tier: LoyaltyTier) -> bool {
        self.tier.map_or(true, |target| target == tier)
    }

    /// Scope check against the reservation's destination and line items.
    ///
    /// Runs before any percentage math: a policy scoped to equipment X never
    /// touches a reservation that does not contain X.
    pub fn in_scope(
        &self,
        destination_id: i64,
        equipment_ids: &[i64],
        equipment_type_ids: &[i64],
    ) -> bool {
        if let Some(scoped) = self.destination_id {
            if scoped != destination_id {
                return false;
            }
        }
        if let Some(scoped) = self.equipment_id {
            if !equipment_ids.contains(&scoped) {
                return false;
            }
        }
        if let Some(scoped) = self.equipment_type_id {
            if !equipment_type_ids.contains(&scoped) {
                return false;
            }
        }
        true
    }

    /// This policy's share of the subtotal, rounded to 2 decimal places
    /// half-up at the point it joins its running total.
    pub fn contribution(&self, subtotal: Decimal) -> Decimal {
        (subtotal * self.percentage / Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

// ── Tests ──────────────────────────────────────────────────────
