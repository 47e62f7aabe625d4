//! Pricing policy entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pricing_policies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub name: String,
    pub description: Option<String>,

    /// Policy kind: SEASONAL_DISCOUNT, DURATION_DISCOUNT, LOYALTY_DISCOUNT,
    /// PEAK_SURCHARGE, TAX
    pub kind: String,

    /// Percentage of the subtotal, 0..=100
    pub percentage: Decimal,

    /// Validity window, either bound NULL = unbounded
    pub valid_from: Option<Date>,
    pub valid_until: Option<Date>,

    /// Day-count band for duration discounts
    pub min_days: Option<i32>,
    pub max_days: Option<i32>,

    /// Target loyalty tier, NULL = every tier
    pub tier: Option<String>,

    /// Scope restriction; NULL applies universally on that axis
    pub destination_id: Option<i64>,
    pub equipment_type_id: Option<i64>,
    pub equipment_id: Option<i64>,

    pub active: bool,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::destination::Entity",
        from = "Column::DestinationId",
        to = "super::destination::Column::Id"
    )]
    Destination,

    #[sea_orm(
        belongs_to = "super::equipment_type::Entity",
        from = "Column::EquipmentTypeId",
        to = "super::equipment_type::Column::Id"
    )]
    EquipmentType,

    #[sea_orm(
        belongs_to = "super::equipment::Entity",
        from = "Column::EquipmentId",
        to = "super::equipment::Column::Id"
    )]
    Equipment,
}

impl ActiveModelBehavior for ActiveModel {}
