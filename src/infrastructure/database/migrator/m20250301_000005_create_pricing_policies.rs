//! Create pricing_policies table
//!
//! One row per configurable rule. The pricing engine selects by kind and
//! validity date; scope columns narrow a rule to a destination, an
//! equipment type or a single item.

use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_destinations::Destinations;
use super::m20250301_000002_create_equipment_types::EquipmentTypes;
use super::m20250301_000003_create_equipment::Equipment;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PricingPolicies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PricingPolicies::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PricingPolicies::Name).string().not_null())
                    .col(ColumnDef::new(PricingPolicies::Description).text())
                    .col(ColumnDef::new(PricingPolicies::Kind).string().not_null())
                    .col(
                        ColumnDef::new(PricingPolicies::Percentage)
                            .decimal_len(5, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(PricingPolicies::ValidFrom).date())
                    .col(ColumnDef::new(PricingPolicies::ValidUntil).date())
                    .col(ColumnDef::new(PricingPolicies::MinDays).integer())
                    .col(ColumnDef::new(PricingPolicies::MaxDays).integer())
                    .col(ColumnDef::new(PricingPolicies::Tier).string())
                    .col(ColumnDef::new(PricingPolicies::DestinationId).big_integer())
                    .col(ColumnDef::new(PricingPolicies::EquipmentTypeId).big_integer())
                    .col(ColumnDef::new(PricingPolicies::EquipmentId).big_integer())
                    .col(
                        ColumnDef::new(PricingPolicies::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(PricingPolicies::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PricingPolicies::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pricing_policies_destination")
                            .from(PricingPolicies::Table, PricingPolicies::DestinationId)
                            .to(Destinations::Table, Destinations::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pricing_policies_equipment_type")
                            .from(PricingPolicies::Table, PricingPolicies::EquipmentTypeId)
                            .to(EquipmentTypes::Table, EquipmentTypes::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pricing_policies_equipment")
                            .from(PricingPolicies::Table, PricingPolicies::EquipmentId)
                            .to(Equipment::Table, Equipment::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pricing_policies_kind_active")
                    .table(PricingPolicies::Table)
                    .col(PricingPolicies::Kind)
                    .col(PricingPolicies::Active)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PricingPolicies::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum PricingPolicies {
    Table,
    Id,
    Name,
    Description,
    Kind,
    Percentage,
    ValidFrom,
    ValidUntil,
    MinDays,
    MaxDays,
    Tier,
    DestinationId,
    EquipmentTypeId,
    EquipmentId,
    Active,
    CreatedAt,
    UpdatedAt,
}
