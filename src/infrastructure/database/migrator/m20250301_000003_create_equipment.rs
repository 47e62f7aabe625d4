//! Create equipment table

use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_destinations::Destinations;
use super::m20250301_000002_create_equipment_types::EquipmentTypes;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Equipment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Equipment::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Equipment::Name).string().not_null())
                    .col(ColumnDef::new(Equipment::TypeId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Equipment::DestinationId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Equipment::RentalPrice)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Equipment::Available)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Equipment::UsageCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_equipment_destination")
                            .from(Equipment::Table, Equipment::DestinationId)
                            .to(Destinations::Table, Destinations::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_equipment_type")
                            .from(Equipment::Table, Equipment::TypeId)
                            .to(EquipmentTypes::Table, EquipmentTypes::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_equipment_destination")
                    .table(Equipment::Table)
                    .col(Equipment::DestinationId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Equipment::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Equipment {
    Table,
    Id,
    Name,
    TypeId,
    DestinationId,
    RentalPrice,
    Available,
    UsageCount,
}
