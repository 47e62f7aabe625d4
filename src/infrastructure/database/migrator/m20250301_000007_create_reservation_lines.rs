//! Create reservation_lines table

use sea_orm_migration::prelude::*;

use super::m20250301_000003_create_equipment::Equipment;
use super::m20250301_000006_create_reservations::Reservations;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReservationLines::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReservationLines::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ReservationLines::ReservationId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReservationLines::EquipmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReservationLines::UnitPrice)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservation_lines_reservation")
                            .from(ReservationLines::Table, ReservationLines::ReservationId)
                            .to(Reservations::Table, Reservations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservation_lines_equipment")
                            .from(ReservationLines::Table, ReservationLines::EquipmentId)
                            .to(Equipment::Table, Equipment::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservation_lines_equipment")
                    .table(ReservationLines::Table)
                    .col(ReservationLines::EquipmentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservation_lines_reservation")
                    .table(ReservationLines::Table)
                    .col(ReservationLines::ReservationId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReservationLines::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ReservationLines {
    Table,
    Id,
    ReservationId,
    EquipmentId,
    UnitPrice,
}
