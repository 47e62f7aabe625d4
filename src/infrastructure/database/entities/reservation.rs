//! Reservation entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub client_id: i64,
    pub destination_id: i64,

    /// Rental period, end date inclusive
    pub start_date: Date,
    pub end_date: Date,

    /// Lifecycle state: PENDING, CONFIRMED, IN_PROGRESS, FINISHED, CANCELLED
    pub state: String,

    pub created_at: DateTimeUtc,

    pub subtotal: Decimal,
    pub discounts: Decimal,
    pub surcharges: Decimal,
    pub taxes: Decimal,
    pub total: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,

    #[sea_orm(
        belongs_to = "super::destination::Entity",
        from = "Column::DestinationId",
        to = "super::destination::Column::Id"
    )]
    Destination,

    #[sea_orm(has_many = "super::reservation_line::Entity")]
    ReservationLine,

    #[sea_orm(has_many = "super::reservation_history::Entity")]
    ReservationHistory,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::reservation_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReservationLine.def()
    }
}

impl Related<super::reservation_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReservationHistory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
