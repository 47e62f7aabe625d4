//! SeaORM implementation of EquipmentRepository

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use tracing::debug;

use super::db_err;
use crate::domain::{DomainResult, Equipment, EquipmentRepository, EquipmentType};
use crate::infrastructure::database::entities::{equipment, equipment_type};

pub struct SeaOrmEquipmentRepository {
    db: DatabaseConnection,
}

impl SeaOrmEquipmentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: equipment::Model) -> Equipment {
    Equipment {
        id: m.id,
        name: m.name,
        type_id: m.type_id,
        destination_id: m.destination_id,
        rental_price: m.rental_price,
        available: m.available,
        usage_count: m.usage_count,
    }
}

#[async_trait]
impl EquipmentRepository for SeaOrmEquipmentRepository {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Equipment>> {
        let model = equipment::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_destination(&self, destination_id: i64) -> DomainResult<Vec<Equipment>> {
        let models = equipment::Entity::find()
            .filter(equipment::Column::DestinationId.eq(destination_id))
            .order_by_asc(equipment::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_type_by_id(&self, type_id: i64) -> DomainResult<Option<EquipmentType>> {
        let model = equipment_type::Entity::find_by_id(type_id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(|t| EquipmentType {
            id: t.id,
            name: t.name,
        }))
    }

    async fn increment_usage(&self, equipment_ids: &[i64]) -> DomainResult<()> {
        if equipment_ids.is_empty() {
            return Ok(());
        }
        debug!(?equipment_ids, "Incrementing usage counters");

        equipment::Entity::update_many()
            .col_expr(
                equipment::Column::UsageCount,
                Expr::col(equipment::Column::UsageCount).add(1),
            )
            .filter(equipment::Column::Id.is_in(equipment_ids.iter().copied()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
