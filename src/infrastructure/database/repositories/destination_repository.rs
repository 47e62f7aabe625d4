//! SeaORM implementation of DestinationRepository

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

use super::db_err;
use crate::domain::{Destination, DestinationRepository, DomainResult};
use crate::infrastructure::database::entities::destination;

pub struct SeaOrmDestinationRepository {
    db: DatabaseConnection,
}

impl SeaOrmDestinationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: destination::Model) -> Destination {
    Destination {
        id: m.id,
        name: m.name,
        region: m.region,
        max_capacity: m.max_capacity,
    }
}

#[async_trait]
impl DestinationRepository for SeaOrmDestinationRepository {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Destination>> {
        let model = destination::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<Destination>> {
        let models = destination::Entity::find()
            .order_by_asc(destination::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }
}
