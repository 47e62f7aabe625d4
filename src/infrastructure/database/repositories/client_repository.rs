//! SeaORM implementation of ClientRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};
use tracing::debug;

use super::db_err;
use crate::domain::{Client, ClientRepository, DomainError, DomainResult, LoyaltyTier};
use crate::infrastructure::database::entities::client;

pub struct SeaOrmClientRepository {
    db: DatabaseConnection,
}

impl SeaOrmClientRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: client::Model) -> Client {
    Client {
        id: m.id,
        name: m.name,
        document: m.document,
        email: m.email,
        phone: m.phone,
        reservation_count: m.reservation_count,
        tier: LoyaltyTier::from_str(&m.tier),
    }
}

fn to_active(c: &Client) -> client::ActiveModel {
    client::ActiveModel {
        id: Set(c.id),
        name: Set(c.name.clone()),
        document: Set(c.document.clone()),
        email: Set(c.email.clone()),
        phone: Set(c.phone.clone()),
        reservation_count: Set(c.reservation_count),
        tier: Set(c.tier.as_str().to_string()),
    }
}

// ── ClientRepository impl ───────────────────────────────────────

#[async_trait]
impl ClientRepository for SeaOrmClientRepository {
    async fn save(&self, client: Client) -> DomainResult<Client> {
        debug!(document = %client.document, "Saving client");

        let mut model = to_active(&client);
        model.id = NotSet;
        let inserted = model.insert(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(inserted))
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Client>> {
        let model = client::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_document(&self, document: &str) -> DomainResult<Option<Client>> {
        let model = client::Entity::find()
            .filter(client::Column::Document.eq(document))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<Client>> {
        let models = client::Entity::find()
            .order_by_asc(client::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update(&self, client: Client) -> DomainResult<()> {
        let existing = client::Entity::find_by_id(client.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Err(DomainError::not_found("Client", client.id));
        }

        to_active(&client).update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        let result = client::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Client", id));
        }
        Ok(())
    }
}
