//! Client repository interface

use async_trait::async_trait;

use super::model::Client;
use crate::domain::DomainResult;

#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// Save a new client, assigning its id
    async fn save(&self, client: Client) -> DomainResult<Client>;

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Client>>;

    async fn find_by_document(&self, document: &str) -> DomainResult<Option<Client>>;

    async fn find_all(&self) -> DomainResult<Vec<Client>>;

    /// Update an existing client
    async fn update(&self, client: Client) -> DomainResult<()>;

    async fn delete(&self, id: i64) -> DomainResult<()>;
}
