//! Destination repository interface

use async_trait::async_trait;

use super::model::Destination;
use crate::domain::DomainResult;

#[async_trait]
pub trait DestinationRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Destination>>;

    async fn find_all(&self) -> DomainResult<Vec<Destination>>;

    async fn exists(&self, id: i64) -> DomainResult<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }
}
