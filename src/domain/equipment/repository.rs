//! Equipment catalog repository interface

use async_trait::async_trait;

use super::model::{Equipment, EquipmentType};
use crate::domain::DomainResult;

#[async_trait]
pub trait EquipmentRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Equipment>>;

    async fn find_by_destination(&self, destination_id: i64) -> DomainResult<Vec<Equipment>>;

    async fn find_type_by_id(&self, type_id: i64) -> DomainResult<Option<EquipmentType>>;

    /// Bump the usage counter of each given item by one
    async fn increment_usage(&self, equipment_ids: &[i64]) -> DomainResult<()>;

    async fn exists(&self, id: i64) -> DomainResult<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }
}
