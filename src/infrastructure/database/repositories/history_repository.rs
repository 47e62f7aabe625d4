//! SeaORM implementation of HistoryRepository
//!
//! Writes are insert-only; there is deliberately no update or delete path.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};

use super::db_err;
use crate::domain::{DomainResult, HistoryEntry, HistoryRepository, ReservationState};
use crate::infrastructure::database::entities::reservation_history;

pub struct SeaOrmHistoryRepository {
    db: DatabaseConnection,
}

impl SeaOrmHistoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: reservation_history::Model) -> HistoryEntry {
    HistoryEntry {
        id: m.id,
        reservation_id: m.reservation_id,
        previous: m.previous_state.as_deref().map(ReservationState::from_str),
        new_state: ReservationState::from_str(&m.new_state),
        actor: m.actor,
        note: m.note,
        changed_at: m.changed_at,
    }
}

#[async_trait]
impl HistoryRepository for SeaOrmHistoryRepository {
    async fn append(&self, entry: HistoryEntry) -> DomainResult<HistoryEntry> {
        let model = reservation_history::ActiveModel {
            id: NotSet,
            reservation_id: Set(entry.reservation_id),
            previous_state: Set(entry.previous.map(|s| s.as_str().to_string())),
            new_state: Set(entry.new_state.as_str().to_string()),
            actor: Set(entry.actor.clone()),
            note: Set(entry.note.clone()),
            changed_at: Set(entry.changed_at),
        };
        let inserted = model.insert(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(inserted))
    }

    async fn find_by_reservation(&self, reservation_id: i64) -> DomainResult<Vec<HistoryEntry>> {
        let models = reservation_history::Entity::find()
            .filter(reservation_history::Column::ReservationId.eq(reservation_id))
            .order_by_desc(reservation_history::Column::ChangedAt)
            .order_by_desc(reservation_history::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }
}
