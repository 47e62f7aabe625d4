//! SeaORM implementation of ReservationRepository
//!
//! `insert_checked`/`update_checked` run the overlap re-check and the writes
//! inside one transaction, so two concurrent bookings of the same item over
//! overlapping dates cannot both commit; the loser surfaces `Conflict`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::debug;

use super::db_err;
use crate::domain::{
    DomainError, DomainResult, Reservation, ReservationLine, ReservationRepository,
    ReservationState,
};
use crate::infrastructure::database::entities::{reservation, reservation_line};

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Load lines for a batch of reservation models and assemble aggregates,
    /// keeping the models' order.
    async fn attach_lines(
        &self,
        models: Vec<reservation::Model>,
    ) -> DomainResult<Vec<Reservation>> {
        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let line_models = reservation_line::Entity::find()
            .filter(reservation_line::Column::ReservationId.is_in(ids))
            .order_by_asc(reservation_line::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let mut by_reservation: HashMap<i64, Vec<reservation_line::Model>> = HashMap::new();
        for line in line_models {
            by_reservation.entry(line.reservation_id).or_default().push(line);
        }

        Ok(models
            .into_iter()
            .map(|m| {
                let lines = by_reservation.remove(&m.id).unwrap_or_default();
                model_to_domain(m, lines)
            })
            .collect())
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: reservation::Model, lines: Vec<reservation_line::Model>) -> Reservation {
    Reservation {
        id: m.id,
        client_id: m.client_id,
        destination_id: m.destination_id,
        start_date: m.start_date,
        end_date: m.end_date,
        state: ReservationState::from_str(&m.state),
        created_at: m.created_at,
        subtotal: m.subtotal,
        discounts: m.discounts,
        surcharges: m.surcharges,
        taxes: m.taxes,
        total: m.total,
        lines: lines.into_iter().map(line_to_domain).collect(),
    }
}

fn line_to_domain(m: reservation_line::Model) -> ReservationLine {
    ReservationLine {
        id: m.id,
        reservation_id: m.reservation_id,
        equipment_id: m.equipment_id,
        unit_price: m.unit_price,
    }
}

fn to_active(r: &Reservation) -> reservation::ActiveModel {
    reservation::ActiveModel {
        id: Set(r.id),
        client_id: Set(r.client_id),
        destination_id: Set(r.destination_id),
        start_date: Set(r.start_date),
        end_date: Set(r.end_date),
        state: Set(r.state.as_str().to_string()),
        created_at: Set(r.created_at),
        subtotal: Set(r.subtotal),
        discounts: Set(r.discounts),
        surcharges: Set(r.surcharges),
        taxes: Set(r.taxes),
        total: Set(r.total),
    }
}

fn active_state_names() -> Vec<&'static str> {
    ReservationState::ACTIVE.iter().map(|s| s.as_str()).collect()
}

/// Overlap check usable both on the connection and inside a transaction.
async fn overlap_exists<C: ConnectionTrait>(
    conn: &C,
    equipment_id: i64,
    start: NaiveDate,
    end: NaiveDate,
    exclude_reservation: Option<i64>,
) -> DomainResult<bool> {
    let mut query = reservation_line::Entity::find()
        .inner_join(reservation::Entity)
        .filter(reservation_line::Column::EquipmentId.eq(equipment_id))
        .filter(reservation::Column::State.is_in(active_state_names()))
        .filter(reservation::Column::StartDate.lte(end))
        .filter(reservation::Column::EndDate.gte(start));

    if let Some(id) = exclude_reservation {
        query = query.filter(reservation_line::Column::ReservationId.ne(id));
    }

    let count = query.count(conn).await.map_err(db_err)?;
    Ok(count > 0)
}

async fn insert_lines<C: ConnectionTrait>(
    conn: &C,
    reservation_id: i64,
    lines: &[ReservationLine],
) -> DomainResult<Vec<reservation_line::Model>> {
    let mut inserted = Vec::with_capacity(lines.len());
    for line in lines {
        let model = reservation_line::ActiveModel {
            id: NotSet,
            reservation_id: Set(reservation_id),
            equipment_id: Set(line.equipment_id),
            unit_price: Set(line.unit_price),
        };
        inserted.push(model.insert(conn).await.map_err(db_err)?);
    }
    Ok(inserted)
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn insert_checked(&self, r: Reservation) -> DomainResult<Reservation> {
        debug!(client_id = r.client_id, "Inserting reservation");

        let txn = self.db.begin().await.map_err(db_err)?;

        // re-check under the transaction; a rival booking committed since
        // the service's pre-check loses here
        for line in &r.lines {
            if overlap_exists(&txn, line.equipment_id, r.start_date, r.end_date, None).await? {
                return Err(DomainError::Conflict(format!(
                    "equipment {} is already booked in the selected dates",
                    line.equipment_id
                )));
            }
        }

        let mut model = to_active(&r);
        model.id = NotSet;
        let inserted = model.insert(&txn).await.map_err(db_err)?;
        let lines = insert_lines(&txn, inserted.id, &r.lines).await?;

        txn.commit().await.map_err(db_err)?;
        Ok(model_to_domain(inserted, lines))
    }

    async fn update_checked(&self, r: Reservation) -> DomainResult<Reservation> {
        debug!(reservation_id = r.id, "Updating reservation");

        let txn = self.db.begin().await.map_err(db_err)?;

        let existing = reservation::Entity::find_by_id(r.id)
            .one(&txn)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Err(DomainError::not_found("Reservation", r.id));
        }

        for line in &r.lines {
            if overlap_exists(&txn, line.equipment_id, r.start_date, r.end_date, Some(r.id))
                .await?
            {
                return Err(DomainError::Conflict(format!(
                    "equipment {} is already booked in the selected dates",
                    line.equipment_id
                )));
            }
        }

        let updated = to_active(&r).update(&txn).await.map_err(db_err)?;

        // lines are owned by the reservation: replace wholesale
        reservation_line::Entity::delete_many()
            .filter(reservation_line::Column::ReservationId.eq(r.id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        let lines = insert_lines(&txn, r.id, &r.lines).await?;

        txn.commit().await.map_err(db_err)?;
        Ok(model_to_domain(updated, lines))
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Reservation>> {
        let model = reservation::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        match model {
            Some(m) => Ok(self.attach_lines(vec![m]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .order_by_desc(reservation::Column::CreatedAt)
            .order_by_desc(reservation::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        self.attach_lines(models).await
    }

    async fn find_by_client(&self, client_id: i64) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::ClientId.eq(client_id))
            .order_by_desc(reservation::Column::CreatedAt)
            .order_by_desc(reservation::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        self.attach_lines(models).await
    }

    async fn find_in_states(
        &self,
        states: &[ReservationState],
    ) -> DomainResult<Vec<Reservation>> {
        let names: Vec<&'static str> = states.iter().map(|s| s.as_str()).collect();
        let models = reservation::Entity::find()
            .filter(reservation::Column::State.is_in(names))
            .order_by_asc(reservation::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        self.attach_lines(models).await
    }

    async fn set_state(&self, id: i64, state: ReservationState) -> DomainResult<()> {
        let result = reservation::Entity::update_many()
            .col_expr(reservation::Column::State, Expr::value(state.as_str()))
            .filter(reservation::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Reservation", id));
        }
        Ok(())
    }

    async fn has_overlap(
        &self,
        equipment_id: i64,
        start: NaiveDate,
        end: NaiveDate,
        exclude_reservation: Option<i64>,
    ) -> DomainResult<bool> {
        overlap_exists(&self.db, equipment_id, start, end, exclude_reservation).await
    }

    async fn busy_equipment_ids(
        &self,
        equipment_ids: &[i64],
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<Vec<i64>> {
        if equipment_ids.is_empty() {
            return Ok(Vec::new());
        }

        let busy: Vec<i64> = reservation_line::Entity::find()
            .select_only()
            .column(reservation_line::Column::EquipmentId)
            .distinct()
            .inner_join(reservation::Entity)
            .filter(reservation_line::Column::EquipmentId.is_in(equipment_ids.iter().copied()))
            .filter(reservation::Column::State.is_in(active_state_names()))
            .filter(reservation::Column::StartDate.lte(end))
            .filter(reservation::Column::EndDate.gte(start))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(busy)
    }

    async fn count_non_cancelled(&self, client_id: i64) -> DomainResult<i64> {
        let count = reservation::Entity::find()
            .filter(reservation::Column::ClientId.eq(client_id))
            .filter(reservation::Column::State.ne(ReservationState::Cancelled.as_str()))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count as i64)
    }

    async fn count_for_client(&self, client_id: i64) -> DomainResult<i64> {
        let count = reservation::Entity::find()
            .filter(reservation::Column::ClientId.eq(client_id))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count as i64)
    }
}
