use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::events::event_not_found;
use crate::models::ticket_type::{TicketType, TicketTypeInput};
use crate::utils::error::AppError;

#[derive(Clone, Debug)]
pub struct TicketTypeRepository {
    pool: PgPool,
}

impl TicketTypeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Adds a tier to one of the organizer's events with all seats available.
    pub async fn add(
        &self,
        organizer_id: Uuid,
        event_id: Uuid,
        input: TicketTypeInput,
    ) -> Result<TicketType, AppError> {
        let ticket_type = sqlx::query_as::<_, TicketType>(
            r#"
            INSERT INTO ticket_types (id, event_id, name, price, total_seats, remaining_seats)
            SELECT $1, e.id, $3, $4, $5, $5
            FROM events e
            WHERE e.id = $2 AND e.organizer_id = $6
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(event_id)
        .bind(&input.name)
        .bind(input.price)
        .bind(input.total_seats)
        .bind(organizer_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(event_not_found)?;
        Ok(ticket_type)
    }

    /// Renames, reprices or resizes a tier. Remaining seats move by the
    /// same delta as the allocation.
    pub async fn update(
        &self,
        organizer_id: Uuid,
        id: Uuid,
        input: TicketTypeInput,
    ) -> Result<TicketType, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = lock_owned(&mut tx, organizer_id, id).await?;
        let remaining = current.reallocate(input.total_seats)?;

        let updated = sqlx::query_as::<_, TicketType>(
            r#"
            UPDATE ticket_types
            SET name = $2, price = $3, total_seats = $4, remaining_seats = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(current.id)
        .bind(&input.name)
        .bind(input.price)
        .bind(input.total_seats)
        .bind(remaining)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(
            ticket_type_id = %updated.id,
            total_seats = updated.total_seats,
            remaining_seats = updated.remaining_seats,
            "Ticket type updated"
        );
        Ok(updated)
    }

    /// Deletes a tier nobody has bought into.
    pub async fn delete(&self, organizer_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let current = lock_owned(&mut tx, organizer_id, id).await?;
        if current.seats_sold() > 0 {
            return Err(AppError::Conflict(
                "Cannot delete a ticket type with sold seats".to_string(),
            ));
        }

        sqlx::query("DELETE FROM ticket_types WHERE id = $1")
            .bind(current.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::from_constraint(e, "Ticket type is referenced by bookings"))?;

        tx.commit().await?;
        Ok(())
    }
}

async fn lock_owned(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    organizer_id: Uuid,
    id: Uuid,
) -> Result<TicketType, AppError> {
    sqlx::query_as::<_, TicketType>(
        r#"
        SELECT tt.* FROM ticket_types tt
        JOIN events e ON e.id = tt.event_id
        WHERE tt.id = $1 AND e.organizer_id = $2
        FOR UPDATE OF tt
        "#,
    )
    .bind(id)
    .bind(organizer_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or_else(|| AppError::NotFound("Ticket type not found".to_string()))
}
