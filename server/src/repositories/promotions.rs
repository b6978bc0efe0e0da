use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::events::event_not_found;
use crate::models::promotion::{Promotion, PromotionFilter, PromotionInput};
use crate::utils::error::{AppError, FieldError};

const DUPLICATE_CODE: &str = "A promotion with this code already exists for the event";

#[derive(Clone, Debug)]
pub struct PromotionRepository {
    pool: PgPool,
}

impl PromotionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Promotions a customer can apply to `event_id` at `now`.
    pub async fn valid_for_event(
        &self,
        event_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<Promotion>, AppError> {
        let promotions = sqlx::query_as::<_, Promotion>(
            r#"
            SELECT * FROM promotions
            WHERE event_id = $1 AND is_active AND starts_at <= $2 AND ends_at >= $2
            ORDER BY discount_percentage DESC, name
            "#,
        )
        .bind(event_id)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;
        Ok(promotions)
    }

    pub async fn list_for_organizer(
        &self,
        organizer_id: Uuid,
        filter: PromotionFilter,
    ) -> Result<Vec<Promotion>, AppError> {
        let promotions = sqlx::query_as::<_, Promotion>(
            r#"
            SELECT p.* FROM promotions p
            JOIN events e ON e.id = p.event_id
            WHERE e.organizer_id = $1 AND ($2::uuid IS NULL OR p.event_id = $2)
            ORDER BY p.starts_at DESC, p.name
            "#,
        )
        .bind(organizer_id)
        .bind(filter.event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(promotions)
    }

    pub async fn create(
        &self,
        organizer_id: Uuid,
        input: PromotionInput,
    ) -> Result<Promotion, AppError> {
        self.ensure_scope(organizer_id, &input).await?;

        sqlx::query_as::<_, Promotion>(
            r#"
            INSERT INTO promotions (
                id, event_id, ticket_type_id, name, code, discount_percentage,
                starts_at, ends_at, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.event_id)
        .bind(input.ticket_type_id)
        .bind(&input.name)
        .bind(&input.code)
        .bind(input.discount_percentage)
        .bind(input.starts_at)
        .bind(input.ends_at)
        .bind(input.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_constraint(e, DUPLICATE_CODE))
    }

    pub async fn update(
        &self,
        organizer_id: Uuid,
        id: Uuid,
        input: PromotionInput,
    ) -> Result<Promotion, AppError> {
        self.owned(organizer_id, id).await?;
        self.ensure_scope(organizer_id, &input).await?;

        sqlx::query_as::<_, Promotion>(
            r#"
            UPDATE promotions
            SET event_id = $2, ticket_type_id = $3, name = $4, code = $5,
                discount_percentage = $6, starts_at = $7, ends_at = $8, is_active = $9
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.event_id)
        .bind(input.ticket_type_id)
        .bind(&input.name)
        .bind(&input.code)
        .bind(input.discount_percentage)
        .bind(input.starts_at)
        .bind(input.ends_at)
        .bind(input.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_constraint(e, DUPLICATE_CODE))?
        .ok_or_else(promotion_not_found)
    }

    pub async fn delete(&self, organizer_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM promotions p
            USING events e
            WHERE p.id = $1 AND e.id = p.event_id AND e.organizer_id = $2
            "#,
        )
        .bind(id)
        .bind(organizer_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(promotion_not_found());
        }
        Ok(())
    }

    async fn owned(&self, organizer_id: Uuid, id: Uuid) -> Result<Promotion, AppError> {
        sqlx::query_as::<_, Promotion>(
            r#"
            SELECT p.* FROM promotions p
            JOIN events e ON e.id = p.event_id
            WHERE p.id = $1 AND e.organizer_id = $2
            "#,
        )
        .bind(id)
        .bind(organizer_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(promotion_not_found)
    }

    /// The event must be the organizer's and the ticket type must be one of
    /// that event's tiers.
    async fn ensure_scope(&self, organizer_id: Uuid, input: &PromotionInput) -> Result<(), AppError> {
        let event_owned = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM events WHERE id = $1 AND organizer_id = $2)",
        )
        .bind(input.event_id)
        .bind(organizer_id)
        .fetch_one(&self.pool)
        .await?;
        if !event_owned {
            return Err(event_not_found());
        }

        let tier_matches = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM ticket_types WHERE id = $1 AND event_id = $2)",
        )
        .bind(input.ticket_type_id)
        .bind(input.event_id)
        .fetch_one(&self.pool)
        .await?;
        if !tier_matches {
            return Err(AppError::InvalidFields(vec![FieldError::new(
                "ticket_type_id",
                "must be a ticket type of the selected event",
            )]));
        }

        Ok(())
    }
}

fn promotion_not_found() -> AppError {
    AppError::NotFound("Promotion not found".to_string())
}
