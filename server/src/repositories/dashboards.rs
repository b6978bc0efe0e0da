use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::dashboard::EventStats;
use crate::utils::error::AppError;

#[derive(Clone, Debug)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Per-event sales for an organizer. Tickets sold counts confirmed
    /// bookings; revenue is the sum of recorded payments.
    pub async fn event_stats(&self, organizer_id: Uuid) -> Result<Vec<EventStats>, AppError> {
        let stats = sqlx::query_as::<_, EventStats>(
            r#"
            SELECT e.id AS event_id, e.title, e.starts_at,
                   COALESCE((
                       SELECT SUM(b.quantity) FROM bookings b
                       WHERE b.event_id = e.id AND b.status = 'confirmed'
                   ), 0)::BIGINT AS tickets_sold,
                   COALESCE((
                       SELECT SUM(p.amount) FROM payments p
                       JOIN bookings b ON b.id = p.booking_id
                       WHERE b.event_id = e.id
                   ), 0) AS revenue,
                   COALESCE((
                       SELECT SUM(tt.remaining_seats) FROM ticket_types tt
                       WHERE tt.event_id = e.id
                   ), 0)::BIGINT AS seats_remaining
            FROM events e
            WHERE e.organizer_id = $1
            ORDER BY e.starts_at
            "#,
        )
        .bind(organizer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(stats)
    }

    pub async fn active_promotions(
        &self,
        organizer_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM promotions p
            JOIN events e ON e.id = p.event_id
            WHERE e.organizer_id = $1 AND p.is_active AND p.starts_at <= $2 AND p.ends_at >= $2
            "#,
        )
        .bind(organizer_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
