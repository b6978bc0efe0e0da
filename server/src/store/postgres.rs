use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::debug;
use uuid::Uuid;

use super::{booking_not_found, BookingStore, ConfirmedBooking};
use crate::models::booking::{Booking, BookingStatus, BookingSummary, NewBooking};
use crate::models::event::Event;
use crate::models::payment::{NewPayment, Payment, PaymentStatus};
use crate::models::promotion::{Promotion, PromotionSelector};
use crate::models::ticket::{NewTicket, Ticket};
use crate::models::ticket_type::TicketType;
use crate::utils::error::AppError;

#[derive(Clone, Debug)]
pub struct PgBookingStore {
    pool: PgPool,
}

impl PgBookingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn customer_id_for_user(&self, user_id: Uuid) -> Result<Option<Uuid>, AppError> {
        let id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM customers WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(id)
    }

    async fn event(&self, event_id: Uuid) -> Result<Option<Event>, AppError> {
        let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(event_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(event)
    }

    async fn ticket_type(&self, ticket_type_id: Uuid) -> Result<Option<TicketType>, AppError> {
        let ticket_type = sqlx::query_as::<_, TicketType>("SELECT * FROM ticket_types WHERE id = $1")
            .bind(ticket_type_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(ticket_type)
    }

    async fn promotion(
        &self,
        event_id: Uuid,
        selector: &PromotionSelector,
    ) -> Result<Option<Promotion>, AppError> {
        let promotion = match selector {
            PromotionSelector::Id(id) => {
                sqlx::query_as::<_, Promotion>("SELECT * FROM promotions WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?
            }
            PromotionSelector::Code(code) => {
                sqlx::query_as::<_, Promotion>(
                    "SELECT * FROM promotions WHERE event_id = $1 AND code = $2",
                )
                .bind(event_id)
                .bind(code)
                .fetch_optional(&self.pool)
                .await?
            }
        };
        Ok(promotion)
    }

    async fn create_booking(&self, booking: NewBooking) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await?;

        // Check and decrement in one statement; a concurrent booking that got
        // there first leaves zero affected rows instead of a negative count.
        let reserved = sqlx::query(
            r#"
            UPDATE ticket_types
            SET remaining_seats = remaining_seats - $2
            WHERE id = $1 AND remaining_seats >= $2
            "#,
        )
        .bind(booking.ticket_type_id)
        .bind(booking.quantity)
        .execute(&mut *tx)
        .await?;

        if reserved.rows_affected() == 0 {
            let remaining = sqlx::query_scalar::<_, i32>(
                "SELECT remaining_seats FROM ticket_types WHERE id = $1",
            )
            .bind(booking.ticket_type_id)
            .fetch_optional(&mut *tx)
            .await?;
            tx.rollback().await?;

            return Err(match remaining {
                Some(remaining) => AppError::InsufficientSeats {
                    requested: booking.quantity,
                    remaining,
                },
                None => AppError::NotFound("Ticket type not found".to_string()),
            });
        }

        let created = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (
                id, customer_id, event_id, ticket_type_id, promotion_id,
                quantity, subtotal, discount_amount, final_amount, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(booking.customer_id)
        .bind(booking.event_id)
        .bind(booking.ticket_type_id)
        .bind(booking.promotion_id)
        .bind(booking.quantity)
        .bind(booking.subtotal)
        .bind(booking.discount_amount)
        .bind(booking.final_amount)
        .bind(BookingStatus::Pending)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn booking(&self, booking_id: Uuid) -> Result<Option<Booking>, AppError> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(booking)
    }

    async fn bookings_for_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Vec<BookingSummary>, AppError> {
        let bookings = sqlx::query_as::<_, BookingSummary>(
            r#"
            SELECT b.id, b.event_id, e.title AS event_title, e.starts_at AS event_starts_at,
                   b.ticket_type_id, tt.name AS ticket_type_name, b.quantity, b.subtotal,
                   b.discount_amount, b.final_amount, b.status, b.created_at
            FROM bookings b
            JOIN events e ON e.id = b.event_id
            JOIN ticket_types tt ON tt.id = b.ticket_type_id
            WHERE b.customer_id = $1
            ORDER BY b.created_at DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(bookings)
    }

    async fn cancel_booking(
        &self,
        booking_id: Uuid,
        customer_id: Uuid,
    ) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await?;

        let booking = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE id = $1 AND customer_id = $2 FOR UPDATE",
        )
        .bind(booking_id)
        .bind(customer_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(booking_not_found)?;

        let next = booking.status.transition_to(BookingStatus::Cancelled)?;

        let cancelled = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(booking.id)
        .bind(next)
        .fetch_one(&mut *tx)
        .await?;

        let deleted = sqlx::query("DELETE FROM tickets WHERE booking_id = $1")
            .bind(booking.id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE ticket_types SET remaining_seats = remaining_seats + $2 WHERE id = $1",
        )
        .bind(booking.ticket_type_id)
        .bind(booking.quantity)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(
            booking_id = %booking.id,
            tickets_deleted = deleted.rows_affected(),
            "Released booking seats"
        );
        Ok(cancelled)
    }

    async fn confirm_booking(
        &self,
        booking_id: Uuid,
        customer_id: Uuid,
        payment: NewPayment,
        tickets: Vec<NewTicket>,
    ) -> Result<ConfirmedBooking, AppError> {
        let mut tx = self.pool.begin().await?;

        let booking = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE id = $1 AND customer_id = $2 FOR UPDATE",
        )
        .bind(booking_id)
        .bind(customer_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(booking_not_found)?;

        booking.ensure_payable(payment.amount)?;

        let recorded = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (id, booking_id, amount, method, status, reference)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(booking.id)
        .bind(payment.amount)
        .bind(payment.method)
        .bind(PaymentStatus::Completed)
        .bind(&payment.reference)
        .fetch_one(&mut *tx)
        .await?;

        let confirmed = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(booking.id)
        .bind(BookingStatus::Confirmed)
        .fetch_one(&mut *tx)
        .await?;

        let issued = insert_ticket_rows(&mut tx, tickets).await?;

        tx.commit().await?;
        Ok(ConfirmedBooking {
            booking: confirmed,
            payment: recorded,
            tickets: issued,
        })
    }

    async fn tickets_for_booking(&self, booking_id: Uuid) -> Result<Vec<Ticket>, AppError> {
        let tickets = sqlx::query_as::<_, Ticket>(
            "SELECT * FROM tickets WHERE booking_id = $1 ORDER BY sequence",
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tickets)
    }

    async fn insert_tickets(&self, tickets: Vec<NewTicket>) -> Result<Vec<Ticket>, AppError> {
        let mut tx = self.pool.begin().await?;
        let inserted = insert_ticket_rows(&mut tx, tickets).await?;
        tx.commit().await?;
        Ok(inserted)
    }
}

/// Inserts tickets on an open connection, skipping sequences that already
/// exist for their booking.
async fn insert_ticket_rows(
    conn: &mut PgConnection,
    tickets: Vec<NewTicket>,
) -> Result<Vec<Ticket>, AppError> {
    let mut inserted = Vec::with_capacity(tickets.len());

    for ticket in tickets {
        let row = sqlx::query_as::<_, Ticket>(
            r#"
            INSERT INTO tickets (
                id, booking_id, event_id, ticket_type_id, sequence, seat_label, code, qr_code
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (booking_id, sequence) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(ticket.booking_id)
        .bind(ticket.event_id)
        .bind(ticket.ticket_type_id)
        .bind(ticket.sequence)
        .bind(&ticket.seat_label)
        .bind(&ticket.code)
        .bind(&ticket.qr_code)
        .fetch_optional(&mut *conn)
        .await?;

        if let Some(row) = row {
            inserted.push(row);
        }
    }

    Ok(inserted)
}
