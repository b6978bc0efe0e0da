//! Persistence seam for the booking lifecycle.
//!
//! Every method that mutates more than one row is atomic: implementations
//! either apply all of it or none of it.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::booking::{Booking, BookingSummary, NewBooking};
use crate::models::event::Event;
use crate::models::payment::{NewPayment, Payment};
use crate::models::promotion::{Promotion, PromotionSelector};
use crate::models::ticket::{NewTicket, Ticket};
use crate::models::ticket_type::TicketType;
use crate::utils::error::AppError;

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgBookingStore;

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn customer_id_for_user(&self, user_id: Uuid) -> Result<Option<Uuid>, AppError>;

    async fn event(&self, event_id: Uuid) -> Result<Option<Event>, AppError>;

    async fn ticket_type(&self, ticket_type_id: Uuid) -> Result<Option<TicketType>, AppError>;

    /// Resolves a selector. Codes are looked up within `event_id`; ids are
    /// looked up globally so the caller can reject a mismatched scope.
    async fn promotion(
        &self,
        event_id: Uuid,
        selector: &PromotionSelector,
    ) -> Result<Option<Promotion>, AppError>;

    /// Takes `quantity` seats from the ticket type and inserts a pending
    /// booking. Fails with `InsufficientSeats` when fewer seats remain at
    /// the moment of the decrement.
    async fn create_booking(&self, booking: NewBooking) -> Result<Booking, AppError>;

    async fn booking(&self, booking_id: Uuid) -> Result<Option<Booking>, AppError>;

    async fn bookings_for_customer(&self, customer_id: Uuid)
        -> Result<Vec<BookingSummary>, AppError>;

    /// Cancels a pending booking owned by `customer_id`, deleting its tickets
    /// and giving its seats back.
    async fn cancel_booking(&self, booking_id: Uuid, customer_id: Uuid)
        -> Result<Booking, AppError>;

    /// Records the payment, confirms the booking owned by `customer_id` and
    /// issues its tickets in one unit. On any failure none of the three is
    /// stored and the booking stays pending.
    async fn confirm_booking(
        &self,
        booking_id: Uuid,
        customer_id: Uuid,
        payment: NewPayment,
        tickets: Vec<NewTicket>,
    ) -> Result<ConfirmedBooking, AppError>;

    async fn tickets_for_booking(&self, booking_id: Uuid) -> Result<Vec<Ticket>, AppError>;

    /// Inserts tickets, skipping any `(booking_id, sequence)` already issued.
    /// Returns only the rows actually inserted.
    async fn insert_tickets(&self, tickets: Vec<NewTicket>) -> Result<Vec<Ticket>, AppError>;
}

/// What a successful confirmation wrote.
#[derive(Debug)]
pub struct ConfirmedBooking {
    pub booking: Booking,
    pub payment: Payment,
    pub tickets: Vec<Ticket>,
}

pub(crate) fn booking_not_found() -> AppError {
    AppError::NotFound("Booking not found".to_string())
}
