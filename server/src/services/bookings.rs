//! Booking lifecycle: reserve seats, take payment, issue tickets, cancel.
//!
//! ```text
//! Pending ──pay──▶ Confirmed
//!    │
//!    └──cancel──▶ Cancelled
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::models::booking::{Booking, BookingStatus, BookingSummary, NewBooking};
use crate::models::event::EventStatus;
use crate::models::payment::{NewPayment, Payment, PaymentMethod};
use crate::models::promotion::PromotionSelector;
use crate::models::ticket::{seat_label, ticket_code, NewTicket, Ticket};
use crate::services::pricing;
use crate::services::qr::CodeRenderer;
use crate::store::{booking_not_found, BookingStore};
use crate::utils::error::{AppError, FieldError};

/// Outcome of a successful payment.
#[derive(Debug, Serialize)]
pub struct PaymentReceipt {
    pub booking: Booking,
    pub payment: Payment,
    pub tickets: Vec<Ticket>,
}

#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn BookingStore>,
    codes: Arc<dyn CodeRenderer>,
}

impl BookingService {
    pub fn new(store: Arc<dyn BookingStore>, codes: Arc<dyn CodeRenderer>) -> Self {
        Self { store, codes }
    }

    /// Customer profile id for a gateway identity.
    pub async fn customer_id(&self, user_id: Uuid) -> Result<Uuid, AppError> {
        self.store
            .customer_id_for_user(user_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(
                    "Customer profile not found; create one before booking".to_string(),
                )
            })
    }

    pub async fn create_booking(
        &self,
        customer_id: Uuid,
        event_id: Uuid,
        ticket_type_id: Uuid,
        quantity: i32,
        selector: Option<PromotionSelector>,
        now: DateTime<Utc>,
    ) -> Result<Booking, AppError> {
        if quantity < 1 {
            return Err(AppError::InvalidFields(vec![FieldError::new(
                "quantity",
                "must be at least 1",
            )]));
        }

        let ticket_type = self
            .store
            .ticket_type(ticket_type_id)
            .await?
            .filter(|tt| tt.event_id == event_id)
            .ok_or_else(|| AppError::NotFound("Ticket type not found".to_string()))?;

        let event = self
            .store
            .event(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;
        if event.status != EventStatus::Active {
            return Err(AppError::InvalidState(format!(
                "Event is {} and not open for booking",
                event.status
            )));
        }

        if quantity > ticket_type.remaining_seats {
            return Err(AppError::InsufficientSeats {
                requested: quantity,
                remaining: ticket_type.remaining_seats,
            });
        }

        let promotion = match &selector {
            Some(selector) => Some(
                self.store
                    .promotion(event_id, selector)
                    .await?
                    .ok_or_else(|| AppError::PromotionInvalid("Promotion not found".to_string()))?,
            ),
            None => None,
        };

        let quote = pricing::quote(
            promotion.as_ref(),
            event_id,
            ticket_type_id,
            quantity,
            ticket_type.price,
            now,
        )?;

        let booking = self
            .store
            .create_booking(NewBooking {
                customer_id,
                event_id,
                ticket_type_id,
                promotion_id: quote.promotion_id,
                quantity,
                subtotal: quote.subtotal,
                discount_amount: quote.discount_amount,
                final_amount: quote.final_amount,
            })
            .await?;

        info!(
            booking_id = %booking.id,
            customer_id = %customer_id,
            ticket_type_id = %ticket_type_id,
            quantity,
            final_amount = %booking.final_amount,
            "Booking created"
        );
        Ok(booking)
    }

    pub async fn cancel_booking(
        &self,
        customer_id: Uuid,
        booking_id: Uuid,
    ) -> Result<Booking, AppError> {
        let booking = self.store.cancel_booking(booking_id, customer_id).await?;
        info!(
            booking_id = %booking.id,
            seats_released = booking.quantity,
            "Booking cancelled"
        );
        Ok(booking)
    }

    pub async fn list_bookings(&self, customer_id: Uuid) -> Result<Vec<BookingSummary>, AppError> {
        self.store.bookings_for_customer(customer_id).await
    }

    pub async fn get_booking(&self, customer_id: Uuid, booking_id: Uuid) -> Result<Booking, AppError> {
        self.store
            .booking(booking_id)
            .await?
            .filter(|b| b.customer_id == customer_id)
            .ok_or_else(booking_not_found)
    }

    /// Records a payment for a pending booking, confirms it and issues its
    /// tickets. The amount must match the booking's final amount exactly.
    /// Tickets are rendered up front and stored with the payment, so a
    /// failure leaves the booking pending and payable again.
    pub async fn record_payment(
        &self,
        customer_id: Uuid,
        booking_id: Uuid,
        method: PaymentMethod,
        amount: Decimal,
    ) -> Result<PaymentReceipt, AppError> {
        if amount.is_sign_negative() {
            return Err(AppError::InvalidFields(vec![FieldError::new(
                "amount",
                "must not be negative",
            )]));
        }

        let booking = self.get_booking(customer_id, booking_id).await?;
        booking.ensure_payable(amount)?;
        let tickets = self.render_tickets(&booking, &HashSet::new())?;

        let confirmed = self
            .store
            .confirm_booking(
                booking.id,
                customer_id,
                NewPayment {
                    amount,
                    method,
                    reference: Uuid::new_v4().simple().to_string(),
                },
                tickets,
            )
            .await?;

        info!(
            booking_id = %confirmed.booking.id,
            payment_id = %confirmed.payment.id,
            amount = %confirmed.payment.amount,
            tickets = confirmed.tickets.len(),
            "Payment recorded"
        );

        Ok(PaymentReceipt {
            booking: confirmed.booking,
            payment: confirmed.payment,
            tickets: confirmed.tickets,
        })
    }

    /// Issues any missing tickets `1..=quantity` for a confirmed booking.
    /// Sequences that already exist are skipped, so repeated calls never
    /// double-issue.
    pub async fn issue_tickets(&self, booking_id: Uuid) -> Result<Vec<Ticket>, AppError> {
        let booking = self
            .store
            .booking(booking_id)
            .await?
            .ok_or_else(booking_not_found)?;
        if booking.status != BookingStatus::Confirmed {
            return Err(AppError::InvalidState(format!(
                "Tickets can only be issued for confirmed bookings (booking is {})",
                booking.status
            )));
        }

        let existing = self.store.tickets_for_booking(booking.id).await?;
        let issued: HashSet<i32> = existing.iter().map(|t| t.sequence).collect();

        let pending = self.render_tickets(&booking, &issued)?;
        if pending.is_empty() {
            return Ok(existing);
        }

        let inserted = self.store.insert_tickets(pending).await?;
        info!(
            booking_id = %booking.id,
            issued = inserted.len(),
            "Tickets issued"
        );

        self.store.tickets_for_booking(booking.id).await
    }

    /// Tickets of an owned booking. A confirmed booking that is short of
    /// tickets gets the missing ones issued first.
    pub async fn list_tickets(&self, customer_id: Uuid, booking_id: Uuid) -> Result<Vec<Ticket>, AppError> {
        let booking = self.get_booking(customer_id, booking_id).await?;
        let tickets = self.store.tickets_for_booking(booking.id).await?;

        if booking.status == BookingStatus::Confirmed && tickets.len() < booking.quantity as usize {
            return self.issue_tickets(booking.id).await;
        }
        Ok(tickets)
    }

    fn render_tickets(
        &self,
        booking: &Booking,
        issued: &HashSet<i32>,
    ) -> Result<Vec<NewTicket>, AppError> {
        (1..=booking.quantity)
            .filter(|sequence| !issued.contains(sequence))
            .map(|sequence| {
                let code = ticket_code(booking.id, sequence);
                Ok(NewTicket {
                    booking_id: booking.id,
                    event_id: booking.event_id,
                    ticket_type_id: booking.ticket_type_id,
                    sequence,
                    seat_label: seat_label(sequence),
                    qr_code: self.codes.render(&code)?,
                    code,
                })
            })
            .collect()
    }
}
