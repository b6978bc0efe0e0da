use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    /// The only legal moves are `Pending -> Confirmed` and
    /// `Pending -> Cancelled`; both targets are terminal.
    pub fn transition_to(self, next: BookingStatus) -> Result<BookingStatus, AppError> {
        match (self, next) {
            (BookingStatus::Pending, BookingStatus::Confirmed)
            | (BookingStatus::Pending, BookingStatus::Cancelled) => Ok(next),
            _ => Err(AppError::InvalidState(format!(
                "Booking is {} and cannot become {}",
                self, next
            ))),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Pending => f.write_str("pending"),
            BookingStatus::Confirmed => f.write_str("confirmed"),
            BookingStatus::Cancelled => f.write_str("cancelled"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub event_id: Uuid,
    pub ticket_type_id: Uuid,
    pub promotion_id: Option<Uuid>,
    pub quantity: i32,
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub final_amount: Decimal,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Checks that this booking can be paid with `amount`: it must still be
    /// pending and `amount` must equal the final amount (scale is ignored).
    pub fn ensure_payable(&self, amount: Decimal) -> Result<(), AppError> {
        self.status.transition_to(BookingStatus::Confirmed)?;

        if amount != self.final_amount {
            return Err(AppError::AmountMismatch {
                expected: self.final_amount,
                received: amount,
            });
        }
        Ok(())
    }
}

/// Priced booking ready to be persisted together with its seat decrement.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub customer_id: Uuid,
    pub event_id: Uuid,
    pub ticket_type_id: Uuid,
    pub promotion_id: Option<Uuid>,
    pub quantity: i32,
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub final_amount: Decimal,
}

/// Booking joined with what a customer needs to recognise it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BookingSummary {
    pub id: Uuid,
    pub event_id: Uuid,
    pub event_title: String,
    pub event_starts_at: DateTime<Utc>,
    pub ticket_type_id: Uuid,
    pub ticket_type_name: String,
    pub quantity: i32,
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub final_amount: Decimal,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}
