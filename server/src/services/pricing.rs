//! Booking price computation and promotion evaluation.
//!
//! Everything here is pure: callers load the ticket type and promotion and
//! pass `now` explicitly.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use uuid::Uuid;

use crate::models::promotion::Promotion;
use crate::utils::error::AppError;

pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Rounds to cents, half away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discount {
    pub amount: Decimal,
    pub promotion_id: Option<Uuid>,
}

impl Discount {
    pub const NONE: Discount = Discount {
        amount: Decimal::ZERO,
        promotion_id: None,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub final_amount: Decimal,
    pub promotion_id: Option<Uuid>,
}

/// Decides whether `promotion` applies to a booking of `quantity` units of
/// `ticket_type_id` at `unit_price`, and how much it takes off.
///
/// `None` means the customer asked for no promotion, which is not an error.
pub fn evaluate_promotion(
    promotion: Option<&Promotion>,
    event_id: Uuid,
    ticket_type_id: Uuid,
    quantity: i32,
    unit_price: Decimal,
    now: DateTime<Utc>,
) -> Result<Discount, AppError> {
    let Some(promotion) = promotion else {
        return Ok(Discount::NONE);
    };

    if promotion.event_id != event_id || promotion.ticket_type_id != ticket_type_id {
        return Err(AppError::PromotionInvalid(format!(
            "Promotion '{}' does not apply to this ticket type",
            promotion.code
        )));
    }

    if !promotion.is_valid_at(now) {
        return Err(AppError::PromotionInvalid(format!(
            "Promotion '{}' is not currently active",
            promotion.code
        )));
    }

    let subtotal = subtotal(quantity, unit_price);
    let amount = round_money(subtotal * promotion.discount_percentage / Decimal::ONE_HUNDRED)
        .clamp(Decimal::ZERO, subtotal);

    Ok(Discount {
        amount,
        promotion_id: Some(promotion.id),
    })
}

pub fn subtotal(quantity: i32, unit_price: Decimal) -> Decimal {
    round_money(unit_price * Decimal::from(quantity))
}

/// Full price breakdown; `final_amount = subtotal - discount_amount >= 0`.
pub fn quote(
    promotion: Option<&Promotion>,
    event_id: Uuid,
    ticket_type_id: Uuid,
    quantity: i32,
    unit_price: Decimal,
    now: DateTime<Utc>,
) -> Result<Quote, AppError> {
    let discount = evaluate_promotion(
        promotion,
        event_id,
        ticket_type_id,
        quantity,
        unit_price,
        now,
    )?;
    let subtotal = subtotal(quantity, unit_price);

    Ok(Quote {
        subtotal,
        discount_amount: discount.amount,
        final_amount: subtotal - discount.amount,
        promotion_id: discount.promotion_id,
    })
}
