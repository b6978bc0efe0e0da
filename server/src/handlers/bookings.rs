use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Identity;
use crate::models::payment::PaymentMethod;
use crate::models::promotion::PromotionSelector;
use crate::state::AppState;
use crate::utils::error::{AppError, FieldError};
use crate::utils::extract::AppJson;
use crate::utils::response::{created, success};
use crate::utils::validation::non_blank;

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub event_id: Uuid,
    pub ticket_type_id: Uuid,
    pub quantity: i32,
    pub promotion_id: Option<Uuid>,
    pub promotion_code: Option<String>,
}

impl CreateBookingRequest {
    /// A booking names its promotion by id or by code, never both.
    fn selector(&self) -> Result<Option<PromotionSelector>, AppError> {
        match (self.promotion_id, non_blank(self.promotion_code.clone())) {
            (Some(_), Some(_)) => Err(AppError::InvalidFields(vec![FieldError::new(
                "promotion_code",
                "provide either promotion_id or promotion_code, not both",
            )])),
            (Some(id), None) => Ok(Some(PromotionSelector::Id(id))),
            (None, Some(code)) => Ok(Some(PromotionSelector::Code(code))),
            (None, None) => Ok(None),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub method: PaymentMethod,
    pub amount: Decimal,
}

pub async fn create_booking(
    State(state): State<AppState>,
    identity: Identity,
    AppJson(request): AppJson<CreateBookingRequest>,
) -> Result<Response, AppError> {
    let selector = request.selector()?;
    let customer_id = state.bookings.customer_id(identity.user_id).await?;

    let booking = state
        .bookings
        .create_booking(
            customer_id,
            request.event_id,
            request.ticket_type_id,
            request.quantity,
            selector,
            Utc::now(),
        )
        .await?;

    Ok(created(booking, "Booking created").into_response())
}

pub async fn list_bookings(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Response, AppError> {
    let customer_id = state.bookings.customer_id(identity.user_id).await?;
    let bookings = state.bookings.list_bookings(customer_id).await?;
    Ok(success(bookings, "Bookings retrieved").into_response())
}

pub async fn get_booking(
    State(state): State<AppState>,
    identity: Identity,
    Path(booking_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let customer_id = state.bookings.customer_id(identity.user_id).await?;
    let booking = state.bookings.get_booking(customer_id, booking_id).await?;
    Ok(success(booking, "Booking retrieved").into_response())
}

pub async fn cancel_booking(
    State(state): State<AppState>,
    identity: Identity,
    Path(booking_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let customer_id = state.bookings.customer_id(identity.user_id).await?;
    let booking = state.bookings.cancel_booking(customer_id, booking_id).await?;
    Ok(success(booking, "Booking cancelled").into_response())
}

pub async fn pay_booking(
    State(state): State<AppState>,
    identity: Identity,
    Path(booking_id): Path<Uuid>,
    AppJson(request): AppJson<PaymentRequest>,
) -> Result<Response, AppError> {
    let customer_id = state.bookings.customer_id(identity.user_id).await?;
    let receipt = state
        .bookings
        .record_payment(customer_id, booking_id, request.method, request.amount)
        .await?;
    Ok(created(receipt, "Payment recorded and tickets issued").into_response())
}

pub async fn list_tickets(
    State(state): State<AppState>,
    identity: Identity,
    Path(booking_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let customer_id = state.bookings.customer_id(identity.user_id).await?;
    let tickets = state.bookings.list_tickets(customer_id, booking_id).await?;
    Ok(success(tickets, "Tickets retrieved").into_response())
}
