use axum::extract::State;
use axum::response::{IntoResponse, Response};
use chrono::Utc;

use crate::auth::Identity;
use crate::models::customer::CustomerInput;
use crate::models::dashboard::CustomerDashboard;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::extract::AppJson;
use crate::utils::response::success;

pub async fn get_profile(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Response, AppError> {
    let customer = state.customers.require(identity.user_id).await?;
    Ok(success(customer, "Customer profile retrieved").into_response())
}

pub async fn upsert_profile(
    State(state): State<AppState>,
    identity: Identity,
    AppJson(input): AppJson<CustomerInput>,
) -> Result<Response, AppError> {
    let input = input.validate()?;
    let customer = state.customers.upsert(identity.user_id, input).await?;

    tracing::info!(customer_id = %customer.id, "Customer profile saved");
    Ok(success(customer, "Customer profile saved").into_response())
}

pub async fn dashboard(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Response, AppError> {
    let customer_id = state.bookings.customer_id(identity.user_id).await?;
    let bookings = state.bookings.list_bookings(customer_id).await?;

    let dashboard = CustomerDashboard::from_bookings(bookings, Utc::now());
    Ok(success(dashboard, "Dashboard retrieved").into_response())
}
