use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::auth::Identity;
use crate::models::account::AccountFilter;
use crate::models::category::CategoryInput;
use crate::models::event::ManagedEventFilter;
use crate::models::venue::VenueInput;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::extract::{AppJson, AppQuery};
use crate::utils::response::{created, empty_success, success};

pub async fn create_venue(
    State(state): State<AppState>,
    AppJson(input): AppJson<VenueInput>,
) -> Result<Response, AppError> {
    let venue = state.venues.create(input.validate()?).await?;
    Ok(created(venue, "Venue created").into_response())
}

pub async fn update_venue(
    State(state): State<AppState>,
    Path(venue_id): Path<Uuid>,
    AppJson(input): AppJson<VenueInput>,
) -> Result<Response, AppError> {
    let venue = state.venues.update(venue_id, input.validate()?).await?;
    Ok(success(venue, "Venue updated").into_response())
}

pub async fn delete_venue(
    State(state): State<AppState>,
    Path(venue_id): Path<Uuid>,
) -> Result<Response, AppError> {
    state.venues.delete(venue_id).await?;
    Ok(empty_success("Venue deleted").into_response())
}

pub async fn create_category(
    State(state): State<AppState>,
    AppJson(input): AppJson<CategoryInput>,
) -> Result<Response, AppError> {
    let category = state.categories.create(input.validate()?).await?;
    Ok(created(category, "Category created").into_response())
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
    AppJson(input): AppJson<CategoryInput>,
) -> Result<Response, AppError> {
    let category = state
        .categories
        .update(category_id, input.validate()?)
        .await?;
    Ok(success(category, "Category updated").into_response())
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
) -> Result<Response, AppError> {
    state.categories.delete(category_id).await?;
    Ok(empty_success("Category deleted").into_response())
}

pub async fn list_events(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<ManagedEventFilter>,
) -> Result<Response, AppError> {
    let events = state.events.list_all(&filter).await?;
    Ok(success(events, "Events retrieved").into_response())
}

pub async fn delete_event(
    State(state): State<AppState>,
    identity: Identity,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    state.events.delete_any(event_id).await?;

    tracing::info!(event_id = %event_id, admin_id = %identity.user_id, "Event removed by admin");
    Ok(empty_success("Event deleted").into_response())
}

pub async fn list_customers(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<AccountFilter>,
) -> Result<Response, AppError> {
    let customers = state.customers.list_accounts(&filter).await?;
    Ok(success(customers, "Customers retrieved").into_response())
}

pub async fn delete_customer(
    State(state): State<AppState>,
    identity: Identity,
    Path(customer_id): Path<Uuid>,
) -> Result<Response, AppError> {
    state.customers.delete(customer_id).await?;

    tracing::info!(customer_id = %customer_id, admin_id = %identity.user_id, "Customer removed by admin");
    Ok(empty_success("Customer deleted").into_response())
}

pub async fn list_organizers(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<AccountFilter>,
) -> Result<Response, AppError> {
    let organizers = state.organizers.list_accounts(&filter).await?;
    Ok(success(organizers, "Organizers retrieved").into_response())
}

pub async fn delete_organizer(
    State(state): State<AppState>,
    identity: Identity,
    Path(organizer_id): Path<Uuid>,
) -> Result<Response, AppError> {
    state.organizers.delete(organizer_id).await?;

    tracing::info!(organizer_id = %organizer_id, admin_id = %identity.user_id, "Organizer removed by admin");
    Ok(empty_success("Organizer deleted").into_response())
}
