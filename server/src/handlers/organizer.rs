//! Organizer self-service: profile, dashboard, events, ticket types and
//! promotions. Every lookup is scoped to the caller's organizer profile.

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::Identity;
use crate::models::dashboard::OrganizerDashboard;
use crate::models::event::{EventInput, EventStatusInput, ManagedEventFilter};
use crate::models::organizer::{Organizer, OrganizerInput};
use crate::models::promotion::{PromotionFilter, PromotionInput};
use crate::models::ticket_type::TicketTypeInput;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::extract::{AppJson, AppQuery};
use crate::utils::response::{created, empty_success, success};

async fn organizer(state: &AppState, identity: &Identity) -> Result<Organizer, AppError> {
    state.organizers.require(identity.user_id).await
}

pub async fn get_profile(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Response, AppError> {
    let organizer = organizer(&state, &identity).await?;
    Ok(success(organizer, "Organizer profile retrieved").into_response())
}

pub async fn upsert_profile(
    State(state): State<AppState>,
    identity: Identity,
    AppJson(input): AppJson<OrganizerInput>,
) -> Result<Response, AppError> {
    let input = input.validate()?;
    let organizer = state.organizers.upsert(identity.user_id, input).await?;

    tracing::info!(organizer_id = %organizer.id, "Organizer profile saved");
    Ok(success(organizer, "Organizer profile saved").into_response())
}

pub async fn dashboard(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Response, AppError> {
    let organizer = organizer(&state, &identity).await?;
    let now = Utc::now();

    let stats = state.dashboards.event_stats(organizer.id).await?;
    let active_promotions = state.dashboards.active_promotions(organizer.id, now).await?;

    let dashboard = OrganizerDashboard::from_stats(organizer.name, stats, active_promotions, now);
    Ok(success(dashboard, "Dashboard retrieved").into_response())
}

pub async fn list_events(
    State(state): State<AppState>,
    identity: Identity,
    AppQuery(filter): AppQuery<ManagedEventFilter>,
) -> Result<Response, AppError> {
    let organizer = organizer(&state, &identity).await?;
    let events = state.events.list_for_organizer(organizer.id, &filter).await?;
    Ok(success(events, "Events retrieved").into_response())
}

pub async fn create_event(
    State(state): State<AppState>,
    identity: Identity,
    AppJson(input): AppJson<EventInput>,
) -> Result<Response, AppError> {
    let input = input.validate()?;
    let organizer = organizer(&state, &identity).await?;
    let event = state.events.create(organizer.id, input).await?;

    tracing::info!(event_id = %event.id, organizer_id = %organizer.id, "Event created");
    Ok(created(event, "Event created").into_response())
}

pub async fn update_event(
    State(state): State<AppState>,
    identity: Identity,
    Path(event_id): Path<Uuid>,
    AppJson(input): AppJson<EventInput>,
) -> Result<Response, AppError> {
    let input = input.validate()?;
    let organizer = organizer(&state, &identity).await?;
    let event = state.events.update(organizer.id, event_id, input).await?;
    Ok(success(event, "Event updated").into_response())
}

pub async fn set_event_status(
    State(state): State<AppState>,
    identity: Identity,
    Path(event_id): Path<Uuid>,
    AppJson(input): AppJson<EventStatusInput>,
) -> Result<Response, AppError> {
    let organizer = organizer(&state, &identity).await?;
    let event = state
        .events
        .set_status(organizer.id, event_id, input.status)
        .await?;

    tracing::info!(event_id = %event.id, status = %event.status, "Event status changed");
    Ok(success(event, "Event status updated").into_response())
}

pub async fn delete_event(
    State(state): State<AppState>,
    identity: Identity,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let organizer = organizer(&state, &identity).await?;
    state.events.delete_owned(organizer.id, event_id).await?;

    tracing::info!(event_id = %event_id, "Event deleted");
    Ok(empty_success("Event deleted").into_response())
}

pub async fn add_ticket_type(
    State(state): State<AppState>,
    identity: Identity,
    Path(event_id): Path<Uuid>,
    AppJson(input): AppJson<TicketTypeInput>,
) -> Result<Response, AppError> {
    let input = input.validate()?;
    let organizer = organizer(&state, &identity).await?;
    let ticket_type = state
        .ticket_types
        .add(organizer.id, event_id, input)
        .await?;
    Ok(created(ticket_type, "Ticket type added").into_response())
}

pub async fn update_ticket_type(
    State(state): State<AppState>,
    identity: Identity,
    Path(ticket_type_id): Path<Uuid>,
    AppJson(input): AppJson<TicketTypeInput>,
) -> Result<Response, AppError> {
    let input = input.validate()?;
    let organizer = organizer(&state, &identity).await?;
    let ticket_type = state
        .ticket_types
        .update(organizer.id, ticket_type_id, input)
        .await?;
    Ok(success(ticket_type, "Ticket type updated").into_response())
}

pub async fn delete_ticket_type(
    State(state): State<AppState>,
    identity: Identity,
    Path(ticket_type_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let organizer = organizer(&state, &identity).await?;
    state
        .ticket_types
        .delete(organizer.id, ticket_type_id)
        .await?;
    Ok(empty_success("Ticket type deleted").into_response())
}

pub async fn list_promotions(
    State(state): State<AppState>,
    identity: Identity,
    AppQuery(filter): AppQuery<PromotionFilter>,
) -> Result<Response, AppError> {
    let organizer = organizer(&state, &identity).await?;
    let promotions = state
        .promotions
        .list_for_organizer(organizer.id, filter)
        .await?;
    Ok(success(promotions, "Promotions retrieved").into_response())
}

pub async fn create_promotion(
    State(state): State<AppState>,
    identity: Identity,
    AppJson(input): AppJson<PromotionInput>,
) -> Result<Response, AppError> {
    let input = input.validate()?;
    let organizer = organizer(&state, &identity).await?;
    let promotion = state.promotions.create(organizer.id, input).await?;

    tracing::info!(promotion_id = %promotion.id, code = %promotion.code, "Promotion created");
    Ok(created(promotion, "Promotion created").into_response())
}

pub async fn update_promotion(
    State(state): State<AppState>,
    identity: Identity,
    Path(promotion_id): Path<Uuid>,
    AppJson(input): AppJson<PromotionInput>,
) -> Result<Response, AppError> {
    let input = input.validate()?;
    let organizer = organizer(&state, &identity).await?;
    let promotion = state
        .promotions
        .update(organizer.id, promotion_id, input)
        .await?;
    Ok(success(promotion, "Promotion updated").into_response())
}

pub async fn delete_promotion(
    State(state): State<AppState>,
    identity: Identity,
    Path(promotion_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let organizer = organizer(&state, &identity).await?;
    state.promotions.delete(organizer.id, promotion_id).await?;
    Ok(empty_success("Promotion deleted").into_response())
}
