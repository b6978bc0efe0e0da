use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::event::EventFilter;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::extract::AppQuery;
use crate::utils::response::success;

#[derive(Debug, Default, Deserialize)]
pub struct VenueSearch {
    pub search: Option<String>,
}

pub async fn list_events(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<EventFilter>,
) -> Result<Response, AppError> {
    let events = state.events.list_public(&filter).await?;
    Ok(success(events, "Events retrieved").into_response())
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let details = state.events.details(event_id).await?;
    Ok(success(details, "Event retrieved").into_response())
}

/// Promotions a customer may apply right now.
pub async fn list_event_promotions(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    state
        .events
        .find(event_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    let promotions = state.promotions.valid_for_event(event_id, Utc::now()).await?;
    Ok(success(promotions, "Promotions retrieved").into_response())
}

pub async fn list_venues(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<VenueSearch>,
) -> Result<Response, AppError> {
    let venues = state.venues.list(query.search.as_deref()).await?;
    Ok(success(venues, "Venues retrieved").into_response())
}

pub async fn list_categories(State(state): State<AppState>) -> Result<Response, AppError> {
    let categories = state.categories.list().await?;
    Ok(success(categories, "Categories retrieved").into_response())
}
