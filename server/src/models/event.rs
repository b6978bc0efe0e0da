use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::ticket_type::TicketType;
use super::{category::Category, venue::Venue};
use crate::utils::error::AppError;
use crate::utils::pagination::PageParams;
use crate::utils::validation::{non_blank, Validator};

/// Public listings show nine events per page by default.
pub const PUBLIC_PAGE_SIZE: i64 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Active,
    Cancelled,
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventStatus::Active => f.write_str("active"),
            EventStatus::Cancelled => f.write_str("cancelled"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub category_id: Uuid,
    pub venue_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub image_ref: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
}

/// Row shape for event listings. Seat counts are sums over the event's
/// ticket types, which own the seat inventory.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EventListing {
    pub id: Uuid,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub status: EventStatus,
    pub image_ref: Option<String>,
    pub venue_id: Uuid,
    pub venue_name: String,
    pub city: Option<String>,
    pub category_id: Uuid,
    pub category_name: String,
    pub total_seats: i64,
    pub remaining_seats: i64,
    pub starting_price: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventDetails {
    #[serde(flatten)]
    pub event: Event,
    pub venue: Venue,
    pub category: Category,
    pub ticket_types: Vec<TicketType>,
    pub total_seats: i64,
    pub remaining_seats: i64,
}

impl EventDetails {
    pub fn new(event: Event, venue: Venue, category: Category, ticket_types: Vec<TicketType>) -> Self {
        let total_seats = ticket_types.iter().map(|t| i64::from(t.total_seats)).sum();
        let remaining_seats = ticket_types
            .iter()
            .map(|t| i64::from(t.remaining_seats))
            .sum();

        Self {
            event,
            venue,
            category,
            ticket_types,
            total_seats,
            remaining_seats,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventInput {
    pub title: String,
    pub description: Option<String>,
    pub image_ref: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub category_id: Uuid,
    pub venue_id: Uuid,
}

impl EventInput {
    pub fn validate(self) -> Result<Self, AppError> {
        let input = Self {
            title: self.title.trim().to_string(),
            description: non_blank(self.description),
            image_ref: non_blank(self.image_ref),
            ..self
        };

        Validator::new()
            .required("title", &input.title, 200)
            .optional("image_ref", input.image_ref.as_deref(), 500)
            .finish()?;
        Ok(input)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct EventStatusInput {
    pub status: EventStatus,
}

/// Query string of the public event listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventFilter {
    pub category_id: Option<Uuid>,
    pub venue_id: Option<Uuid>,
    /// Calendar day (UTC) the event starts on.
    pub date: Option<NaiveDate>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Query string of the organizer and admin event listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManagedEventFilter {
    pub search: Option<String>,
    pub category_id: Option<Uuid>,
    pub venue_id: Option<Uuid>,
    pub status: Option<EventStatus>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl EventFilter {
    pub fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            page_size: self.page_size,
        }
    }

    /// `ILIKE` pattern for the search term, if any.
    pub fn search_pattern(&self) -> Option<String> {
        search_pattern(self.search.as_deref())
    }

    /// Half-open `[start, end)` UTC range covering `date`.
    pub fn day_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let start = self.date?.and_hms_opt(0, 0, 0)?.and_utc();
        Some((start, start + chrono::Duration::days(1)))
    }
}

impl ManagedEventFilter {
    pub fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            page_size: self.page_size,
        }
    }

    pub fn search_pattern(&self) -> Option<String> {
        search_pattern(self.search.as_deref())
    }
}

/// Case-insensitive substring pattern with `LIKE` wildcards escaped.
pub fn search_pattern(term: Option<&str>) -> Option<String> {
    let term = term?.trim();
    if term.is_empty() {
        return None;
    }

    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Some(format!("%{}%", escaped))
}
