use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::booking::{BookingStatus, BookingSummary};

const RECENT_BOOKINGS: usize = 5;
const TOP_EVENTS: usize = 5;

#[derive(Debug, Serialize)]
pub struct CustomerDashboard {
    pub total_bookings: usize,
    pub upcoming_bookings: usize,
    pub recent_bookings: Vec<BookingSummary>,
}

impl CustomerDashboard {
    /// `bookings` must be ordered newest first.
    pub fn from_bookings(bookings: Vec<BookingSummary>, now: DateTime<Utc>) -> Self {
        let upcoming_bookings = bookings
            .iter()
            .filter(|b| b.status != BookingStatus::Cancelled && b.event_starts_at >= now)
            .count();

        Self {
            total_bookings: bookings.len(),
            upcoming_bookings,
            recent_bookings: bookings.into_iter().take(RECENT_BOOKINGS).collect(),
        }
    }
}

/// Sales figures for a single event.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EventStats {
    pub event_id: Uuid,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub tickets_sold: i64,
    pub revenue: Decimal,
    pub seats_remaining: i64,
}

#[derive(Debug, Serialize)]
pub struct OrganizerDashboard {
    pub organizer_name: String,
    pub total_events: usize,
    pub tickets_sold: i64,
    pub revenue: Decimal,
    pub active_promotions: i64,
    pub upcoming_events: Vec<EventStats>,
    pub top_events: Vec<EventStats>,
}

impl OrganizerDashboard {
    pub fn from_stats(
        organizer_name: String,
        stats: Vec<EventStats>,
        active_promotions: i64,
        now: DateTime<Utc>,
    ) -> Self {
        let tickets_sold = stats.iter().map(|s| s.tickets_sold).sum();
        let revenue = stats.iter().map(|s| s.revenue).sum();

        let mut upcoming_events: Vec<EventStats> =
            stats.iter().filter(|s| s.starts_at >= now).cloned().collect();
        upcoming_events.sort_by_key(|s| s.starts_at);

        let mut top_events = stats.clone();
        top_events.sort_by(|a, b| b.revenue.cmp(&a.revenue));
        top_events.truncate(TOP_EVENTS);

        Self {
            organizer_name,
            total_events: stats.len(),
            tickets_sold,
            revenue,
            active_promotions,
            upcoming_events,
            top_events,
        }
    }
}
