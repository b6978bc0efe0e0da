use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::event::search_pattern;
use crate::utils::pagination::PageParams;

/// Query string of the admin customer and organizer listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountFilter {
    pub search: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl AccountFilter {
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

/// Customer profile with how many bookings it has made.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CustomerAccount {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: String,
    pub phone: Option<String>,
    pub bookings_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Organizer profile with how many events it hosts.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrganizerAccount {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub hosted_events_count: i64,
    pub created_at: DateTime<Utc>,
}
