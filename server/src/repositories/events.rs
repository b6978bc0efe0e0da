use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::category::Category;
use crate::models::event::{
    Event, EventDetails, EventFilter, EventInput, EventListing, EventStatus, ManagedEventFilter,
    PUBLIC_PAGE_SIZE,
};
use crate::models::ticket_type::TicketType;
use crate::models::venue::Venue;
use crate::utils::error::AppError;
use crate::utils::pagination::{Page, Paged, DEFAULT_PAGE_SIZE};

const LISTING_SELECT: &str = r#"
    SELECT e.id, e.title, e.starts_at, e.status, e.image_ref,
           v.id AS venue_id, v.name AS venue_name, v.city,
           c.id AS category_id, c.name AS category_name,
           COALESCE(SUM(tt.total_seats), 0)::BIGINT AS total_seats,
           COALESCE(SUM(tt.remaining_seats), 0)::BIGINT AS remaining_seats,
           MIN(tt.price) AS starting_price
    FROM events e
    JOIN venues v ON v.id = e.venue_id
    JOIN categories c ON c.id = e.category_id
    LEFT JOIN ticket_types tt ON tt.event_id = e.id
"#;

// Parameters: $1 status, $2 category, $3 venue, $4/$5 start range,
// $6 search pattern, $7 organizer.
const LISTING_WHERE: &str = r#"
    WHERE ($1::event_status IS NULL OR e.status = $1)
      AND ($2::uuid IS NULL OR e.category_id = $2)
      AND ($3::uuid IS NULL OR e.venue_id = $3)
      AND ($4::timestamptz IS NULL OR (e.starts_at >= $4 AND e.starts_at < $5))
      AND ($6::text IS NULL OR e.title ILIKE $6 OR e.description ILIKE $6)
      AND ($7::uuid IS NULL OR e.organizer_id = $7)
"#;

#[derive(Debug, Clone, Copy)]
enum ListingOrder {
    Soonest,
    Newest,
}

impl ListingOrder {
    fn clause(self) -> &'static str {
        match self {
            ListingOrder::Soonest => "ORDER BY e.starts_at ASC, e.id",
            ListingOrder::Newest => "ORDER BY e.created_at DESC, e.id",
        }
    }
}

#[derive(Debug, Default)]
struct ListingQuery {
    status: Option<EventStatus>,
    category_id: Option<Uuid>,
    venue_id: Option<Uuid>,
    day: Option<(DateTime<Utc>, DateTime<Utc>)>,
    search: Option<String>,
    organizer_id: Option<Uuid>,
}

#[derive(Clone, Debug)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Active events for the public catalog, soonest first.
    pub async fn list_public(&self, filter: &EventFilter) -> Result<Paged<EventListing>, AppError> {
        let page = filter.page_params().resolve(PUBLIC_PAGE_SIZE)?;
        let query = ListingQuery {
            status: Some(EventStatus::Active),
            category_id: filter.category_id,
            venue_id: filter.venue_id,
            day: filter.day_range(),
            search: filter.search_pattern(),
            organizer_id: None,
        };
        self.listing(query, page, ListingOrder::Soonest).await
    }

    /// An organizer's own events, newest first.
    pub async fn list_for_organizer(
        &self,
        organizer_id: Uuid,
        filter: &ManagedEventFilter,
    ) -> Result<Paged<EventListing>, AppError> {
        let page = filter.page_params().resolve(DEFAULT_PAGE_SIZE)?;
        let query = ListingQuery {
            status: filter.status,
            category_id: filter.category_id,
            venue_id: filter.venue_id,
            day: None,
            search: filter.search_pattern(),
            organizer_id: Some(organizer_id),
        };
        self.listing(query, page, ListingOrder::Newest).await
    }

    /// Every event regardless of owner or status, for moderation.
    pub async fn list_all(&self, filter: &ManagedEventFilter) -> Result<Paged<EventListing>, AppError> {
        let page = filter.page_params().resolve(DEFAULT_PAGE_SIZE)?;
        let query = ListingQuery {
            status: filter.status,
            category_id: filter.category_id,
            venue_id: filter.venue_id,
            day: None,
            search: filter.search_pattern(),
            organizer_id: None,
        };
        self.listing(query, page, ListingOrder::Newest).await
    }

    async fn listing(
        &self,
        query: ListingQuery,
        page: Page,
        order: ListingOrder,
    ) -> Result<Paged<EventListing>, AppError> {
        let (day_start, day_end) = query.day.unzip();

        let total_items = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM events e {}",
            LISTING_WHERE
        ))
        .bind(query.status)
        .bind(query.category_id)
        .bind(query.venue_id)
        .bind(day_start)
        .bind(day_end)
        .bind(&query.search)
        .bind(query.organizer_id)
        .fetch_one(&self.pool)
        .await?;

        let items = sqlx::query_as::<_, EventListing>(&format!(
            "{} {} GROUP BY e.id, v.id, c.id {} LIMIT $8 OFFSET $9",
            LISTING_SELECT,
            LISTING_WHERE,
            order.clause()
        ))
        .bind(query.status)
        .bind(query.category_id)
        .bind(query.venue_id)
        .bind(day_start)
        .bind(day_end)
        .bind(&query.search)
        .bind(query.organizer_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Paged::new(items, page, total_items))
    }

    /// Event with venue, category and ticket types.
    pub async fn details(&self, id: Uuid) -> Result<EventDetails, AppError> {
        let event = self.find(id).await?.ok_or_else(event_not_found)?;

        let venue = sqlx::query_as::<_, Venue>("SELECT * FROM venues WHERE id = $1")
            .bind(event.venue_id)
            .fetch_one(&self.pool)
            .await?;
        let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
            .bind(event.category_id)
            .fetch_one(&self.pool)
            .await?;
        let ticket_types = sqlx::query_as::<_, TicketType>(
            "SELECT * FROM ticket_types WHERE event_id = $1 ORDER BY price, name",
        )
        .bind(event.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(EventDetails::new(event, venue, category, ticket_types))
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<Event>, AppError> {
        let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(event)
    }

    pub async fn create(&self, organizer_id: Uuid, input: EventInput) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (
                id, organizer_id, category_id, venue_id, title, description, image_ref, starts_at, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(organizer_id)
        .bind(input.category_id)
        .bind(input.venue_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.image_ref)
        .bind(input.starts_at)
        .bind(EventStatus::Active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_constraint(e, "Category or venue does not exist"))
    }

    pub async fn update(
        &self,
        organizer_id: Uuid,
        id: Uuid,
        input: EventInput,
    ) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET category_id = $3, venue_id = $4, title = $5, description = $6,
                image_ref = $7, starts_at = $8
            WHERE id = $1 AND organizer_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(organizer_id)
        .bind(input.category_id)
        .bind(input.venue_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.image_ref)
        .bind(input.starts_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_constraint(e, "Category or venue does not exist"))?
        .ok_or_else(event_not_found)
    }

    pub async fn set_status(
        &self,
        organizer_id: Uuid,
        id: Uuid,
        status: EventStatus,
    ) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            "UPDATE events SET status = $3 WHERE id = $1 AND organizer_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(organizer_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(event_not_found)
    }

    pub async fn delete_owned(&self, organizer_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1 AND organizer_id = $2")
            .bind(id)
            .bind(organizer_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from_constraint(e, EVENT_HAS_BOOKINGS))?;

        if result.rows_affected() == 0 {
            return Err(event_not_found());
        }
        Ok(())
    }

    pub async fn delete_any(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from_constraint(e, EVENT_HAS_BOOKINGS))?;

        if result.rows_affected() == 0 {
            return Err(event_not_found());
        }
        Ok(())
    }
}

const EVENT_HAS_BOOKINGS: &str = "Event has bookings and cannot be deleted";

pub(crate) fn event_not_found() -> AppError {
    AppError::NotFound("Event not found".to_string())
}
