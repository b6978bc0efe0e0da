use std::sync::Arc;

use sqlx::PgPool;

use crate::repositories::{
    CategoryRepository, CustomerRepository, DashboardRepository, EventRepository,
    OrganizerRepository, PromotionRepository, TicketTypeRepository, VenueRepository,
};
use crate::services::{BookingService, CodeRenderer};
use crate::store::{BookingStore, PgBookingStore};

/// Shared handles for every request handler.
#[derive(Clone)]
pub struct AppState {
    pub bookings: BookingService,
    pub events: EventRepository,
    pub ticket_types: TicketTypeRepository,
    pub promotions: PromotionRepository,
    pub venues: VenueRepository,
    pub categories: CategoryRepository,
    pub customers: CustomerRepository,
    pub organizers: OrganizerRepository,
    pub dashboards: DashboardRepository,
}

impl AppState {
    pub fn new(pool: PgPool, codes: Arc<dyn CodeRenderer>) -> Self {
        let store: Arc<dyn BookingStore> = Arc::new(PgBookingStore::new(pool.clone()));
        Self::with_store(pool, store, codes)
    }

    /// Same as [`AppState::new`] with a caller-supplied booking store.
    pub fn with_store(
        pool: PgPool,
        store: Arc<dyn BookingStore>,
        codes: Arc<dyn CodeRenderer>,
    ) -> Self {
        Self {
            bookings: BookingService::new(store, codes),
            events: EventRepository::new(pool.clone()),
            ticket_types: TicketTypeRepository::new(pool.clone()),
            promotions: PromotionRepository::new(pool.clone()),
            venues: VenueRepository::new(pool.clone()),
            categories: CategoryRepository::new(pool.clone()),
            customers: CustomerRepository::new(pool.clone()),
            organizers: OrganizerRepository::new(pool.clone()),
            dashboards: DashboardRepository::new(pool),
        }
    }
}
