pub mod catalog;
pub mod dashboards;
pub mod events;
pub mod profiles;
pub mod promotions;
pub mod ticket_types;

pub use catalog::{CategoryRepository, VenueRepository};
pub use dashboards::DashboardRepository;
pub use events::EventRepository;
pub use profiles::{CustomerRepository, OrganizerRepository};
pub use promotions::PromotionRepository;
pub use ticket_types::TicketTypeRepository;
