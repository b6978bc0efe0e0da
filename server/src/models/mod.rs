pub mod account;
pub mod booking;
pub mod category;
pub mod customer;
pub mod dashboard;
pub mod event;
pub mod organizer;
pub mod payment;
pub mod promotion;
pub mod ticket;
pub mod ticket_type;
pub mod venue;
