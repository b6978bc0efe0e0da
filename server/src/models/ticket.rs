use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ticket {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub event_id: Uuid,
    pub ticket_type_id: Uuid,
    pub sequence: i32,
    pub seat_label: String,
    pub code: String,
    pub qr_code: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTicket {
    pub booking_id: Uuid,
    pub event_id: Uuid,
    pub ticket_type_id: Uuid,
    pub sequence: i32,
    pub seat_label: String,
    pub code: String,
    pub qr_code: String,
}

/// Scannable code for the `sequence`-th unit (1-based) of a booking.
/// Booking ids are unique, so codes are unique across all bookings.
pub fn ticket_code(booking_id: Uuid, sequence: i32) -> String {
    format!("{}-{}", booking_id, sequence)
}

pub fn seat_label(sequence: i32) -> String {
    format!("Seat-{}", sequence)
}
