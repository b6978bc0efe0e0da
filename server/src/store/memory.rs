use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::{booking_not_found, BookingStore, ConfirmedBooking};
use crate::models::booking::{Booking, BookingStatus, BookingSummary, NewBooking};
use crate::models::event::{Event, EventStatus};
use crate::models::payment::{NewPayment, Payment, PaymentStatus};
use crate::models::promotion::{Promotion, PromotionSelector};
use crate::models::ticket::{NewTicket, Ticket};
use crate::models::ticket_type::TicketType;
use crate::utils::error::AppError;

#[derive(Default)]
struct State {
    customers: HashMap<Uuid, Uuid>,
    events: HashMap<Uuid, Event>,
    ticket_types: HashMap<Uuid, TicketType>,
    promotions: HashMap<Uuid, Promotion>,
    bookings: HashMap<Uuid, Booking>,
    payments: HashMap<Uuid, Payment>,
    tickets: Vec<Ticket>,
}

impl State {
    /// Nothing is written when any fresh ticket clashes on its code.
    fn insert_tickets(&mut self, tickets: Vec<NewTicket>) -> Result<Vec<Ticket>, AppError> {
        let fresh: Vec<NewTicket> = tickets
            .into_iter()
            .filter(|ticket| {
                !self
                    .tickets
                    .iter()
                    .any(|t| t.booking_id == ticket.booking_id && t.sequence == ticket.sequence)
            })
            .collect();
        if let Some(clash) = fresh
            .iter()
            .find(|ticket| self.tickets.iter().any(|t| t.code == ticket.code))
        {
            return Err(AppError::Conflict(format!(
                "Ticket code {} already issued",
                clash.code
            )));
        }

        let inserted: Vec<Ticket> = fresh
            .into_iter()
            .map(|ticket| Ticket {
                id: Uuid::new_v4(),
                booking_id: ticket.booking_id,
                event_id: ticket.event_id,
                ticket_type_id: ticket.ticket_type_id,
                sequence: ticket.sequence,
                seat_label: ticket.seat_label,
                code: ticket.code,
                qr_code: ticket.qr_code,
                created_at: Utc::now(),
            })
            .collect();
        self.tickets.extend(inserted.iter().cloned());
        Ok(inserted)
    }
}

/// Single-lock store used by the lifecycle tests. Holding one mutex for
/// every operation gives the same all-or-nothing behaviour as a transaction.
#[derive(Default)]
pub struct MemoryBookingStore {
    state: Mutex<State>,
}

impl MemoryBookingStore {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn add_customer(&self, user_id: Uuid) -> Uuid {
        let customer_id = Uuid::new_v4();
        self.lock().customers.insert(user_id, customer_id);
        customer_id
    }

    pub fn add_event(&self, status: EventStatus) -> Event {
        let event = Event {
            id: Uuid::new_v4(),
            organizer_id: Uuid::new_v4(),
            category_id: Uuid::new_v4(),
            venue_id: Uuid::new_v4(),
            title: "Harbour Lights Festival".to_string(),
            description: None,
            image_ref: None,
            starts_at: Utc::now() + Duration::days(30),
            status,
            created_at: Utc::now(),
        };
        self.lock().events.insert(event.id, event.clone());
        event
    }

    pub fn add_ticket_type(&self, event_id: Uuid, price: Decimal, seats: i32) -> TicketType {
        let ticket_type = TicketType {
            id: Uuid::new_v4(),
            event_id,
            name: "General".to_string(),
            price,
            total_seats: seats,
            remaining_seats: seats,
        };
        self.lock()
            .ticket_types
            .insert(ticket_type.id, ticket_type.clone());
        ticket_type
    }

    pub fn add_promotion(&self, promotion: Promotion) {
        self.lock().promotions.insert(promotion.id, promotion);
    }

    pub fn remaining_seats(&self, ticket_type_id: Uuid) -> i32 {
        self.lock().ticket_types[&ticket_type_id].remaining_seats
    }

    pub fn booking_count(&self) -> usize {
        self.lock().bookings.len()
    }

    pub fn payment_count(&self) -> usize {
        self.lock().payments.len()
    }
}

#[async_trait]
impl BookingStore for MemoryBookingStore {
    async fn customer_id_for_user(&self, user_id: Uuid) -> Result<Option<Uuid>, AppError> {
        Ok(self.lock().customers.get(&user_id).copied())
    }

    async fn event(&self, event_id: Uuid) -> Result<Option<Event>, AppError> {
        Ok(self.lock().events.get(&event_id).cloned())
    }

    async fn ticket_type(&self, ticket_type_id: Uuid) -> Result<Option<TicketType>, AppError> {
        Ok(self.lock().ticket_types.get(&ticket_type_id).cloned())
    }

    async fn promotion(
        &self,
        event_id: Uuid,
        selector: &PromotionSelector,
    ) -> Result<Option<Promotion>, AppError> {
        let state = self.lock();
        let found = match selector {
            PromotionSelector::Id(id) => state.promotions.get(id).cloned(),
            PromotionSelector::Code(code) => state
                .promotions
                .values()
                .find(|p| p.event_id == event_id && &p.code == code)
                .cloned(),
        };
        Ok(found)
    }

    async fn create_booking(&self, booking: NewBooking) -> Result<Booking, AppError> {
        let mut state = self.lock();

        let ticket_type = state
            .ticket_types
            .get_mut(&booking.ticket_type_id)
            .ok_or_else(|| AppError::NotFound("Ticket type not found".to_string()))?;
        if ticket_type.remaining_seats < booking.quantity {
            return Err(AppError::InsufficientSeats {
                requested: booking.quantity,
                remaining: ticket_type.remaining_seats,
            });
        }
        ticket_type.remaining_seats -= booking.quantity;

        let created = Booking {
            id: Uuid::new_v4(),
            customer_id: booking.customer_id,
            event_id: booking.event_id,
            ticket_type_id: booking.ticket_type_id,
            promotion_id: booking.promotion_id,
            quantity: booking.quantity,
            subtotal: booking.subtotal,
            discount_amount: booking.discount_amount,
            final_amount: booking.final_amount,
            status: BookingStatus::Pending,
            created_at: Utc::now(),
        };
        state.bookings.insert(created.id, created.clone());
        Ok(created)
    }

    async fn booking(&self, booking_id: Uuid) -> Result<Option<Booking>, AppError> {
        Ok(self.lock().bookings.get(&booking_id).cloned())
    }

    async fn bookings_for_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Vec<BookingSummary>, AppError> {
        let state = self.lock();
        let mut summaries: Vec<BookingSummary> = state
            .bookings
            .values()
            .filter(|b| b.customer_id == customer_id)
            .map(|b| {
                let event = &state.events[&b.event_id];
                let ticket_type = &state.ticket_types[&b.ticket_type_id];
                BookingSummary {
                    id: b.id,
                    event_id: b.event_id,
                    event_title: event.title.clone(),
                    event_starts_at: event.starts_at,
                    ticket_type_id: b.ticket_type_id,
                    ticket_type_name: ticket_type.name.clone(),
                    quantity: b.quantity,
                    subtotal: b.subtotal,
                    discount_amount: b.discount_amount,
                    final_amount: b.final_amount,
                    status: b.status,
                    created_at: b.created_at,
                }
            })
            .collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }

    async fn cancel_booking(
        &self,
        booking_id: Uuid,
        customer_id: Uuid,
    ) -> Result<Booking, AppError> {
        let mut state = self.lock();

        let booking = state
            .bookings
            .get(&booking_id)
            .filter(|b| b.customer_id == customer_id)
            .cloned()
            .ok_or_else(booking_not_found)?;
        let next = booking.status.transition_to(BookingStatus::Cancelled)?;

        state.tickets.retain(|t| t.booking_id != booking.id);
        if let Some(ticket_type) = state.ticket_types.get_mut(&booking.ticket_type_id) {
            ticket_type.remaining_seats += booking.quantity;
        }

        let cancelled = Booking {
            status: next,
            ..booking
        };
        state.bookings.insert(cancelled.id, cancelled.clone());
        Ok(cancelled)
    }

    async fn confirm_booking(
        &self,
        booking_id: Uuid,
        customer_id: Uuid,
        payment: NewPayment,
        tickets: Vec<NewTicket>,
    ) -> Result<ConfirmedBooking, AppError> {
        let mut state = self.lock();

        let booking = state
            .bookings
            .get(&booking_id)
            .filter(|b| b.customer_id == customer_id)
            .cloned()
            .ok_or_else(booking_not_found)?;
        booking.ensure_payable(payment.amount)?;
        let issued = state.insert_tickets(tickets)?;

        let recorded = Payment {
            id: Uuid::new_v4(),
            booking_id: booking.id,
            amount: payment.amount,
            method: payment.method,
            status: PaymentStatus::Completed,
            reference: payment.reference,
            paid_at: Utc::now(),
        };
        state.payments.insert(booking.id, recorded.clone());

        let confirmed = Booking {
            status: BookingStatus::Confirmed,
            ..booking
        };
        state.bookings.insert(confirmed.id, confirmed.clone());
        Ok(ConfirmedBooking {
            booking: confirmed,
            payment: recorded,
            tickets: issued,
        })
    }

    async fn tickets_for_booking(&self, booking_id: Uuid) -> Result<Vec<Ticket>, AppError> {
        let mut tickets: Vec<Ticket> = self
            .lock()
            .tickets
            .iter()
            .filter(|t| t.booking_id == booking_id)
            .cloned()
            .collect();
        tickets.sort_by_key(|t| t.sequence);
        Ok(tickets)
    }

    async fn insert_tickets(&self, tickets: Vec<NewTicket>) -> Result<Vec<Ticket>, AppError> {
        self.lock().insert_tickets(tickets)
    }
}
