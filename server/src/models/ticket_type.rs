use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::error::AppError;
use crate::utils::validation::Validator;

/// A priced admission tier. The only owner of seat inventory:
/// `0 <= remaining_seats <= total_seats` always holds.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TicketType {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub total_seats: i32,
    pub remaining_seats: i32,
}

impl TicketType {
    pub fn seats_sold(&self) -> i32 {
        self.total_seats - self.remaining_seats
    }

    /// Remaining seats after the allocation changes to `new_total`.
    /// Seats already sold stay sold, so the allocation may not drop below them.
    pub fn reallocate(&self, new_total: i32) -> Result<i32, AppError> {
        let sold = self.seats_sold();
        if new_total < sold {
            return Err(AppError::Conflict(format!(
                "Cannot reduce total seats below already sold tickets ({})",
                sold
            )));
        }
        Ok(new_total - sold)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TicketTypeInput {
    pub name: String,
    pub price: Decimal,
    pub total_seats: i32,
}

impl TicketTypeInput {
    pub fn validate(self) -> Result<Self, AppError> {
        let input = Self {
            name: self.name.trim().to_string(),
            ..self
        };

        Validator::new()
            .required("name", &input.name, 100)
            .check(!input.price.is_sign_negative(), "price", "must not be negative")
            .check(input.total_seats >= 0, "total_seats", "must not be negative")
            .finish()?;
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vip(total: i32, remaining: i32) -> TicketType {
        TicketType {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            name: "VIP".to_string(),
            price: Decimal::new(2000, 2),
            total_seats: total,
            remaining_seats: remaining,
        }
    }

    #[test]
    fn test_reallocate_shifts_remaining_by_delta() {
        let tt = vip(10, 4);
        assert_eq!(tt.seats_sold(), 6);
        assert_eq!(tt.reallocate(15).unwrap(), 9);
        assert_eq!(tt.reallocate(6).unwrap(), 0);
    }

    #[test]
    fn test_reallocate_below_sold_is_rejected() {
        let tt = vip(10, 4);
        assert!(matches!(tt.reallocate(5), Err(AppError::Conflict(_))));
    }

    #[test]
    fn test_input_rejects_negative_values() {
        let input = TicketTypeInput {
            name: "Balcony".to_string(),
            price: Decimal::new(-1, 2),
            total_seats: -3,
        };
        match input.validate() {
            Err(AppError::InvalidFields(fields)) => assert_eq!(fields.len(), 2),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
