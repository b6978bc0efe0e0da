use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::error::AppError;
use crate::utils::validation::Validator;

/// A percentage discount scoped to exactly one event and ticket type.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Promotion {
    pub id: Uuid,
    pub event_id: Uuid,
    pub ticket_type_id: Uuid,
    pub name: String,
    pub code: String,
    pub discount_percentage: Decimal,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub is_active: bool,
}

impl Promotion {
    /// Active and inside its window; both ends are inclusive.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.starts_at <= now && now <= self.ends_at
    }
}

/// How a booking request names its promotion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromotionSelector {
    Id(Uuid),
    Code(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct PromotionInput {
    pub event_id: Uuid,
    pub ticket_type_id: Uuid,
    pub name: String,
    pub code: String,
    pub discount_percentage: Decimal,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl PromotionInput {
    pub fn validate(self) -> Result<Self, AppError> {
        let input = Self {
            name: self.name.trim().to_string(),
            code: self.code.trim().to_string(),
            ..self
        };

        Validator::new()
            .required("name", &input.name, 100)
            .required("code", &input.code, 20)
            .check(
                input.discount_percentage >= Decimal::ZERO
                    && input.discount_percentage <= Decimal::ONE_HUNDRED,
                "discount_percentage",
                "must be between 0 and 100",
            )
            .check(
                input.starts_at <= input.ends_at,
                "ends_at",
                "must not be before starts_at",
            )
            .finish()?;
        Ok(input)
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PromotionFilter {
    pub event_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn input(pct: i64, days: i64) -> PromotionInput {
        let now = Utc::now();
        PromotionInput {
            event_id: Uuid::new_v4(),
            ticket_type_id: Uuid::new_v4(),
            name: "Early bird".to_string(),
            code: " EARLY ".to_string(),
            discount_percentage: Decimal::from(pct),
            starts_at: now,
            ends_at: now + Duration::days(days),
            is_active: true,
        }
    }

    #[test]
    fn test_accepts_bounds_and_trims_code() {
        assert_eq!(input(0, 0).validate().unwrap().code, "EARLY");
        assert!(input(100, 7).validate().is_ok());
    }

    #[test]
    fn test_rejects_percentage_and_window() {
        assert!(input(101, 7).validate().is_err());
        assert!(input(-1, 7).validate().is_err());
        assert!(input(10, -1).validate().is_err());
    }

    #[test]
    fn test_window_is_inclusive() {
        let promo = input(10, 1).validate().unwrap();
        let promotion = Promotion {
            id: Uuid::new_v4(),
            event_id: promo.event_id,
            ticket_type_id: promo.ticket_type_id,
            name: promo.name,
            code: promo.code,
            discount_percentage: promo.discount_percentage,
            starts_at: promo.starts_at,
            ends_at: promo.ends_at,
            is_active: true,
        };
        assert!(promotion.is_valid_at(promotion.starts_at));
        assert!(promotion.is_valid_at(promotion.ends_at));
        assert!(!promotion.is_valid_at(promotion.ends_at + Duration::microseconds(1)));
    }
}
