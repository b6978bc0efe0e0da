use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::error::AppError;
use crate::utils::validation::Validator;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Organizer {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrganizerInput {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

impl OrganizerInput {
    pub fn validate(self) -> Result<Self, AppError> {
        let input = Self {
            name: self.name.trim().to_string(),
            address: self.address.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
        };

        Validator::new()
            .required("name", &input.name, 100)
            .required("address", &input.address, 255)
            .required("phone", &input.phone, 20)
            .required("email", &input.email, 256)
            .check(
                input.email.is_empty() || looks_like_email(&input.email),
                "email",
                "must be a valid email address",
            )
            .finish()?;
        Ok(input)
    }
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}
