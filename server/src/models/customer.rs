use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::error::AppError;
use crate::utils::validation::{non_blank, Validator};

/// Customer profile, one per gateway identity.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomerInput {
    pub full_name: String,
    pub phone: Option<String>,
}

impl CustomerInput {
    pub fn validate(self) -> Result<Self, AppError> {
        let input = Self {
            full_name: self.full_name.trim().to_string(),
            phone: non_blank(self.phone),
        };

        Validator::new()
            .required("full_name", &input.full_name, 100)
            .optional("phone", input.phone.as_deref(), 20)
            .finish()?;
        Ok(input)
    }
}
