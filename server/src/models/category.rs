use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::error::AppError;
use crate::utils::validation::{non_blank, Validator};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    pub description: Option<String>,
}

impl CategoryInput {
    pub fn validate(self) -> Result<Self, AppError> {
        let input = Self {
            name: self.name.trim().to_string(),
            description: non_blank(self.description),
        };

        Validator::new()
            .required("name", &input.name, 100)
            .optional("description", input.description.as_deref(), 500)
            .finish()?;
        Ok(input)
    }
}
