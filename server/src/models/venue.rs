use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::error::AppError;
use crate::utils::validation::{non_blank, Validator};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Venue {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VenueInput {
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
}

impl VenueInput {
    pub fn validate(self) -> Result<Self, AppError> {
        let input = Self {
            name: self.name.trim().to_string(),
            address: non_blank(self.address),
            city: non_blank(self.city),
        };

        Validator::new()
            .required("name", &input.name, 200)
            .optional("address", input.address.as_deref(), 500)
            .optional("city", input.city.as_deref(), 100)
            .finish()?;
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_optionals_become_none() {
        let input = VenueInput {
            name: " Harpa ".to_string(),
            address: Some("  ".to_string()),
            city: Some("Reykjavik".to_string()),
        }
        .validate()
        .unwrap();

        assert_eq!(input.name, "Harpa");
        assert_eq!(input.address, None);
        assert_eq!(input.city.as_deref(), Some("Reykjavik"));
    }

    #[test]
    fn test_name_is_required() {
        let err = VenueInput {
            name: String::new(),
            address: None,
            city: None,
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidFields(_)));
    }
}
