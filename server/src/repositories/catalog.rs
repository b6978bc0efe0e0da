use sqlx::PgPool;
use uuid::Uuid;

use crate::models::category::{Category, CategoryInput};
use crate::models::event::search_pattern;
use crate::models::venue::{Venue, VenueInput};
use crate::utils::error::AppError;

#[derive(Clone, Debug)]
pub struct VenueRepository {
    pool: PgPool,
}

impl VenueRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Venues ordered by name, optionally matching `search` in name or city.
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Venue>, AppError> {
        let venues = sqlx::query_as::<_, Venue>(
            r#"
            SELECT * FROM venues
            WHERE ($1::text IS NULL OR name ILIKE $1 OR city ILIKE $1)
            ORDER BY name
            "#,
        )
        .bind(search_pattern(search))
        .fetch_all(&self.pool)
        .await?;
        Ok(venues)
    }

    pub async fn create(&self, input: VenueInput) -> Result<Venue, AppError> {
        let venue = sqlx::query_as::<_, Venue>(
            "INSERT INTO venues (id, name, address, city) VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(&input.address)
        .bind(&input.city)
        .fetch_one(&self.pool)
        .await?;
        Ok(venue)
    }

    pub async fn update(&self, id: Uuid, input: VenueInput) -> Result<Venue, AppError> {
        sqlx::query_as::<_, Venue>(
            "UPDATE venues SET name = $2, address = $3, city = $4 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.address)
        .bind(&input.city)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(venue_not_found)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM venues WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from_constraint(e, "Venue is used by existing events"))?;

        if result.rows_affected() == 0 {
            return Err(venue_not_found());
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(categories)
    }

    pub async fn create(&self, input: CategoryInput) -> Result<Category, AppError> {
        sqlx::query_as::<_, Category>(
            "INSERT INTO categories (id, name, description) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(&input.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_constraint(e, "A category with this name already exists"))
    }

    pub async fn update(&self, id: Uuid, input: CategoryInput) -> Result<Category, AppError> {
        sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = $2, description = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_constraint(e, "A category with this name already exists"))?
        .ok_or_else(category_not_found)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from_constraint(e, "Category is used by existing events"))?;

        if result.rows_affected() == 0 {
            return Err(category_not_found());
        }
        Ok(())
    }
}

fn venue_not_found() -> AppError {
    AppError::NotFound("Venue not found".to_string())
}

fn category_not_found() -> AppError {
    AppError::NotFound("Category not found".to_string())
}
