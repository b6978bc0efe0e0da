use sqlx::PgPool;
use uuid::Uuid;

use crate::models::account::{AccountFilter, CustomerAccount, OrganizerAccount};
use crate::models::customer::{Customer, CustomerInput};
use crate::models::organizer::{Organizer, OrganizerInput};
use crate::utils::error::AppError;
use crate::utils::pagination::{Paged, DEFAULT_PAGE_SIZE};

#[derive(Clone, Debug)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Customer>, AppError> {
        let customer = sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(customer)
    }

    pub async fn require(&self, user_id: Uuid) -> Result<Customer, AppError> {
        self.find_by_user(user_id).await?.ok_or_else(|| {
            AppError::NotFound("Customer profile not found; create one first".to_string())
        })
    }

    /// Creates the caller's profile or updates it in place.
    pub async fn upsert(&self, user_id: Uuid, input: CustomerInput) -> Result<Customer, AppError> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (id, user_id, full_name, phone)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE
            SET full_name = EXCLUDED.full_name,
                phone = EXCLUDED.phone,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&input.full_name)
        .bind(&input.phone)
        .fetch_one(&self.pool)
        .await?;
        Ok(customer)
    }

    /// Every customer with their booking count, ordered by name.
    pub async fn list_accounts(
        &self,
        filter: &AccountFilter,
    ) -> Result<Paged<CustomerAccount>, AppError> {
        let page = filter.page_params().resolve(DEFAULT_PAGE_SIZE)?;
        let search = filter.search_pattern();

        let total_items = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM customers c
            WHERE ($1::text IS NULL OR c.full_name ILIKE $1 OR c.phone ILIKE $1)
            "#,
        )
        .bind(&search)
        .fetch_one(&self.pool)
        .await?;

        let items = sqlx::query_as::<_, CustomerAccount>(
            r#"
            SELECT c.id, c.user_id, c.full_name, c.phone, c.created_at,
                   (SELECT COUNT(*) FROM bookings b WHERE b.customer_id = c.id) AS bookings_count
            FROM customers c
            WHERE ($1::text IS NULL OR c.full_name ILIKE $1 OR c.phone ILIKE $1)
            ORDER BY c.full_name, c.id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&search)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Paged::new(items, page, total_items))
    }

    /// Removes a customer profile. Customers with bookings are kept.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from_constraint(e, "Customer has bookings and cannot be deleted"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Customer not found".to_string()));
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct OrganizerRepository {
    pool: PgPool,
}

impl OrganizerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Organizer>, AppError> {
        let organizer =
            sqlx::query_as::<_, Organizer>("SELECT * FROM organizers WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(organizer)
    }

    pub async fn require(&self, user_id: Uuid) -> Result<Organizer, AppError> {
        self.find_by_user(user_id).await?.ok_or_else(|| {
            AppError::NotFound("Organizer profile not found; create one first".to_string())
        })
    }

    pub async fn upsert(&self, user_id: Uuid, input: OrganizerInput) -> Result<Organizer, AppError> {
        let organizer = sqlx::query_as::<_, Organizer>(
            r#"
            INSERT INTO organizers (id, user_id, name, address, phone, email)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id) DO UPDATE
            SET name = EXCLUDED.name,
                address = EXCLUDED.address,
                phone = EXCLUDED.phone,
                email = EXCLUDED.email,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&input.name)
        .bind(&input.address)
        .bind(&input.phone)
        .bind(&input.email)
        .fetch_one(&self.pool)
        .await?;
        Ok(organizer)
    }

    /// Every organizer with the number of events they host, ordered by name.
    pub async fn list_accounts(
        &self,
        filter: &AccountFilter,
    ) -> Result<Paged<OrganizerAccount>, AppError> {
        let page = filter.page_params().resolve(DEFAULT_PAGE_SIZE)?;
        let search = filter.search_pattern();

        let total_items = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM organizers o {}",
            ORGANIZER_SEARCH
        ))
        .bind(&search)
        .fetch_one(&self.pool)
        .await?;

        let items = sqlx::query_as::<_, OrganizerAccount>(&format!(
            r#"
            SELECT o.id, o.user_id, o.name, o.address, o.phone, o.email, o.created_at,
                   (SELECT COUNT(*) FROM events e WHERE e.organizer_id = o.id) AS hosted_events_count
            FROM organizers o
            {}
            ORDER BY o.name, o.id
            LIMIT $2 OFFSET $3
            "#,
            ORGANIZER_SEARCH
        ))
        .bind(&search)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Paged::new(items, page, total_items))
    }

    /// Removes an organizer profile. Organizers still hosting events are kept.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM organizers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from_constraint(e, "Organizer hosts events and cannot be deleted"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Organizer not found".to_string()));
        }
        Ok(())
    }
}

const ORGANIZER_SEARCH: &str = r#"
    WHERE ($1::text IS NULL
        OR o.name ILIKE $1 OR o.email ILIKE $1 OR o.address ILIKE $1 OR o.phone ILIKE $1)
"#;
