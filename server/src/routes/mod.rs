use axum::middleware::from_fn;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::{require_identity, require_permission, Permission};
use crate::config::{create_cors_layer, create_security_headers_layer, Config};
use crate::handlers::{admin, bookings, catalog, customers, health_check, organizer};
use crate::state::AppState;

pub fn create_routes(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(public_routes())
        .merge(customer_routes())
        .merge(organizer_routes())
        .merge(admin_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer(config.production))
        .layer(create_cors_layer(&config.cors_allowed_origins))
}

/// Routes behind the gateway identity plus a single permission.
fn guarded(router: Router<AppState>, permission: Permission) -> Router<AppState> {
    router
        .route_layer(from_fn(require_permission(permission)))
        .route_layer(from_fn(require_identity))
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/events", get(catalog::list_events))
        .route("/api/events/:id", get(catalog::get_event))
        .route("/api/events/:id/promotions", get(catalog::list_event_promotions))
        .route("/api/venues", get(catalog::list_venues))
        .route("/api/categories", get(catalog::list_categories))
}

fn customer_routes() -> Router<AppState> {
    let routes = Router::new()
        .route(
            "/api/customers/me",
            get(customers::get_profile).put(customers::upsert_profile),
        )
        .route("/api/customers/me/dashboard", get(customers::dashboard))
        .route(
            "/api/bookings",
            post(bookings::create_booking).get(bookings::list_bookings),
        )
        .route("/api/bookings/:id", get(bookings::get_booking))
        .route("/api/bookings/:id/cancel", post(bookings::cancel_booking))
        .route("/api/bookings/:id/payment", post(bookings::pay_booking))
        .route("/api/bookings/:id/tickets", get(bookings::list_tickets));

    guarded(routes, Permission::BookTickets)
}

fn organizer_routes() -> Router<AppState> {
    let routes = Router::new()
        .route(
            "/api/organizers/me",
            get(organizer::get_profile).put(organizer::upsert_profile),
        )
        .route("/api/organizer/dashboard", get(organizer::dashboard))
        .route(
            "/api/organizer/events",
            get(organizer::list_events).post(organizer::create_event),
        )
        .route(
            "/api/organizer/events/:id",
            put(organizer::update_event).delete(organizer::delete_event),
        )
        .route(
            "/api/organizer/events/:id/status",
            put(organizer::set_event_status),
        )
        .route(
            "/api/organizer/events/:id/ticket-types",
            post(organizer::add_ticket_type),
        )
        .route(
            "/api/organizer/ticket-types/:id",
            put(organizer::update_ticket_type).delete(organizer::delete_ticket_type),
        )
        .route(
            "/api/organizer/promotions",
            get(organizer::list_promotions).post(organizer::create_promotion),
        )
        .route(
            "/api/organizer/promotions/:id",
            put(organizer::update_promotion).delete(organizer::delete_promotion),
        );

    guarded(routes, Permission::ManageEvents)
}

fn admin_routes() -> Router<AppState> {
    let venues = Router::new()
        .route("/api/admin/venues", post(admin::create_venue))
        .route(
            "/api/admin/venues/:id",
            put(admin::update_venue).delete(admin::delete_venue),
        );

    let categories = Router::new()
        .route("/api/admin/categories", post(admin::create_category))
        .route(
            "/api/admin/categories/:id",
            put(admin::update_category).delete(admin::delete_category),
        );

    let events = Router::new()
        .route("/api/admin/events", get(admin::list_events))
        .route("/api/admin/events/:id", delete(admin::delete_event));

    let users = Router::new()
        .route("/api/admin/customers", get(admin::list_customers))
        .route("/api/admin/customers/:id", delete(admin::delete_customer))
        .route("/api/admin/organizers", get(admin::list_organizers))
        .route("/api/admin/organizers/:id", delete(admin::delete_organizer));

    Router::new()
        .merge(guarded(venues, Permission::ManageVenues))
        .merge(guarded(categories, Permission::ManageCategories))
        .merge(guarded(events, Permission::ModerateEvents))
        .merge(guarded(users, Permission::ManageUsers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use rust_decimal::Decimal;
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::auth::identity::{USER_ID_HEADER, USER_ROLES_HEADER};
    use crate::models::event::EventStatus;
    use crate::services::QrSvgRenderer;
    use crate::store::memory::MemoryBookingStore;

    /// Router over the in-memory booking store. The pool is lazy and only
    /// touched by catalog routes, which these tests avoid.
    fn app(store: Arc<MemoryBookingStore>) -> Router {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/ticketbooth_test")
            .unwrap();
        let config = Config::from_env();
        create_routes(
            AppState::with_store(pool, store, Arc::new(QrSvgRenderer)),
            &config,
        )
    }

    fn request(method: &str, uri: &str, user: Option<(Uuid, &str)>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some((user_id, roles)) = user {
            builder = builder
                .header(USER_ID_HEADER, user_id.to_string())
                .header(USER_ROLES_HEADER, roles);
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = app(Arc::default())
            .oneshot(request("GET", "/health", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["service"], "ticketbooth-api");
    }

    #[tokio::test]
    async fn test_missing_identity_is_unauthorized() {
        let response = app(Arc::default())
            .oneshot(request("GET", "/api/bookings", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "AUTH_ERROR");
    }

    #[tokio::test]
    async fn test_wrong_role_is_forbidden() {
        let cases = [
            ("GET", "/api/bookings", "organizer"),
            ("GET", "/api/organizer/events", "customer"),
            ("GET", "/api/admin/events", "organizer"),
            ("DELETE", "/api/admin/venues/00000000-0000-0000-0000-000000000001", "customer"),
            ("GET", "/api/admin/customers", "organizer"),
            ("DELETE", "/api/admin/organizers/00000000-0000-0000-0000-000000000001", "customer"),
        ];

        for (method, uri, role) in cases {
            let response = app(Arc::default())
                .oneshot(request(method, uri, Some((Uuid::new_v4(), role)), None))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::FORBIDDEN, "{} {}", method, uri);
        }
    }

    #[tokio::test]
    async fn test_account_listing_rejects_unreachable_page() {
        for uri in [
            "/api/admin/customers?page=9223372036854775807",
            "/api/admin/organizers?page=0",
        ] {
            let response = app(Arc::default())
                .oneshot(request("GET", uri, Some((Uuid::new_v4(), "admin")), None))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
        }
    }

    #[tokio::test]
    async fn test_booking_requires_customer_profile() {
        let response = app(Arc::default())
            .oneshot(request(
                "GET",
                "/api/bookings",
                Some((Uuid::new_v4(), "customer")),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_body_uses_error_envelope() {
        let response = app(Arc::default())
            .oneshot(request(
                "POST",
                "/api/bookings",
                Some((Uuid::new_v4(), "customer")),
                Some(json!({ "quantity": "three" })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_book_pay_and_collect_tickets() {
        let store = Arc::new(MemoryBookingStore::default());
        let user_id = Uuid::new_v4();
        store.add_customer(user_id);
        let event = store.add_event(EventStatus::Active);
        let ticket_type =
            store.add_ticket_type(event.id, Decimal::from_str("20.00").unwrap(), 5);
        let customer = Some((user_id, "customer"));

        let response = app(store.clone())
            .oneshot(request(
                "POST",
                "/api/bookings",
                customer,
                Some(json!({
                    "event_id": event.id,
                    "ticket_type_id": ticket_type.id,
                    "quantity": 3,
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let booking = body_json(response).await["data"].clone();
        assert_eq!(booking["status"], "pending");
        assert_eq!(booking["final_amount"], "60.00");
        let booking_id = booking["id"].as_str().unwrap().to_string();

        let response = app(store.clone())
            .oneshot(request(
                "POST",
                &format!("/api/bookings/{}/payment", booking_id),
                customer,
                Some(json!({ "method": "card", "amount": "59.00" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["error"]["code"], "AMOUNT_MISMATCH");

        let response = app(store.clone())
            .oneshot(request(
                "POST",
                &format!("/api/bookings/{}/payment", booking_id),
                customer,
                Some(json!({ "method": "card", "amount": "60" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let receipt = body_json(response).await["data"].clone();
        assert_eq!(receipt["booking"]["status"], "confirmed");
        assert_eq!(receipt["tickets"].as_array().unwrap().len(), 3);

        let response = app(store.clone())
            .oneshot(request(
                "GET",
                &format!("/api/bookings/{}/tickets", booking_id),
                customer,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let tickets = body_json(response).await["data"].clone();
        assert_eq!(tickets[0]["code"], format!("{}-1", booking_id));
        assert_eq!(store.remaining_seats(ticket_type.id), 2);
    }

    #[tokio::test]
    async fn test_overbooking_maps_to_conflict() {
        let store = Arc::new(MemoryBookingStore::default());
        let user_id = Uuid::new_v4();
        store.add_customer(user_id);
        let event = store.add_event(EventStatus::Active);
        let ticket_type = store.add_ticket_type(event.id, Decimal::from(20), 5);

        let response = app(store.clone())
            .oneshot(request(
                "POST",
                "/api/bookings",
                Some((user_id, "Customer")),
                Some(json!({
                    "event_id": event.id,
                    "ticket_type_id": ticket_type.id,
                    "quantity": 6,
                })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "INSUFFICIENT_SEATS");
        assert_eq!(body["error"]["details"]["remaining"], 5);
        assert_eq!(store.remaining_seats(ticket_type.id), 5);
    }
}
