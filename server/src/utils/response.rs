use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

/// `{ "success": true, "data": ..., "message": ... }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

/// `{ "success": false, "error": { "code", "message", "details" } }`
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub error: ApiErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
    pub details: Option<Value>,
}

impl<T: Serialize> ApiResponse<T> {
    fn new(data: Option<T>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
        }
    }

    fn with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

pub fn success<T: Serialize>(data: T, message: impl Into<String>) -> Response {
    ApiResponse::new(Some(data), message).with_status(StatusCode::OK)
}

pub fn created<T: Serialize>(data: T, message: impl Into<String>) -> Response {
    ApiResponse::new(Some(data), message).with_status(StatusCode::CREATED)
}

pub fn empty_success(message: impl Into<String>) -> Response {
    ApiResponse::<()>::new(None, message).with_status(StatusCode::OK)
}

pub fn error(
    code: &str,
    message: impl Into<String>,
    details: Option<Value>,
    status: StatusCode,
) -> Response {
    let body = ApiErrorResponse {
        success: false,
        error: ApiErrorBody {
            code: code.to_owned(),
            message: message.into(),
            details,
        },
    };
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_created_uses_201_and_envelope() {
        let response = created(serde_json::json!({ "id": 1 }), "Venue created");
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["id"], 1);
        assert_eq!(body["message"], "Venue created");
    }

    #[tokio::test]
    async fn test_empty_success_has_null_data() {
        let body = body_json(empty_success("Venue deleted")).await;
        assert_eq!(body["success"], true);
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn test_error_envelope_shape() {
        let response = error(
            "NOT_FOUND",
            "Booking not found",
            None,
            StatusCode::NOT_FOUND,
        );
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(body["error"]["message"], "Booking not found");
        assert!(body["error"]["details"].is_null());
    }
}
