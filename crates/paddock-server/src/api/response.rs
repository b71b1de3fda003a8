//! API response types
//!
//! Success bodies are `{ "success": true, "data": ..., "meta": ... }` and
//! error bodies `{ "success": false, "error": { "code", "message" } }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::features::shared::pagination::Paginated;

/// Standard success response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new success response
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
            meta: None,
        }
    }

    /// Create a success response with metadata
    pub fn success_with_meta(data: T, meta: serde_json::Value) -> Self {
        Self {
            success: true,
            data,
            meta: Some(meta),
        }
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// List page as `data`, pagination under `meta.pagination`
    pub fn paginated(page: Paginated<T>) -> Self {
        Self::success_with_meta(
            page.items,
            serde_json::json!({ "pagination": page.pagination }),
        )
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Standard error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::features::shared::pagination::{PaginationMetadata, PaginationParams};

    #[test]
    fn test_success_envelope_omits_empty_meta() {
        let json = serde_json::to_value(ApiResponse::success(42)).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "data": 42 }));
    }

    #[test]
    fn test_paginated_envelope() {
        let params = PaginationParams::new(Some(1), Some(2));
        let page = Paginated::new(vec!["a", "b"], PaginationMetadata::from_params(&params, 5));

        let json = serde_json::to_value(ApiResponse::paginated(page)).unwrap();
        assert_eq!(json["data"], serde_json::json!(["a", "b"]));
        assert_eq!(json["meta"]["pagination"]["total"], 5);
        assert_eq!(json["meta"]["pagination"]["pages"], 3);
    }

    #[test]
    fn test_error_envelope() {
        let json = serde_json::to_value(ErrorResponse::new("NOT_FOUND", "Rider 7 not found"))
            .unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": false,
                "error": { "code": "NOT_FOUND", "message": "Rider 7 not found" }
            })
        );
    }
}
