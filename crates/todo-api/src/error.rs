use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::{FieldError, ValidationErrors};
use infrastructure::StoreError;
use serde::Serialize;
use thiserror::Error;

pub const NOT_FOUND_MESSAGE: &str = "Todo not found";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("Invalid JSON: {0}")]
    MalformedBody(String),

    #[error("Not found")]
    NotFound,

    /// ストア障害。`action` はレスポンスの message にそのまま使う
    #[error("{action}: {detail}")]
    Store { action: &'static str, detail: String },
}

impl ApiError {
    /// StoreError を変換するクロージャを返す（NotFound は 404 に、それ以外は 500 に）
    pub fn store(action: &'static str) -> impl FnOnce(StoreError) -> ApiError {
        move |e| match e {
            StoreError::NotFound(id) => {
                tracing::debug!(todo_id = %id, "Todo not found");
                ApiError::NotFound
            }
            other => {
                tracing::error!(error = %other, "{action}");
                ApiError::Store {
                    action,
                    detail: other.to_string(),
                }
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct MessageBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            ApiError::MalformedBody(message) => {
                let errors = ValidationErrors {
                    errors: vec![FieldError::body(message)],
                };
                (StatusCode::BAD_REQUEST, Json(errors)).into_response()
            }
            ApiError::NotFound => {
                let body = MessageBody {
                    message: NOT_FOUND_MESSAGE,
                    error: None,
                };
                (StatusCode::NOT_FOUND, Json(body)).into_response()
            }
            ApiError::Store { action, detail } => {
                let body = MessageBody {
                    message: action,
                    error: Some(detail),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody(rejection.body_text())
    }
}
