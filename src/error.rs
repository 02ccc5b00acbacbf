use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::error;

/// The plain success envelope every endpoint speaks.
#[derive(Debug, Serialize)]
pub struct ApiMessage {
    pub message: String,
    pub status_code: u16,
}

impl ApiMessage {
    pub fn new(message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            message: message.into(),
            status_code: status.as_u16(),
        }
    }
}

/// Domain error taxonomy. Every variant renders as the structured
/// `{"message": ..., "status_code": ...}` body the API speaks everywhere.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Product not found")]
    ProductNotFound,

    #[error("Product is not in the cart")]
    NotInCart,

    #[error("Cart is empty")]
    EmptyCart,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ProductNotFound | ApiError::NotInCart => StatusCode::NOT_FOUND,
            ApiError::EmptyCart | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Internal(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        let body = json!({
            "message": self.to_string(),
            "status_code": status.as_u16(),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_taxonomy() {
        assert_eq!(ApiError::ProductNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::NotInCart.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::EmptyCart.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Validation("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized("no token".into()).status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn messages_are_stable() {
        assert_eq!(ApiError::ProductNotFound.to_string(), "Product not found");
        assert_eq!(
            ApiError::NotInCart.to_string(),
            "Product is not in the cart"
        );
        assert_eq!(ApiError::EmptyCart.to_string(), "Cart is empty");
    }
}
