use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A database error.
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    /// A Redis error.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// The document store could not be reached or is not configured.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The client supplied a string that is not a well-formed product identifier.
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// A resource not found error.
    #[error("Resource not found")]
    NotFound,

    /// The request body could not be parsed as the expected shape.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// The request body exceeded the configured limit.
    #[error("Request body too large")]
    PayloadTooLarge,

    /// A stored document is missing a field or has one of the wrong type.
    #[error("Missing data: {0}")]
    MissingData(String),

    /// An authorization error.
    #[error("Authorization required")]
    Unauthorized,

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

impl From<deadpool_postgres::PoolError> for AppError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        AppError::Connection(err.to_string())
    }
}

impl From<deadpool_postgres::CreatePoolError> for AppError {
    fn from(err: deadpool_postgres::CreatePoolError) -> Self {
        AppError::Connection(err.to_string())
    }
}

impl AppError {
    /// The status code this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::MalformedInput(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Database(_)
            | AppError::Redis(_)
            | AppError::Connection(_)
            | AppError::MissingData(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                "Database error".to_string()
            }

            AppError::Redis(ref e) => {
                tracing::error!("Redis error: {}", e);
                "Session store error".to_string()
            }

            AppError::Connection(ref msg) => {
                tracing::error!("Connection error: {}", msg);
                "Database unavailable".to_string()
            }

            AppError::InvalidIdentifier(ref id) => {
                tracing::debug!("Invalid product id: {:?}", id);
                "Invalid product ID".to_string()
            }

            AppError::NotFound => {
                tracing::debug!("Resource not found");
                "Product not found".to_string()
            }

            AppError::MalformedInput(ref msg) => {
                tracing::warn!("Malformed input: {}", msg);
                "Malformed request body".to_string()
            }

            AppError::PayloadTooLarge => {
                tracing::warn!("Request body over the size limit");
                "Request body too large".to_string()
            }

            AppError::MissingData(ref msg) => {
                tracing::error!("Stored document rejected: {}", msg);
                "Internal server error".to_string()
            }

            AppError::Unauthorized => {
                tracing::warn!("Unauthenticated request rejected");
                "Authentication required".to_string()
            }

            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
        };

        let body = sonic_rs::to_string(&sonic_rs::json!({
            "message": message
        }))
        .unwrap_or_else(|_| r#"{"message":"Internal server error"}"#.to_string());

        (
            self.status_code(),
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}
