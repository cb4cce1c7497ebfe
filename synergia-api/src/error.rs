use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use synergia_core::StoreError;

use crate::response::Envelope;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{message}")]
    BadRequest { message: String, detail: Option<String> },
    #[error("{0}")]
    NotFound(String),
    #[error("{message}: {source}")]
    Storage {
        message: &'static str,
        #[source]
        source: StoreError,
    },
    #[error("{message}: {detail}")]
    Internal { message: &'static str, detail: String },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into(), detail: None }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Adapter for `map_err` that tags a store failure with the
    /// operation's error message.
    pub fn storage(message: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Storage { message, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest { message, detail } => {
                (StatusCode::BAD_REQUEST, Envelope::failure(message, detail))
            }
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, Envelope::failure(message, None)),
            ApiError::Storage { message, source } => {
                tracing::error!("{}: {}", message, source);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Envelope::failure(message, Some(source.to_string())),
                )
            }
            ApiError::Internal { message, detail } => {
                tracing::error!("{}: {}", message, detail);
                (StatusCode::INTERNAL_SERVER_ERROR, Envelope::failure(message, Some(detail)))
            }
        };

        (status, Json(body)).into_response()
    }
}
