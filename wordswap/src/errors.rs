use crate::engine::EngineError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Invalid request data or missing required fields
    #[error("{message}")]
    BadRequest { message: String },

    /// Uploaded file exceeds the configured size limit
    #[error("{message}")]
    PayloadTooLarge { message: String },

    /// Upload is neither a PDF nor a CSV
    #[error("unsupported file type{}", detected.as_deref().map(|d| format!(" '{d}'")).unwrap_or_default())]
    UnsupportedFormat { detected: Option<String> },

    /// Document rewrite failure (corrupt input, unrepresentable replacement)
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Error::UnsupportedFormat { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Error::Engine(engine_err) => match engine_err {
                EngineError::Corrupt { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                EngineError::Unrepresentable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                EngineError::Serialize { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable classifier for the JSON error body.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::BadRequest { .. } => "bad_request",
            Error::PayloadTooLarge { .. } => "payload_too_large",
            Error::UnsupportedFormat { .. } => "unsupported_format",
            Error::Engine(EngineError::Corrupt { .. }) => "corrupt_document",
            Error::Engine(EngineError::Unrepresentable { .. }) => "replacement_unrepresentable",
            Error::Engine(EngineError::Serialize { .. }) => "internal",
            Error::Internal { .. } | Error::Other(_) => "internal",
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::BadRequest { message } => message.clone(),
            Error::PayloadTooLarge { message } => message.clone(),
            Error::UnsupportedFormat { detected } => match detected {
                Some(name) => format!("Unsupported file type '{name}'. Upload a PDF or CSV file."),
                None => "Unsupported file type. Upload a PDF or CSV file.".to_string(),
            },
            Error::Engine(engine_err) => match engine_err {
                EngineError::Corrupt { format, .. } => {
                    format!("The uploaded file could not be read as a valid {format} document")
                }
                EngineError::Unrepresentable { message } => {
                    format!("The replacement text cannot be applied to this document: {message}")
                }
                EngineError::Serialize { .. } => "Internal server error".to_string(),
            },
            Error::Internal { .. } | Error::Other(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Engine(EngineError::Serialize { .. }) | Error::Internal { .. } | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Engine(_) | Error::UnsupportedFormat { .. } => {
                tracing::info!("Document rejected: {}", self);
            }
            Error::BadRequest { .. } | Error::PayloadTooLarge { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();
        let body = json!({
            "kind": self.kind(),
            "message": self.user_message(),
        });

        (status, axum::response::Json(body)).into_response()
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;
