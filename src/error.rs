//!
//! # Custom Error Handling
//!
//! This module defines the error type `AppError` shared by the handlers, the
//! guard middleware and the storage backends.
//!
//! `AppError` implements `actix_web::error::ResponseError` so a handler can return
//! `Result<_, AppError>` and let Actix Web render the status code and JSON body.
//! `From` implementations for `sqlx::Error`, `validator::ValidationErrors`,
//! `serde_json::Error`, `jsonwebtoken::errors::Error` and `bcrypt::BcryptError` allow the `?` operator
//! to be used throughout.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Authentication failed or is required but missing (HTTP 401).
    Unauthorized(String),
    /// The request was understood but its content is invalid (HTTP 400).
    /// Due-date validation failures end up here.
    BadRequest(String),
    /// No record exists for the requested identifier (HTTP 404, empty body).
    NotFound,
    /// An unexpected server-side error (HTTP 500).
    InternalServerError(String),
    /// A failure reported by the persistence layer (HTTP 500).
    /// The detail is logged but not sent to the client.
    DatabaseError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound => write!(f, "Not Found"),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized(msg) => HttpResponse::Unauthorized().json(json!({
                "error": msg
            })),
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            AppError::NotFound => HttpResponse::NotFound().finish(),
            AppError::InternalServerError(msg) => HttpResponse::InternalServerError().json(json!({
                "error": msg
            })),
            AppError::DatabaseError(msg) => {
                log::error!("database error: {}", msg);
                HttpResponse::InternalServerError().json(json!({
                    "error": "Database error"
                }))
            }
        }
    }
}

/// `RowNotFound` becomes `NotFound`; everything else is a `DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound,
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(error: sqlx::migrate::MigrateError) -> AppError {
        AppError::DatabaseError(error.to_string())
    }
}

/// Validation failures are client errors. The human-readable messages attached to
/// each `ValidationError` are joined into the response; the field/code rendering of
/// `ValidationErrors` is used only when no message was attached.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        let mut messages: Vec<String> = errors
            .field_errors()
            .values()
            .flat_map(|field| field.iter())
            .filter_map(|error| error.message.as_ref().map(|m| m.to_string()))
            .collect();
        messages.sort();

        if messages.is_empty() {
            AppError::BadRequest(errors.to_string())
        } else {
            AppError::BadRequest(messages.join("; "))
        }
    }
}

/// Bodies decoded by hand read the same as the `web::Json` extractor's errors.
impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> AppError {
        AppError::BadRequest(format!("Json deserialize error: {}", error))
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(format!("Invalid token: {:?}", error.kind()))
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}
