// errors.rs
use std::fmt;

/// Errors originating from routing, the submission pipeline, or
/// downstream layers (DB, geocoding, object storage).
#[derive(Debug)]
pub enum ServerError {
    NotFound,
    Unauthorized(String),
    BadRequest(String),
    /// User-facing form rejection (price ordering, image count,
    /// unresolvable address). Surfaced as a flash message, never a 500.
    Validation(String),
    Geocode(String),
    Upload(String),
    DbError(String),
    InternalError,
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::NotFound => write!(f, "Not Found"),
            ServerError::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            ServerError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            ServerError::Validation(msg) => write!(f, "{msg}"),
            ServerError::Geocode(msg) => write!(f, "Geocoding error: {msg}"),
            ServerError::Upload(msg) => write!(f, "Upload error: {msg}"),
            ServerError::DbError(msg) => write!(f, "Database Error: {msg}"),
            ServerError::InternalError => write!(f, "Internal Server Error"),
        }
    }
}

impl std::error::Error for ServerError {}
