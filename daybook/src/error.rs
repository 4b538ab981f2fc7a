//! Error types for Daybook
//!
//! All errors use thiserror for structured error handling.
//! These errors serialize to their display string so a front end can show
//! them in an alert as-is.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    #[error("Tag not found: {0}")]
    TagNotFound(String),

    #[error("A tag named '{0}' already exists")]
    DuplicateTag(String),

    #[error("Media attachment not found: {0}")]
    MediaNotFound(String),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Invalid PIN: {0}")]
    InvalidPin(String),

    #[error("Mood must be between 1 and 5, got {0}")]
    InvalidMood(i64),

    #[error("Invalid reminder: {0}")]
    InvalidReminder(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Secure storage error: {0}")]
    SecureStore(String),

    #[error("Scheduler error: {0}")]
    Scheduler(String),

    #[error("Blob store error: {0}")]
    BlobStore(String),

    #[error("{0}")]
    Generic(String),
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_to_display_string() {
        let json = serde_json::to_string(&AppError::InvalidMood(7)).unwrap();
        assert_eq!(json, "\"Mood must be between 1 and 5, got 7\"");

        let json = serde_json::to_string(&AppError::Generic("boom".to_string())).unwrap();
        assert_eq!(json, "\"boom\"");
    }
}
