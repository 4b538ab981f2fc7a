//! Application configuration constants
//!
//! Central location for all configuration constants, limits and
//! validation boundaries used throughout the application.

use std::time::Duration;

// ===== Storage Layout =====

/// SQLite database file name inside the data directory
pub const DATABASE_FILE_NAME: &str = "diary.db";

/// Directory (inside the data directory) holding imported media bytes
pub const MEDIA_DIR_NAME: &str = "media";

/// Directory (inside the data directory) receiving markdown exports
pub const EXPORT_DIR_NAME: &str = "exports";

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "DAYBOOK_DATA_DIR";

// ===== Database =====

/// Connections kept by the application pool
pub const DB_POOL_SIZE: u32 = 5;

/// How long a connection waits on a locked database
pub const DB_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// ===== Secure Storage =====

/// Service name used for OS credential store entries
pub const SECURE_STORE_SERVICE: &str = "Daybook";

// ===== Authentication =====

/// A persisted session allows silent re-entry for this long.
pub const SESSION_TIMEOUT_HOURS: i64 = 24;

/// Minimum PIN length (digits)
pub const MIN_PIN_LENGTH: usize = 4;

/// Maximum PIN length (digits), matches the PIN input field
pub const MAX_PIN_LENGTH: usize = 6;

/// PIN prompts offered by the command line before giving up
pub const MAX_PIN_ATTEMPTS: u32 = 3;

// ===== Entries =====

/// Title given to entries saved with an empty or blank title
pub const DEFAULT_ENTRY_TITLE: &str = "Untitled Entry";

/// Lowest valid mood rating
pub const MIN_MOOD: i64 = 1;

/// Highest valid mood rating
pub const MAX_MOOD: i64 = 5;

// ===== Tags =====

/// Palette cycled through when a tag is created without an explicit color
pub const TAG_COLORS: &[&str] = &[
    "#EF4444", "#F59E0B", "#10B981", "#3B82F6", "#8B5CF6", "#EC4899", "#06B6D4", "#84CC16",
    "#F97316", "#6366F1",
];

// ===== Stats Cache =====

/// Lifetime of memoized stats/coin rows
pub const STATS_CACHE_TTL: Duration = Duration::from_secs(5);

// ===== Reminders =====

/// Title of the daily writing reminder notification
pub const REMINDER_TITLE: &str = "📔 Time to Write";

/// Body of the daily writing reminder notification
pub const REMINDER_BODY: &str = "Don't forget to write in your diary today!";

/// Default reminder time when none has been configured
pub const DEFAULT_REMINDER_TIME: &str = "20:00";
