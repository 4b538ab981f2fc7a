//! Database models
//!
//! Rust structs representing database entities.
//! All models use serde so front ends and exports can serialize them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use crate::config::{MAX_MOOD, MIN_MOOD};
use crate::error::{AppError, Result};

/// A single diary entry for a given date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Entry {
    pub id: String,
    pub title: String,
    pub content: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// 1 (very sad) to 5 (very happy)
    pub mood: Option<i64>,
    pub mood_emoji: Option<String>,
    pub template_id: Option<String>,
}

/// Create entry request
#[derive(Debug, Clone, Deserialize)]
pub struct NewEntry {
    pub title: String,
    pub content: String,
    pub date: NaiveDate,
    pub mood: Option<i64>,
    pub mood_emoji: Option<String>,
    pub template_id: Option<String>,
}

impl NewEntry {
    pub fn new(title: impl Into<String>, content: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            date,
            mood: None,
            mood_emoji: None,
            template_id: None,
        }
    }

    /// Start an entry from a template's content skeleton
    pub fn from_template(template: &Template, date: NaiveDate) -> Self {
        Self {
            title: template.name.clone(),
            content: template.content.clone(),
            date,
            mood: None,
            mood_emoji: None,
            template_id: Some(template.id.clone()),
        }
    }

    pub fn with_mood(mut self, mood: i64) -> Self {
        self.mood = Some(mood);
        self
    }
}

/// Update entry request. Replaces every editable field of the entry.
#[derive(Debug, Clone, Deserialize)]
pub struct EntryUpdate {
    pub id: String,
    pub title: String,
    pub content: String,
    pub date: NaiveDate,
    pub mood: Option<i64>,
    pub mood_emoji: Option<String>,
    pub template_id: Option<String>,
}

impl From<&Entry> for EntryUpdate {
    fn from(entry: &Entry) -> Self {
        Self {
            id: entry.id.clone(),
            title: entry.title.clone(),
            content: entry.content.clone(),
            date: entry.date,
            mood: entry.mood,
            mood_emoji: entry.mood_emoji.clone(),
            template_id: entry.template_id.clone(),
        }
    }
}

const MOOD_EMOJIS: [&str; 5] = ["😢", "😕", "😐", "🙂", "😄"];
const MOOD_LABELS: [&str; 5] = ["Very Sad", "Sad", "Neutral", "Happy", "Very Happy"];

/// Reject mood ratings outside 1..=5
pub fn validate_mood(mood: i64) -> Result<i64> {
    if (MIN_MOOD..=MAX_MOOD).contains(&mood) {
        Ok(mood)
    } else {
        Err(AppError::InvalidMood(mood))
    }
}

/// Canonical emoji for a mood rating
pub fn mood_emoji(mood: i64) -> Option<&'static str> {
    validate_mood(mood)
        .ok()
        .map(|m| MOOD_EMOJIS[(m - MIN_MOOD) as usize])
}

/// Human readable label for a mood rating
pub fn mood_label(mood: i64) -> Option<&'static str> {
    validate_mood(mood)
        .ok()
        .map(|m| MOOD_LABELS[(m - MIN_MOOD) as usize])
}

/// Tag that can be linked to many entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

/// Kind of media attached to an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    File,
}

impl MediaKind {
    /// MIME type assumed for media of this kind
    pub fn default_mime_type(self) -> &'static str {
        match self {
            MediaKind::Image => "image/jpeg",
            MediaKind::Video => "video/mp4",
            MediaKind::Audio => "audio/mpeg",
            MediaKind::File => "application/octet-stream",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
            MediaKind::File => "file",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "image" => Ok(MediaKind::Image),
            "video" => Ok(MediaKind::Video),
            "audio" => Ok(MediaKind::Audio),
            "file" => Ok(MediaKind::File),
            other => Err(AppError::Generic(format!("Unknown media type: {}", other))),
        }
    }
}

/// Media file attached to an entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct MediaAttachment {
    pub id: String,
    pub entry_id: String,
    pub media_type: MediaKind,
    pub uri: String,
    pub thumbnail_uri: Option<String>,
    /// SHA-256 of the bytes when the file was imported into the media store
    pub blob_hash: Option<String>,
    pub file_name: String,
    pub file_size: i64,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
}

/// Create media request for a file referenced by URI
#[derive(Debug, Clone, Deserialize)]
pub struct NewMedia {
    pub entry_id: String,
    pub media_type: MediaKind,
    pub uri: String,
    pub thumbnail_uri: Option<String>,
    pub blob_hash: Option<String>,
    pub file_name: String,
    pub file_size: i64,
    pub mime_type: String,
}

/// Template category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum TemplateCategory {
    Daily,
    Gratitude,
    Dream,
    Bullet,
    Custom,
}

impl fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TemplateCategory::Daily => "daily",
            TemplateCategory::Gratitude => "gratitude",
            TemplateCategory::Dream => "dream",
            TemplateCategory::Bullet => "bullet",
            TemplateCategory::Custom => "custom",
        };
        f.write_str(name)
    }
}

/// Pre-authored content skeleton
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub content: String,
    pub category: TemplateCategory,
    pub created_at: DateTime<Utc>,
}

/// Create template request
#[derive(Debug, Clone, Deserialize)]
pub struct NewTemplate {
    pub name: String,
    pub description: Option<String>,
    pub content: String,
    pub category: TemplateCategory,
}

/// Weekly writing reminder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub enabled: bool,
    /// Local time of day, `HH:mm`
    pub time: String,
    /// Weekdays, 0 = Sunday .. 6 = Saturday
    pub days: Vec<u8>,
}

/// Application setting
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Setting {
    pub key: String,
    pub value: String,
}

/// Aggregate stats row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Stats {
    pub games_played: i64,
    pub games_won: i64,
    pub highest_score: i64,
    pub total_score: i64,
}

/// Partial stats update; `None` keeps the stored value
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct StatsUpdate {
    pub games_played: Option<i64>,
    pub games_won: Option<i64>,
    pub highest_score: Option<i64>,
    pub total_score: Option<i64>,
}

/// Coin balance row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CoinBreakdown {
    #[sqlx(rename = "amount")]
    pub total: i64,
    #[sqlx(rename = "achievement_coins")]
    pub achievement: i64,
    #[sqlx(rename = "game_coins")]
    pub game: i64,
    #[sqlx(rename = "welcome_bonus_given")]
    pub welcome_bonus: bool,
}

/// Search criteria
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchFilters {
    pub query: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub tag_ids: Vec<String>,
    pub mood: Option<i64>,
}
