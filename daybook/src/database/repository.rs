//! Repository layer for database operations
//!
//! This module provides CRUD operations for all entities. Each method is a
//! single statement (or a read followed by a write for the aggregate rows);
//! multi-step flows are composed by the services.

use super::models::*;
use crate::error::{AppError, Result};
use chrono::{NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, SqlitePool};
use std::collections::HashMap;
use uuid::Uuid;

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

#[derive(FromRow)]
struct ReminderRow {
    id: String,
    enabled: bool,
    time: String,
    days: Json<Vec<u8>>,
}

impl From<ReminderRow> for Reminder {
    fn from(row: ReminderRow) -> Self {
        Reminder {
            id: row.id,
            enabled: row.enabled,
            time: row.time,
            days: row.days.0,
        }
    }
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // ===== Entries =====

    /// Insert an entry exactly as given
    pub async fn create_entry(&self, req: &NewEntry) -> Result<Entry> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let entry = sqlx::query_as::<_, Entry>(
            r#"
            INSERT INTO entries (id, title, content, date, created_at, updated_at, mood, mood_emoji, template_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&req.title)
        .bind(&req.content)
        .bind(req.date)
        .bind(now)
        .bind(now)
        .bind(req.mood)
        .bind(&req.mood_emoji)
        .bind(&req.template_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created entry: {}", id);
        Ok(entry)
    }

    /// Get an entry by ID
    pub async fn get_entry(&self, id: &str) -> Result<Entry> {
        sqlx::query_as::<_, Entry>("SELECT * FROM entries WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::EntryNotFound(id.to_string()))
    }

    /// List all entries, newest date first
    pub async fn list_entries(&self) -> Result<Vec<Entry>> {
        let entries = sqlx::query_as::<_, Entry>(
            "SELECT * FROM entries ORDER BY date DESC, created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Entries written for a single day
    pub async fn entries_by_date(&self, date: NaiveDate) -> Result<Vec<Entry>> {
        let entries = sqlx::query_as::<_, Entry>(
            "SELECT * FROM entries WHERE date = ? ORDER BY created_at DESC",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Entries dated within `start..=end`
    pub async fn entries_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Entry>> {
        let entries = sqlx::query_as::<_, Entry>(
            "SELECT * FROM entries WHERE date BETWEEN ? AND ? ORDER BY date DESC",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Substring match on title or content using SQLite `LIKE`
    pub async fn search_entries(&self, query: &str) -> Result<Vec<Entry>> {
        let pattern = format!("%{}%", query);

        let entries = sqlx::query_as::<_, Entry>(
            r#"
            SELECT * FROM entries
            WHERE title LIKE ? OR content LIKE ?
            ORDER BY date DESC
            "#,
        )
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Replace the editable fields of an entry
    pub async fn update_entry(&self, req: &EntryUpdate) -> Result<Entry> {
        let now = Utc::now();

        sqlx::query_as::<_, Entry>(
            r#"
            UPDATE entries
            SET title = ?, content = ?, date = ?, updated_at = ?, mood = ?, mood_emoji = ?, template_id = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(&req.title)
        .bind(&req.content)
        .bind(req.date)
        .bind(now)
        .bind(req.mood)
        .bind(&req.mood_emoji)
        .bind(&req.template_id)
        .bind(&req.id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::EntryNotFound(req.id.clone()))
    }

    /// Delete an entry; tag links and media rows go with it
    pub async fn delete_entry(&self, id: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM entries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::EntryNotFound(id.to_string()));
        }

        tracing::debug!("Deleted entry: {}", id);
        Ok(())
    }

    /// IDs of entries linked to at least one of the given tags
    pub async fn entry_ids_with_any_tag(&self, tag_ids: &[String]) -> Result<Vec<String>> {
        if tag_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; tag_ids.len()].join(", ");
        let sql = format!(
            "SELECT DISTINCT entry_id FROM entry_tags WHERE tag_id IN ({})",
            placeholders
        );

        let mut query = sqlx::query_scalar::<_, String>(&sql);
        for tag_id in tag_ids {
            query = query.bind(tag_id);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    // ===== Tags =====

    /// Create a tag; a taken name maps to `DuplicateTag`
    pub async fn create_tag(&self, name: &str, color: &str) -> Result<Tag> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let result = sqlx::query_as::<_, Tag>(
            r#"
            INSERT INTO tags (id, name, color, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(name)
        .bind(color)
        .bind(now)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(tag) => {
                tracing::debug!("Created tag: {} ({})", name, id);
                Ok(tag)
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(AppError::DuplicateTag(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn count_tags(&self) -> Result<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM tags")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// All tags ordered by name
    pub async fn list_tags(&self) -> Result<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>("SELECT * FROM tags ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(tags)
    }

    pub async fn find_tag_by_name(&self, name: &str) -> Result<Option<Tag>> {
        let tag = sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(tag)
    }

    /// Tags linked to an entry
    pub async fn tags_for_entry(&self, entry_id: &str) -> Result<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT tags.* FROM tags
            INNER JOIN entry_tags ON tags.id = entry_tags.tag_id
            WHERE entry_tags.entry_id = ?
            ORDER BY tags.name ASC
            "#,
        )
        .bind(entry_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tags)
    }

    /// Link a tag to an entry; linking twice is a no-op
    pub async fn add_tag_to_entry(&self, entry_id: &str, tag_id: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO entry_tags (entry_id, tag_id) VALUES (?, ?)
            ON CONFLICT(entry_id, tag_id) DO NOTHING
            "#,
        )
        .bind(entry_id)
        .bind(tag_id)
        .execute(&self.pool)
        .await?;

        tracing::debug!("Linked tag {} to entry {}", tag_id, entry_id);
        Ok(())
    }

    pub async fn remove_tag_from_entry(&self, entry_id: &str, tag_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM entry_tags WHERE entry_id = ? AND tag_id = ?")
            .bind(entry_id)
            .bind(tag_id)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Unlinked tag {} from entry {}", tag_id, entry_id);
        Ok(())
    }

    /// Delete a tag and all of its entry links
    pub async fn delete_tag(&self, id: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM tags WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::TagNotFound(id.to_string()));
        }

        tracing::debug!("Deleted tag: {}", id);
        Ok(())
    }

    // ===== Media =====

    pub async fn create_media(&self, req: &NewMedia) -> Result<MediaAttachment> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let media = sqlx::query_as::<_, MediaAttachment>(
            r#"
            INSERT INTO media_attachments
                (id, entry_id, media_type, uri, thumbnail_uri, blob_hash, file_name, file_size, mime_type, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&req.entry_id)
        .bind(req.media_type)
        .bind(&req.uri)
        .bind(&req.thumbnail_uri)
        .bind(&req.blob_hash)
        .bind(&req.file_name)
        .bind(req.file_size)
        .bind(&req.mime_type)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created media {} for entry {}", id, req.entry_id);
        Ok(media)
    }

    pub async fn get_media(&self, id: &str) -> Result<MediaAttachment> {
        sqlx::query_as::<_, MediaAttachment>("SELECT * FROM media_attachments WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::MediaNotFound(id.to_string()))
    }

    /// Media attached to an entry, oldest first
    pub async fn media_for_entry(&self, entry_id: &str) -> Result<Vec<MediaAttachment>> {
        let media = sqlx::query_as::<_, MediaAttachment>(
            "SELECT * FROM media_attachments WHERE entry_id = ? ORDER BY created_at ASC",
        )
        .bind(entry_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(media)
    }

    /// Delete a media row, returning it so its blob can be released
    pub async fn delete_media(&self, id: &str) -> Result<MediaAttachment> {
        let media = sqlx::query_as::<_, MediaAttachment>(
            "DELETE FROM media_attachments WHERE id = ? RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::MediaNotFound(id.to_string()))?;

        tracing::debug!("Deleted media: {}", id);
        Ok(media)
    }

    /// Number of media rows still pointing at a blob
    pub async fn count_media_with_blob(&self, blob_hash: &str) -> Result<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM media_attachments WHERE blob_hash = ?")
            .bind(blob_hash)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // ===== Templates =====

    pub async fn create_template(&self, req: &NewTemplate) -> Result<Template> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let template = sqlx::query_as::<_, Template>(
            r#"
            INSERT INTO templates (id, name, description, content, category, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&req.name)
        .bind(&req.description)
        .bind(&req.content)
        .bind(req.category)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created template: {} ({})", req.name, id);
        Ok(template)
    }

    pub async fn list_templates(&self) -> Result<Vec<Template>> {
        let templates = sqlx::query_as::<_, Template>("SELECT * FROM templates ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(templates)
    }

    pub async fn get_template(&self, id: &str) -> Result<Template> {
        sqlx::query_as::<_, Template>("SELECT * FROM templates WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::TemplateNotFound(id.to_string()))
    }

    // ===== Reminders =====

    /// The first (and normally only) reminder row
    pub async fn get_reminder(&self) -> Result<Option<Reminder>> {
        let row = sqlx::query_as::<_, ReminderRow>(
            "SELECT id, enabled, time, days FROM reminders LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Reminder::from))
    }

    /// Insert or update a reminder by id
    pub async fn save_reminder(&self, reminder: &Reminder) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reminders (id, enabled, time, days, last_updated)
            VALUES (?, ?, ?, ?, CURRENT_TIMESTAMP)
            ON CONFLICT(id) DO UPDATE SET
                enabled = excluded.enabled,
                time = excluded.time,
                days = excluded.days,
                last_updated = CURRENT_TIMESTAMP
            "#,
        )
        .bind(&reminder.id)
        .bind(reminder.enabled)
        .bind(&reminder.time)
        .bind(Json(&reminder.days))
        .execute(&self.pool)
        .await?;

        tracing::debug!("Saved reminder: {}", reminder.id);
        Ok(())
    }

    // ===== Settings =====

    pub async fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    pub async fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO settings (key, value, last_updated) VALUES (?, ?, CURRENT_TIMESTAMP)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, last_updated = CURRENT_TIMESTAMP
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        tracing::debug!("Set setting: {} = {}", key, value);
        Ok(())
    }

    pub async fn all_settings(&self) -> Result<HashMap<String, String>> {
        let rows = sqlx::query_as::<_, Setting>("SELECT key, value FROM settings")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|s| (s.key, s.value)).collect())
    }

    // ===== Stats / Coins =====

    pub async fn get_stats(&self) -> Result<Option<Stats>> {
        let stats = sqlx::query_as::<_, Stats>(
            "SELECT games_played, games_won, highest_score, total_score FROM stats LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(stats)
    }

    /// Apply a partial update to the stats row, creating it if needed
    pub async fn update_stats(&self, update: &StatsUpdate) -> Result<Stats> {
        let current_id: Option<i64> = sqlx::query_scalar("SELECT id FROM stats LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;

        let current = self.get_stats().await?.unwrap_or_default();
        let merged = Stats {
            games_played: update.games_played.unwrap_or(current.games_played),
            games_won: update.games_won.unwrap_or(current.games_won),
            highest_score: update.highest_score.unwrap_or(current.highest_score),
            total_score: update.total_score.unwrap_or(current.total_score),
        };

        match current_id {
            Some(id) => {
                sqlx::query(
                    r#"
                    UPDATE stats
                    SET games_played = ?, games_won = ?, highest_score = ?, total_score = ?,
                        last_updated = CURRENT_TIMESTAMP
                    WHERE id = ?
                    "#,
                )
                .bind(merged.games_played)
                .bind(merged.games_won)
                .bind(merged.highest_score)
                .bind(merged.total_score)
                .bind(id)
                .execute(&self.pool)
                .await?;
            }
            None => {
                sqlx::query(
                    r#"
                    INSERT INTO stats (games_played, games_won, highest_score, total_score)
                    VALUES (?, ?, ?, ?)
                    "#,
                )
                .bind(merged.games_played)
                .bind(merged.games_won)
                .bind(merged.highest_score)
                .bind(merged.total_score)
                .execute(&self.pool)
                .await?;
            }
        }

        tracing::debug!("Updated stats: {:?}", merged);
        Ok(merged)
    }

    pub async fn get_coins(&self) -> Result<Option<CoinBreakdown>> {
        let coins = sqlx::query_as::<_, CoinBreakdown>(
            "SELECT amount, achievement_coins, game_coins, welcome_bonus_given FROM coins LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(coins)
    }
}
