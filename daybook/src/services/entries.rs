//! Entries service
//!
//! Entry lifecycle: normalizes titles and moods on the way in and cleans up
//! imported media when an entry is deleted.

use crate::config::DEFAULT_ENTRY_TITLE;
use crate::database::{mood_emoji, validate_mood, Entry, EntryUpdate, NewEntry, Repository};
use crate::error::Result;
use crate::services::MediaService;
use chrono::NaiveDate;

/// Service for managing diary entries
#[derive(Clone)]
pub struct EntriesService {
    repo: Repository,
    media: MediaService,
}

impl EntriesService {
    pub fn new(repo: Repository, media: MediaService) -> Self {
        Self { repo, media }
    }

    /// Create a new entry
    pub async fn create_entry(&self, mut req: NewEntry) -> Result<Entry> {
        req.title = normalize_title(&req.title);
        req.mood_emoji = normalize_mood(req.mood, req.mood_emoji.take())?;

        tracing::info!("Creating entry '{}' for {}", req.title, req.date);

        let entry = self.repo.create_entry(&req).await?;

        tracing::info!("Entry created successfully: {}", entry.id);

        Ok(entry)
    }

    pub async fn get_entry(&self, id: &str) -> Result<Entry> {
        self.repo.get_entry(id).await
    }

    /// All entries, newest date first
    pub async fn list_entries(&self) -> Result<Vec<Entry>> {
        self.repo.list_entries().await
    }

    pub async fn entries_by_date(&self, date: NaiveDate) -> Result<Vec<Entry>> {
        self.repo.entries_by_date(date).await
    }

    /// Entries within an inclusive date range
    pub async fn entries_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Entry>> {
        self.repo.entries_by_date_range(start, end).await
    }

    /// Update an entry
    pub async fn update_entry(&self, mut req: EntryUpdate) -> Result<Entry> {
        req.title = normalize_title(&req.title);
        req.mood_emoji = normalize_mood(req.mood, req.mood_emoji.take())?;

        tracing::debug!("Updating entry: {}", req.id);

        let entry = self.repo.update_entry(&req).await?;

        tracing::debug!("Entry updated successfully: {}", entry.id);

        Ok(entry)
    }

    /// Delete an entry with its tag links, media rows and unshared media files
    pub async fn delete_entry(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting entry: {}", id);

        let blob_hashes: Vec<String> = self
            .repo
            .media_for_entry(id)
            .await?
            .into_iter()
            .filter_map(|m| m.blob_hash)
            .collect();

        self.repo.delete_entry(id).await?;
        self.media.release_blobs(blob_hashes).await?;

        tracing::info!("Entry deleted successfully: {}", id);

        Ok(())
    }
}

fn normalize_title(title: &str) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        DEFAULT_ENTRY_TITLE.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Validate the mood and fill in its emoji when none was chosen
fn normalize_mood(mood: Option<i64>, emoji: Option<String>) -> Result<Option<String>> {
    match mood {
        Some(mood) => {
            validate_mood(mood)?;
            Ok(emoji
                .filter(|e| !e.trim().is_empty())
                .or_else(|| mood_emoji(mood).map(str::to_string)))
        }
        None => Ok(emoji),
    }
}
