//! Markdown export

use crate::config::DEFAULT_ENTRY_TITLE;
use crate::database::{Entry, Repository};
use crate::error::{AppError, Result};
use chrono::{DateTime, TimeZone};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tokio::fs;

const LONG_DATE: &str = "%B %-d, %Y";
const LONG_DATE_TIME: &str = "%B %-d, %Y %H:%M";

/// Render one entry. Timestamps are shown in the zone of `tz`.
pub fn entry_to_markdown<Tz: TimeZone>(entry: &Entry, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    let title = if entry.title.is_empty() {
        DEFAULT_ENTRY_TITLE
    } else {
        entry.title.as_str()
    };

    let mut markdown = format!("# {}\n\n", title);
    markdown.push_str(&format!("**Date:** {}\n\n", entry.date.format(LONG_DATE)));

    if let Some(emoji) = &entry.mood_emoji {
        let mood = entry.mood.map(|m| m.to_string()).unwrap_or_default();
        markdown.push_str(&format!("**Mood:** {} ({}/5)\n\n", emoji, mood));
    }

    markdown.push_str(&format!("{}\n\n", entry.content));
    markdown.push_str("---\n");
    markdown.push_str(&format!(
        "*Created: {}*\n",
        entry.created_at.with_timezone(tz).format(LONG_DATE_TIME)
    ));
    markdown.push_str(&format!(
        "*Updated: {}*\n",
        entry.updated_at.with_timezone(tz).format(LONG_DATE_TIME)
    ));

    markdown
}

/// Render a full export document
pub fn entries_to_markdown<Tz: TimeZone>(entries: &[Entry], exported_at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    let tz = exported_at.timezone();

    let mut markdown = String::from("# Diary Export\n\n");
    markdown.push_str(&format!(
        "*Exported on {}*\n\n",
        exported_at.format(LONG_DATE_TIME)
    ));
    markdown.push_str("---\n\n");

    for entry in entries {
        markdown.push_str(&entry_to_markdown(entry, &tz));
        markdown.push_str("\n\n");
    }

    markdown
}

/// Service exporting entries to markdown files
#[derive(Clone)]
pub struct ExportService {
    repo: Repository,
    export_dir: PathBuf,
}

impl ExportService {
    pub fn new(repo: Repository, export_dir: PathBuf) -> Self {
        Self { repo, export_dir }
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Markdown for every entry, newest first
    pub async fn all_entries_to_markdown<Tz: TimeZone>(
        &self,
        exported_at: &DateTime<Tz>,
    ) -> Result<String>
    where
        Tz::Offset: Display,
    {
        let entries = self.repo.list_entries().await?;
        Ok(entries_to_markdown(&entries, exported_at))
    }

    /// Write content into the export directory and return the file path
    pub async fn export_to_file(&self, content: &str, file_name: &str) -> Result<PathBuf> {
        let name = Path::new(file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| *n == file_name)
            .ok_or_else(|| AppError::Generic(format!("Invalid export file name: {}", file_name)))?;

        fs::create_dir_all(&self.export_dir).await?;

        let path = self.export_dir.join(name);
        fs::write(&path, content).await?;

        tracing::info!("Exported {} bytes to {:?}", content.len(), path);

        Ok(path)
    }
}
