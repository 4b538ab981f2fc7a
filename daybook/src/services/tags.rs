//! Tags service

use crate::config::TAG_COLORS;
use crate::database::{Repository, Tag};
use crate::error::{AppError, Result};

/// Service for managing tags and their entry links
#[derive(Clone)]
pub struct TagsService {
    repo: Repository,
}

impl TagsService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Create a tag. Without a color, the next palette color is used.
    pub async fn create_tag(&self, name: &str, color: Option<&str>) -> Result<Tag> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Generic("Tag name cannot be empty".to_string()));
        }

        let color = match color.map(str::trim).filter(|c| !c.is_empty()) {
            Some(color) => color.to_string(),
            None => {
                let count = self.repo.count_tags().await?;
                palette_color(count).to_string()
            }
        };

        tracing::info!("Creating tag: {}", name);

        let tag = self.repo.create_tag(name, &color).await?;

        tracing::info!("Tag created successfully: {}", tag.id);

        Ok(tag)
    }

    /// Existing tag with this name, or a new one
    pub async fn get_or_create_tag(&self, name: &str) -> Result<Tag> {
        match self.repo.find_tag_by_name(name.trim()).await? {
            Some(tag) => Ok(tag),
            None => self.create_tag(name, None).await,
        }
    }

    /// Tag with exactly this (trimmed) name
    pub async fn find_tag(&self, name: &str) -> Result<Tag> {
        let name = name.trim();
        self.repo
            .find_tag_by_name(name)
            .await?
            .ok_or_else(|| AppError::TagNotFound(name.to_string()))
    }

    pub async fn list_tags(&self) -> Result<Vec<Tag>> {
        self.repo.list_tags().await
    }

    pub async fn tags_for_entry(&self, entry_id: &str) -> Result<Vec<Tag>> {
        self.repo.tags_for_entry(entry_id).await
    }

    pub async fn add_tag_to_entry(&self, entry_id: &str, tag_id: &str) -> Result<()> {
        self.repo.add_tag_to_entry(entry_id, tag_id).await
    }

    pub async fn remove_tag_from_entry(&self, entry_id: &str, tag_id: &str) -> Result<()> {
        self.repo.remove_tag_from_entry(entry_id, tag_id).await
    }

    pub async fn delete_tag(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting tag: {}", id);
        self.repo.delete_tag(id).await
    }
}

fn palette_color(tag_count: i64) -> &'static str {
    TAG_COLORS[tag_count.rem_euclid(TAG_COLORS.len() as i64) as usize]
}
