//! Entry search
//!
//! A text query wins over a date range; with neither, every entry is a
//! candidate. Mood and tag filters are applied to the candidates afterwards.

use crate::database::{validate_mood, Entry, Repository, SearchFilters};
use crate::error::{AppError, Result};
use std::collections::HashSet;

/// Service for searching entries
#[derive(Clone)]
pub struct SearchService {
    repo: Repository,
}

impl SearchService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Search entries with the given filters
    pub async fn search(&self, filters: &SearchFilters) -> Result<Vec<Entry>> {
        tracing::debug!("Searching entries: {:?}", filters);

        if let Some(mood) = filters.mood {
            validate_mood(mood)?;
        }

        let query = filters.query.as_deref().filter(|q| !q.is_empty());

        let mut entries = if let Some(query) = query {
            self.repo.search_entries(query).await?
        } else if let (Some(start), Some(end)) = (filters.start_date, filters.end_date) {
            if start > end {
                return Err(AppError::InvalidDate(format!(
                    "Start date {} is after end date {}",
                    start, end
                )));
            }
            self.repo.entries_by_date_range(start, end).await?
        } else {
            self.repo.list_entries().await?
        };

        if let Some(mood) = filters.mood {
            entries.retain(|e| e.mood == Some(mood));
        }

        if !filters.tag_ids.is_empty() {
            let tagged: HashSet<String> = self
                .repo
                .entry_ids_with_any_tag(&filters.tag_ids)
                .await?
                .into_iter()
                .collect();
            entries.retain(|e| tagged.contains(&e.id));
        }

        tracing::debug!("Search matched {} entries", entries.len());

        Ok(entries)
    }

    /// Plain text search
    pub async fn search_text(&self, query: &str) -> Result<Vec<Entry>> {
        self.search(&SearchFilters {
            query: Some(query.to_string()),
            ..Default::default()
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{create_memory_pool, NewEntry};
    use chrono::NaiveDate;

    async fn create_test_service() -> (SearchService, Repository) {
        let pool = create_memory_pool().await.unwrap();
        let repo = Repository::new(pool);
        (SearchService::new(repo.clone()), repo)
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
    }

    async fn seed(repo: &Repository) -> Vec<Entry> {
        let mut entries = Vec::new();
        for (title, content, d, mood) in [
            ("Hiking", "Climbed the ridge at dawn", 1, Some(5)),
            ("Rainy", "Stayed in and read", 3, Some(2)),
            ("Work", "Long meeting about the ridge project", 5, Some(3)),
            ("Quiet", "Nothing much", 8, None),
        ] {
            let mut req = NewEntry::new(title, content, day(d));
            req.mood = mood;
            entries.push(repo.create_entry(&req).await.unwrap());
        }
        entries
    }

    #[tokio::test]
    async fn test_text_query_matches_title_or_content() {
        let (service, repo) = create_test_service().await;
        seed(&repo).await;

        let titles: Vec<String> = service
            .search_text("RIDGE")
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, vec!["Work", "Hiking"]);

        let titles: Vec<String> = service
            .search_text("rain")
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, vec!["Rainy"]);

        assert!(service.search_text("volcano").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_query_whitespace_is_significant() {
        let (service, repo) = create_test_service().await;
        repo.create_entry(&NewEntry::new("Walk", "ridgeline walk", day(10)))
            .await
            .unwrap();
        repo.create_entry(&NewEntry::new("Views", "from the ridge top", day(11)))
            .await
            .unwrap();

        let results = service.search_text(" ridge").await.unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].content.contains(" ridge"));

        assert!(service.search_text("   ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_query_takes_precedence_over_dates() {
        let (service, repo) = create_test_service().await;
        seed(&repo).await;

        let results = service
            .search(&SearchFilters {
                query: Some("ridge".to_string()),
                start_date: Some(day(2)),
                end_date: Some(day(4)),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_date_range() {
        let (service, repo) = create_test_service().await;
        seed(&repo).await;

        let results = service
            .search(&SearchFilters {
                query: Some(String::new()),
                start_date: Some(day(2)),
                end_date: Some(day(5)),
                ..Default::default()
            })
            .await
            .unwrap();

        let titles: Vec<&str> = results.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Work", "Rainy"]);
    }

    #[tokio::test]
    async fn test_single_date_bound_lists_everything() {
        let (service, repo) = create_test_service().await;
        seed(&repo).await;

        let results = service
            .search(&SearchFilters {
                start_date: Some(day(4)),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(results.len(), 4);
    }

    #[tokio::test]
    async fn test_reversed_range_rejected() {
        let (service, _repo) = create_test_service().await;

        let result = service
            .search(&SearchFilters {
                start_date: Some(day(9)),
                end_date: Some(day(1)),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(AppError::InvalidDate(_))));
    }

    #[tokio::test]
    async fn test_mood_filter() {
        let (service, repo) = create_test_service().await;
        seed(&repo).await;

        let results = service
            .search(&SearchFilters {
                mood: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Rainy");
    }

    #[tokio::test]
    async fn test_tag_filter_matches_any() {
        let (service, repo) = create_test_service().await;
        let entries = seed(&repo).await;

        let outdoors = repo.create_tag("outdoors", "#10B981").await.unwrap();
        let office = repo.create_tag("office", "#6366F1").await.unwrap();
        let unused = repo.create_tag("unused", "#EC4899").await.unwrap();
        repo.add_tag_to_entry(&entries[0].id, &outdoors.id).await.unwrap();
        repo.add_tag_to_entry(&entries[2].id, &office.id).await.unwrap();
        repo.add_tag_to_entry(&entries[2].id, &outdoors.id).await.unwrap();

        let results = service
            .search(&SearchFilters {
                tag_ids: vec![outdoors.id.clone(), office.id.clone()],
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(results.len(), 2);

        let results = service
            .search(&SearchFilters {
                tag_ids: vec![unused.id],
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(results.is_empty());
    }
}
