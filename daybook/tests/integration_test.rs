//! Integration tests for Daybook
//!
//! These tests open a file-backed diary through `AppState` and verify
//! end-to-end workflows including:
//! - The PIN and session gate
//! - Entry lifecycle with tags and media
//! - Search, insights and export
//! - Reminder scheduling

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use daybook::app::{AppState, Platform};
use daybook::database::{EntryUpdate, MediaKind, NewEntry, SearchFilters};
use daybook::error::{AppError, Result};
use daybook::platform::{NoBiometrics, Notification};
use daybook::services::auth::{SessionRecord, SESSION_KEY};
use daybook::services::{LaunchRoute, NotificationScheduler};
use daybook::storage::{MemorySecureStore, SecureStore};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Scheduler double recording every weekly schedule
#[derive(Default)]
struct RecordingScheduler {
    scheduled: Mutex<Vec<(u8, u32, u32)>>,
}

#[async_trait]
impl NotificationScheduler for RecordingScheduler {
    async fn schedule_weekly(
        &self,
        weekday: u8,
        hour: u32,
        minute: u32,
        _notification: &Notification,
    ) -> Result<String> {
        let mut scheduled = self.scheduled.lock().unwrap();
        scheduled.push((weekday, hour, minute));
        Ok(format!("job-{}", scheduled.len()))
    }

    async fn cancel_all(&self) -> Result<()> {
        self.scheduled.lock().unwrap().clear();
        Ok(())
    }
}

struct TestDiary {
    state: AppState,
    store: MemorySecureStore,
    scheduler: Arc<RecordingScheduler>,
    temp: TempDir,
}

/// Helper to open a diary in a temporary data directory
async fn open_test_diary() -> TestDiary {
    let temp_dir = TempDir::new().unwrap();
    let store = MemorySecureStore::new();
    let scheduler = Arc::new(RecordingScheduler::default());

    let platform = Platform {
        secure_store: Arc::new(store.clone()),
        biometrics: Arc::new(NoBiometrics),
        scheduler: scheduler.clone(),
    };

    let state = AppState::open(temp_dir.path().join("diary"), platform)
        .await
        .unwrap();

    TestDiary {
        state,
        store,
        scheduler,
        temp: temp_dir,
    }
}

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[tokio::test]
async fn test_launch_and_pin_flow() {
    let diary = open_test_diary().await;
    let auth = &diary.state.auth;

    assert_eq!(auth.launch().await.unwrap(), LaunchRoute::Onboarding);

    auth.mark_onboarding_complete().await.unwrap();
    assert_eq!(auth.launch().await.unwrap(), LaunchRoute::Setup);

    auth.set_pin("2468").await.unwrap();
    assert_eq!(auth.launch().await.unwrap(), LaunchRoute::Login);

    assert!(!auth.authenticate_with_pin("1357").await.unwrap());
    assert!(!auth.is_authenticated().await);

    assert!(auth.authenticate_with_pin("2468").await.unwrap());
    assert!(auth.is_authenticated().await);

    // The session lets the next launch skip the PIN prompt
    assert_eq!(auth.launch().await.unwrap(), LaunchRoute::Home);

    auth.logout().await.unwrap();
    assert!(!auth.is_authenticated().await);
    assert_eq!(auth.launch().await.unwrap(), LaunchRoute::Login);
}

#[tokio::test]
async fn test_pin_is_not_stored_in_plain_text() {
    let diary = open_test_diary().await;

    diary.state.auth.set_pin("1234").await.unwrap();

    let stored = diary
        .store
        .get(daybook::services::auth::PIN_KEY)
        .unwrap()
        .unwrap();
    assert_ne!(stored, "1234");
}

#[tokio::test]
async fn test_session_expires_after_a_day() {
    let diary = open_test_diary().await;
    let auth = &diary.state.auth;

    auth.mark_onboarding_complete().await.unwrap();
    auth.set_pin("9876").await.unwrap();

    let stale = SessionRecord::at(Utc::now() - Duration::hours(25));
    diary
        .store
        .set(SESSION_KEY, &serde_json::to_string(&stale).unwrap())
        .unwrap();

    assert_eq!(auth.launch().await.unwrap(), LaunchRoute::Login);
    assert!(diary.store.get(SESSION_KEY).unwrap().is_none());

    let fresh = SessionRecord::at(Utc::now() - Duration::hours(23));
    diary
        .store
        .set(SESSION_KEY, &serde_json::to_string(&fresh).unwrap())
        .unwrap();

    assert_eq!(auth.launch().await.unwrap(), LaunchRoute::Home);
}

#[tokio::test]
async fn test_entry_lifecycle_with_tags_and_media() {
    let diary = open_test_diary().await;
    let state = &diary.state;

    let entry = state
        .entries
        .create_entry(NewEntry::new("Harbour walk", "Boats and gulls", day(2024, 6, 1)).with_mood(4))
        .await
        .unwrap();
    assert_eq!(entry.mood_emoji.as_deref(), Some("🙂"));

    let tag = state.tags.get_or_create_tag("outdoors").await.unwrap();
    state.tags.add_tag_to_entry(&entry.id, &tag.id).await.unwrap();

    let photo = diary.temp.path().join("gulls.jpg");
    std::fs::write(&photo, b"not really a jpeg").unwrap();
    let media = state
        .media
        .attach_file(&entry.id, MediaKind::Image, &photo)
        .await
        .unwrap();
    assert_eq!(media.mime_type, "image/jpeg");
    assert_eq!(
        state.media.read_media(&media.id).await.unwrap(),
        b"not really a jpeg"
    );

    let mut update = EntryUpdate::from(&entry);
    update.title = "   ".to_string();
    let updated = state.entries.update_entry(update).await.unwrap();
    assert_eq!(updated.title, "Untitled Entry");

    state.entries.delete_entry(&entry.id).await.unwrap();

    assert!(matches!(
        state.entries.get_entry(&entry.id).await,
        Err(AppError::EntryNotFound(_))
    ));
    assert!(state.media.media_for_entry(&entry.id).await.unwrap().is_empty());
    assert!(state.tags.tags_for_entry(&entry.id).await.unwrap().is_empty());

    // The tag itself survives, only the link is gone
    assert_eq!(state.tags.list_tags().await.unwrap().len(), 1);

    let blob_path = media.uri.strip_prefix("file://").unwrap();
    assert!(!std::path::Path::new(blob_path).exists());
}

#[tokio::test]
async fn test_invalid_mood_rejected() {
    let diary = open_test_diary().await;

    let result = diary
        .state
        .entries
        .create_entry(NewEntry::new("Odd", "", day(2024, 1, 1)).with_mood(9))
        .await;

    assert!(matches!(result, Err(AppError::InvalidMood(9))));
    assert!(diary.state.entries.list_entries().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search_filters() {
    let diary = open_test_diary().await;
    let state = &diary.state;

    let beach = state
        .entries
        .create_entry(NewEntry::new("Beach day", "Sand and sun", day(2024, 7, 1)).with_mood(5))
        .await
        .unwrap();
    state
        .entries
        .create_entry(NewEntry::new("Rainy", "Stayed in with a book", day(2024, 7, 2)).with_mood(2))
        .await
        .unwrap();
    let book = state
        .entries
        .create_entry(NewEntry::new("Library", "Found a great BOOK", day(2024, 8, 15)))
        .await
        .unwrap();

    let tag = state.tags.get_or_create_tag("reading").await.unwrap();
    state.tags.add_tag_to_entry(&book.id, &tag.id).await.unwrap();

    // LIKE matching is case-insensitive for ASCII
    let text = state.search.search_text("book").await.unwrap();
    assert_eq!(text.len(), 2);

    let july = state
        .search
        .search(&SearchFilters {
            start_date: Some(day(2024, 7, 1)),
            end_date: Some(day(2024, 7, 31)),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(july.len(), 2);

    let happy = state
        .search
        .search(&SearchFilters {
            mood: Some(5),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(happy.len(), 1);
    assert_eq!(happy[0].id, beach.id);

    let tagged = state
        .search
        .search(&SearchFilters {
            query: Some("book".to_string()),
            tag_ids: vec![tag.id.clone()],
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(tagged.len(), 1);
    assert_eq!(tagged[0].id, book.id);
}

#[tokio::test]
async fn test_mood_insights() {
    let diary = open_test_diary().await;
    let state = &diary.state;

    for (date, mood) in [
        (day(2024, 3, 1), Some(1)),
        (day(2024, 3, 2), Some(4)),
        (day(2024, 3, 3), Some(4)),
        (day(2024, 3, 4), None),
    ] {
        let mut req = NewEntry::new("Day", "", date);
        req.mood = mood;
        state.entries.create_entry(req).await.unwrap();
    }

    let summary = state.insights.mood_summary().await.unwrap();
    assert_eq!(summary.points.len(), 3);
    assert_eq!(summary.distribution.iter().sum::<usize>(), summary.points.len());
    assert_eq!(summary.distribution, [1, 0, 0, 2, 0]);
    assert_eq!(summary.average, Some(3.0));
    assert_eq!(summary.recent[0].date, day(2024, 3, 3));

    assert_eq!(state.insights.writing_streak(day(2024, 3, 4)).await.unwrap(), 4);
    assert_eq!(state.insights.marked_dates().await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_templates_seeded_once() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().to_path_buf();

    for _ in 0..2 {
        let platform = Platform {
            secure_store: Arc::new(MemorySecureStore::new()),
            biometrics: Arc::new(NoBiometrics),
            scheduler: Arc::new(RecordingScheduler::default()),
        };
        let state = AppState::open(data_dir.clone(), platform).await.unwrap();
        assert_eq!(state.templates.list_templates().await.unwrap().len(), 4);
    }
}

#[tokio::test]
async fn test_entry_from_template() {
    let diary = open_test_diary().await;
    let state = &diary.state;

    let templates = state.templates.list_templates().await.unwrap();
    let gratitude = templates
        .iter()
        .find(|t| t.name == "Gratitude Journal")
        .unwrap();

    let entry = state
        .entries
        .create_entry(NewEntry::from_template(gratitude, day(2024, 11, 28)))
        .await
        .unwrap();

    assert_eq!(entry.template_id.as_deref(), Some(gratitude.id.as_str()));
    assert_eq!(entry.content, gratitude.content);
}

#[tokio::test]
async fn test_export_writes_markdown() {
    let diary = open_test_diary().await;
    let state = &diary.state;

    state
        .entries
        .create_entry(NewEntry::new("First", "Hello diary", day(2024, 2, 29)).with_mood(3))
        .await
        .unwrap();

    let content = state
        .export
        .all_entries_to_markdown(&Utc::now())
        .await
        .unwrap();
    let path = state
        .export
        .export_to_file(&content, "export.md")
        .await
        .unwrap();

    let written = std::fs::read_to_string(path).unwrap();
    assert!(written.starts_with("# Diary Export"));
    assert!(written.contains("**Date:** February 29, 2024"));
    assert!(written.contains("**Mood:** 😐 (3/5)"));
}

#[tokio::test]
async fn test_reminder_scheduling() {
    let diary = open_test_diary().await;
    let reminders = &diary.state.reminders;

    let mut reminder = reminders.current_or_default().await.unwrap();
    assert!(!reminder.enabled);

    reminder.enabled = true;
    reminder.time = "07:15".to_string();
    reminder.days = vec![1, 3, 5];

    let first = reminders.schedule_reminder(&reminder).await;
    assert!(first.is_some());
    assert_eq!(
        *diary.scheduler.scheduled.lock().unwrap(),
        vec![(1, 7, 15), (3, 7, 15), (5, 7, 15)]
    );
    assert_eq!(reminders.get_reminder().await.unwrap(), Some(reminder.clone()));

    reminder.enabled = false;
    assert!(reminders.schedule_reminder(&reminder).await.is_none());
    assert!(diary.scheduler.scheduled.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_setup_refused_when_keyring_lost_the_pin() {
    let diary = open_test_diary().await;
    let data_dir = diary.temp.path().join("diary");

    daybook::commands::auth::ensure_setup_allowed(&diary.state)
        .await
        .unwrap();

    diary.state.auth.mark_onboarding_complete().await.unwrap();
    diary.state.auth.set_pin("2468").await.unwrap();
    diary
        .state
        .settings
        .update(|settings| settings.pin_enabled = true)
        .await
        .unwrap();
    diary
        .state
        .entries
        .create_entry(NewEntry::new("Secret", "", day(2024, 5, 5)))
        .await
        .unwrap();

    assert!(matches!(
        daybook::commands::auth::ensure_setup_allowed(&diary.state).await,
        Err(AppError::Generic(_))
    ));

    // Same diary, but the credential store came back empty
    let platform = Platform {
        secure_store: Arc::new(MemorySecureStore::new()),
        biometrics: Arc::new(NoBiometrics),
        scheduler: Arc::new(RecordingScheduler::default()),
    };
    let reopened = AppState::open(data_dir, platform).await.unwrap();

    assert_eq!(reopened.auth.launch().await.unwrap(), LaunchRoute::Onboarding);
    assert!(matches!(
        daybook::commands::auth::ensure_setup_allowed(&reopened).await,
        Err(AppError::SecureStore(_))
    ));
    assert!(!reopened.auth.is_authenticated().await);
}
