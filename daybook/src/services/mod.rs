//! Services module
//!
//! Business logic services that coordinate between commands and repository.

pub mod auth;
pub mod entries;
pub mod export;
pub mod insights;
pub mod media;
pub mod reminders;
pub mod scheduler;
pub mod search;
pub mod settings;
pub mod stats;
pub mod tags;
pub mod templates;

pub use auth::{AuthService, AuthState, LaunchRoute};
pub use entries::EntriesService;
pub use export::ExportService;
pub use insights::{InsightsService, MoodPoint, MoodSummary, TimelineDay};
pub use media::MediaService;
pub use reminders::RemindersService;
pub use scheduler::{CronNotificationScheduler, NotificationScheduler};
pub use search::SearchService;
pub use settings::{AppSettings, CloudSyncProvider, FontSize, SettingsService};
pub use stats::StatsService;
pub use tags::TagsService;
pub use templates::TemplatesService;
