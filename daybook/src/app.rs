//! Application state and initialization
//!
//! This module manages the central application state and lifecycle.
//! All services are initialized here and made available through AppState.

use crate::config::{EXPORT_DIR_NAME, MEDIA_DIR_NAME};
use crate::database::{self, Repository};
use crate::error::Result;
use crate::platform::Biometrics;
use crate::services::{
    AuthService, EntriesService, ExportService, InsightsService, MediaService,
    NotificationScheduler, RemindersService, SearchService, SettingsService, StatsService,
    TagsService, TemplatesService,
};
use crate::storage::{BlobStore, SecureStore};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Host capabilities the core depends on
#[derive(Clone)]
pub struct Platform {
    pub secure_store: Arc<dyn SecureStore>,
    pub biometrics: Arc<dyn Biometrics>,
    pub scheduler: Arc<dyn NotificationScheduler>,
}

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub data_dir: PathBuf,
    pub auth: AuthService,
    pub entries: EntriesService,
    pub search: SearchService,
    pub tags: TagsService,
    pub media: MediaService,
    pub templates: TemplatesService,
    pub stats: StatsService,
    pub reminders: RemindersService,
    pub settings: SettingsService,
    pub insights: InsightsService,
    pub export: ExportService,
}

impl AppState {
    /// Open (or create) the diary stored in `data_dir`
    pub async fn open(data_dir: PathBuf, platform: Platform) -> Result<Self> {
        tracing::info!("Initializing application");
        tracing::info!("Data directory: {:?}", data_dir);

        let pool = database::open_diary(&data_dir).await?;

        let state = Self::with_pool(pool, data_dir, platform).await?;

        tracing::info!("Application initialized successfully");
        Ok(state)
    }

    /// Build the services over an existing, migrated pool
    pub async fn with_pool(pool: SqlitePool, data_dir: PathBuf, platform: Platform) -> Result<Self> {
        let repo = Repository::new(pool);

        let blob_store = BlobStore::new(data_dir.join(MEDIA_DIR_NAME));
        blob_store.initialize().await?;

        let media = MediaService::new(repo.clone(), blob_store);
        let templates = TemplatesService::new(repo.clone());

        if let Err(e) = templates.initialize_templates().await {
            tracing::error!("Error initializing templates: {}", e);
        }

        Ok(Self {
            auth: AuthService::new(platform.secure_store, platform.biometrics),
            entries: EntriesService::new(repo.clone(), media.clone()),
            search: SearchService::new(repo.clone()),
            tags: TagsService::new(repo.clone()),
            media,
            templates,
            stats: StatsService::new(repo.clone()),
            reminders: RemindersService::new(repo.clone(), platform.scheduler),
            settings: SettingsService::new(repo.clone()),
            insights: InsightsService::new(repo.clone()),
            export: ExportService::new(repo, data_dir.join(EXPORT_DIR_NAME)),
            data_dir,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
