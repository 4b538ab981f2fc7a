//! Settings service
//!
//! Settings persist as key/value text rows. `AppSettings` is the typed view
//! over the known keys; missing or unparsable values fall back to defaults.

use crate::database::Repository;
use crate::error::{AppError, Result};
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

const THEME_KEY: &str = "theme";
const FONT_SIZE_KEY: &str = "fontSize";
const BIOMETRIC_ENABLED_KEY: &str = "biometricEnabled";
const PIN_ENABLED_KEY: &str = "pinEnabled";
const REMINDER_ENABLED_KEY: &str = "reminderEnabled";
const REMINDER_TIME_KEY: &str = "reminderTime";
const CLOUD_SYNC_ENABLED_KEY: &str = "cloudSyncEnabled";
const CLOUD_SYNC_PROVIDER_KEY: &str = "cloudSyncProvider";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    pub fn as_str(self) -> &'static str {
        match self {
            FontSize::Small => "small",
            FontSize::Medium => "medium",
            FontSize::Large => "large",
        }
    }
}

impl FromStr for FontSize {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "small" => Ok(FontSize::Small),
            "medium" => Ok(FontSize::Medium),
            "large" => Ok(FontSize::Large),
            other => Err(AppError::Generic(format!("Unknown font size: {}", other))),
        }
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudSyncProvider {
    Firebase,
    Supabase,
    Icloud,
    Googledrive,
}

impl CloudSyncProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            CloudSyncProvider::Firebase => "firebase",
            CloudSyncProvider::Supabase => "supabase",
            CloudSyncProvider::Icloud => "icloud",
            CloudSyncProvider::Googledrive => "googledrive",
        }
    }
}

impl FromStr for CloudSyncProvider {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "firebase" => Ok(CloudSyncProvider::Firebase),
            "supabase" => Ok(CloudSyncProvider::Supabase),
            "icloud" => Ok(CloudSyncProvider::Icloud),
            "googledrive" => Ok(CloudSyncProvider::Googledrive),
            other => Err(AppError::Generic(format!(
                "Unknown cloud sync provider: {}",
                other
            ))),
        }
    }
}

/// Typed application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub theme: Theme,
    pub font_size: FontSize,
    pub biometric_enabled: bool,
    pub pin_enabled: bool,
    pub reminder_enabled: bool,
    /// `HH:mm`
    pub reminder_time: Option<String>,
    pub cloud_sync_enabled: bool,
    pub cloud_sync_provider: Option<CloudSyncProvider>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            font_size: FontSize::Medium,
            biometric_enabled: false,
            pin_enabled: false,
            reminder_enabled: false,
            reminder_time: None,
            cloud_sync_enabled: false,
            cloud_sync_provider: None,
        }
    }
}

impl AppSettings {
    fn from_rows(rows: &HashMap<String, String>) -> Self {
        let defaults = Self::default();
        let flag = |key: &str| rows.get(key).map(String::as_str) == Some("true");

        Self {
            theme: rows
                .get(THEME_KEY)
                .map(|v| Theme::from_setting(v))
                .unwrap_or(defaults.theme),
            font_size: rows
                .get(FONT_SIZE_KEY)
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.font_size),
            biometric_enabled: flag(BIOMETRIC_ENABLED_KEY),
            pin_enabled: flag(PIN_ENABLED_KEY),
            reminder_enabled: flag(REMINDER_ENABLED_KEY),
            reminder_time: rows
                .get(REMINDER_TIME_KEY)
                .filter(|v| !v.is_empty())
                .cloned(),
            cloud_sync_enabled: flag(CLOUD_SYNC_ENABLED_KEY),
            cloud_sync_provider: rows
                .get(CLOUD_SYNC_PROVIDER_KEY)
                .and_then(|v| v.parse().ok()),
        }
    }

    fn to_rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = vec![
            (THEME_KEY, self.theme.as_str().to_string()),
            (FONT_SIZE_KEY, self.font_size.as_str().to_string()),
            (BIOMETRIC_ENABLED_KEY, self.biometric_enabled.to_string()),
            (PIN_ENABLED_KEY, self.pin_enabled.to_string()),
            (REMINDER_ENABLED_KEY, self.reminder_enabled.to_string()),
            (CLOUD_SYNC_ENABLED_KEY, self.cloud_sync_enabled.to_string()),
        ];
        if let Some(time) = &self.reminder_time {
            rows.push((REMINDER_TIME_KEY, time.clone()));
        }
        if let Some(provider) = self.cloud_sync_provider {
            rows.push((CLOUD_SYNC_PROVIDER_KEY, provider.as_str().to_string()));
        }
        rows
    }
}

/// Service for managing settings
#[derive(Clone)]
pub struct SettingsService {
    repo: Repository,
}

impl SettingsService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    pub async fn get_setting(&self, key: &str) -> Result<Option<String>> {
        self.repo.get_setting(key).await
    }

    pub async fn save_setting(&self, key: &str, value: &str) -> Result<()> {
        self.repo.set_setting(key, value).await
    }

    pub async fn all_settings(&self) -> Result<HashMap<String, String>> {
        self.repo.all_settings().await
    }

    /// Load typed settings, falling back to defaults for missing keys
    pub async fn load(&self) -> Result<AppSettings> {
        let rows = self.repo.all_settings().await?;
        Ok(AppSettings::from_rows(&rows))
    }

    /// Persist every known setting
    pub async fn save(&self, settings: &AppSettings) -> Result<()> {
        for (key, value) in settings.to_rows() {
            self.repo.set_setting(key, &value).await?;
        }

        tracing::info!("Settings saved");
        Ok(())
    }

    /// Load, modify and save in one step
    pub async fn update<F>(&self, modify: F) -> Result<AppSettings>
    where
        F: FnOnce(&mut AppSettings),
    {
        let mut settings = self.load().await?;
        modify(&mut settings);
        self.save(&settings).await?;
        Ok(settings)
    }
}
