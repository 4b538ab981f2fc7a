//! Reminders service
//!
//! Persists the writing reminder and keeps the platform schedule in sync
//! with it: one weekly notification per selected weekday.

use crate::config::{DEFAULT_REMINDER_TIME, REMINDER_BODY, REMINDER_TITLE};
use crate::database::{Reminder, Repository};
use crate::error::{AppError, Result};
use crate::platform::Notification;
use crate::services::NotificationScheduler;
use chrono::{NaiveTime, Timelike};
use std::sync::Arc;

/// Id of the reminder row created on first save
pub const DEFAULT_REMINDER_ID: &str = "daily-reminder";

/// Parse an `HH:mm` time into hour and minute
pub fn parse_reminder_time(time: &str) -> Result<(u32, u32)> {
    let parsed = NaiveTime::parse_from_str(time.trim(), "%H:%M")
        .map_err(|_| AppError::InvalidReminder(format!("Invalid time '{}', expected HH:mm", time)))?;

    Ok((parsed.hour(), parsed.minute()))
}

/// Check time format and weekday range
pub fn validate_reminder(reminder: &Reminder) -> Result<()> {
    parse_reminder_time(&reminder.time)?;

    if let Some(day) = reminder.days.iter().find(|d| **d > 6) {
        return Err(AppError::InvalidReminder(format!(
            "Invalid weekday {}, expected 0 (Sunday) to 6 (Saturday)",
            day
        )));
    }

    Ok(())
}

/// Service for the writing reminder
#[derive(Clone)]
pub struct RemindersService {
    repo: Repository,
    scheduler: Arc<dyn NotificationScheduler>,
}

impl RemindersService {
    pub fn new(repo: Repository, scheduler: Arc<dyn NotificationScheduler>) -> Self {
        Self { repo, scheduler }
    }

    pub async fn get_reminder(&self) -> Result<Option<Reminder>> {
        self.repo.get_reminder().await
    }

    /// Stored reminder, or a disabled 20:00 every-day reminder
    pub async fn current_or_default(&self) -> Result<Reminder> {
        Ok(self.repo.get_reminder().await?.unwrap_or_else(|| Reminder {
            id: DEFAULT_REMINDER_ID.to_string(),
            enabled: false,
            time: DEFAULT_REMINDER_TIME.to_string(),
            days: (0..=6).collect(),
        }))
    }

    pub async fn save_reminder(&self, reminder: &Reminder) -> Result<()> {
        validate_reminder(reminder)?;
        self.repo.save_reminder(reminder).await
    }

    /// Reschedule notifications for a reminder and persist it.
    ///
    /// Returns the first schedule id, or `None` when the reminder is
    /// disabled, has no days, or scheduling failed.
    pub async fn schedule_reminder(&self, reminder: &Reminder) -> Option<String> {
        match self.try_schedule(reminder).await {
            Ok(id) => id,
            Err(e) => {
                tracing::error!("Error scheduling reminder: {}", e);
                None
            }
        }
    }

    async fn try_schedule(&self, reminder: &Reminder) -> Result<Option<String>> {
        if !self.scheduler.request_permissions().await? {
            tracing::warn!("Notification permission denied");
            return Ok(None);
        }

        if reminder.enabled {
            validate_reminder(reminder)?;
        }

        self.scheduler.cancel_all().await?;

        if !reminder.enabled {
            tracing::info!("Reminders disabled");
            return Ok(None);
        }

        let (hour, minute) = parse_reminder_time(&reminder.time)?;
        let notification = Notification::new(REMINDER_TITLE, REMINDER_BODY);

        let mut schedule_ids = Vec::with_capacity(reminder.days.len());
        for day in &reminder.days {
            schedule_ids.push(
                self.scheduler
                    .schedule_weekly(*day, hour, minute, &notification)
                    .await?,
            );
        }

        self.repo.save_reminder(reminder).await?;

        tracing::info!(
            "Reminder scheduled at {} on {} day(s)",
            reminder.time,
            schedule_ids.len()
        );

        Ok(schedule_ids.into_iter().next())
    }

    pub async fn cancel_reminders(&self) -> Result<()> {
        self.scheduler.cancel_all().await
    }

    /// Start delivering notifications for whatever is scheduled
    pub async fn start_scheduler(&self) -> Result<()> {
        self.scheduler.start().await
    }
}
