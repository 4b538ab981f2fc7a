//! Notification scheduling
//!
//! `NotificationScheduler` is the platform seam for repeating local
//! notifications. `CronNotificationScheduler` runs weekly cron jobs on
//! local time and hands each notification to a `Notifier`.

use crate::error::{AppError, Result};
use crate::platform::{Notification, Notifier};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_cron_scheduler::{Job, JobScheduler};
use uuid::Uuid;

/// Schedules repeating local notifications
#[async_trait]
pub trait NotificationScheduler: Send + Sync {
    /// Ask the user for permission to show notifications
    async fn request_permissions(&self) -> Result<bool> {
        Ok(true)
    }

    /// Repeat a notification every week.
    ///
    /// `weekday` is 0 (Sunday) to 6 (Saturday); returns the schedule id.
    async fn schedule_weekly(
        &self,
        weekday: u8,
        hour: u32,
        minute: u32,
        notification: &Notification,
    ) -> Result<String>;

    /// Cancel everything scheduled so far
    async fn cancel_all(&self) -> Result<()>;

    /// Begin delivering scheduled notifications
    async fn start(&self) -> Result<()> {
        Ok(())
    }
}

const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Cron expression (with seconds) firing weekly at `hour:minute`
pub fn weekly_cron(weekday: u8, hour: u32, minute: u32) -> Result<String> {
    let day = WEEKDAY_NAMES
        .get(usize::from(weekday))
        .ok_or_else(|| AppError::InvalidReminder(format!("Invalid weekday: {}", weekday)))?;

    if hour > 23 || minute > 59 {
        return Err(AppError::InvalidReminder(format!(
            "Invalid time: {:02}:{:02}",
            hour, minute
        )));
    }

    Ok(format!("0 {} {} * * {}", minute, hour, day))
}

/// Scheduler backed by `tokio-cron-scheduler`
pub struct CronNotificationScheduler {
    scheduler: Arc<RwLock<JobScheduler>>,
    notifier: Arc<dyn Notifier>,
    job_ids: Arc<RwLock<Vec<Uuid>>>,
}

impl CronNotificationScheduler {
    pub async fn new(notifier: Arc<dyn Notifier>) -> Result<Self> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::Scheduler(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self {
            scheduler: Arc::new(RwLock::new(scheduler)),
            notifier,
            job_ids: Arc::new(RwLock::new(Vec::new())),
        })
    }

    /// Number of jobs currently scheduled
    pub async fn job_count(&self) -> usize {
        self.job_ids.read().await.len()
    }

    /// Shutdown scheduler gracefully
    pub async fn shutdown(&self) -> Result<()> {
        let mut scheduler = self.scheduler.write().await;
        scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::Scheduler(format!("Failed to shutdown scheduler: {}", e)))?;
        tracing::info!("Reminder scheduler shutdown");
        Ok(())
    }
}

#[async_trait]
impl NotificationScheduler for CronNotificationScheduler {
    async fn start(&self) -> Result<()> {
        let scheduler = self.scheduler.read().await;
        scheduler
            .start()
            .await
            .map_err(|e| AppError::Scheduler(format!("Failed to start scheduler: {}", e)))?;
        tracing::info!("Reminder scheduler started");
        Ok(())
    }

    async fn schedule_weekly(
        &self,
        weekday: u8,
        hour: u32,
        minute: u32,
        notification: &Notification,
    ) -> Result<String> {
        let cron_expr = weekly_cron(weekday, hour, minute)?;
        let notifier = Arc::clone(&self.notifier);
        let notification = notification.clone();

        let job = Job::new_async_tz(cron_expr.as_str(), chrono::Local, move |_uuid, _l| {
            let notifier = Arc::clone(&notifier);
            let notification = notification.clone();
            Box::pin(async move {
                if let Err(e) = notifier.notify(&notification) {
                    tracing::error!("Failed to deliver reminder: {}", e);
                }
            })
        })
        .map_err(|e| AppError::Scheduler(format!("Failed to create reminder job: {}", e)))?;

        let job_id = job.guid();

        // Lock order matches cancel_all: job ids, then scheduler
        let mut job_ids = self.job_ids.write().await;
        self.scheduler
            .read()
            .await
            .add(job)
            .await
            .map_err(|e| AppError::Scheduler(format!("Failed to schedule job: {}", e)))?;
        job_ids.push(job_id);

        tracing::debug!("Reminder scheduled: {} ({})", job_id, cron_expr);
        Ok(job_id.to_string())
    }

    async fn cancel_all(&self) -> Result<()> {
        let mut job_ids = self.job_ids.write().await;
        if job_ids.is_empty() {
            return Ok(());
        }

        let scheduler = self.scheduler.read().await;
        for job_id in job_ids.drain(..) {
            scheduler
                .remove(&job_id)
                .await
                .map_err(|e| AppError::Scheduler(format!("Failed to remove job: {}", e)))?;
        }

        tracing::info!("Scheduled reminders cancelled");
        Ok(())
    }
}
