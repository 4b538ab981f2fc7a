//! Settings, theme and reminder commands

use crate::app::AppState;
use crate::cli::{ReminderCommand, SchemeArg, SettingsCommand};
use crate::database::Reminder;
use crate::error::{AppError, Result};
use crate::theme::{palette, ColorScheme, Theme};

pub async fn settings(state: &AppState, command: Option<SettingsCommand>) -> Result<()> {
    match command.unwrap_or(SettingsCommand::Show) {
        SettingsCommand::Show => {
            let settings = state.settings.load().await?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        SettingsCommand::Set { key, value } => {
            state.settings.save_setting(&key, &value).await?;
            println!("{} = {}", key, value);
        }
    }
    Ok(())
}

pub async fn theme(state: &AppState, name: Option<String>, system: SchemeArg) -> Result<()> {
    let theme = match name {
        Some(name) => {
            let theme = parse_theme(&name)?;
            state.settings.update(|settings| settings.theme = theme).await?;
            theme
        }
        None => state.settings.load().await?.theme,
    };

    let system = match system {
        SchemeArg::Light => ColorScheme::Light,
        SchemeArg::Dark => ColorScheme::Dark,
    };
    let colors = palette(theme, system);

    println!("Theme: {} ({})", theme, theme.resolve(system));
    println!("  primary     {}", colors.primary);
    println!("  background  {}", colors.background);
    println!("  foreground  {}", colors.foreground);
    println!("  accent      {}", colors.accent);
    println!("  moods       {}", colors.mood.join(" "));
    Ok(())
}

pub async fn reminder(state: &AppState, command: ReminderCommand) -> Result<()> {
    match command {
        ReminderCommand::Show => {
            let reminder = state.reminders.current_or_default().await?;
            print_reminder(&reminder);
        }
        ReminderCommand::Set { time, days } => {
            let current = state.reminders.current_or_default().await?;
            let reminder = Reminder {
                id: current.id,
                enabled: true,
                time,
                days: if days.is_empty() {
                    (0..=6).collect()
                } else {
                    days
                },
            };
            state.reminders.save_reminder(&reminder).await?;
            state.reminders.schedule_reminder(&reminder).await;
            state
                .settings
                .update(|settings| {
                    settings.reminder_enabled = true;
                    settings.reminder_time = Some(reminder.time.clone());
                })
                .await?;

            print_reminder(&reminder);
            println!("Run `daybook reminder watch` to receive notifications");
        }
        ReminderCommand::Off => {
            let reminder = Reminder {
                enabled: false,
                ..state.reminders.current_or_default().await?
            };

            state.reminders.save_reminder(&reminder).await?;
            state.reminders.schedule_reminder(&reminder).await;
            state
                .settings
                .update(|settings| settings.reminder_enabled = false)
                .await?;

            println!("Reminder disabled");
        }
        ReminderCommand::Watch => watch(state).await?,
    }
    Ok(())
}

/// Deliver reminders until the process is interrupted
async fn watch(state: &AppState) -> Result<()> {
    let reminder = state.reminders.current_or_default().await?;
    if state.reminders.schedule_reminder(&reminder).await.is_none() {
        println!("Reminder is disabled, nothing to watch");
        return Ok(());
    }

    state.reminders.start_scheduler().await?;
    print_reminder(&reminder);
    println!("Waiting for reminders, press Ctrl+C to stop");

    tokio::signal::ctrl_c().await?;

    state.reminders.cancel_reminders().await?;
    tracing::info!("Reminder watcher stopped");
    Ok(())
}

fn parse_theme(name: &str) -> Result<Theme> {
    let wanted = name.trim().to_lowercase();
    Theme::ALL
        .into_iter()
        .find(|theme| theme.as_str() == wanted)
        .ok_or_else(|| AppError::Generic(format!("Unknown theme: {}", name)))
}

fn print_reminder(reminder: &Reminder) {
    const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

    let days: Vec<&str> = reminder
        .days
        .iter()
        .filter_map(|day| DAY_NAMES.get(usize::from(*day)).copied())
        .collect();

    println!(
        "Reminder {} at {} on {}",
        if reminder.enabled { "on" } else { "off" },
        reminder.time,
        days.join(", ")
    );
}
