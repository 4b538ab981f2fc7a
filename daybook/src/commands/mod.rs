//! Command handlers for the `daybook` binary
//!
//! This module organizes handlers into logical submodules:
//! - `auth`: Setup, PIN, biometric and session commands
//! - `entries`: Entries, search, tags, templates and media
//! - `insights`: Calendar, timeline, mood, streak, stats and export
//! - `settings`: Settings, theme and reminders
//!
//! Every command except setup, logout and the reminder watcher runs behind
//! the auth gate.

pub mod auth;
pub mod entries;
pub mod insights;
pub mod settings;

use crate::app::AppState;
use crate::cli::{Command, ReminderCommand};
use crate::config::MAX_PIN_ATTEMPTS;
use crate::error::{AppError, Result};
use crate::services::LaunchRoute;

/// Run one parsed command against the diary
pub async fn run(state: &AppState, command: Command) -> Result<()> {
    if requires_unlock(&command) {
        unlock(state).await?;
    }

    match command {
        Command::Setup => auth::setup(state).await,
        Command::Pin { command } => auth::pin(state, command).await,
        Command::Biometric { enabled } => auth::biometric(state, enabled).await,
        Command::Logout => auth::logout(state).await,

        Command::Entry { command } => entries::entry(state, command).await,
        Command::Search {
            query,
            from,
            to,
            mood,
            tags,
        } => entries::search(state, query, from, to, mood, tags).await,
        Command::Tag { command } => entries::tag(state, command).await,
        Command::Template { command } => entries::template(state, command).await,
        Command::Media { command } => entries::media(state, command).await,

        Command::Calendar => insights::calendar(state).await,
        Command::Timeline => insights::timeline(state).await,
        Command::Mood => insights::mood(state).await,
        Command::Streak => insights::streak(state).await,
        Command::Stats => insights::stats(state).await,
        Command::Export { output } => insights::export(state, output).await,

        Command::Settings { command } => settings::settings(state, command).await,
        Command::Theme { name, system } => settings::theme(state, name, system).await,
        Command::Reminder { command } => settings::reminder(state, command).await,
    }
}

fn requires_unlock(command: &Command) -> bool {
    !matches!(
        command,
        Command::Setup
            | Command::Logout
            | Command::Reminder {
                command: ReminderCommand::Watch
            }
    )
}

/// Pass the launch checks, prompting for credentials when no session is live
async fn unlock(state: &AppState) -> Result<()> {
    match state.auth.launch().await? {
        LaunchRoute::Home => Ok(()),
        LaunchRoute::Onboarding | LaunchRoute::Setup => {
            auth::ensure_setup_allowed(state).await?;
            Err(AppError::Generic(
                "Diary is not set up yet, run `daybook setup` first".to_string(),
            ))
        }
        LaunchRoute::Login => login(state).await,
    }
}

async fn login(state: &AppState) -> Result<()> {
    let auth_state = state.auth.state().await;
    if auth_state.is_biometric_enabled && auth_state.is_biometric_available {
        match state.auth.authenticate_with_biometric().await {
            Ok(true) => return Ok(()),
            Ok(false) => eprintln!("Biometric check failed, falling back to PIN"),
            Err(e) => tracing::warn!("Biometric authentication error: {}", e),
        }
    }

    for attempt in 1..=MAX_PIN_ATTEMPTS {
        let pin = prompt_secret("Enter PIN: ")?;
        if state.auth.authenticate_with_pin(&pin).await? {
            return Ok(());
        }
        eprintln!("Incorrect PIN ({}/{})", attempt, MAX_PIN_ATTEMPTS);
    }

    Err(AppError::InvalidPin(
        "Too many incorrect attempts".to_string(),
    ))
}

/// Read a secret from the terminal without echo
pub(crate) fn prompt_secret(prompt: &str) -> Result<String> {
    let value = rpassword::prompt_password(prompt)?;
    Ok(value.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{EntryCommand, PinCommand};

    #[test]
    fn test_requires_unlock() {
        assert!(!requires_unlock(&Command::Setup));
        assert!(!requires_unlock(&Command::Logout));
        assert!(!requires_unlock(&Command::Reminder {
            command: ReminderCommand::Watch
        }));

        assert!(requires_unlock(&Command::Reminder {
            command: ReminderCommand::Show
        }));
        assert!(requires_unlock(&Command::Pin {
            command: PinCommand::Change
        }));
        assert!(requires_unlock(&Command::Entry {
            command: EntryCommand::List { date: None }
        }));
    }
}
