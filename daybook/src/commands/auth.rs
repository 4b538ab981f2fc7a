//! Setup, PIN, biometric and session commands

use super::prompt_secret;
use crate::app::AppState;
use crate::cli::PinCommand;
use crate::error::{AppError, Result};

/// Complete onboarding, choose a PIN and open a session
pub async fn setup(state: &AppState) -> Result<()> {
    ensure_setup_allowed(state).await?;

    let pin = prompt_new_pin()?;

    state.auth.mark_onboarding_complete().await?;
    state.auth.set_pin(&pin).await?;
    state.auth.authenticate_with_pin(&pin).await?;
    state
        .settings
        .update(|settings| settings.pin_enabled = true)
        .await?;

    println!("Diary ready at {}", state.data_dir().display());
    Ok(())
}

/// Refuse setup when a PIN exists, or when the diary records one that the
/// secure store has lost.
pub async fn ensure_setup_allowed(state: &AppState) -> Result<()> {
    state.auth.check_auth().await;
    if state.auth.state().await.pin_enabled {
        return Err(AppError::Generic(
            "A PIN is already set, use `daybook pin change` to replace it".to_string(),
        ));
    }

    if state.settings.load().await?.pin_enabled {
        tracing::warn!("Diary records a PIN but the secure store has none");
        return Err(AppError::SecureStore(
            "This diary is PIN protected but its credentials are missing from the system \
             keyring. Restore your keyring before opening it"
                .to_string(),
        ));
    }

    Ok(())
}

pub async fn pin(state: &AppState, command: PinCommand) -> Result<()> {
    match command {
        PinCommand::Set => {
            let pin = prompt_new_pin()?;
            state.auth.set_pin(&pin).await?;
            state
                .settings
                .update(|settings| settings.pin_enabled = true)
                .await?;
            println!("PIN set");
        }
        PinCommand::Change => {
            let current = prompt_secret("Current PIN: ")?;
            let pin = prompt_new_pin()?;
            state.auth.change_pin(&current, &pin).await?;
            println!("PIN changed");
        }
        PinCommand::Remove => {
            let current = prompt_secret("Current PIN: ")?;
            state.auth.remove_pin(&current).await?;
            state
                .settings
                .update(|settings| settings.pin_enabled = false)
                .await?;
            println!("PIN removed");
        }
    }
    Ok(())
}

pub async fn biometric(state: &AppState, enabled: bool) -> Result<()> {
    if enabled && !state.auth.state().await.is_biometric_available {
        eprintln!("Biometric hardware is not available on this device");
    }

    state.auth.set_biometric_enabled(enabled).await?;
    state
        .settings
        .update(|settings| settings.biometric_enabled = enabled)
        .await?;

    println!(
        "Biometric unlock {}",
        if enabled { "enabled" } else { "disabled" }
    );
    Ok(())
}

pub async fn logout(state: &AppState) -> Result<()> {
    state.auth.logout().await?;
    println!("Logged out");
    Ok(())
}

fn prompt_new_pin() -> Result<String> {
    let first = prompt_secret("New PIN (4-6 digits): ")?;
    crate::services::auth::validate_pin(&first)?;

    let second = prompt_secret("Re-enter PIN: ")?;
    if first != second {
        return Err(AppError::InvalidPin("PINs do not match".to_string()));
    }

    Ok(first)
}
