//! Biometric authentication
//!
//! Fingerprint / face prompts are provided by the OS. The diary only needs
//! to know whether they can be used and whether a prompt succeeded.

use crate::error::Result;
use async_trait::async_trait;

/// Text shown on the platform biometric prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BiometricPrompt {
    pub message: String,
    pub fallback_label: String,
    pub cancel_label: String,
}

impl Default for BiometricPrompt {
    fn default() -> Self {
        Self {
            message: "Authenticate to access your diary".to_string(),
            fallback_label: "Use PIN".to_string(),
            cancel_label: "Cancel".to_string(),
        }
    }
}

/// Host biometric capability
#[async_trait]
pub trait Biometrics: Send + Sync {
    /// Whether the device has biometric hardware
    async fn has_hardware(&self) -> Result<bool>;

    /// Whether the user has enrolled at least one biometric
    async fn is_enrolled(&self) -> Result<bool>;

    /// Show the prompt; `Ok(false)` means the user failed or cancelled
    async fn authenticate(&self, prompt: &BiometricPrompt) -> Result<bool>;

    /// Biometrics can only be offered when hardware is present and enrolled
    async fn is_available(&self) -> Result<bool> {
        Ok(self.has_hardware().await? && self.is_enrolled().await?)
    }
}

/// Host without biometric hardware (terminals, servers)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBiometrics;

#[async_trait]
impl Biometrics for NoBiometrics {
    async fn has_hardware(&self) -> Result<bool> {
        Ok(false)
    }

    async fn is_enrolled(&self) -> Result<bool> {
        Ok(false)
    }

    async fn authenticate(&self, _prompt: &BiometricPrompt) -> Result<bool> {
        tracing::debug!("Biometric prompt requested on a host without biometrics");
        Ok(false)
    }
}
