//! Platform collaborators
//!
//! Capabilities the diary consumes from the host device without owning
//! them: biometric prompts and user-visible notifications. Each one is a
//! trait so the services can be driven by real platform bindings, the
//! defaults shipped here, or test doubles.

pub mod biometrics;
pub mod notifier;

pub use biometrics::{BiometricPrompt, Biometrics, NoBiometrics};
pub use notifier::{LogNotifier, Notification, Notifier};
