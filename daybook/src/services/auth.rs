//! Session/auth gate
//!
//! Guards entry into the diary. On launch the gate checks the onboarding
//! flag, loads the PIN and biometric flags, then tries to resume a session
//! persisted within the last 24 hours before asking for a PIN or biometric
//! prompt. Every successful authentication writes a fresh session record;
//! logout deletes it.

use crate::config::{MAX_PIN_LENGTH, MIN_PIN_LENGTH, SESSION_TIMEOUT_HOURS};
use crate::crypto;
use crate::error::{AppError, Result};
use crate::platform::{BiometricPrompt, Biometrics};
use crate::storage::SecureStore;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

pub const PIN_KEY: &str = "diary_pin";
pub const BIOMETRIC_ENABLED_KEY: &str = "biometric_enabled";
pub const ONBOARDING_KEY: &str = "onboarding_completed";
pub const SESSION_KEY: &str = "auth_session";

/// Persisted on successful authentication
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Unix epoch milliseconds
    pub timestamp: i64,
}

impl SessionRecord {
    pub fn at(time: DateTime<Utc>) -> Self {
        Self {
            timestamp: time.timestamp_millis(),
        }
    }

    /// Valid while `0 <= now - timestamp < 24h`
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        let Some(created) = Utc.timestamp_millis_opt(self.timestamp).single() else {
            return false;
        };
        let age = now - created;
        age >= Duration::zero() && age < Duration::hours(SESSION_TIMEOUT_HOURS)
    }
}

/// In-memory view of the gate, shared by every screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub is_biometric_available: bool,
    pub is_biometric_enabled: bool,
    pub pin_enabled: bool,
    pub is_loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            is_authenticated: false,
            is_biometric_available: false,
            is_biometric_enabled: false,
            pin_enabled: false,
            is_loading: true,
        }
    }
}

/// Where the user lands after the launch checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LaunchRoute {
    /// Onboarding has never been completed
    Onboarding,
    /// No PIN has been set up yet
    Setup,
    /// A PIN exists but there is no valid session
    Login,
    /// A session was resumed
    Home,
}

/// Reject PINs that are not 4-6 ASCII digits
pub fn validate_pin(pin: &str) -> Result<()> {
    if pin.len() < MIN_PIN_LENGTH {
        return Err(AppError::InvalidPin(format!(
            "PIN must be at least {} digits",
            MIN_PIN_LENGTH
        )));
    }
    if pin.len() > MAX_PIN_LENGTH {
        return Err(AppError::InvalidPin(format!(
            "PIN must be at most {} digits",
            MAX_PIN_LENGTH
        )));
    }
    if !pin.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::InvalidPin("PIN must contain only digits".to_string()));
    }
    Ok(())
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn SecureStore>,
    biometrics: Arc<dyn Biometrics>,
    state: Arc<RwLock<AuthState>>,
}

impl AuthService {
    pub fn new(store: Arc<dyn SecureStore>, biometrics: Arc<dyn Biometrics>) -> Self {
        Self {
            store,
            biometrics,
            state: Arc::new(RwLock::new(AuthState::default())),
        }
    }

    /// Snapshot of the current auth state
    pub async fn state(&self) -> AuthState {
        self.state.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated
    }

    // ===== Onboarding =====

    pub async fn check_onboarding(&self) -> Result<bool> {
        Ok(self.store.get(ONBOARDING_KEY)?.as_deref() == Some("true"))
    }

    pub async fn mark_onboarding_complete(&self) -> Result<()> {
        self.store.set(ONBOARDING_KEY, "true")?;
        tracing::info!("Onboarding marked complete");
        Ok(())
    }

    // ===== Capability checks =====

    /// Load PIN/biometric flags and biometric availability into the state.
    ///
    /// Failures are logged; the state always leaves the loading phase.
    pub async fn check_auth(&self) {
        match self.load_capabilities().await {
            Ok((pin_enabled, is_biometric_enabled, is_biometric_available)) => {
                let mut state = self.state.write().await;
                state.pin_enabled = pin_enabled;
                state.is_biometric_enabled = is_biometric_enabled;
                state.is_biometric_available = is_biometric_available;
                state.is_loading = false;
                tracing::debug!(
                    "Auth capabilities: pin={}, biometric enabled={}, available={}",
                    pin_enabled,
                    is_biometric_enabled,
                    is_biometric_available
                );
            }
            Err(e) => {
                tracing::error!("Error checking auth: {}", e);
                self.state.write().await.is_loading = false;
            }
        }
    }

    async fn load_capabilities(&self) -> Result<(bool, bool, bool)> {
        let pin_enabled = self.store.get(PIN_KEY)?.is_some();
        let biometric_enabled = self.store.get(BIOMETRIC_ENABLED_KEY)?.as_deref() == Some("true");
        let biometric_available = self.biometrics.is_available().await?;
        Ok((pin_enabled, biometric_enabled, biometric_available))
    }

    // ===== Sessions =====

    /// Resume a session persisted within the last 24 hours
    pub async fn try_auto_authenticate(&self) -> bool {
        self.try_auto_authenticate_at(Utc::now()).await
    }

    /// Same as [`try_auto_authenticate`](Self::try_auto_authenticate) with an explicit clock
    pub async fn try_auto_authenticate_at(&self, now: DateTime<Utc>) -> bool {
        let record = match self.read_session() {
            Ok(Some(record)) => record,
            Ok(None) => return false,
            Err(e) => {
                tracing::warn!("Ignoring unreadable session record: {}", e);
                return false;
            }
        };

        if record.is_valid_at(now) {
            self.state.write().await.is_authenticated = true;
            tracing::info!("Session resumed");
            return true;
        }

        tracing::info!("Session expired, manual authentication required");
        if let Err(e) = self.store.delete(SESSION_KEY) {
            tracing::warn!("Failed to remove expired session: {}", e);
        }
        false
    }

    fn read_session(&self) -> Result<Option<SessionRecord>> {
        match self.store.get(SESSION_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn start_session(&self) -> Result<()> {
        let record = serde_json::to_string(&SessionRecord::at(Utc::now()))?;
        self.store.set(SESSION_KEY, &record)?;
        self.state.write().await.is_authenticated = true;
        Ok(())
    }

    /// End the session; the next launch asks for a PIN again
    pub async fn logout(&self) -> Result<()> {
        self.store.delete(SESSION_KEY)?;
        self.state.write().await.is_authenticated = false;
        tracing::info!("Logged out");
        Ok(())
    }

    // ===== Challenges =====

    pub async fn authenticate_with_pin(&self, pin: &str) -> Result<bool> {
        let Some(stored) = self.store.get(PIN_KEY)? else {
            tracing::warn!("PIN authentication attempted with no PIN set");
            return Ok(false);
        };

        if !crypto::verify_pin(pin, &stored)? {
            tracing::info!("PIN authentication failed");
            return Ok(false);
        }

        self.start_session().await?;
        tracing::info!("Authenticated with PIN");
        Ok(true)
    }

    pub async fn authenticate_with_biometric(&self) -> Result<bool> {
        let state = self.state().await;
        if !(state.is_biometric_enabled && state.is_biometric_available) {
            tracing::debug!("Biometric authentication not enabled or unavailable");
            return Ok(false);
        }

        if !self
            .biometrics
            .authenticate(&BiometricPrompt::default())
            .await?
        {
            tracing::info!("Biometric authentication failed");
            return Ok(false);
        }

        self.start_session().await?;
        tracing::info!("Authenticated with biometrics");
        Ok(true)
    }

    // ===== Credentials =====

    pub async fn set_pin(&self, pin: &str) -> Result<()> {
        validate_pin(pin)?;

        let hash = crypto::hash_pin(pin)?;
        self.store.set(PIN_KEY, &hash)?;
        self.state.write().await.pin_enabled = true;

        tracing::info!("PIN set");
        Ok(())
    }

    /// Replace the PIN after verifying the current one
    pub async fn change_pin(&self, current: &str, new_pin: &str) -> Result<()> {
        self.verify_current_pin(current)?;
        self.set_pin(new_pin).await
    }

    /// Remove the PIN after verifying it
    pub async fn remove_pin(&self, current: &str) -> Result<()> {
        self.verify_current_pin(current)?;

        self.store.delete(PIN_KEY)?;
        self.state.write().await.pin_enabled = false;

        tracing::info!("PIN removed");
        Ok(())
    }

    fn verify_current_pin(&self, current: &str) -> Result<()> {
        let stored = self
            .store
            .get(PIN_KEY)?
            .ok_or_else(|| AppError::InvalidPin("No PIN is set".to_string()))?;

        if !crypto::verify_pin(current, &stored)? {
            return Err(AppError::InvalidPin("Current PIN is incorrect".to_string()));
        }
        Ok(())
    }

    pub async fn set_biometric_enabled(&self, enabled: bool) -> Result<()> {
        self.store
            .set(BIOMETRIC_ENABLED_KEY, if enabled { "true" } else { "false" })?;
        self.state.write().await.is_biometric_enabled = enabled;

        tracing::info!("Biometric authentication enabled: {}", enabled);
        Ok(())
    }

    // ===== Launch =====

    /// Run the launch checks in order and decide where the user lands
    pub async fn launch(&self) -> Result<LaunchRoute> {
        if !self.check_onboarding().await? {
            return Ok(LaunchRoute::Onboarding);
        }

        self.check_auth().await;

        if self.try_auto_authenticate().await {
            return Ok(LaunchRoute::Home);
        }

        if self.state.read().await.pin_enabled {
            Ok(LaunchRoute::Login)
        } else {
            Ok(LaunchRoute::Setup)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::NoBiometrics;
    use crate::storage::MemorySecureStore;
    use async_trait::async_trait;

    struct FakeBiometrics {
        available: bool,
        succeeds: bool,
    }

    #[async_trait]
    impl Biometrics for FakeBiometrics {
        async fn has_hardware(&self) -> Result<bool> {
            Ok(self.available)
        }

        async fn is_enrolled(&self) -> Result<bool> {
            Ok(self.available)
        }

        async fn authenticate(&self, _prompt: &BiometricPrompt) -> Result<bool> {
            Ok(self.succeeds)
        }
    }

    fn create_test_service() -> (AuthService, MemorySecureStore) {
        let store = MemorySecureStore::new();
        let service = AuthService::new(Arc::new(store.clone()), Arc::new(NoBiometrics));
        (service, store)
    }

    fn write_session(store: &MemorySecureStore, at: DateTime<Utc>) {
        let raw = serde_json::to_string(&SessionRecord::at(at)).unwrap();
        store.set(SESSION_KEY, &raw).unwrap();
    }

    #[tokio::test]
    async fn test_pin_roundtrip() {
        let (service, _store) = create_test_service();

        service.set_pin("2468").await.unwrap();

        assert!(service.authenticate_with_pin("2468").await.unwrap());
        assert!(service.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_wrong_pin_fails() {
        let (service, store) = create_test_service();

        service.set_pin("2468").await.unwrap();

        for attempt in ["2469", "246", "24680", "abcd", ""] {
            assert!(!service.authenticate_with_pin(attempt).await.unwrap());
        }
        assert!(!service.is_authenticated().await);
        assert!(store.get(SESSION_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_pin_is_stored_hashed() {
        let (service, store) = create_test_service();

        service.set_pin("135790").await.unwrap();

        let stored = store.get(PIN_KEY).unwrap().unwrap();
        assert_ne!(stored, "135790");
        assert!(stored.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_short_or_non_numeric_pin_rejected() {
        let (service, store) = create_test_service();

        assert!(matches!(
            service.set_pin("123").await,
            Err(AppError::InvalidPin(_))
        ));
        assert!(matches!(
            service.set_pin("12a4").await,
            Err(AppError::InvalidPin(_))
        ));
        assert!(matches!(
            service.set_pin("1234567").await,
            Err(AppError::InvalidPin(_))
        ));
        assert!(store.get(PIN_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_pin_without_setup_fails() {
        let (service, _store) = create_test_service();

        assert!(!service.authenticate_with_pin("1234").await.unwrap());
    }

    #[tokio::test]
    async fn test_successful_pin_persists_session() {
        let (service, store) = create_test_service();

        service.set_pin("1234").await.unwrap();
        service.authenticate_with_pin("1234").await.unwrap();

        let raw = store.get(SESSION_KEY).unwrap().unwrap();
        let record: SessionRecord = serde_json::from_str(&raw).unwrap();
        assert!(record.is_valid_at(Utc::now()));
    }

    #[tokio::test]
    async fn test_recent_session_auto_authenticates() {
        let (service, store) = create_test_service();
        let now = Utc::now();

        write_session(&store, now - Duration::hours(23));

        assert!(service.try_auto_authenticate_at(now).await);
        assert!(service.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_expired_session_is_rejected_and_removed() {
        let (service, store) = create_test_service();
        let now = Utc::now();

        write_session(&store, now - Duration::hours(25));

        assert!(!service.try_auto_authenticate_at(now).await);
        assert!(!service.is_authenticated().await);
        assert!(store.get(SESSION_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_session_boundary() {
        let now = Utc::now();

        assert!(SessionRecord::at(now - Duration::hours(24) + Duration::milliseconds(1))
            .is_valid_at(now));
        assert!(!SessionRecord::at(now - Duration::hours(24)).is_valid_at(now));
        assert!(!SessionRecord::at(now + Duration::minutes(5)).is_valid_at(now));
    }

    #[tokio::test]
    async fn test_corrupt_session_falls_through() {
        let (service, store) = create_test_service();

        store.set(SESSION_KEY, "not json").unwrap();

        assert!(!service.try_auto_authenticate().await);
    }

    #[tokio::test]
    async fn test_logout_deletes_session() {
        let (service, store) = create_test_service();

        service.set_pin("1234").await.unwrap();
        service.authenticate_with_pin("1234").await.unwrap();
        service.logout().await.unwrap();

        assert!(!service.is_authenticated().await);
        assert!(store.get(SESSION_KEY).unwrap().is_none());
        assert!(!service.try_auto_authenticate().await);
    }

    #[tokio::test]
    async fn test_change_pin_requires_current() {
        let (service, _store) = create_test_service();

        service.set_pin("1111").await.unwrap();

        let result = service.change_pin("0000", "2222").await;
        assert!(matches!(result, Err(AppError::InvalidPin(_))));

        service.change_pin("1111", "2222").await.unwrap();
        assert!(!service.authenticate_with_pin("1111").await.unwrap());
        assert!(service.authenticate_with_pin("2222").await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_pin() {
        let (service, store) = create_test_service();

        service.set_pin("1111").await.unwrap();
        service.remove_pin("1111").await.unwrap();

        assert!(store.get(PIN_KEY).unwrap().is_none());
        assert!(!service.state().await.pin_enabled);
    }

    #[tokio::test]
    async fn test_check_auth_loads_flags() {
        let store = MemorySecureStore::new();
        let service = AuthService::new(
            Arc::new(store.clone()),
            Arc::new(FakeBiometrics {
                available: true,
                succeeds: true,
            }),
        );

        assert!(service.state().await.is_loading);

        service.set_pin("1234").await.unwrap();
        store.set(BIOMETRIC_ENABLED_KEY, "true").unwrap();
        service.check_auth().await;

        let state = service.state().await;
        assert!(!state.is_loading);
        assert!(state.pin_enabled);
        assert!(state.is_biometric_enabled);
        assert!(state.is_biometric_available);
    }

    #[tokio::test]
    async fn test_biometric_authentication() {
        let store = MemorySecureStore::new();
        let service = AuthService::new(
            Arc::new(store.clone()),
            Arc::new(FakeBiometrics {
                available: true,
                succeeds: true,
            }),
        );

        service.check_auth().await;
        // Not enabled yet
        assert!(!service.authenticate_with_biometric().await.unwrap());

        service.set_biometric_enabled(true).await.unwrap();
        assert!(service.authenticate_with_biometric().await.unwrap());
        assert!(store.get(SESSION_KEY).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_failed_biometric_prompt() {
        let service = AuthService::new(
            Arc::new(MemorySecureStore::new()),
            Arc::new(FakeBiometrics {
                available: true,
                succeeds: false,
            }),
        );

        service.set_biometric_enabled(true).await.unwrap();
        service.check_auth().await;

        assert!(!service.authenticate_with_biometric().await.unwrap());
        assert!(!service.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_launch_routes() {
        let (service, store) = create_test_service();

        assert_eq!(service.launch().await.unwrap(), LaunchRoute::Onboarding);

        service.mark_onboarding_complete().await.unwrap();
        assert_eq!(service.launch().await.unwrap(), LaunchRoute::Setup);

        service.set_pin("9876").await.unwrap();
        assert_eq!(service.launch().await.unwrap(), LaunchRoute::Login);

        write_session(&store, Utc::now() - Duration::hours(1));
        assert_eq!(service.launch().await.unwrap(), LaunchRoute::Home);
    }
}
