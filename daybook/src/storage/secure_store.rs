//! Secure key-value storage
//!
//! Authentication secrets and flags (PIN hash, biometric flag, onboarding
//! flag, session record) live in encrypted platform storage. The
//! `SecureStore` trait keeps the auth gate independent of the backend.

use crate::error::{AppError, Result};
use keyring::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Encrypted string key-value storage
pub trait SecureStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key has never been written
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value; removing a missing key is not an error
    fn delete(&self, key: &str) -> Result<()>;
}

/// OS credential store (Keychain, Credential Manager, Secret Service backed kernel keyring)
#[derive(Debug, Clone)]
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, key: &str) -> Result<Entry> {
        Entry::new(&self.service, key)
            .map_err(|e| AppError::SecureStore(format!("Failed to create keyring entry: {}", e)))
    }
}

impl SecureStore for KeyringStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(AppError::SecureStore(format!(
                "Failed to read '{}': {}",
                key, e
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entry(key)?
            .set_password(value)
            .map_err(|e| AppError::SecureStore(format!("Failed to store '{}': {}", key, e)))?;

        tracing::debug!("Stored '{}' in credential store", key);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => {
                tracing::debug!("Deleted '{}' from credential store", key);
                Ok(())
            }
            Err(e) => Err(AppError::SecureStore(format!(
                "Failed to delete '{}': {}",
                key, e
            ))),
        }
    }
}

/// Process-local store, for tests and hosts without a credential store
#[derive(Debug, Clone, Default)]
pub struct MemorySecureStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySecureStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.values
            .lock()
            .map_err(|e| AppError::SecureStore(format!("Lock error: {}", e)))
    }
}

impl SecureStore for MemorySecureStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}
