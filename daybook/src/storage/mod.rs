//! Storage module
//!
//! Content-addressed storage for media bytes and the secure key-value
//! store used for authentication secrets and flags.

pub mod blob_store;
pub mod secure_store;

pub use blob_store::{BlobStore, StoredBlob};
pub use secure_store::{KeyringStore, MemorySecureStore, SecureStore};
