#![forbid(unsafe_code)]

//! Async key/value stores for serialized records.
//!
//! The record controller only ever talks to a [`RecordStore`]; the backend
//! decides where the bytes live.
//!
//! | Backend | Where | Used by |
//! |---|---|---|
//! | [`MemoryStore`] | a locked `HashMap` | tests, throwaway sessions |
//! | [`FileStore`] | one JSON document, replaced by rename | the harness |
//!
//! # Failure Modes
//!
//! | Error | Raised when |
//! |---|---|
//! | `StoreError::Io` | reading, writing or renaming the file fails |
//! | `StoreError::Serialization` | the store file is not valid JSON |
//! | `StoreError::Corruption` | unknown format version, or a poisoned lock |
//! | `StoreError::Unavailable` | the backend refuses service |
//!
//! An absent key is not an error: `get` returns `Ok(None)`.
//!
//! Every operation either happens completely or not at all; callers treat an
//! error as "the operation did not happen".

use std::fmt;

use async_trait::async_trait;

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Store failure.
#[derive(Debug)]
pub enum StoreError {
    /// Filesystem failure.
    Io(std::io::Error),
    /// The store file could not be encoded or decoded.
    Serialization(String),
    /// Store file is corrupted or has an unsupported format.
    Corruption(String),
    /// Backend is not available.
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "I/O error: {e}"),
            StoreError::Serialization(msg) => write!(f, "serialization error: {msg}"),
            StoreError::Corruption(msg) => write!(f, "storage corruption: {msg}"),
            StoreError::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Serialization(_) => None,
            StoreError::Corruption(_) => None,
            StoreError::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// ─────────────────────────────────────────────────────────────────────────────
// Store Trait
// ─────────────────────────────────────────────────────────────────────────────

/// An asynchronous string key/value store.
///
/// Implementations must be thread-safe (`Send + Sync`) so one store can back
/// several controllers.
///
/// # Implementation Notes
///
/// - `set` overwrites; a key holds at most one value.
/// - `remove` of an absent key succeeds.
/// - A failed operation must leave previously stored data readable.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Read the value stored under `key`.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> StoreResult<()>;

    /// Remove `key` if present.
    async fn remove(&self, key: &str) -> StoreResult<()>;
}
