//! Core traits for cohort storage abstractions.
//!
//! These traits define the seams where concrete storage plugs in, so the
//! view state and progress tracker can run against local storage, a file
//! directory, or an in-memory test double.

use crate::error::Result;
use crate::models::ContentProgress;

// =============================================================================
// KEY-VALUE STORAGE
// =============================================================================

/// Client-local string storage keyed by name (browser local storage shape).
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`, `None` when absent.
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    fn save(&self, key: &str, value: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        (**self).save(key, value)
    }
}

// =============================================================================
// PROGRESS STORAGE
// =============================================================================

/// Persistence for per-user content progress records.
pub trait ProgressStore: Send + Sync {
    /// Every record stored for `user_id`.
    fn load_for_user(&self, user_id: &str) -> Result<Vec<ContentProgress>>;

    /// Upsert one record keyed by `(user_id, content_id)`.
    fn save(&self, record: &ContentProgress) -> Result<()>;
}

impl<T: ProgressStore + ?Sized> ProgressStore for std::sync::Arc<T> {
    fn load_for_user(&self, user_id: &str) -> Result<Vec<ContentProgress>> {
        (**self).load_for_user(user_id)
    }

    fn save(&self, record: &ContentProgress) -> Result<()> {
        (**self).save(record)
    }
}
