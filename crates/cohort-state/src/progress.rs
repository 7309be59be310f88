//! Per-user content progress tracking.
//!
//! [`ProgressTracker`] owns the in-memory records for one user and is the
//! only write path for them, so the progress invariants are enforced in one
//! place:
//!
//! - at most one record per content item; updates overwrite in place
//! - `completed` is set whenever progress reaches 100
//! - awarding points is idempotent
//!
//! Writes are optimistic. The in-memory record changes first, then the
//! [`ProgressStore`] is asked to persist it; if the store fails, the record
//! is restored to its previous value and the error is returned.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use cohort_core::defaults::CONTENT_PROGRESS_KEY_PREFIX;
use cohort_core::{ContentProgress, Error, KeyValueStore, ProgressStore, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

// =============================================================================
// STORES
// =============================================================================

/// Process-local progress store.
#[derive(Debug, Default)]
pub struct MemoryProgressStore {
    records: Mutex<HashMap<(String, String), ContentProgress>>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStore for MemoryProgressStore {
    fn load_for_user(&self, user_id: &str) -> Result<Vec<ContentProgress>> {
        let records = self
            .records
            .lock()
            .map_err(|_| Error::Internal("progress store lock poisoned".to_string()))?;
        Ok(records
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    fn save(&self, record: &ContentProgress) -> Result<()> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| Error::Internal("progress store lock poisoned".to_string()))?;
        records.insert(
            (record.user_id.clone(), record.content_id.clone()),
            record.clone(),
        );
        Ok(())
    }
}

/// Progress store keeping one JSON document per user in a [`KeyValueStore`].
///
/// The document lives under `contentProgress:<user_id>`. A malformed
/// document reads as empty rather than failing the caller.
#[derive(Debug)]
pub struct KvProgressStore<S> {
    store: S,
}

impl<S: KeyValueStore> KvProgressStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn key_for(user_id: &str) -> String {
        format!("{CONTENT_PROGRESS_KEY_PREFIX}:{user_id}")
    }
}

impl<S: KeyValueStore> ProgressStore for KvProgressStore<S> {
    fn load_for_user(&self, user_id: &str) -> Result<Vec<ContentProgress>> {
        let key = Self::key_for(user_id);
        let Some(raw) = self.store.load(&key)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Vec<ContentProgress>>(&raw) {
            Ok(records) => Ok(records),
            Err(e) => {
                warn!(
                    storage_key = %key,
                    error = %e,
                    "Malformed progress document, starting empty"
                );
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, record: &ContentProgress) -> Result<()> {
        let mut records = self.load_for_user(&record.user_id)?;
        match records
            .iter_mut()
            .find(|r| r.content_id == record.content_id)
        {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        let value = serde_json::to_string(&records)?;
        self.store.save(&Self::key_for(&record.user_id), &value)
    }
}

// =============================================================================
// TRACKER
// =============================================================================

/// Counts across a user's tracked records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub tracked: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub points_awarded: usize,
}

/// Progress records for one user, backed by a [`ProgressStore`].
#[derive(Debug)]
pub struct ProgressTracker<S = MemoryProgressStore> {
    user_id: String,
    records: HashMap<String, ContentProgress>,
    store: S,
}

impl ProgressTracker<MemoryProgressStore> {
    /// Tracker with nothing persisted beyond this process.
    pub fn in_memory(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            records: HashMap::new(),
            store: MemoryProgressStore::new(),
        }
    }
}

impl<S: ProgressStore> ProgressTracker<S> {
    /// Load the user's existing records from `store`.
    pub fn load(user_id: impl Into<String>, store: S) -> Result<Self> {
        let user_id = user_id.into();
        let records: HashMap<String, ContentProgress> = store
            .load_for_user(&user_id)?
            .into_iter()
            .filter(|r| r.user_id == user_id)
            .map(|r| (r.content_id.clone(), r))
            .collect();

        info!(
            subsystem = "state",
            component = "progress_tracker",
            user_id = %user_id,
            count = records.len(),
            "Loaded progress records"
        );

        Ok(Self {
            user_id,
            records,
            store,
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Record for `content_id`, `None` if never tracked.
    pub fn get_content_progress(&self, content_id: &str) -> Option<&ContentProgress> {
        self.records.get(content_id)
    }

    /// Report progress for a content item at the current time.
    ///
    /// `progress` is expected in `0..=100` and is stored as given.
    /// The record is completed when `completed_override` is `Some(true)` or
    /// progress is exactly 100. `last_accessed` is refreshed even when the
    /// value does not change.
    pub fn update_progress(
        &mut self,
        content_id: &str,
        progress: u8,
        completed_override: Option<bool>,
    ) -> Result<&ContentProgress> {
        self.update_progress_at(content_id, progress, completed_override, Utc::now())
    }

    /// [`update_progress`](Self::update_progress) with an explicit timestamp.
    pub fn update_progress_at(
        &mut self,
        content_id: &str,
        progress: u8,
        completed_override: Option<bool>,
        now: DateTime<Utc>,
    ) -> Result<&ContentProgress> {
        let completed_override = completed_override.unwrap_or(false);
        let previous = self.records.get(content_id).cloned();

        let updated = match previous.clone() {
            Some(mut record) => {
                record.record(progress, completed_override, now);
                record
            }
            None => ContentProgress::new(
                self.user_id.clone(),
                content_id,
                progress,
                completed_override,
                now,
            ),
        };

        self.commit(content_id, updated, previous)?;

        debug!(
            subsystem = "state",
            component = "progress_tracker",
            op = "update_progress",
            content_id,
            progress,
            "Progress updated"
        );

        self.records
            .get(content_id)
            .ok_or_else(|| Error::ProgressNotFound(content_id.to_string()))
    }

    /// Flag points as awarded for a tracked item.
    ///
    /// Returns `Ok(false)` when the item has never been tracked; nothing is
    /// created in that case. Awarding twice is the same as awarding once.
    pub fn mark_points_awarded(&mut self, content_id: &str) -> Result<bool> {
        let Some(previous) = self.records.get(content_id).cloned() else {
            debug!(content_id, "Points not awarded, content never tracked");
            return Ok(false);
        };
        if previous.points_awarded {
            return Ok(true);
        }

        let mut updated = previous.clone();
        updated.points_awarded = true;
        self.commit(content_id, updated, Some(previous))?;

        debug!(
            subsystem = "state",
            component = "progress_tracker",
            op = "mark_points_awarded",
            content_id,
            "Points awarded"
        );
        Ok(true)
    }

    /// Completed records, most recently accessed first.
    pub fn completed_content(&self) -> Vec<&ContentProgress> {
        self.collect_sorted(|r| r.completed)
    }

    /// Started but unfinished records, most recently accessed first.
    pub fn in_progress_content(&self) -> Vec<&ContentProgress> {
        self.collect_sorted(ContentProgress::is_in_progress)
    }

    /// Every tracked record, in no particular order.
    pub fn records(&self) -> impl Iterator<Item = &ContentProgress> {
        self.records.values()
    }

    pub fn summary(&self) -> ProgressSummary {
        self.records.values().fold(
            ProgressSummary {
                tracked: self.records.len(),
                ..ProgressSummary::default()
            },
            |mut acc, r| {
                if r.completed {
                    acc.completed += 1;
                }
                if r.is_in_progress() {
                    acc.in_progress += 1;
                }
                if r.points_awarded {
                    acc.points_awarded += 1;
                }
                acc
            },
        )
    }

    fn collect_sorted<F>(&self, keep: F) -> Vec<&ContentProgress>
    where
        F: Fn(&ContentProgress) -> bool,
    {
        let mut selected: Vec<&ContentProgress> =
            self.records.values().filter(|r| keep(r)).collect();
        selected.sort_by(|a, b| {
            b.last_accessed
                .cmp(&a.last_accessed)
                .then_with(|| a.content_id.cmp(&b.content_id))
        });
        selected
    }

    /// Apply `updated` in memory, persist it, and roll back on failure.
    fn commit(
        &mut self,
        content_id: &str,
        updated: ContentProgress,
        previous: Option<ContentProgress>,
    ) -> Result<()> {
        self.records.insert(content_id.to_string(), updated);
        let saved = match self.records.get(content_id) {
            Some(record) => self.store.save(record),
            None => Err(Error::Internal("progress record vanished".to_string())),
        };

        if let Err(e) = saved {
            warn!(
                subsystem = "state",
                component = "progress_tracker",
                content_id,
                error = %e,
                "Progress write failed, rolled back"
            );
            match previous {
                Some(record) => {
                    self.records.insert(content_id.to_string(), record);
                }
                None => {
                    self.records.remove(content_id);
                }
            }
            return Err(e);
        }
        Ok(())
    }
}
