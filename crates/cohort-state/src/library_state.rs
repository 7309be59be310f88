//! Library view state: visited tags and recently viewed content.
//!
//! Both lists are read from the injected [`KeyValueStore`] once when the
//! state is loaded and written back in full after every change. Absent or
//! malformed stored values fall back to defaults: the locale's seed tags for
//! visited tags, an empty list for recently viewed. Repeated entries in a
//! stored list are dropped on load, keeping the first occurrence.
//!
//! The two lists deduplicate differently on repeat:
//!
//! | List | New entry | Repeated entry | Eviction |
//! |------|-----------|----------------|----------|
//! | visited tags | appended at the back | ignored | oldest (front) |
//! | recently viewed | inserted at the front | ignored, not moved | oldest (back) |
//!
//! Re-viewing an item therefore does not bump it back to the top of the
//! recently viewed list.

use std::collections::HashSet;

use cohort_core::defaults::{RECENTLY_VIEWED_KEY, VISITED_TAGS_KEY};
use cohort_core::{ContentItem, KeyValueStore};
use cohort_search::{recommend_content, resolve_recent, Recommendation};
use tracing::{debug, info, warn};

use crate::config::LibraryConfig;

#[derive(Debug)]
pub struct LibraryViewState<S> {
    store: S,
    visited_tags: Vec<String>,
    recently_viewed: Vec<String>,
    max_visited_tags: usize,
    max_recently_viewed: usize,
}

impl<S: KeyValueStore> LibraryViewState<S> {
    /// Read persisted state from `store`, seeding defaults where needed.
    pub fn load(store: S, config: &LibraryConfig) -> Self {
        let mut visited_tags = dedupe(read_list(&store, VISITED_TAGS_KEY).unwrap_or_default());
        if visited_tags.is_empty() {
            visited_tags = config.seed_tags();
            debug!(locale = %config.locale, "Seeded visited tags");
        }
        let excess = visited_tags.len().saturating_sub(config.max_visited_tags);
        visited_tags.drain(..excess);

        let mut recently_viewed = dedupe(read_list(&store, RECENTLY_VIEWED_KEY).unwrap_or_default());
        recently_viewed.truncate(config.max_recently_viewed);

        info!(
            subsystem = "state",
            component = "library_view",
            visited_tags = visited_tags.len(),
            recently_viewed = recently_viewed.len(),
            "Loaded library view state"
        );

        Self {
            store,
            visited_tags,
            recently_viewed,
            max_visited_tags: config.max_visited_tags,
            max_recently_viewed: config.max_recently_viewed,
        }
    }

    /// Interest tags, oldest first.
    pub fn visited_tags(&self) -> &[String] {
        &self.visited_tags
    }

    /// Recently viewed content ids, newest first.
    pub fn recently_viewed(&self) -> &[String] {
        &self.recently_viewed
    }

    /// Record a tag the member browsed.
    ///
    /// A new tag is appended and the oldest dropped past capacity; a tag
    /// already in the list is ignored. Blank tags are ignored.
    /// Returns whether the list changed.
    pub fn add_visited_tag(&mut self, tag: &str) -> bool {
        if tag.trim().is_empty() || self.visited_tags.iter().any(|t| t == tag) {
            return false;
        }

        self.visited_tags.push(tag.to_string());
        let excess = self.visited_tags.len().saturating_sub(self.max_visited_tags);
        self.visited_tags.drain(..excess);

        debug!(
            subsystem = "state",
            component = "library_view",
            op = "add_visited_tag",
            tag,
            "Visited tag recorded"
        );
        self.persist(VISITED_TAGS_KEY, &self.visited_tags);
        true
    }

    /// Record that a content item was opened.
    ///
    /// A new id goes to the front and the oldest is dropped past capacity;
    /// an id already in the list is ignored and keeps its position.
    /// Returns whether the list changed.
    pub fn track_content_view(&mut self, content_id: &str) -> bool {
        if content_id.is_empty() || self.recently_viewed.iter().any(|id| id == content_id) {
            return false;
        }

        self.recently_viewed.insert(0, content_id.to_string());
        self.recently_viewed.truncate(self.max_recently_viewed);

        debug!(
            subsystem = "state",
            component = "library_view",
            op = "track_content_view",
            content_id,
            "Content view recorded"
        );
        self.persist(RECENTLY_VIEWED_KEY, &self.recently_viewed);
        true
    }

    /// Suggestions for the member's interest tags, skipping recently viewed items.
    pub fn recommendations(&self, items: &[ContentItem], limit: usize) -> Vec<Recommendation> {
        recommend_content(
            items,
            self.visited_tags.as_slice(),
            self.recently_viewed.as_slice(),
            limit,
        )
    }

    /// Recently viewed items still present in `items`, newest first.
    pub fn recent_items(&self, items: &[ContentItem]) -> Vec<ContentItem> {
        resolve_recent(items, self.recently_viewed.as_slice())
    }

    /// Write a list back to storage. Failures are logged; memory stays authoritative.
    fn persist(&self, key: &str, list: &[String]) {
        let result = serde_json::to_string(list)
            .map_err(cohort_core::Error::from)
            .and_then(|value| self.store.save(key, &value));

        if let Err(e) = result {
            warn!(
                subsystem = "state",
                component = "library_view",
                storage_key = key,
                error = %e,
                "Failed to persist library view state"
            );
        }
    }
}

/// Drop repeated entries, keeping the first occurrence of each.
fn dedupe(list: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(list.len());
    list.into_iter()
        .filter(|entry| seen.insert(entry.clone()))
        .collect()
}

/// Read a JSON string array; `None` when absent, unreadable, or malformed.
fn read_list<S: KeyValueStore>(store: &S, key: &str) -> Option<Vec<String>> {
    let raw = match store.load(key) {
        Ok(raw) => raw?,
        Err(e) => {
            warn!(storage_key = key, error = %e, "Failed to read stored list, using defaults");
            return None;
        }
    };

    match serde_json::from_str::<Vec<String>>(&raw) {
        Ok(list) => Some(list),
        Err(e) => {
            warn!(storage_key = key, error = %e, "Malformed stored list, using defaults");
            None
        }
    }
}
