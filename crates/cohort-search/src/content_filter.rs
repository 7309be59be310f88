//! Live filter selections composed with the filter service.
//!
//! [`FilterState`] holds what the user has selected. [`ContentFilter`] owns
//! the backing item list plus a `FilterState` and a [`SortKey`], and keeps a
//! filtered, sorted view that is recomputed synchronously after every change
//! to either the items or a selection. There is never a partially updated view.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use cohort_core::defaults::LOCALE;
use cohort_core::{
    parse_selection, parse_space_selection, AccessLevel, ContentFormat, ContentItem, DateRange,
    FilterOptions, SortKey,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::filter_service::{filter_content, sort_content_in};

// =============================================================================
// FILTER STATE
// =============================================================================

/// Current filter selections, each independently settable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub search_query: String,
    pub content_type: Option<ContentFormat>,
    pub access_level: Option<AccessLevel>,
    pub tags: BTreeSet<String>,
    pub space_id: Option<String>,
    pub date_range: Option<DateRange>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the selections as a fresh [`FilterOptions`].
    pub fn to_options(&self) -> FilterOptions {
        FilterOptions {
            search_query: Some(self.search_query.clone()).filter(|q| !q.trim().is_empty()),
            content_type: self.content_type,
            access_level: self.access_level,
            tags: self.tags.clone(),
            space_id: self.space_id.clone(),
            date_range: self.date_range,
        }
    }

    pub fn has_active_filters(&self) -> bool {
        !self.to_options().is_empty()
    }
}

// =============================================================================
// RESULT SUMMARY
// =============================================================================

/// "N of M results" counts for a listing header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub shown: usize,
    pub total: usize,
}

impl ResultSummary {
    pub fn is_filtered(&self) -> bool {
        self.shown != self.total
    }
}

impl std::fmt::Display for ResultSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} of {} results", self.shown, self.total)
    }
}

// =============================================================================
// CONTENT FILTER
// =============================================================================

/// Item list + selections + derived view, recomputed on every change.
#[derive(Debug, Clone, Default)]
pub struct ContentFilter {
    items: Vec<ContentItem>,
    state: FilterState,
    sort_key: SortKey,
    locale: String,
    results: Vec<ContentItem>,
}

impl ContentFilter {
    pub fn new(items: Vec<ContentItem>) -> Self {
        Self::with_sort(items, SortKey::default())
    }

    pub fn with_sort(items: Vec<ContentItem>, sort_key: SortKey) -> Self {
        let mut filter = Self {
            items,
            state: FilterState::default(),
            sort_key,
            locale: LOCALE.to_string(),
            results: Vec::new(),
        };
        filter.recompute();
        filter
    }

    /// Collate titles for `locale` instead of the default.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self.recompute();
        self
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// The filtered and sorted view.
    pub fn results(&self) -> &[ContentItem] {
        &self.results
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn filtered_count(&self) -> usize {
        self.results.len()
    }

    pub fn total_count(&self) -> usize {
        self.items.len()
    }

    pub fn summary(&self) -> ResultSummary {
        ResultSummary {
            shown: self.filtered_count(),
            total: self.total_count(),
        }
    }

    // =========================================================================
    // MUTATORS
    // =========================================================================

    /// Replace the backing list, e.g. when a backend fetch completes.
    pub fn set_items(&mut self, items: Vec<ContentItem>) {
        self.items = items;
        self.recompute();
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.state.search_query = query.into();
        self.recompute();
    }

    pub fn set_content_type(&mut self, format: Option<ContentFormat>) {
        self.state.content_type = format;
        self.recompute();
    }

    /// Set the content type from a selector value (`"all"` clears it).
    pub fn select_content_type(&mut self, value: &str) {
        self.set_content_type(parse_selection(value));
    }

    pub fn set_access_level(&mut self, level: Option<AccessLevel>) {
        self.state.access_level = level;
        self.recompute();
    }

    /// Set the access level from a selector value (`"all"` clears it).
    pub fn select_access_level(&mut self, value: &str) {
        self.set_access_level(parse_selection(value));
    }

    pub fn set_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.tags = tags.into_iter().map(Into::into).collect();
        self.recompute();
    }

    /// Add the tag if absent, remove it if present.
    pub fn toggle_tag(&mut self, tag: &str) {
        if !self.state.tags.remove(tag) {
            self.state.tags.insert(tag.to_string());
        }
        self.recompute();
    }

    pub fn set_space(&mut self, space_id: Option<String>) {
        self.state.space_id = space_id;
        self.recompute();
    }

    /// Set the active space from a selector value (`"all"` clears it).
    pub fn select_space(&mut self, value: &str) {
        self.set_space(parse_space_selection(value));
    }

    pub fn set_date_range(&mut self, range: Option<DateRange>) {
        self.state.date_range = range;
        self.recompute();
    }

    pub fn set_created_between(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) {
        self.set_date_range(Some(DateRange::between(start, end)));
    }

    pub fn set_sort_key(&mut self, sort_key: SortKey) {
        self.sort_key = sort_key;
        self.recompute();
    }

    /// Reset every selection; the sort key is kept.
    pub fn clear_filters(&mut self) {
        self.state = FilterState::default();
        self.recompute();
    }

    fn recompute(&mut self) {
        let options = self.state.to_options();
        self.results = sort_content_in(
            &filter_content(&self.items, &options),
            self.sort_key,
            &self.locale,
        );

        debug!(
            subsystem = "search",
            component = "content_filter",
            op = "recompute",
            active_filters = options.active_dimension_count(),
            result_count = self.results.len(),
            total_count = self.items.len(),
            "Recomputed content view"
        );
    }
}
