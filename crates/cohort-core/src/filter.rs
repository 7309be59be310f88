//! Filter and sort option types for content listings.
//!
//! [`FilterOptions`] is a value snapshot of every filter dimension a library
//! listing supports. Each dimension is optional and applied as an AND-combined
//! predicate; an unset dimension places no constraint on the result.
//!
//! | Dimension | Unset means | Match rule |
//! |-----------|-------------|------------|
//! | `search_query` | `None` or blank | every whitespace term is a substring of title + description |
//! | `content_type` | `None` ("all") | equal to the item's format |
//! | `access_level` | `None` ("all") | equal to the item's access level |
//! | `tags` | empty set | item carries every requested tag |
//! | `space_id` | `None` ("all") | equal to the item's space |
//! | `date_range` | `None` | creation time within the inclusive bounds |
//!
//! # Example
//!
//! ```
//! use cohort_core::{AccessLevel, FilterOptions};
//!
//! let options = FilterOptions::new()
//!     .with_search("ai")
//!     .with_access_level(AccessLevel::Free)
//!     .require_tag("ethics");
//!
//! assert_eq!(options.active_dimension_count(), 3);
//! assert_eq!(options.search_terms(), vec!["ai".to_string()]);
//! ```

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::defaults::ALL_SENTINEL;
use crate::models::{AccessLevel, ContentFormat};

// =============================================================================
// DATE RANGE
// =============================================================================

/// Creation-time window with inclusive bounds; either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Closed range `[start, end]`.
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn since(start: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    pub fn until(end: DateTime<Utc>) -> Self {
        Self {
            start: None,
            end: Some(end),
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| at >= start) && self.end.map_or(true, |end| at <= end)
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

// =============================================================================
// FILTER OPTIONS
// =============================================================================

/// One filter pass over a content listing.
///
/// Built fresh from the current selections on every recomputation and
/// compared by value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentFormat>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_level: Option<AccessLevel>,

    /// Intersection semantics: an item must carry all of these.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
}

impl FilterOptions {
    /// Create an empty filter (matches every item).
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // BUILDER METHODS
    // =========================================================================

    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search_query = Some(query.into());
        self
    }

    pub fn with_content_type(mut self, format: ContentFormat) -> Self {
        self.content_type = Some(format);
        self
    }

    pub fn with_access_level(mut self, level: AccessLevel) -> Self {
        self.access_level = Some(level);
        self
    }

    pub fn require_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn require_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn in_space(mut self, space_id: impl Into<String>) -> Self {
        self.space_id = Some(space_id.into());
        self
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    // =========================================================================
    // CONSTRAINT CHECKS
    // =========================================================================

    /// Lower-cased whitespace-delimited search terms; empty when no search.
    pub fn search_terms(&self) -> Vec<String> {
        self.search_query
            .as_deref()
            .map(|q| q.split_whitespace().map(str::to_lowercase).collect())
            .unwrap_or_default()
    }

    pub fn has_search_constraint(&self) -> bool {
        self.search_query
            .as_deref()
            .map(|q| !q.trim().is_empty())
            .unwrap_or(false)
    }

    pub fn has_date_constraint(&self) -> bool {
        self.date_range
            .map(|r| !r.is_unbounded())
            .unwrap_or(false)
    }

    /// Check if the filter is completely empty (matches every item).
    pub fn is_empty(&self) -> bool {
        self.active_dimension_count() == 0
    }

    /// Number of dimensions that actually constrain the result.
    pub fn active_dimension_count(&self) -> usize {
        [
            self.has_search_constraint(),
            self.content_type.is_some(),
            self.access_level.is_some(),
            !self.tags.is_empty(),
            self.space_id.is_some(),
            self.has_date_constraint(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }
}

// =============================================================================
// SELECTOR PARSING
// =============================================================================

/// Parse a UI selector value into a constraint.
///
/// Blank input, the `"all"` sentinel, and unrecognized values all mean
/// "no constraint" rather than an error.
pub fn parse_selection<T>(value: &str) -> Option<T>
where
    T: FromStr,
{
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case(ALL_SENTINEL) {
        return None;
    }
    match value.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            debug!(value, "Unrecognized selector value, treating as no constraint");
            None
        }
    }
}

/// Space selector: any non-blank value other than `"all"` is a space id.
pub fn parse_space_selection(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case(ALL_SENTINEL) {
        None
    } else {
        Some(value.to_string())
    }
}

// =============================================================================
// SORT KEY
// =============================================================================

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Descending creation time.
    #[default]
    Newest,
    /// Ascending creation time.
    Oldest,
    /// Descending view count, missing counts as zero.
    Popular,
    /// Ascending title, case-insensitive.
    Title,
    /// Keep the input order.
    #[serde(other)]
    Unsorted,
}

impl SortKey {
    /// Parse a sort selector; unknown keys keep the input order.
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            debug!(value, "Unrecognized sort key, keeping input order");
            Self::Unsorted
        })
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Newest => write!(f, "newest"),
            Self::Oldest => write!(f, "oldest"),
            Self::Popular => write!(f, "popular"),
            Self::Title => write!(f, "title"),
            Self::Unsorted => write!(f, "unsorted"),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            "popular" => Ok(Self::Popular),
            "title" => Ok(Self::Title),
            "unsorted" => Ok(Self::Unsorted),
            _ => Err(format!("Invalid sort key: {}", s)),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, month, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_filter() {
        let options = FilterOptions::new();
        assert!(options.is_empty());
        assert_eq!(options.active_dimension_count(), 0);
        assert!(options.search_terms().is_empty());
    }

    #[test]
    fn test_blank_search_is_not_a_constraint() {
        let options = FilterOptions::new().with_search("   ");
        assert!(options.is_empty());
        assert!(options.search_terms().is_empty());
    }

    #[test]
    fn test_search_terms_lowercased_and_split() {
        let options = FilterOptions::new().with_search("  Intro\tTO  ai ");
        assert_eq!(options.search_terms(), vec!["intro", "to", "ai"]);
    }

    #[test]
    fn test_multi_dimension() {
        let options = FilterOptions::new()
            .with_search("rust")
            .with_content_type(ContentFormat::Video)
            .with_access_level(AccessLevel::Premium)
            .require_tags(["a", "b"])
            .in_space("space-1")
            .with_date_range(DateRange::since(ts(1, 1)));

        assert!(!options.is_empty());
        assert_eq!(options.active_dimension_count(), 6);
    }

    #[test]
    fn test_unbounded_date_range_is_not_a_constraint() {
        let options = FilterOptions::new().with_date_range(DateRange::default());
        assert!(options.is_empty());
    }

    #[test]
    fn test_value_semantics() {
        let a = FilterOptions::new().require_tag("x").require_tag("y");
        let b = FilterOptions::new().require_tag("y").require_tag("x");
        assert_eq!(a, b);
    }

    #[test]
    fn test_date_range_inclusive_bounds() {
        let range = DateRange::between(ts(1, 1), ts(2, 1));
        assert!(range.contains(ts(1, 1)));
        assert!(range.contains(ts(2, 1)));
        assert!(range.contains(ts(1, 15)));
        assert!(!range.contains(ts(2, 2)));
    }

    #[test]
    fn test_open_date_ranges() {
        assert!(DateRange::since(ts(3, 1)).contains(ts(12, 31)));
        assert!(!DateRange::since(ts(3, 1)).contains(ts(2, 28)));
        assert!(DateRange::until(ts(3, 1)).contains(ts(1, 1)));
        assert!(!DateRange::until(ts(3, 1)).contains(ts(3, 2)));
    }

    #[test]
    fn test_parse_selection_sentinels() {
        assert_eq!(parse_selection::<ContentFormat>("all"), None);
        assert_eq!(parse_selection::<ContentFormat>("ALL"), None);
        assert_eq!(parse_selection::<ContentFormat>(""), None);
        assert_eq!(parse_selection::<ContentFormat>("hologram"), None);
        assert_eq!(
            parse_selection::<ContentFormat>("video"),
            Some(ContentFormat::Video)
        );
        assert_eq!(
            parse_selection::<AccessLevel>("premium"),
            Some(AccessLevel::Premium)
        );
    }

    #[test]
    fn test_parse_space_selection() {
        assert_eq!(parse_space_selection("all"), None);
        assert_eq!(parse_space_selection(" "), None);
        assert_eq!(parse_space_selection("s1"), Some("s1".to_string()));
    }

    #[test]
    fn test_sort_key_parse_lenient() {
        assert_eq!(SortKey::parse_lenient("newest"), SortKey::Newest);
        assert_eq!(SortKey::parse_lenient("Popular"), SortKey::Popular);
        assert_eq!(SortKey::parse_lenient("unknown-key"), SortKey::Unsorted);
    }

    #[test]
    fn test_sort_key_deserializes_unknown_as_unsorted() {
        let key: SortKey = serde_json::from_str(r#""trending""#).unwrap();
        assert_eq!(key, SortKey::Unsorted);
    }

    #[test]
    fn test_options_serialize_skips_unset() {
        let json = serde_json::to_string(&FilterOptions::new()).unwrap();
        assert_eq!(json, "{}");
    }
}
