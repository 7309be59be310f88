//! Predicate filtering and sorting of content listings.
//!
//! Both entry points are pure: they borrow the input, never mutate it, and
//! return a fresh vector. Predicates are independent, so evaluation order
//! only affects how early an item is rejected, never whether it is.

use std::cmp::Ordering;

use cohort_core::defaults::LOCALE;
use cohort_core::{AccessLevel, ContentFormat, ContentItem, FilterOptions, SortKey};
use icu_collator::{Collator, CollatorOptions};
use icu_locid::Locale;
use tracing::{debug, trace, warn};

/// Keep the items that satisfy every active dimension of `options`.
///
/// An empty `options` returns the input unchanged in order and content.
pub fn filter_content(items: &[ContentItem], options: &FilterOptions) -> Vec<ContentItem> {
    let terms = options.search_terms();

    let filtered: Vec<ContentItem> = items
        .iter()
        .filter(|item| matches_with_terms(item, options, &terms))
        .cloned()
        .collect();

    debug!(
        subsystem = "search",
        component = "filter_service",
        op = "filter",
        active_filters = options.active_dimension_count(),
        result_count = filtered.len(),
        total_count = items.len(),
        "Filtered content"
    );

    filtered
}

/// Whether a single item passes `options`.
pub fn matches(item: &ContentItem, options: &FilterOptions) -> bool {
    matches_with_terms(item, options, &options.search_terms())
}

fn matches_with_terms(item: &ContentItem, options: &FilterOptions, terms: &[String]) -> bool {
    if !terms.is_empty() {
        let haystack = item.search_text();
        if !terms.iter().all(|term| haystack.contains(term.as_str())) {
            trace!(content_id = %item.id, "Rejected by search terms");
            return false;
        }
    }

    // `Other` covers unknown and missing values, which never exclude an item.
    if let Some(format) = options.content_type {
        if item.format != ContentFormat::Other && item.format != format {
            trace!(content_id = %item.id, "Rejected by content type");
            return false;
        }
    }

    if let Some(level) = options.access_level {
        if item.access_level != AccessLevel::Other && item.access_level != level {
            trace!(content_id = %item.id, "Rejected by access level");
            return false;
        }
    }

    if !options.tags.iter().all(|tag| item.has_tag(tag)) {
        trace!(content_id = %item.id, "Rejected by tags");
        return false;
    }

    if let Some(space_id) = options.space_id.as_deref() {
        if item.space_id.as_deref() != Some(space_id) {
            trace!(content_id = %item.id, "Rejected by space");
            return false;
        }
    }

    if let Some(range) = options.date_range {
        if !range.contains(item.created_at) {
            trace!(content_id = %item.id, "Rejected by date range");
            return false;
        }
    }

    true
}

/// Return a sorted copy of `items`, ordering titles for the default locale.
///
/// The sort is stable, so equal keys keep their input order.
/// [`SortKey::Unsorted`] returns the input order unchanged.
pub fn sort_content(items: &[ContentItem], sort_key: SortKey) -> Vec<ContentItem> {
    sort_content_in(items, sort_key, LOCALE)
}

/// [`sort_content`] with titles collated for `locale` (a BCP 47 tag).
pub fn sort_content_in(items: &[ContentItem], sort_key: SortKey, locale: &str) -> Vec<ContentItem> {
    let mut sorted = items.to_vec();

    match sort_key {
        SortKey::Newest => sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::Oldest => sorted.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortKey::Popular => {
            sorted.sort_by(|a, b| b.view_count.unwrap_or(0).cmp(&a.view_count.unwrap_or(0)))
        }
        SortKey::Title => {
            let collator = TitleCollator::new(locale);
            sorted.sort_by(|a, b| collator.compare(&a.title, &b.title));
        }
        SortKey::Unsorted => {}
    }

    debug!(
        subsystem = "search",
        component = "filter_service",
        op = "sort",
        sort_key = %sort_key,
        locale,
        result_count = sorted.len(),
        "Sorted content"
    );

    sorted
}

/// Locale-aware title order.
///
/// Unparseable locale tags use the root collation. Ties under the collation
/// fall back to the raw text so the order is total.
pub struct TitleCollator {
    locale: String,
    collator: Option<Collator>,
}

impl TitleCollator {
    pub fn new(locale: &str) -> Self {
        let parsed = locale.parse::<Locale>().unwrap_or_else(|_| {
            debug!(locale, "Unrecognized locale, using root collation");
            Locale::UND
        });

        let collator = match Collator::try_new(&parsed.into(), CollatorOptions::new()) {
            Ok(collator) => Some(collator),
            Err(e) => {
                warn!(
                    subsystem = "search",
                    component = "filter_service",
                    locale,
                    error = ?e,
                    "Collation data unavailable, comparing lower-cased titles"
                );
                None
            }
        };

        Self {
            locale: locale.to_string(),
            collator,
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        let collated = match &self.collator {
            Some(collator) => collator.compare(a, b),
            None => a.to_lowercase().cmp(&b.to_lowercase()),
        };
        collated.then_with(|| a.cmp(b))
    }
}

impl std::fmt::Debug for TitleCollator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TitleCollator")
            .field("locale", &self.locale)
            .field("collated", &self.collator.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use cohort_core::DateRange;
    use proptest::prelude::*;

    fn ts(month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, month, day, 0, 0, 0).unwrap()
    }

    fn ids(items: &[ContentItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    fn library() -> Vec<ContentItem> {
        vec![
            ContentItem::new("1", "Intro to AI", ts(1, 1))
                .with_description("A gentle start")
                .with_format(ContentFormat::Video)
                .with_tags(["ai", "beginner"])
                .in_space("learn")
                .with_view_count(10),
            ContentItem::new("2", "AI Ethics", ts(2, 1))
                .with_access_level(AccessLevel::Premium)
                .with_format(ContentFormat::Pdf)
                .with_tags(["ai", "ethics"])
                .in_space("learn")
                .with_view_count(50),
            ContentItem::new("3", "baking bread", ts(3, 1))
                .with_description("Sourdough for busy people")
                .with_tags(["cooking"])
                .in_space("kitchen"),
            ContentItem::new("4", "Deep learning recipes", ts(4, 1))
                .with_format(ContentFormat::Video)
                .with_tags(["ai", "advanced", "cooking"])
                .with_view_count(5),
        ]
    }

    #[test]
    fn test_empty_options_is_identity() {
        let items = library();
        let result = filter_content(&items, &FilterOptions::new());
        assert_eq!(result, items);
    }

    #[test]
    fn test_search_and_access_scenario() {
        let items = vec![
            ContentItem::new("1", "Intro to AI", ts(1, 1)),
            ContentItem::new("2", "AI Ethics", ts(2, 1)).with_access_level(AccessLevel::Premium),
        ];
        let options = FilterOptions::new()
            .with_search("ai")
            .with_access_level(AccessLevel::Free);

        let result = filter_content(&items, &options);
        assert_eq!(ids(&result), vec!["1"]);
    }

    #[test]
    fn test_search_requires_every_term() {
        let items = library();
        let options = FilterOptions::new().with_search("AI gentle");
        assert_eq!(ids(&filter_content(&items, &options)), vec!["1"]);
    }

    #[test]
    fn test_search_is_substring_not_token() {
        let items = library();
        // "sour" is inside "Sourdough"
        let options = FilterOptions::new().with_search("sour");
        assert_eq!(ids(&filter_content(&items, &options)), vec!["3"]);
    }

    #[test]
    fn test_search_spans_title_and_description() {
        let items = library();
        let options = FilterOptions::new().with_search("bread busy");
        assert_eq!(ids(&filter_content(&items, &options)), vec!["3"]);
    }

    #[test]
    fn test_content_type_filter() {
        let items = library();
        let options = FilterOptions::new().with_content_type(ContentFormat::Video);
        assert_eq!(ids(&filter_content(&items, &options)), vec!["1", "4"]);
    }

    #[test]
    fn test_tags_use_intersection() {
        let items = library();
        let options = FilterOptions::new().require_tags(["ai", "cooking"]);
        let result = filter_content(&items, &options);

        assert_eq!(ids(&result), vec!["4"]);
        for item in &result {
            assert!(options.tags.iter().all(|t| item.has_tag(t)));
        }
    }

    #[test]
    fn test_partial_tag_match_is_excluded() {
        let items = library();
        let options = FilterOptions::new().require_tags(["ai", "ethics", "beginner"]);
        assert!(filter_content(&items, &options).is_empty());
    }

    #[test]
    fn test_space_filter_excludes_items_without_space() {
        let items = library();
        let options = FilterOptions::new().in_space("learn");
        assert_eq!(ids(&filter_content(&items, &options)), vec!["1", "2"]);
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let items = library();
        let options = FilterOptions::new().with_date_range(DateRange::between(ts(2, 1), ts(3, 1)));
        assert_eq!(ids(&filter_content(&items, &options)), vec!["2", "3"]);
    }

    #[test]
    fn test_filter_does_not_mutate_input() {
        let items = library();
        let before = items.clone();
        let _ = filter_content(&items, &FilterOptions::new().with_search("ai"));
        assert_eq!(items, before);
    }

    #[test]
    fn test_matches_single_item() {
        let item = &library()[1];
        assert!(matches(item, &FilterOptions::new().require_tag("ethics")));
        assert!(!matches(item, &FilterOptions::new().in_space("kitchen")));
    }

    #[test]
    fn test_sort_newest_and_oldest() {
        let items = library();
        assert_eq!(ids(&sort_content(&items, SortKey::Newest)), vec!["4", "3", "2", "1"]);
        assert_eq!(ids(&sort_content(&items, SortKey::Oldest)), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_double_sort_round_trip() {
        let mut items = library();
        items.reverse();
        let newest = sort_content(&items, SortKey::Newest);
        let oldest = sort_content(&newest, SortKey::Oldest);
        assert_eq!(ids(&oldest), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_sort_popular_treats_missing_as_zero() {
        let items = library();
        assert_eq!(ids(&sort_content(&items, SortKey::Popular)), vec!["2", "1", "4", "3"]);
    }

    #[test]
    fn test_sort_popular_is_stable_for_ties() {
        let items = vec![
            ContentItem::new("a", "a", ts(1, 1)),
            ContentItem::new("b", "b", ts(1, 2)).with_view_count(0),
            ContentItem::new("c", "c", ts(1, 3)),
        ];
        assert_eq!(ids(&sort_content(&items, SortKey::Popular)), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_sort_title_is_case_insensitive() {
        let items = library();
        assert_eq!(ids(&sort_content(&items, SortKey::Title)), vec!["2", "3", "4", "1"]);
    }

    #[test]
    fn test_sort_unknown_key_is_identity() {
        let items = library();
        let sorted = sort_content(&items, SortKey::parse_lenient("unknown-key"));
        assert_eq!(sorted, items);
    }

    #[test]
    fn test_title_collator_is_total() {
        let collator = TitleCollator::new("en");
        assert_eq!(collator.compare("apple", "Banana"), Ordering::Less);
        assert_ne!(collator.compare("apple", "Apple"), Ordering::Equal);
        assert_eq!(collator.compare("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_sort_title_places_accented_letters_with_base_letter() {
        let items = vec![
            ContentItem::new("z", "Zebra", ts(1, 1)),
            ContentItem::new("e", "Émile", ts(1, 2)),
            ContentItem::new("a", "apple", ts(1, 3)),
        ];
        assert_eq!(ids(&sort_content(&items, SortKey::Title)), vec!["a", "e", "z"]);
    }

    #[test]
    fn test_sort_title_in_locale() {
        let items = vec![
            ContentItem::new("1", "zoo", ts(1, 1)),
            ContentItem::new("2", "école", ts(1, 2)),
            ContentItem::new("3", "eclair", ts(1, 3)),
        ];
        assert_eq!(
            ids(&sort_content_in(&items, SortKey::Title, "fr")),
            vec!["3", "2", "1"]
        );
    }

    #[test]
    fn test_unparseable_locale_uses_root_collation() {
        let collator = TitleCollator::new("not a locale!");
        assert_eq!(collator.locale(), "not a locale!");
        assert_eq!(collator.compare("Émile", "Zebra"), Ordering::Less);
    }

    #[test]
    fn test_unknown_and_missing_formats_pass_type_filter() {
        let json = r#"[
            {"id":"v","title":"t","format":"video","created_at":"2024-01-01T00:00:00Z"},
            {"id":"x","title":"t","format":"hologram","created_at":"2024-01-01T00:00:00Z"},
            {"id":"y","title":"t","created_at":"2024-01-01T00:00:00Z"},
            {"id":"p","title":"t","format":"pdf","created_at":"2024-01-01T00:00:00Z"}
        ]"#;
        let items: Vec<ContentItem> = serde_json::from_str(json).unwrap();
        let options = FilterOptions::new().with_content_type(ContentFormat::Video);
        assert_eq!(ids(&filter_content(&items, &options)), vec!["v", "x", "y"]);
    }

    #[test]
    fn test_unknown_and_missing_access_levels_pass_access_filter() {
        let json = r#"[
            {"id":"f","title":"t","access_level":"free","created_at":"2024-01-01T00:00:00Z"},
            {"id":"x","title":"t","access_level":"vip","created_at":"2024-01-01T00:00:00Z"},
            {"id":"y","title":"t","created_at":"2024-01-01T00:00:00Z"},
            {"id":"p","title":"t","access_level":"premium","created_at":"2024-01-01T00:00:00Z"}
        ]"#;
        let items: Vec<ContentItem> = serde_json::from_str(json).unwrap();
        let options = FilterOptions::new().with_access_level(AccessLevel::Free);
        assert_eq!(ids(&filter_content(&items, &options)), vec!["f", "x", "y"]);
    }

    fn arb_item() -> impl Strategy<Value = ContentItem> {
        (
            "[a-z0-9]{1,6}",
            prop::sample::select(vec!["Intro to AI", "AI Ethics", "Baking bread", "Deep work"]),
            prop::sample::select(vec!["", "a gentle start", "for busy people"]),
            prop::collection::vec(
                prop::sample::select(vec!["ai", "cooking", "wellness", "rust"]),
                0..4,
            ),
            1u32..29,
            prop::option::of(0u64..500),
        )
            .prop_map(|(id, title, description, tags, day, views)| {
                let item = ContentItem::new(id, title, ts(1, day))
                    .with_description(description)
                    .with_tags(tags);
                match views {
                    Some(views) => item.with_view_count(views),
                    None => item,
                }
            })
    }

    proptest! {
        #[test]
        fn prop_search_results_contain_every_term(
            items in prop::collection::vec(arb_item(), 0..16),
            query in prop::sample::select(vec!["ai", "in", "AI ethics", "BAK", "busy people", "zzz"]),
        ) {
            let options = FilterOptions::new().with_search(query);
            let terms = options.search_terms();
            let result = filter_content(&items, &options);

            for item in &result {
                let haystack = item.search_text();
                prop_assert!(terms.iter().all(|t| haystack.contains(t.as_str())));
            }
            let expected = items
                .iter()
                .filter(|i| terms.iter().all(|t| i.search_text().contains(t.as_str())))
                .count();
            prop_assert_eq!(result.len(), expected);
        }

        #[test]
        fn prop_tag_results_carry_every_selected_tag(
            items in prop::collection::vec(arb_item(), 0..16),
            selected in prop::collection::btree_set(
                prop::sample::select(vec!["ai", "cooking", "wellness", "rust"]),
                0..3,
            ),
        ) {
            let options = FilterOptions::new().require_tags(selected.iter().copied());
            let result = filter_content(&items, &options);

            for item in &result {
                for tag in &selected {
                    prop_assert!(item.has_tag(tag));
                }
            }
            let expected = items
                .iter()
                .filter(|i| selected.iter().all(|t| i.has_tag(t)))
                .count();
            prop_assert_eq!(result.len(), expected);
        }

        #[test]
        fn prop_empty_options_keep_input(items in prop::collection::vec(arb_item(), 0..16)) {
            let result = filter_content(&items, &FilterOptions::new());
            prop_assert_eq!(result, items);
        }

        #[test]
        fn prop_sort_is_a_permutation(
            items in prop::collection::vec(arb_item(), 0..16),
            key in prop::sample::select(vec![
                SortKey::Newest,
                SortKey::Oldest,
                SortKey::Popular,
                SortKey::Title,
                SortKey::Unsorted,
            ]),
        ) {
            let sorted = sort_content(&items, key);
            let mut before: Vec<&str> = ids(&items);
            let mut after: Vec<&str> = ids(&sorted);
            before.sort_unstable();
            after.sort_unstable();
            prop_assert_eq!(before, after);
        }
    }
}
