//! Centralized default constants for cohort.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own magic numbers.

// =============================================================================
// LIBRARY VIEW STATE
// =============================================================================

/// Maximum number of visited tags kept as the interest signal.
pub const MAX_VISITED_TAGS: usize = 5;

/// Maximum number of recently viewed content ids kept.
pub const MAX_RECENTLY_VIEWED: usize = 10;

/// Local storage key holding the visited tag list.
pub const VISITED_TAGS_KEY: &str = "visitedTags";

/// Local storage key holding the recently viewed content id list.
pub const RECENTLY_VIEWED_KEY: &str = "recentlyViewed";

/// Key prefix for per-user progress documents in a key-value store.
pub const CONTENT_PROGRESS_KEY_PREFIX: &str = "contentProgress";

// =============================================================================
// RECOMMENDATIONS
// =============================================================================

/// Default number of recommended items shown by the library widget.
pub const RECOMMENDATION_LIMIT: usize = 6;

// =============================================================================
// PROGRESS
// =============================================================================

/// Progress value at which content counts as completed.
pub const COMPLETE_PERCENT: u8 = 100;

// =============================================================================
// FILTERING
// =============================================================================

/// Selector value meaning "no constraint" for type, access level and space.
pub const ALL_SENTINEL: &str = "all";

// =============================================================================
// LOCALE
// =============================================================================

/// Default locale used when none is configured.
pub const LOCALE: &str = "en";

/// Seed interest tags used when no visited tags have been persisted yet.
///
/// Unknown locales fall back to the English seed set. Region suffixes
/// (`de-AT`, `pt_BR`) are matched on their language part.
pub fn seed_tags(locale: &str) -> &'static [&'static str] {
    let language = locale
        .split(['-', '_'])
        .next()
        .unwrap_or(LOCALE)
        .to_ascii_lowercase();

    match language.as_str() {
        "de" => &["Führung", "Gesundheit", "Technologie"],
        "es" => &["liderazgo", "bienestar", "tecnología"],
        "fr" => &["leadership", "bien-être", "technologie"],
        _ => &["leadership", "wellness", "technology"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_tags_english_default() {
        assert_eq!(seed_tags("en"), &["leadership", "wellness", "technology"]);
    }

    #[test]
    fn test_seed_tags_region_suffix() {
        assert_eq!(seed_tags("de-AT"), seed_tags("de"));
        assert_eq!(seed_tags("es_MX"), seed_tags("es"));
    }

    #[test]
    fn test_seed_tags_unknown_locale_falls_back() {
        assert_eq!(seed_tags("xx"), seed_tags(LOCALE));
        assert_eq!(seed_tags(""), seed_tags(LOCALE));
    }

    #[test]
    fn test_seed_tags_fit_visited_capacity() {
        for locale in ["en", "de", "es", "fr"] {
            assert!(seed_tags(locale).len() <= MAX_VISITED_TAGS);
        }
    }
}
