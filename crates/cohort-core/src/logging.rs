//! Structured logging field name constants for cohort.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation can query the same names across every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | State could not be kept consistent, requires attention |
//! | WARN  | Recoverable issue, automatic fallback applied (malformed storage, failed write) |
//! | INFO  | Lifecycle events (state loaded, store opened) |
//! | DEBUG | Decision points, recomputations, config choices |
//! | TRACE | Per-item iteration (predicate rejections, recommendation scores) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "search", "state", "config"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "filter_service", "content_filter", "progress_tracker", "library_view"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "filter", "sort", "update_progress", "track_view"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Content item identifier being operated on.
pub const CONTENT_ID: &str = "content_id";

/// User whose progress is being tracked.
pub const USER_ID: &str = "user_id";

/// Local storage key read or written.
pub const STORAGE_KEY: &str = "storage_key";

/// Tag being recorded or matched.
pub const TAG: &str = "tag";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Number of items surviving a filter pass.
pub const RESULT_COUNT: &str = "result_count";

/// Number of items before filtering.
pub const TOTAL_COUNT: &str = "total_count";

/// Number of active filter dimensions.
pub const ACTIVE_FILTERS: &str = "active_filters";

/// Progress percentage reported for a content item.
pub const PROGRESS: &str = "progress";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const ALL_FIELDS: &[&str] = &[
        SUBSYSTEM,
        COMPONENT,
        OPERATION,
        CONTENT_ID,
        USER_ID,
        STORAGE_KEY,
        TAG,
        RESULT_COUNT,
        TOTAL_COUNT,
        ACTIVE_FILTERS,
        PROGRESS,
        SUCCESS,
        ERROR_MSG,
    ];

    #[test]
    fn test_field_names_are_unique() {
        let unique: HashSet<_> = ALL_FIELDS.iter().collect();
        assert_eq!(unique.len(), ALL_FIELDS.len());
    }

    #[test]
    fn test_field_names_are_snake_case() {
        for field in ALL_FIELDS {
            assert!(
                field
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c == '_'),
                "field {field} is not snake_case"
            );
        }
    }
}
