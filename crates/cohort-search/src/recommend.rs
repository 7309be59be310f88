//! Tag-based content suggestions for the library widget.
//!
//! The interest signal is the visited-tag list kept by the library view
//! state. Each item scores one point per interest tag it carries; matching
//! is case-insensitive because tags are typed by members.

use std::collections::HashSet;

use cohort_core::ContentItem;
use tracing::{debug, trace};

/// A suggested item with the number of interest tags it matched.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub item: ContentItem,
    pub score: usize,
}

/// Suggest up to `limit` items carrying at least one interest tag.
///
/// Items in `exclude_ids` (typically the recently viewed list) are skipped.
/// Ordered by score descending, then newest first, then input order.
pub fn recommend_content<S, E>(
    items: &[ContentItem],
    interest_tags: &[S],
    exclude_ids: &[E],
    limit: usize,
) -> Vec<Recommendation>
where
    S: AsRef<str>,
    E: AsRef<str>,
{
    let interests: HashSet<String> = interest_tags
        .iter()
        .map(|t| t.as_ref().to_lowercase())
        .collect();
    let excluded: HashSet<&str> = exclude_ids.iter().map(AsRef::as_ref).collect();

    if interests.is_empty() || limit == 0 {
        return Vec::new();
    }

    let mut scored: Vec<Recommendation> = items
        .iter()
        .filter(|item| !excluded.contains(item.id.as_str()))
        .filter_map(|item| {
            let score = item
                .tags
                .iter()
                .map(|t| t.to_lowercase())
                .collect::<HashSet<_>>()
                .intersection(&interests)
                .count();
            trace!(content_id = %item.id, score, "Scored recommendation candidate");
            (score > 0).then(|| Recommendation {
                item: item.clone(),
                score,
            })
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| b.item.created_at.cmp(&a.item.created_at))
    });
    scored.truncate(limit);

    debug!(
        subsystem = "search",
        component = "recommend",
        op = "recommend",
        result_count = scored.len(),
        total_count = items.len(),
        "Built recommendations"
    );

    scored
}

/// Items for a recently viewed id list, in list order.
///
/// Ids no longer present in `items` are skipped.
pub fn resolve_recent<E>(items: &[ContentItem], recent_ids: &[E]) -> Vec<ContentItem>
where
    E: AsRef<str>,
{
    recent_ids
        .iter()
        .filter_map(|id| items.iter().find(|item| item.id == id.as_ref()))
        .cloned()
        .collect()
}
