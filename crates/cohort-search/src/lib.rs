//! # cohort-search
//!
//! Client-side filtering, sorting, and recommendations over content listings.
//!
//! - [`filter_service`]: pure predicate filtering and stable sorting
//! - [`content_filter`]: live filter selections with an always-current view
//! - [`recommend`]: tag-based suggestions and recently viewed resolution

pub mod content_filter;
pub mod filter_service;
pub mod recommend;

pub use content_filter::{ContentFilter, FilterState, ResultSummary};
pub use filter_service::{filter_content, matches, sort_content, sort_content_in, TitleCollator};
pub use recommend::{recommend_content, resolve_recent, Recommendation};
