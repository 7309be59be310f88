//! # cohort-core
//!
//! Core types, traits, and abstractions for the cohort content library.
//!
//! This crate provides the data model, filter option types, and storage
//! traits that the other cohort crates depend on.

pub mod defaults;
pub mod error;
pub mod filter;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use filter::{parse_selection, parse_space_selection, DateRange, FilterOptions, SortKey};
pub use models::*;
pub use traits::*;
