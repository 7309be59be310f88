//! # cohort-state
//!
//! Per-session state for the cohort content library: content progress
//! tracking, visited tags and recently viewed content, and the storage
//! providers they persist through.

pub mod config;
pub mod library_state;
pub mod progress;
pub mod storage;

#[cfg(test)]
mod tests;

pub use config::{ConfigError, ConfigResult, LibraryConfig};
pub use library_state::LibraryViewState;
pub use progress::{KvProgressStore, MemoryProgressStore, ProgressSummary, ProgressTracker};
pub use storage::{open_store, JsonFileStore, MemoryStore};
