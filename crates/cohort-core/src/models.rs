//! Data model for library content and per-user progress.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::defaults::COMPLETE_PERCENT;

// =============================================================================
// CONTENT FORMAT
// =============================================================================

/// Media format of a content item.
///
/// Values outside the known set, and a missing field, deserialize to
/// [`ContentFormat::Other`]. Filters treat `Other` as unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContentFormat {
    Video,
    Pdf,
    Audio,
    Image,
    Link,
    #[default]
    Text,
    Course,
    #[serde(other)]
    Other,
}

impl std::fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Video => write!(f, "video"),
            Self::Pdf => write!(f, "pdf"),
            Self::Audio => write!(f, "audio"),
            Self::Image => write!(f, "image"),
            Self::Link => write!(f, "link"),
            Self::Text => write!(f, "text"),
            Self::Course => write!(f, "course"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for ContentFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "video" => Ok(Self::Video),
            "pdf" => Ok(Self::Pdf),
            "audio" => Ok(Self::Audio),
            "image" => Ok(Self::Image),
            "link" => Ok(Self::Link),
            "text" => Ok(Self::Text),
            "course" => Ok(Self::Course),
            "other" => Ok(Self::Other),
            _ => Err(format!("Invalid content format: {}", s)),
        }
    }
}

// =============================================================================
// ACCESS LEVEL
// =============================================================================

/// Who may open a content item.
///
/// Unknown or missing values deserialize to [`AccessLevel::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    #[default]
    Free,
    /// Any signed-in member of the community.
    Members,
    /// Paying subscribers only.
    Premium,
    #[serde(other)]
    Other,
}

impl std::fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Free => write!(f, "free"),
            Self::Members => write!(f, "members"),
            Self::Premium => write!(f, "premium"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for AccessLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "members" => Ok(Self::Members),
            "premium" => Ok(Self::Premium),
            "other" => Ok(Self::Other),
            _ => Err(format!("Invalid access level: {}", s)),
        }
    }
}

// =============================================================================
// CONTENT ITEM
// =============================================================================

/// One piece of library or feed content as delivered by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "unspecified_format", alias = "content_type")]
    pub format: ContentFormat,
    #[serde(default = "unspecified_access_level")]
    pub access_level: AccessLevel,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Absent when the backend has not counted views yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_count: Option<u64>,
}

fn unspecified_format() -> ContentFormat {
    ContentFormat::Other
}

fn unspecified_access_level() -> AccessLevel {
    AccessLevel::Other
}

impl ContentItem {
    /// Create a free text item with no tags, space or views.
    pub fn new(id: impl Into<String>, title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            format: ContentFormat::default(),
            access_level: AccessLevel::default(),
            tags: Vec::new(),
            space_id: None,
            created_at,
            view_count: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_format(mut self, format: ContentFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_access_level(mut self, access_level: AccessLevel) -> Self {
        self.access_level = access_level;
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn in_space(mut self, space_id: impl Into<String>) -> Self {
        self.space_id = Some(space_id.into());
        self
    }

    pub fn with_view_count(mut self, view_count: u64) -> Self {
        self.view_count = Some(view_count);
        self
    }

    /// Lower-cased title and description joined by a space, the haystack
    /// searched by free-text queries.
    pub fn search_text(&self) -> String {
        format!("{} {}", self.title, self.description).to_lowercase()
    }

    /// Whether the item carries `tag` (exact match).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

// =============================================================================
// CONTENT PROGRESS
// =============================================================================

/// Completion state of one content item for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentProgress {
    pub user_id: String,
    pub content_id: String,
    /// Percentage in `0..=100`; callers clamp before reporting.
    pub progress: u8,
    pub completed: bool,
    pub last_accessed: DateTime<Utc>,
    #[serde(default)]
    pub points_awarded: bool,
}

impl ContentProgress {
    /// Start tracking a content item with the first reported value.
    pub fn new(
        user_id: impl Into<String>,
        content_id: impl Into<String>,
        progress: u8,
        completed_override: bool,
        now: DateTime<Utc>,
    ) -> Self {
        let mut record = Self {
            user_id: user_id.into(),
            content_id: content_id.into(),
            progress: 0,
            completed: false,
            last_accessed: now,
            points_awarded: false,
        };
        record.record(progress, completed_override, now);
        record
    }

    /// Overwrite progress in place.
    ///
    /// `completed` is `completed_override || progress == 100`; a record
    /// reaching 100 can never be stored as incomplete.
    pub fn record(&mut self, progress: u8, completed_override: bool, now: DateTime<Utc>) {
        self.progress = progress;
        self.completed = completed_override || progress == COMPLETE_PERCENT;
        self.last_accessed = now;
    }

    /// Started but not finished.
    pub fn is_in_progress(&self) -> bool {
        !self.completed && self.progress > 0
    }
}

// =============================================================================
// TESTS
// =============================================================================
