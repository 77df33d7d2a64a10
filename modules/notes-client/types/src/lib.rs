//! Shared types for the notes REST API and its clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Error text returned when a note is submitted without a usable title.
pub const TITLE_REQUIRED: &str = "Title is required";
/// Error text returned when no note exists under the requested id.
pub const NOTE_NOT_FOUND: &str = "Note not found";
/// Confirmation text returned after a successful delete.
pub const NOTE_DELETED: &str = "Note deleted successfully";

// =====================================================
// Domain Types
// =====================================================

/// A titled piece of text content with timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-side ordering of the note list by creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Newest first
    #[default]
    Latest,
    Oldest,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Latest => "latest",
            SortOrder::Oldest => "oldest",
        }
    }

}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "latest" | "newest" => Ok(SortOrder::Latest),
            "oldest" => Ok(SortOrder::Oldest),
            other => Err(format!("unknown sort order '{}' (expected latest or oldest)", other)),
        }
    }
}

// =====================================================
// Request Types
// =====================================================

/// Body of `POST /api/notes`.
///
/// `title` is required but modelled as optional so a missing title is
/// reported as a validation failure rather than a parse failure.
/// `content` defaults to the empty string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateNoteRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl CreateNoteRequest {
    pub fn new(title: impl Into<String>, content: Option<String>) -> Self {
        Self {
            title: Some(title.into()),
            content,
        }
    }
}

/// Body of `PUT /api/notes/{id}`. A field left as `None` keeps its stored value.
///
/// `title` keeps an explicit `null` apart from an absent key: absent is
/// `None`, `null` is `Some(None)` and fails the title check on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateNoteRequest {
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl UpdateNoteRequest {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: Some(Some(title.into())),
            content: Some(content.into()),
        }
    }

    /// The title this request would store, if it sets a usable one
    pub fn title(&self) -> Option<&str> {
        self.title.as_ref().and_then(|t| t.as_deref())
    }
}

/// Wrap any value that is present in the body, `null` included, in `Some`.
/// Paired with `#[serde(default)]` so a missing key stays `None`.
fn deserialize_present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

// =====================================================
// Response Types
// =====================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}
