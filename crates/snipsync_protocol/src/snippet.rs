//! Snippet record and identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Maximum snippet text length, in characters.
///
/// Text is clamped to this length at creation and edit time; the limit is
/// part of the wire contract, not a local display concern.
pub const MAX_TEXT_LEN: usize = 144;

/// Unique identifier for a snippet.
///
/// Ids are opaque strings on the wire; freshly minted ids are UUID v4.
/// An id is assigned at creation, immutable, and never reused. Across
/// stores the same id denotes the same logical snippet, which is what
/// makes merge-by-id meaningful.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnippetId(String);

impl SnippetId {
    /// Creates a new random snippet id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wraps an existing raw id.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SnippetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SnippetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SnippetId({})", self.0)
    }
}

impl fmt::Display for SnippetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SnippetId {
    fn from(raw: &str) -> Self {
        Self(raw.to_owned())
    }
}

/// Origin of a snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnippetKind {
    /// Text captured from a web page.
    Web,
    /// A freeform note.
    Note,
}

/// A stored user-captured text fragment or note; the unit of sync.
///
/// The same shape serves as the storage record and the wire record inside
/// a sync bundle. Lifecycle state is carried in `deleted_at`/`purged_at`
/// tombstone fields rather than by physical removal, so deletions
/// propagate to other synced copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    /// Unique identifier, immutable after creation.
    pub id: SnippetId,
    /// Web clip or freeform note.
    #[serde(rename = "type")]
    pub kind: SnippetKind,
    /// Snippet text, at most [`MAX_TEXT_LEN`] characters.
    pub text: String,
    /// Source URL, if the snippet is linked to a page.
    #[serde(default)]
    pub url: Option<String>,
    /// Hostname derived from `url`.
    #[serde(default)]
    pub domain: Option<String>,
    /// Creation time (epoch milliseconds), set once.
    #[serde(default)]
    pub created_at: i64,
    /// Last mutation time (epoch milliseconds), bumped on every content
    /// change including soft-delete and restore. A missing value
    /// deserializes as 0 and loses every merge comparison.
    #[serde(default)]
    pub updated_at: i64,
    /// Non-null means the snippet is in the trash.
    #[serde(default)]
    pub deleted_at: Option<i64>,
    /// Non-null means the snippet is scheduled for permanent removal and
    /// hidden from all listings, trash included. Implies `deleted_at`.
    #[serde(default)]
    pub purged_at: Option<i64>,
}

impl Snippet {
    /// Returns true if the snippet appears in active views.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none() && self.purged_at.is_none()
    }

    /// Returns true if the snippet appears in trash views.
    #[must_use]
    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some() && self.purged_at.is_none()
    }

    /// Returns true if the snippet is hidden from all views.
    #[must_use]
    pub fn is_purged(&self) -> bool {
        self.purged_at.is_some()
    }

    /// Clamps text to [`MAX_TEXT_LEN`] characters, on a char boundary.
    #[must_use]
    pub fn clamp_text(text: &str) -> String {
        text.chars().take(MAX_TEXT_LEN).collect()
    }

    /// Derives the hostname for a source URL.
    ///
    /// Returns `None` for unparseable URLs or URLs without a host.
    #[must_use]
    pub fn domain_of(url: &str) -> Option<String> {
        url::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_owned))
    }
}
