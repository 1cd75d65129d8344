//! Sync bundle envelope: the wire document exchanged with remote stores.

use crate::error::{ProtocolError, ProtocolResult};
use crate::snippet::Snippet;
use serde::{Deserialize, Serialize};

/// Current bundle schema version.
pub const BUNDLE_VERSION: &str = "3.0.0";

/// The versioned envelope containing the full snippet universe.
///
/// A bundle MUST be built from the complete universe: active, trashed,
/// and purged records alike. A bundle built from a partial read would
/// drop tombstones and resurrect deleted snippets on the next peer that
/// merges it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncBundle {
    /// Bundle schema version string.
    pub version: String,
    /// Time the bundle was assembled (epoch milliseconds).
    #[serde(rename = "lastSync")]
    pub last_sync: i64,
    /// Every snippet known to the producing store.
    pub snippets: Vec<Snippet>,
}

impl SyncBundle {
    /// Assembles a bundle from the complete snippet universe.
    #[must_use]
    pub fn build(snippets: Vec<Snippet>, now_ms: i64) -> Self {
        Self {
            version: BUNDLE_VERSION.to_owned(),
            last_sync: now_ms,
            snippets,
        }
    }

    /// Parses a bundle from its UTF-8 JSON transport form.
    ///
    /// Corrupt JSON, a non-object document, or a missing/non-array
    /// `snippets` field fail with [`ProtocolError::MalformedBundle`].
    /// Individual records that fail shape validation are dropped from the
    /// parsed set; a record that cannot be identified cannot participate
    /// in a merge anyway.
    pub fn parse(bytes: &[u8]) -> ProtocolResult<Self> {
        let document: serde_json::Value = serde_json::from_slice(bytes)
            .map_err(|e| ProtocolError::malformed(format!("invalid JSON: {e}")))?;

        let object = document
            .as_object()
            .ok_or_else(|| ProtocolError::malformed("document is not an object"))?;

        let elements = object
            .get("snippets")
            .ok_or_else(|| ProtocolError::malformed("missing snippets field"))?
            .as_array()
            .ok_or_else(|| ProtocolError::malformed("snippets is not an array"))?;

        let snippets = elements
            .iter()
            .filter_map(|el| serde_json::from_value::<Snippet>(el.clone()).ok())
            .collect();

        Ok(Self {
            version: object
                .get("version")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_owned(),
            last_sync: object
                .get("lastSync")
                .and_then(serde_json::Value::as_i64)
                .unwrap_or(0),
            snippets,
        })
    }

    /// Serializes the bundle to its UTF-8 JSON transport form.
    pub fn to_bytes(&self) -> ProtocolResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}
