//! Versioned persistence image.

use crate::error::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use snipsync_protocol::Snippet;
use std::collections::BTreeMap;

/// Current persistence schema version.
pub const SCHEMA_VERSION: u32 = 3;

/// The on-disk shape of a store: snippets plus settings under a schema
/// version header.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct StoreImage {
    #[serde(default)]
    pub schema_version: u32,
    #[serde(default)]
    pub snippets: Vec<Snippet>,
    #[serde(default)]
    pub settings: BTreeMap<String, serde_json::Value>,
}

impl StoreImage {
    pub(crate) fn new() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            ..Self::default()
        }
    }

    /// Decodes and upgrades a persisted image.
    ///
    /// Older schema versions are carried forward: absent fields fill with
    /// defaults during deserialization, so the upgrade is a version bump.
    /// An image written by a *newer* schema is refused rather than
    /// silently reinterpreted.
    pub(crate) fn decode(bytes: &[u8]) -> StoreResult<Self> {
        let mut image: StoreImage = serde_json::from_slice(bytes)?;

        if image.schema_version > SCHEMA_VERSION {
            return Err(StoreError::invalid_format(format!(
                "store schema version {} is newer than supported version {}",
                image.schema_version, SCHEMA_VERSION
            )));
        }
        if image.schema_version < SCHEMA_VERSION {
            tracing::info!(
                from = image.schema_version,
                to = SCHEMA_VERSION,
                "upgrading store image"
            );
            image.schema_version = SCHEMA_VERSION;
        }

        Ok(image)
    }

    pub(crate) fn encode(&self) -> StoreResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}
