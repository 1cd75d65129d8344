//! Well-known settings keys.
//!
//! The settings store is an open string-keyed map; these are the keys the
//! bundled surfaces agree on.

/// UI language tag.
pub const LANGUAGE: &str = "language";

/// Library column count.
pub const COLUMN_COUNT: &str = "column_count";

/// Sites the capture surface should stay off of.
pub const BLOCKED_SITES: &str = "blocked_sites";

/// Recently used tags, most recent first.
pub const RECENT_TAGS: &str = "recent_tags";

/// Persisted sync backend configuration, including the last-known remote
/// change token. Never merged from a peer.
pub const SYNC_CONFIG: &str = "sync_config";

/// Wall-clock time (epoch ms) of the last successful sync cycle. Gates
/// the retention sweep and feeds the "last synced" display.
pub const LAST_SYNCED_AT: &str = "last_synced_at";
