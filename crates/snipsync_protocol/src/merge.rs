//! Last-writer-wins reconciliation of two snippet collections.

use crate::snippet::{Snippet, SnippetId};
use std::collections::HashMap;

/// Options controlling merge behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOptions {
    /// When both sides carry the same `updated_at`, pick the remote record.
    pub prefer_remote_on_tie: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            prefer_remote_on_tie: true,
        }
    }
}

/// Reconciles two snippet collections into one.
///
/// The result contains exactly one record per id in the union of both
/// inputs. Ids present on one side pass through unchanged; ids present
/// on both resolve to the side with the strictly greater `updated_at`,
/// with ties broken by [`MergeOptions::prefer_remote_on_tie`].
///
/// Replacement is whole-record, not field-level: any mutation must bump
/// `updated_at` or it loses to an untouched copy on the other side.
///
/// Pure function: no I/O, inputs are not mutated, and the outcome is
/// deterministic for a given pair of inputs. Output ordering is
/// unspecified.
///
/// Each input is expected to hold unique ids (stores guarantee this);
/// duplicates within one side collapse to the last occurrence.
#[must_use]
pub fn merge(local: &[Snippet], remote: &[Snippet], options: &MergeOptions) -> Vec<Snippet> {
    let local_by_id: HashMap<&SnippetId, &Snippet> =
        local.iter().map(|s| (&s.id, s)).collect();
    let remote_by_id: HashMap<&SnippetId, &Snippet> =
        remote.iter().map(|s| (&s.id, s)).collect();

    let mut merged = Vec::with_capacity(local_by_id.len() + remote_by_id.len());

    for (id, &local_record) in &local_by_id {
        match remote_by_id.get(id) {
            Some(&remote_record) => merged.push(pick(local_record, remote_record, options).clone()),
            None => merged.push(local_record.clone()),
        }
    }
    for (id, &remote_record) in &remote_by_id {
        if !local_by_id.contains_key(id) {
            merged.push(remote_record.clone());
        }
    }

    merged
}

fn pick<'a>(local: &'a Snippet, remote: &'a Snippet, options: &MergeOptions) -> &'a Snippet {
    if remote.updated_at > local.updated_at {
        remote
    } else if remote.updated_at < local.updated_at {
        local
    } else if options.prefer_remote_on_tie {
        remote
    } else {
        local
    }
}
