//! Tag resolution workflow for memo creation.
//!
//! # Responsibility
//! - Parse a raw comma-separated tag string into candidate names.
//! - Resolve each name to an existing or newly created user-scoped tag and
//!   link it to the memo, sequentially and best-effort.
//!
//! # Invariants
//! - Name matching is case-sensitive exact; duplicates within one batch
//!   collapse to the first occurrence.
//! - One name's failure never aborts the remaining names; every outcome is
//!   recorded in the returned report.
//! - The memo row itself is never rolled back here; partial linking is a
//!   representable, non-fatal result.

use crate::model::{MemoId, TagId, UserId};
use crate::store::{StoreResult, TagStore};
use log::warn;

/// One successfully linked tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedTag {
    pub tag_id: TagId,
    pub name: String,
    /// Whether the tag was created during this resolution (vs reused).
    pub created: bool,
}

/// One name that could not be resolved or linked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLinkFailure {
    pub name: String,
    pub message: String,
}

/// Per-step outcome report: "memo created, N of M tags linked".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagResolution {
    /// Parsed candidate names, in attempt order.
    pub requested: Vec<String>,
    pub linked: Vec<LinkedTag>,
    pub failed: Vec<TagLinkFailure>,
}

impl TagResolution {
    /// True when every requested name was linked.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn requested_count(&self) -> usize {
        self.requested.len()
    }

    pub fn linked_count(&self) -> usize {
        self.linked.len()
    }
}

/// Splits a raw comma-separated tag string into candidate names.
///
/// Segments are trimmed, empty segments dropped, and duplicate names
/// collapsed to their first occurrence. Case is preserved: `Go` and `go`
/// are distinct candidates.
pub fn parse_tag_names(raw: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for segment in raw.split(',') {
        let trimmed = segment.trim();
        if trimmed.is_empty() {
            continue;
        }
        if names.iter().any(|seen| seen == trimmed) {
            continue;
        }
        names.push(trimmed.to_string());
    }
    names
}

/// Resolves every candidate name and links it to `memo_id`, best-effort.
pub fn resolve_and_link<S: TagStore>(
    store: &S,
    user_id: UserId,
    memo_id: MemoId,
    raw_tags: &str,
) -> TagResolution {
    let requested = parse_tag_names(raw_tags);
    let mut report = TagResolution {
        requested: requested.clone(),
        ..TagResolution::default()
    };

    for name in requested {
        match link_one(store, user_id, memo_id, &name) {
            Ok(linked) => report.linked.push(linked),
            Err(err) => {
                warn!(
                    "event=tag_link module=service status=error memo_id={memo_id} name={name} error={err}"
                );
                report.failed.push(TagLinkFailure {
                    name,
                    message: err.to_string(),
                });
            }
        }
    }

    report
}

fn link_one<S: TagStore>(
    store: &S,
    user_id: UserId,
    memo_id: MemoId,
    name: &str,
) -> StoreResult<LinkedTag> {
    let (tag, created) = match store.find_by_name(user_id, name)? {
        Some(existing) => (existing, false),
        None => (store.insert(user_id, name)?, true),
    };

    store.link_memo(memo_id, tag.id)?;
    Ok(LinkedTag {
        tag_id: tag.id,
        name: tag.name,
        created,
    })
}
