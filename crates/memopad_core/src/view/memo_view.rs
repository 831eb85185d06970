//! Derived memo projections: tag filter, sort, search, tag aggregation.
//!
//! # Invariants
//! - Tag filter is a case-sensitive exact name match (single-select).
//! - Search is a case-insensitive substring match across title, usage,
//!   example, application and linked tag names; it narrows the already
//!   filtered/sorted slice.
//! - Tag usage aggregates over the full replica slice, not the filtered
//!   view, so the tag cloud and the delete gate see every link.

use crate::model::Memo;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Sortable memo field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    CreatedAt,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Keeps memos having at least one linked tag named exactly `active_tag`.
/// `None` disables the filter (toggled-off state).
pub fn filter_by_tag<'a>(memos: &'a [Memo], active_tag: Option<&str>) -> Vec<&'a Memo> {
    match active_tag {
        Some(active) => memos
            .iter()
            .filter(|memo| memo.tags.iter().any(|tag| tag.name == active))
            .collect(),
        None => memos.iter().collect(),
    }
}

/// Sorts memos by the given key and direction.
///
/// Titles compare case-insensitively (Unicode code-point order) with the
/// exact string as tie-break; `created_at` compares numerically.
pub fn sort_memos(mut memos: Vec<&Memo>, key: SortKey, direction: SortDirection) -> Vec<&Memo> {
    memos.sort_by(|a, b| {
        let ordering = match key {
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            SortKey::Title => compare_titles(&a.title, &b.title),
        };
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
    memos
}

/// Narrows a memo slice to entries matching `query` case-insensitively in
/// any text section or linked tag name. A blank query matches everything.
pub fn search_memos<'a>(memos: Vec<&'a Memo>, query: &str) -> Vec<&'a Memo> {
    let needle = query.to_lowercase();
    memos
        .into_iter()
        .filter(|memo| {
            memo.title.to_lowercase().contains(&needle)
                || memo.usage.to_lowercase().contains(&needle)
                || memo.example.to_lowercase().contains(&needle)
                || memo.application.to_lowercase().contains(&needle)
                || memo
                    .tags
                    .iter()
                    .any(|tag| tag.name.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Counts, per distinct tag name, how many links reference it across the
/// slice. Feeds the tag cloud and the tag deletion gate.
pub fn tag_usage(memos: &[Memo]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for memo in memos {
        for tag in &memo.tags {
            *counts.entry(tag.name.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// Full render pipeline: tag filter, then sort, then search narrowing.
pub fn derive_memo_list<'a>(
    memos: &'a [Memo],
    active_tag: Option<&str>,
    key: SortKey,
    direction: SortDirection,
    query: &str,
) -> Vec<&'a Memo> {
    let filtered = filter_by_tag(memos, active_tag);
    let sorted = sort_memos(filtered, key, direction);
    search_memos(sorted, query)
}

fn compare_titles(a: &str, b: &str) -> Ordering {
    let folded_a = a.to_lowercase();
    let folded_b = b.to_lowercase();
    folded_a.cmp(&folded_b).then_with(|| a.cmp(b))
}
