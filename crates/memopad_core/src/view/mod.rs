//! Derived views: pure projections over replica slices.
//!
//! # Responsibility
//! - Filter, sort, search and aggregate fetched rows without touching
//!   stores or session state.
//!
//! # Invariants
//! - Every function is pure and synchronous; callers recompute from the
//!   current replica plus current filter/sort/search inputs.

pub mod category_view;
pub mod memo_view;

pub use category_view::filter_categories;
pub use memo_view::{
    derive_memo_list, filter_by_tag, search_memos, sort_memos, tag_usage, SortDirection, SortKey,
};
