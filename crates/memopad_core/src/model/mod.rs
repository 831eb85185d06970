//! Domain records mirroring the remote relational schema.
//!
//! # Responsibility
//! - Define the wire-shaped rows the stores fetch and return.
//! - Define draft/input types for mutation operations.
//!
//! # Invariants
//! - Every record is identified by a stable UUID assigned at insert time.
//! - Derived counts (`memo_count`) are aggregated at fetch, never stored.

pub mod record;

pub use record::{
    Category, CategoryId, CategorySummary, Memo, MemoDraft, MemoId, Tag, TagId, TagRef, TagUsage,
    UserId,
};
