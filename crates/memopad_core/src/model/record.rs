//! Entity records for categories, memos and tags.
//!
//! # Responsibility
//! - Mirror the remote store's row shapes, including pre-joined relations.
//! - Keep serialization names aligned with the backing column names.
//!
//! # Invariants
//! - A memo's `category_id` references a category owned by the same user;
//!   the store enforces this, records do not re-validate it.
//! - `(user_id, name)` is unique within a user's tag set.

use crate::replica::Keyed;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Owning user id, assigned by the auth layer outside this crate.
pub type UserId = Uuid;
/// Stable category id.
pub type CategoryId = Uuid;
/// Stable memo id.
pub type MemoId = Uuid;
/// Stable tag id.
pub type TagId = Uuid;

/// A named grouping that owns zero or more memos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub user_id: UserId,
    pub name: String,
    /// Unix epoch milliseconds, assigned by the store at insert time.
    pub created_at: i64,
}

/// Category row plus its aggregated memo count, as listed on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: CategoryId,
    pub user_id: UserId,
    pub name: String,
    pub created_at: i64,
    /// Number of memos currently owned by this category (derived).
    pub memo_count: u32,
}

/// Pre-joined memo↔tag link carried inside a fetched memo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRef {
    pub tag_id: TagId,
    pub name: String,
}

/// A single note record with three free-text sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memo {
    pub id: MemoId,
    pub category_id: CategoryId,
    pub user_id: UserId,
    pub title: String,
    pub usage: String,
    pub example: String,
    pub application: String,
    /// Optional reference URL; blank input is normalized to `None`.
    pub reference_url: Option<String>,
    pub created_at: i64,
    /// Linked tags, pre-joined at fetch time. May lag behind the remote
    /// state right after creation when tag linking partially failed.
    pub tags: Vec<TagRef>,
}

/// A user-scoped label, many-to-many with memos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub user_id: UserId,
    pub name: String,
    pub created_at: i64,
}

/// Tag row plus its aggregated link count, as listed on the tag index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagUsage {
    pub id: TagId,
    pub user_id: UserId,
    pub name: String,
    pub created_at: i64,
    /// Number of memos currently linking this tag (derived).
    pub memo_count: u32,
}

/// Input buffer for memo add/update operations.
///
/// `reference_url` stays a plain string here to match form input; the store
/// normalizes blank values to SQL NULL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoDraft {
    pub title: String,
    pub usage: String,
    pub example: String,
    pub application: String,
    pub reference_url: String,
}

impl From<&Memo> for MemoDraft {
    /// Seeds an edit buffer from an existing memo.
    fn from(memo: &Memo) -> Self {
        Self {
            title: memo.title.clone(),
            usage: memo.usage.clone(),
            example: memo.example.clone(),
            application: memo.application.clone(),
            reference_url: memo.reference_url.clone().unwrap_or_default(),
        }
    }
}

impl Keyed for CategorySummary {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Keyed for Memo {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Keyed for TagUsage {
    fn key(&self) -> Uuid {
        self.id
    }
}
