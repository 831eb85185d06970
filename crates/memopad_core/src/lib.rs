//! Core view-model logic for Memopad: a user's categories, memos and tags
//! kept in local replicas synchronized with a remote relational store.
//! This crate is the single source of truth for replica/mutation invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod replica;
pub mod service;
pub mod session;
pub mod store;
pub mod view;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::{
    Category, CategoryId, CategorySummary, Memo, MemoDraft, MemoId, Tag, TagId, TagRef, TagUsage,
    UserId,
};
pub use replica::{Change, Keyed, Replica};
pub use service::{
    parse_tag_names, resolve_and_link, CategoryService, LinkedTag, MemoCreation, MemoService,
    ServiceError, ServiceResult, TagLinkFailure, TagResolution, TagService,
};
pub use session::{SessionContext, SessionError, SessionUser};
pub use store::{
    CategoryStore, MemoStore, SqliteCategoryStore, SqliteMemoStore, SqliteTagStore, StoreError,
    StoreResult, TagStore,
};
pub use view::{
    derive_memo_list, filter_by_tag, filter_categories, search_memos, sort_memos, tag_usage,
    SortDirection, SortKey,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
