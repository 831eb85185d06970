//! Use-case services: entity fetchers and mutation operations.
//!
//! # Responsibility
//! - Guard every operation behind the session context.
//! - Issue one store call per mutation and patch the local replica only
//!   after the store confirms.
//!
//! # Invariants
//! - Precondition failures (blank name/title, missing edit-mode, tag in
//!   use) are reported before any store call and change no state.
//! - A failed store call leaves the replica exactly as it was.

use crate::session::SessionError;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod category_service;
pub mod memo_service;
pub mod tag_resolution;
pub mod tag_service;

pub use category_service::CategoryService;
pub use memo_service::{MemoCreation, MemoService};
pub use tag_resolution::{
    parse_tag_names, resolve_and_link, LinkedTag, TagLinkFailure, TagResolution,
};
pub use tag_service::TagService;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service-layer error; `Display` output is the user-facing notification.
#[derive(Debug)]
pub enum ServiceError {
    /// No live session; the view must not query or mutate.
    NotAuthenticated,
    /// Category name is blank after trimming.
    EmptyName,
    /// Memo title is blank after trimming.
    EmptyTitle,
    /// Update was issued with no entry selected for editing.
    NoEditInProgress,
    /// Tag deletion refused: the tag is still linked by memos.
    TagInUse { name: String, memo_count: u32 },
    /// Target entry is not present (locally or remotely).
    NotFound(Uuid),
    /// Remote call failure.
    Store(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAuthenticated => write!(f, "no active session; sign in first"),
            Self::EmptyName => write!(f, "category name must not be empty"),
            Self::EmptyTitle => write!(f, "memo title must not be empty"),
            Self::NoEditInProgress => write!(f, "no entry is selected for editing"),
            Self::TagInUse { name, memo_count } => write!(
                f,
                "tag `{name}` is still linked by {memo_count} memo(s) and cannot be deleted"
            ),
            Self::NotFound(id) => write!(f, "entry not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(id) => Self::NotFound(id),
            other => Self::Store(other),
        }
    }
}

impl From<SessionError> for ServiceError {
    fn from(value: SessionError) -> Self {
        match value {
            SessionError::NotAuthenticated => Self::NotAuthenticated,
        }
    }
}
