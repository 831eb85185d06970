//! Memo use-case service (per-category memo view-model).
//!
//! # Responsibility
//! - Fetch one category's memos (with tag links) into the local replica.
//! - Apply add/update/delete operations with one replica patch each.
//! - Run tag resolution after memo creation and surface its report.
//!
//! # Invariants
//! - A created memo is prepended even when tag linking partially or fully
//!   fails; the replica entry may carry fewer tags than requested until the
//!   next refresh.
//! - Update requires an active edit-mode selection (`begin_edit`).
//! - Remote search and tag-page fetches never touch this view's replica.

use crate::model::{CategoryId, Memo, MemoDraft, MemoId};
use crate::replica::{Change, Replica};
use crate::service::tag_resolution::{resolve_and_link, TagResolution};
use crate::service::{ServiceError, ServiceResult};
use crate::session::SessionContext;
use crate::store::{MemoStore, TagStore};
use log::info;

/// Outcome of one memo creation: the persisted memo plus the per-tag
/// resolution report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoCreation {
    pub memo: Memo,
    pub tags: TagResolution,
}

/// Memo view-model: memo + tag stores, local replica, edit state.
pub struct MemoService<M: MemoStore, T: TagStore> {
    memos: M,
    tags: T,
    replica: Replica<Memo>,
    editing: Option<MemoId>,
}

impl<M: MemoStore, T: TagStore> MemoService<M, T> {
    /// Creates a service with an empty replica.
    pub fn new(memos: M, tags: T) -> Self {
        Self {
            memos,
            tags,
            replica: Replica::new(),
            editing: None,
        }
    }

    /// Fetches one category's memos, newest first, replacing the replica.
    ///
    /// On fetch failure the previous replica is preserved.
    pub fn refresh(
        &mut self,
        session: &SessionContext,
        category_id: CategoryId,
    ) -> ServiceResult<&[Memo]> {
        session.require_user_id()?;
        let rows = self.memos.list_by_category(category_id)?;
        self.replica.replace_all(rows);
        Ok(self.replica.items())
    }

    /// Creates one memo, then resolves and links its tags best-effort.
    ///
    /// The memo insert is the only step that can fail this operation; tag
    /// linking failures are reported in [`MemoCreation::tags`] while the
    /// memo is prepended regardless.
    pub fn add(
        &mut self,
        session: &SessionContext,
        category_id: CategoryId,
        draft: &MemoDraft,
        raw_tags: &str,
    ) -> ServiceResult<MemoCreation> {
        let user_id = session.require_user_id()?;
        if draft.title.trim().is_empty() {
            return Err(ServiceError::EmptyTitle);
        }

        let memo = self.memos.insert(user_id, category_id, draft)?;
        let tags = resolve_and_link(&self.tags, user_id, memo.id, raw_tags);
        info!(
            "event=memo_add module=service status=ok memo_id={} tags_linked={}/{}",
            memo.id,
            tags.linked_count(),
            tags.requested_count()
        );

        self.replica.apply(Change::Added(memo.clone()));
        Ok(MemoCreation { memo, tags })
    }

    /// Selects one replica entry for editing and returns its edit buffer.
    pub fn begin_edit(&mut self, id: MemoId) -> ServiceResult<MemoDraft> {
        let memo = self.replica.get(id).ok_or(ServiceError::NotFound(id))?;
        let draft = MemoDraft::from(memo);
        self.editing = Some(id);
        Ok(draft)
    }

    /// Drops the edit-mode selection without touching any state.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Updates the entry selected by `begin_edit`; the store-returned row
    /// replaces the replica entry and edit-mode clears.
    pub fn update(&mut self, session: &SessionContext, draft: &MemoDraft) -> ServiceResult<Memo> {
        session.require_user_id()?;
        let id = self.editing.ok_or(ServiceError::NoEditInProgress)?;
        if draft.title.trim().is_empty() {
            return Err(ServiceError::EmptyTitle);
        }

        let updated = self.memos.update(id, draft)?;
        self.replica.apply(Change::Updated(updated.clone()));
        self.editing = None;
        Ok(updated)
    }

    /// Deletes one memo and removes it from the replica.
    pub fn remove(&mut self, session: &SessionContext, id: MemoId) -> ServiceResult<()> {
        session.require_user_id()?;
        self.memos.delete(id)?;
        info!("event=memo_delete module=service status=ok memo_id={id}");
        self.replica.apply(Change::Removed(id));
        if self.editing == Some(id) {
            self.editing = None;
        }
        Ok(())
    }

    /// Remote search across the user's memos (title/usage/example/
    /// application substring, case-insensitive). Renders into its own view;
    /// the category replica is untouched.
    pub fn search(&self, session: &SessionContext, query: &str) -> ServiceResult<Vec<Memo>> {
        let user_id = session.require_user_id()?;
        Ok(self.memos.search(user_id, query)?)
    }

    /// Fetches the memos linked to one tag name; an unknown name yields an
    /// empty list, not an error.
    pub fn list_by_tag(&self, session: &SessionContext, name: &str) -> ServiceResult<Vec<Memo>> {
        let user_id = session.require_user_id()?;
        match self.tags.find_by_name(user_id, name)? {
            Some(tag) => Ok(self.memos.list_by_tag(tag.id)?),
            None => Ok(Vec::new()),
        }
    }

    /// Current replica entries in render order.
    pub fn memos(&self) -> &[Memo] {
        self.replica.items()
    }
}
