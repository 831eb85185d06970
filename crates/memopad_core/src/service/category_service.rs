//! Category use-case service (dashboard view-model).
//!
//! # Responsibility
//! - Fetch the user's categories with memo counts into the local replica.
//! - Apply add/rename/delete operations as single store calls followed by
//!   one replica patch.
//!
//! # Invariants
//! - Rename requires an active edit-mode selection (`begin_edit`).
//! - Deleting a category issues exactly one delete; owned memos cascade
//!   remotely.

use crate::model::{CategoryId, CategorySummary};
use crate::replica::{Change, Replica};
use crate::service::{ServiceError, ServiceResult};
use crate::session::SessionContext;
use crate::store::CategoryStore;
use log::info;

/// Dashboard view-model: category store + local replica + edit state.
pub struct CategoryService<S: CategoryStore> {
    store: S,
    replica: Replica<CategorySummary>,
    editing: Option<CategoryId>,
}

impl<S: CategoryStore> CategoryService<S> {
    /// Creates a service with an empty replica.
    pub fn new(store: S) -> Self {
        Self {
            store,
            replica: Replica::new(),
            editing: None,
        }
    }

    /// Fetches the user's categories, newest first, replacing the replica.
    ///
    /// On fetch failure the previous replica is preserved.
    pub fn refresh(&mut self, session: &SessionContext) -> ServiceResult<&[CategorySummary]> {
        let user_id = session.require_user_id()?;
        let rows = self.store.list_for_user(user_id)?;
        self.replica.replace_all(rows);
        Ok(self.replica.items())
    }

    /// Adds one category; the persisted row is prepended to the replica.
    pub fn add(&mut self, session: &SessionContext, name: &str) -> ServiceResult<CategorySummary> {
        let user_id = session.require_user_id()?;
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ServiceError::EmptyName);
        }

        let created = self.store.insert(user_id, trimmed)?;
        info!(
            "event=category_add module=service status=ok category_id={}",
            created.id
        );
        self.replica.apply(Change::Added(created.clone()));
        Ok(created)
    }

    /// Resolves one category's display name for the memo page header.
    ///
    /// Reads the store directly so direct navigation to a memo page works
    /// before any dashboard fetch has filled the replica.
    pub fn resolve_name(
        &self,
        session: &SessionContext,
        id: CategoryId,
    ) -> ServiceResult<String> {
        session.require_user_id()?;
        self.store.find_name(id)?.ok_or(ServiceError::NotFound(id))
    }

    /// Selects one replica entry for editing.
    pub fn begin_edit(&mut self, id: CategoryId) -> ServiceResult<&CategorySummary> {
        if self.replica.get(id).is_none() {
            return Err(ServiceError::NotFound(id));
        }
        self.editing = Some(id);
        self.replica.get(id).ok_or(ServiceError::NotFound(id))
    }

    /// Drops the edit-mode selection without touching any state.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Renames the entry selected by `begin_edit`; the store-returned row
    /// replaces the replica entry and edit-mode clears.
    pub fn update_name(
        &mut self,
        session: &SessionContext,
        name: &str,
    ) -> ServiceResult<CategorySummary> {
        session.require_user_id()?;
        let id = self.editing.ok_or(ServiceError::NoEditInProgress)?;
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ServiceError::EmptyName);
        }

        let updated = self.store.update_name(id, trimmed)?;
        self.replica.apply(Change::Updated(updated.clone()));
        self.editing = None;
        Ok(updated)
    }

    /// Deletes one category and removes it from the replica.
    pub fn remove(&mut self, session: &SessionContext, id: CategoryId) -> ServiceResult<()> {
        session.require_user_id()?;
        self.store.delete(id)?;
        info!("event=category_delete module=service status=ok category_id={id}");
        self.replica.apply(Change::Removed(id));
        if self.editing == Some(id) {
            self.editing = None;
        }
        Ok(())
    }

    /// Current replica entries in render order.
    pub fn categories(&self) -> &[CategorySummary] {
        self.replica.items()
    }
}
