//! Tag use-case service (tag index view-model).
//!
//! # Responsibility
//! - Fetch the user's tags with link counts into the local replica.
//! - Delete tags, gated client-side on the in-memory usage count.
//!
//! # Invariants
//! - Deletion of a tag with `memo_count > 0` is refused before any store
//!   call; the store itself does not enforce this.

use crate::model::{TagId, TagUsage};
use crate::replica::{Change, Replica};
use crate::service::{ServiceError, ServiceResult};
use crate::session::SessionContext;
use crate::store::TagStore;
use log::info;

/// Tag index view-model: tag store + local replica.
pub struct TagService<S: TagStore> {
    store: S,
    replica: Replica<TagUsage>,
}

impl<S: TagStore> TagService<S> {
    /// Creates a service with an empty replica.
    pub fn new(store: S) -> Self {
        Self {
            store,
            replica: Replica::new(),
        }
    }

    /// Fetches the user's tags with usage counts, newest first.
    ///
    /// On fetch failure the previous replica is preserved.
    pub fn refresh(&mut self, session: &SessionContext) -> ServiceResult<&[TagUsage]> {
        let user_id = session.require_user_id()?;
        let rows = self.store.list_with_usage(user_id)?;
        self.replica.replace_all(rows);
        Ok(self.replica.items())
    }

    /// Deletes one tag, refusing locally while it is still in use.
    pub fn remove(&mut self, session: &SessionContext, id: TagId) -> ServiceResult<()> {
        session.require_user_id()?;
        let held = self.replica.get(id).ok_or(ServiceError::NotFound(id))?;
        if held.memo_count > 0 {
            return Err(ServiceError::TagInUse {
                name: held.name.clone(),
                memo_count: held.memo_count,
            });
        }

        self.store.delete(id)?;
        info!("event=tag_delete module=service status=ok tag_id={id}");
        self.replica.apply(Change::Removed(id));
        Ok(())
    }

    /// Current replica entries in render order.
    pub fn tags(&self) -> &[TagUsage] {
        self.replica.items()
    }
}
