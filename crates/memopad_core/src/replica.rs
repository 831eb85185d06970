//! In-memory replica of fetched rows with reducer-style patching.
//!
//! # Responsibility
//! - Hold the last fetched row set a view renders from.
//! - Apply confirmed mutations as typed changes, uniformly per entity type.
//!
//! # Invariants
//! - Changes are applied only after the store confirms the mutation; a
//!   failed mutation leaves the replica untouched.
//! - `Added` prepends, preserving newest-first ordering.
//! - `Updated`/`Removed` for an id the replica does not hold are no-ops,
//!   which tolerates patches arriving in completion order.

use uuid::Uuid;

/// Accessor for the stable id a replica keys its entries by.
pub trait Keyed {
    fn key(&self) -> Uuid;
}

/// Confirmed mutation to fold into a replica.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change<T> {
    /// Store-returned row for a successful insert.
    Added(T),
    /// Store-returned row for a successful update. Replaces the held entry
    /// wholesale so server-side normalization is reflected locally.
    Updated(T),
    /// Id of a successfully deleted row.
    Removed(Uuid),
}

/// Ordered in-memory copy of one entity type's fetched rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Replica<T: Keyed> {
    items: Vec<T>,
}

impl<T: Keyed> Replica<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Swaps in a fresh fetch result, discarding all local entries.
    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
    }

    /// Folds one confirmed change into the replica.
    pub fn apply(&mut self, change: Change<T>) {
        match change {
            Change::Added(item) => self.items.insert(0, item),
            Change::Updated(item) => {
                let key = item.key();
                if let Some(slot) = self.items.iter_mut().find(|held| held.key() == key) {
                    *slot = item;
                }
            }
            Change::Removed(id) => self.items.retain(|held| held.key() != id),
        }
    }

    /// Current entries in render order (newest first after a fetch).
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Looks up one entry by stable id.
    pub fn get(&self, id: Uuid) -> Option<&T> {
        self.items.iter().find(|held| held.key() == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
