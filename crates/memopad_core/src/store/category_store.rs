//! Category store contract and SQLite implementation.
//!
//! # Responsibility
//! - List a user's categories with aggregated memo counts.
//! - Persist category inserts/renames/deletes.
//!
//! # Invariants
//! - Lists are ordered newest first (`created_at DESC`), insertion order
//!   breaking same-millisecond ties.
//! - Deleting a category cascades its memos (schema-level `ON DELETE
//!   CASCADE`); the caller issues exactly one delete.

use crate::model::{CategoryId, CategorySummary, UserId};
use crate::store::{
    ensure_store_ready, now_epoch_ms, parse_uuid, StoreError, StoreResult, TableRequirement,
};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const CATEGORY_SELECT_SQL: &str = "SELECT
    c.id,
    c.user_id,
    c.name,
    c.created_at,
    (SELECT COUNT(*) FROM memos m WHERE m.category_id = c.id) AS memo_count
FROM categories c";

const REQUIREMENTS: &[TableRequirement] = &[
    TableRequirement {
        table: "categories",
        columns: &["id", "user_id", "name", "created_at"],
    },
    TableRequirement {
        table: "memos",
        columns: &["id", "category_id"],
    },
];

/// Data access contract for the category dashboard.
pub trait CategoryStore {
    /// Lists the user's categories with memo counts, newest first.
    fn list_for_user(&self, user_id: UserId) -> StoreResult<Vec<CategorySummary>>;
    /// Inserts one category and returns the persisted row.
    fn insert(&self, user_id: UserId, name: &str) -> StoreResult<CategorySummary>;
    /// Renames one category by id and returns the persisted row.
    fn update_name(&self, id: CategoryId, name: &str) -> StoreResult<CategorySummary>;
    /// Deletes one category by id; owned memos cascade remotely.
    fn delete(&self, id: CategoryId) -> StoreResult<()>;
    /// Resolves a category's display name (memo view header).
    fn find_name(&self, id: CategoryId) -> StoreResult<Option<String>>;
}

/// SQLite-backed category store.
pub struct SqliteCategoryStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryStore<'conn> {
    /// Constructs a store from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_store_ready(conn, REQUIREMENTS)?;
        Ok(Self { conn })
    }

    fn fetch_summary(&self, id: CategoryId) -> StoreResult<Option<CategorySummary>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CATEGORY_SELECT_SQL} WHERE c.id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_summary_row(row)?));
        }
        Ok(None)
    }
}

impl CategoryStore for SqliteCategoryStore<'_> {
    fn list_for_user(&self, user_id: UserId) -> StoreResult<Vec<CategorySummary>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CATEGORY_SELECT_SQL}
             WHERE c.user_id = ?1
             ORDER BY c.created_at DESC, c.rowid DESC;"
        ))?;
        let mut rows = stmt.query([user_id.to_string()])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(parse_summary_row(row)?);
        }
        Ok(categories)
    }

    fn insert(&self, user_id: UserId, name: &str) -> StoreResult<CategorySummary> {
        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO categories (id, user_id, name, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![id.to_string(), user_id.to_string(), name, now_epoch_ms()],
        )?;

        self.fetch_summary(id)?.ok_or_else(|| {
            StoreError::InvalidData("inserted category missing in read-back".to_string())
        })
    }

    fn update_name(&self, id: CategoryId, name: &str) -> StoreResult<CategorySummary> {
        let changed = self.conn.execute(
            "UPDATE categories SET name = ?2 WHERE id = ?1;",
            params![id.to_string(), name],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        self.fetch_summary(id)?.ok_or_else(|| {
            StoreError::InvalidData("updated category missing in read-back".to_string())
        })
    }

    fn delete(&self, id: CategoryId) -> StoreResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM categories WHERE id = ?1;",
            [id.to_string()],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    fn find_name(&self, id: CategoryId) -> StoreResult<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM categories WHERE id = ?1;")?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(row.get(0)?));
        }
        Ok(None)
    }
}

fn parse_summary_row(row: &Row<'_>) -> StoreResult<CategorySummary> {
    let id_text: String = row.get("id")?;
    let user_text: String = row.get("user_id")?;
    Ok(CategorySummary {
        id: parse_uuid(&id_text, "categories.id")?,
        user_id: parse_uuid(&user_text, "categories.user_id")?,
        name: row.get("name")?,
        created_at: row.get("created_at")?,
        memo_count: row.get("memo_count")?,
    })
}
