//! Tag store contract and SQLite implementation.
//!
//! # Responsibility
//! - List a user's tags with aggregated link counts.
//! - Resolve tag names to rows, create missing tags, link memo↔tag.
//!
//! # Invariants
//! - `(user_id, name)` is unique; name matching is case-sensitive exact.
//! - Deleting a tag is NOT guarded here; the usage gate lives in
//!   `TagService` against the in-memory count.

use crate::model::{MemoId, Tag, TagId, TagUsage, UserId};
use crate::store::{
    ensure_store_ready, now_epoch_ms, parse_uuid, StoreError, StoreResult, TableRequirement,
};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const TAG_SELECT_SQL: &str = "SELECT id, user_id, name, created_at FROM tags";

const REQUIREMENTS: &[TableRequirement] = &[
    TableRequirement {
        table: "tags",
        columns: &["id", "user_id", "name", "created_at"],
    },
    TableRequirement {
        table: "memo_tags",
        columns: &["memo_id", "tag_id"],
    },
];

/// Data access contract for tag resolution and the tag index view.
pub trait TagStore {
    /// Lists the user's tags with link counts, newest first.
    fn list_with_usage(&self, user_id: UserId) -> StoreResult<Vec<TagUsage>>;
    /// Finds one tag by exact `(user_id, name)` match.
    fn find_by_name(&self, user_id: UserId, name: &str) -> StoreResult<Option<Tag>>;
    /// Inserts one tag and returns the persisted row.
    fn insert(&self, user_id: UserId, name: &str) -> StoreResult<Tag>;
    /// Links one memo to one tag.
    fn link_memo(&self, memo_id: MemoId, tag_id: TagId) -> StoreResult<()>;
    /// Deletes one tag by id.
    fn delete(&self, id: TagId) -> StoreResult<()>;
}

/// SQLite-backed tag store.
pub struct SqliteTagStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTagStore<'conn> {
    /// Constructs a store from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_store_ready(conn, REQUIREMENTS)?;
        Ok(Self { conn })
    }
}

impl TagStore for SqliteTagStore<'_> {
    fn list_with_usage(&self, user_id: UserId) -> StoreResult<Vec<TagUsage>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                t.id,
                t.user_id,
                t.name,
                t.created_at,
                (SELECT COUNT(*) FROM memo_tags mt WHERE mt.tag_id = t.id) AS memo_count
             FROM tags t
             WHERE t.user_id = ?1
             ORDER BY t.created_at DESC, t.rowid DESC;",
        )?;
        let mut rows = stmt.query([user_id.to_string()])?;
        let mut tags = Vec::new();
        while let Some(row) = rows.next()? {
            let id_text: String = row.get("id")?;
            let user_text: String = row.get("user_id")?;
            tags.push(TagUsage {
                id: parse_uuid(&id_text, "tags.id")?,
                user_id: parse_uuid(&user_text, "tags.user_id")?,
                name: row.get("name")?,
                created_at: row.get("created_at")?,
                memo_count: row.get("memo_count")?,
            });
        }
        Ok(tags)
    }

    fn find_by_name(&self, user_id: UserId, name: &str) -> StoreResult<Option<Tag>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TAG_SELECT_SQL} WHERE user_id = ?1 AND name = ?2;"
        ))?;
        let mut rows = stmt.query(params![user_id.to_string(), name])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_tag_row(row)?));
        }
        Ok(None)
    }

    fn insert(&self, user_id: UserId, name: &str) -> StoreResult<Tag> {
        let id = Uuid::new_v4();
        let created_at = now_epoch_ms();
        self.conn.execute(
            "INSERT INTO tags (id, user_id, name, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![id.to_string(), user_id.to_string(), name, created_at],
        )?;

        let mut stmt = self
            .conn
            .prepare(&format!("{TAG_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return parse_tag_row(row);
        }
        Err(StoreError::InvalidData(
            "inserted tag missing in read-back".to_string(),
        ))
    }

    fn link_memo(&self, memo_id: MemoId, tag_id: TagId) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO memo_tags (memo_id, tag_id) VALUES (?1, ?2);",
            params![memo_id.to_string(), tag_id.to_string()],
        )?;
        Ok(())
    }

    fn delete(&self, id: TagId) -> StoreResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tags WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

fn parse_tag_row(row: &Row<'_>) -> StoreResult<Tag> {
    let id_text: String = row.get("id")?;
    let user_text: String = row.get("user_id")?;
    Ok(Tag {
        id: parse_uuid(&id_text, "tags.id")?,
        user_id: parse_uuid(&user_text, "tags.user_id")?,
        name: row.get("name")?,
        created_at: row.get("created_at")?,
    })
}
