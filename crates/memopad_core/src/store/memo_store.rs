//! Memo store contract and SQLite implementation.
//!
//! # Responsibility
//! - Fetch memo slices (by category, by tag, by search pattern) with tag
//!   links pre-joined.
//! - Persist memo inserts/updates/deletes.
//!
//! # Invariants
//! - Lists are ordered newest first (`created_at DESC`), insertion order
//!   breaking same-millisecond ties.
//! - Search matches title/usage/example/application only; linked tag names
//!   are searched client-side over the replica, not here.
//! - Blank `reference_url` input is normalized to SQL NULL.

use crate::model::{CategoryId, Memo, MemoDraft, MemoId, TagRef, UserId};
use crate::store::{
    ensure_store_ready, now_epoch_ms, parse_uuid, StoreError, StoreResult, TableRequirement,
};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const MEMO_SELECT_SQL: &str = "SELECT
    id,
    category_id,
    user_id,
    title,
    usage,
    example,
    application,
    reference_url,
    created_at
FROM memos";

const REQUIREMENTS: &[TableRequirement] = &[
    TableRequirement {
        table: "memos",
        columns: &[
            "id",
            "category_id",
            "user_id",
            "title",
            "usage",
            "example",
            "application",
            "reference_url",
            "created_at",
        ],
    },
    TableRequirement {
        table: "memo_tags",
        columns: &["memo_id", "tag_id"],
    },
    TableRequirement {
        table: "tags",
        columns: &["id", "name"],
    },
];

/// Data access contract for memo views.
pub trait MemoStore {
    /// Lists one category's memos with tag links, newest first.
    fn list_by_category(&self, category_id: CategoryId) -> StoreResult<Vec<Memo>>;
    /// Lists memos linked to one tag id, newest first.
    fn list_by_tag(&self, tag_id: Uuid) -> StoreResult<Vec<Memo>>;
    /// Lists the user's memos where any text section contains `query`
    /// case-insensitively (OR pattern filter).
    fn search(&self, user_id: UserId, query: &str) -> StoreResult<Vec<Memo>>;
    /// Inserts one memo and returns the persisted row.
    fn insert(
        &self,
        user_id: UserId,
        category_id: CategoryId,
        draft: &MemoDraft,
    ) -> StoreResult<Memo>;
    /// Replaces one memo's editable fields and returns the persisted row.
    fn update(&self, id: MemoId, draft: &MemoDraft) -> StoreResult<Memo>;
    /// Deletes one memo by id; its tag links cascade remotely.
    fn delete(&self, id: MemoId) -> StoreResult<()>;
}

/// SQLite-backed memo store.
pub struct SqliteMemoStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMemoStore<'conn> {
    /// Constructs a store from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_store_ready(conn, REQUIREMENTS)?;
        Ok(Self { conn })
    }

    fn fetch(&self, id: MemoId) -> StoreResult<Option<Memo>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MEMO_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(self.memo_from_row(row)?));
        }
        Ok(None)
    }

    fn memo_from_row(&self, row: &Row<'_>) -> StoreResult<Memo> {
        let id_text: String = row.get("id")?;
        let category_text: String = row.get("category_id")?;
        let user_text: String = row.get("user_id")?;
        let tags = load_tag_refs(self.conn, &id_text)?;
        Ok(Memo {
            id: parse_uuid(&id_text, "memos.id")?,
            category_id: parse_uuid(&category_text, "memos.category_id")?,
            user_id: parse_uuid(&user_text, "memos.user_id")?,
            title: row.get("title")?,
            usage: row.get("usage")?,
            example: row.get("example")?,
            application: row.get("application")?,
            reference_url: row.get("reference_url")?,
            created_at: row.get("created_at")?,
            tags,
        })
    }

    fn collect_memos(&self, sql: &str, bind: &[&dyn rusqlite::ToSql]) -> StoreResult<Vec<Memo>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(bind)?;
        let mut memos = Vec::new();
        while let Some(row) = rows.next()? {
            memos.push(self.memo_from_row(row)?);
        }
        Ok(memos)
    }
}

impl MemoStore for SqliteMemoStore<'_> {
    fn list_by_category(&self, category_id: CategoryId) -> StoreResult<Vec<Memo>> {
        self.collect_memos(
            &format!(
                "{MEMO_SELECT_SQL}
                 WHERE category_id = ?1
                 ORDER BY created_at DESC, rowid DESC;"
            ),
            &[&category_id.to_string()],
        )
    }

    fn list_by_tag(&self, tag_id: Uuid) -> StoreResult<Vec<Memo>> {
        self.collect_memos(
            "SELECT
                m.id,
                m.category_id,
                m.user_id,
                m.title,
                m.usage,
                m.example,
                m.application,
                m.reference_url,
                m.created_at
             FROM memos m
             INNER JOIN memo_tags mt ON mt.memo_id = m.id
             WHERE mt.tag_id = ?1
             ORDER BY m.created_at DESC, m.rowid DESC;",
            &[&tag_id.to_string()],
        )
    }

    fn search(&self, user_id: UserId, query: &str) -> StoreResult<Vec<Memo>> {
        let pattern = like_pattern(query);
        self.collect_memos(
            &format!(
                "{MEMO_SELECT_SQL}
                 WHERE user_id = ?1
                   AND (title LIKE ?2 ESCAPE '\\'
                     OR usage LIKE ?2 ESCAPE '\\'
                     OR example LIKE ?2 ESCAPE '\\'
                     OR application LIKE ?2 ESCAPE '\\')
                 ORDER BY created_at DESC, rowid DESC;"
            ),
            &[&user_id.to_string(), &pattern],
        )
    }

    fn insert(
        &self,
        user_id: UserId,
        category_id: CategoryId,
        draft: &MemoDraft,
    ) -> StoreResult<Memo> {
        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO memos (
                id,
                category_id,
                user_id,
                title,
                usage,
                example,
                application,
                reference_url,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                id.to_string(),
                category_id.to_string(),
                user_id.to_string(),
                draft.title,
                draft.usage,
                draft.example,
                draft.application,
                none_if_blank(&draft.reference_url),
                now_epoch_ms(),
            ],
        )?;

        self.fetch(id)?
            .ok_or_else(|| StoreError::InvalidData("inserted memo missing in read-back".to_string()))
    }

    fn update(&self, id: MemoId, draft: &MemoDraft) -> StoreResult<Memo> {
        let changed = self.conn.execute(
            "UPDATE memos
             SET
                title = ?2,
                usage = ?3,
                example = ?4,
                application = ?5,
                reference_url = ?6
             WHERE id = ?1;",
            params![
                id.to_string(),
                draft.title,
                draft.usage,
                draft.example,
                draft.application,
                none_if_blank(&draft.reference_url),
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        self.fetch(id)?
            .ok_or_else(|| StoreError::InvalidData("updated memo missing in read-back".to_string()))
    }

    fn delete(&self, id: MemoId) -> StoreResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM memos WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

fn load_tag_refs(conn: &Connection, memo_id: &str) -> StoreResult<Vec<TagRef>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.name
         FROM memo_tags mt
         INNER JOIN tags t ON t.id = mt.tag_id
         WHERE mt.memo_id = ?1
         ORDER BY t.name ASC;",
    )?;
    let mut rows = stmt.query([memo_id])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        let tag_text: String = row.get(0)?;
        tags.push(TagRef {
            tag_id: parse_uuid(&tag_text, "memo_tags.tag_id")?,
            name: row.get(1)?,
        });
    }
    Ok(tags)
}

fn none_if_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Builds a `%...%` pattern with LIKE wildcards in the input escaped.
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::{like_pattern, none_if_blank};

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("tcp"), "%tcp%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
    }

    #[test]
    fn blank_reference_url_becomes_null() {
        assert_eq!(none_if_blank("   "), None);
        assert_eq!(none_if_blank(""), None);
        assert_eq!(none_if_blank(" https://example.com "), Some("https://example.com"));
    }
}
