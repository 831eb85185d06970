//! Full workflow: sign in, create a category, author a tagged memo, then
//! render the derived views a UI host would show.

use memopad_core::db::open_db_in_memory;
use memopad_core::view::{derive_memo_list, tag_usage, SortDirection, SortKey};
use memopad_core::{
    CategoryService, MemoDraft, MemoService, SessionContext, SessionUser, SqliteCategoryStore,
    SqliteMemoStore, SqliteTagStore, TagService,
};
use uuid::Uuid;

#[test]
fn authoring_round_trip_through_every_view() {
    let conn = open_db_in_memory().unwrap();

    let mut session = SessionContext::new();
    session.sign_in(SessionUser {
        user_id: Uuid::new_v4(),
        email: "owner@example.com".to_string(),
    });

    // Dashboard: one new category.
    let mut categories = CategoryService::new(SqliteCategoryStore::try_new(&conn).unwrap());
    let networking = categories.add(&session, "Networking").unwrap();
    assert_eq!(networking.memo_count, 0);

    // Category page: one memo with two tags.
    let mut memos = MemoService::new(
        SqliteMemoStore::try_new(&conn).unwrap(),
        SqliteTagStore::try_new(&conn).unwrap(),
    );
    let creation = memos
        .add(
            &session,
            networking.id,
            &MemoDraft {
                title: "TCP".to_string(),
                usage: "connection-oriented transport".to_string(),
                example: "three-way handshake".to_string(),
                application: "reliable byte streams".to_string(),
                reference_url: "https://example.com/tcp".to_string(),
            },
            "protocols, tcp",
        )
        .unwrap();
    assert!(creation.tags.is_complete());
    assert_eq!(creation.tags.linked_count(), 2);

    // Dashboard reflects the memo count after a fresh fetch.
    let listed = categories.refresh(&session).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].memo_count, 1);

    // Memo page header: the owning category's name, resolved by id.
    assert_eq!(
        categories.resolve_name(&session, networking.id).unwrap(),
        "Networking"
    );

    // Category page fetch carries the nested tag links.
    let fetched = memos.refresh(&session, networking.id).unwrap();
    assert_eq!(fetched.len(), 1);
    let names: Vec<_> = fetched[0].tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["protocols", "tcp"]);

    // Derived views over the replica.
    let usage = tag_usage(memos.memos());
    assert_eq!(usage.get("protocols"), Some(&1));
    assert_eq!(usage.get("tcp"), Some(&1));

    let view = derive_memo_list(
        memos.memos(),
        Some("tcp"),
        SortKey::Title,
        SortDirection::Ascending,
        "handshake",
    );
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].title, "TCP");

    // Tag index agrees with the aggregation.
    let mut tags = TagService::new(SqliteTagStore::try_new(&conn).unwrap());
    let indexed = tags.refresh(&session).unwrap();
    assert_eq!(indexed.len(), 2);
    assert!(indexed.iter().all(|t| t.memo_count == 1));

    // Tag page: memos reachable by tag name.
    let by_tag = memos.list_by_tag(&session, "protocols").unwrap();
    assert_eq!(by_tag.len(), 1);
    assert_eq!(by_tag[0].id, creation.memo.id);

    // Deleting the memo frees both tags for deletion.
    memos.remove(&session, creation.memo.id).unwrap();
    tags.refresh(&session).unwrap();
    let freed: Vec<_> = tags.tags().iter().map(|t| t.id).collect();
    for id in freed {
        tags.remove(&session, id).unwrap();
    }
    assert!(tags.tags().is_empty());

    // Sign out: fetches and mutations stop working, the last replica stays
    // renderable.
    session.sign_out();
    let snapshot = memos.memos().to_vec();
    assert!(memos.refresh(&session, networking.id).is_err());
    assert!(categories.remove(&session, networking.id).is_err());
    assert_eq!(memos.memos(), snapshot.as_slice());
    assert_eq!(categories.categories().len(), 1);
}
