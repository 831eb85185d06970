use memopad_core::db::open_db_in_memory;
use memopad_core::store::{CategoryStore, StoreError, StoreResult};
use memopad_core::{
    CategoryId, CategoryService, CategorySummary, MemoDraft, ServiceError, SessionContext,
    SessionUser, SqliteCategoryStore, SqliteMemoStore, SqliteTagStore, MemoService, UserId,
};
use std::cell::Cell;
use std::rc::Rc;
use uuid::Uuid;

fn signed_in() -> SessionContext {
    let mut session = SessionContext::new();
    session.sign_in(SessionUser {
        user_id: Uuid::new_v4(),
        email: "owner@example.com".to_string(),
    });
    session
}

/// Store wrapper counting calls and failing on demand, to assert which
/// operations reach the remote seam.
struct ProbedCategoryStore<'conn> {
    inner: SqliteCategoryStore<'conn>,
    insert_calls: Rc<Cell<u32>>,
    update_calls: Rc<Cell<u32>>,
    delete_calls: Rc<Cell<u32>>,
    fail_list: Rc<Cell<bool>>,
}

impl<'conn> ProbedCategoryStore<'conn> {
    fn new(inner: SqliteCategoryStore<'conn>) -> Self {
        Self {
            inner,
            insert_calls: Rc::new(Cell::new(0)),
            update_calls: Rc::new(Cell::new(0)),
            delete_calls: Rc::new(Cell::new(0)),
            fail_list: Rc::new(Cell::new(false)),
        }
    }
}

impl CategoryStore for ProbedCategoryStore<'_> {
    fn list_for_user(&self, user_id: UserId) -> StoreResult<Vec<CategorySummary>> {
        if self.fail_list.get() {
            return Err(StoreError::InvalidData("simulated fetch failure".into()));
        }
        self.inner.list_for_user(user_id)
    }

    fn insert(&self, user_id: UserId, name: &str) -> StoreResult<CategorySummary> {
        self.insert_calls.set(self.insert_calls.get() + 1);
        self.inner.insert(user_id, name)
    }

    fn update_name(&self, id: CategoryId, name: &str) -> StoreResult<CategorySummary> {
        self.update_calls.set(self.update_calls.get() + 1);
        self.inner.update_name(id, name)
    }

    fn delete(&self, id: CategoryId) -> StoreResult<()> {
        self.delete_calls.set(self.delete_calls.get() + 1);
        self.inner.delete(id)
    }

    fn find_name(&self, id: CategoryId) -> StoreResult<Option<String>> {
        self.inner.find_name(id)
    }
}

#[test]
fn add_prepends_and_read_back_is_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let mut service = CategoryService::new(SqliteCategoryStore::try_new(&conn).unwrap());
    let session = signed_in();

    let first = service.add(&session, "Networking").unwrap();
    let second = service.add(&session, "  Rust  ").unwrap();
    assert_eq!(second.name, "Rust");
    assert_eq!(second.memo_count, 0);

    // Local replica: prepend order.
    let names: Vec<_> = service.categories().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Rust", "Networking"]);

    // Remote read-back agrees, exactly one entry per add.
    let listed = service.refresh(&session).unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[1].id, first.id);
}

#[test]
fn blank_name_is_rejected_before_any_store_call() {
    let conn = open_db_in_memory().unwrap();
    let store = ProbedCategoryStore::new(SqliteCategoryStore::try_new(&conn).unwrap());
    let insert_calls = Rc::clone(&store.insert_calls);
    let mut service = CategoryService::new(store);
    let session = signed_in();

    let err = service.add(&session, "   ").unwrap_err();
    assert!(matches!(err, ServiceError::EmptyName));
    assert!(service.categories().is_empty());
    assert_eq!(insert_calls.get(), 0);
}

#[test]
fn add_requires_session() {
    let conn = open_db_in_memory().unwrap();
    let mut service = CategoryService::new(SqliteCategoryStore::try_new(&conn).unwrap());

    let err = service.add(&SessionContext::new(), "Networking").unwrap_err();
    assert!(matches!(err, ServiceError::NotAuthenticated));
}

#[test]
fn update_requires_edit_mode_and_clears_it_after_success() {
    let conn = open_db_in_memory().unwrap();
    let store = ProbedCategoryStore::new(SqliteCategoryStore::try_new(&conn).unwrap());
    let mut service = CategoryService::new(store);
    let session = signed_in();

    let created = service.add(&session, "Draft").unwrap();

    let err = service.update_name(&session, "Renamed").unwrap_err();
    assert!(matches!(err, ServiceError::NoEditInProgress));

    service.begin_edit(created.id).unwrap();
    let renamed = service.update_name(&session, "Renamed").unwrap();
    assert_eq!(renamed.name, "Renamed");
    assert_eq!(service.categories()[0].name, "Renamed");

    // Edit-mode cleared: a second update must re-select first.
    let err = service.update_name(&session, "Again").unwrap_err();
    assert!(matches!(err, ServiceError::NoEditInProgress));
}

#[test]
fn two_updates_leave_the_second_value_in_the_replica() {
    let conn = open_db_in_memory().unwrap();
    let mut service = CategoryService::new(SqliteCategoryStore::try_new(&conn).unwrap());
    let session = signed_in();

    let created = service.add(&session, "Original").unwrap();

    service.begin_edit(created.id).unwrap();
    service.update_name(&session, "First pass").unwrap();
    service.begin_edit(created.id).unwrap();
    let last = service.update_name(&session, "Second pass").unwrap();

    assert_eq!(service.categories().len(), 1);
    assert_eq!(service.categories()[0], last);
    assert_eq!(service.categories()[0].name, "Second pass");
}

#[test]
fn blank_rename_is_rejected_without_a_store_call() {
    let conn = open_db_in_memory().unwrap();
    let store = ProbedCategoryStore::new(SqliteCategoryStore::try_new(&conn).unwrap());
    let mut service = CategoryService::new(store);
    let session = signed_in();

    let created = service.add(&session, "Keep me").unwrap();
    service.begin_edit(created.id).unwrap();
    let err = service.update_name(&session, "  ").unwrap_err();
    assert!(matches!(err, ServiceError::EmptyName));
    assert_eq!(service.categories()[0].name, "Keep me");
}

#[test]
fn blank_rename_issues_no_update_call() {
    let conn = open_db_in_memory().unwrap();
    let store = ProbedCategoryStore::new(SqliteCategoryStore::try_new(&conn).unwrap());
    let update_calls = Rc::clone(&store.update_calls);
    let mut service = CategoryService::new(store);
    let session = signed_in();

    let created = service.add(&session, "Keep me").unwrap();
    service.begin_edit(created.id).unwrap();
    assert!(service.update_name(&session, "  ").is_err());
    assert_eq!(update_calls.get(), 0);
}

#[test]
fn begin_edit_rejects_unknown_ids() {
    let conn = open_db_in_memory().unwrap();
    let mut service = CategoryService::new(SqliteCategoryStore::try_new(&conn).unwrap());

    let err = service.begin_edit(Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[test]
fn delete_cascades_memos_remotely_and_removes_the_entry() {
    let conn = open_db_in_memory().unwrap();
    let mut categories = CategoryService::new(SqliteCategoryStore::try_new(&conn).unwrap());
    let mut memos = MemoService::new(
        SqliteMemoStore::try_new(&conn).unwrap(),
        SqliteTagStore::try_new(&conn).unwrap(),
    );
    let session = signed_in();

    let category = categories.add(&session, "Doomed").unwrap();
    memos
        .add(
            &session,
            category.id,
            &MemoDraft {
                title: "Orphan-to-be".to_string(),
                ..MemoDraft::default()
            },
            "",
        )
        .unwrap();

    // Memo count visible after a fresh fetch.
    let listed = categories.refresh(&session).unwrap();
    assert_eq!(listed[0].memo_count, 1);

    categories.remove(&session, category.id).unwrap();
    assert!(categories.categories().is_empty());

    // One delete call; the memos went with the category.
    let remaining = memos.refresh(&session, category.id).unwrap();
    assert!(remaining.is_empty());
}

#[test]
fn fetch_failure_preserves_previous_replica() {
    let conn = open_db_in_memory().unwrap();
    let store = ProbedCategoryStore::new(SqliteCategoryStore::try_new(&conn).unwrap());
    let mut service = CategoryService::new(store);
    let session = signed_in();

    service.add(&session, "Survivor").unwrap();
    service.refresh(&session).unwrap();
    assert_eq!(service.categories().len(), 1);

    // Flip the store into failure mode; the replica must stay intact.
    let failing = ProbedCategoryStore::new(SqliteCategoryStore::try_new(&conn).unwrap());
    failing.fail_list.set(true);
    let mut flaky = CategoryService::new(failing);
    flaky.add(&session, "Held").unwrap();
    let err = flaky.refresh(&session).unwrap_err();
    assert!(matches!(err, ServiceError::Store(_)));
    assert_eq!(flaky.categories().len(), 1);
    assert_eq!(flaky.categories()[0].name, "Held");
}

#[test]
fn refresh_requires_session_and_leaves_replica_empty() {
    let conn = open_db_in_memory().unwrap();
    let mut service = CategoryService::new(SqliteCategoryStore::try_new(&conn).unwrap());

    let err = service.refresh(&SessionContext::new()).unwrap_err();
    assert!(matches!(err, ServiceError::NotAuthenticated));
    assert!(service.categories().is_empty());
}

#[test]
fn resolve_name_serves_the_memo_page_header() {
    let conn = open_db_in_memory().unwrap();
    let mut service = CategoryService::new(SqliteCategoryStore::try_new(&conn).unwrap());
    let session = signed_in();

    let created = service.add(&session, "Networking").unwrap();

    // A fresh service with an empty replica still resolves the header,
    // as after direct navigation to a memo page.
    let fresh = CategoryService::new(SqliteCategoryStore::try_new(&conn).unwrap());
    assert_eq!(
        fresh.resolve_name(&session, created.id).unwrap(),
        "Networking"
    );

    let err = fresh.resolve_name(&session, Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let err = fresh
        .resolve_name(&SessionContext::new(), created.id)
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotAuthenticated));
}

#[test]
fn mutations_after_sign_out_are_refused_before_any_store_call() {
    let conn = open_db_in_memory().unwrap();
    let store = ProbedCategoryStore::new(SqliteCategoryStore::try_new(&conn).unwrap());
    let update_calls = Rc::clone(&store.update_calls);
    let delete_calls = Rc::clone(&store.delete_calls);
    let mut service = CategoryService::new(store);

    let mut session = signed_in();
    let created = service.add(&session, "Held").unwrap();
    service.begin_edit(created.id).unwrap();
    session.sign_out();

    let err = service.update_name(&session, "Renamed").unwrap_err();
    assert!(matches!(err, ServiceError::NotAuthenticated));
    let err = service.remove(&session, created.id).unwrap_err();
    assert!(matches!(err, ServiceError::NotAuthenticated));

    assert_eq!(update_calls.get(), 0);
    assert_eq!(delete_calls.get(), 0);
    assert_eq!(service.categories()[0].name, "Held");
}

#[test]
fn listing_is_scoped_to_the_owning_user() {
    let conn = open_db_in_memory().unwrap();
    let mut mine = CategoryService::new(SqliteCategoryStore::try_new(&conn).unwrap());
    let mut theirs = CategoryService::new(SqliteCategoryStore::try_new(&conn).unwrap());
    let my_session = signed_in();
    let their_session = signed_in();

    mine.add(&my_session, "Visible to me").unwrap();
    theirs.add(&their_session, "Visible to them").unwrap();

    let listed = mine.refresh(&my_session).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Visible to me");
}
