use super::*;
use tm_db::{DuckDbBackend, SqliteBackend};

const TABLE: &str = "tidemark_migration_history_lock";

fn fast_lock(db: &dyn Database, timeout_ms: u64) -> MigrationLock<'_> {
    MigrationLock::new(db, TABLE, Duration::from_millis(timeout_ms))
        .with_poll_interval(Duration::from_millis(20))
}

#[tokio::test]
async fn test_acquire_and_release() {
    let db = DuckDbBackend::in_memory().unwrap();
    let lock = fast_lock(&db, 200);

    let guard = lock.acquire().await.unwrap();
    let holder = lock.holder().await.unwrap().unwrap();
    assert_eq!(holder.owner, guard.owner());

    lock.release(guard).await.unwrap();
    assert_eq!(lock.holder().await.unwrap(), None);
}

#[tokio::test]
async fn test_second_acquire_times_out_naming_holder() {
    let db = SqliteBackend::in_memory().unwrap();
    let first = fast_lock(&db, 200);
    let guard = first.acquire().await.unwrap();

    let second = fast_lock(&db, 100);
    let err = second.acquire().await.unwrap_err();
    match &err {
        MigrationError::LockTimeout { owner, waited, .. } => {
            assert_eq!(owner, guard.owner());
            assert!(*waited >= Duration::from_millis(100));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("tidemark unlock"));

    first.release(guard).await.unwrap();
    let guard = second.acquire().await.unwrap();
    second.release(guard).await.unwrap();
}

#[tokio::test]
async fn test_release_leaves_foreign_lock_alone() {
    let db = DuckDbBackend::in_memory().unwrap();
    let lock = fast_lock(&db, 200);
    let held = lock.acquire().await.unwrap();

    let stale = LockGuard {
        owner: "someone-else".to_string(),
    };
    lock.release(stale).await.unwrap();
    assert_eq!(
        lock.holder().await.unwrap().map(|h| h.owner).as_deref(),
        Some(held.owner())
    );
    lock.release(held).await.unwrap();
}

#[tokio::test]
async fn test_force_release() {
    let db = SqliteBackend::in_memory().unwrap();
    let lock = fast_lock(&db, 200);

    assert!(!lock.force_release().await.unwrap());

    let _abandoned = lock.acquire().await.unwrap();
    assert!(lock.force_release().await.unwrap());
    assert_eq!(lock.holder().await.unwrap(), None);
}
