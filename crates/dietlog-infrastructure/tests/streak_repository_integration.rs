use std::sync::Arc;

use dietlog_domain::shared::transaction::DiaryUnitOfWork;
use dietlog_domain::shared::{DomainError, UserId};
use dietlog_domain::streak::{StreakRecord, StreakRepository};
use dietlog_infrastructure::persistence::repositories::SqliteStreakRepository;

mod test_helpers;

async fn commit_record(uow: &dyn DiaryUnitOfWork, record: &StreakRecord) {
    let mut tx = uow.begin(record.user_id()).await.expect("begin");
    tx.insert_streak(record).await.expect("insert streak");
    tx.commit().await.expect("commit");
}

#[tokio::test]
async fn streak_repo_empty_user_integration() {
    let pool = test_helpers::setup_in_memory_db().await;
    let repo = SqliteStreakRepository::new(Arc::new(pool));

    let user = UserId::new();

    assert!(repo.find_active_by_user(&user).await.unwrap().is_none());
    assert_eq!(repo.max_count_by_user(&user).await.unwrap(), 0);
    assert!(repo.list_by_user(&user).await.unwrap().is_empty());
}

#[tokio::test]
async fn streak_repo_insert_update_and_max_integration() {
    let pool = test_helpers::setup_in_memory_db().await;
    let uow = test_helpers::unit_of_work(&pool);
    let repo = SqliteStreakRepository::new(Arc::new(pool.clone()));

    let user = UserId::new();

    let mut first = StreakRecord::open(user.clone());
    first.extend().unwrap();
    first.extend().unwrap();
    first.extend().unwrap();
    commit_record(&uow, &first).await;

    let mut tx = uow.begin(&user).await.expect("begin");
    let mut active = tx
        .find_active_streak()
        .await
        .expect("find active")
        .expect("active record");
    assert_eq!(active.id(), first.id());
    active.close().unwrap();
    tx.update_streak(&active).await.expect("close streak");
    tx.commit().await.expect("commit");

    let mut second = StreakRecord::open(user.clone());
    second.extend().unwrap();
    commit_record(&uow, &second).await;

    let history = repo.list_by_user(&user).await.expect("list");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id(), first.id());
    assert!(!history[0].is_active());
    assert_eq!(history[0].count(), 3);
    assert!(history[1].is_active());

    let current = repo
        .find_active_by_user(&user)
        .await
        .expect("find active")
        .expect("active record");
    assert_eq!(current.id(), second.id());
    assert_eq!(repo.max_count_by_user(&user).await.unwrap(), 3);
}

#[tokio::test]
async fn streak_repo_rejects_second_active_record_integration() {
    let pool = test_helpers::setup_in_memory_db().await;
    let uow = test_helpers::unit_of_work(&pool);

    let user = UserId::new();
    commit_record(&uow, &StreakRecord::open(user.clone())).await;

    let mut tx = uow.begin(&user).await.expect("begin");
    let result = tx.insert_streak(&StreakRecord::open(user.clone())).await;
    assert!(matches!(result, Err(DomainError::StateCorruption(_))));
    tx.rollback().await.expect("rollback");
}

#[tokio::test]
async fn streak_repo_closed_record_cannot_be_updated_integration() {
    let pool = test_helpers::setup_in_memory_db().await;
    let uow = test_helpers::unit_of_work(&pool);

    let user = UserId::new();
    let mut record = StreakRecord::open(user.clone());
    record.extend().unwrap();
    commit_record(&uow, &record).await;

    let mut tx = uow.begin(&user).await.expect("begin");
    record.close().unwrap();
    tx.update_streak(&record).await.expect("close");

    // Closed history is immutable
    let result = tx.update_streak(&record).await;
    assert!(matches!(result, Err(DomainError::StateCorruption(_))));
    tx.rollback().await.expect("rollback");
}

#[tokio::test]
async fn streak_repo_users_are_isolated_integration() {
    let pool = test_helpers::setup_in_memory_db().await;
    let uow = test_helpers::unit_of_work(&pool);
    let repo = SqliteStreakRepository::new(Arc::new(pool.clone()));

    let alice = UserId::new();
    let bob = UserId::new();

    let mut alice_streak = StreakRecord::open(alice.clone());
    alice_streak.extend().unwrap();
    alice_streak.extend().unwrap();
    commit_record(&uow, &alice_streak).await;
    commit_record(&uow, &StreakRecord::open(bob.clone())).await;

    assert_eq!(repo.max_count_by_user(&alice).await.unwrap(), 2);
    assert_eq!(repo.max_count_by_user(&bob).await.unwrap(), 0);
    assert_eq!(repo.list_by_user(&bob).await.unwrap().len(), 1);
}

#[tokio::test]
async fn streak_repo_foreign_record_is_rejected_integration() {
    let pool = test_helpers::setup_in_memory_db().await;
    let uow = test_helpers::unit_of_work(&pool);

    let alice = UserId::new();
    let bob = UserId::new();

    let mut tx = uow.begin(&alice).await.expect("begin");
    let result = tx.insert_streak(&StreakRecord::open(bob)).await;
    assert!(matches!(result, Err(DomainError::Validation(_))));
    tx.rollback().await.expect("rollback");
}

#[tokio::test]
async fn streak_rows_default_to_closed_and_empty_integration() {
    let pool = test_helpers::setup_in_memory_db().await;
    let repo = SqliteStreakRepository::new(Arc::new(pool.clone()));

    let user = UserId::new();
    let now = chrono::Utc::now();

    sqlx::query(
        "INSERT INTO diet_streaks (id, user_id, started_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind("legacy-row")
    .bind(user.as_str())
    .bind(now)
    .bind(now)
    .execute(&pool)
    .await
    .expect("insert bare row");

    assert!(repo.find_active_by_user(&user).await.unwrap().is_none());

    let records = repo.list_by_user(&user).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].count(), 0);
    assert!(!records[0].is_active());
}
