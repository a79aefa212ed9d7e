use chrono::{Duration, Utc};
use std::sync::Arc;

use dietlog_domain::meal::{MealChanges, MealRepository};
use dietlog_domain::shared::transaction::DiaryUnitOfWork;
use dietlog_domain::shared::{DomainError, MealId, PageRequest, UserId};
use dietlog_infrastructure::persistence::repositories::SqliteMealRepository;

mod test_helpers;

#[tokio::test]
async fn meal_repo_insert_and_find_integration() {
    let pool = test_helpers::setup_in_memory_db().await;
    let uow = test_helpers::unit_of_work(&pool);
    let repo = SqliteMealRepository::new(Arc::new(pool.clone()));

    let user = UserId::new();
    let lunch = test_helpers::meal_at(&user, "Lunch", true, Utc::now());

    let mut tx = uow.begin(&user).await.expect("begin");
    tx.insert_meal(&lunch).await.expect("insert meal");
    tx.commit().await.expect("commit");

    let found = repo
        .find_by_id(lunch.id(), &user)
        .await
        .expect("find meal")
        .expect("meal should exist");
    assert_eq!(found.name(), "Lunch");
    assert!(found.is_within_diet());
    assert!(found.updated_at().is_none());

    // Other users cannot see it
    let stranger = UserId::new();
    assert!(repo.find_by_id(lunch.id(), &stranger).await.unwrap().is_none());
}

#[tokio::test]
async fn meal_repo_rolled_back_meal_is_not_persisted_integration() {
    let pool = test_helpers::setup_in_memory_db().await;
    let uow = test_helpers::unit_of_work(&pool);
    let repo = SqliteMealRepository::new(Arc::new(pool.clone()));

    let user = UserId::new();
    let snack = test_helpers::meal_at(&user, "Snack", false, Utc::now());

    let mut tx = uow.begin(&user).await.expect("begin");
    tx.insert_meal(&snack).await.expect("insert meal");
    tx.rollback().await.expect("rollback");

    assert!(repo.find_by_id(snack.id(), &user).await.unwrap().is_none());
    assert_eq!(repo.count_by_user(&user).await.unwrap().total, 0);
}

#[tokio::test]
async fn meal_repo_list_is_paginated_newest_first_integration() {
    let pool = test_helpers::setup_in_memory_db().await;
    let uow = test_helpers::unit_of_work(&pool);
    let repo = SqliteMealRepository::new(Arc::new(pool.clone()));

    let user = UserId::new();
    let start = Utc::now() - Duration::days(1);

    let mut tx = uow.begin(&user).await.expect("begin");
    for i in 0..5 {
        let meal = test_helpers::meal_at(
            &user,
            &format!("Meal {}", i),
            i % 2 == 0,
            start + Duration::hours(i),
        );
        tx.insert_meal(&meal).await.expect("insert meal");
    }
    tx.commit().await.expect("commit");

    let first = repo
        .list_by_user(&user, PageRequest::new(1, 2).unwrap())
        .await
        .expect("list page 1");
    assert_eq!(first.items.len(), 2);
    assert_eq!(first.items[0].name(), "Meal 4");
    assert_eq!(first.items[1].name(), "Meal 3");
    assert_eq!(first.pagination.total, 5);
    assert_eq!(first.pagination.last_page, 3);

    let last = repo
        .list_by_user(&user, PageRequest::new(3, 2).unwrap())
        .await
        .expect("list page 3");
    assert_eq!(last.items.len(), 1);
    assert_eq!(last.items[0].name(), "Meal 0");

    let counts = repo.count_by_user(&user).await.expect("count");
    assert_eq!(counts.total, 5);
    assert_eq!(counts.within_diet, 3);
    assert_eq!(counts.outside_diet(), 2);
}

#[tokio::test]
async fn meal_repo_update_and_delete_integration() {
    let pool = test_helpers::setup_in_memory_db().await;
    let uow = test_helpers::unit_of_work(&pool);
    let repo = SqliteMealRepository::new(Arc::new(pool.clone()));

    let user = UserId::new();
    let mut dinner = test_helpers::meal_at(&user, "Dinner", true, Utc::now());

    let mut tx = uow.begin(&user).await.expect("begin");
    tx.insert_meal(&dinner).await.expect("insert meal");
    tx.commit().await.expect("commit");

    dinner
        .apply_changes(MealChanges {
            name: Some("Late dinner".to_string()),
            within_diet: Some(false),
            ..Default::default()
        })
        .unwrap();
    repo.update(&dinner).await.expect("update meal");

    let found = repo
        .find_by_id(dinner.id(), &user)
        .await
        .unwrap()
        .expect("meal should exist");
    assert_eq!(found.name(), "Late dinner");
    assert!(!found.is_within_diet());
    assert!(found.updated_at().is_some());

    assert!(repo.delete(dinner.id(), &user).await.unwrap());
    assert!(!repo.delete(dinner.id(), &user).await.unwrap());

    let result = repo.update(&dinner).await;
    assert!(matches!(result, Err(DomainError::MealNotFound(_))));
}

#[tokio::test]
async fn meal_repo_unknown_id_integration() {
    let pool = test_helpers::setup_in_memory_db().await;
    let repo = SqliteMealRepository::new(Arc::new(pool));

    let user = UserId::new();
    let missing = MealId::from_string("missing-meal");

    assert!(repo.find_by_id(&missing, &user).await.unwrap().is_none());
    assert!(!repo.delete(&missing, &user).await.unwrap());
}
