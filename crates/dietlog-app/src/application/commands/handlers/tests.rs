use async_trait::async_trait;
use chrono::{Duration, Utc};
use mockall::mock;
use std::sync::Arc;

use crate::application::commands::command_handler::CommandHandler;
use crate::application::commands::handlers::*;
use crate::application::commands::meal_commands::*;
use crate::application::services::StreakTracker;
use dietlog_domain::meal::{Meal, MealCounts, MealRepository};
use dietlog_domain::shared::{DomainError, MealId, Page, PageRequest, UserId};
use dietlog_domain::streak::{StreakRecord, StreakRepository};
use dietlog_infrastructure::memory::InMemoryDiaryStore;

mock! {
    pub MealRepo {}

    #[async_trait]
    impl MealRepository for MealRepo {
        async fn find_by_id(&self, id: &MealId, user_id: &UserId) -> Result<Option<Meal>, DomainError>;
        async fn list_by_user(&self, user_id: &UserId, page: PageRequest) -> Result<Page<Meal>, DomainError>;
        async fn update(&self, meal: &Meal) -> Result<(), DomainError>;
        async fn delete(&self, id: &MealId, user_id: &UserId) -> Result<bool, DomainError>;
        async fn count_by_user(&self, user_id: &UserId) -> Result<MealCounts, DomainError>;
    }
}

fn record_handler(store: &Arc<InMemoryDiaryStore>) -> RecordMealCommandHandler {
    let tracker = Arc::new(StreakTracker::new(store.clone(), store.clone()));
    RecordMealCommandHandler::new(store.clone(), tracker)
}

fn record_cmd(user_id: &UserId, name: &str, within_diet: bool) -> RecordMealCommand {
    RecordMealCommand {
        user_id: user_id.to_string(),
        name: name.to_string(),
        description: None,
        eaten_at: None,
        within_diet,
    }
}

fn stored_meal(user_id: &UserId, within_diet: bool) -> Meal {
    Meal::new(
        user_id.clone(),
        "Breakfast".to_string(),
        "Oats".to_string(),
        Utc::now() - Duration::hours(2),
        within_diet,
    )
    .unwrap()
}

#[tokio::test]
async fn test_record_meal_opens_then_extends_streak() {
    let store = Arc::new(InMemoryDiaryStore::default());
    let handler = record_handler(&store);
    let user = UserId::new();

    let first = handler
        .handle(record_cmd(&user, "Breakfast", true))
        .await
        .unwrap();
    assert_eq!(first.streak_change, "opened");
    assert_eq!(first.streak.count, 1);
    assert!(first.streak.active);

    let second = handler
        .handle(record_cmd(&user, "Lunch", true))
        .await
        .unwrap();
    assert_eq!(second.streak_change, "extended");
    assert_eq!(second.streak.count, 2);
    assert_eq!(second.streak.id, first.streak.id);

    let counts = store.count_by_user(&user).await.unwrap();
    assert_eq!(counts.total, 2);
    assert_eq!(counts.within_diet, 2);
}

#[tokio::test]
async fn test_record_off_diet_meal_closes_streak() {
    let store = Arc::new(InMemoryDiaryStore::default());
    let handler = record_handler(&store);
    let user = UserId::new();

    handler
        .handle(record_cmd(&user, "Salad", true))
        .await
        .unwrap();
    let result = handler
        .handle(record_cmd(&user, "Cake", false))
        .await
        .unwrap();

    assert_eq!(result.streak_change, "closed");
    assert_eq!(result.streak.count, 1);
    assert!(!result.streak.active);
    assert!(!result.meal.within_diet);
    assert!(store.find_active_by_user(&user).await.unwrap().is_none());
}

#[tokio::test]
async fn test_record_meal_rejects_empty_name() {
    let store = Arc::new(InMemoryDiaryStore::default());
    let handler = record_handler(&store);
    let user = UserId::new();

    let result = handler.handle(record_cmd(&user, "   ", true)).await;

    assert!(matches!(result, Err(DomainError::Validation(_))));
    assert_eq!(store.count_by_user(&user).await.unwrap().total, 0);
    assert!(StreakRepository::list_by_user(store.as_ref(), &user)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_record_meal_rejects_empty_user() {
    let store = Arc::new(InMemoryDiaryStore::default());
    let handler = record_handler(&store);

    let result = handler
        .handle(RecordMealCommand {
            user_id: " ".to_string(),
            name: "Soup".to_string(),
            description: None,
            eaten_at: None,
            within_diet: true,
        })
        .await;

    assert!(matches!(result, Err(DomainError::InvalidInput(_))));
}

#[tokio::test]
async fn test_streak_corruption_discards_the_meal() {
    let store = Arc::new(InMemoryDiaryStore::default());
    let handler = record_handler(&store);
    let user = UserId::new();
    store.seed_streak(StreakRecord::open(user.clone())).await;
    store.seed_streak(StreakRecord::open(user.clone())).await;

    let result = handler.handle(record_cmd(&user, "Dinner", true)).await;

    let err = result.unwrap_err();
    assert!(matches!(err, DomainError::StateCorruption(_)));
    assert_eq!(
        err.user_message(),
        "It was not possible to record the meal due to an error. Try again later."
    );
    assert_eq!(store.count_by_user(&user).await.unwrap().total, 0);
    assert!(store.lock_registry().is_empty());
}

#[tokio::test]
async fn test_record_meal_on_unreachable_store() {
    let store = Arc::new(InMemoryDiaryStore::default());
    let handler = record_handler(&store);
    let user = UserId::new();
    store.set_offline(true);

    let result = handler.handle(record_cmd(&user, "Dinner", true)).await;
    assert!(matches!(result, Err(DomainError::StoreUnavailable(_))));
}

#[tokio::test]
async fn test_update_meal_does_not_rewrite_streak() {
    let store = Arc::new(InMemoryDiaryStore::default());
    let handler = record_handler(&store);
    let user = UserId::new();

    let recorded = handler
        .handle(record_cmd(&user, "Breakfast", true))
        .await
        .unwrap();

    let update = UpdateMealCommandHandler::new(store.clone());
    let result = update
        .handle(UpdateMealCommand {
            user_id: user.to_string(),
            meal_id: recorded.meal.id.clone(),
            name: Some("Brunch".to_string()),
            description: None,
            eaten_at: None,
            within_diet: Some(false),
        })
        .await
        .unwrap();

    assert_eq!(result.meal.name, "Brunch");
    assert!(!result.meal.within_diet);
    assert!(result.meal.updated_at.is_some());

    let active = store.find_active_by_user(&user).await.unwrap().unwrap();
    assert_eq!(active.count(), 1);
}

#[tokio::test]
async fn test_update_unknown_meal_is_not_found() {
    let mut repo = MockMealRepo::new();
    repo.expect_find_by_id().times(1).returning(|_, _| Ok(None));
    repo.expect_update().never();

    let handler = UpdateMealCommandHandler::new(Arc::new(repo));
    let result = handler
        .handle(UpdateMealCommand {
            user_id: "alice".to_string(),
            meal_id: "missing".to_string(),
            name: Some("Tea".to_string()),
            description: None,
            eaten_at: None,
            within_diet: None,
        })
        .await;

    match result {
        Err(DomainError::MealNotFound(id)) => assert_eq!(id, "missing"),
        other => panic!("Expected MealNotFound, got {:?}", other.map(|r| r.meal.id)),
    }
}

#[tokio::test]
async fn test_update_without_changes_is_invalid() {
    let user = UserId::from_string("alice");
    let meal = stored_meal(&user, true);
    let meal_id = meal.id().to_string();

    let mut repo = MockMealRepo::new();
    repo.expect_find_by_id()
        .returning(move |_, _| Ok(Some(meal.clone())));
    repo.expect_update().never();

    let handler = UpdateMealCommandHandler::new(Arc::new(repo));
    let result = handler
        .handle(UpdateMealCommand {
            user_id: user.to_string(),
            meal_id,
            name: None,
            description: None,
            eaten_at: None,
            within_diet: None,
        })
        .await;

    assert!(matches!(result, Err(DomainError::InvalidInput(_))));
}

#[tokio::test]
async fn test_delete_meal() {
    let mut repo = MockMealRepo::new();
    repo.expect_delete()
        .withf(|id, user| id.as_str() == "meal-1" && user.as_str() == "alice")
        .times(1)
        .returning(|_, _| Ok(true));

    let handler = DeleteMealCommandHandler::new(Arc::new(repo));
    let result = handler
        .handle(DeleteMealCommand {
            user_id: "alice".to_string(),
            meal_id: "meal-1".to_string(),
        })
        .await
        .unwrap();

    assert!(result.success);
}

#[tokio::test]
async fn test_delete_unknown_meal_is_not_found() {
    let mut repo = MockMealRepo::new();
    repo.expect_delete().returning(|_, _| Ok(false));

    let handler = DeleteMealCommandHandler::new(Arc::new(repo));
    let result = handler
        .handle(DeleteMealCommand {
            user_id: "alice".to_string(),
            meal_id: "meal-1".to_string(),
        })
        .await;

    let err = result.unwrap_err();
    assert_eq!(err.user_message(), "No meal with the id meal-1 has been found.");
}
