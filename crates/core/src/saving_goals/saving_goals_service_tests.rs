use crate::errors::{DatabaseError, Error, Result};
use crate::saving_goals::{
    InterestRateOption, NewSavingGoal, SavingGoal, SavingGoalAmountsUpdate,
    SavingGoalAppearanceUpdate, SavingGoalInfoUpdate, SavingGoalRepositoryTrait,
    SavingGoalService, SavingGoalServiceTrait,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex};

// --- Mock SavingGoalRepository ---
#[derive(Default)]
struct MockSavingGoalRepository {
    goals: Mutex<Vec<SavingGoal>>,
}

#[async_trait]
impl SavingGoalRepositoryTrait for MockSavingGoalRepository {
    fn list_for_user(&self, user_id: &str) -> Result<Vec<SavingGoal>> {
        Ok(self
            .goals
            .lock()
            .unwrap()
            .iter()
            .filter(|g| g.user_id == user_id)
            .cloned()
            .collect())
    }

    fn get_by_id(&self, goal_id: &str) -> Result<SavingGoal> {
        self.goals
            .lock()
            .unwrap()
            .iter()
            .find(|g| g.id == goal_id)
            .cloned()
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(goal_id.to_string())))
    }

    fn search(&self, user_id: &str, query: &str, limit: i64) -> Result<Vec<SavingGoal>> {
        let query = query.to_lowercase();
        Ok(self
            .list_for_user(user_id)?
            .into_iter()
            .filter(|g| g.name.to_lowercase().contains(&query))
            .take(limit as usize)
            .collect())
    }

    async fn insert(&self, goal: SavingGoal) -> Result<SavingGoal> {
        self.goals.lock().unwrap().push(goal.clone());
        Ok(goal)
    }

    async fn update(&self, goal: SavingGoal) -> Result<SavingGoal> {
        let mut goals = self.goals.lock().unwrap();
        let slot = goals
            .iter_mut()
            .find(|g| g.id == goal.id)
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(goal.id.clone())))?;
        *slot = goal.clone();
        Ok(goal)
    }

    async fn delete(&self, goal_id: &str) -> Result<usize> {
        let mut goals = self.goals.lock().unwrap();
        let before = goals.len();
        goals.retain(|g| g.id != goal_id);
        Ok(before - goals.len())
    }
}

fn service() -> SavingGoalService {
    SavingGoalService::new(Arc::new(MockSavingGoalRepository::default()))
}

fn new_goal(name: &str) -> NewSavingGoal {
    NewSavingGoal {
        name: name.to_string(),
        color: None,
        icon: None,
        target_amount: dec!(1000),
        current_amount: dec!(100),
        monthly_payment: dec!(100),
        interest_rate_option: InterestRateOption::None,
        interest_rate: None,
        target_date: None,
    }
}

#[tokio::test]
async fn test_create_applies_defaults() {
    let service = service();
    let goal = service
        .create_saving_goal("user-1", new_goal("  Vacation  "))
        .await
        .unwrap();

    assert_eq!(goal.name, "Vacation");
    assert_eq!(goal.user_id, "user-1");
    assert_eq!(goal.color, "#4CAF50");
    assert_eq!(goal.icon, "piggy-bank");
    assert_eq!(service.get_saving_goals("user-1").unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_rejects_invalid_goals() {
    let service = service();

    let mut zero_target = new_goal("Car");
    zero_target.target_amount = dec!(0);
    assert!(matches!(
        service.create_saving_goal("user-1", zero_target).await,
        Err(Error::Validation(_))
    ));

    let mut missing_rate = new_goal("Car");
    missing_rate.interest_rate_option = InterestRateOption::Monthly;
    assert!(matches!(
        service.create_saving_goal("user-1", missing_rate).await,
        Err(Error::Validation(_))
    ));

    let mut bad_color = new_goal("Car");
    bad_color.color = Some("red".to_string());
    assert!(matches!(
        service.create_saving_goal("user-1", bad_color).await,
        Err(Error::Validation(_))
    ));
}

#[tokio::test]
async fn test_rate_is_dropped_without_interest() {
    let service = service();
    let mut goal = new_goal("Bike");
    goal.interest_rate = Some(dec!(3));
    let created = service.create_saving_goal("user-1", goal).await.unwrap();
    assert_eq!(created.interest_rate, None);
}

#[tokio::test]
async fn test_goals_of_other_users_are_hidden() {
    let service = service();
    let goal = service
        .create_saving_goal("user-1", new_goal("Vacation"))
        .await
        .unwrap();

    assert!(matches!(
        service.get_saving_goal("user-2", &goal.id),
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        service.update_name("user-2", &goal.id, "Mine now").await,
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        service.delete_saving_goal("user-2", &goal.id).await,
        Err(Error::NotFound(_))
    ));
    assert!(service.get_saving_goals("user-2").unwrap().is_empty());
    assert!(matches!(
        service.get_saving_goal("user-1", "missing"),
        Err(Error::NotFound(_))
    ));
}

#[tokio::test]
async fn test_partial_updates() {
    let service = service();
    let goal = service
        .create_saving_goal("user-1", new_goal("Vacation"))
        .await
        .unwrap();

    let renamed = service
        .update_name("user-1", &goal.id, "Summer trip")
        .await
        .unwrap();
    assert_eq!(renamed.name, "Summer trip");

    let amounts = service
        .update_amounts(
            "user-1",
            &goal.id,
            SavingGoalAmountsUpdate {
                target_amount: dec!(2000),
                current_amount: dec!(500),
                monthly_payment: dec!(150),
            },
        )
        .await
        .unwrap();
    assert_eq!(amounts.target_amount, dec!(2000));
    assert_eq!(amounts.name, "Summer trip");

    let appearance = service
        .update_appearance(
            "user-1",
            &goal.id,
            SavingGoalAppearanceUpdate {
                color: "#112233".to_string(),
                icon: "plane".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(appearance.icon, "plane");

    let info = service
        .update_info(
            "user-1",
            &goal.id,
            SavingGoalInfoUpdate {
                target_date: NaiveDate::from_ymd_opt(2030, 1, 1),
                interest_rate_option: InterestRateOption::Yearly,
                interest_rate: Some(dec!(2.5)),
            },
        )
        .await
        .unwrap();
    assert_eq!(info.interest_rate_option, InterestRateOption::Yearly);
    assert_eq!(info.interest_rate, Some(dec!(2.5)));

    let invalid = service
        .update_amounts(
            "user-1",
            &goal.id,
            SavingGoalAmountsUpdate {
                target_amount: dec!(2000),
                current_amount: dec!(-1),
                monthly_payment: dec!(150),
            },
        )
        .await;
    assert!(matches!(invalid, Err(Error::Validation(_))));
    // A rejected update leaves the stored goal unchanged.
    let stored = service.get_saving_goal("user-1", &goal.id).unwrap();
    assert_eq!(stored.current_amount, dec!(500));
}

#[tokio::test]
async fn test_projection_for_owned_goal() {
    let service = service();
    let goal = service
        .create_saving_goal("user-1", new_goal("Vacation"))
        .await
        .unwrap();

    let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let projection = service.get_projection("user-1", &goal.id, today).unwrap();
    assert_eq!(projection.months_to_target, Some(9));
    assert_eq!(projection.periods.len(), 9);

    assert!(service.get_projection("user-2", &goal.id, today).is_err());
}

#[tokio::test]
async fn test_search_is_scoped_to_user() {
    let service = service();
    service
        .create_saving_goal("user-1", new_goal("New Car"))
        .await
        .unwrap();
    service
        .create_saving_goal("user-2", new_goal("Car repairs"))
        .await
        .unwrap();

    let hits = service.search_saving_goals("user-1", " car ", 10).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "New Car");
}
