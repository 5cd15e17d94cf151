use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, info};
use rust_decimal::Decimal;
use std::sync::Arc;

use super::calculator::{project, SavingsPlan, SavingsProjection};
use super::saving_goals_model::{
    NewSavingGoal, SavingGoal, SavingGoalAmountsUpdate, SavingGoalAppearanceUpdate,
    SavingGoalInfoUpdate, DEFAULT_GOAL_COLOR, DEFAULT_GOAL_ICON,
};
use super::saving_goals_traits::{SavingGoalRepositoryTrait, SavingGoalServiceTrait};
use crate::errors::{Error, Result};
use crate::saving_goals::InterestRateOption;
use crate::utils::time_utils::now_naive_utc;

pub struct SavingGoalService {
    repository: Arc<dyn SavingGoalRepositoryTrait>,
}

impl SavingGoalService {
    pub fn new(repository: Arc<dyn SavingGoalRepositoryTrait>) -> Self {
        Self { repository }
    }

    /// Loads a goal and hides it unless it belongs to `user_id`.
    fn load_owned(&self, user_id: &str, goal_id: &str) -> Result<SavingGoal> {
        let not_found = || Error::NotFound(format!("Saving goal {goal_id}"));
        let goal = self.repository.get_by_id(goal_id).map_err(|e| {
            if e.is_not_found() {
                not_found()
            } else {
                e
            }
        })?;
        if goal.user_id != user_id {
            debug!("User {} tried to access saving goal {} of another user", user_id, goal_id);
            return Err(not_found());
        }
        Ok(goal)
    }

    async fn modify<F>(&self, user_id: &str, goal_id: &str, apply: F) -> Result<SavingGoal>
    where
        F: FnOnce(&mut SavingGoal) + Send,
    {
        let mut goal = self.load_owned(user_id, goal_id)?;
        apply(&mut goal);
        goal.validate()?;
        goal.updated_at = now_naive_utc();
        self.repository.update(goal).await
    }
}

/// Drops a rate that has no effect so it is not stored with `NONE`.
fn normalize_rate(option: InterestRateOption, rate: Option<Decimal>) -> Option<Decimal> {
    match option {
        InterestRateOption::None => None,
        _ => rate,
    }
}

#[async_trait]
impl SavingGoalServiceTrait for SavingGoalService {
    fn get_saving_goals(&self, user_id: &str) -> Result<Vec<SavingGoal>> {
        self.repository.list_for_user(user_id)
    }

    fn get_saving_goal(&self, user_id: &str, goal_id: &str) -> Result<SavingGoal> {
        self.load_owned(user_id, goal_id)
    }

    fn search_saving_goals(
        &self,
        user_id: &str,
        query: &str,
        limit: i64,
    ) -> Result<Vec<SavingGoal>> {
        self.repository.search(user_id, query.trim(), limit)
    }

    fn get_projection(
        &self,
        user_id: &str,
        goal_id: &str,
        today: NaiveDate,
    ) -> Result<SavingsProjection> {
        let goal = self.load_owned(user_id, goal_id)?;
        Ok(project(&SavingsPlan::from(&goal), today))
    }

    async fn create_saving_goal(
        &self,
        user_id: &str,
        new_goal: NewSavingGoal,
    ) -> Result<SavingGoal> {
        let now = now_naive_utc();
        let goal = SavingGoal {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: new_goal.name.trim().to_string(),
            color: new_goal
                .color
                .unwrap_or_else(|| DEFAULT_GOAL_COLOR.to_string()),
            icon: new_goal.icon.unwrap_or_else(|| DEFAULT_GOAL_ICON.to_string()),
            target_amount: new_goal.target_amount,
            current_amount: new_goal.current_amount,
            monthly_payment: new_goal.monthly_payment,
            interest_rate_option: new_goal.interest_rate_option,
            interest_rate: normalize_rate(new_goal.interest_rate_option, new_goal.interest_rate),
            target_date: new_goal.target_date,
            created_at: now,
            updated_at: now,
        };
        goal.validate()?;
        let created = self.repository.insert(goal).await?;
        info!("Created saving goal {} for user {}", created.id, user_id);
        Ok(created)
    }

    async fn update_name(&self, user_id: &str, goal_id: &str, name: &str) -> Result<SavingGoal> {
        let name = name.trim().to_string();
        self.modify(user_id, goal_id, move |goal| goal.name = name).await
    }

    async fn update_amounts(
        &self,
        user_id: &str,
        goal_id: &str,
        update: SavingGoalAmountsUpdate,
    ) -> Result<SavingGoal> {
        self.modify(user_id, goal_id, move |goal| {
            goal.target_amount = update.target_amount;
            goal.current_amount = update.current_amount;
            goal.monthly_payment = update.monthly_payment;
        })
        .await
    }

    async fn update_appearance(
        &self,
        user_id: &str,
        goal_id: &str,
        update: SavingGoalAppearanceUpdate,
    ) -> Result<SavingGoal> {
        self.modify(user_id, goal_id, move |goal| {
            goal.color = update.color;
            goal.icon = update.icon;
        })
        .await
    }

    async fn update_info(
        &self,
        user_id: &str,
        goal_id: &str,
        update: SavingGoalInfoUpdate,
    ) -> Result<SavingGoal> {
        self.modify(user_id, goal_id, move |goal| {
            goal.target_date = update.target_date;
            goal.interest_rate_option = update.interest_rate_option;
            goal.interest_rate = normalize_rate(update.interest_rate_option, update.interest_rate);
        })
        .await
    }

    async fn delete_saving_goal(&self, user_id: &str, goal_id: &str) -> Result<()> {
        self.load_owned(user_id, goal_id)?;
        self.repository.delete(goal_id).await?;
        info!("Deleted saving goal {}", goal_id);
        Ok(())
    }
}
