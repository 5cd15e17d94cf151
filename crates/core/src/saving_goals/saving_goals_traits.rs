use async_trait::async_trait;
use chrono::NaiveDate;

use super::calculator::SavingsProjection;
use super::saving_goals_model::{
    NewSavingGoal, SavingGoal, SavingGoalAmountsUpdate, SavingGoalAppearanceUpdate,
    SavingGoalInfoUpdate,
};
use crate::errors::Result;

/// Trait defining the contract for saving goal repository operations.
#[async_trait]
pub trait SavingGoalRepositoryTrait: Send + Sync {
    fn list_for_user(&self, user_id: &str) -> Result<Vec<SavingGoal>>;
    fn get_by_id(&self, goal_id: &str) -> Result<SavingGoal>;
    /// Case-insensitive substring search over the goal names of one user.
    fn search(&self, user_id: &str, query: &str, limit: i64) -> Result<Vec<SavingGoal>>;
    async fn insert(&self, goal: SavingGoal) -> Result<SavingGoal>;
    async fn update(&self, goal: SavingGoal) -> Result<SavingGoal>;
    async fn delete(&self, goal_id: &str) -> Result<usize>;
}

/// Trait defining the contract for saving goal service operations.
///
/// Every operation is scoped to `user_id`; goals of other users behave as if
/// they did not exist.
#[async_trait]
pub trait SavingGoalServiceTrait: Send + Sync {
    fn get_saving_goals(&self, user_id: &str) -> Result<Vec<SavingGoal>>;
    fn get_saving_goal(&self, user_id: &str, goal_id: &str) -> Result<SavingGoal>;
    fn search_saving_goals(&self, user_id: &str, query: &str, limit: i64)
        -> Result<Vec<SavingGoal>>;
    fn get_projection(
        &self,
        user_id: &str,
        goal_id: &str,
        today: NaiveDate,
    ) -> Result<SavingsProjection>;
    async fn create_saving_goal(&self, user_id: &str, new_goal: NewSavingGoal)
        -> Result<SavingGoal>;
    async fn update_name(&self, user_id: &str, goal_id: &str, name: &str) -> Result<SavingGoal>;
    async fn update_amounts(
        &self,
        user_id: &str,
        goal_id: &str,
        update: SavingGoalAmountsUpdate,
    ) -> Result<SavingGoal>;
    async fn update_appearance(
        &self,
        user_id: &str,
        goal_id: &str,
        update: SavingGoalAppearanceUpdate,
    ) -> Result<SavingGoal>;
    async fn update_info(
        &self,
        user_id: &str,
        goal_id: &str,
        update: SavingGoalInfoUpdate,
    ) -> Result<SavingGoal>;
    async fn delete_saving_goal(&self, user_id: &str, goal_id: &str) -> Result<()>;
}
