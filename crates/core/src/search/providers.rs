//! Search providers for the built-in modules.

use async_trait::async_trait;
use std::sync::Arc;

use super::search_model::SearchResultItem;
use super::search_traits::SearchProvider;
use crate::errors::Result;
use crate::recipes::RecipeServiceTrait;
use crate::saving_goals::SavingGoalServiceTrait;

pub const FINANCES_MODULE: &str = "finances";
pub const KITCHEN_MODULE: &str = "kitchen";

pub struct SavingGoalSearchProvider {
    service: Arc<dyn SavingGoalServiceTrait>,
}

impl SavingGoalSearchProvider {
    pub fn new(service: Arc<dyn SavingGoalServiceTrait>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl SearchProvider for SavingGoalSearchProvider {
    fn module(&self) -> &'static str {
        FINANCES_MODULE
    }

    async fn search(
        &self,
        user_id: &str,
        query: &str,
        limit: i64,
    ) -> Result<Vec<SearchResultItem>> {
        let goals = self.service.search_saving_goals(user_id, query, limit)?;
        Ok(goals
            .into_iter()
            .map(|goal| SearchResultItem {
                module: FINANCES_MODULE.to_string(),
                subtitle: Some(format!(
                    "{} / {}",
                    goal.current_amount.round_dp(2),
                    goal.target_amount.round_dp(2)
                )),
                id: goal.id,
                title: goal.name,
                icon: Some(goal.icon),
                color: Some(goal.color),
            })
            .collect())
    }
}

pub struct RecipeSearchProvider {
    service: Arc<dyn RecipeServiceTrait>,
}

impl RecipeSearchProvider {
    pub fn new(service: Arc<dyn RecipeServiceTrait>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl SearchProvider for RecipeSearchProvider {
    fn module(&self) -> &'static str {
        KITCHEN_MODULE
    }

    async fn search(
        &self,
        user_id: &str,
        query: &str,
        limit: i64,
    ) -> Result<Vec<SearchResultItem>> {
        let recipes = self.service.search_recipes(user_id, query, limit)?;
        Ok(recipes
            .into_iter()
            .map(|recipe| SearchResultItem {
                module: KITCHEN_MODULE.to_string(),
                id: recipe.id,
                title: recipe.name,
                subtitle: recipe.description,
                icon: Some("chef-hat".to_string()),
                color: None,
            })
            .collect())
    }
}
