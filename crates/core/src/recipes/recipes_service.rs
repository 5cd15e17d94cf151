use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;

use super::recipes_model::{
    prepare_ingredient_lines, prepare_steps, validate_duration, validate_recipe_name,
    validate_servings, NewIngredientLine, NewRecipe, NewRecipeStep, Recipe, RecipeDetail,
    RecipeIngredient,
};
use super::recipes_traits::{RecipeRepositoryTrait, RecipeServiceTrait};
use crate::errors::{Error, Result};
use crate::utils::time_utils::now_naive_utc;

pub struct RecipeService {
    repository: Arc<dyn RecipeRepositoryTrait>,
}

impl RecipeService {
    pub fn new(repository: Arc<dyn RecipeRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn load_owned(&self, user_id: &str, recipe_id: &str) -> Result<Recipe> {
        let not_found = || Error::NotFound(format!("Recipe {recipe_id}"));
        let recipe = self
            .repository
            .get_by_id(recipe_id)
            .map_err(|e| if e.is_not_found() { not_found() } else { e })?;
        if recipe.user_id != user_id {
            debug!("User {} tried to access recipe {} of another user", user_id, recipe_id);
            return Err(not_found());
        }
        Ok(recipe)
    }

    fn load_detail(&self, recipe: Recipe) -> Result<RecipeDetail> {
        let ingredients = self.repository.get_ingredient_lines(&recipe.id)?;
        let steps = self.repository.get_steps(&recipe.id)?;
        Ok(RecipeDetail {
            recipe,
            ingredients,
            steps,
        })
    }

    async fn modify<F>(&self, user_id: &str, recipe_id: &str, apply: F) -> Result<Recipe>
    where
        F: FnOnce(&mut Recipe) + Send,
    {
        let mut recipe = self.load_owned(user_id, recipe_id)?;
        apply(&mut recipe);
        recipe.updated_at = now_naive_utc();
        self.repository.update(recipe).await
    }
}

fn clean_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

#[async_trait]
impl RecipeServiceTrait for RecipeService {
    fn get_recipes(&self, user_id: &str, search: Option<&str>) -> Result<Vec<Recipe>> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        self.repository.list_for_user(user_id, search)
    }

    fn get_recipe(&self, user_id: &str, recipe_id: &str) -> Result<RecipeDetail> {
        let recipe = self.load_owned(user_id, recipe_id)?;
        self.load_detail(recipe)
    }

    fn get_ingredients(&self) -> Result<Vec<RecipeIngredient>> {
        self.repository.list_ingredients()
    }

    fn search_recipes(&self, user_id: &str, query: &str, limit: i64) -> Result<Vec<Recipe>> {
        self.repository.search(user_id, query.trim(), limit)
    }

    async fn create_recipe(&self, user_id: &str, new_recipe: NewRecipe) -> Result<RecipeDetail> {
        validate_recipe_name(&new_recipe.name)?;
        validate_servings(new_recipe.servings)?;
        validate_duration(new_recipe.duration_minutes)?;
        let ingredients = prepare_ingredient_lines(new_recipe.ingredients)?;
        let steps = prepare_steps(new_recipe.steps)?;

        let now = now_naive_utc();
        let recipe = Recipe {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: new_recipe.name.trim().to_string(),
            description: clean_description(new_recipe.description),
            servings: new_recipe.servings,
            duration_minutes: new_recipe.duration_minutes,
            created_at: now,
            updated_at: now,
        };
        let created = self.repository.insert(recipe, ingredients, steps).await?;
        info!("Created recipe {} for user {}", created.id, user_id);
        self.load_detail(created)
    }

    async fn update_name(&self, user_id: &str, recipe_id: &str, name: &str) -> Result<Recipe> {
        validate_recipe_name(name)?;
        let name = name.trim().to_string();
        self.modify(user_id, recipe_id, move |r| r.name = name).await
    }

    async fn update_description(
        &self,
        user_id: &str,
        recipe_id: &str,
        description: Option<String>,
    ) -> Result<Recipe> {
        let description = clean_description(description);
        self.modify(user_id, recipe_id, move |r| r.description = description)
            .await
    }

    async fn update_servings(
        &self,
        user_id: &str,
        recipe_id: &str,
        servings: Option<i32>,
    ) -> Result<Recipe> {
        validate_servings(servings)?;
        self.modify(user_id, recipe_id, move |r| r.servings = servings)
            .await
    }

    async fn update_duration(
        &self,
        user_id: &str,
        recipe_id: &str,
        duration_minutes: Option<i32>,
    ) -> Result<Recipe> {
        validate_duration(duration_minutes)?;
        self.modify(user_id, recipe_id, move |r| {
            r.duration_minutes = duration_minutes
        })
        .await
    }

    async fn replace_ingredients(
        &self,
        user_id: &str,
        recipe_id: &str,
        ingredients: Vec<NewIngredientLine>,
    ) -> Result<RecipeDetail> {
        let lines = prepare_ingredient_lines(ingredients)?;
        self.load_owned(user_id, recipe_id)?;
        self.repository.replace_ingredients(recipe_id, lines).await?;
        let recipe = self.modify(user_id, recipe_id, |_| {}).await?;
        self.load_detail(recipe)
    }

    async fn replace_steps(
        &self,
        user_id: &str,
        recipe_id: &str,
        steps: Vec<NewRecipeStep>,
    ) -> Result<RecipeDetail> {
        let steps = prepare_steps(steps)?;
        self.load_owned(user_id, recipe_id)?;
        self.repository.replace_steps(recipe_id, steps).await?;
        let recipe = self.modify(user_id, recipe_id, |_| {}).await?;
        self.load_detail(recipe)
    }

    async fn delete_recipe(&self, user_id: &str, recipe_id: &str) -> Result<()> {
        self.load_owned(user_id, recipe_id)?;
        self.repository.delete(recipe_id).await?;
        info!("Deleted recipe {}", recipe_id);
        Ok(())
    }
}
