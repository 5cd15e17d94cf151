use async_trait::async_trait;

use super::recipes_model::{
    IngredientLineRecord, NewIngredientLine, NewRecipe, NewRecipeStep, Recipe, RecipeDetail,
    RecipeIngredient, RecipeIngredientLine, RecipeStep,
};
use crate::errors::Result;

/// Trait defining the contract for recipe repository operations.
#[async_trait]
pub trait RecipeRepositoryTrait: Send + Sync {
    /// Recipes of one user ordered by name, optionally filtered by a
    /// case-insensitive name fragment.
    fn list_for_user(&self, user_id: &str, search: Option<&str>) -> Result<Vec<Recipe>>;
    fn get_by_id(&self, recipe_id: &str) -> Result<Recipe>;
    fn get_ingredient_lines(&self, recipe_id: &str) -> Result<Vec<RecipeIngredientLine>>;
    /// Steps ordered by position.
    fn get_steps(&self, recipe_id: &str) -> Result<Vec<RecipeStep>>;
    fn list_ingredients(&self) -> Result<Vec<RecipeIngredient>>;
    fn search(&self, user_id: &str, query: &str, limit: i64) -> Result<Vec<Recipe>>;

    /// Inserts the recipe with its ingredient lines and steps in one transaction.
    async fn insert(
        &self,
        recipe: Recipe,
        ingredients: Vec<IngredientLineRecord>,
        steps: Vec<RecipeStep>,
    ) -> Result<Recipe>;
    async fn update(&self, recipe: Recipe) -> Result<Recipe>;
    async fn replace_ingredients(
        &self,
        recipe_id: &str,
        ingredients: Vec<IngredientLineRecord>,
    ) -> Result<()>;
    async fn replace_steps(&self, recipe_id: &str, steps: Vec<RecipeStep>) -> Result<()>;
    /// Deletes the recipe, its steps and its ingredient lines.
    async fn delete(&self, recipe_id: &str) -> Result<usize>;
}

/// Trait defining the contract for recipe service operations.
#[async_trait]
pub trait RecipeServiceTrait: Send + Sync {
    fn get_recipes(&self, user_id: &str, search: Option<&str>) -> Result<Vec<Recipe>>;
    fn get_recipe(&self, user_id: &str, recipe_id: &str) -> Result<RecipeDetail>;
    fn get_ingredients(&self) -> Result<Vec<RecipeIngredient>>;
    fn search_recipes(&self, user_id: &str, query: &str, limit: i64) -> Result<Vec<Recipe>>;
    async fn create_recipe(&self, user_id: &str, new_recipe: NewRecipe) -> Result<RecipeDetail>;
    async fn update_name(&self, user_id: &str, recipe_id: &str, name: &str) -> Result<Recipe>;
    async fn update_description(
        &self,
        user_id: &str,
        recipe_id: &str,
        description: Option<String>,
    ) -> Result<Recipe>;
    async fn update_servings(
        &self,
        user_id: &str,
        recipe_id: &str,
        servings: Option<i32>,
    ) -> Result<Recipe>;
    async fn update_duration(
        &self,
        user_id: &str,
        recipe_id: &str,
        duration_minutes: Option<i32>,
    ) -> Result<Recipe>;
    async fn replace_ingredients(
        &self,
        user_id: &str,
        recipe_id: &str,
        ingredients: Vec<NewIngredientLine>,
    ) -> Result<RecipeDetail>;
    async fn replace_steps(
        &self,
        user_id: &str,
        recipe_id: &str,
        steps: Vec<NewRecipeStep>,
    ) -> Result<RecipeDetail>;
    async fn delete_recipe(&self, user_id: &str, recipe_id: &str) -> Result<()>;
}
