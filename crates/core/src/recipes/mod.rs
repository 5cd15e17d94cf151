//! Recipes module - recipes with ordered steps and shared, deduplicated ingredients.

mod recipes_model;
mod recipes_service;
mod recipes_traits;


pub use recipes_model::{
    normalize_ingredient_name, prepare_ingredient_lines, prepare_steps, validate_duration,
    validate_recipe_name, validate_servings, IngredientLineRecord, NewIngredientLine, NewRecipe,
    NewRecipeStep, Recipe, RecipeDetail, RecipeIngredient, RecipeIngredientLine, RecipeStep,
};
pub use recipes_service::RecipeService;
pub use recipes_traits::{RecipeRepositoryTrait, RecipeServiceTrait};
