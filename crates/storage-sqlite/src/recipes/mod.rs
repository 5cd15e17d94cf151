//! SQLite storage implementation for recipes, their steps and shared ingredients.

mod model;
mod repository;

pub use model::{RecipeDB, RecipeIngredientDB, RecipeIngredientLinkDB, RecipeStepDB};
pub use repository::RecipeRepository;
