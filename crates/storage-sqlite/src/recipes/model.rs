//! Database models for recipes.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::utils::parse_optional_decimal_tolerant;
use homebook_core::recipes::{Recipe, RecipeIngredient, RecipeIngredientLine, RecipeStep};

#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct RecipeDB {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub servings: Option<i32>,
    pub duration_minutes: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::recipe_steps)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RecipeStepDB {
    pub recipe_id: String,
    pub position: i32,
    pub description: String,
    pub timer_seconds: Option<i32>,
}

#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::recipe_ingredients)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RecipeIngredientDB {
    pub id: String,
    pub name: String,
    pub normalized_name: String,
}

/// Row of the recipe/ingredient link table carrying quantity and unit.
#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::recipe2recipe_ingredient)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RecipeIngredientLinkDB {
    pub recipe_id: String,
    pub ingredient_id: String,
    pub position: i32,
    pub quantity: Option<String>,
    pub unit: Option<String>,
}

impl From<RecipeDB> for Recipe {
    fn from(db: RecipeDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            name: db.name,
            description: db.description,
            servings: db.servings,
            duration_minutes: db.duration_minutes,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<Recipe> for RecipeDB {
    fn from(domain: Recipe) -> Self {
        Self {
            id: domain.id,
            user_id: domain.user_id,
            name: domain.name,
            description: domain.description,
            servings: domain.servings,
            duration_minutes: domain.duration_minutes,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}

impl From<RecipeStepDB> for RecipeStep {
    fn from(db: RecipeStepDB) -> Self {
        Self {
            position: db.position,
            description: db.description,
            timer_seconds: db.timer_seconds,
        }
    }
}

impl From<RecipeIngredientDB> for RecipeIngredient {
    fn from(db: RecipeIngredientDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            normalized_name: db.normalized_name,
        }
    }
}

impl RecipeIngredientLinkDB {
    /// Combines a join row with the ingredient it points to.
    pub fn into_line(self, ingredient: RecipeIngredientDB) -> RecipeIngredientLine {
        RecipeIngredientLine {
            ingredient_id: ingredient.id,
            name: ingredient.name,
            quantity: parse_optional_decimal_tolerant(self.quantity.as_deref(), "quantity"),
            unit: self.unit,
        }
    }
}
