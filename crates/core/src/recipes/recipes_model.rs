//! Recipe domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::{Error, Result};

pub const RECIPE_NAME_MAX_LEN: usize = 128;
pub const MAX_SERVINGS: i32 = 100;
/// One week
pub const MAX_DURATION_MINUTES: i32 = 10_080;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub servings: Option<i32>,
    pub duration_minutes: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A globally shared ingredient, identified by its normalized name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeIngredient {
    pub id: String,
    pub name: String,
    pub normalized_name: String,
}

/// An ingredient as used by one recipe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeIngredientLine {
    pub ingredient_id: String,
    pub name: String,
    pub quantity: Option<Decimal>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeStep {
    pub position: i32,
    pub description: String,
    pub timer_seconds: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub ingredients: Vec<RecipeIngredientLine>,
    pub steps: Vec<RecipeStep>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIngredientLine {
    pub name: String,
    pub quantity: Option<Decimal>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecipeStep {
    pub description: String,
    pub timer_seconds: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecipe {
    pub name: String,
    pub description: Option<String>,
    pub servings: Option<i32>,
    pub duration_minutes: Option<i32>,
    #[serde(default)]
    pub ingredients: Vec<NewIngredientLine>,
    #[serde(default)]
    pub steps: Vec<NewRecipeStep>,
}

/// Ingredient line after validation, ready for the repository.
///
/// The repository reuses an existing ingredient with the same
/// `normalized_name` before inserting a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientLineRecord {
    pub name: String,
    pub normalized_name: String,
    pub quantity: Option<Decimal>,
    pub unit: Option<String>,
}

/// Trims, collapses internal whitespace and lowercases an ingredient name.
pub fn normalize_ingredient_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

pub fn validate_recipe_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_input("Recipe name cannot be empty"));
    }
    if trimmed.chars().count() > RECIPE_NAME_MAX_LEN {
        return Err(Error::invalid_input(format!(
            "Recipe name cannot exceed {} characters",
            RECIPE_NAME_MAX_LEN
        )));
    }
    Ok(())
}

pub fn validate_servings(servings: Option<i32>) -> Result<()> {
    match servings {
        Some(value) if !(1..=MAX_SERVINGS).contains(&value) => Err(Error::invalid_input(
            format!("Servings must be between 1 and {}", MAX_SERVINGS),
        )),
        _ => Ok(()),
    }
}

pub fn validate_duration(duration_minutes: Option<i32>) -> Result<()> {
    match duration_minutes {
        Some(value) if !(1..=MAX_DURATION_MINUTES).contains(&value) => {
            Err(Error::invalid_input(format!(
                "Duration must be between 1 and {} minutes",
                MAX_DURATION_MINUTES
            )))
        }
        _ => Ok(()),
    }
}

/// Validates ingredient lines and normalizes their names.
///
/// Two lines that normalize to the same ingredient are rejected.
pub fn prepare_ingredient_lines(lines: Vec<NewIngredientLine>) -> Result<Vec<IngredientLineRecord>> {
    let mut seen = HashSet::new();
    lines
        .into_iter()
        .map(|line| {
            let normalized_name = normalize_ingredient_name(&line.name);
            if normalized_name.is_empty() {
                return Err(Error::invalid_input("Ingredient name cannot be empty"));
            }
            if !seen.insert(normalized_name.clone()) {
                return Err(Error::invalid_input(format!(
                    "Ingredient '{}' is listed more than once",
                    line.name.trim()
                )));
            }
            if line.quantity.is_some_and(|q| q.is_sign_negative()) {
                return Err(Error::invalid_input(format!(
                    "Quantity of '{}' cannot be negative",
                    line.name.trim()
                )));
            }
            let unit = line
                .unit
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty());
            Ok(IngredientLineRecord {
                name: line.name.split_whitespace().collect::<Vec<_>>().join(" "),
                normalized_name,
                quantity: line.quantity,
                unit,
            })
        })
        .collect()
}

/// Validates steps and assigns positions `0..n` in the given order.
pub fn prepare_steps(steps: Vec<NewRecipeStep>) -> Result<Vec<RecipeStep>> {
    steps
        .into_iter()
        .enumerate()
        .map(|(index, step)| {
            let description = step.description.trim().to_string();
            if description.is_empty() {
                return Err(Error::invalid_input(format!(
                    "Step {} has no description",
                    index + 1
                )));
            }
            if step.timer_seconds.is_some_and(|t| t < 0) {
                return Err(Error::invalid_input(format!(
                    "Timer of step {} cannot be negative",
                    index + 1
                )));
            }
            Ok(RecipeStep {
                position: index as i32,
                description,
                timer_seconds: step.timer_seconds,
            })
        })
        .collect()
}
