use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;
use uuid::Uuid;

use super::model::{RecipeDB, RecipeIngredientDB, RecipeIngredientLinkDB, RecipeStepDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{recipe2recipe_ingredient, recipe_ingredients, recipe_steps, recipes};
use crate::utils::{decimal_to_db, like_contains_pattern};
use homebook_core::errors::Result;
use homebook_core::recipes::{
    IngredientLineRecord, Recipe, RecipeIngredient, RecipeIngredientLine, RecipeRepositoryTrait,
    RecipeStep,
};

pub struct RecipeRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl RecipeRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        RecipeRepository { pool, writer }
    }
}

/// Returns the id of the shared ingredient with this normalized name,
/// creating it on first use.
fn find_or_create_ingredient(
    conn: &mut SqliteConnection,
    line: &IngredientLineRecord,
) -> Result<String> {
    let existing = recipe_ingredients::table
        .filter(recipe_ingredients::normalized_name.eq(&line.normalized_name))
        .select(recipe_ingredients::id)
        .first::<String>(conn)
        .optional()
        .map_err(StorageError::from)?;
    if let Some(ingredient_id) = existing {
        return Ok(ingredient_id);
    }

    let row = RecipeIngredientDB {
        id: Uuid::new_v4().to_string(),
        name: line.name.clone(),
        normalized_name: line.normalized_name.clone(),
    };
    diesel::insert_into(recipe_ingredients::table)
        .values(&row)
        .execute(conn)
        .map_err(StorageError::from)?;
    debug!("Created ingredient '{}'", row.normalized_name);
    Ok(row.id)
}

fn write_ingredient_lines(
    conn: &mut SqliteConnection,
    recipe_id: &str,
    lines: &[IngredientLineRecord],
) -> Result<()> {
    let mut links = Vec::with_capacity(lines.len());
    for (position, line) in lines.iter().enumerate() {
        links.push(RecipeIngredientLinkDB {
            recipe_id: recipe_id.to_string(),
            ingredient_id: find_or_create_ingredient(conn, line)?,
            position: position as i32,
            quantity: line.quantity.map(decimal_to_db),
            unit: line.unit.clone(),
        });
    }
    if !links.is_empty() {
        diesel::insert_into(recipe2recipe_ingredient::table)
            .values(&links)
            .execute(conn)
            .map_err(StorageError::from)?;
    }
    Ok(())
}

fn write_steps(conn: &mut SqliteConnection, recipe_id: &str, steps: &[RecipeStep]) -> Result<()> {
    let rows: Vec<RecipeStepDB> = steps
        .iter()
        .map(|step| RecipeStepDB {
            recipe_id: recipe_id.to_string(),
            position: step.position,
            description: step.description.clone(),
            timer_seconds: step.timer_seconds,
        })
        .collect();
    if !rows.is_empty() {
        diesel::insert_into(recipe_steps::table)
            .values(&rows)
            .execute(conn)
            .map_err(StorageError::from)?;
    }
    Ok(())
}

#[async_trait]
impl RecipeRepositoryTrait for RecipeRepository {
    fn list_for_user(&self, user_id: &str, search: Option<&str>) -> Result<Vec<Recipe>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = recipes::table
            .filter(recipes::user_id.eq(user_id))
            .select(RecipeDB::as_select())
            .into_boxed();
        if let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) {
            query = query.filter(recipes::name.like(like_contains_pattern(search)).escape('\\'));
        }
        let rows = query
            .order(recipes::name.asc())
            .load::<RecipeDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Recipe::from).collect())
    }

    fn get_by_id(&self, recipe_id: &str) -> Result<Recipe> {
        let mut conn = get_connection(&self.pool)?;
        let row = recipes::table
            .find(recipe_id)
            .select(RecipeDB::as_select())
            .first::<RecipeDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(Recipe::from(row))
    }

    fn get_ingredient_lines(&self, recipe_id: &str) -> Result<Vec<RecipeIngredientLine>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = recipe2recipe_ingredient::table
            .inner_join(recipe_ingredients::table)
            .filter(recipe2recipe_ingredient::recipe_id.eq(recipe_id))
            .order(recipe2recipe_ingredient::position.asc())
            .select((
                RecipeIngredientLinkDB::as_select(),
                RecipeIngredientDB::as_select(),
            ))
            .load::<(RecipeIngredientLinkDB, RecipeIngredientDB)>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows
            .into_iter()
            .map(|(link, ingredient)| link.into_line(ingredient))
            .collect())
    }

    fn get_steps(&self, recipe_id: &str) -> Result<Vec<RecipeStep>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = recipe_steps::table
            .filter(recipe_steps::recipe_id.eq(recipe_id))
            .order(recipe_steps::position.asc())
            .select(RecipeStepDB::as_select())
            .load::<RecipeStepDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(RecipeStep::from).collect())
    }

    fn list_ingredients(&self) -> Result<Vec<RecipeIngredient>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = recipe_ingredients::table
            .select(RecipeIngredientDB::as_select())
            .order(recipe_ingredients::normalized_name.asc())
            .load::<RecipeIngredientDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(RecipeIngredient::from).collect())
    }

    fn search(&self, user_id: &str, query: &str, limit: i64) -> Result<Vec<Recipe>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = recipes::table
            .filter(recipes::user_id.eq(user_id))
            .filter(recipes::name.like(like_contains_pattern(query)).escape('\\'))
            .select(RecipeDB::as_select())
            .order(recipes::name.asc())
            .limit(limit)
            .load::<RecipeDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Recipe::from).collect())
    }

    async fn insert(
        &self,
        recipe: Recipe,
        ingredients: Vec<IngredientLineRecord>,
        steps: Vec<RecipeStep>,
    ) -> Result<Recipe> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Recipe> {
                let row: RecipeDB = recipe.into();
                let created = diesel::insert_into(recipes::table)
                    .values(&row)
                    .returning(RecipeDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                write_ingredient_lines(conn, &created.id, &ingredients)?;
                write_steps(conn, &created.id, &steps)?;
                Ok(Recipe::from(created))
            })
            .await
    }

    async fn update(&self, recipe: Recipe) -> Result<Recipe> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Recipe> {
                let row: RecipeDB = recipe.into();
                let updated = diesel::update(recipes::table.find(&row.id))
                    .set(&row)
                    .returning(RecipeDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Recipe::from(updated))
            })
            .await
    }

    async fn replace_ingredients(
        &self,
        recipe_id: &str,
        ingredients: Vec<IngredientLineRecord>,
    ) -> Result<()> {
        let recipe_id = recipe_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::delete(
                    recipe2recipe_ingredient::table
                        .filter(recipe2recipe_ingredient::recipe_id.eq(&recipe_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;
                write_ingredient_lines(conn, &recipe_id, &ingredients)
            })
            .await
    }

    async fn replace_steps(&self, recipe_id: &str, steps: Vec<RecipeStep>) -> Result<()> {
        let recipe_id = recipe_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::delete(
                    recipe_steps::table.filter(recipe_steps::recipe_id.eq(&recipe_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;
                write_steps(conn, &recipe_id, &steps)
            })
            .await
    }

    async fn delete(&self, recipe_id: &str) -> Result<usize> {
        let recipe_id = recipe_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                // Steps and ingredient links cascade; shared ingredients stay.
                Ok(diesel::delete(recipes::table.find(recipe_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}
