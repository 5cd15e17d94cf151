use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;

use super::model::SavingGoalDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::saving_goals;
use crate::utils::like_contains_pattern;
use homebook_core::errors::Result;
use homebook_core::saving_goals::{SavingGoal, SavingGoalRepositoryTrait};

pub struct SavingGoalRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SavingGoalRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SavingGoalRepository { pool, writer }
    }
}

#[async_trait]
impl SavingGoalRepositoryTrait for SavingGoalRepository {
    fn list_for_user(&self, user_id: &str) -> Result<Vec<SavingGoal>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = saving_goals::table
            .filter(saving_goals::user_id.eq(user_id))
            .select(SavingGoalDB::as_select())
            .order((saving_goals::created_at.asc(), saving_goals::name.asc()))
            .load::<SavingGoalDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(SavingGoal::from).collect())
    }

    fn get_by_id(&self, goal_id: &str) -> Result<SavingGoal> {
        let mut conn = get_connection(&self.pool)?;
        let row = saving_goals::table
            .find(goal_id)
            .select(SavingGoalDB::as_select())
            .first::<SavingGoalDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(SavingGoal::from(row))
    }

    fn search(&self, user_id: &str, query: &str, limit: i64) -> Result<Vec<SavingGoal>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = saving_goals::table
            .filter(saving_goals::user_id.eq(user_id))
            .filter(
                saving_goals::name
                    .like(like_contains_pattern(query))
                    .escape('\\'),
            )
            .select(SavingGoalDB::as_select())
            .order(saving_goals::name.asc())
            .limit(limit)
            .load::<SavingGoalDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(SavingGoal::from).collect())
    }

    async fn insert(&self, goal: SavingGoal) -> Result<SavingGoal> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<SavingGoal> {
                let row: SavingGoalDB = goal.into();
                let created = diesel::insert_into(saving_goals::table)
                    .values(&row)
                    .returning(SavingGoalDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(SavingGoal::from(created))
            })
            .await
    }

    async fn update(&self, goal: SavingGoal) -> Result<SavingGoal> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<SavingGoal> {
                let row: SavingGoalDB = goal.into();
                let updated = diesel::update(saving_goals::table.find(&row.id))
                    .set(&row)
                    .returning(SavingGoalDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(SavingGoal::from(updated))
            })
            .await
    }

    async fn delete(&self, goal_id: &str) -> Result<usize> {
        let goal_id = goal_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(saving_goals::table.find(goal_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}
