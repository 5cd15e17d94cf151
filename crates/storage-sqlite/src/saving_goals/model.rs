//! Database models for saving goals.
//!
//! Amounts and rates are stored as TEXT to keep full decimal precision.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::utils::{decimal_to_db, parse_decimal_tolerant, parse_optional_decimal_tolerant};
use homebook_core::saving_goals::{InterestRateOption, SavingGoal};

#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::saving_goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct SavingGoalDB {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub color: String,
    pub icon: String,
    pub target_amount: String,
    pub current_amount: String,
    pub monthly_payment: String,
    pub interest_rate_option: String,
    pub interest_rate: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<SavingGoalDB> for SavingGoal {
    fn from(db: SavingGoalDB) -> Self {
        let interest_rate_option = InterestRateOption::from_db_str(&db.interest_rate_option)
            .unwrap_or_else(|e| {
                log::error!(
                    "Saving goal {} has an unreadable interest option: {}",
                    db.id,
                    e
                );
                InterestRateOption::None
            });
        Self {
            target_amount: parse_decimal_tolerant(&db.target_amount, "target_amount"),
            current_amount: parse_decimal_tolerant(&db.current_amount, "current_amount"),
            monthly_payment: parse_decimal_tolerant(&db.monthly_payment, "monthly_payment"),
            interest_rate: parse_optional_decimal_tolerant(
                db.interest_rate.as_deref(),
                "interest_rate",
            ),
            interest_rate_option,
            id: db.id,
            user_id: db.user_id,
            name: db.name,
            color: db.color,
            icon: db.icon,
            target_date: db.target_date,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<SavingGoal> for SavingGoalDB {
    fn from(domain: SavingGoal) -> Self {
        Self {
            id: domain.id,
            user_id: domain.user_id,
            name: domain.name,
            color: domain.color,
            icon: domain.icon,
            target_amount: decimal_to_db(domain.target_amount),
            current_amount: decimal_to_db(domain.current_amount),
            monthly_payment: decimal_to_db(domain.monthly_payment),
            interest_rate_option: domain.interest_rate_option.as_db_str().to_string(),
            interest_rate: domain.interest_rate.map(decimal_to_db),
            target_date: domain.target_date,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}
