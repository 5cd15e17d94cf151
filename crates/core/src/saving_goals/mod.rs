//! Saving goals module - per-user savings targets and the savings calculator.

pub mod calculator;
mod saving_goals_model;
mod saving_goals_service;
mod saving_goals_traits;

#[cfg(test)]
mod saving_goals_service_tests;

pub use calculator::{
    months_to_target, months_until, project, required_monthly_payment, ProjectionPeriod,
    SavingsPlan, SavingsProjection,
};
pub use saving_goals_model::{
    validate_amounts, validate_appearance, validate_goal_name, validate_interest,
    InterestRateOption, NewSavingGoal, SavingGoal, SavingGoalAmountsUpdate,
    SavingGoalAppearanceUpdate, SavingGoalInfoUpdate, SavingGoalNameUpdate, DEFAULT_GOAL_COLOR,
    DEFAULT_GOAL_ICON,
};
pub use saving_goals_service::SavingGoalService;
pub use saving_goals_traits::{SavingGoalRepositoryTrait, SavingGoalServiceTrait};
