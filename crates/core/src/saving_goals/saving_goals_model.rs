//! Saving goal domain models.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::MAX_MONEY_AMOUNT;
use crate::{Error, Result};

pub const DEFAULT_GOAL_COLOR: &str = "#4CAF50";
pub const DEFAULT_GOAL_ICON: &str = "piggy-bank";
pub const GOAL_NAME_MAX_LEN: usize = 128;
pub const GOAL_ICON_MAX_LEN: usize = 64;

/// How interest is credited on a saving goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterestRateOption {
    /// No interest
    #[default]
    None,
    /// Annual rate / 12 credited every month
    Monthly,
    /// Annual rate credited every twelfth month
    Yearly,
}

impl InterestRateOption {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            InterestRateOption::None => "NONE",
            InterestRateOption::Monthly => "MONTHLY",
            InterestRateOption::Yearly => "YEARLY",
        }
    }

    pub fn from_db_str(value: &str) -> Result<Self> {
        match value {
            "NONE" => Ok(InterestRateOption::None),
            "MONTHLY" => Ok(InterestRateOption::Monthly),
            "YEARLY" => Ok(InterestRateOption::Yearly),
            other => Err(Error::invalid_input(format!(
                "Unknown interest rate option '{}'",
                other
            ))),
        }
    }
}

/// Domain model representing a saving goal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavingGoal {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub color: String,
    pub icon: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub monthly_payment: Decimal,
    pub interest_rate_option: InterestRateOption,
    /// Annual interest rate in percent
    pub interest_rate: Option<Decimal>,
    pub target_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl SavingGoal {
    pub fn validate(&self) -> Result<()> {
        validate_goal_name(&self.name)?;
        validate_appearance(&self.color, &self.icon)?;
        validate_amounts(self.target_amount, self.current_amount, self.monthly_payment)?;
        validate_interest(self.interest_rate_option, self.interest_rate)
    }
}

/// Input model for creating a new saving goal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSavingGoal {
    pub name: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub target_amount: Decimal,
    #[serde(default)]
    pub current_amount: Decimal,
    #[serde(default)]
    pub monthly_payment: Decimal,
    #[serde(default)]
    pub interest_rate_option: InterestRateOption,
    pub interest_rate: Option<Decimal>,
    pub target_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingGoalNameUpdate {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingGoalAmountsUpdate {
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub monthly_payment: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingGoalAppearanceUpdate {
    pub color: String,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingGoalInfoUpdate {
    pub target_date: Option<NaiveDate>,
    pub interest_rate_option: InterestRateOption,
    pub interest_rate: Option<Decimal>,
}

pub fn validate_goal_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_input("Saving goal name cannot be empty"));
    }
    if trimmed.chars().count() > GOAL_NAME_MAX_LEN {
        return Err(Error::invalid_input(format!(
            "Saving goal name cannot exceed {} characters",
            GOAL_NAME_MAX_LEN
        )));
    }
    Ok(())
}

pub fn validate_amounts(
    target_amount: Decimal,
    current_amount: Decimal,
    monthly_payment: Decimal,
) -> Result<()> {
    if target_amount <= Decimal::ZERO {
        return Err(Error::invalid_input("Target amount must be greater than zero"));
    }
    if current_amount.is_sign_negative() {
        return Err(Error::invalid_input("Current amount cannot be negative"));
    }
    if monthly_payment.is_sign_negative() {
        return Err(Error::invalid_input("Monthly payment cannot be negative"));
    }
    if [target_amount, current_amount, monthly_payment]
        .iter()
        .any(|amount| *amount > MAX_MONEY_AMOUNT)
    {
        return Err(Error::invalid_input(format!(
            "Amounts cannot exceed {}",
            MAX_MONEY_AMOUNT
        )));
    }
    Ok(())
}

pub fn validate_interest(option: InterestRateOption, rate: Option<Decimal>) -> Result<()> {
    match (option, rate) {
        (InterestRateOption::None, _) => Ok(()),
        (_, None) => Err(Error::invalid_input(
            "An interest rate is required when interest is enabled",
        )),
        (_, Some(rate)) if rate.is_sign_negative() || rate > Decimal::ONE_HUNDRED => Err(
            Error::invalid_input("Interest rate must be between 0 and 100 percent"),
        ),
        _ => Ok(()),
    }
}

pub fn validate_appearance(color: &str, icon: &str) -> Result<()> {
    let is_hex_color = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !is_hex_color {
        return Err(Error::invalid_input(format!(
            "Color '{}' must be in #RRGGBB format",
            color
        )));
    }
    if icon.trim().is_empty() || icon.len() > GOAL_ICON_MAX_LEN {
        return Err(Error::invalid_input(format!(
            "Icon must be between 1 and {} characters",
            GOAL_ICON_MAX_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_interest_rate_option_serialization() {
        assert_eq!(
            serde_json::to_string(&InterestRateOption::Monthly).unwrap(),
            "\"MONTHLY\""
        );
        assert_eq!(
            serde_json::from_str::<InterestRateOption>("\"YEARLY\"").unwrap(),
            InterestRateOption::Yearly
        );
        assert_eq!(
            InterestRateOption::from_db_str("NONE").unwrap(),
            InterestRateOption::None
        );
        assert!(InterestRateOption::from_db_str("WEEKLY").is_err());
    }

    #[test]
    fn test_validate_interest() {
        assert!(validate_interest(InterestRateOption::None, None).is_ok());
        assert!(validate_interest(InterestRateOption::Monthly, None).is_err());
        assert!(validate_interest(InterestRateOption::Yearly, Some(dec!(2.5))).is_ok());
        assert!(validate_interest(InterestRateOption::Yearly, Some(dec!(-1))).is_err());
        assert!(validate_interest(InterestRateOption::Monthly, Some(dec!(101))).is_err());
    }

    #[test]
    fn test_validate_amounts() {
        assert!(validate_amounts(dec!(100), dec!(0), dec!(0)).is_ok());
        assert!(validate_amounts(dec!(0), dec!(0), dec!(0)).is_err());
        assert!(validate_amounts(dec!(100), dec!(-1), dec!(0)).is_err());
        assert!(validate_amounts(dec!(100), dec!(0), dec!(-5)).is_err());
        assert!(validate_amounts(MAX_MONEY_AMOUNT, MAX_MONEY_AMOUNT, dec!(0)).is_ok());
        assert!(validate_amounts(dec!(79000000000000000000000000000), dec!(0), dec!(0)).is_err());
        assert!(validate_amounts(dec!(100), dec!(1000000000000000.01), dec!(0)).is_err());
        assert!(validate_amounts(dec!(100), dec!(0), dec!(2000000000000000)).is_err());
    }

    #[test]
    fn test_validate_appearance() {
        assert!(validate_appearance("#A1b2C3", "car").is_ok());
        assert!(validate_appearance("A1B2C3", "car").is_err());
        assert!(validate_appearance("#A1B2CZ", "car").is_err());
        assert!(validate_appearance("#A1B2C3", " ").is_err());
    }
}
