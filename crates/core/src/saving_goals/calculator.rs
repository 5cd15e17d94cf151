//! Savings calculator.
//!
//! Balances evolve month by month: interest is credited on the opening
//! balance of a period, then the monthly payment is added at the end of it.
//! `MONTHLY` interest credits `rate / 12` every month while `YEARLY` credits
//! the full annual rate on every twelfth month. Interest is rounded to cents
//! each period so that simulated balances match what a bank statement shows.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::saving_goals_model::{InterestRateOption, SavingGoal};
use crate::constants::{MAX_PROJECTION_MONTHS, MONEY_DECIMAL_PLACES};
use crate::utils::time_utils::{add_months, whole_months_between};

const CENT: Decimal = dec!(0.01);
const MONTHS_PER_YEAR: Decimal = dec!(12);
// Upper bound on cent-by-cent corrections after the analytic estimate.
const MAX_PAYMENT_ADJUSTMENTS: usize = 100;

/// The inputs the calculator needs from a saving goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsPlan {
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub monthly_payment: Decimal,
    #[serde(default)]
    pub interest_rate_option: InterestRateOption,
    pub interest_rate: Option<Decimal>,
    pub target_date: Option<NaiveDate>,
}

impl From<&SavingGoal> for SavingsPlan {
    fn from(goal: &SavingGoal) -> Self {
        Self {
            target_amount: goal.target_amount,
            current_amount: goal.current_amount,
            monthly_payment: goal.monthly_payment,
            interest_rate_option: goal.interest_rate_option,
            interest_rate: goal.interest_rate,
            target_date: goal.target_date,
        }
    }
}

impl SavingsPlan {
    fn with_payment(&self, monthly_payment: Decimal) -> Self {
        Self {
            monthly_payment,
            ..self.clone()
        }
    }

    /// Interest option actually in effect: an enabled option without a
    /// positive rate behaves like `NONE`.
    fn effective_option(&self) -> InterestRateOption {
        match self.interest_rate {
            Some(rate) if rate > Decimal::ZERO => self.interest_rate_option,
            _ => InterestRateOption::None,
        }
    }

    fn annual_rate(&self) -> Decimal {
        self.interest_rate.unwrap_or_default() / Decimal::ONE_HUNDRED
    }

    fn remaining(&self) -> Decimal {
        self.target_amount - self.current_amount
    }
}

/// One simulated month of a projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionPeriod {
    /// 1-based month index counted from the projection start.
    pub month: u32,
    pub date: NaiveDate,
    pub payment: Decimal,
    pub interest: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsProjection {
    pub start_date: NaiveDate,
    pub periods: Vec<ProjectionPeriod>,
    /// `None` when the target cannot be reached within the projection horizon.
    pub months_to_target: Option<u32>,
    pub target_reached_date: Option<NaiveDate>,
    pub total_payments: Decimal,
    pub total_interest: Decimal,
    pub final_balance: Decimal,
    pub months_until_target_date: Option<u32>,
    /// Payment needed to reach the target by its target date.
    pub required_monthly_payment: Option<Decimal>,
    pub on_track: Option<bool>,
}

pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

fn ceil_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::AwayFromZero)
}

/// Interest credited in `month` (1-based) on `opening_balance`.
/// Returns `None` on arithmetic overflow.
fn interest_for_month(plan: &SavingsPlan, opening_balance: Decimal, month: u32) -> Option<Decimal> {
    let rate = match plan.effective_option() {
        InterestRateOption::None => return Some(Decimal::ZERO),
        InterestRateOption::Monthly => plan.annual_rate() / MONTHS_PER_YEAR,
        InterestRateOption::Yearly if month % 12 == 0 => plan.annual_rate(),
        InterestRateOption::Yearly => return Some(Decimal::ZERO),
    };
    opening_balance.checked_mul(rate).map(round_money)
}

/// Balance at the end of `month` given the balance it opened with.
fn step(plan: &SavingsPlan, opening_balance: Decimal, month: u32) -> Option<(Decimal, Decimal)> {
    let interest = interest_for_month(plan, opening_balance, month)?;
    let balance = opening_balance
        .checked_add(interest)?
        .checked_add(plan.monthly_payment)?;
    Some((interest, balance))
}

/// Balance after `months` full periods, `None` on overflow.
fn simulate_balance(plan: &SavingsPlan, months: u32) -> Option<Decimal> {
    let mut balance = plan.current_amount;
    for month in 1..=months {
        balance = step(plan, balance, month)?.1;
    }
    Some(balance)
}

/// Number of monthly periods until the balance reaches the target.
///
/// Returns `Some(0)` when the target is already reached and `None` when it
/// cannot be reached within [`MAX_PROJECTION_MONTHS`].
pub fn months_to_target(plan: &SavingsPlan) -> Option<u32> {
    let remaining = plan.remaining();
    if remaining <= Decimal::ZERO {
        return Some(0);
    }

    if plan.effective_option() == InterestRateOption::None {
        if plan.monthly_payment <= Decimal::ZERO {
            return None;
        }
        return (remaining / plan.monthly_payment)
            .ceil()
            .to_u32()
            .filter(|months| *months <= MAX_PROJECTION_MONTHS);
    }

    let mut balance = plan.current_amount;
    for month in 1..=MAX_PROJECTION_MONTHS {
        balance = step(plan, balance, month)?.1;
        if balance >= plan.target_amount {
            return Some(month);
        }
    }
    None
}

/// Whole months from `today` until `target_date`, 0 if it has passed.
pub fn months_until(today: NaiveDate, target_date: NaiveDate) -> u32 {
    whole_months_between(today, target_date)
}

/// Smallest monthly payment (in cents) that reaches the target after
/// `months` periods, taking the plan's interest into account.
///
/// With `months == 0` the whole remaining amount is due at once.
pub fn required_monthly_payment(plan: &SavingsPlan, months: u32) -> Decimal {
    let remaining = plan.remaining();
    if remaining <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    if months == 0 {
        return ceil_money(remaining);
    }

    let estimate = match plan.effective_option() {
        InterestRateOption::None => remaining / Decimal::from(months),
        InterestRateOption::Monthly => annuity_payment(plan, months)
            .unwrap_or_else(|| affine_payment(plan, months)),
        InterestRateOption::Yearly => affine_payment(plan, months),
    };

    let mut payment = ceil_money(estimate.max(Decimal::ZERO));
    // Per-period rounding can leave the analytic result a cent short.
    for _ in 0..MAX_PAYMENT_ADJUSTMENTS {
        match simulate_balance(&plan.with_payment(payment), months) {
            Some(balance) if balance < plan.target_amount => payment += CENT,
            _ => break,
        }
    }
    payment
}

/// Closed-form payment of an ordinary annuity with monthly compounding:
/// `P = (T - C·g) · r / (g - 1)` where `g = (1 + r)^n`.
fn annuity_payment(plan: &SavingsPlan, months: u32) -> Option<Decimal> {
    let rate = plan.annual_rate() / MONTHS_PER_YEAR;
    let growth = (Decimal::ONE + rate).checked_powi(i64::from(months))?;
    let future_current = plan.current_amount.checked_mul(growth)?;
    let divisor = growth - Decimal::ONE;
    if divisor <= Decimal::ZERO {
        return None;
    }
    (plan.target_amount - future_current)
        .checked_mul(rate)?
        .checked_div(divisor)
}

/// The final balance is affine in the payment, `B(P) = A + P·B1`, so two
/// simulations are enough to solve for the payment.
fn affine_payment(plan: &SavingsPlan, months: u32) -> Decimal {
    let Some(base) = simulate_balance(&plan.with_payment(Decimal::ZERO), months) else {
        return Decimal::ZERO;
    };
    if base >= plan.target_amount {
        return Decimal::ZERO;
    }
    let Some(with_unit) = simulate_balance(&plan.with_payment(Decimal::ONE), months) else {
        return CENT;
    };
    let per_unit = with_unit - base;
    if per_unit <= Decimal::ZERO {
        return plan.remaining();
    }
    (plan.target_amount - base) / per_unit
}

/// Month-by-month projection starting at `today`.
///
/// The projection runs until the target is reached. When the target is out
/// of reach it runs until the target date, capped at
/// [`MAX_PROJECTION_MONTHS`], or not at all when there is none. It ends early
/// if the balance overflows.
/// The last payment is trimmed to what is still missing.
pub fn project(plan: &SavingsPlan, today: NaiveDate) -> SavingsProjection {
    let months_to_target = months_to_target(plan);
    let months_until_target_date = plan.target_date.map(|date| months_until(today, date));

    let horizon = match (months_to_target, months_until_target_date) {
        (Some(months), _) => months,
        (None, Some(months)) => months.min(MAX_PROJECTION_MONTHS),
        (None, None) => 0,
    };

    let mut periods = Vec::with_capacity(horizon as usize);
    let mut balance = plan.current_amount;
    let mut total_payments = Decimal::ZERO;
    let mut total_interest = Decimal::ZERO;

    for month in 1..=horizon {
        let Some(interest) = interest_for_month(plan, balance, month) else {
            break;
        };
        let payment = if months_to_target.is_some() {
            let missing = (plan.target_amount - balance)
                .checked_sub(interest)
                .unwrap_or(Decimal::ZERO)
                .max(Decimal::ZERO);
            plan.monthly_payment.min(missing)
        } else {
            plan.monthly_payment
        };
        // Stop where the balance or the totals no longer fit in a Decimal.
        let Some(next_balance) = balance
            .checked_add(interest)
            .and_then(|b| b.checked_add(payment))
        else {
            break;
        };
        let (Some(next_payments), Some(next_interest)) = (
            total_payments.checked_add(payment),
            total_interest.checked_add(interest),
        ) else {
            break;
        };
        balance = next_balance;
        total_payments = next_payments;
        total_interest = next_interest;
        periods.push(ProjectionPeriod {
            month,
            date: add_months(today, month),
            payment,
            interest,
            balance,
        });
    }

    let required_monthly_payment =
        months_until_target_date.map(|months| required_monthly_payment(plan, months));
    let on_track = months_until_target_date.map(|deadline| match months_to_target {
        Some(months) => months <= deadline,
        None => false,
    });

    SavingsProjection {
        start_date: today,
        periods,
        months_to_target,
        target_reached_date: months_to_target.map(|months| add_months(today, months)),
        total_payments,
        total_interest,
        final_balance: balance,
        months_until_target_date,
        required_monthly_payment,
        on_track,
    }
}
