use serde::Serialize;
use tracing::debug;

use super::types::round2;
use super::validation::{NumberField, Params};
use crate::error::CalcResult;

pub const MAX_WITHDRAWAL_MONTHS: u32 = 1200;

const INITIAL_INVESTMENT: NumberField = NumberField::required("initial_investment").min(0.0);
const MONTHLY_WITHDRAWAL: NumberField = NumberField::required("monthly_withdrawal").min(0.0);
const ANNUAL_RETURN_RATE: NumberField = NumberField::required("annual_return_rate").min(0.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Depletion {
    pub months: u32,
    pub depleted: bool,
    pub total_withdrawn: f64,
}

/// The final withdrawal is whatever the balance could still cover.
pub fn simulate(initial: f64, withdrawal: f64, monthly_rate: f64) -> Depletion {
    let mut balance = initial;
    let mut months = 0;
    let mut total_withdrawn = 0.0;

    while balance > 0.0 && months < MAX_WITHDRAWAL_MONTHS {
        let grown = balance * (1.0 + monthly_rate);
        total_withdrawn += withdrawal.min(grown);
        balance = grown - withdrawal;
        months += 1;
    }

    Depletion {
        months,
        depleted: balance <= 0.0,
        total_withdrawn,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WithdrawalReport {
    pub investment_lasted: String,
    pub years: u32,
    pub months: u32,
    pub total_months: u32,
    pub depleted: bool,
    pub total_withdrawn: f64,
}

pub fn systematic_withdrawal(params: Params<'_>) -> CalcResult<WithdrawalReport> {
    let mut form = params.form();
    let initial = form.number(&INITIAL_INVESTMENT);
    let withdrawal = form.number(&MONTHLY_WITHDRAWAL);
    let annual_rate = form.number(&ANNUAL_RETURN_RATE);
    form.finish()?;

    let outcome = simulate(initial, withdrawal, annual_rate / 100.0 / 12.0);
    if !outcome.depleted {
        debug!(
            initial,
            withdrawal,
            annual_rate,
            cap = MAX_WITHDRAWAL_MONTHS,
            "withdrawal plan outlasts the simulation cap"
        );
    }

    let years = outcome.months / 12;
    let months = outcome.months % 12;
    let investment_lasted = if outcome.depleted {
        format!("{years} years and {months} months")
    } else {
        format!("more than {} years", MAX_WITHDRAWAL_MONTHS / 12)
    };

    Ok(WithdrawalReport {
        investment_lasted,
        years,
        months,
        total_months: outcome.months,
        depleted: outcome.depleted,
        total_withdrawn: round2(outcome.total_withdrawn),
    })
}
