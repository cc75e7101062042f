use serde::Serialize;

use super::deposit::lump_sum_growth;
use super::types::{MAX_TERM_YEARS, round2};
use super::validation::{NumberField, Params};
use crate::error::CalcResult;

const PENSION_AGE: u32 = 60;
const SGB_COUPON_RATE: f64 = 0.025;

#[derive(Debug, Clone, Serialize)]
pub struct GratuityReport {
    pub last_drawn_salary: f64,
    pub years_of_service: u32,
    pub gratuity_amount: f64,
}

/// `15/26 · salary · years`, payable after five years of service.
pub fn gratuity(params: Params<'_>) -> CalcResult<GratuityReport> {
    let mut form = params.form();
    let salary = form.number(&NumberField::required("last_drawn_salary").min(0.0));
    let years = form.count(
        &NumberField::required("years_of_service")
            .min(5.0)
            .max(MAX_TERM_YEARS),
    );
    form.finish()?;

    Ok(GratuityReport {
        last_drawn_salary: salary,
        years_of_service: years,
        gratuity_amount: round2(salary * f64::from(years) * 15.0 / 26.0),
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct PensionReport {
    pub monthly_contribution: f64,
    pub contribution_months: u32,
    pub estimated_pension: f64,
}

/// Atal Pension Yojana estimate: contributions accumulate without growth.
pub fn atal_pension(params: Params<'_>) -> CalcResult<PensionReport> {
    let mut form = params.form();
    let contribution = form.number(&NumberField::required("monthly_contribution").min(0.0));
    let years = form.count(&NumberField::required("years").min(1.0).max(MAX_TERM_YEARS));
    form.finish()?;

    let months = years * 12;

    Ok(PensionReport {
        monthly_contribution: contribution,
        contribution_months: months,
        estimated_pension: round2(contribution * f64::from(months)),
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct ShramYogiReport {
    pub monthly_contribution: f64,
    pub age_of_entry: u32,
    pub contribution_years: u32,
    pub total_contribution: f64,
}

pub fn shram_yogi_maandhan(params: Params<'_>) -> CalcResult<ShramYogiReport> {
    let mut form = params.form();
    let contribution = form.number(&NumberField::required("monthly_contribution").min(0.0));
    let age = form.count(&NumberField::required("age_of_entry").min(18.0).max(40.0));
    form.finish()?;

    let years = PENSION_AGE - age;

    Ok(ShramYogiReport {
        monthly_contribution: contribution,
        age_of_entry: age,
        contribution_years: years,
        total_contribution: round2(contribution * f64::from(years * 12)),
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct FloatingRateBondReport {
    pub principal: f64,
    pub interest_rate: f64,
    pub period: u32,
    pub total_interest: f64,
    pub total_amount: f64,
}

pub fn floating_rate_bond(params: Params<'_>) -> CalcResult<FloatingRateBondReport> {
    let mut form = params.form();
    let principal = form.number(&NumberField::required("principal").min(1000.0));
    let rate = form.number(&NumberField::required("interest_rate").min(0.0));
    let period = form.count(&NumberField::required("period").min(1.0).max(MAX_TERM_YEARS));
    form.finish()?;

    let interest = principal * rate / 100.0 * f64::from(period);

    Ok(FloatingRateBondReport {
        principal,
        interest_rate: rate,
        period,
        total_interest: round2(interest),
        total_amount: round2(principal + interest),
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct GoldBondReport {
    pub investment_amount: f64,
    pub gold_price_increase: f64,
    pub period: u32,
    pub total_value: f64,
    pub interest_income: f64,
    pub final_value: f64,
}

/// Gold-linked capital growth plus a fixed simple coupon on the issue amount.
pub fn sovereign_gold_bond(params: Params<'_>) -> CalcResult<GoldBondReport> {
    let mut form = params.form();
    let investment = form.number(&NumberField::required("investment_amount").min(1000.0));
    let growth = form.number(&NumberField::required("gold_price_increase").min(0.0));
    let period = form.count(&NumberField::required("period").min(1.0).max(MAX_TERM_YEARS));
    form.finish()?;

    let years = f64::from(period);
    let total_value = lump_sum_growth(investment, growth / 100.0, years);
    let interest_income = investment * SGB_COUPON_RATE * years;

    Ok(GoldBondReport {
        investment_amount: investment,
        gold_price_increase: growth,
        period,
        total_value: round2(total_value),
        interest_income: round2(interest_income),
        final_value: round2(total_value + interest_income),
    })
}

/// Premium and bonus rules for an endowment-style postal policy.
#[derive(Debug, Clone, Copy)]
pub struct PolicyTerms {
    sum_assured: NumberField,
    /// Entry ages below this pay the lower premium rate.
    younger_than: u32,
    younger_rate: f64,
    older_rate: f64,
    annual_bonus_rate: f64,
}

pub const POSTAL_LIFE_INSURANCE: PolicyTerms = PolicyTerms {
    sum_assured: NumberField::required("sum_assured").min(10_000.0),
    younger_than: 35,
    younger_rate: 0.02,
    older_rate: 0.03,
    annual_bonus_rate: 0.05,
};

pub const RURAL_POSTAL_LIFE_INSURANCE: PolicyTerms = PolicyTerms {
    sum_assured: NumberField::required("sum_assured").min(5_000.0),
    younger_than: 30,
    younger_rate: 0.015,
    older_rate: 0.025,
    annual_bonus_rate: 0.04,
};

#[derive(Debug, Clone, Serialize)]
pub struct PolicyReport {
    pub sum_assured: f64,
    pub age: u32,
    pub term: u32,
    pub premium: f64,
    pub maturity_amount: f64,
}

pub fn postal_policy(terms: &PolicyTerms, params: Params<'_>) -> CalcResult<PolicyReport> {
    let mut form = params.form();
    let sum_assured = form.number(&terms.sum_assured);
    let age = form.count(&NumberField::required("age").min(18.0));
    let term = form.count(&NumberField::required("term").min(5.0).max(MAX_TERM_YEARS));
    form.finish()?;

    let premium_rate = if age < terms.younger_than {
        terms.younger_rate
    } else {
        terms.older_rate
    };
    let bonus = sum_assured * terms.annual_bonus_rate * f64::from(term);

    Ok(PolicyReport {
        sum_assured,
        age,
        term,
        premium: round2(sum_assured * premium_rate),
        maturity_amount: round2(sum_assured + bonus),
    })
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FlatCover {
    pub scheme: &'static str,
    pub min_age: u32,
    pub max_age: u32,
    pub sum_assured: f64,
    pub annual_premium: f64,
}

pub const PMJJBY: FlatCover = FlatCover {
    scheme: "PMJJBY",
    min_age: 18,
    max_age: 50,
    sum_assured: 200_000.0,
    annual_premium: 436.0,
};

pub const PMSBY: FlatCover = FlatCover {
    scheme: "PMSBY",
    min_age: 18,
    max_age: 70,
    sum_assured: 200_000.0,
    annual_premium: 20.0,
};

pub static INSURANCE_PREMIUMS: [FlatCover; 2] = [PMJJBY, PMSBY];

#[derive(Debug, Clone, Serialize)]
pub struct CoverReport {
    pub age: u32,
    pub sum_assured: f64,
    pub annual_premium: f64,
}

pub fn flat_cover(cover: &FlatCover, params: Params<'_>) -> CalcResult<CoverReport> {
    let mut form = params.form();
    let age = form.count(
        &NumberField::required("age")
            .min(f64::from(cover.min_age))
            .max(f64::from(cover.max_age)),
    );
    form.finish()?;

    Ok(CoverReport {
        age,
        sum_assured: cover.sum_assured,
        annual_premium: cover.annual_premium,
    })
}
