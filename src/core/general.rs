use serde::Serialize;

use super::deposit::lump_sum_growth;
use super::types::{CityType, Operation, round_to, round2};
use super::validation::{NumberField, Params};
use crate::error::{CalcError, CalcResult};

#[derive(Debug, Clone, Serialize)]
pub struct SimpleInterestReport {
    pub principal: f64,
    pub rate: f64,
    pub time: f64,
    pub simple_interest: f64,
    pub total_amount: f64,
}

pub fn simple_interest(params: Params<'_>) -> CalcResult<SimpleInterestReport> {
    let mut form = params.form();
    let principal = form.number(&NumberField::required("principal").min(0.0));
    let rate = form.number(&NumberField::required("rate").min(0.0));
    let time = form.number(&NumberField::required("time").min(0.0));
    form.finish()?;

    let interest = principal * rate / 100.0 * time;

    Ok(SimpleInterestReport {
        principal,
        rate,
        time,
        simple_interest: round2(interest),
        total_amount: round2(principal + interest),
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct CompoundInterestReport {
    pub principal: f64,
    pub rate: f64,
    pub time: f64,
    pub compounds_per_year: u32,
    pub compound_interest: f64,
    pub future_value: f64,
}

pub fn compound_interest(params: Params<'_>) -> CalcResult<CompoundInterestReport> {
    let mut form = params.form();
    let principal = form.number(&NumberField::required("principal").min(0.0));
    let rate = form.number(&NumberField::required("rate").min(0.0));
    let time = form.number(&NumberField::required("time").min(0.0));
    let per_year = form.count(&NumberField::required("compounds_per_year").min(1.0));
    form.finish()?;

    let n = f64::from(per_year);
    let future_value = lump_sum_growth(principal, rate / 100.0 / n, n * time);

    Ok(CompoundInterestReport {
        principal,
        rate,
        time,
        compounds_per_year: per_year,
        compound_interest: round2(future_value - principal),
        future_value: round2(future_value),
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct InflationReport {
    pub current_amount: f64,
    pub inflation_rate: f64,
    pub years: f64,
    /// Today's amount expressed in money of `years` from now.
    pub future_value: f64,
    /// What today's purchases will cost after `years` of inflation.
    pub future_cost: f64,
}

pub fn inflation(params: Params<'_>) -> CalcResult<InflationReport> {
    let mut form = params.form();
    let amount = form.number(&NumberField::required("current_amount").min(0.0));
    let rate = form.number(&NumberField::required("inflation_rate").min(0.0));
    let years = form.number(&NumberField::required("years").min(0.0));
    form.finish()?;

    let factor = (1.0 + rate / 100.0).powf(years);

    Ok(InflationReport {
        current_amount: amount,
        inflation_rate: rate,
        years,
        future_value: round2(amount / factor),
        future_cost: round2(amount * factor),
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct CagrReport {
    pub initial_value: f64,
    pub final_value: f64,
    pub years: f64,
    pub cagr: String,
    pub cagr_percent: f64,
}

pub fn cagr(params: Params<'_>) -> CalcResult<CagrReport> {
    let mut form = params.form();
    let initial = form.number(&NumberField::required("initial_value").min(0.0));
    let final_value = form.number(&NumberField::required("final_value").min(0.0));
    let years = form.number(&NumberField::required("years").min(1.0));
    form.finish()?;

    if initial == 0.0 {
        return Err(CalcError::domain(
            "CAGR",
            "initial_value must be greater than 0",
        ));
    }
    let growth = ((final_value / initial).powf(1.0 / years) - 1.0) * 100.0;
    let cagr_percent = round2(growth);

    Ok(CagrReport {
        initial_value: round2(initial),
        final_value: round2(final_value),
        years,
        cagr: format!("{cagr_percent}%"),
        cagr_percent,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct ApyReport {
    pub principal: f64,
    pub interest_rate: f64,
    pub compounds_per_year: u32,
    pub apy: f64,
}

/// Annual percentage yield, reported to four decimals.
pub fn apy(params: Params<'_>) -> CalcResult<ApyReport> {
    let mut form = params.form();
    let principal = form.number(&NumberField::required("principal").min(1.0));
    let rate = form.number(&NumberField::required("interest_rate").min(0.0).max(100.0));
    let per_year = form.count(&NumberField::required("compounds_per_year").min(1.0));
    form.finish()?;

    let n = f64::from(per_year);
    let yield_percent = (lump_sum_growth(1.0, rate / 100.0 / n, n) - 1.0) * 100.0;

    Ok(ApyReport {
        principal,
        interest_rate: rate,
        compounds_per_year: per_year,
        apy: round_to(yield_percent, 4),
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct HraReport {
    pub basic_salary: f64,
    pub rent: f64,
    pub other_allowances: f64,
    pub city_type: CityType,
    pub hra: f64,
}

pub fn hra_share(city: CityType) -> f64 {
    match city {
        CityType::Metro => 0.50,
        CityType::NonMetro => 0.40,
    }
}

pub fn house_rent_allowance(params: Params<'_>) -> CalcResult<HraReport> {
    let mut form = params.form();
    let basic_salary = form.number(&NumberField::required("basic_salary").min(0.0));
    let rent = form.number(&NumberField::required("rent").min(0.0));
    let other_allowances = form.number(&NumberField::required("other_allowances").min(0.0));
    let city_type = form.choice::<CityType>("city_type", None);
    form.finish()?;

    Ok(HraReport {
        basic_salary,
        rent,
        other_allowances,
        city_type,
        hra: round2(rent.min(hra_share(city_type) * basic_salary)),
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct GstReport {
    pub original_amount: f64,
    pub gst_rate: f64,
    pub gst_amount: f64,
    pub total_amount_including_gst: f64,
}

pub fn gst(params: Params<'_>) -> CalcResult<GstReport> {
    let mut form = params.form();
    let amount = form.number(&NumberField::required("amount").min(0.0));
    let rate = form.number(&NumberField::required("gst_rate").min(0.0));
    form.finish()?;

    let tax = amount * rate / 100.0;

    Ok(GstReport {
        original_amount: round2(amount),
        gst_rate: rate,
        gst_amount: round2(tax),
        total_amount_including_gst: round2(amount + tax),
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct ArithmeticReport {
    pub num1: f64,
    pub num2: f64,
    pub operation: Operation,
    pub result: f64,
}

pub fn arithmetic(params: Params<'_>) -> CalcResult<ArithmeticReport> {
    let mut form = params.form();
    let num1 = form.number(&NumberField::required("num1"));
    let num2 = form.number(&NumberField::required("num2"));
    let operation = form.choice::<Operation>("operation", None);
    form.finish()?;

    let result = match operation {
        Operation::Add => num1 + num2,
        Operation::Subtract => num1 - num2,
        Operation::Multiply => num1 * num2,
        Operation::Divide if num2 == 0.0 => {
            return Err(CalcError::domain("division", "num2 must not be zero"));
        }
        Operation::Divide => num1 / num2,
    };

    Ok(ArithmeticReport {
        num1,
        num2,
        operation,
        result,
    })
}
