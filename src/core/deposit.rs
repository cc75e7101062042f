use serde::Serialize;

use super::reference::{post_office_rate, time_deposit_rate};
use super::types::{Frequency, InvestmentType, MAX_TERM_YEARS, round2, term_periods};
use super::validation::{Form, NumberField, Params};
use crate::error::{CalcError, CalcResult};

const MONTHS_PER_YEAR: u32 = 12;

pub fn lump_sum_growth(principal: f64, period_rate: f64, periods: f64) -> f64 {
    principal * (1.0 + period_rate).powf(periods)
}

/// Future value of level contributions made at the start of each period.
pub fn annuity_due_future_value(contribution: f64, period_rate: f64, periods: u32) -> f64 {
    if period_rate == 0.0 {
        return contribution * f64::from(periods);
    }
    let growth = (1.0 + period_rate).powf(f64::from(periods));
    contribution * ((growth - 1.0) / period_rate) * (1.0 + period_rate)
}

pub fn series_future_value(contributions: &[f64], period_rate: f64) -> f64 {
    let count = contributions.len();
    contributions
        .iter()
        .enumerate()
        .map(|(index, amount)| amount * (1.0 + period_rate).powf((count - index) as f64))
        .sum()
}

/// Monthly installments, each compounded at `annual_rate/k` for its remaining
/// `k·m/12` compounding periods (`m` = months left including its own).
pub fn recurring_deposit_value(
    installment: f64,
    annual_rate_percent: f64,
    compounding: Frequency,
    months: u32,
) -> f64 {
    let per_year = f64::from(compounding.periods_per_year());
    let period_rate = annual_rate_percent / 100.0 / per_year;
    (1..=months)
        .map(|remaining| {
            let periods = per_year * f64::from(remaining) / f64::from(MONTHS_PER_YEAR);
            lump_sum_growth(installment, period_rate, periods)
        })
        .sum()
}

#[derive(Debug, Clone, Copy)]
enum RateDefault {
    None,
    PostOffice(&'static str),
    TimeDeposit,
}

#[derive(Debug, Clone, Copy)]
enum Term {
    Field(NumberField),
    Fixed(f64),
}

#[derive(Debug, Clone, Copy)]
enum Compounding {
    Fixed(Frequency),
    Selectable(&'static str, Frequency),
}

fn read_term(form: &mut Form<'_>, term: Term) -> f64 {
    match term {
        Term::Field(field) => form.number(&field),
        Term::Fixed(years) => years,
    }
}

fn read_rate(form: &mut Form<'_>, field: NumberField, default: RateDefault, term_years: f64) -> f64 {
    let fallback = match default {
        RateDefault::None => None,
        RateDefault::PostOffice(product) => post_office_rate(product),
        RateDefault::TimeDeposit => time_deposit_rate(term_years),
    };
    match fallback {
        Some(rate) => form.number(&field.with_default(rate)),
        None => form.number(&field),
    }
}

fn read_compounding(form: &mut Form<'_>, compounding: Compounding) -> Frequency {
    match compounding {
        Compounding::Fixed(frequency) => frequency,
        Compounding::Selectable(name, default) => form.choice(name, Some(default)),
    }
}

// ---------------------------------------------------------------------------
// Lump sums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct LumpSumPlan {
    principal: NumberField,
    rate: NumberField,
    rate_default: RateDefault,
    term: Term,
    compounding: Compounding,
}

pub const CUMULATIVE_FIXED_DEPOSIT: LumpSumPlan = LumpSumPlan {
    principal: NumberField::required("principal").min(0.0),
    rate: NumberField::required("annual_interest_rate").min(0.0),
    rate_default: RateDefault::None,
    term: Term::Field(
        NumberField::required("term_in_years")
            .above(0.0)
            .max(MAX_TERM_YEARS),
    ),
    compounding: Compounding::Selectable("compounding_frequency", Frequency::Quarterly),
};

pub const TIME_DEPOSIT: LumpSumPlan = LumpSumPlan {
    principal: NumberField::required("principal_amount").min(0.0),
    rate: NumberField::required("annual_interest_rate").min(0.0),
    rate_default: RateDefault::TimeDeposit,
    term: Term::Field(
        NumberField::required("tenure")
            .integer()
            .min(1.0)
            .max(MAX_TERM_YEARS),
    ),
    compounding: Compounding::Fixed(Frequency::Annually),
};

pub const NATIONAL_SAVINGS_CERTIFICATE: LumpSumPlan = LumpSumPlan {
    principal: NumberField::required("principal_amount").min(0.0),
    rate: NumberField::required("annual_interest_rate").min(0.0),
    rate_default: RateDefault::PostOffice("NSC"),
    term: Term::Fixed(5.0),
    compounding: Compounding::Fixed(Frequency::Annually),
};

pub const MAHILA_SAMMAN: LumpSumPlan = LumpSumPlan {
    principal: NumberField::required("principal_amount").above(0.0),
    rate: NumberField::required("annual_interest_rate").min(0.0),
    rate_default: RateDefault::PostOffice("MSSC"),
    term: Term::Fixed(2.0),
    compounding: Compounding::Fixed(Frequency::Quarterly),
};

pub const LUMPSUM: LumpSumPlan = LumpSumPlan {
    principal: NumberField::required("initial_investment").min(1.0),
    rate: NumberField::required("annual_return_rate").min(0.0),
    rate_default: RateDefault::None,
    term: Term::Field(
        NumberField::required("investment_duration_years")
            .integer()
            .min(1.0)
            .max(MAX_TERM_YEARS),
    ),
    compounding: Compounding::Fixed(Frequency::Annually),
};

#[derive(Debug, Clone, Serialize)]
pub struct LumpSumReport {
    pub principal: f64,
    pub annual_interest_rate: f64,
    pub term_in_years: f64,
    pub compounding_frequency: Frequency,
    pub total_interest: f64,
    pub maturity_amount: f64,
}

pub fn lump_sum(plan: &LumpSumPlan, params: Params<'_>) -> CalcResult<LumpSumReport> {
    let mut form = params.form();
    let principal = form.number(&plan.principal);
    let term_years = read_term(&mut form, plan.term);
    let annual_rate = read_rate(&mut form, plan.rate, plan.rate_default, term_years);
    let compounding = read_compounding(&mut form, plan.compounding);
    form.finish()?;

    let per_year = f64::from(compounding.periods_per_year());
    let maturity = lump_sum_growth(principal, annual_rate / 100.0 / per_year, term_years * per_year);

    Ok(LumpSumReport {
        principal,
        annual_interest_rate: annual_rate,
        term_in_years: term_years,
        compounding_frequency: compounding,
        total_interest: round2(maturity - principal),
        maturity_amount: round2(maturity),
    })
}

// ---------------------------------------------------------------------------
// Level contributions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct AnnuityPlan {
    contribution: NumberField,
    rate: NumberField,
    years: NumberField,
    frequency: Frequency,
}

pub const PPF_FIXED: AnnuityPlan = AnnuityPlan {
    contribution: NumberField::required("annual_contribution").min(0.0),
    rate: NumberField::required("annual_interest_rate").min(0.0),
    years: NumberField::required("term_in_years").integer().min(1.0).max(MAX_TERM_YEARS),
    frequency: Frequency::Annually,
};

pub const SUKANYA_SAMRIDDHI: AnnuityPlan = AnnuityPlan {
    contribution: NumberField::required("annual_contribution").min(0.0),
    rate: NumberField::required("annual_interest_rate").min(0.0),
    years: NumberField::optional("term_in_years", 21.0).integer().min(1.0).max(MAX_TERM_YEARS),
    frequency: Frequency::Annually,
};

pub const SIP: AnnuityPlan = AnnuityPlan {
    contribution: NumberField::required("monthly_investment").min(0.0),
    rate: NumberField::required("annual_return_rate").min(0.0),
    years: NumberField::required("years").integer().min(1.0).max(MAX_TERM_YEARS),
    frequency: Frequency::Monthly,
};

pub const ELSS: AnnuityPlan = SIP;

pub const NPS: AnnuityPlan = AnnuityPlan {
    contribution: NumberField::required("monthly_contribution").min(0.0),
    rate: NumberField::required("annual_return_rate").min(0.0),
    years: NumberField::required("years").integer().min(1.0).max(MAX_TERM_YEARS),
    frequency: Frequency::Monthly,
};

pub const EPF: AnnuityPlan = AnnuityPlan {
    contribution: NumberField::required("monthly_contribution").min(0.0),
    rate: NumberField::required("annual_interest_rate").min(0.0),
    years: NumberField::required("years").integer().min(1.0).max(MAX_TERM_YEARS),
    frequency: Frequency::Monthly,
};

#[derive(Debug, Clone, Serialize)]
pub struct AnnuityReport {
    pub contribution: f64,
    pub contribution_frequency: Frequency,
    pub annual_interest_rate: f64,
    pub term_in_years: u32,
    pub total_deposits: f64,
    pub total_interest: f64,
    pub maturity_amount: f64,
}

pub fn annuity(plan: &AnnuityPlan, params: Params<'_>) -> CalcResult<AnnuityReport> {
    let mut form = params.form();
    let contribution = form.number(&plan.contribution);
    let annual_rate = form.number(&plan.rate);
    let years = form.count(&plan.years);
    form.finish()?;

    let per_year = plan.frequency.periods_per_year();
    let periods = years * per_year;
    let maturity =
        annuity_due_future_value(contribution, annual_rate / 100.0 / f64::from(per_year), periods);
    let deposits = contribution * f64::from(periods);

    Ok(AnnuityReport {
        contribution,
        contribution_frequency: plan.frequency,
        annual_interest_rate: annual_rate,
        term_in_years: years,
        total_deposits: round2(deposits),
        total_interest: round2(maturity - deposits),
        maturity_amount: round2(maturity),
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct VariableContributionReport {
    pub contributions: Vec<f64>,
    pub annual_interest_rate: f64,
    pub term_in_years: usize,
    pub total_deposits: f64,
    pub total_interest: f64,
    pub maturity_amount: f64,
}

pub fn ppf_variable(params: Params<'_>) -> CalcResult<VariableContributionReport> {
    let mut form = params.form();
    let contributions = form.number_list("contributions");
    let annual_rate = form.number(&NumberField::required("annual_interest_rate").min(0.0));
    if contributions.iter().any(|amount| *amount < 0.0) {
        form.add_violation("contributions", "must not contain negative amounts");
    }
    form.finish()?;

    let maturity = series_future_value(&contributions, annual_rate / 100.0);
    let deposits: f64 = contributions.iter().sum();

    Ok(VariableContributionReport {
        term_in_years: contributions.len(),
        contributions,
        annual_interest_rate: annual_rate,
        total_deposits: round2(deposits),
        total_interest: round2(maturity - deposits),
        maturity_amount: round2(maturity),
    })
}

// ---------------------------------------------------------------------------
// Recurring deposits
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct RecurringPlan {
    installment: NumberField,
    term: NumberField,
    rate_default: RateDefault,
}

pub const BANK_RECURRING_DEPOSIT: RecurringPlan = RecurringPlan {
    installment: NumberField::required("monthly_installment").min(0.0),
    term: NumberField::required("term_in_years")
        .above(0.0)
        .max(MAX_TERM_YEARS),
    rate_default: RateDefault::None,
};

pub const POST_OFFICE_RECURRING_DEPOSIT: RecurringPlan = RecurringPlan {
    installment: NumberField::required("monthly_deposit").min(0.0),
    term: NumberField::optional("tenure", 5.0)
        .above(0.0)
        .max(MAX_TERM_YEARS),
    rate_default: RateDefault::PostOffice("RD"),
};

#[derive(Debug, Clone, Serialize)]
pub struct RecurringDepositReport {
    pub monthly_installment: f64,
    pub annual_interest_rate: f64,
    pub term_in_years: f64,
    pub compounding_frequency: Frequency,
    pub installments: u32,
    pub total_deposits: f64,
    pub total_interest: f64,
    pub maturity_amount: f64,
}

pub fn recurring_deposit(
    plan: &RecurringPlan,
    params: Params<'_>,
) -> CalcResult<RecurringDepositReport> {
    let mut form = params.form();
    let installment = form.number(&plan.installment);
    let term_years = form.number(&plan.term);
    let annual_rate = read_rate(
        &mut form,
        NumberField::required("annual_interest_rate").min(0.0),
        plan.rate_default,
        term_years,
    );
    let compounding = form.choice("compounding_frequency", Some(Frequency::Quarterly));
    form.finish()?;

    let months = term_periods(term_years, MONTHS_PER_YEAR)?;
    let maturity = recurring_deposit_value(installment, annual_rate, compounding, months);
    let deposits = installment * f64::from(months);

    Ok(RecurringDepositReport {
        monthly_installment: installment,
        annual_interest_rate: annual_rate,
        term_in_years: term_years,
        compounding_frequency: compounding,
        installments: months,
        total_deposits: round2(deposits),
        total_interest: round2(maturity - deposits),
        maturity_amount: round2(maturity),
    })
}

// ---------------------------------------------------------------------------
// Interest payout products
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct PayoutEntry {
    pub payout_number: u32,
    pub interest_payment: f64,
    pub remaining_balance: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FixedDepositReport {
    pub principal: f64,
    pub annual_interest_rate: f64,
    pub term_in_years: f64,
    pub payout_frequency: Frequency,
    pub total_payouts: u32,
    pub interest_per_payout: f64,
    pub total_interest: f64,
    pub payout_schedule: Vec<PayoutEntry>,
}

pub fn fixed_deposit(params: Params<'_>) -> CalcResult<FixedDepositReport> {
    let mut form = params.form();
    let principal = form.number(&NumberField::required("principal").min(0.0));
    let annual_rate = form.number(&NumberField::required("annual_interest_rate").min(0.0));
    let term_years = form.number(
        &NumberField::required("term_in_years")
            .above(0.0)
            .max(MAX_TERM_YEARS),
    );
    let payout_frequency = form.choice("payout_frequency", Some(Frequency::Monthly));
    form.finish()?;

    let per_year = payout_frequency.periods_per_year();
    let total_payouts = (term_years * f64::from(per_year)).floor();
    if total_payouts < 1.0 || total_payouts > f64::from(u32::MAX) {
        return Err(CalcError::domain(
            "fixed deposit payouts",
            "term_in_years is shorter than one payout period",
        ));
    }
    let total_payouts = total_payouts as u32;

    let interest_per_payout = principal * annual_rate / 100.0 / f64::from(per_year);
    let payout_schedule = (1..=total_payouts)
        .map(|payout_number| PayoutEntry {
            payout_number,
            interest_payment: round2(interest_per_payout),
            remaining_balance: round2(principal),
        })
        .collect();

    Ok(FixedDepositReport {
        principal,
        annual_interest_rate: annual_rate,
        term_in_years: term_years,
        payout_frequency,
        total_payouts,
        interest_per_payout: round2(interest_per_payout),
        total_interest: round2(interest_per_payout * f64::from(total_payouts)),
        payout_schedule,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct SeniorCitizenReport {
    pub principal_amount: f64,
    pub annual_interest_rate: f64,
    pub term_in_years: f64,
    pub quarterly_interest: f64,
    pub total_interest: f64,
    pub maturity_amount: f64,
}

pub fn senior_citizen_savings(params: Params<'_>) -> CalcResult<SeniorCitizenReport> {
    let mut form = params.form();
    let principal = form.number(&NumberField::required("principal_amount").min(0.0));
    let annual_rate = form.number(&NumberField::required("annual_interest_rate").min(0.0));
    let term_years = form.number(
        &NumberField::optional("term_in_years", 5.0)
            .above(0.0)
            .max(MAX_TERM_YEARS),
    );
    form.finish()?;

    let quarterly_interest = principal * annual_rate / 4.0 / 100.0;
    let total_interest = quarterly_interest * term_years * 4.0;

    Ok(SeniorCitizenReport {
        principal_amount: principal,
        annual_interest_rate: annual_rate,
        term_in_years: term_years,
        quarterly_interest: round2(quarterly_interest),
        total_interest: round2(total_interest),
        maturity_amount: round2(principal + total_interest),
    })
}

const MIS_TENURE_YEARS: u32 = 5;

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyIncomeReport {
    pub principal_amount: f64,
    pub annual_interest_rate: f64,
    pub tenure_in_years: u32,
    pub monthly_interest: f64,
    pub total_interest: f64,
}

pub fn monthly_income_scheme(params: Params<'_>) -> CalcResult<MonthlyIncomeReport> {
    let mut form = params.form();
    let principal = form.number(&NumberField::required("principal_amount").above(0.0));
    let annual_rate = read_rate(
        &mut form,
        NumberField::required("annual_interest_rate").min(0.0),
        RateDefault::PostOffice("MIS"),
        f64::from(MIS_TENURE_YEARS),
    );
    form.finish()?;

    let monthly_interest = principal * (annual_rate / 100.0) / 12.0;

    Ok(MonthlyIncomeReport {
        principal_amount: principal,
        annual_interest_rate: annual_rate,
        tenure_in_years: MIS_TENURE_YEARS,
        monthly_interest: round2(monthly_interest),
        total_interest: round2(monthly_interest * f64::from(MIS_TENURE_YEARS * MONTHS_PER_YEAR)),
    })
}

// ---------------------------------------------------------------------------
// Solving for time or contribution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct DoublingReport {
    pub principal_amount: f64,
    pub annual_interest_rate: f64,
    pub years_to_double: f64,
    pub months_to_double: u32,
    pub maturity_amount: f64,
}

/// Kisan Vikas Patra: the term is whatever it takes to double the deposit.
pub fn kisan_vikas_patra(params: Params<'_>) -> CalcResult<DoublingReport> {
    let mut form = params.form();
    let principal = form.number(&NumberField::required("principal_amount").min(0.0));
    let annual_rate = form.number(&NumberField::required("annual_interest_rate").min(0.0));
    form.finish()?;

    let rate = annual_rate / 100.0;
    let growth = (1.0 + rate).ln();
    let years_to_double = 2f64.ln() / growth;
    let months_to_double = (years_to_double * f64::from(MONTHS_PER_YEAR)).round();
    if growth <= 0.0 || months_to_double > f64::from(u32::MAX) {
        return Err(CalcError::domain(
            "doubling time",
            "annual_interest_rate is too small to ever double",
        ));
    }
    let maturity = lump_sum_growth(principal, rate, years_to_double);

    Ok(DoublingReport {
        principal_amount: principal,
        annual_interest_rate: annual_rate,
        years_to_double: round2(years_to_double),
        months_to_double: months_to_double as u32,
        maturity_amount: round2(maturity),
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct FundReturnsReport {
    pub investment_type: InvestmentType,
    pub annual_return_rate: f64,
    pub investment_duration_years: u32,
    pub total_invested: f64,
    pub total_interest_earned: f64,
    pub maturity_amount: f64,
}

pub fn mutual_fund_returns(params: Params<'_>) -> CalcResult<FundReturnsReport> {
    let mut form = params.form();
    let investment_type = form.choice::<InvestmentType>("investment_type", None);
    let investment_amount = form.number(&NumberField::required("investment_amount").min(1.0));
    let annual_rate = form.number(&NumberField::required("annual_return_rate").min(0.0));
    let years = form.count(
        &NumberField::required("investment_duration_years")
            .min(1.0)
            .max(MAX_TERM_YEARS),
    );
    let sip_amount = form.number(&NumberField::optional("sip_amount", 0.0).min(0.0));
    if investment_type == InvestmentType::Sip && sip_amount < 1.0 {
        form.add_violation(
            "sip_amount",
            "must be at least 1 when investment_type is sip",
        );
    }
    form.finish()?;

    let rate = annual_rate / 100.0;
    let (invested, maturity) = match investment_type {
        InvestmentType::Lumpsum => (
            investment_amount,
            lump_sum_growth(investment_amount, rate, f64::from(years)),
        ),
        InvestmentType::Sip => {
            let months = years * MONTHS_PER_YEAR;
            (
                sip_amount * f64::from(months),
                annuity_due_future_value(sip_amount, rate / 12.0, months),
            )
        }
    };

    Ok(FundReturnsReport {
        investment_type,
        annual_return_rate: annual_rate,
        investment_duration_years: years,
        total_invested: round2(invested),
        total_interest_earned: round2(maturity - invested),
        maturity_amount: round2(maturity),
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct RetirementSavingsReport {
    pub retirement_goal: f64,
    pub current_savings: f64,
    pub interest_rate: f64,
    pub years_until_retirement: u32,
    pub monthly_contribution_required: f64,
}

/// Level monthly saving that grows into the gap between goal and current savings.
pub fn retirement_savings(params: Params<'_>) -> CalcResult<RetirementSavingsReport> {
    let mut form = params.form();
    let goal = form.number(&NumberField::required("retirement_goal").min(0.0));
    let savings = form.number(&NumberField::required("current_savings").min(0.0));
    let annual_rate = form.number(&NumberField::required("interest_rate").min(0.0).max(100.0));
    let years = form.count(
        &NumberField::required("years_until_retirement")
            .min(1.0)
            .max(MAX_TERM_YEARS),
    );
    form.finish()?;

    let months = years * MONTHS_PER_YEAR;
    let monthly_rate = annual_rate / 100.0 / 12.0;
    let gap = (goal - savings).max(0.0);
    let contribution = if monthly_rate > 0.0 {
        gap * monthly_rate / ((1.0 + monthly_rate).powf(f64::from(months)) - 1.0)
    } else {
        gap / f64::from(months)
    };

    Ok(RetirementSavingsReport {
        retirement_goal: goal,
        current_savings: savings,
        interest_rate: annual_rate,
        years_until_retirement: years,
        monthly_contribution_required: round2(contribution),
    })
}
