use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::types::{MAX_TERM_YEARS, round2, term_periods};
use super::validation::{NumberField, Params};
use crate::error::{CalcError, CalcResult};

pub const MONTHS_PER_YEAR: u32 = 12;

const BALANCE_EPSILON: f64 = 1e-9;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const PRINCIPAL: NumberField = NumberField::required("principal").min(0.0);
const ANNUAL_RATE: NumberField = NumberField::required("annual_interest_rate").min(0.0);
const TERM_YEARS: NumberField = NumberField::required("term_in_years")
    .above(0.0)
    .max(MAX_TERM_YEARS);
const EXTRA_PAYMENT: NumberField = NumberField::optional("extra_payment", 0.0).min(0.0);

const EMI_LOAN_AMOUNT: NumberField = NumberField::required("loan_amount").min(1.0);
const EMI_TERM_YEARS: NumberField = NumberField::required("loan_term_years")
    .integer()
    .min(1.0)
    .max(MAX_TERM_YEARS);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmortizationRow {
    pub period: u32,
    pub interest: f64,
    pub principal: f64,
    pub balance: f64,
}

/// Full-precision outcome of running a loan to payoff or term end.
#[derive(Debug, Clone, PartialEq)]
pub struct Amortization {
    pub payment: f64,
    pub rows: Vec<AmortizationRow>,
    pub total_interest: f64,
    pub total_paid: f64,
}

impl Amortization {
    pub fn periods_run(&self) -> u32 {
        self.rows.len() as u32
    }
}

pub fn monthly_rate(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 100.0 / f64::from(MONTHS_PER_YEAR)
}

/// Level payment that clears `principal` over `periods`; linear when the rate is zero.
pub fn level_payment(principal: f64, period_rate: f64, periods: u32) -> CalcResult<f64> {
    if periods == 0 {
        return Err(CalcError::domain(
            "level payment",
            "number of periods must be at least 1",
        ));
    }
    let n = f64::from(periods);
    let growth = (1.0 + period_rate).powf(n);
    if period_rate == 0.0 || growth == 1.0 {
        return Ok(principal / n);
    }
    let payment = principal * period_rate * growth / (growth - 1.0);
    if !payment.is_finite() {
        return Err(CalcError::domain(
            "level payment",
            "interest rate and term overflow the payment",
        ));
    }
    Ok(payment)
}

pub fn amortize(
    principal: f64,
    period_rate: f64,
    periods: u32,
    extra_payment: f64,
) -> CalcResult<Amortization> {
    let payment = level_payment(principal, period_rate, periods)?;

    let mut balance = principal;
    let mut total_interest = 0.0;
    let mut total_paid = 0.0;
    let mut rows = Vec::with_capacity(periods as usize);

    for period in 1..=periods {
        if balance <= 0.0 {
            break;
        }

        let interest = balance * period_rate;
        let principal_paid = (payment - interest + extra_payment).clamp(0.0, balance);

        balance -= principal_paid;
        if balance < BALANCE_EPSILON {
            balance = 0.0;
        }
        total_interest += interest;
        total_paid += interest + principal_paid;

        rows.push(AmortizationRow {
            period,
            interest,
            principal: principal_paid,
            balance,
        });
    }

    Ok(Amortization {
        payment,
        rows,
        total_interest,
        total_paid,
    })
}

/// Calendar month/year of the `offset`-th payment counted from `start`'s month.
pub fn calendar_label(start: NaiveDate, offset: u32) -> (u32, i32) {
    let month_index = start.month0() + offset;
    let month = month_index % MONTHS_PER_YEAR + 1;
    let year = start.year() + (month_index / MONTHS_PER_YEAR) as i32;
    (month, year)
}

#[derive(Debug, Clone, Serialize)]
pub struct BasicLoanReport {
    pub principal: f64,
    pub annual_interest_rate: f64,
    pub term_in_years: f64,
    pub number_of_payments: u32,
    pub monthly_payment: f64,
    pub total_payment: f64,
    pub total_interest: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleEntry {
    pub month: u32,
    pub interest_payment: f64,
    pub principal_payment: f64,
    pub remaining_balance: f64,
    pub principal_paid_pct: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdvancedLoanReport {
    pub principal: f64,
    pub annual_interest_rate: f64,
    pub term_in_years: f64,
    pub extra_payment: f64,
    pub monthly_payment: f64,
    pub payments_made: u32,
    pub total_payment: f64,
    pub total_interest: f64,
    pub interest_saved: f64,
    pub amortization_schedule: Vec<ScheduleEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmiReport {
    pub loan_amount: f64,
    pub annual_interest_rate: f64,
    pub loan_term_years: u32,
    pub emi: f64,
    pub total_payment: f64,
    pub total_interest: f64,
}

pub fn basic_loan(params: Params<'_>) -> CalcResult<BasicLoanReport> {
    let mut form = params.form();
    let principal = form.number(&PRINCIPAL);
    let annual_rate = form.number(&ANNUAL_RATE);
    let term_years = form.number(&TERM_YEARS);
    form.finish()?;

    let periods = term_periods(term_years, MONTHS_PER_YEAR)?;
    let payment = level_payment(principal, monthly_rate(annual_rate), periods)?;
    let total_payment = payment * f64::from(periods);

    Ok(BasicLoanReport {
        principal,
        annual_interest_rate: annual_rate,
        term_in_years: term_years,
        number_of_payments: periods,
        monthly_payment: round2(payment),
        total_payment: round2(total_payment),
        total_interest: round2(total_payment - principal),
    })
}

/// Amortized loan with optional extra monthly payment; calendar labels start at `today`.
pub fn advanced_loan(params: Params<'_>, today: NaiveDate) -> CalcResult<AdvancedLoanReport> {
    let mut form = params.form();
    let principal = form.number(&PRINCIPAL);
    let annual_rate = form.number(&ANNUAL_RATE);
    let term_years = form.number(&TERM_YEARS);
    let extra_payment = form.number(&EXTRA_PAYMENT);
    let with_calendar = form.flag("with_calendar", false);
    form.finish()?;

    let periods = term_periods(term_years, MONTHS_PER_YEAR)?;
    let rate = monthly_rate(annual_rate);
    let plan = amortize(principal, rate, periods, extra_payment)?;
    let baseline_interest = if extra_payment > 0.0 {
        amortize(principal, rate, periods, 0.0)?.total_interest
    } else {
        plan.total_interest
    };

    let mut repaid = 0.0;
    let amortization_schedule = plan
        .rows
        .iter()
        .enumerate()
        .map(|(offset, row)| {
            repaid += row.principal;
            let principal_paid_pct = if principal > 0.0 {
                repaid / principal * 100.0
            } else {
                100.0
            };
            let calendar = with_calendar.then(|| calendar_label(today, offset as u32));
            ScheduleEntry {
                month: row.period,
                interest_payment: round2(row.interest),
                principal_payment: round2(row.principal),
                remaining_balance: round2(row.balance),
                principal_paid_pct: round2(principal_paid_pct),
                calendar_month: calendar.map(|(month, _)| month),
                calendar_year: calendar.map(|(_, year)| year),
                label: calendar.map(|(month, year)| {
                    format!("{} {year}", MONTH_ABBREVIATIONS[(month - 1) as usize])
                }),
            }
        })
        .collect();

    Ok(AdvancedLoanReport {
        principal,
        annual_interest_rate: annual_rate,
        term_in_years: term_years,
        extra_payment,
        monthly_payment: round2(plan.payment),
        payments_made: plan.periods_run(),
        total_payment: round2(plan.total_paid),
        total_interest: round2(plan.total_interest),
        interest_saved: round2((baseline_interest - plan.total_interest).max(0.0)),
        amortization_schedule,
    })
}

pub fn emi(params: Params<'_>) -> CalcResult<EmiReport> {
    let mut form = params.form();
    let loan_amount = form.number(&EMI_LOAN_AMOUNT);
    let annual_rate = form.number(&ANNUAL_RATE);
    let years = form.count(&EMI_TERM_YEARS);
    form.finish()?;

    let periods = years * MONTHS_PER_YEAR;
    let payment = level_payment(loan_amount, monthly_rate(annual_rate), periods)?;
    let total_payment = payment * f64::from(periods);

    Ok(EmiReport {
        loan_amount: round2(loan_amount),
        annual_interest_rate: annual_rate,
        loan_term_years: years,
        emi: round2(payment),
        total_payment: round2(total_payment),
        total_interest: round2(total_payment - loan_amount),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, proptest};
    use serde_json::{Map, Value, json};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn params(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 11, 15).expect("valid date")
    }

    #[test]
    fn basic_loan_matches_reference_scenario() {
        let raw = params(json!({
            "principal": 100000,
            "annual_interest_rate": 10,
            "term_in_years": 1
        }));
        let report = basic_loan(Params::new(&raw)).expect("valid loan");
        assert_eq!(report.number_of_payments, 12);
        assert_eq!(report.monthly_payment, 8791.59);
        assert_eq!(report.total_payment, 105499.06);
        assert_eq!(report.total_interest, 5499.06);
    }

    #[test]
    fn zero_rate_payment_is_linear() {
        assert_approx(level_payment(12_000.0, 0.0, 24).expect("payment"), 500.0);

        let plan = amortize(12_000.0, 0.0, 24, 0.0).expect("plan");
        assert_eq!(plan.periods_run(), 24);
        assert_approx(plan.total_interest, 0.0);
        assert_approx(plan.rows.last().expect("rows").balance, 0.0);
    }

    #[test]
    fn zero_periods_is_a_domain_error() {
        let err = level_payment(1_000.0, 0.01, 0).expect_err("no periods");
        assert!(matches!(err, CalcError::Domain { .. }));
    }

    #[test]
    fn schedule_interest_matches_closed_form_total() {
        let plan = amortize(100_000.0, monthly_rate(10.0), 12, 0.0).expect("plan");
        assert_eq!(plan.periods_run(), 12);
        assert!((plan.total_interest - 5499.06).abs() < 0.01);
        assert_approx(plan.total_paid, plan.payment * 12.0);
    }

    #[test]
    fn large_extra_payment_clears_loan_in_first_period() {
        let plan = amortize(50_000.0, monthly_rate(9.0), 60, 1_000_000.0).expect("plan");
        assert_eq!(plan.rows.len(), 1);
        let row = plan.rows[0];
        assert_eq!(row.balance, 0.0);
        assert_approx(row.principal, 50_000.0);
        assert!(row.interest >= 0.0);
    }

    #[test]
    fn extra_payment_shortens_schedule_and_saves_interest() {
        let raw = params(json!({
            "principal": 200000,
            "annual_interest_rate": 8,
            "term_in_years": 10,
            "extra_payment": 1000
        }));
        let report = advanced_loan(Params::new(&raw), fixed_today()).expect("valid loan");
        assert!(report.payments_made < 120);
        assert_eq!(report.amortization_schedule.len() as u32, report.payments_made);
        assert!(report.interest_saved > 0.0);
        let last = report.amortization_schedule.last().expect("entries");
        assert_eq!(last.remaining_balance, 0.0);
        assert_eq!(last.principal_paid_pct, 100.0);
        assert!(last.label.is_none());
    }

    #[test]
    fn calendar_labels_wrap_into_next_year() {
        let raw = params(json!({
            "principal": 6000,
            "annual_interest_rate": 0,
            "term_in_years": 0.5,
            "with_calendar": "true"
        }));
        let report = advanced_loan(Params::new(&raw), fixed_today()).expect("valid loan");
        let labels = report
            .amortization_schedule
            .iter()
            .map(|entry| entry.label.clone().expect("calendar label"))
            .collect::<Vec<_>>();
        assert_eq!(
            labels,
            vec!["Nov 2026", "Dec 2026", "Jan 2027", "Feb 2027", "Mar 2027", "Apr 2027"]
        );
        assert_eq!(report.amortization_schedule[2].calendar_month, Some(1));
        assert_eq!(report.amortization_schedule[2].calendar_year, Some(2027));
    }

    #[test]
    fn calendar_mode_is_deterministic_for_fixed_date() {
        let raw = params(json!({
            "principal": 25000,
            "annual_interest_rate": 7.5,
            "term_in_years": 2,
            "extra_payment": 150,
            "with_calendar": true
        }));
        let first = advanced_loan(Params::new(&raw), fixed_today()).expect("first");
        let second = advanced_loan(Params::new(&raw), fixed_today()).expect("second");
        assert_eq!(
            serde_json::to_string(&first).expect("serialize"),
            serde_json::to_string(&second).expect("serialize")
        );
    }

    #[test]
    fn emi_uses_integer_years() {
        let raw = params(json!({
            "loan_amount": 500000,
            "annual_interest_rate": 9,
            "loan_term_years": 20
        }));
        let report = emi(Params::new(&raw)).expect("valid emi");
        assert_eq!(report.emi, 4498.63);

        let raw = params(json!({
            "loan_amount": 500000,
            "annual_interest_rate": 9,
            "loan_term_years": 2.5
        }));
        let err = emi(Params::new(&raw)).expect_err("fractional years");
        assert_eq!(err.violations()[0].field, "loan_term_years");
    }

    #[test]
    fn emi_with_zero_rate_divides_evenly() {
        let raw = params(json!({
            "loan_amount": 24000,
            "annual_interest_rate": 0,
            "loan_term_years": 2
        }));
        let report = emi(Params::new(&raw)).expect("valid emi");
        assert_eq!(report.emi, 1000.0);
        assert_eq!(report.total_interest, 0.0);
    }

    #[test]
    fn emi_rejects_terms_beyond_a_century() {
        let raw = params(json!({
            "loan_amount": 100000,
            "annual_interest_rate": 10,
            "loan_term_years": 400000000
        }));
        let err = emi(Params::new(&raw)).expect_err("term too long");
        assert_eq!(err.violations()[0].to_string(), "loan_term_years must be at most 100");
    }

    #[test]
    fn loans_reject_terms_beyond_a_century() {
        for term in [10_000.0, 200_000_000.0] {
            let raw = params(json!({
                "principal": 100000,
                "annual_interest_rate": 10,
                "term_in_years": term
            }));
            let err = basic_loan(Params::new(&raw)).expect_err("basic term too long");
            assert_eq!(err.violations()[0].field, "term_in_years");
            let err = advanced_loan(Params::new(&raw), fixed_today()).expect_err("advanced term too long");
            assert_eq!(err.violations()[0].field, "term_in_years");
        }

        let raw = params(json!({
            "principal": 100000,
            "annual_interest_rate": 10,
            "term_in_years": 100
        }));
        let report = advanced_loan(Params::new(&raw), fixed_today()).expect("a century is allowed");
        assert_eq!(report.amortization_schedule.len(), 1200);
    }

    #[test]
    fn overflowing_payment_is_a_domain_error() {
        let err = level_payment(100_000.0, 1e6, 1200).expect_err("growth overflows");
        assert!(matches!(err, CalcError::Domain { .. }));
        assert_approx(level_payment(1_200.0, 1e-18, 12).expect("tiny rate"), 100.0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_schedule_repays_principal_exactly(
            principal in 1_000.0f64..2_000_000.0,
            annual_rate in 0.1f64..30.0,
            years in 1u32..30,
            extra in 0.0f64..5_000.0,
        ) {
            let plan = amortize(principal, monthly_rate(annual_rate), years * 12, extra)
                .expect("plan");
            let repaid: f64 = plan.rows.iter().map(|row| row.principal).sum();
            let final_balance = plan.rows.last().map(|row| row.balance).unwrap_or(principal);

            prop_assert!(plan.periods_run() <= years * 12);
            prop_assert!(final_balance.abs() <= 1e-6 * principal.max(1.0));
            prop_assert!((repaid - principal).abs() <= 1e-6 * principal.max(1.0));
            prop_assert!(plan.rows.iter().all(|row| row.principal >= 0.0 && row.balance >= 0.0));
            prop_assert!(plan.rows.windows(2).all(|pair| pair[0].period + 1 == pair[1].period));
        }
    }
}
