use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::validation::Params;
use super::{deposit, general, loan, reference, schemes, tax, withdrawal};
use crate::error::{CalcError, CalcResult};

const LEGACY_SUFFIX: &str = "-calculate";

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Product {
    LoanBasic,
    LoanAdvanced,
    Emi,
    FixedDeposit,
    CumulativeFixedDeposit,
    RecurringDeposit,
    PostOfficeRecurringDeposit,
    PpfFixed,
    PpfVariable,
    SukanyaSamriddhi,
    SeniorCitizenSavings,
    KisanVikasPatra,
    MahilaSamman,
    MonthlyIncomeScheme,
    TimeDeposit,
    NationalSavingsCertificate,
    Lumpsum,
    Sip,
    Elss,
    Nps,
    Epf,
    MutualFundReturns,
    Retirement,
    Swp,
    IncomeTax,
    CapitalGainsTax,
    SimpleInterest,
    CompoundInterest,
    Inflation,
    Cagr,
    Apy,
    Hra,
    Gst,
    Calculate,
    Gratuity,
    AtalPension,
    ShramYogiMaandhan,
    FloatingRateBonds,
    SovereignGoldBonds,
    PostalLifeInsurance,
    RuralPostalLifeInsurance,
    Pmjjby,
    Pmsby,
    InterestRates,
    BankInterestRates,
    PostOfficeInterestRates,
    BondsOverview,
    Bonds54ecInfo,
    MutualFundsOverview,
    MutualFundsTopListing,
    InsurancePremiums,
}

pub const PRODUCTS: &[(&str, Product)] = &[
    ("loan-basic", Product::LoanBasic),
    ("loan-advanced", Product::LoanAdvanced),
    ("emi", Product::Emi),
    ("fixed-deposit", Product::FixedDeposit),
    ("cumulative-fixed-deposit", Product::CumulativeFixedDeposit),
    ("recurring-deposit", Product::RecurringDeposit),
    ("rd", Product::PostOfficeRecurringDeposit),
    ("ppf-fixed", Product::PpfFixed),
    ("ppf-variable", Product::PpfVariable),
    ("ssy", Product::SukanyaSamriddhi),
    ("scss", Product::SeniorCitizenSavings),
    ("kvp", Product::KisanVikasPatra),
    ("mssc", Product::MahilaSamman),
    ("mis", Product::MonthlyIncomeScheme),
    ("td", Product::TimeDeposit),
    ("nsc", Product::NationalSavingsCertificate),
    ("lumpsum", Product::Lumpsum),
    ("sip", Product::Sip),
    ("elss", Product::Elss),
    ("nps", Product::Nps),
    ("epf", Product::Epf),
    ("mutual-fund-returns", Product::MutualFundReturns),
    ("retirement", Product::Retirement),
    ("swp", Product::Swp),
    ("income-tax", Product::IncomeTax),
    ("capital-gains-tax", Product::CapitalGainsTax),
    ("simple-interest", Product::SimpleInterest),
    ("compound-interest", Product::CompoundInterest),
    ("inflation", Product::Inflation),
    ("cagr", Product::Cagr),
    ("apy", Product::Apy),
    ("hra", Product::Hra),
    ("gst", Product::Gst),
    ("calculate", Product::Calculate),
    ("gratuity", Product::Gratuity),
    ("aps", Product::AtalPension),
    ("pm-sym", Product::ShramYogiMaandhan),
    ("floating-rate-bonds", Product::FloatingRateBonds),
    ("sovereign-gold-bonds", Product::SovereignGoldBonds),
    ("postal-life-insurance", Product::PostalLifeInsurance),
    ("rural-postal-life-insurance", Product::RuralPostalLifeInsurance),
    ("pmjjby", Product::Pmjjby),
    ("pmsby", Product::Pmsby),
    ("interest-rates", Product::InterestRates),
    ("bank-interest-rates", Product::BankInterestRates),
    ("post-office-interest-rates", Product::PostOfficeInterestRates),
    ("bonds-overview", Product::BondsOverview),
    ("54ec-bonds-info", Product::Bonds54ecInfo),
    ("mutual-funds-overview", Product::MutualFundsOverview),
    ("mutual-funds-top-listing", Product::MutualFundsTopListing),
    ("insurance-premiums", Product::InsurancePremiums),
];

const ALIASES: &[(&str, Product)] = &[
    ("pm-jeevan-jyoti-bima", Product::Pmjjby),
    ("pm-suraksha-bima", Product::Pmsby),
];

impl Product {
    /// Resolves a request key, accepting the `-calculate` suffix of older paths.
    pub fn from_key(key: &str) -> Option<Self> {
        let normalized = key.trim().to_ascii_lowercase();
        let key = match normalized.strip_suffix(LEGACY_SUFFIX) {
            Some(stripped) if !stripped.is_empty() => stripped,
            _ => normalized.as_str(),
        };
        PRODUCTS
            .iter()
            .chain(ALIASES)
            .find(|(name, _)| *name == key)
            .map(|(_, product)| *product)
    }

    pub fn key(self) -> &'static str {
        PRODUCTS
            .iter()
            .find(|(_, product)| *product == self)
            .map(|(name, _)| *name)
            .unwrap_or("")
    }

    pub fn is_lookup(self) -> bool {
        matches!(
            self,
            Product::InterestRates
                | Product::BankInterestRates
                | Product::PostOfficeInterestRates
                | Product::BondsOverview
                | Product::Bonds54ecInfo
                | Product::MutualFundsOverview
                | Product::MutualFundsTopListing
                | Product::InsurancePremiums
        )
    }

    pub fn evaluate(self, params: Params<'_>, today: NaiveDate) -> CalcResult<Value> {
        match self {
            Product::LoanBasic => render(loan::basic_loan(params)),
            Product::LoanAdvanced => render(loan::advanced_loan(params, today)),
            Product::Emi => render(loan::emi(params)),
            Product::FixedDeposit => render(deposit::fixed_deposit(params)),
            Product::CumulativeFixedDeposit => {
                render(deposit::lump_sum(&deposit::CUMULATIVE_FIXED_DEPOSIT, params))
            }
            Product::RecurringDeposit => render(deposit::recurring_deposit(
                &deposit::BANK_RECURRING_DEPOSIT,
                params,
            )),
            Product::PostOfficeRecurringDeposit => render(deposit::recurring_deposit(
                &deposit::POST_OFFICE_RECURRING_DEPOSIT,
                params,
            )),
            Product::PpfFixed => render(deposit::annuity(&deposit::PPF_FIXED, params)),
            Product::PpfVariable => render(deposit::ppf_variable(params)),
            Product::SukanyaSamriddhi => {
                render(deposit::annuity(&deposit::SUKANYA_SAMRIDDHI, params))
            }
            Product::SeniorCitizenSavings => render(deposit::senior_citizen_savings(params)),
            Product::KisanVikasPatra => render(deposit::kisan_vikas_patra(params)),
            Product::MahilaSamman => render(deposit::lump_sum(&deposit::MAHILA_SAMMAN, params)),
            Product::MonthlyIncomeScheme => render(deposit::monthly_income_scheme(params)),
            Product::TimeDeposit => render(deposit::lump_sum(&deposit::TIME_DEPOSIT, params)),
            Product::NationalSavingsCertificate => render(deposit::lump_sum(
                &deposit::NATIONAL_SAVINGS_CERTIFICATE,
                params,
            )),
            Product::Lumpsum => render(deposit::lump_sum(&deposit::LUMPSUM, params)),
            Product::Sip => render(deposit::annuity(&deposit::SIP, params)),
            Product::Elss => render(deposit::annuity(&deposit::ELSS, params)),
            Product::Nps => render(deposit::annuity(&deposit::NPS, params)),
            Product::Epf => render(deposit::annuity(&deposit::EPF, params)),
            Product::MutualFundReturns => render(deposit::mutual_fund_returns(params)),
            Product::Retirement => render(deposit::retirement_savings(params)),
            Product::Swp => render(withdrawal::systematic_withdrawal(params)),
            Product::IncomeTax => render(tax::income_tax(params)),
            Product::CapitalGainsTax => render(tax::capital_gains_tax(params)),
            Product::SimpleInterest => render(general::simple_interest(params)),
            Product::CompoundInterest => render(general::compound_interest(params)),
            Product::Inflation => render(general::inflation(params)),
            Product::Cagr => render(general::cagr(params)),
            Product::Apy => render(general::apy(params)),
            Product::Hra => render(general::house_rent_allowance(params)),
            Product::Gst => render(general::gst(params)),
            Product::Calculate => render(general::arithmetic(params)),
            Product::Gratuity => render(schemes::gratuity(params)),
            Product::AtalPension => render(schemes::atal_pension(params)),
            Product::ShramYogiMaandhan => render(schemes::shram_yogi_maandhan(params)),
            Product::FloatingRateBonds => render(schemes::floating_rate_bond(params)),
            Product::SovereignGoldBonds => render(schemes::sovereign_gold_bond(params)),
            Product::PostalLifeInsurance => {
                render(schemes::postal_policy(&schemes::POSTAL_LIFE_INSURANCE, params))
            }
            Product::RuralPostalLifeInsurance => render(schemes::postal_policy(
                &schemes::RURAL_POSTAL_LIFE_INSURANCE,
                params,
            )),
            Product::Pmjjby => render(schemes::flat_cover(&schemes::PMJJBY, params)),
            Product::Pmsby => render(schemes::flat_cover(&schemes::PMSBY, params)),
            Product::InterestRates => render(Ok(reference::interest_rates())),
            Product::BankInterestRates => render(Ok(&reference::BANK_RATES)),
            Product::PostOfficeInterestRates => render(Ok(&reference::POST_OFFICE_RATES)),
            Product::BondsOverview => render(Ok(&reference::BONDS_OVERVIEW)),
            Product::Bonds54ecInfo => render(Ok(&reference::BONDS_54EC_INFO)),
            Product::MutualFundsOverview => render(Ok(&reference::MUTUAL_FUNDS_OVERVIEW)),
            Product::MutualFundsTopListing => render(Ok(&reference::TOP_FUNDS)),
            Product::InsurancePremiums => render(Ok(&schemes::INSURANCE_PREMIUMS)),
        }
    }
}

fn render<T: Serialize>(report: CalcResult<T>) -> CalcResult<Value> {
    let value = serde_json::to_value(report?)?;
    if contains_null(&value) {
        return Err(CalcError::domain(
            "result",
            "inputs are too large to produce a finite result",
        ));
    }
    Ok(value)
}

/// Reports skip absent fields, so a null can only be a non-finite number.
fn contains_null(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.iter().any(contains_null),
        Value::Object(fields) => fields.values().any(contains_null),
        _ => false,
    }
}

pub fn product_keys() -> impl Iterator<Item = &'static str> {
    PRODUCTS.iter().map(|(name, _)| *name)
}

/// `today` anchors calendar labels in amortization schedules.
pub fn compute(key: &str, params: &Map<String, Value>, today: NaiveDate) -> CalcResult<Value> {
    let product = Product::from_key(key).ok_or_else(|| CalcError::UnknownProduct(key.to_string()))?;
    debug!(product = product.key(), fields = params.len(), "computing");
    product.evaluate(Params::new(params), today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
    }

    fn params(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn keys_resolve_with_and_without_legacy_suffix() {
        assert_eq!(Product::from_key("loan-basic"), Some(Product::LoanBasic));
        assert_eq!(Product::from_key("loan-basic-calculate"), Some(Product::LoanBasic));
        assert_eq!(Product::from_key("calculate"), Some(Product::Calculate));
        assert_eq!(Product::from_key("pm-suraksha-bima-calculate"), Some(Product::Pmsby));
        assert_eq!(Product::from_key("Income-Tax"), Some(Product::IncomeTax));
        assert_eq!(Product::from_key("mortgage"), None);
    }

    #[test]
    fn every_listed_key_round_trips() {
        for (name, product) in PRODUCTS {
            assert_eq!(Product::from_key(name), Some(*product), "{name}");
            assert_eq!(product.key(), *name);
        }
    }

    #[test]
    fn unknown_product_is_reported_by_name() {
        let err = compute("mortgage", &Map::new(), today()).expect_err("unknown");
        assert!(matches!(err, CalcError::UnknownProduct(ref key) if key == "mortgage"));
    }

    #[test]
    fn lookups_need_no_parameters() {
        for (name, product) in PRODUCTS.iter().filter(|(_, product)| product.is_lookup()) {
            let value = compute(name, &Map::new(), today()).expect(name);
            assert!(value.is_object() || value.is_array(), "{name} ({product:?})");
        }
    }

    #[test]
    fn interest_rates_include_both_tables() {
        let value = compute("interest-rates", &Map::new(), today()).expect("lookup");
        assert_eq!(value["bank"]["Loan"], json!(7.5));
        assert_eq!(value["post_office"]["TD 5 Year"], json!(7.0));
    }

    #[test]
    fn rate_tables_keep_publication_order() {
        let value = compute("post-office-interest-rates", &Map::new(), today()).expect("lookup");
        let keys: Vec<&str> = value
            .as_object()
            .expect("object")
            .keys()
            .map(String::as_str)
            .take(3)
            .collect();
        assert_eq!(keys, ["MIS", "RD", "TD 1 Year"]);

        let value = compute("interest-rates", &Map::new(), today()).expect("lookup");
        let keys: Vec<&str> = value["bank"]
            .as_object()
            .expect("object")
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, ["Loan", "FD", "RD"]);
    }

    #[test]
    fn non_finite_results_are_domain_errors() {
        let raw = params(json!({
            "principal": 100000,
            "annual_interest_rate": 1000000,
            "term_in_years": 100
        }));
        let err = compute("cumulative-fixed-deposit", &raw, today()).expect_err("overflow");
        assert!(matches!(err, CalcError::Domain { context: "result", .. }));

        let raw = params(json!({
            "principal": 1000,
            "rate": 1000000,
            "time": 100,
            "compounds_per_year": 1
        }));
        let err = compute("compound-interest", &raw, today()).expect_err("overflow");
        assert!(matches!(err, CalcError::Domain { .. }));
    }

    #[test]
    fn open_top_slab_has_no_upper_bound_field() {
        let raw = params(json!({ "annual_income": 2000000, "age": 35 }));
        let value = compute("income-tax", &raw, today()).expect("valid");
        let breakdown = value["breakdown"].as_array().expect("breakdown");
        let top = breakdown.last().expect("top slab");
        assert!(top.get("to").is_none());
        assert!(breakdown[0].get("to").is_some());
    }

    #[test]
    fn loan_scenario_through_dispatch() {
        let raw = params(json!({
            "principal": 100000,
            "annual_interest_rate": 10,
            "term_in_years": 1
        }));
        let value = compute("loan-basic", &raw, today()).expect("valid");
        assert_eq!(value["monthly_payment"], json!(8791.59));
    }

    #[test]
    fn calculators_are_idempotent() {
        let cases = [
            ("loan-advanced", json!({ "principal": 250000, "annual_interest_rate": 9, "term_in_years": 2, "with_calendar": true })),
            ("sip", json!({ "monthly_investment": 5000, "annual_return_rate": 12, "years": 10 })),
            ("swp", json!({ "initial_investment": 100000, "monthly_withdrawal": 2000, "annual_return_rate": 6 })),
            ("income-tax", json!({ "annual_income": 750000, "age": 40 })),
            ("ppf-variable", json!({ "contributions": "1000,2000,3000", "annual_interest_rate": 7.1 })),
        ];
        for (key, body) in cases {
            let raw = params(body);
            let first = serde_json::to_string(&compute(key, &raw, today()).expect(key)).expect("encode");
            let second = serde_json::to_string(&compute(key, &raw, today()).expect(key)).expect("encode");
            assert_eq!(first, second, "{key}");
        }
    }

    #[test]
    fn validation_errors_pass_through_dispatch() {
        let err = compute("simple-interest", &Map::new(), today()).expect_err("missing fields");
        assert_eq!(err.violations().len(), 3);
    }
}
