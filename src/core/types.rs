use serde::Serialize;

use super::validation::Choice;
use crate::error::{CalcError, CalcResult};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Monthly,
    Quarterly,
    Annually,
}

impl Frequency {
    pub fn periods_per_year(self) -> u32 {
        match self {
            Frequency::Monthly => 12,
            Frequency::Quarterly => 4,
            Frequency::Annually => 1,
        }
    }
}

impl Choice for Frequency {
    const DOMAIN: &'static [(&'static str, Self)] = &[
        ("monthly", Frequency::Monthly),
        ("quarterly", Frequency::Quarterly),
        ("annually", Frequency::Annually),
    ];
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Equity,
    RealEstate,
    Other,
}

impl Choice for AssetType {
    const DOMAIN: &'static [(&'static str, Self)] = &[
        ("equity", AssetType::Equity),
        ("real_estate", AssetType::RealEstate),
        ("other", AssetType::Other),
    ];
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CityType {
    Metro,
    NonMetro,
}

impl Choice for CityType {
    const DOMAIN: &'static [(&'static str, Self)] = &[
        ("metro", CityType::Metro),
        ("non-metro", CityType::NonMetro),
    ];
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentType {
    Lumpsum,
    Sip,
}

impl Choice for InvestmentType {
    const DOMAIN: &'static [(&'static str, Self)] = &[
        ("lumpsum", InvestmentType::Lumpsum),
        ("sip", InvestmentType::Sip),
    ];
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Choice for Operation {
    const DOMAIN: &'static [(&'static str, Self)] = &[
        ("add", Operation::Add),
        ("subtract", Operation::Subtract),
        ("multiply", Operation::Multiply),
        ("divide", Operation::Divide),
    ];
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldingTerm {
    ShortTerm,
    LongTerm,
}

/// Longest term any calculator accepts, in years.
pub const MAX_TERM_YEARS: f64 = 100.0;

/// Whole periods in a term, with at least one period.
pub fn term_periods(term_years: f64, periods_per_year: u32) -> CalcResult<u32> {
    if term_years > MAX_TERM_YEARS {
        return Err(CalcError::domain(
            "term",
            format!("{term_years} years exceeds the {MAX_TERM_YEARS} year limit"),
        ));
    }
    let periods = (term_years * f64::from(periods_per_year)).round();
    if periods < 1.0 {
        return Err(CalcError::domain(
            "term",
            format!("{term_years} years does not span a single period"),
        ));
    }
    Ok(periods as u32)
}

/// Currency rounding applied when a report is built, never mid-computation.
pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    let rounded = (value * scale).round() / scale;
    // Avoid "-0.0" in JSON output.
    if rounded == 0.0 { 0.0 } else { rounded }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn periods_per_year_match_frequency() {
        assert_eq!(Frequency::Monthly.periods_per_year(), 12);
        assert_eq!(Frequency::Quarterly.periods_per_year(), 4);
        assert_eq!(Frequency::Annually.periods_per_year(), 1);
    }

    #[test]
    fn term_periods_rounds_and_rejects_empty_terms() {
        assert_eq!(term_periods(1.0, 12).expect("one year"), 12);
        assert_eq!(term_periods(2.5, 4).expect("ten quarters"), 10);
        assert!(term_periods(0.01, 12).is_err());
        assert_eq!(term_periods(MAX_TERM_YEARS, 12).expect("a century"), 1200);
        assert!(matches!(
            term_periods(200_000_000.0, 12),
            Err(CalcError::Domain { .. })
        ));
    }

    #[test]
    fn round2_rounds_half_away_from_zero() {
        assert_eq!(round2(8791.588_723), 8791.59);
        assert_eq!(round2(-2.345_1), -2.35);
        assert_eq!(round2(0.004), 0.0);
        assert!(round2(-0.001).is_sign_positive());
    }

    #[test]
    fn enums_serialize_with_request_spelling() {
        assert_eq!(
            serde_json::to_string(&CityType::NonMetro).expect("serialize"),
            "\"non-metro\""
        );
        assert_eq!(
            serde_json::to_string(&AssetType::RealEstate).expect("serialize"),
            "\"real_estate\""
        );
        assert_eq!(
            serde_json::to_string(&HoldingTerm::LongTerm).expect("serialize"),
            "\"long_term\""
        );
    }
}
