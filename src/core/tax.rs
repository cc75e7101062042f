use serde::Serialize;

use super::types::{AssetType, HoldingTerm, round2};
use super::validation::{NumberField, Params};
use crate::error::CalcResult;

#[derive(Debug, Clone, Copy)]
pub struct Slab {
    pub upper: Option<f64>,
    pub rate: f64,
}

pub const INCOME_TAX_SLABS: [Slab; 4] = [
    Slab {
        upper: Some(250_000.0),
        rate: 0.0,
    },
    Slab {
        upper: Some(500_000.0),
        rate: 0.05,
    },
    Slab {
        upper: Some(1_000_000.0),
        rate: 0.20,
    },
    Slab {
        upper: None,
        rate: 0.30,
    },
];

#[derive(Debug, Clone, Serialize)]
pub struct SlabCharge {
    pub from: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<f64>,
    pub rate_percent: f64,
    pub taxable_amount: f64,
    pub tax: f64,
}

/// Marginal fold over ascending brackets; income exactly on a bound stays
/// in the lower bracket.
pub fn slab_tax(income: f64, slabs: &[Slab]) -> (f64, Vec<SlabCharge>) {
    let mut lower = 0.0;
    let mut total = 0.0;
    let mut breakdown = Vec::new();

    for slab in slabs {
        if income <= lower {
            break;
        }
        let top = slab.upper.map_or(income, |upper| income.min(upper));
        let taxable = top - lower;
        let tax = taxable * slab.rate;
        total += tax;
        breakdown.push(SlabCharge {
            from: lower,
            to: slab.upper,
            rate_percent: slab.rate * 100.0,
            taxable_amount: round2(taxable),
            tax: round2(tax),
        });
        match slab.upper {
            Some(upper) => lower = upper,
            None => break,
        }
    }

    (total, breakdown)
}

const ANNUAL_INCOME: NumberField = NumberField::required("annual_income").min(0.0);
const AGE: NumberField = NumberField::required("age").integer().min(18.0);

#[derive(Debug, Clone, Serialize)]
pub struct IncomeTaxReport {
    pub annual_income: f64,
    pub age: u32,
    pub tax_liability: f64,
    pub effective_rate: f64,
    pub breakdown: Vec<SlabCharge>,
}

pub fn income_tax(params: Params<'_>) -> CalcResult<IncomeTaxReport> {
    let mut form = params.form();
    let income = form.number(&ANNUAL_INCOME);
    let age = form.count(&AGE);
    form.finish()?;

    let (tax, breakdown) = slab_tax(income, &INCOME_TAX_SLABS);
    let effective_rate = if income > 0.0 {
        tax / income * 100.0
    } else {
        0.0
    };

    Ok(IncomeTaxReport {
        annual_income: income,
        age,
        tax_liability: round2(tax),
        effective_rate: round2(effective_rate),
        breakdown,
    })
}

#[derive(Debug, Clone, Copy)]
pub struct GainsRule {
    /// `None`: no short/long distinction.
    pub long_term_after_months: Option<u32>,
    pub short_term_rate: f64,
    pub long_term_rate: f64,
    pub long_term_exemption: f64,
}

pub fn gains_rule(asset: AssetType) -> GainsRule {
    match asset {
        AssetType::Equity => GainsRule {
            long_term_after_months: Some(12),
            short_term_rate: 0.15,
            long_term_rate: 0.10,
            long_term_exemption: 100_000.0,
        },
        // Both terms are taxed at 20%.
        AssetType::RealEstate => GainsRule {
            long_term_after_months: Some(24),
            short_term_rate: 0.20,
            long_term_rate: 0.20,
            long_term_exemption: 0.0,
        },
        AssetType::Other => GainsRule {
            long_term_after_months: None,
            short_term_rate: 0.30,
            long_term_rate: 0.30,
            long_term_exemption: 0.0,
        },
    }
}

const CAPITAL_GAIN: NumberField = NumberField::required("capital_gain").min(0.0);
const HOLDING_PERIOD: NumberField = NumberField::required("holding_period").integer().min(0.0);

#[derive(Debug, Clone, Serialize)]
pub struct CapitalGainsReport {
    pub capital_gain: f64,
    pub asset_type: AssetType,
    pub holding_period: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holding_term: Option<HoldingTerm>,
    pub exemption: f64,
    pub taxable_gain: f64,
    pub tax_rate: f64,
    pub tax_liability: f64,
}

pub fn capital_gains_tax(params: Params<'_>) -> CalcResult<CapitalGainsReport> {
    let mut form = params.form();
    let gain = form.number(&CAPITAL_GAIN);
    let holding_period = form.count(&HOLDING_PERIOD);
    let asset_type = form.choice::<AssetType>("asset_type", None);
    form.finish()?;

    let rule = gains_rule(asset_type);
    let holding_term = rule.long_term_after_months.map(|threshold| {
        if holding_period < threshold {
            HoldingTerm::ShortTerm
        } else {
            HoldingTerm::LongTerm
        }
    });

    let (rate, exemption) = match holding_term {
        Some(HoldingTerm::LongTerm) => (rule.long_term_rate, rule.long_term_exemption),
        Some(HoldingTerm::ShortTerm) | None => (rule.short_term_rate, 0.0),
    };
    let taxable_gain = (gain - exemption).max(0.0);

    Ok(CapitalGainsReport {
        capital_gain: gain,
        asset_type,
        holding_period,
        holding_term,
        exemption: exemption.min(gain),
        taxable_gain: round2(taxable_gain),
        tax_rate: rate * 100.0,
        tax_liability: round2(taxable_gain * rate),
    })
}
