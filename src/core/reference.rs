use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

/// Product name to annual rate in percent, in publication order.
#[derive(Debug)]
pub struct RateTable {
    entries: &'static [(&'static str, f64)],
}

impl RateTable {
    pub fn get(&self, product: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(name, _)| *name == product)
            .map(|(_, rate)| *rate)
    }

    pub fn entries(&self) -> &'static [(&'static str, f64)] {
        self.entries
    }
}

impl Serialize for RateTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, rate) in self.entries {
            map.serialize_entry(name, rate)?;
        }
        map.end()
    }
}

pub static BANK_RATES: RateTable = RateTable {
    entries: &[("Loan", 7.5), ("FD", 6.0), ("RD", 5.8)],
};

pub static POST_OFFICE_RATES: RateTable = RateTable {
    entries: &[
        ("MIS", 7.4),
        ("RD", 5.8),
        ("TD 1 Year", 6.6),
        ("TD 2 Year", 6.8),
        ("TD 3 Year", 6.9),
        ("TD 5 Year", 7.0),
        ("NSC", 7.7),
        ("MSSC", 7.5),
    ],
};

pub fn post_office_rate(product: &str) -> Option<f64> {
    POST_OFFICE_RATES.get(product)
}

/// Published time-deposit rate for whole-year tenures that have one.
pub fn time_deposit_rate(tenure_years: f64) -> Option<f64> {
    if tenure_years.fract() != 0.0 || tenure_years < 1.0 {
        return None;
    }
    POST_OFFICE_RATES.get(&format!("TD {tenure_years} Year"))
}

#[derive(Debug, Serialize)]
pub struct InterestRates {
    pub bank: &'static RateTable,
    pub post_office: &'static RateTable,
}

pub fn interest_rates() -> InterestRates {
    InterestRates {
        bank: &BANK_RATES,
        post_office: &POST_OFFICE_RATES,
    }
}

#[derive(Debug, Serialize)]
pub struct BondSummary {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub description: &'static str,
}

pub static BONDS_OVERVIEW: [BondSummary; 3] = [
    BondSummary {
        kind: "Floating Rate Saving Bonds",
        description: "These bonds have an interest rate that adjusts periodically based on benchmark rates. They are suitable for investors seeking regular income with protection against interest rate fluctuations.",
    },
    BondSummary {
        kind: "Sovereign Gold Bond Scheme",
        description: "A government bond that offers returns linked to gold prices. It is an alternative to physical gold investment with added interest income.",
    },
    BondSummary {
        kind: "54EC Bonds (Save Capital Gain Tax)",
        description: "These bonds help in saving long-term capital gain tax under Section 54EC of the Income Tax Act. They are generally issued by entities such as REC and NHAI.",
    },
];

#[derive(Debug, Serialize)]
pub struct BondInfo {
    pub description: &'static str,
    pub benefits: &'static [&'static str],
}

pub static BONDS_54EC_INFO: BondInfo = BondInfo {
    description: "54EC bonds are specifically issued by entities like NHAI and REC to help individuals save tax on long-term capital gains. Investments up to Rs. 50 lakh per financial year are eligible, and the bonds have a lock-in period of 5 years.",
    benefits: &[
        "Save long-term capital gain tax.",
        "Issued by reputed government-backed entities.",
        "Fixed interest rate (typically 5-6%).",
    ],
};

#[derive(Debug, Serialize)]
pub struct MutualFundsOverview {
    pub definition: &'static str,
    pub types: &'static [&'static str],
    pub benefits: &'static [&'static str],
    pub risks: &'static [&'static str],
}

pub static MUTUAL_FUNDS_OVERVIEW: MutualFundsOverview = MutualFundsOverview {
    definition: "Mutual funds are investment vehicles that pool money from multiple investors to invest in securities like stocks, bonds, and other assets.",
    types: &[
        "Equity Funds",
        "Debt Funds",
        "Balanced Funds",
        "Index Funds",
        "ELSS (Equity Linked Saving Scheme)",
    ],
    benefits: &[
        "Diversification",
        "Professional Management",
        "Liquidity",
        "Affordability",
    ],
    risks: &["Market risk", "Interest rate risk", "Credit risk"],
};

#[derive(Debug, Serialize)]
pub struct FundListing {
    pub name: &'static str,
    pub category: &'static str,
    pub annual_return: &'static str,
    pub risk: &'static str,
}

pub static TOP_FUNDS: [FundListing; 2] = [
    FundListing {
        name: "ABC Equity Fund",
        category: "Equity",
        annual_return: "15%",
        risk: "High",
    },
    FundListing {
        name: "XYZ Debt Fund",
        category: "Debt",
        annual_return: "7%",
        risk: "Low",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_tables_serialize_in_publication_order() {
        let json = serde_json::to_string(&POST_OFFICE_RATES).expect("serialize");
        assert!(json.starts_with("{\"MIS\":7.4,\"RD\":5.8,\"TD 1 Year\":6.6"));
        assert_eq!(BANK_RATES.entries().len(), 3);
    }

    #[test]
    fn time_deposit_rate_only_for_published_tenures() {
        assert_eq!(time_deposit_rate(5.0), Some(7.0));
        assert_eq!(time_deposit_rate(2.0), Some(6.8));
        assert_eq!(time_deposit_rate(4.0), None);
        assert_eq!(time_deposit_rate(1.5), None);
    }

    #[test]
    fn bonds_overview_uses_type_key() {
        let json = serde_json::to_value(&BONDS_OVERVIEW).expect("serialize");
        assert_eq!(json[0]["type"], "Floating Rate Saving Bonds");
    }
}
