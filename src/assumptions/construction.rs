//! Pre-completion construction phase settings

use serde::{Deserialize, Serialize};

use super::loan::RepaymentType;

/// How interest accrued during construction is funded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapitalizationPolicy {
    /// All interest paid in cash as it accrues
    #[default]
    Cash,
    /// All interest added to the loan balance
    Debt,
    /// Split by `hybrid_cash_percentage`
    Hybrid,
}

/// Construction window before the property produces income
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstructionConfig {
    /// Length of the build in months; zero or negative means no construction phase
    pub months: i32,

    /// Rate charged on the main loan while the build is in progress
    pub construction_interest_rate_percent: f64,

    pub capitalization_policy: CapitalizationPolicy,

    /// Percent of interest paid in cash under the hybrid policy
    pub hybrid_cash_percentage: f64,

    /// Repayment behavior of the equity loan during the build
    pub equity_repayment_type: RepaymentType,

    /// Capitalize every dollar of interest regardless of policy
    pub capitalize_all_interest: bool,
}

impl Default for ConstructionConfig {
    fn default() -> Self {
        Self {
            months: 0,
            construction_interest_rate_percent: 0.0,
            capitalization_policy: CapitalizationPolicy::Cash,
            hybrid_cash_percentage: 0.0,
            equity_repayment_type: RepaymentType::InterestOnly,
            capitalize_all_interest: false,
        }
    }
}

impl ConstructionConfig {
    /// Whether a construction phase actually runs
    pub fn is_active(&self) -> bool {
        self.months > 0
    }

    /// Fraction of accrued interest added to the loan balances
    pub fn capitalized_fraction(&self) -> f64 {
        if self.capitalize_all_interest {
            return 1.0;
        }
        match self.capitalization_policy {
            CapitalizationPolicy::Debt => 1.0,
            CapitalizationPolicy::Cash => 0.0,
            CapitalizationPolicy::Hybrid => ((100.0 - self.hybrid_cash_percentage) / 100.0).clamp(0.0, 1.0),
        }
    }
}
