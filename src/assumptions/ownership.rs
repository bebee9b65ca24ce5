//! Investors and their ownership shares of the property

use log::warn;
use serde::{Deserialize, Serialize};

/// A household member whose personal tax position absorbs a share of the property result
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Investor {
    pub id: String,
    /// Salary or wage income (today's dollars)
    pub annual_income: f64,
    /// Any other assessable income (today's dollars)
    pub other_income: f64,
    pub has_medicare_levy: bool,
}

impl Investor {
    pub fn new(id: impl Into<String>, annual_income: f64, other_income: f64, has_medicare_levy: bool) -> Self {
        Self {
            id: id.into(),
            annual_income,
            other_income,
            has_medicare_levy,
        }
    }

    /// Base taxable income before the property result
    pub fn base_income(&self) -> f64 {
        self.annual_income + self.other_income
    }
}

/// Share of the property held by one investor
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OwnershipAllocation {
    pub investor_id: String,
    /// Ownership in percent (50.0 = half)
    pub percentage: f64,
}

impl OwnershipAllocation {
    pub fn new(investor_id: impl Into<String>, percentage: f64) -> Self {
        Self {
            investor_id: investor_id.into(),
            percentage,
        }
    }
}

/// Sum of all ownership percentages
pub fn ownership_total(allocations: &[OwnershipAllocation]) -> f64 {
    allocations.iter().map(|a| a.percentage).sum()
}

/// Warn when a scenario's ownership does not add up to 100%
///
/// Percentages are never rescaled; an empty list is accepted. Returns whether the total is 100.
pub fn check_ownership(scenario: &str, allocations: &[OwnershipAllocation]) -> bool {
    if allocations.is_empty() {
        return true;
    }
    let total = ownership_total(allocations);
    let balanced = (total - 100.0).abs() <= 1e-6;
    if !balanced {
        warn!("scenario {}: ownership totals {:.2}%, not 100%", scenario, total);
    }
    balanced
}
