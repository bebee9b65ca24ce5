//! Scenario assumptions: property, loans, growth rates, costs and investors

mod resolvable;
mod loan;
mod construction;
mod ownership;
pub mod loader;

pub use resolvable::{Resolvable, resolve_or};
pub use loan::{LoanTerms, RepaymentType};
pub use construction::{CapitalizationPolicy, ConstructionConfig};
pub use ownership::{check_ownership, ownership_total, Investor, OwnershipAllocation};
pub use loader::{load_scenario, load_scenario_dir, DEFAULT_SCENARIO_PATH};

use serde::{Deserialize, Serialize};

/// Fixed annual holding costs in today's dollars
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedCosts {
    pub council_rates: f64,
    pub insurance: f64,
    pub repairs: f64,
}

impl FixedCosts {
    pub fn total(&self) -> f64 {
        self.council_rates + self.insurance + self.repairs
    }
}

/// A single rate applied to both loans from a given year onwards
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterestRateOverride {
    pub annual_rate_percent: f64,
    /// First projection year (1-indexed) the override applies to
    pub effective_from_year: u32,
}

impl InterestRateOverride {
    /// Override rate if it is in effect for `year`
    pub fn rate_for_year(&self, year: u32) -> Option<f64> {
        (year >= self.effective_from_year).then_some(self.annual_rate_percent)
    }
}

/// Complete, immutable input to one projection run
///
/// Every numeric field defaults to zero when missing from a scenario file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionAssumptions {
    /// Property value at settlement
    pub property_value: f64,

    /// Gross rent for a fully let first year
    pub annual_rent: f64,

    pub main_loan: LoanTerms,

    pub equity_loan: Option<LoanTerms>,

    /// Annual capital growth, percent
    pub capital_growth_percent: Option<Resolvable<f64>>,

    /// Annual rental growth, percent
    pub rental_growth_percent: Option<Resolvable<f64>>,

    /// Share of the year the property sits empty, percent
    pub vacancy_percent: Option<Resolvable<f64>>,

    /// Property management fee as a percent of collected rent
    pub management_fee_percent: Option<Resolvable<f64>>,

    pub fixed_costs: FixedCosts,

    /// Annual inflation applied to fixed costs and investor incomes, percent
    pub inflation_percent: f64,

    /// Seed value for the depreciation model (first-year claim or depreciable cost)
    pub depreciation_seed: f64,

    pub construction: Option<ConstructionConfig>,

    pub rate_override: Option<InterestRateOverride>,

    pub investors: Vec<Investor>,

    pub ownership: Vec<OwnershipAllocation>,

    /// Deposit and purchase costs paid from savings; only used for return metrics
    pub upfront_cash_outlay: f64,
}

impl ProjectionAssumptions {
    pub fn capital_growth_rate(&self) -> f64 {
        resolve_or(self.capital_growth_percent.as_ref(), 0.0) / 100.0
    }

    pub fn rental_growth_rate(&self) -> f64 {
        resolve_or(self.rental_growth_percent.as_ref(), 0.0) / 100.0
    }

    pub fn vacancy_rate(&self) -> f64 {
        resolve_or(self.vacancy_percent.as_ref(), 0.0) / 100.0
    }

    pub fn management_fee_rate(&self) -> f64 {
        resolve_or(self.management_fee_percent.as_ref(), 0.0) / 100.0
    }

    pub fn inflation_rate(&self) -> f64 {
        self.inflation_percent / 100.0
    }

    /// Compounded inflation factor for a projection year (1.0 in years 0 and 1)
    pub fn cpi_multiplier(&self, year: u32) -> f64 {
        (1.0 + self.inflation_rate()).powi(year.saturating_sub(1) as i32)
    }

    /// Construction settings, only when a construction phase actually runs
    pub fn active_construction(&self) -> Option<&ConstructionConfig> {
        self.construction.as_ref().filter(|c| c.is_active())
    }
}
