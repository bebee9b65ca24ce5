//! Yearly projection output structures

use serde::{Deserialize, Serialize};

use super::irr::calculate_irr;
use crate::assumptions::RepaymentType;

/// A single row of projection output for one year
///
/// Year 0 is the construction window when the scenario has one; operating years run from 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearProjection {
    // Timing
    pub year: u32,

    // Property
    pub rental_income: f64,
    pub property_value: f64,

    // Loans (balances at end of year)
    pub main_loan_balance: f64,
    pub equity_loan_balance: f64,
    pub total_interest: f64,
    pub main_loan_payment: f64,
    pub equity_loan_payment: f64,
    pub main_interest_year: f64,
    pub equity_interest_year: f64,
    pub main_loan_io_status: RepaymentType,
    /// `None` when there is no equity loan
    pub equity_loan_io_status: Option<RepaymentType>,

    // Expenses and tax
    pub other_expenses: f64,
    pub depreciation: f64,
    pub taxable_income: f64,
    pub tax_benefit: f64,

    // Summary
    pub after_tax_cash_flow: f64,
    pub cumulative_cash_flow: f64,
    pub property_equity: f64,
    pub total_return: f64,
}

impl YearProjection {
    /// After-tax cash flow expressed per week
    pub fn weekly_cash_flow(&self) -> f64 {
        self.after_tax_cash_flow / 52.0
    }

    /// Combined loan balance
    pub fn total_debt(&self) -> f64 {
        self.main_loan_balance + self.equity_loan_balance
    }

    /// Loan-to-value ratio, percent
    pub fn lvr(&self) -> f64 {
        if self.property_value <= 0.0 {
            0.0
        } else {
            self.total_debt() / self.property_value * 100.0
        }
    }
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Yearly rows in ascending year order
    pub years: Vec<YearProjection>,

    /// Property value at settlement
    pub initial_property_value: f64,

    /// Cash the investors put in up front
    pub upfront_cash_outlay: f64,
}

impl ProjectionResult {
    pub fn new(initial_property_value: f64, upfront_cash_outlay: f64) -> Self {
        Self {
            years: Vec::new(),
            initial_property_value,
            upfront_cash_outlay,
        }
    }

    /// Add a yearly row
    pub fn add_row(&mut self, row: YearProjection) {
        self.years.push(row);
    }

    /// Row for a given year, if projected
    pub fn year(&self, year: u32) -> Option<&YearProjection> {
        self.years.iter().find(|r| r.year == year)
    }

    /// The year-0 construction row, if any
    pub fn construction_year(&self) -> Option<&YearProjection> {
        self.years.first().filter(|r| r.year == 0)
    }

    /// Rows from year 1 onwards
    pub fn operating_years(&self) -> &[YearProjection] {
        match self.construction_year() {
            Some(_) => &self.years[1..],
            None => &self.years,
        }
    }

    /// Rows with `from <= year <= to` for display; the full series is always computed
    pub fn slice(&self, from: u32, to: u32) -> &[YearProjection] {
        let start = self.years.partition_point(|r| r.year < from);
        let end = self.years.partition_point(|r| r.year <= to).max(start);
        &self.years[start..end]
    }

    /// Equity held at the end of `year`
    pub fn equity_at(&self, year: u32) -> Option<f64> {
        self.year(year).map(|r| r.property_equity)
    }

    /// Sum of tax benefits across every projected year, including construction
    pub fn cumulative_tax_savings(&self) -> f64 {
        self.years.iter().map(|r| r.tax_benefit).sum()
    }

    /// Annual cash flows for IRR: outlay, then each operating year's after-tax cash flow,
    /// with the construction year folded into year 1 and final equity realized in the last year
    pub fn investment_cash_flows(&self) -> Vec<f64> {
        let operating = self.operating_years();
        if operating.is_empty() {
            return Vec::new();
        }

        let mut flows = Vec::with_capacity(operating.len() + 1);
        flows.push(-self.upfront_cash_outlay);
        flows.extend(operating.iter().map(|r| r.after_tax_cash_flow));

        if let Some(construction) = self.construction_year() {
            flows[1] += construction.after_tax_cash_flow;
        }
        if let (Some(last_flow), Some(last_row)) = (flows.last_mut(), operating.last()) {
            *last_flow += last_row.property_equity;
        }
        flows
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let first = self.operating_years().first();
        let last = self.years.last();

        let total_return: f64 = self.years.iter().map(|r| r.total_return).sum();
        let total_roi = if self.upfront_cash_outlay > 0.0 {
            Some(total_return / self.upfront_cash_outlay * 100.0)
        } else {
            None
        };
        let gross_rental_yield = match first {
            Some(row) if self.initial_property_value > 0.0 => {
                row.rental_income / self.initial_property_value * 100.0
            }
            _ => 0.0,
        };
        let irr = if self.upfront_cash_outlay > 0.0 {
            calculate_irr(&self.investment_cash_flows())
        } else {
            None
        };

        ProjectionSummary {
            horizon_years: self.operating_years().len() as u32,
            weekly_cash_flow_year_1: first.map_or(0.0, YearProjection::weekly_cash_flow),
            cumulative_tax_savings: self.cumulative_tax_savings(),
            final_equity: last.map_or(0.0, |r| r.property_equity),
            final_cumulative_cash_flow: last.map_or(0.0, |r| r.cumulative_cash_flow),
            total_return,
            gross_rental_yield,
            total_roi,
            irr,
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub horizon_years: u32,
    pub weekly_cash_flow_year_1: f64,
    pub cumulative_tax_savings: f64,
    pub final_equity: f64,
    pub final_cumulative_cash_flow: f64,
    /// Sum of cash flow plus capital growth over the horizon
    pub total_return: f64,
    /// Year-1 rent over purchase price, percent
    pub gross_rental_yield: f64,
    /// Total return over upfront outlay, percent
    pub total_roi: Option<f64>,
    /// Annual internal rate of return on the upfront outlay
    pub irr: Option<f64>,
}
