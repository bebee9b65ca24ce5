//! Loan terms for the main and equity loans

use serde::{Deserialize, Serialize};

/// How a loan is repaid once it is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RepaymentType {
    /// Interest-only for the first `io_years`, then principal and interest
    #[serde(rename = "IO", alias = "io", alias = "interest_only")]
    InterestOnly,
    /// Principal and interest from the first year
    #[default]
    #[serde(rename = "P&I", alias = "pi", alias = "principal_and_interest")]
    PrincipalAndInterest,
}

/// Static terms of one loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanTerms {
    /// Balance drawn at settlement (before any capitalized construction interest)
    pub opening_balance: f64,

    /// Annual interest rate in percent (6.0 = 6%)
    pub annual_rate_percent: f64,

    /// Full loan term in years, including any interest-only period
    pub term_years: u32,

    pub repayment_type: RepaymentType,

    /// Length of the interest-only period; ignored for P&I loans
    pub io_years: u32,
}

impl Default for LoanTerms {
    fn default() -> Self {
        Self {
            opening_balance: 0.0,
            annual_rate_percent: 0.0,
            term_years: 30,
            repayment_type: RepaymentType::PrincipalAndInterest,
            io_years: 0,
        }
    }
}

impl LoanTerms {
    pub fn principal_and_interest(opening_balance: f64, annual_rate_percent: f64, term_years: u32) -> Self {
        Self {
            opening_balance,
            annual_rate_percent,
            term_years,
            repayment_type: RepaymentType::PrincipalAndInterest,
            io_years: 0,
        }
    }

    pub fn interest_only(
        opening_balance: f64,
        annual_rate_percent: f64,
        term_years: u32,
        io_years: u32,
    ) -> Self {
        Self {
            opening_balance,
            annual_rate_percent,
            term_years,
            repayment_type: RepaymentType::InterestOnly,
            io_years,
        }
    }

    /// Interest-only years actually in effect (0 for P&I loans)
    pub fn effective_io_years(&self) -> u32 {
        match self.repayment_type {
            RepaymentType::InterestOnly => self.io_years,
            RepaymentType::PrincipalAndInterest => 0,
        }
    }

    /// Whether the given projection year (1-indexed) is an interest-only year
    pub fn is_io_year(&self, year: u32) -> bool {
        self.repayment_type == RepaymentType::InterestOnly && year <= self.io_years
    }

    /// Months left to amortize once the interest-only period ends
    pub fn amortizing_months(&self) -> u32 {
        self.term_years.saturating_sub(self.effective_io_years()).saturating_mul(12)
    }
}
