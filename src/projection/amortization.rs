//! Year-at-a-time loan amortization
//!
//! Each loan carries a [`LoanAmortizationState`] through the projection. A year is either
//! interest-only (balance held) or amortizing, where twelve monthly annuity payments are
//! simulated against the months still left on the loan.

use serde::{Deserialize, Serialize};

use crate::assumptions::LoanTerms;

/// Balance and remaining term of one loan, threaded from year to year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanAmortizationState {
    pub balance: f64,

    /// Months left to repay; `None` until the first amortizing year
    pub remaining_amortizing_months: Option<u32>,
}

/// Outcome of advancing a loan by one year
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmortizationStep {
    pub interest_paid: f64,
    /// Interest plus principal actually paid
    pub total_payment: f64,
    pub ending_balance: f64,
    pub interest_only: bool,
    /// State to carry into the next year
    pub next: LoanAmortizationState,
}

impl AmortizationStep {
    pub fn principal_paid(&self) -> f64 {
        self.total_payment - self.interest_paid
    }
}

impl LoanAmortizationState {
    /// State of a loan that has not yet started amortizing
    pub fn opening(balance: f64) -> Self {
        Self {
            balance: balance.max(0.0),
            remaining_amortizing_months: None,
        }
    }

    /// Advance one projection year (1-indexed) for a loan with the given terms
    ///
    /// Must be called once per year in increasing order; the amortizing month counter
    /// is initialized on the first amortizing year and only ever counts down.
    pub fn step(self, terms: &LoanTerms, year: u32, annual_rate_percent: f64) -> AmortizationStep {
        let is_io_year = terms.is_io_year(year);
        let state = if is_io_year || self.remaining_amortizing_months.is_some() {
            self
        } else {
            Self {
                remaining_amortizing_months: Some(terms.amortizing_months()),
                ..self
            }
        };
        state.advance_year(annual_rate_percent, is_io_year)
    }

    /// Advance one year given an explicit interest-only flag
    pub fn advance_year(self, annual_rate_percent: f64, is_io_year: bool) -> AmortizationStep {
        let monthly_rate = annual_rate_percent / 100.0 / 12.0;

        if is_io_year {
            let interest = self.balance * monthly_rate * 12.0;
            return AmortizationStep {
                interest_paid: interest,
                total_payment: interest,
                ending_balance: self.balance,
                interest_only: true,
                next: self,
            };
        }

        let mut balance = self.balance;
        let mut remaining = self.remaining_amortizing_months.unwrap_or(0);
        let mut interest_paid = 0.0;
        let mut total_payment = 0.0;

        if balance > 0.0 && remaining > 0 {
            let payment = monthly_payment(balance, monthly_rate, remaining);

            for _month in 0..12 {
                if balance <= 0.0 || remaining == 0 {
                    break;
                }
                let interest = balance * monthly_rate;
                let principal = (payment - interest).min(balance);

                balance = (balance - principal).max(0.0);
                remaining -= 1;
                interest_paid += interest;
                total_payment += interest + principal;
            }
        } else if balance > 0.0 {
            // Term exhausted with debt outstanding (interest-only period ran to or past the term)
            total_payment = balance;
            balance = 0.0;
        }

        AmortizationStep {
            interest_paid,
            total_payment,
            ending_balance: balance,
            interest_only: false,
            next: LoanAmortizationState {
                balance,
                remaining_amortizing_months: Some(remaining),
            },
        }
    }
}

/// Level monthly payment that clears `balance` over `months`
///
/// Falls back to straight-line repayment when the rate is zero.
pub fn monthly_payment(balance: f64, monthly_rate: f64, months: u32) -> f64 {
    if months == 0 {
        return balance;
    }
    if monthly_rate == 0.0 {
        return balance / months as f64;
    }
    balance * monthly_rate / (1.0 - (1.0 + monthly_rate).powf(-(months as f64)))
}
