//! Running state carried between projection years

use super::amortization::LoanAmortizationState;
use super::construction::ConstructionOutcome;
use crate::assumptions::ProjectionAssumptions;

/// State of the investment at the start of a projection year
#[derive(Debug, Clone)]
pub struct ProjectionState {
    pub main_loan: LoanAmortizationState,

    /// `None` when the scenario has no equity loan, or it opens at zero
    pub equity_loan: Option<LoanAmortizationState>,

    /// Running total of after-tax cash flow, including the construction year
    pub cumulative_cash_flow: f64,

    /// Property value reported for the previous year
    pub prior_property_value: f64,
}

impl ProjectionState {
    /// Initialize state for year 1, using construction balances when a build preceded it
    pub fn opening(assumptions: &ProjectionAssumptions, construction: Option<&ConstructionOutcome>) -> Self {
        let (main_balance, equity_balance) = match construction {
            Some(outcome) => (outcome.main_opening_balance, outcome.equity_opening_balance),
            None => (
                assumptions.main_loan.opening_balance,
                assumptions.equity_loan.as_ref().map_or(0.0, |l| l.opening_balance),
            ),
        };

        Self {
            main_loan: LoanAmortizationState::opening(main_balance),
            equity_loan: (equity_balance > 0.0).then(|| LoanAmortizationState::opening(equity_balance)),
            cumulative_cash_flow: 0.0,
            prior_property_value: assumptions.property_value,
        }
    }

    /// Balance still owing on the equity loan
    pub fn equity_balance(&self) -> f64 {
        self.equity_loan.map_or(0.0, |l| l.balance)
    }
}
