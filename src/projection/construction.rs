//! Pre-completion construction phase
//!
//! While the property is being built it earns no rent, the main loan is interest-only at
//! the construction rate, and accrued interest is either paid in cash or capitalized
//! onto the loans according to the capitalization policy. The phase is reported as a
//! single year-0 record and produces the opening loan balances for year 1.

use log::debug;

use super::amortization::monthly_payment;
use super::yearly::YearProjection;
use crate::assumptions::{ConstructionConfig, LoanTerms, ProjectionAssumptions, RepaymentType};

/// Result of running the construction window
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructionOutcome {
    pub months: u32,

    /// Interest accrued on the main loan over the window
    pub main_interest: f64,

    /// Interest accrued on the equity loan over the window
    pub equity_interest: f64,

    /// Equity loan principal repaid in cash (P&I equity loans only)
    pub equity_principal_paid: f64,

    /// Share of accrued interest added to the loan balances
    pub capitalized_fraction: f64,

    /// Main loan balance entering year 1
    pub main_opening_balance: f64,

    /// Equity loan balance entering year 1
    pub equity_opening_balance: f64,

    pub equity_repayment_type: RepaymentType,
}

impl ConstructionOutcome {
    pub fn total_interest(&self) -> f64 {
        self.main_interest + self.equity_interest
    }

    pub fn capitalized_interest(&self) -> f64 {
        self.total_interest() * self.capitalized_fraction
    }

    /// Interest paid out of pocket during the build
    pub fn interest_cash_paid(&self) -> f64 {
        self.total_interest() * (1.0 - self.capitalized_fraction)
    }

    /// All cash paid during the build: uncapitalized interest plus equity principal
    pub fn total_cash_paid(&self) -> f64 {
        self.interest_cash_paid() + self.equity_principal_paid
    }

    /// Construction-period loss claimed against the investors' incomes
    ///
    /// Every dollar of accrued interest is treated as deductible. Interest attributable to
    /// the land portion is not separated out, so this overstates the deduction when the
    /// land component is material.
    pub fn taxable_loss(&self) -> f64 {
        -self.total_interest()
    }

    /// Synthetic year-0 row for the construction window
    pub fn year_zero(&self, property_value: f64, tax_benefit: f64) -> YearProjection {
        let uncapitalized = 1.0 - self.capitalized_fraction;
        let after_tax_cash_flow = -self.total_cash_paid() + tax_benefit;

        YearProjection {
            year: 0,
            rental_income: 0.0,
            property_value,
            main_loan_balance: self.main_opening_balance,
            equity_loan_balance: self.equity_opening_balance,
            total_interest: self.total_interest(),
            main_loan_payment: self.main_interest * uncapitalized,
            equity_loan_payment: self.equity_interest * uncapitalized + self.equity_principal_paid,
            main_interest_year: self.main_interest,
            equity_interest_year: self.equity_interest,
            main_loan_io_status: RepaymentType::InterestOnly,
            equity_loan_io_status: (self.equity_opening_balance > 0.0 || self.equity_interest > 0.0)
                .then_some(self.equity_repayment_type),
            other_expenses: 0.0,
            depreciation: 0.0,
            taxable_income: self.taxable_loss(),
            tax_benefit,
            after_tax_cash_flow,
            cumulative_cash_flow: after_tax_cash_flow,
            property_equity: property_value - self.main_opening_balance - self.equity_opening_balance,
            total_return: after_tax_cash_flow,
        }
    }
}

/// Run the construction window, if the scenario has one
pub fn run_construction_phase(assumptions: &ProjectionAssumptions) -> Option<ConstructionOutcome> {
    let config = assumptions.active_construction()?;
    let outcome = calculate(config, &assumptions.main_loan, assumptions.equity_loan.as_ref());
    debug!(
        "construction: {} months, interest {:.2}, capitalized {:.2}, cash {:.2}",
        outcome.months,
        outcome.total_interest(),
        outcome.capitalized_interest(),
        outcome.total_cash_paid()
    );
    Some(outcome)
}

/// Accrue interest on both loans over the construction window
pub fn calculate(
    config: &ConstructionConfig,
    main_loan: &LoanTerms,
    equity_loan: Option<&LoanTerms>,
) -> ConstructionOutcome {
    let months = config.months.max(0) as u32;
    let fraction = config.capitalized_fraction();

    let main_balance = main_loan.opening_balance.max(0.0);
    let construction_rate = config.construction_interest_rate_percent / 100.0 / 12.0;
    let main_interest = main_balance * construction_rate * months as f64;

    let (equity_interest, equity_principal_paid, equity_balance) = match equity_loan {
        Some(loan) if loan.opening_balance > 0.0 => {
            accrue_equity_loan(loan, config.equity_repayment_type, months)
        }
        _ => (0.0, 0.0, 0.0),
    };

    ConstructionOutcome {
        months,
        main_interest,
        equity_interest,
        equity_principal_paid,
        capitalized_fraction: fraction,
        main_opening_balance: main_balance + main_interest * fraction,
        equity_opening_balance: equity_balance + equity_interest * fraction,
        equity_repayment_type: config.equity_repayment_type,
    }
}

/// Returns (interest accrued, principal repaid, balance at the end of the window)
fn accrue_equity_loan(loan: &LoanTerms, repayment_type: RepaymentType, months: u32) -> (f64, f64, f64) {
    let monthly_rate = loan.annual_rate_percent / 100.0 / 12.0;
    let opening = loan.opening_balance;

    match repayment_type {
        RepaymentType::InterestOnly => (opening * monthly_rate * months as f64, 0.0, opening),
        RepaymentType::PrincipalAndInterest => {
            // Repayments are sized for the full loan term, not just the build
            let payment = monthly_payment(opening, monthly_rate, loan.term_years.saturating_mul(12));
            let mut balance = opening;
            let mut interest_total = 0.0;
            let mut principal_total = 0.0;

            for _month in 0..months {
                if balance <= 0.0 {
                    break;
                }
                let interest = balance * monthly_rate;
                let principal = (payment - interest).min(balance).max(0.0);
                balance -= principal;
                interest_total += interest;
                principal_total += principal;
            }

            (interest_total, principal_total, balance.max(0.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::CapitalizationPolicy;
    use approx::assert_abs_diff_eq;

    fn config(policy: CapitalizationPolicy) -> ConstructionConfig {
        ConstructionConfig {
            months: 12,
            construction_interest_rate_percent: 6.0,
            capitalization_policy: policy,
            hybrid_cash_percentage: 25.0,
            equity_repayment_type: RepaymentType::InterestOnly,
            capitalize_all_interest: false,
        }
    }

    fn main_loan() -> LoanTerms {
        LoanTerms::interest_only(500_000.0, 6.5, 30, 5)
    }

    #[test]
    fn test_debt_policy_capitalizes_everything() {
        let outcome = calculate(&config(CapitalizationPolicy::Debt), &main_loan(), None);

        assert_abs_diff_eq!(outcome.main_interest, 30_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(outcome.main_opening_balance, 530_000.0, epsilon = 1e-6);
        assert_eq!(outcome.interest_cash_paid(), 0.0);
        assert_eq!(outcome.total_cash_paid(), 0.0);
    }

    #[test]
    fn test_cash_policy_keeps_balances() {
        let outcome = calculate(&config(CapitalizationPolicy::Cash), &main_loan(), None);

        assert_eq!(outcome.main_opening_balance, 500_000.0);
        assert_abs_diff_eq!(outcome.total_cash_paid(), 30_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_hybrid_policy_splits_interest() {
        let outcome = calculate(&config(CapitalizationPolicy::Hybrid), &main_loan(), None);

        // 25% paid in cash, 75% capitalized
        assert_abs_diff_eq!(outcome.interest_cash_paid(), 7_500.0, epsilon = 1e-6);
        assert_abs_diff_eq!(outcome.main_opening_balance, 522_500.0, epsilon = 1e-6);
    }

    #[test]
    fn test_equity_io_uses_own_rate() {
        let equity = LoanTerms::interest_only(100_000.0, 7.2, 30, 5);
        let outcome = calculate(&config(CapitalizationPolicy::Debt), &main_loan(), Some(&equity));

        assert_abs_diff_eq!(outcome.equity_interest, 7_200.0, epsilon = 1e-6);
        assert_abs_diff_eq!(outcome.equity_opening_balance, 107_200.0, epsilon = 1e-6);
        assert_eq!(outcome.equity_principal_paid, 0.0);
    }

    #[test]
    fn test_equity_pi_pays_principal_in_cash() {
        let equity = LoanTerms::principal_and_interest(100_000.0, 6.0, 30);
        let mut cfg = config(CapitalizationPolicy::Debt);
        cfg.equity_repayment_type = RepaymentType::PrincipalAndInterest;

        let outcome = calculate(&cfg, &main_loan(), Some(&equity));

        // Full-term payment is ~$599.55/month, so roughly $1,228 of principal in year one
        let payment = monthly_payment(100_000.0, 0.005, 360);
        assert_abs_diff_eq!(
            outcome.equity_interest + outcome.equity_principal_paid,
            payment * 12.0,
            epsilon = 1e-6
        );
        assert!(outcome.equity_principal_paid > 1_200.0 && outcome.equity_principal_paid < 1_250.0);
        assert!(outcome.equity_interest < 6_000.0);

        // Interest capitalized, principal still comes out of pocket
        assert_abs_diff_eq!(
            outcome.equity_opening_balance,
            100_000.0 - outcome.equity_principal_paid + outcome.equity_interest,
            epsilon = 1e-6
        );
        assert_abs_diff_eq!(outcome.total_cash_paid(), outcome.equity_principal_paid, epsilon = 1e-9);
    }

    #[test]
    fn test_equity_pi_with_absurd_term_accrues_like_interest_only() {
        let equity = LoanTerms::principal_and_interest(100_000.0, 6.0, u32::MAX);
        let mut cfg = config(CapitalizationPolicy::Cash);
        cfg.equity_repayment_type = RepaymentType::PrincipalAndInterest;

        let outcome = calculate(&cfg, &main_loan(), Some(&equity));
        assert_abs_diff_eq!(outcome.equity_principal_paid, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(outcome.equity_interest, 6_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_year_zero_row() {
        let equity = LoanTerms::interest_only(100_000.0, 6.0, 30, 5);
        let outcome = calculate(&config(CapitalizationPolicy::Cash), &main_loan(), Some(&equity));
        let row = outcome.year_zero(800_000.0, 12_000.0);

        assert_eq!(row.year, 0);
        assert_abs_diff_eq!(row.taxable_income, -36_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(row.after_tax_cash_flow, -36_000.0 + 12_000.0, epsilon = 1e-6);
        assert_eq!(row.cumulative_cash_flow, row.after_tax_cash_flow);
        assert_abs_diff_eq!(row.property_equity, 200_000.0, epsilon = 1e-6);
        assert_eq!(row.equity_loan_io_status, Some(RepaymentType::InterestOnly));
    }

    #[test]
    fn test_inactive_config_skips_phase() {
        let assumptions = ProjectionAssumptions {
            main_loan: main_loan(),
            construction: Some(ConstructionConfig {
                months: 0,
                ..config(CapitalizationPolicy::Debt)
            }),
            ..Default::default()
        };
        assert!(run_construction_phase(&assumptions).is_none());
    }
}
