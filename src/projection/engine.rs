//! Core projection engine for yearly property cash flow projections

use log::{debug, info, warn};

use super::construction::{run_construction_phase, ConstructionOutcome};
use super::depreciation::DepreciationModel;
use super::state::ProjectionState;
use super::yearly::{ProjectionResult, YearProjection};
use crate::assumptions::{ProjectionAssumptions, RepaymentType};
use crate::tax::{IncomeTax, TaxAggregator, TaxSchedule};

/// Configuration for a projection run
///
/// No default: the depreciation model and the horizon are chosen together by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionConfig {
    /// Depreciation strategy
    pub depreciation: DepreciationModel,

    /// Number of operating years to project (the construction year is extra)
    pub horizon_years: u32,
}

impl ProjectionConfig {
    /// Use a depreciation model with its customary horizon
    pub fn new(depreciation: DepreciationModel) -> Self {
        Self {
            horizon_years: depreciation.default_horizon(),
            depreciation,
        }
    }

    /// 40-year projection with diminishing seed-based depreciation
    pub fn diminishing_seed() -> Self {
        Self::new(DepreciationModel::diminishing_seed())
    }

    /// 30-year projection with building/plant split depreciation
    pub fn building_plant_split() -> Self {
        Self::new(DepreciationModel::building_plant_split())
    }

    pub fn with_horizon(mut self, horizon_years: u32) -> Self {
        self.horizon_years = horizon_years;
        self
    }
}

/// Main projection engine
///
/// Stateless between runs: every call to [`ProjectionEngine::project`] starts from the
/// assumptions alone, so one engine can serve many scenarios, including from several threads.
#[derive(Debug, Clone)]
pub struct ProjectionEngine<T: IncomeTax = TaxSchedule> {
    config: ProjectionConfig,
    tax: TaxAggregator<T>,
}

impl ProjectionEngine {
    /// Create an engine using the Australian resident tax schedule
    pub fn new(config: ProjectionConfig) -> Self {
        Self::with_tax(config, TaxSchedule::australian_resident())
    }
}

impl<T: IncomeTax> ProjectionEngine<T> {
    /// Create an engine with a specific income tax implementation
    pub fn with_tax(config: ProjectionConfig, tax: T) -> Self {
        Self {
            config,
            tax: TaxAggregator::new(tax),
        }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Run the full projection: optional construction year, then every operating year
    pub fn project(&self, assumptions: &ProjectionAssumptions) -> ProjectionResult {
        let mut result = ProjectionResult::new(assumptions.property_value, assumptions.upfront_cash_outlay);

        if assumptions.construction.is_some() && assumptions.active_construction().is_none() {
            warn!("construction configured with no months; projecting without a construction phase");
        }

        let construction = run_construction_phase(assumptions);
        info!(
            "projecting {} years{}",
            self.config.horizon_years,
            if construction.is_some() { " after construction" } else { "" }
        );

        let mut state = ProjectionState::opening(assumptions, construction.as_ref());

        if let Some(outcome) = &construction {
            let row = self.construction_year(assumptions, outcome);
            state.cumulative_cash_flow = row.cumulative_cash_flow;
            result.add_row(row);
        }

        for year in 1..=self.config.horizon_years {
            let row = self.project_year(assumptions, &mut state, year);
            debug!(
                "year {}: cash flow {:.2}, cumulative {:.2}, equity {:.2}",
                row.year, row.after_tax_cash_flow, row.cumulative_cash_flow, row.property_equity
            );
            result.add_row(row);
        }

        result
    }

    /// Year-0 row for the construction window; its loss is priced at base incomes
    fn construction_year(&self, assumptions: &ProjectionAssumptions, outcome: &ConstructionOutcome) -> YearProjection {
        let year_tax = self.tax.compute_year_tax(
            outcome.taxable_loss(),
            &assumptions.investors,
            &assumptions.ownership,
            assumptions.cpi_multiplier(0),
        );
        outcome.year_zero(assumptions.property_value, year_tax.tax_benefit)
    }

    /// Calculate one operating year and advance the loan states
    fn project_year(&self, assumptions: &ProjectionAssumptions, state: &mut ProjectionState, year: u32) -> YearProjection {
        let growth_years = (year - 1) as i32;
        let cpi = assumptions.cpi_multiplier(year);

        // Income and value
        let rental_income = assumptions.annual_rent
            * (1.0 + assumptions.rental_growth_rate()).powi(growth_years)
            * (1.0 - assumptions.vacancy_rate());
        let property_value = assumptions.property_value * (1.0 + assumptions.capital_growth_rate()).powi(growth_years);

        // Loans
        let rate_override = assumptions.rate_override.and_then(|o| o.rate_for_year(year));

        let main_rate = rate_override.unwrap_or(assumptions.main_loan.annual_rate_percent);
        let main = state.main_loan.step(&assumptions.main_loan, year, main_rate);
        state.main_loan = main.next;

        let equity = match (state.equity_loan, assumptions.equity_loan.as_ref()) {
            (Some(loan_state), Some(terms)) => {
                let rate = rate_override.unwrap_or(terms.annual_rate_percent);
                let step = loan_state.step(terms, year, rate);
                state.equity_loan = Some(step.next);
                Some(step)
            }
            _ => None,
        };

        let main_interest = main.interest_paid;
        let equity_interest = equity.map_or(0.0, |s| s.interest_paid);
        let main_payment = main.total_payment;
        let equity_payment = equity.map_or(0.0, |s| s.total_payment);
        let total_interest = main_interest + equity_interest;

        // Expenses
        let other_expenses =
            rental_income * assumptions.management_fee_rate() + assumptions.fixed_costs.total() * cpi;
        let depreciation = self.config.depreciation.for_year(assumptions.depreciation_seed, year);

        // Tax
        let taxable_income = rental_income - total_interest - other_expenses - depreciation;
        let year_tax = self
            .tax
            .compute_year_tax(taxable_income, &assumptions.investors, &assumptions.ownership, cpi);
        let tax_benefit = year_tax.tax_benefit;

        // Cash flow and returns
        let after_tax_cash_flow = rental_income - other_expenses - (main_payment + equity_payment) + tax_benefit;
        state.cumulative_cash_flow += after_tax_cash_flow;

        let main_balance = state.main_loan.balance;
        let equity_balance = state.equity_balance();
        let property_equity = property_value - main_balance - equity_balance;
        let total_return = after_tax_cash_flow + (property_value - state.prior_property_value);

        state.prior_property_value = property_value;

        YearProjection {
            year,
            rental_income,
            property_value,
            main_loan_balance: main_balance,
            equity_loan_balance: equity_balance,
            total_interest,
            main_loan_payment: main_payment,
            equity_loan_payment: equity_payment,
            main_interest_year: main_interest,
            equity_interest_year: equity_interest,
            main_loan_io_status: repayment_status(main.interest_only),
            equity_loan_io_status: equity.map(|s| repayment_status(s.interest_only)),
            other_expenses,
            depreciation,
            taxable_income,
            tax_benefit,
            after_tax_cash_flow,
            cumulative_cash_flow: state.cumulative_cash_flow,
            property_equity,
            total_return,
        }
    }
}

fn repayment_status(interest_only: bool) -> RepaymentType {
    if interest_only {
        RepaymentType::InterestOnly
    } else {
        RepaymentType::PrincipalAndInterest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::{
        CapitalizationPolicy, ConstructionConfig, FixedCosts, InterestRateOverride, Investor, LoanTerms,
        OwnershipAllocation, Resolvable,
    };
    use approx::assert_abs_diff_eq;
    use crate::projection::monthly_payment;

    fn test_assumptions() -> ProjectionAssumptions {
        ProjectionAssumptions {
            property_value: 625_000.0,
            annual_rent: 31_200.0,
            main_loan: LoanTerms::interest_only(500_000.0, 6.0, 30, 5),
            equity_loan: None,
            capital_growth_percent: Some(Resolvable::Auto(5.0)),
            rental_growth_percent: Some(Resolvable::Manual(3.0)),
            vacancy_percent: Some(Resolvable::Auto(2.0)),
            management_fee_percent: Some(Resolvable::Auto(7.0)),
            fixed_costs: FixedCosts {
                council_rates: 2_000.0,
                insurance: 1_200.0,
                repairs: 800.0,
            },
            inflation_percent: 3.0,
            depreciation_seed: 8_000.0,
            construction: None,
            rate_override: None,
            investors: vec![Investor::new("a", 90_000.0, 0.0, true)],
            ownership: vec![OwnershipAllocation::new("a", 100.0)],
            upfront_cash_outlay: 150_000.0,
        }
    }

    fn construction_assumptions(policy: CapitalizationPolicy) -> ProjectionAssumptions {
        ProjectionAssumptions {
            equity_loan: Some(LoanTerms::principal_and_interest(120_000.0, 6.5, 30)),
            construction: Some(ConstructionConfig {
                months: 10,
                construction_interest_rate_percent: 6.8,
                capitalization_policy: policy,
                hybrid_cash_percentage: 50.0,
                equity_repayment_type: RepaymentType::InterestOnly,
                capitalize_all_interest: false,
            }),
            ..test_assumptions()
        }
    }

    fn engine() -> ProjectionEngine {
        ProjectionEngine::new(ProjectionConfig::diminishing_seed())
    }

    #[test]
    fn test_projection_runs_full_horizon() {
        let result = engine().project(&test_assumptions());

        assert_eq!(result.years.len(), 40);
        assert_eq!(result.years[0].year, 1);
        assert_eq!(result.years[39].year, 40);
        assert!(result.construction_year().is_none());
    }

    #[test]
    fn test_year_one_figures() {
        let a = test_assumptions();
        let result = engine().project(&a);
        let y1 = &result.years[0];

        assert_abs_diff_eq!(y1.rental_income, 31_200.0 * 0.98, epsilon = 1e-6);
        assert_eq!(y1.property_value, 625_000.0);
        assert_abs_diff_eq!(y1.main_interest_year, 30_000.0, epsilon = 1e-6);
        assert_eq!(y1.main_loan_balance, 500_000.0);
        assert_eq!(y1.main_loan_io_status, RepaymentType::InterestOnly);
        assert_eq!(y1.equity_loan_io_status, None);
        assert_abs_diff_eq!(y1.other_expenses, 31_200.0 * 0.98 * 0.07 + 4_000.0, epsilon = 1e-6);
        assert_eq!(y1.depreciation, 8_000.0);
        assert_abs_diff_eq!(
            y1.taxable_income,
            y1.rental_income - 30_000.0 - y1.other_expenses - 8_000.0,
            epsilon = 1e-6
        );
        assert!(y1.tax_benefit > 0.0);
        assert_abs_diff_eq!(
            y1.after_tax_cash_flow,
            y1.rental_income - y1.other_expenses - y1.main_loan_payment + y1.tax_benefit,
            epsilon = 1e-6
        );
        // No appreciation counted in the first year
        assert_abs_diff_eq!(y1.total_return, y1.after_tax_cash_flow, epsilon = 1e-9);
    }

    #[test]
    fn test_growth_and_inflation_compound() {
        let result = engine().project(&test_assumptions());
        let y3 = result.year(3).unwrap();

        assert_abs_diff_eq!(y3.property_value, 625_000.0 * 1.05_f64.powi(2), epsilon = 1e-6);
        assert_abs_diff_eq!(y3.rental_income, 31_200.0 * 1.03_f64.powi(2) * 0.98, epsilon = 1e-6);
        assert_abs_diff_eq!(
            y3.other_expenses,
            y3.rental_income * 0.07 + 4_000.0 * 1.03_f64.powi(2),
            epsilon = 1e-6
        );
        let y2 = result.year(2).unwrap();
        assert_abs_diff_eq!(
            y3.total_return,
            y3.after_tax_cash_flow + (y3.property_value - y2.property_value),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_main_loan_switches_to_pi_after_io_term() {
        let result = engine().project(&test_assumptions());

        for row in result.slice(1, 5) {
            assert_eq!(row.main_loan_io_status, RepaymentType::InterestOnly);
            assert_eq!(row.main_loan_balance, 500_000.0);
        }
        let mut previous = 500_000.0;
        for row in result.slice(6, 30) {
            assert_eq!(row.main_loan_io_status, RepaymentType::PrincipalAndInterest);
            assert!(row.main_loan_balance < previous || previous == 0.0);
            previous = row.main_loan_balance;
        }
        assert!(result.year(30).unwrap().main_loan_balance <= 1.0);
        for row in result.slice(31, 40) {
            assert!(row.main_loan_balance <= 1.0);
        }
    }

    #[test]
    fn test_cumulative_and_equity_invariants() {
        for assumptions in [test_assumptions(), construction_assumptions(CapitalizationPolicy::Hybrid)] {
            let result = engine().project(&assumptions);

            let mut running = 0.0;
            for row in &result.years {
                running += row.after_tax_cash_flow;
                assert_abs_diff_eq!(row.cumulative_cash_flow, running, epsilon = 1e-6);
                assert_abs_diff_eq!(
                    row.property_equity,
                    row.property_value - row.main_loan_balance - row.equity_loan_balance,
                    epsilon = 1e-6
                );
            }
        }
    }

    #[test]
    fn test_construction_year_emitted_first() {
        let result = engine().project(&construction_assumptions(CapitalizationPolicy::Cash));

        assert_eq!(result.years.len(), 41);
        let y0 = result.construction_year().expect("year 0");
        assert_eq!(y0.rental_income, 0.0);

        let main_interest = 500_000.0 * 0.068 / 12.0 * 10.0;
        let equity_interest = 120_000.0 * 0.065 / 12.0 * 10.0;
        assert_abs_diff_eq!(y0.taxable_income, -(main_interest + equity_interest), epsilon = 1e-6);
        assert_abs_diff_eq!(
            y0.after_tax_cash_flow,
            -(main_interest + equity_interest) + y0.tax_benefit,
            epsilon = 1e-6
        );
        assert!(y0.tax_benefit > 0.0);
        assert_eq!(result.years[1].year, 1);
        assert_eq!(result.years[1].main_loan_balance, 500_000.0);
    }

    #[test]
    fn test_debt_capitalization_feeds_opening_balances() {
        let result = engine().project(&construction_assumptions(CapitalizationPolicy::Debt));
        let y0 = result.construction_year().unwrap();

        let main_interest = 500_000.0 * 0.068 / 12.0 * 10.0;
        assert_abs_diff_eq!(y0.main_loan_balance, 500_000.0 + main_interest, epsilon = 1e-6);
        assert_eq!(y0.main_loan_payment, 0.0);
        assert_eq!(y0.equity_loan_payment, 0.0);
        // Only the tax benefit remains in the year-0 cash flow
        assert_abs_diff_eq!(y0.after_tax_cash_flow, y0.tax_benefit, epsilon = 1e-9);

        // Year 1 is interest-only on the capitalized balance
        let y1 = result.year(1).unwrap();
        assert_abs_diff_eq!(y1.main_loan_balance, 500_000.0 + main_interest, epsilon = 1e-6);
        assert_abs_diff_eq!(y1.main_interest_year, (500_000.0 + main_interest) * 0.06, epsilon = 1e-6);
        assert_eq!(y1.equity_loan_io_status, Some(RepaymentType::PrincipalAndInterest));
    }

    #[test]
    fn test_rate_override_applies_from_effective_year() {
        let mut assumptions = test_assumptions();
        assumptions.rate_override = Some(InterestRateOverride {
            annual_rate_percent: 8.0,
            effective_from_year: 3,
        });
        let result = engine().project(&assumptions);

        assert_abs_diff_eq!(result.year(2).unwrap().main_interest_year, 30_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(result.year(3).unwrap().main_interest_year, 40_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(result.year(5).unwrap().main_interest_year, 40_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_rate_override_reprices_both_loans() {
        let mut assumptions = test_assumptions();
        assumptions.main_loan = LoanTerms::principal_and_interest(400_000.0, 6.0, 30);
        assumptions.equity_loan = Some(LoanTerms::interest_only(100_000.0, 7.0, 30, 10));
        assumptions.rate_override = Some(InterestRateOverride {
            annual_rate_percent: 9.0,
            effective_from_year: 2,
        });
        let result = engine().project(&assumptions);
        let y1 = result.year(1).unwrap();
        let y2 = result.year(2).unwrap();

        assert_abs_diff_eq!(y1.equity_interest_year, 7_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(y2.equity_interest_year, 9_000.0, epsilon = 1e-6);
        assert_eq!(y2.equity_loan_io_status, Some(RepaymentType::InterestOnly));

        assert_abs_diff_eq!(
            y1.main_loan_payment,
            monthly_payment(400_000.0, 0.06 / 12.0, 360) * 12.0,
            epsilon = 1e-6
        );
        // Annuity is re-sized on the remaining term at the override rate
        let repriced = monthly_payment(y1.main_loan_balance, 0.09 / 12.0, 348) * 12.0;
        assert_abs_diff_eq!(y2.main_loan_payment, repriced, epsilon = 1e-6);
        assert!(y2.main_loan_payment > y1.main_loan_payment);
    }

    #[test]
    fn test_horizon_follows_chosen_model() {
        let split = ProjectionEngine::new(ProjectionConfig::building_plant_split()).project(&test_assumptions());
        assert_eq!(split.years.len(), 30);

        let short = ProjectionEngine::new(ProjectionConfig::diminishing_seed().with_horizon(10))
            .project(&test_assumptions());
        assert_eq!(short.years.len(), 10);
        assert_abs_diff_eq!(short.year(2).unwrap().depreciation, 7_600.0, epsilon = 1e-9);
    }

    #[test]
    fn test_projection_is_idempotent() {
        let assumptions = construction_assumptions(CapitalizationPolicy::Hybrid);
        let engine = engine();
        assert_eq!(engine.project(&assumptions), engine.project(&assumptions));
    }

    #[test]
    fn test_zero_months_construction_is_ignored() {
        let mut assumptions = construction_assumptions(CapitalizationPolicy::Debt);
        if let Some(construction) = assumptions.construction.as_mut() {
            construction.months = 0;
        }
        let result = engine().project(&assumptions);
        assert!(result.construction_year().is_none());
        assert_eq!(result.years.len(), 40);
    }

    #[test]
    fn test_no_investors_means_no_tax_benefit() {
        let mut assumptions = test_assumptions();
        assumptions.investors.clear();
        let result = engine().project(&assumptions);
        assert!(result.years.iter().all(|r| r.tax_benefit == 0.0));
    }
}
