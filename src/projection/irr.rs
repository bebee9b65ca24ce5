//! Internal rate of return on the investors' annual cash flows
//!
//! Flows are indexed by year, starting with the upfront outlay at year 0. The root is
//! bracketed between -99% and 1000%, then refined with Newton steps that fall back to
//! halving the bracket whenever a step would leave it.

const LOWEST_RATE: f64 = -0.99;
const HIGHEST_RATE: f64 = 10.0;
const TOLERANCE: f64 = 1e-10;
const MAX_ITERATIONS: usize = 200;

/// Annual IRR as a fraction (0.05 = 5%)
///
/// `None` when the flows never change sign, or when NPV has the same sign at both ends of
/// the bracket.
pub fn calculate_irr(cash_flows: &[f64]) -> Option<f64> {
    if cash_flows.is_empty() {
        return None;
    }
    let has_inflow = cash_flows.iter().any(|&cf| cf > TOLERANCE);
    let has_outflow = cash_flows.iter().any(|&cf| cf < -TOLERANCE);
    match (has_inflow, has_outflow) {
        (false, false) => return Some(0.0),
        (true, true) => {}
        _ => return None,
    }

    let mut low = LOWEST_RATE;
    let mut high = HIGHEST_RATE;
    let mut npv_low = npv_at_rate(cash_flows, low);
    if npv_low * npv_at_rate(cash_flows, high) > 0.0 {
        return None;
    }

    let mut rate = 0.05;
    for _ in 0..MAX_ITERATIONS {
        let (npv, slope) = npv_with_slope(cash_flows, rate);
        if npv == 0.0 {
            return Some(rate);
        }

        if npv * npv_low > 0.0 {
            low = rate;
            npv_low = npv;
        } else {
            high = rate;
        }

        let newton = rate - npv / slope;
        let next = if newton.is_finite() && newton > low && newton < high {
            newton
        } else {
            0.5 * (low + high)
        };

        if (next - rate).abs() < TOLERANCE {
            return Some(next);
        }
        rate = next;
    }

    Some(rate)
}

/// NPV of annual flows at `rate`
pub fn npv_at_rate(cash_flows: &[f64], rate: f64) -> f64 {
    npv_with_slope(cash_flows, rate).0
}

/// NPV and its derivative with respect to the rate
fn npv_with_slope(cash_flows: &[f64], rate: f64) -> (f64, f64) {
    let growth = 1.0 + rate;
    cash_flows
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(npv, slope), (year, &cf)| {
            let discount = growth.powi(year as i32);
            (npv + cf / discount, slope - year as f64 * cf / (discount * growth))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::{Investor, LoanTerms, OwnershipAllocation, ProjectionAssumptions, Resolvable};
    use crate::projection::{ProjectionConfig, ProjectionEngine};

    #[test]
    fn test_single_year_return() {
        // $100k deposit, $110k back a year later
        let irr = calculate_irr(&[-100_000.0, 110_000.0]).unwrap();
        assert!((irr - 0.10).abs() < 1e-8, "Expected 10% IRR, got {}", irr);
    }

    #[test]
    fn test_negative_carry_then_sale() {
        // Ten years of negative gearing, then equity realized
        let mut cash_flows = vec![-80_000.0];
        cash_flows.extend(vec![-5_000.0; 9]);
        cash_flows.push(-5_000.0 + 300_000.0);

        let irr = calculate_irr(&cash_flows).unwrap();
        assert!(irr > 0.0 && irr < 0.2);
        assert!(npv_at_rate(&cash_flows, irr).abs() < 1e-3);
    }

    #[test]
    fn test_projection_flows_discount_to_zero() {
        let assumptions = ProjectionAssumptions {
            property_value: 600_000.0,
            annual_rent: 30_000.0,
            main_loan: LoanTerms::interest_only(480_000.0, 6.0, 30, 5),
            capital_growth_percent: Some(Resolvable::Auto(4.0)),
            rental_growth_percent: Some(Resolvable::Auto(3.0)),
            depreciation_seed: 7_000.0,
            investors: vec![Investor::new("a", 110_000.0, 0.0, true)],
            ownership: vec![OwnershipAllocation::new("a", 100.0)],
            upfront_cash_outlay: 140_000.0,
            ..Default::default()
        };
        let result = ProjectionEngine::new(ProjectionConfig::building_plant_split()).project(&assumptions);
        let cash_flows = result.investment_cash_flows();

        assert_eq!(cash_flows.len(), 31);
        assert_eq!(cash_flows[0], -140_000.0);

        let irr = calculate_irr(&cash_flows).unwrap();
        assert!(irr > 0.0 && irr < 0.5, "unexpected IRR {}", irr);
        assert!(npv_at_rate(&cash_flows, irr).abs() < 1e-2);
        assert_eq!(result.summary().irr, Some(irr));
    }

    #[test]
    fn test_no_sign_change_has_no_irr() {
        assert!(calculate_irr(&[-1_000.0, -500.0]).is_none());
        assert!(calculate_irr(&[]).is_none());
        assert_eq!(calculate_irr(&[0.0, 0.0]), Some(0.0));
    }
}
