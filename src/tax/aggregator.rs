//! Split a year's property result across investors and price each share at their marginal position

use serde::{Deserialize, Serialize};

use super::brackets::{IncomeTax, TaxSchedule};
use crate::assumptions::{Investor, OwnershipAllocation};

/// One investor's slice of the property result for a year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestorTaxShare {
    pub investor_id: String,
    /// Inflated base income before the property result
    pub base_income: f64,
    /// Portion of the property taxable result attributed to this investor
    pub property_share: f64,
    pub tax_without_property: f64,
    pub tax_with_property: f64,
}

impl InvestorTaxShare {
    /// Extra tax caused by the property (negative for a loss)
    pub fn tax_change(&self) -> f64 {
        self.tax_with_property - self.tax_without_property
    }
}

/// Household tax effect of the property for one year
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct YearTax {
    pub shares: Vec<InvestorTaxShare>,
    /// Tax saved by the household; positive when the property runs at a loss
    pub tax_benefit: f64,
}

/// Applies an income tax schedule to each investor's ownership share
#[derive(Debug, Clone, Default)]
pub struct TaxAggregator<T: IncomeTax = TaxSchedule> {
    tax: T,
}

impl<T: IncomeTax> TaxAggregator<T> {
    pub fn new(tax: T) -> Self {
        Self { tax }
    }

    /// Price one year's taxable result (or loss) across the household
    ///
    /// Percentages are used as supplied; a total other than 100 is not corrected.
    /// Allocations that name an unknown investor are skipped.
    pub fn compute_year_tax(
        &self,
        taxable_income: f64,
        investors: &[Investor],
        allocations: &[OwnershipAllocation],
        cpi_multiplier: f64,
    ) -> YearTax {
        let mut shares = Vec::with_capacity(allocations.len());

        for allocation in allocations.iter().filter(|a| a.percentage > 0.0) {
            let Some(investor) = investors.iter().find(|i| i.id == allocation.investor_id) else {
                continue;
            };

            let base_income = investor.base_income() * cpi_multiplier;
            let property_share = taxable_income * allocation.percentage / 100.0;
            let medicare = investor.has_medicare_levy;

            shares.push(InvestorTaxShare {
                investor_id: investor.id.clone(),
                base_income,
                property_share,
                tax_without_property: self.tax.total_tax(base_income, medicare),
                tax_with_property: self.tax.total_tax(base_income + property_share, medicare),
            });
        }

        let total_change: f64 = shares.iter().map(InvestorTaxShare::tax_change).sum();
        YearTax {
            shares,
            tax_benefit: -total_change,
        }
    }
}
