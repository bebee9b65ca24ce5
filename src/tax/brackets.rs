//! Progressive income tax schedule with a flat medicare levy
//!
//! Tax is the integral of the bracket rates over income. The levy is a step:
//! once income passes the threshold it applies to the whole income, not just the excess.

use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;

/// Personal income tax calculation used to price each investor's share of the property result
pub trait IncomeTax {
    /// Total tax payable on `income`
    fn total_tax(&self, income: f64, has_medicare_levy: bool) -> f64;

    /// Rate on the next dollar of income, for display and classification only
    fn marginal_rate(&self, income: f64, has_medicare_levy: bool) -> f64;
}

/// One band of the schedule; applies from `threshold` up to the next band's threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub threshold: f64,
    pub rate: f64,
}

/// Flat levy on the whole income once it exceeds `threshold`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MedicareLevy {
    pub rate: f64,
    pub threshold: f64,
}

impl MedicareLevy {
    pub fn applies(&self, income: f64, has_medicare_levy: bool) -> bool {
        has_medicare_levy && income > self.threshold
    }
}

impl Default for MedicareLevy {
    fn default() -> Self {
        Self {
            rate: 0.02,
            threshold: 24_276.0,
        }
    }
}

/// Ordered bracket table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxSchedule {
    brackets: Vec<TaxBracket>,
    medicare: MedicareLevy,
}

impl TaxSchedule {
    /// Australian resident rates: 0 / 19 / 32.5 / 37 / 45 percent
    pub fn australian_resident() -> Self {
        Self {
            brackets: vec![
                TaxBracket { threshold: 0.0, rate: 0.0 },
                TaxBracket { threshold: 18_200.0, rate: 0.19 },
                TaxBracket { threshold: 45_000.0, rate: 0.325 },
                TaxBracket { threshold: 120_000.0, rate: 0.37 },
                TaxBracket { threshold: 180_000.0, rate: 0.45 },
            ],
            medicare: MedicareLevy::default(),
        }
    }

    /// Build a schedule from brackets, checking they start at zero and ascend
    pub fn new(brackets: Vec<TaxBracket>, medicare: MedicareLevy) -> Result<Self, ProjectionError> {
        let first = brackets.first().ok_or_else(|| ProjectionError::InvalidTaxTable {
            reason: "no brackets".to_string(),
        })?;
        if first.threshold != 0.0 {
            return Err(ProjectionError::InvalidTaxTable {
                reason: format!("first bracket must start at 0, found {}", first.threshold),
            });
        }
        if let Some(pair) = brackets.windows(2).find(|w| w[1].threshold <= w[0].threshold) {
            return Err(ProjectionError::InvalidTaxTable {
                reason: format!(
                    "thresholds must ascend ({} follows {})",
                    pair[1].threshold, pair[0].threshold
                ),
            });
        }
        if let Some(bad) = brackets.iter().find(|b| !(0.0..=1.0).contains(&b.rate)) {
            return Err(ProjectionError::InvalidTaxTable {
                reason: format!("rate {} at threshold {} is not a fraction", bad.rate, bad.threshold),
            });
        }
        Ok(Self { brackets, medicare })
    }

    pub fn with_medicare(mut self, medicare: MedicareLevy) -> Self {
        self.medicare = medicare;
        self
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    pub fn medicare(&self) -> MedicareLevy {
        self.medicare
    }

    /// Tax from the bracket table alone
    pub fn bracket_tax(&self, income: f64) -> f64 {
        let mut tax = 0.0;
        for (i, bracket) in self.brackets.iter().enumerate() {
            if income <= bracket.threshold {
                break;
            }
            let upper = self
                .brackets
                .get(i + 1)
                .map_or(f64::INFINITY, |next| next.threshold);
            tax += (income.min(upper) - bracket.threshold) * bracket.rate;
        }
        tax
    }
}

impl Default for TaxSchedule {
    fn default() -> Self {
        Self::australian_resident()
    }
}

impl IncomeTax for TaxSchedule {
    fn total_tax(&self, income: f64, has_medicare_levy: bool) -> f64 {
        if income <= 0.0 {
            return 0.0;
        }
        let levy = if self.medicare.applies(income, has_medicare_levy) {
            income * self.medicare.rate
        } else {
            0.0
        };
        self.bracket_tax(income) + levy
    }

    fn marginal_rate(&self, income: f64, has_medicare_levy: bool) -> f64 {
        // Lower edges are inclusive: income exactly at a threshold takes that band's rate
        let rate = self
            .brackets
            .iter()
            .rev()
            .find(|b| income >= b.threshold)
            .map_or(0.0, |b| b.rate);
        if self.medicare.applies(income, has_medicare_levy) {
            rate + self.medicare.rate
        } else {
            rate
        }
    }
}
