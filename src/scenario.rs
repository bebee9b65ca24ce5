//! Scenario runner for side-by-side projections
//!
//! Holds one projection configuration and tax schedule, then evaluates any number of
//! independent scenarios against them. Runs share no state, so batches are projected in
//! parallel.

use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::assumptions::{check_ownership, ProjectionAssumptions};
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionResult, ProjectionSummary};
use crate::tax::TaxSchedule;

/// Metric used to order scenarios, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RankingMetric {
    TotalRoi,
    RentalYield,
    Irr,
    FinalEquity,
    CumulativeCashFlow,
}

impl RankingMetric {
    /// Value of the metric for a summary; missing values sort last
    pub fn value(&self, summary: &ProjectionSummary) -> f64 {
        match self {
            RankingMetric::TotalRoi => summary.total_roi.unwrap_or(f64::NEG_INFINITY),
            RankingMetric::RentalYield => summary.gross_rental_yield,
            RankingMetric::Irr => summary.irr.unwrap_or(f64::NEG_INFINITY),
            RankingMetric::FinalEquity => summary.final_equity,
            RankingMetric::CumulativeCashFlow => summary.final_cumulative_cash_flow,
        }
    }
}

/// One evaluated scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub projection: ProjectionResult,
    pub summary: ProjectionSummary,
}

/// Pre-configured scenario runner
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(ProjectionConfig::diminishing_seed());
/// let mut results = runner.run_scenarios(&scenarios);
/// ScenarioRunner::rank_by(&mut results, RankingMetric::Irr);
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    engine: ProjectionEngine<TaxSchedule>,
}

impl ScenarioRunner {
    /// Create runner with the Australian resident tax schedule
    pub fn new(config: ProjectionConfig) -> Self {
        Self {
            engine: ProjectionEngine::new(config),
        }
    }

    /// Create runner with a specific tax schedule
    pub fn with_tax_schedule(config: ProjectionConfig, tax: TaxSchedule) -> Self {
        Self {
            engine: ProjectionEngine::with_tax(config, tax),
        }
    }

    pub fn config(&self) -> &ProjectionConfig {
        self.engine.config()
    }

    /// Run a single scenario
    pub fn run(&self, name: &str, assumptions: &ProjectionAssumptions) -> ScenarioResult {
        check_ownership(name, &assumptions.ownership);
        let projection = self.engine.project(assumptions);
        let summary = projection.summary();
        ScenarioResult {
            name: name.to_string(),
            projection,
            summary,
        }
    }

    /// Run many scenarios in parallel; results keep the input order
    pub fn run_scenarios(&self, scenarios: &[(String, ProjectionAssumptions)]) -> Vec<ScenarioResult> {
        let results: Vec<ScenarioResult> = scenarios
            .par_iter()
            .map(|(name, assumptions)| self.run(name, assumptions))
            .collect();
        info!("projected {} scenarios", results.len());
        results
    }

    /// Sort results best-first by the given metric
    pub fn rank_by(results: &mut [ScenarioResult], metric: RankingMetric) {
        results.sort_by(|a, b| metric.value(&b.summary).total_cmp(&metric.value(&a.summary)));
    }
}
