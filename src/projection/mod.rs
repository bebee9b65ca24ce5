//! Projection engine for yearly property investment projections

mod amortization;
mod construction;
mod depreciation;
mod state;
mod engine;
mod yearly;
mod irr;

pub use amortization::{monthly_payment, AmortizationStep, LoanAmortizationState};
pub use construction::{run_construction_phase, ConstructionOutcome};
pub use depreciation::DepreciationModel;
pub use state::ProjectionState;
pub use engine::{ProjectionConfig, ProjectionEngine};
pub use yearly::{ProjectionResult, ProjectionSummary, YearProjection};
pub use irr::{calculate_irr, npv_at_rate};
