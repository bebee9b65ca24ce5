//! Property Projection - Year-by-year projections for leveraged property investments
//!
//! This library provides:
//! - Rental cash flow, capital growth and holding cost projections
//! - Main and equity loan amortization (interest-only and principal-and-interest)
//! - Pre-completion construction phase with interest capitalization
//! - Depreciation schedules
//! - Progressive income tax allocated across investors by ownership share
//! - Multi-scenario evaluation and ranking

pub mod error;
pub mod assumptions;
pub mod tax;
pub mod projection;
pub mod scenario;

// Re-export commonly used types
pub use error::ProjectionError;
pub use assumptions::{ProjectionAssumptions, Investor, OwnershipAllocation, LoanTerms, Resolvable};
pub use tax::{IncomeTax, TaxSchedule};
pub use projection::{ProjectionEngine, ProjectionConfig, ProjectionResult, YearProjection};
pub use scenario::ScenarioRunner;
