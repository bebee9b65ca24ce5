//! Personal income tax schedules and household tax aggregation

mod brackets;
mod aggregator;
pub mod loader;

pub use brackets::{IncomeTax, MedicareLevy, TaxBracket, TaxSchedule};
pub use aggregator::{InvestorTaxShare, TaxAggregator, YearTax};
pub use loader::{load_tax_schedule, DEFAULT_TAX_TABLE_PATH};
