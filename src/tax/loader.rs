//! Load tax bracket tables from CSV
//!
//! Expected columns: `threshold,rate` with rates as fractions (0.19 = 19%).

use std::io::Read;
use std::path::Path;

use csv::Reader;

use super::brackets::{MedicareLevy, TaxBracket, TaxSchedule};
use crate::error::ProjectionError;

/// Default location of the shipped resident table
pub const DEFAULT_TAX_TABLE_PATH: &str = "data/tax/au_resident_2024.csv";

/// Load a bracket table from a CSV file, using the default medicare levy
pub fn load_tax_schedule<P: AsRef<Path>>(path: P) -> Result<TaxSchedule, ProjectionError> {
    let reader = Reader::from_path(path)?;
    read_schedule(reader)
}

/// Load a bracket table from any reader
pub fn load_tax_schedule_from_reader<R: Read>(reader: R) -> Result<TaxSchedule, ProjectionError> {
    read_schedule(Reader::from_reader(reader))
}

fn read_schedule<R: Read>(mut reader: Reader<R>) -> Result<TaxSchedule, ProjectionError> {
    let mut brackets = Vec::new();
    for result in reader.deserialize() {
        let bracket: TaxBracket = result?;
        brackets.push(bracket);
    }
    TaxSchedule::new(brackets, MedicareLevy::default())
}
