//! JSON scenario loader
//!
//! Loads projection assumptions from JSON files in data/scenarios/

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;

use log::debug;

use super::ProjectionAssumptions;
use crate::error::ProjectionError;

/// Default path to scenario directory
pub const DEFAULT_SCENARIO_PATH: &str = "data/scenarios";

/// Load one scenario from a JSON file
pub fn load_scenario<P: AsRef<Path>>(path: P) -> Result<ProjectionAssumptions, ProjectionError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ProjectionError::io(path, e))?;
    let assumptions = load_scenario_from_reader(BufReader::new(file))?;
    debug!("loaded scenario {}", path.display());
    Ok(assumptions)
}

/// Load a scenario from any reader (e.g., string buffer, stdin)
pub fn load_scenario_from_reader<R: Read>(reader: R) -> Result<ProjectionAssumptions, ProjectionError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Load every `*.json` scenario in a directory, keyed by file stem and sorted by name
pub fn load_scenario_dir<P: AsRef<Path>>(dir: P) -> Result<Vec<(String, ProjectionAssumptions)>, ProjectionError> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|e| ProjectionError::io(dir, e))?;

    let mut scenarios = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| ProjectionError::io(dir, e))?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        scenarios.push((name, load_scenario(&path)?));
    }

    scenarios.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(scenarios)
}
