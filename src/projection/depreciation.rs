//! Depreciation schedules
//!
//! Two models are in use and they disagree on both the schedule and the projection horizon,
//! so the caller picks one explicitly.

use serde::{Deserialize, Serialize};

/// Depreciation strategy, each with its own customary horizon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum DepreciationModel {
    /// Seed is the first-year claim; each later year claims `decline_rate` less than the last.
    /// Projected over 40 years.
    DiminishingSeed {
        decline_rate: f64,
    },
    /// Seed is the depreciable construction cost, split into a building component written off
    /// straight-line and a plant component written off on diminishing value.
    /// Projected over 30 years.
    BuildingPlantSplit {
        /// Share of the seed that is building (capital works)
        building_fraction: f64,
        /// Straight-line rate on the building component
        building_rate: f64,
        /// Diminishing-value rate on the plant component
        plant_rate: f64,
    },
}

impl DepreciationModel {
    pub const DIMINISHING_SEED_HORIZON: u32 = 40;
    pub const BUILDING_PLANT_SPLIT_HORIZON: u32 = 30;

    pub fn diminishing_seed() -> Self {
        DepreciationModel::DiminishingSeed { decline_rate: 0.05 }
    }

    /// 85/15 building/plant split, 2.5% capital works, 18.75% plant diminishing value
    pub fn building_plant_split() -> Self {
        DepreciationModel::BuildingPlantSplit {
            building_fraction: 0.85,
            building_rate: 0.025,
            plant_rate: 0.1875,
        }
    }

    /// Horizon the model was built for
    pub fn default_horizon(&self) -> u32 {
        match self {
            DepreciationModel::DiminishingSeed { .. } => Self::DIMINISHING_SEED_HORIZON,
            DepreciationModel::BuildingPlantSplit { .. } => Self::BUILDING_PLANT_SPLIT_HORIZON,
        }
    }

    /// Depreciation claimed in projection year `year` (1-indexed); zero for year 0
    pub fn for_year(&self, seed: f64, year: u32) -> f64 {
        if year == 0 || seed <= 0.0 {
            return 0.0;
        }
        let elapsed = (year - 1) as i32;

        match *self {
            DepreciationModel::DiminishingSeed { decline_rate } => {
                seed * (1.0 - decline_rate).powi(elapsed)
            }
            DepreciationModel::BuildingPlantSplit {
                building_fraction,
                building_rate,
                plant_rate,
            } => {
                let building_cost = seed * building_fraction;
                let annual_building = building_cost * building_rate;
                // Capital works stop once the whole cost has been claimed
                let claimed_before = annual_building * elapsed as f64;
                let building = annual_building.min((building_cost - claimed_before).max(0.0));

                let plant_cost = seed - building_cost;
                let plant_written_down = plant_cost * (1.0 - plant_rate).powi(elapsed);
                building + plant_written_down * plant_rate
            }
        }
    }
}
