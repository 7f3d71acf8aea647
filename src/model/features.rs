//! Fixed-slot feature vector assembly.
//!
//! The deployed model consumes a 727-wide vector: 4 numeric features
//! followed by one-hot blocks for continent, WHO region, location, region
//! and country. Slot order mirrors the encoder the model was trained
//! with and must not change without retraining.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const NUMERIC_FEATURES: usize = 4;
pub const CONTINENT_SLOTS: usize = 6;
pub const WHO_REGION_SLOTS: usize = 6;
pub const LOCATION_SLOTS: usize = 250;
pub const REGION_SLOTS: usize = 250;
pub const COUNTRY_SLOTS: usize = 211;

/// Total width of the model input vector.
pub const FEATURE_COUNT: usize = NUMERIC_FEATURES
    + CONTINENT_SLOTS
    + WHO_REGION_SLOTS
    + LOCATION_SLOTS
    + REGION_SLOTS
    + COUNTRY_SLOTS;

const CONTINENTS: [&str; CONTINENT_SLOTS] = [
    "ASIA",
    "EUROPE",
    "AFRICA",
    "NORTH_AMERICA",
    "SOUTH_AMERICA",
    "OCEANIA",
];

const WHO_REGIONS: [&str; WHO_REGION_SLOTS] = [
    "Europe",
    "Americas",
    "Africa",
    "Eastern_Mediterranean",
    "South-East_Asia",
    "Western_Pacific",
];

/// One case snapshot submitted for scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CovidData {
    pub confirmed_case: i64,
    pub date: NaiveDate,
    pub deaths: i64,
    pub recovered: i64,
    /// Format: "Country - region standard - location standard".
    pub location: String,
    /// Format: "Country - region standard".
    pub region: String,
    pub country: String,
    pub continent: String,
    pub population: f64,
    pub who_region: String,
}

/// Slot index of `continent` within the continent block, if known.
pub fn continent_slot(continent: &str) -> Option<usize> {
    CONTINENTS.iter().position(|c| *c == continent)
}

/// Slot index of `who_region` within the WHO-region block, if known.
pub fn who_region_slot(who_region: &str) -> Option<usize> {
    WHO_REGIONS.iter().position(|r| *r == who_region)
}

/// Assemble the model input vector from a scoring request.
///
/// A category value outside the known enumeration leaves its whole block
/// zeroed rather than rejecting the request. Slot mappings for location,
/// region and country are not shipped with the serving build, so those
/// blocks are always zero.
pub fn assemble(data: &CovidData) -> Vec<f64> {
    let mut features = vec![0.0; FEATURE_COUNT];

    features[0] = data.confirmed_case as f64;
    features[1] = data.deaths as f64;
    features[2] = data.recovered as f64;
    features[3] = data.population;

    if let Some(slot) = continent_slot(&data.continent) {
        features[NUMERIC_FEATURES + slot] = 1.0;
    }
    if let Some(slot) = who_region_slot(&data.who_region) {
        features[NUMERIC_FEATURES + CONTINENT_SLOTS + slot] = 1.0;
    }

    features
}
