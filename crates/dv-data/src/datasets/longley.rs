//! Longley (1967) US macroeconomic data, 1947-1962
//!
//! Total employment regressed on six highly collinear series. A standard
//! accuracy benchmark for least squares.

use serde::Deserialize;
use tracing::debug;

use super::Dataset;
use crate::Result;

const LONGLEY_CSV: &str = include_str!("../../data/longley.csv");

pub const ENDOG_NAME: &str = "TOTEMP";
pub const EXOG_NAMES: [&str; 6] = ["GNPDEFL", "GNP", "UNEMP", "ARMED", "POP", "YEAR"];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
struct Record {
    totemp: f64,
    gnpdefl: f64,
    gnp: f64,
    unemp: f64,
    armed: f64,
    pop: f64,
    year: f64,
}

/// Load the bundled Longley dataset
pub fn load() -> Result<Dataset> {
    let mut reader = csv::Reader::from_reader(LONGLEY_CSV.as_bytes());
    let mut endog = Vec::new();
    let mut exog = Vec::new();
    for record in reader.deserialize() {
        let r: Record = record?;
        endog.push(r.totemp);
        exog.push(vec![r.gnpdefl, r.gnp, r.unemp, r.armed, r.pop, r.year]);
    }
    debug!(nobs = endog.len(), "Loaded Longley dataset");
    Ok(Dataset {
        endog_name: ENDOG_NAME.to_string(),
        exog_names: EXOG_NAMES.iter().map(|s| s.to_string()).collect(),
        endog,
        exog,
    })
}
