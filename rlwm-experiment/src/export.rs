//! JSON export of [`ExperimentResults`], the only durable output of a run.

use std::path::Path;

use rlwm_core::ExperimentResults;

use crate::error::Result;

pub fn to_json(results: &ExperimentResults) -> Result<String> {
    Ok(serde_json::to_string_pretty(results)?)
}

pub fn from_json(json: &str) -> Result<ExperimentResults> {
    Ok(serde_json::from_str(json)?)
}

pub fn save(results: &ExperimentResults, path: impl AsRef<Path>) -> Result<()> {
    std::fs::write(path, to_json(results)?)?;
    Ok(())
}

pub fn load(path: impl AsRef<Path>) -> Result<ExperimentResults> {
    from_json(&std::fs::read_to_string(path)?)
}
