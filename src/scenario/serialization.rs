//! Scenario serialization helpers.
//!
//! Loading a scenario from disk or a network is the host's business; these
//! helpers only fix the JSON shape and route errors into the crate error type.

use crate::error::{TradeoffError, TradeoffResult};

use super::definition::ScenarioDefinition;

/// Serialize a scenario to pretty JSON.
pub fn to_json_pretty(scenario: &ScenarioDefinition) -> TradeoffResult<String> {
    serde_json::to_string_pretty(scenario)
        .map_err(|e| TradeoffError::serialization(format!("serialize scenario: {e}")))
}

/// Deserialize and validate a scenario from JSON.
///
/// Validation failures come back as `TradeoffError::Validation` with the same
/// variant a programmatic construction would produce.
pub fn from_json(s: &str) -> TradeoffResult<ScenarioDefinition> {
    let raw: super::definition::RawScenario = serde_json::from_str(s)
        .map_err(|e| TradeoffError::serialization(format!("deserialize scenario: {e}")))?;
    Ok(ScenarioDefinition::from_raw(raw)?)
}
