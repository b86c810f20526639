//! Scenario definitions.
//!
//! A scenario is the immutable input of a run: the declared dimensions and an
//! ordered sequence of decisions with optional shock events between them.

mod builder;
mod definition;
mod serialization;
mod validation;

pub use builder::ScenarioBuilder;
pub use definition::{
    Decision, DecisionBuilder, DecisionOption, ScenarioDefinition, ScenarioFingerprint, ShockEvent,
    Step,
};
pub use serialization::{from_json, to_json_pretty};
pub use validation::MAX_TEXT_LEN;
