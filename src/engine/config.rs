//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::scenario::MAX_TEXT_LEN;

/// Tunables for a [`SimulationEngine`](super::SimulationEngine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound for scenario text fields (prompts, feedback, notices).
    pub max_text_len: usize,
    /// Buffer size of a session's live analytics stream.
    pub analytics_stream_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_text_len: MAX_TEXT_LEN,
            analytics_stream_capacity: 1024,
        }
    }
}

impl EngineConfig {
    /// Validate configuration.
    ///
    /// Called when the engine is built.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_text_len == 0 {
            return Err(ValidationError::InvalidConfig {
                reason: "max_text_len must be > 0".to_string(),
            });
        }
        if self.analytics_stream_capacity == 0 {
            return Err(ValidationError::InvalidConfig {
                reason: "analytics_stream_capacity must be > 0".to_string(),
            });
        }
        Ok(())
    }
}
