//! Structured end-of-run record for external sinks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::AnalyticsEvent;
use crate::error::{TradeoffError, TradeoffResult};
use crate::outcome::FinalOutcome;
use crate::scenario::ScenarioFingerprint;

use super::session::{ResponseRecord, SessionId, SimulationSession};

/// Everything a host needs to persist about one run.
///
/// The engine defines the shape only; encoding and storage belong to the
/// host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    /// Session identity.
    pub session_id: SessionId,
    /// Scenario the run used.
    pub scenario_fingerprint: ScenarioFingerprint,
    /// Session creation time.
    pub started_at: DateTime<Utc>,
    /// Whether the run reached `Final`.
    pub completed: bool,
    /// Answered decisions in order.
    pub responses: Vec<ResponseRecord>,
    /// Timestamped stage transitions.
    pub analytics: Vec<AnalyticsEvent>,
    /// Events the live stream skipped; the `analytics` list is unaffected.
    #[serde(default)]
    pub dropped_from_stream: u64,
    /// Score and label per dimension.
    pub final_profile: FinalOutcome,
    /// Closing reflection, if submitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflection: Option<String>,
}

impl SessionReport {
    /// Builds the report from a session as it currently stands.
    #[must_use]
    pub fn from_session(session: &SimulationSession) -> Self {
        Self {
            session_id: session.id(),
            scenario_fingerprint: session.scenario_fingerprint().clone(),
            started_at: session.started_at(),
            completed: session.state().is_final(),
            responses: session.export_responses(),
            analytics: session.export_analytics(),
            dropped_from_stream: session.dropped_from_stream(),
            final_profile: session.export_final_profile(),
            reflection: session.reflection().map(str::to_string),
        }
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> TradeoffResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| TradeoffError::serialization(format!("serialize report: {e}")))
    }
}
