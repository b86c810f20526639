//! Per-run session state.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analytics::{AnalyticsEvent, AnalyticsStream, Clock, EventLog};
use crate::outcome::FinalOutcome;
use crate::profile::{Profile, ProfileSnapshot};
use crate::scenario::{ScenarioDefinition, ScenarioFingerprint};

use super::state::SimulationState;

/// Stable identifier for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Create a new random session ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One answered decision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResponseRecord {
    /// Decision answered.
    pub decision_id: String,
    /// Label of the chosen option.
    pub label: String,
}

/// Mutable aggregate of one simulation run.
///
/// Owned exclusively by the caller and passed to every engine command; the
/// engine keeps no per-session state of its own. Sessions hold no external
/// resources, so abandoning one needs no cleanup.
#[derive(Debug)]
pub struct SimulationSession {
    id: SessionId,
    scenario_fingerprint: ScenarioFingerprint,
    started_at: DateTime<Utc>,
    pub(crate) state: SimulationState,
    pub(crate) profile: Profile,
    pub(crate) analytics: EventLog,
    pub(crate) responses: Vec<ResponseRecord>,
    pub(crate) last_feedback: Option<String>,
    pub(crate) reflection: Option<String>,
}

impl SimulationSession {
    pub(crate) fn new(scenario: &ScenarioDefinition, clock: Arc<dyn Clock>) -> Self {
        let started_at = clock.now();
        Self {
            id: SessionId::new(),
            scenario_fingerprint: scenario.fingerprint().clone(),
            started_at,
            state: SimulationState::Intro,
            profile: Profile::new(scenario.dimensions()),
            analytics: EventLog::new(clock),
            responses: Vec::new(),
            last_feedback: None,
            reflection: None,
        }
    }

    /// Session identity.
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Fingerprint of the scenario this session runs.
    #[must_use]
    pub const fn scenario_fingerprint(&self) -> &ScenarioFingerprint {
        &self.scenario_fingerprint
    }

    /// When the session was created.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> SimulationState {
        self.state
    }

    /// Index of the current step, if the session sits on one.
    #[must_use]
    pub const fn current_step_index(&self) -> Option<usize> {
        self.state.step_index()
    }

    /// Copy of the current profile.
    #[must_use]
    pub fn profile(&self) -> ProfileSnapshot {
        self.profile.snapshot()
    }

    /// True while a chosen option can still be rolled back.
    #[must_use]
    pub fn has_pending_choice(&self) -> bool {
        self.profile.last_applied().is_some()
    }

    /// Answered decisions in order (rolled-back answers removed).
    #[must_use]
    pub fn responses(&self) -> &[ResponseRecord] {
        &self.responses
    }

    /// Submitted reflection, if any.
    #[must_use]
    pub fn reflection(&self) -> Option<&str> {
        self.reflection.as_deref()
    }

    /// Recorded analytics events.
    #[must_use]
    pub fn analytics(&self) -> &[AnalyticsEvent] {
        self.analytics.events()
    }

    /// Opens a live analytics stream buffering up to `capacity` events.
    pub fn subscribe(&mut self, capacity: usize) -> AnalyticsStream {
        self.analytics.subscribe(capacity)
    }

    /// Events the live stream skipped because its buffer was full.
    ///
    /// The session log itself is always complete.
    #[must_use]
    pub const fn dropped_from_stream(&self) -> u64 {
        self.analytics.dropped_from_stream()
    }

    /// Full ordered analytics sequence for an external sink.
    #[must_use]
    pub fn export_analytics(&self) -> Vec<AnalyticsEvent> {
        self.analytics.export()
    }

    /// Ordered `(decision, option)` answers for an external sink.
    #[must_use]
    pub fn export_responses(&self) -> Vec<ResponseRecord> {
        self.responses.clone()
    }

    /// Score and label per dimension of the current profile.
    ///
    /// Meaningful at `Final`; earlier it interprets the profile as it stands.
    #[must_use]
    pub fn export_final_profile(&self) -> FinalOutcome {
        FinalOutcome::interpret(&self.profile.snapshot())
    }
}
