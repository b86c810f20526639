//! Simulation state machine.
//!
//! A [`SimulationEngine`] owns the validated scenario and drives caller-owned
//! [`SimulationSession`]s through it. Every command runs to completion
//! synchronously; a rejected command leaves the session exactly as it was.
//!
//! ```text
//! Intro --start--> AwaitingDecision(i) --choose--> ShowingFeedback(i)
//!                        ^                             |    |
//!                        +----------go_back------------+    continue
//!                                                           v
//!                        next step: AwaitingDecision / ShowingShock / Final
//! ShowingShock(k) --acknowledge--> next step
//! Final --finish--> Final
//! ```

mod config;
mod report;
mod session;
mod state;
mod transition;

pub use config::EngineConfig;
pub use report::SessionReport;
pub use session::{ResponseRecord, SessionId, SimulationSession};
pub use state::{Command, CurrentNode, PublicState, SimulationState};

use std::sync::Arc;

use tracing::debug;

use crate::analytics::{AnalyticsStream, Clock, SystemClock};
use crate::error::{ExecutionError, TradeoffError, TradeoffResult};
use crate::outcome::FinalOutcome;
use crate::scenario::{ScenarioDefinition, Step};

use transition::{plan, Effect, Transition};

/// Stage name used for events before the first step.
pub const INTRO_STAGE: &str = "Intro";
/// Stage name used for events after the last step.
pub const FINAL_STAGE: &str = "Final";

/// Decision simulation engine bound to one scenario.
///
/// The engine is immutable after construction and holds no per-session
/// state, so one engine can serve any number of independently owned
/// sessions.
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    scenario: Arc<ScenarioDefinition>,
    config: EngineConfig,
    clock: Arc<dyn Clock>,
}

impl SimulationEngine {
    /// Creates an engine with the default configuration and wall clock.
    pub fn new(scenario: ScenarioDefinition) -> TradeoffResult<Self> {
        Self::with_config(scenario, EngineConfig::default())
    }

    /// Creates an engine with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Fails with a validation error if the configuration is invalid or the
    /// scenario's text exceeds `config.max_text_len`.
    pub fn with_config(scenario: ScenarioDefinition, config: EngineConfig) -> TradeoffResult<Self> {
        config.validate()?;
        scenario.check_text_limit(config.max_text_len)?;
        Ok(Self {
            scenario: Arc::new(scenario),
            config,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replaces the time source used by sessions created afterwards.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The scenario this engine runs.
    #[must_use]
    pub fn scenario(&self) -> &ScenarioDefinition {
        &self.scenario
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> EngineConfig {
        self.config
    }

    /// Fresh session in `Intro`.
    #[must_use]
    pub fn new_session(&self) -> SimulationSession {
        SimulationSession::new(&self.scenario, Arc::clone(&self.clock))
    }

    /// Discards `session` and replaces it with a fresh one.
    ///
    /// This is the only way out of `Final`.
    pub fn reset(&self, session: &mut SimulationSession) -> PublicState {
        *session = self.new_session();
        self.public_state(session)
    }

    /// Opens a live analytics stream on `session` using the configured buffer size.
    pub fn subscribe(&self, session: &mut SimulationSession) -> AnalyticsStream {
        session.subscribe(self.config.analytics_stream_capacity)
    }

    /// Applies one command.
    ///
    /// Planning validates the command against the transition table and the
    /// current profile first;
    /// effects are applied only once it is accepted, so profile, responses and
    /// analytics change together or not at all.
    pub fn dispatch(&self, session: &mut SimulationSession, command: Command) -> TradeoffResult<PublicState> {
        self.ensure_same_scenario(session)?;

        let from = session.state;
        let Transition { to, effect } = match plan(&self.scenario, &session.profile, from, &command) {
            Ok(t) => t,
            Err(err) => {
                debug!(
                    target: "tradeoff::engine",
                    session = %session.id(),
                    state = %from,
                    command = command.name(),
                    error = %err,
                    "command rejected"
                );
                return Err(err.into());
            }
        };

        self.apply(session, effect)?;
        session.state = to;
        if to.is_final() && !from.is_final() {
            session.analytics.record(FINAL_STAGE, "Outcome reached");
        }

        debug!(
            target: "tradeoff::engine",
            session = %session.id(),
            from = %from,
            to = %to,
            command = command.name(),
            "transition"
        );
        Ok(self.public_state(session))
    }

    fn ensure_same_scenario(&self, session: &SimulationSession) -> Result<(), ExecutionError> {
        let expected = self.scenario.fingerprint();
        if session.scenario_fingerprint() != expected {
            return Err(ExecutionError::ScenarioMismatch {
                expected: expected.to_string(),
                actual: session.scenario_fingerprint().to_string(),
            });
        }
        Ok(())
    }

    fn step_id(&self, step: usize) -> TradeoffResult<&str> {
        self.scenario
            .step(step)
            .map(Step::id)
            .ok_or_else(|| TradeoffError::internal(format!("step {step} out of range")))
    }

    fn apply(&self, session: &mut SimulationSession, effect: Effect) -> TradeoffResult<()> {
        match effect {
            Effect::Begin => {
                session.analytics.record(INTRO_STAGE, "Intro started");
            }
            Effect::Choose { step, option } => {
                let chosen = self
                    .scenario
                    .step(step)
                    .and_then(Step::as_decision)
                    .and_then(|d| d.options.get(option).map(|o| (d, o)));
                let Some((decision, chosen)) = chosen else {
                    return Err(TradeoffError::internal(format!(
                        "planned option {option} at step {step} does not exist"
                    )));
                };
                session.profile.apply_impact(&chosen.impact);
                session.responses.push(ResponseRecord {
                    decision_id: decision.id.clone(),
                    label: chosen.label.clone(),
                });
                session.last_feedback = Some(chosen.feedback.clone());
                session
                    .analytics
                    .record(decision.id.as_str(), format!("Chose: {}", chosen.label));
            }
            Effect::Rollback { step } => {
                let id = self.step_id(step)?;
                session.profile.reverse_impact();
                let undone = session.responses.pop();
                session.last_feedback = None;
                let label = undone.map_or_else(String::new, |r| r.label);
                session.analytics.record(id, format!("Rolled back: {label}"));
            }
            Effect::Commit { step } => {
                let id = self.step_id(step)?;
                session.profile.commit();
                session.last_feedback = None;
                session.analytics.record(id, "Continued");
            }
            Effect::Acknowledge { step } => {
                let id = self.step_id(step)?;
                session.analytics.record(id, "Shock acknowledged");
            }
            Effect::Reflect { reflection } => {
                session.reflection = reflection;
                session.analytics.record(FINAL_STAGE, "Reflection submitted");
            }
        }
        Ok(())
    }

    /// Leaves the intro.
    pub fn start(&self, session: &mut SimulationSession) -> TradeoffResult<PublicState> {
        self.dispatch(session, Command::Start)
    }

    /// Selects `label` at decision `decision_id`.
    ///
    /// # Errors
    ///
    /// `InvalidChoice` if the decision is not the current one or the label is
    /// not one of its options; `InvalidStateTransition` outside
    /// `AwaitingDecision`.
    pub fn choose_option(
        &self,
        session: &mut SimulationSession,
        decision_id: &str,
        label: &str,
    ) -> TradeoffResult<PublicState> {
        self.dispatch(session, Command::choose(decision_id, label))
    }

    /// Undoes the option just chosen. Only the most recent uncommitted choice
    /// can be undone.
    pub fn go_back(&self, session: &mut SimulationSession) -> TradeoffResult<PublicState> {
        self.dispatch(session, Command::GoBack)
    }

    /// Commits the option just chosen and moves to the next step.
    pub fn continue_to_next(&self, session: &mut SimulationSession) -> TradeoffResult<PublicState> {
        self.dispatch(session, Command::Continue)
    }

    /// Dismisses the current shock notice.
    pub fn acknowledge_shock(&self, session: &mut SimulationSession) -> TradeoffResult<PublicState> {
        self.dispatch(session, Command::Acknowledge)
    }

    /// Submits the closing reflection. Accepted only in `Final`; may be
    /// repeated, the latest submission wins.
    pub fn finish(
        &self,
        session: &mut SimulationSession,
        reflection: Option<String>,
    ) -> TradeoffResult<PublicState> {
        self.dispatch(session, Command::Finish { reflection })
    }

    /// Runs `commands` against a fresh session and returns it.
    ///
    /// Replaying the same commands always yields the same profile and
    /// responses; only timestamps differ.
    pub fn replay<I>(&self, commands: I) -> TradeoffResult<SimulationSession>
    where
        I: IntoIterator<Item = Command>,
    {
        let mut session = self.new_session();
        for command in commands {
            self.dispatch(&mut session, command)?;
        }
        Ok(session)
    }

    /// Public view of `session`.
    #[must_use]
    pub fn public_state(&self, session: &SimulationSession) -> PublicState {
        let state = session.state;
        let current_node = match state {
            SimulationState::Intro => CurrentNode::Intro {
                title: self.scenario.title().map(str::to_string),
                intro: self.scenario.intro().map(str::to_string),
            },
            SimulationState::AwaitingDecision(i)
            | SimulationState::ShowingFeedback(i)
            | SimulationState::ShowingShock(i) => match self.scenario.step(i) {
                Some(Step::Decision(d)) => CurrentNode::Decision(d.clone()),
                Some(Step::Shock(s)) => CurrentNode::Shock(s.clone()),
                None => CurrentNode::Final {
                    outcome: session.export_final_profile(),
                },
            },
            SimulationState::Final => CurrentNode::Final {
                outcome: FinalOutcome::interpret(&session.profile()),
            },
        };

        PublicState {
            session_id: session.id(),
            state,
            step_index: state.step_index(),
            total_steps: self.scenario.len(),
            current_node,
            profile: session.profile(),
            last_feedback_message: session.last_feedback.clone(),
            can_go_back: matches!(state, SimulationState::ShowingFeedback(_)) && session.has_pending_choice(),
        }
    }

    /// Structured record of `session` for an external sink.
    #[must_use]
    pub fn report(&self, session: &SimulationSession) -> SessionReport {
        SessionReport::from_session(session)
    }
}
