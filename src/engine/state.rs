//! States, commands and the public view handed to the UI layer.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::outcome::FinalOutcome;
use crate::profile::ProfileSnapshot;
use crate::scenario::{Decision, ShockEvent};

use super::session::SessionId;

/// Position of a session in the run.
///
/// Step indices are positions in the scenario's step sequence, counting
/// decisions and shocks alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", content = "step")]
pub enum SimulationState {
    /// Before the first step.
    Intro,
    /// Waiting for an option at the decision at this step.
    AwaitingDecision(usize),
    /// Showing feedback for the option just chosen at this step.
    ShowingFeedback(usize),
    /// Showing the shock notice at this step.
    ShowingShock(usize),
    /// Run complete.
    Final,
}

impl SimulationState {
    /// Step index, if the state sits on a step.
    #[must_use]
    pub const fn step_index(self) -> Option<usize> {
        match self {
            Self::AwaitingDecision(i) | Self::ShowingFeedback(i) | Self::ShowingShock(i) => Some(i),
            Self::Intro | Self::Final => None,
        }
    }

    /// True for the terminal state.
    #[must_use]
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Final)
    }
}

impl fmt::Display for SimulationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Intro => f.write_str("Intro"),
            Self::AwaitingDecision(i) => write!(f, "AwaitingDecision({i})"),
            Self::ShowingFeedback(i) => write!(f, "ShowingFeedback({i})"),
            Self::ShowingShock(i) => write!(f, "ShowingShock({i})"),
            Self::Final => f.write_str("Final"),
        }
    }
}

/// Everything a UI layer can ask the engine to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Leave the intro.
    Start,
    /// Select an option at the current decision.
    ChooseOption {
        /// Id of the decision being answered.
        decision_id: String,
        /// Exact option label.
        label: String,
    },
    /// Undo the option just chosen.
    GoBack,
    /// Commit the option just chosen and move on.
    Continue,
    /// Dismiss the current shock notice.
    Acknowledge,
    /// Submit the closing reflection.
    Finish {
        /// Free text, stored as given.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reflection: Option<String>,
    },
}

impl Command {
    /// Convenience constructor for [`Command::ChooseOption`].
    pub fn choose(decision_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::ChooseOption {
            decision_id: decision_id.into(),
            label: label.into(),
        }
    }

    /// Stable name used in errors and logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::ChooseOption { .. } => "choose_option",
            Self::GoBack => "go_back",
            Self::Continue => "continue",
            Self::Acknowledge => "acknowledge",
            Self::Finish { .. } => "finish",
        }
    }
}

/// The node a UI should render for the current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum CurrentNode {
    /// Intro screen.
    Intro {
        /// Scenario headline.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        /// Scenario intro text.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        intro: Option<String>,
    },
    /// A decision (awaiting a choice or showing its feedback).
    Decision(Decision),
    /// A shock notice.
    Shock(ShockEvent),
    /// Outcome summary.
    Final {
        /// Per-dimension interpretation of the final profile.
        outcome: FinalOutcome,
    },
}

/// Snapshot returned by every command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicState {
    /// Session the snapshot belongs to.
    pub session_id: SessionId,
    /// Current state.
    pub state: SimulationState,
    /// Index of the current step; `None` in `Intro` and `Final`.
    pub step_index: Option<usize>,
    /// Number of steps in the scenario.
    pub total_steps: usize,
    /// What to render.
    pub current_node: CurrentNode,
    /// Current profile (copy).
    pub profile: ProfileSnapshot,
    /// Feedback for the option just chosen, while it is shown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_feedback_message: Option<String>,
    /// Whether `go_back` would be accepted.
    pub can_go_back: bool,
}
