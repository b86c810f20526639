//! Transition table.
//!
//! `plan` is the single source of truth for which command is accepted in which
//! state and where it leads. It is pure: it reads the scenario, the current
//! state and the current profile, validates the command, and describes the effect without applying it.
//! The engine applies a planned effect only after planning succeeded, so a
//! rejected command leaves the session untouched.

use crate::error::ExecutionError;
use crate::profile::Profile;
use crate::scenario::{ScenarioDefinition, Step};

use super::state::{Command, SimulationState};

/// Side effect of an accepted command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Effect {
    /// Intro left.
    Begin,
    /// Option `option` of the decision at `step` chosen.
    Choose { step: usize, option: usize },
    /// Pending choice at `step` undone.
    Rollback { step: usize },
    /// Pending choice at `step` committed.
    Commit { step: usize },
    /// Shock at `step` dismissed.
    Acknowledge { step: usize },
    /// Closing reflection submitted.
    Reflect { reflection: Option<String> },
}

/// Accepted command: target state plus effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Transition {
    pub(crate) to: SimulationState,
    pub(crate) effect: Effect,
}

/// State for entering the step at `index`; past the end means `Final`.
pub(crate) fn entry_state(scenario: &ScenarioDefinition, index: usize) -> SimulationState {
    match scenario.step(index) {
        Some(Step::Decision(_)) => SimulationState::AwaitingDecision(index),
        Some(Step::Shock(_)) => SimulationState::ShowingShock(index),
        None => SimulationState::Final,
    }
}

fn rejected(state: SimulationState, command: &Command) -> ExecutionError {
    ExecutionError::InvalidStateTransition {
        state: state.to_string(),
        command: command.name().to_string(),
    }
}

fn plan_choice(
    scenario: &ScenarioDefinition,
    profile: &Profile,
    step: usize,
    decision_id: &str,
    label: &str,
) -> Result<usize, ExecutionError> {
    let invalid = |reason: String| ExecutionError::InvalidChoice {
        decision_id: decision_id.to_string(),
        label: label.to_string(),
        reason,
    };

    let Some(decision) = scenario.step(step).and_then(Step::as_decision) else {
        return Err(invalid(format!("step {step} is not a decision")));
    };
    if decision.id != decision_id {
        return Err(invalid(format!("current decision is '{}'", decision.id)));
    }
    let option = decision
        .options
        .iter()
        .position(|o| o.label == label)
        .ok_or_else(|| invalid("not an option of this decision".to_string()))?;

    if let Some(dimension) = profile.overflowing_dimension(&decision.options[option].impact) {
        return Err(ExecutionError::ScoreOverflow {
            decision_id: decision_id.to_string(),
            label: label.to_string(),
            dimension: dimension.to_string(),
        });
    }
    Ok(option)
}

/// Decide whether `command` is accepted in `state`.
pub(crate) fn plan(
    scenario: &ScenarioDefinition,
    profile: &Profile,
    state: SimulationState,
    command: &Command,
) -> Result<Transition, ExecutionError> {
    use SimulationState as S;

    let transition = match (state, command) {
        (S::Intro, Command::Start) => Transition {
            to: entry_state(scenario, 0),
            effect: Effect::Begin,
        },
        (S::AwaitingDecision(i), Command::ChooseOption { decision_id, label }) => {
            let option = plan_choice(scenario, profile, i, decision_id, label)?;
            Transition {
                to: S::ShowingFeedback(i),
                effect: Effect::Choose { step: i, option },
            }
        }
        (S::ShowingFeedback(i), Command::GoBack) => Transition {
            to: S::AwaitingDecision(i),
            effect: Effect::Rollback { step: i },
        },
        (S::ShowingFeedback(i), Command::Continue) => Transition {
            to: entry_state(scenario, i + 1),
            effect: Effect::Commit { step: i },
        },
        (S::ShowingShock(k), Command::Acknowledge) => Transition {
            to: entry_state(scenario, k + 1),
            effect: Effect::Acknowledge { step: k },
        },
        (S::Final, Command::Finish { reflection }) => Transition {
            to: S::Final,
            effect: Effect::Reflect {
                reflection: reflection.clone(),
            },
        },
        (state, command) => return Err(rejected(state, command)),
    };
    Ok(transition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::Dimension;
    use crate::impact::ImpactVector;
    use crate::scenario::{Decision, ShockEvent};

    fn zero(sc: &ScenarioDefinition) -> Profile {
        Profile::new(sc.dimensions())
    }

    fn scenario() -> ScenarioDefinition {
        let env = Dimension::new("env").unwrap();
        let d = |id: &str| {
            Decision::builder(id, "p")
                .option("a", ImpactVector::new().with(env.clone(), 1), "")
                .option("b", ImpactVector::new(), "")
                .build()
        };
        ScenarioDefinition::new(
            vec![env.clone()],
            vec![
                Step::Decision(d("d1")),
                Step::Shock(ShockEvent::new("s1", "shock")),
                Step::Decision(d("d2")),
                Step::Shock(ShockEvent::new("s2", "late shock")),
            ],
        )
        .unwrap()
    }

    #[test]
    fn happy_path_walks_every_step() {
        let sc = scenario();
        let p = zero(&sc);
        let t = plan(&sc, &p, SimulationState::Intro, &Command::Start).unwrap();
        assert_eq!(t.to, SimulationState::AwaitingDecision(0));

        let t = plan(&sc, &p, t.to, &Command::choose("d1", "b")).unwrap();
        assert_eq!(t.effect, Effect::Choose { step: 0, option: 1 });
        assert_eq!(t.to, SimulationState::ShowingFeedback(0));

        let t = plan(&sc, &p, t.to, &Command::Continue).unwrap();
        assert_eq!(t.to, SimulationState::ShowingShock(1));

        let t = plan(&sc, &p, t.to, &Command::Acknowledge).unwrap();
        assert_eq!(t.to, SimulationState::AwaitingDecision(2));

        let t = plan(&sc, &p, SimulationState::ShowingFeedback(2), &Command::Continue).unwrap();
        assert_eq!(t.to, SimulationState::ShowingShock(3));

        // Trailing shock leads straight to Final.
        let t = plan(&sc, &p, t.to, &Command::Acknowledge).unwrap();
        assert_eq!(t.to, SimulationState::Final);
    }

    #[test]
    fn go_back_is_rejected_on_shock() {
        let sc = scenario();
        let p = zero(&sc);
        let err = plan(&sc, &p, SimulationState::ShowingShock(1), &Command::GoBack).unwrap_err();
        assert_eq!(
            err,
            ExecutionError::InvalidStateTransition {
                state: "ShowingShock(1)".to_string(),
                command: "go_back".to_string(),
            }
        );
    }

    #[test]
    fn every_unlisted_pair_is_rejected() {
        let sc = scenario();
        let p = zero(&sc);
        let states = [
            SimulationState::Intro,
            SimulationState::AwaitingDecision(0),
            SimulationState::ShowingFeedback(0),
            SimulationState::ShowingShock(1),
            SimulationState::Final,
        ];
        let commands = [
            Command::Start,
            Command::choose("d1", "a"),
            Command::GoBack,
            Command::Continue,
            Command::Acknowledge,
            Command::Finish { reflection: None },
        ];
        let mut accepted = 0;
        for state in states {
            for command in &commands {
                match plan(&sc, &p, state, command) {
                    Ok(_) => accepted += 1,
                    Err(ExecutionError::InvalidStateTransition { .. }) => {}
                    Err(other) => panic!("unexpected error {other:?}"),
                }
            }
        }
        // Start, ChooseOption, GoBack, Continue, Acknowledge, Finish: one state each.
        assert_eq!(accepted, 6);
    }

    #[test]
    fn choice_must_target_current_decision() {
        let sc = scenario();
        let p = zero(&sc);
        let err = plan(&sc, &p, SimulationState::AwaitingDecision(0), &Command::choose("d2", "a")).unwrap_err();
        assert!(matches!(err, ExecutionError::InvalidChoice { .. }));

        let err = plan(&sc, &p, SimulationState::AwaitingDecision(0), &Command::choose("d1", "z")).unwrap_err();
        assert!(matches!(err, ExecutionError::InvalidChoice { .. }));
    }

    #[test]
    fn choice_that_would_overflow_a_score_is_rejected() {
        let sc = scenario();
        let mut p = zero(&sc);
        p.apply_impact(&ImpactVector::new().with(Dimension::new("env").unwrap(), i64::MAX));
        p.commit();

        let err = plan(&sc, &p, SimulationState::AwaitingDecision(2), &Command::choose("d2", "a")).unwrap_err();
        assert_eq!(
            err,
            ExecutionError::ScoreOverflow {
                decision_id: "d2".to_string(),
                label: "a".to_string(),
                dimension: "env".to_string(),
            }
        );

        // The zero-impact option stays available.
        let t = plan(&sc, &p, SimulationState::AwaitingDecision(2), &Command::choose("d2", "b")).unwrap();
        assert_eq!(t.effect, Effect::Choose { step: 2, option: 1 });
    }
}
