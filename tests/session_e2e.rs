use tradeoff::{
    Command, Decision, Dimension, ExecutionError, ImpactVector, QualitativeLabel, ScenarioBuilder,
    ScenarioDefinition, ShockEvent, SimulationEngine, SimulationState, TradeoffError,
};

fn dim(name: &str) -> Dimension {
    Dimension::new(name).unwrap()
}

/// D1{optA:+2env, optB:-1env}, D2{optA:+1econ}.
fn two_decisions() -> ScenarioDefinition {
    ScenarioBuilder::new()
        .dimensions(["env", "econ"])
        .decision(
            Decision::builder("D1", "First decision")
                .option("optA", ImpactVector::new().with(dim("env"), 2), "env up")
                .option("optB", ImpactVector::new().with(dim("env"), -1), "env down")
                .build(),
        )
        .decision(
            Decision::builder("D2", "Second decision")
                .option("optA", ImpactVector::new().with(dim("econ"), 1), "econ up")
                .build(),
        )
        .build()
        .unwrap()
}

fn with_shocks() -> ScenarioDefinition {
    ScenarioBuilder::new()
        .dimensions(["env", "econ"])
        .decision(
            Decision::builder("D1", "First decision")
                .option("optA", ImpactVector::new().with(dim("env"), 2), "env up")
                .option("optB", ImpactVector::new().with(dim("env"), -1).with(dim("econ"), 3), "mixed")
                .build(),
        )
        .shock(ShockEvent::new("S1", "Energy prices spike."))
        .decision(
            Decision::builder("D2", "Second decision")
                .option("optA", ImpactVector::new().with(dim("econ"), 1), "econ up")
                .option("optB", ImpactVector::new().with(dim("econ"), -4), "econ down")
                .build(),
        )
        .shock(ShockEvent::new("S2", "A regulator opens an inquiry."))
        .build()
        .unwrap()
}

fn assert_invalid_transition(err: TradeoffError) {
    let TradeoffError::Execution(ExecutionError::InvalidStateTransition { .. }) = err else {
        panic!("expected InvalidStateTransition, got {err:?}");
    };
}

#[test]
fn scenario_a_commits_both_decisions() {
    let engine = SimulationEngine::new(two_decisions()).unwrap();
    let mut session = engine.new_session();

    engine.start(&mut session).unwrap();
    engine.choose_option(&mut session, "D1", "optA").unwrap();
    engine.continue_to_next(&mut session).unwrap();
    engine.choose_option(&mut session, "D2", "optA").unwrap();
    let view = engine.continue_to_next(&mut session).unwrap();

    assert_eq!(view.state, SimulationState::Final);
    assert_eq!(view.profile.score("env"), Some(2));
    assert_eq!(view.profile.score("econ"), Some(1));

    let outcome = session.export_final_profile();
    assert_eq!(outcome.by_name("env").unwrap().label, QualitativeLabel::StrongPositive);
    assert_eq!(outcome.by_name("econ").unwrap().label, QualitativeLabel::Moderate);
}

#[test]
fn scenario_b_rollback_then_rechoose() {
    let engine = SimulationEngine::new(two_decisions()).unwrap();
    let mut session = engine.new_session();

    engine.start(&mut session).unwrap();
    let view = engine.choose_option(&mut session, "D1", "optA").unwrap();
    assert_eq!(view.state, SimulationState::ShowingFeedback(0));
    assert_eq!(view.profile.score("env"), Some(2));

    let view = engine.go_back(&mut session).unwrap();
    assert_eq!(view.state, SimulationState::AwaitingDecision(0));
    assert_eq!(view.profile.score("env"), Some(0));
    assert!(view.last_feedback_message.is_none());
    assert!(session.responses().is_empty());

    engine.choose_option(&mut session, "D1", "optB").unwrap();
    engine.continue_to_next(&mut session).unwrap();
    engine.choose_option(&mut session, "D2", "optA").unwrap();
    engine.continue_to_next(&mut session).unwrap();

    let outcome = session.export_final_profile();
    assert_eq!(outcome.by_name("env").unwrap().score, -1);
    assert_eq!(outcome.by_name("env").unwrap().label, QualitativeLabel::Weak);

    let labels: Vec<&str> = session.responses().iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["optB", "optA"]);
}

#[test]
fn scenario_c_invalid_choice_leaves_session_untouched() {
    let engine = SimulationEngine::new(two_decisions()).unwrap();
    let mut session = engine.new_session();
    engine.start(&mut session).unwrap();

    let err = engine.choose_option(&mut session, "D1", "optZ").unwrap_err();
    let TradeoffError::Execution(ExecutionError::InvalidChoice { decision_id, label, .. }) = err else {
        panic!("expected InvalidChoice, got {err:?}");
    };
    assert_eq!(decision_id, "D1");
    assert_eq!(label, "optZ");

    assert_eq!(session.state(), SimulationState::AwaitingDecision(0));
    assert_eq!(session.current_step_index(), Some(0));
    assert_eq!(session.profile().score("env"), Some(0));
    assert_eq!(session.profile().score("econ"), Some(0));
}

#[test]
fn prefix_of_a_label_is_not_a_match() {
    let engine = SimulationEngine::new(two_decisions()).unwrap();
    let mut session = engine.new_session();
    engine.start(&mut session).unwrap();
    let err = engine.choose_option(&mut session, "D1", "opt").unwrap_err();
    assert!(matches!(err, TradeoffError::Execution(ExecutionError::InvalidChoice { .. })));
}

#[test]
fn rollback_is_single_level() {
    let engine = SimulationEngine::new(two_decisions()).unwrap();
    let mut session = engine.new_session();
    engine.start(&mut session).unwrap();
    engine.choose_option(&mut session, "D1", "optA").unwrap();
    engine.continue_to_next(&mut session).unwrap();

    // At the next decision nothing is pending: the committed D1 cannot be undone.
    let err = engine.go_back(&mut session).unwrap_err();
    assert_invalid_transition(err);

    engine.choose_option(&mut session, "D2", "optA").unwrap();
    engine.go_back(&mut session).unwrap();
    assert_eq!(session.profile().score("env"), Some(2));
    assert_eq!(session.profile().score("econ"), Some(0));
    assert_eq!(session.responses().len(), 1);

    // A second rollback in a row is refused; the state already left ShowingFeedback.
    assert_invalid_transition(engine.go_back(&mut session).unwrap_err());
    assert_eq!(session.profile().score("env"), Some(2));
}

#[test]
fn shocks_must_be_acknowledged_and_cannot_be_rolled_back() {
    let engine = SimulationEngine::new(with_shocks()).unwrap();
    let mut session = engine.new_session();
    engine.start(&mut session).unwrap();
    engine.choose_option(&mut session, "D1", "optA").unwrap();
    let view = engine.continue_to_next(&mut session).unwrap();
    assert_eq!(view.state, SimulationState::ShowingShock(1));
    assert!(!view.can_go_back);

    assert_invalid_transition(engine.go_back(&mut session).unwrap_err());
    assert_invalid_transition(engine.continue_to_next(&mut session).unwrap_err());
    assert_invalid_transition(engine.choose_option(&mut session, "D2", "optA").unwrap_err());

    let view = engine.acknowledge_shock(&mut session).unwrap();
    assert_eq!(view.state, SimulationState::AwaitingDecision(2));
    assert_eq!(view.profile.score("env"), Some(2));

    engine.choose_option(&mut session, "D2", "optB").unwrap();
    // Rolling back D2 returns to D2, never into the shock before it.
    let view = engine.go_back(&mut session).unwrap();
    assert_eq!(view.state, SimulationState::AwaitingDecision(2));

    engine.choose_option(&mut session, "D2", "optA").unwrap();
    let view = engine.continue_to_next(&mut session).unwrap();
    assert_eq!(view.state, SimulationState::ShowingShock(3));

    // Trailing shock: acknowledging it ends the run.
    let view = engine.acknowledge_shock(&mut session).unwrap();
    assert_eq!(view.state, SimulationState::Final);
    assert_invalid_transition(engine.acknowledge_shock(&mut session).unwrap_err());

    let shock_events = session
        .analytics()
        .iter()
        .filter(|e| e.stage == "S1" || e.stage == "S2")
        .count();
    assert_eq!(shock_events, 2);
}

#[test]
fn shock_in_first_position_is_entered_from_intro() {
    let scenario = ScenarioBuilder::new()
        .dimension("env")
        .shock(ShockEvent::new("opening", "Markets crash."))
        .decision(
            Decision::builder("D1", "React?")
                .option("hold", ImpactVector::new(), "")
                .build(),
        )
        .build()
        .unwrap();
    let engine = SimulationEngine::new(scenario).unwrap();
    let mut session = engine.new_session();
    let view = engine.start(&mut session).unwrap();
    assert_eq!(view.state, SimulationState::ShowingShock(0));
    let view = engine.acknowledge_shock(&mut session).unwrap();
    assert_eq!(view.state, SimulationState::AwaitingDecision(1));
}

#[test]
fn replay_is_deterministic() {
    let engine = SimulationEngine::new(with_shocks()).unwrap();
    let commands = vec![
        Command::Start,
        Command::choose("D1", "optA"),
        Command::GoBack,
        Command::choose("D1", "optB"),
        Command::Continue,
        Command::Acknowledge,
        Command::choose("D2", "optB"),
        Command::Continue,
        Command::Acknowledge,
    ];

    let first = engine.replay(commands.clone()).unwrap();
    let second = engine.replay(commands).unwrap();

    assert_eq!(first.profile(), second.profile());
    assert_eq!(first.responses(), second.responses());
    assert_ne!(first.id(), second.id());

    let stages = |s: &tradeoff::SimulationSession| {
        s.analytics()
            .iter()
            .map(|e| (e.stage.clone(), e.label.clone()))
            .collect::<Vec<_>>()
    };
    assert_eq!(stages(&first), stages(&second));
}

#[test]
fn final_score_is_sum_of_committed_impacts() {
    let engine = SimulationEngine::new(with_shocks()).unwrap();
    let session = engine
        .replay([
            Command::Start,
            Command::choose("D1", "optB"),
            Command::Continue,
            Command::Acknowledge,
            // Rolled back: contributes nothing.
            Command::choose("D2", "optA"),
            Command::GoBack,
            Command::choose("D2", "optB"),
            Command::Continue,
            Command::Acknowledge,
        ])
        .unwrap();

    // D1/optB: env -1, econ +3. D2/optB: econ -4.
    assert_eq!(session.profile().score("env"), Some(-1));
    assert_eq!(session.profile().score("econ"), Some(-1));
    assert_eq!(session.state(), SimulationState::Final);
}

#[test]
fn commands_outside_their_state_are_rejected() {
    let engine = SimulationEngine::new(two_decisions()).unwrap();
    let mut session = engine.new_session();

    assert_invalid_transition(engine.choose_option(&mut session, "D1", "optA").unwrap_err());
    assert_invalid_transition(engine.go_back(&mut session).unwrap_err());
    assert_invalid_transition(engine.continue_to_next(&mut session).unwrap_err());
    assert_invalid_transition(engine.acknowledge_shock(&mut session).unwrap_err());
    assert_invalid_transition(engine.finish(&mut session, None).unwrap_err());

    engine.start(&mut session).unwrap();
    assert_invalid_transition(engine.start(&mut session).unwrap_err());
    assert!(session.analytics().len() == 1);
}

#[test]
fn sessions_are_independent() {
    let engine = SimulationEngine::new(two_decisions()).unwrap();
    let mut a = engine.new_session();
    let mut b = engine.new_session();

    engine.start(&mut a).unwrap();
    engine.start(&mut b).unwrap();
    engine.choose_option(&mut a, "D1", "optA").unwrap();
    engine.choose_option(&mut b, "D1", "optB").unwrap();

    assert_eq!(a.profile().score("env"), Some(2));
    assert_eq!(b.profile().score("env"), Some(-1));
}

#[test]
fn event_log_records_every_transition_in_order() {
    let engine = SimulationEngine::new(with_shocks()).unwrap();
    let session = engine
        .replay([
            Command::Start,
            Command::choose("D1", "optA"),
            Command::GoBack,
            Command::choose("D1", "optB"),
            Command::Continue,
            Command::Acknowledge,
        ])
        .unwrap();

    let events: Vec<(&str, &str)> = session
        .analytics()
        .iter()
        .map(|e| (e.stage.as_str(), e.label.as_str()))
        .collect();
    assert_eq!(
        events,
        vec![
            ("Intro", "Intro started"),
            ("D1", "Chose: optA"),
            ("D1", "Rolled back: optA"),
            ("D1", "Chose: optB"),
            ("D1", "Continued"),
            ("S1", "Shock acknowledged"),
        ]
    );
    assert!(session.analytics().iter().all(|e| e.elapsed_seconds >= 0.0));
}

#[test]
fn choice_that_would_overflow_a_score_is_rejected_atomically() {
    let scenario = ScenarioBuilder::new()
        .dimensions(["env", "econ"])
        .decision(
            Decision::builder("d1", "Go all in?")
                .option("big", ImpactVector::new().with(dim("env"), i64::MAX), "Maxed out")
                .build(),
        )
        .decision(
            Decision::builder("d2", "One more?")
                .option("one", ImpactVector::new().with(dim("env"), 1).with(dim("econ"), 1), "")
                .option("none", ImpactVector::new(), "")
                .build(),
        )
        .build()
        .unwrap();
    let engine = SimulationEngine::new(scenario).unwrap();
    let mut session = engine.new_session();
    engine.start(&mut session).unwrap();
    engine.choose_option(&mut session, "d1", "big").unwrap();
    engine.continue_to_next(&mut session).unwrap();
    let events_before = session.analytics().len();

    let err = engine.choose_option(&mut session, "d2", "one").unwrap_err();
    let TradeoffError::Execution(ExecutionError::ScoreOverflow { dimension, .. }) = &err else {
        panic!("expected ScoreOverflow, got {err:?}");
    };
    assert_eq!(dimension, "env");
    assert!(err.is_recoverable());

    assert_eq!(session.state(), SimulationState::AwaitingDecision(1));
    assert_eq!(session.profile().score("env"), Some(i64::MAX));
    assert_eq!(session.profile().score("econ"), Some(0));
    assert_eq!(session.responses().len(), 1);
    assert_eq!(session.analytics().len(), events_before);

    let view = engine.choose_option(&mut session, "d2", "none").unwrap();
    assert_eq!(view.state, SimulationState::ShowingFeedback(1));
    assert_eq!(view.step_index, Some(1));
}
