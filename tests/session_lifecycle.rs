//! End-to-end session scenarios driven through `SessionStore`.

use qplay::core::{EngineRng, Gate, MeasureScope, Qubit};
use qplay::runtime::{parse_script, ActionKind, CommandOutcome, PerQubit, SessionStore};
use qplay::{EngineError, PlaygroundConfig, SessionError};
use std::collections::HashSet;
use uuid::Uuid;

fn store() -> SessionStore {
    SessionStore::with_rng(EngineRng::seeded(2024), 100_000)
}

#[test]
fn test_session_lifecycle() {
    let store = store();
    let id = store.create_session().session_id;

    store.apply_gate(id, Gate::H).unwrap();
    store.apply_gate(id, Gate::Cnot).unwrap();

    let trials = store.run_trials(id, MeasureScope::Both, 500).unwrap();
    let allowed: HashSet<&str> = ["00", "11"].into_iter().collect();
    assert!(trials.counts.keys().all(|k| allowed.contains(k.as_str())));
    assert_eq!(trials.total(), 500);

    let report = store.measure(id, Qubit::Q1.into()).unwrap();
    let q1 = report.outcome.q1.unwrap();
    assert!(q1 == 0 || q1 == 1);

    // Bell correlation survives into the collapsed register
    let p_q2 = report.state.vector.marginal_probability(Qubit::Q2, q1);
    assert!((p_q2 - 1.0).abs() < 1e-9);

    let reset = store.reset(id, Qubit::Q1).unwrap();
    assert_eq!(reset.last_measurement, PerQubit::new(Some(0), None));
    assert!(reset.vector.marginal_probability(Qubit::Q1, 0) > 1.0 - 1e-9);

    let hard = store.hard_reset(id).unwrap();
    assert_eq!(hard.last_measurement, PerQubit::new(Some(0), Some(0)));
    assert_eq!(hard.probabilities(), [1.0, 0.0, 0.0, 0.0]);

    let kinds: Vec<ActionKind> = store.audit_log(id).unwrap().iter().map(|a| a.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ActionKind::SessionCreate,
            ActionKind::Gate,
            ActionKind::Gate,
            ActionKind::Measure,
            ActionKind::Reset,
            ActionKind::HardReset,
        ]
    );
    assert_eq!(store.trial_log(id).unwrap().len(), 1);
}

#[test]
fn test_script_drives_session() {
    let source = "\
# prepare |10⟩ then read it back
gate:X
measure:BOTH   // deterministic
trials:Q1,50
";
    let commands = parse_script(source).unwrap();
    let store = store();
    let id = store.create_session().session_id;

    let outcomes: Vec<CommandOutcome> = commands
        .iter()
        .map(|c| store.execute(id, c).unwrap())
        .collect();

    match &outcomes[1] {
        CommandOutcome::Measured(report) => {
            assert_eq!(report.outcome, PerQubit::new(Some(1), Some(0)));
            assert_eq!(report.state.collapsed, PerQubit::new(true, true));
        }
        other => panic!("expected measurement, got {other:?}"),
    }
    match &outcomes[2] {
        CommandOutcome::Trials(stats) => assert_eq!(stats.count("1"), 50),
        other => panic!("expected trials, got {other:?}"),
    }
}

#[test]
fn test_script_errors_carry_line_numbers() {
    let err = parse_script("gate:H\n\ngate:Y\n").unwrap_err();
    match err {
        SessionError::Script { line, .. } => assert_eq!(line, 3),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_errors_surface_per_session() {
    let store = store();
    let ghost = Uuid::new_v4();
    assert_eq!(store.apply_gate(ghost, Gate::H), Err(SessionError::NotFound(ghost)));

    let id = store.create_session().session_id;
    assert_eq!(
        store.run_trials(id, MeasureScope::Both, 0),
        Err(SessionError::Engine(EngineError::InvalidTrialCount(0)))
    );
    // a failed call leaves the session untouched
    assert_eq!(store.audit_log(id).unwrap().len(), 1);
    assert!(store.trial_log(id).unwrap().is_empty());
}

#[test]
fn test_sessions_are_isolated_across_threads() {
    let store = store();
    let ids: Vec<Uuid> = (0..8).map(|_| store.create_session().session_id).collect();

    std::thread::scope(|scope| {
        for (i, &id) in ids.iter().enumerate() {
            let store = &store;
            scope.spawn(move || {
                if i % 2 == 0 {
                    store.apply_gate(id, Gate::X).unwrap();
                }
                for _ in 0..20 {
                    store.run_trials(id, MeasureScope::Both, 10).unwrap();
                }
                store.measure(id, MeasureScope::Both).unwrap();
            });
        }
    });

    for (i, &id) in ids.iter().enumerate() {
        let register = store.fetch(id).unwrap();
        let expected = if i % 2 == 0 { Some(1) } else { Some(0) };
        assert_eq!(register.last_measurement, PerQubit::new(expected, Some(0)));
        assert_eq!(store.trial_log(id).unwrap().len(), 20);
    }
}

#[test]
fn test_store_from_config_honours_limits() {
    let config = PlaygroundConfig {
        seed: Some(9),
        max_trials: 25,
        ..PlaygroundConfig::default()
    };
    let store = SessionStore::from_config(&config);
    assert_eq!(store.max_trials(), 25);

    let id = store.create_session().session_id;
    assert_eq!(
        store.run_trials(id, MeasureScope::Both, 26),
        Err(SessionError::TrialLimitExceeded { requested: 26, limit: 25 })
    );
}

#[test]
fn test_seeded_stores_replay_identically() {
    let run = || {
        let store = SessionStore::with_rng(EngineRng::seeded(77), 10_000);
        let id = store.create_session().session_id;
        store.apply_gate(id, Gate::H).unwrap();
        store.run_trials(id, Qubit::Q1.into(), 1_000).unwrap()
    };
    assert_eq!(run(), run());
}
