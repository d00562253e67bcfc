/// In-memory session store with an audit trail.
///
/// Sessions are keyed by a random `Uuid`. The map sits behind an `RwLock`
/// and every record behind its own `Mutex`, so writes to one session are
/// serialized while distinct sessions proceed in parallel. The randomness
/// provider has its own lock, held only for the duration of one engine call.
///
/// Lock order is always map → record → rng; the map lock is released as soon
/// as the record handle is cloned out.
use super::command::Command;
use super::register::{MeasureOutcome, QubitRegister};
use crate::config::PlaygroundConfig;
use crate::core::basis::{MeasureScope, Qubit};
use crate::core::gates::Gate;
use crate::core::rng::EngineRng;
use crate::core::trials::TrialStats;
use crate::error::{SessionError, SessionResult};
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

// ── Records ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    SessionCreate,
    Gate,
    Measure,
    Reset,
    HardReset,
}

/// One audited state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEntry {
    pub kind: ActionKind,
    pub payload: serde_json::Value,
    pub at: DateTime<Utc>,
}

/// One logged trial batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialEntry {
    pub scope: MeasureScope,
    pub n: usize,
    pub stats: TrialStats,
    pub at: DateTime<Utc>,
}

#[derive(Debug)]
struct SessionRecord {
    register: QubitRegister,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    actions: Vec<ActionEntry>,
    trials: Vec<TrialEntry>,
}

impl SessionRecord {
    fn log(&mut self, kind: ActionKind, payload: serde_json::Value) {
        let at = Utc::now();
        self.updated_at = at;
        self.actions.push(ActionEntry { kind, payload, at });
    }
}

// ── Responses ─────────────────────────────────────────────────────────────

/// A newly created session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub state: QubitRegister,
}

/// Result of a measurement: reported bits plus the collapsed register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureReport {
    pub outcome: MeasureOutcome,
    pub state: QubitRegister,
}

/// What [`SessionStore::execute`] produced for a command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CommandOutcome {
    State(QubitRegister),
    Measured(MeasureReport),
    Trials(TrialStats),
}

// ── Store ─────────────────────────────────────────────────────────────────

pub struct SessionStore<R = EngineRng> {
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<SessionRecord>>>>,
    rng: Mutex<R>,
    max_trials: usize,
}

impl SessionStore<EngineRng> {
    /// Store using the configured seed (or OS entropy) and trial ceiling.
    pub fn from_config(config: &PlaygroundConfig) -> Self {
        Self::with_rng(EngineRng::from_seed_option(config.seed), config.max_trials)
    }
}

impl Default for SessionStore<EngineRng> {
    fn default() -> Self {
        Self::from_config(&PlaygroundConfig::default())
    }
}

impl<R> SessionStore<R>
where
    R: RngCore + CryptoRng + Send,
{
    pub fn with_rng(rng: R, max_trials: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            rng: Mutex::new(rng),
            max_trials,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    pub fn max_trials(&self) -> usize {
        self.max_trials
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Create a session at |00⟩.
    pub fn create_session(&self) -> SessionSnapshot {
        let session_id = Uuid::new_v4();
        let register = QubitRegister::new();
        let now = Utc::now();
        let mut record = SessionRecord {
            register: register.clone(),
            created_at: now,
            updated_at: now,
            actions: Vec::new(),
            trials: Vec::new(),
        };
        record.log(ActionKind::SessionCreate, json!({ "state": register }));

        self.sessions
            .write()
            .insert(session_id, Arc::new(Mutex::new(record)));
        info!(%session_id, "session created");
        SessionSnapshot {
            session_id,
            state: register,
        }
    }

    pub fn fetch(&self, id: Uuid) -> SessionResult<QubitRegister> {
        let record = self.record(id)?;
        let register = record.lock().register.clone();
        Ok(register)
    }

    /// Creation and last-update timestamps.
    pub fn timestamps(&self, id: Uuid) -> SessionResult<(DateTime<Utc>, DateTime<Utc>)> {
        let record = self.record(id)?;
        let guard = record.lock();
        Ok((guard.created_at, guard.updated_at))
    }

    pub fn remove(&self, id: Uuid) -> SessionResult<QubitRegister> {
        let record = self
            .sessions
            .write()
            .remove(&id)
            .ok_or(SessionError::NotFound(id))?;
        debug!(session_id = %id, "session removed");
        let register = record.lock().register.clone();
        Ok(register)
    }

    // ── Operations ────────────────────────────────────────────────────────

    pub fn apply_gate(&self, id: Uuid, gate: Gate) -> SessionResult<QubitRegister> {
        let record = self.record(id)?;
        let mut guard = record.lock();
        guard.register.apply_gate(gate)?;
        let payload = json!({ "gate": gate.name(), "state": guard.register.vector });
        guard.log(ActionKind::Gate, payload);
        info!(session_id = %id, gate = gate.name(), "gate applied");
        Ok(guard.register.clone())
    }

    pub fn measure(&self, id: Uuid, scope: MeasureScope) -> SessionResult<MeasureReport> {
        let record = self.record(id)?;
        let mut guard = record.lock();
        let outcome = {
            let mut rng = self.rng.lock();
            guard.register.measure(scope, &mut *rng)?
        };
        guard.log(
            ActionKind::Measure,
            json!({ "scope": scope.label(), "outcome": outcome }),
        );
        info!(
            session_id = %id,
            scope = scope.label(),
            q1 = ?outcome.q1,
            q2 = ?outcome.q2,
            "measured"
        );
        Ok(MeasureReport {
            outcome,
            state: guard.register.clone(),
        })
    }

    pub fn reset(&self, id: Uuid, qubit: Qubit) -> SessionResult<QubitRegister> {
        let record = self.record(id)?;
        let mut guard = record.lock();
        guard.register.reset(qubit);
        guard.log(ActionKind::Reset, json!({ "qubit": qubit.label() }));
        info!(session_id = %id, qubit = qubit.label(), "qubit reset");
        Ok(guard.register.clone())
    }

    pub fn hard_reset(&self, id: Uuid) -> SessionResult<QubitRegister> {
        let record = self.record(id)?;
        let mut guard = record.lock();
        guard.register.hard_reset();
        guard.log(ActionKind::HardReset, json!({}));
        info!(session_id = %id, "hard reset");
        Ok(guard.register.clone())
    }

    /// Sample `n` trials from the session's current vector. The stored state
    /// is read once and never written.
    pub fn run_trials(&self, id: Uuid, scope: MeasureScope, n: usize) -> SessionResult<TrialStats> {
        if n > self.max_trials {
            return Err(SessionError::TrialLimitExceeded {
                requested: n,
                limit: self.max_trials,
            });
        }
        let record = self.record(id)?;
        let snapshot = record.lock().register.clone();

        let stats = {
            let mut rng = self.rng.lock();
            snapshot.run_trials(scope, n, &mut *rng)?
        };

        record.lock().trials.push(TrialEntry {
            scope,
            n,
            stats: stats.clone(),
            at: Utc::now(),
        });
        info!(session_id = %id, scope = scope.label(), n, "trials run");
        Ok(stats)
    }

    /// Dispatch a parsed command.
    pub fn execute(&self, id: Uuid, command: &Command) -> SessionResult<CommandOutcome> {
        match *command {
            Command::ApplyGate(gate) => self.apply_gate(id, gate).map(CommandOutcome::State),
            Command::Measure(scope) => self.measure(id, scope).map(CommandOutcome::Measured),
            Command::Reset(qubit) => self.reset(id, qubit).map(CommandOutcome::State),
            Command::HardReset => self.hard_reset(id).map(CommandOutcome::State),
            Command::Trials { scope, n } => self.run_trials(id, scope, n).map(CommandOutcome::Trials),
        }
    }

    // ── Audit ─────────────────────────────────────────────────────────────

    pub fn audit_log(&self, id: Uuid) -> SessionResult<Vec<ActionEntry>> {
        let record = self.record(id)?;
        let actions = record.lock().actions.clone();
        Ok(actions)
    }

    pub fn trial_log(&self, id: Uuid) -> SessionResult<Vec<TrialEntry>> {
        let record = self.record(id)?;
        let trials = record.lock().trials.clone();
        Ok(trials)
    }

    fn record(&self, id: Uuid) -> SessionResult<Arc<Mutex<SessionRecord>>> {
        self.sessions
            .read()
            .get(&id)
            .cloned()
            .ok_or(SessionError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::basis::BasisState;
    use crate::core::state::AmplitudeVector;
    use crate::error::EngineError;
    use crate::runtime::register::PerQubit;

    fn seeded_store() -> SessionStore {
        SessionStore::with_rng(EngineRng::seeded(17), 10_000)
    }

    #[test]
    fn test_create_and_fetch() {
        let store = seeded_store();
        let snapshot = store.create_session();
        assert_eq!(snapshot.state, QubitRegister::new());
        assert_eq!(store.fetch(snapshot.session_id).unwrap(), QubitRegister::new());
        assert_eq!(store.len(), 1);

        let log = store.audit_log(snapshot.session_id).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].kind, ActionKind::SessionCreate);
    }

    #[test]
    fn test_unknown_session() {
        let store = seeded_store();
        let id = Uuid::new_v4();
        assert_eq!(store.fetch(id), Err(SessionError::NotFound(id)));
        assert_eq!(store.hard_reset(id), Err(SessionError::NotFound(id)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_gate_is_persisted_and_audited() {
        let store = seeded_store();
        let id = store.create_session().session_id;
        let state = store.apply_gate(id, Gate::X).unwrap();
        assert_eq!(state.vector, AmplitudeVector::basis(BasisState::One0));
        assert_eq!(store.fetch(id).unwrap(), state);

        let log = store.audit_log(id).unwrap();
        assert_eq!(log[1].kind, ActionKind::Gate);
        assert_eq!(log[1].payload["gate"], "X");
        assert_eq!(log[1].payload["state"]["10"]["real"], 1.0);
    }

    #[test]
    fn test_measure_both_on_bell_pair() {
        let store = seeded_store();
        let id = store.create_session().session_id;
        store.apply_gate(id, Gate::H).unwrap();
        store.apply_gate(id, Gate::Cnot).unwrap();
        let report = store.measure(id, MeasureScope::Both).unwrap();
        assert_eq!(report.outcome.q1, report.outcome.q2);
        assert_eq!(report.state.collapsed, PerQubit::new(true, true));
        assert_eq!(store.audit_log(id).unwrap().last().unwrap().kind, ActionKind::Measure);
    }

    #[test]
    fn test_trials_are_logged_not_audited() {
        let store = seeded_store();
        let id = store.create_session().session_id;
        store.apply_gate(id, Gate::H).unwrap();
        let before = store.fetch(id).unwrap();

        let stats = store.run_trials(id, Qubit::Q1.into(), 400).unwrap();
        assert_eq!(stats.total(), 400);
        assert_eq!(store.fetch(id).unwrap(), before);
        assert_eq!(store.audit_log(id).unwrap().len(), 2);

        let trials = store.trial_log(id).unwrap();
        assert_eq!(trials.len(), 1);
        assert_eq!(trials[0].n, 400);
        assert_eq!(trials[0].stats, stats);
    }

    #[test]
    fn test_trial_limits() {
        let store = SessionStore::with_rng(EngineRng::seeded(1), 10);
        let id = store.create_session().session_id;
        assert_eq!(
            store.run_trials(id, MeasureScope::Both, 11),
            Err(SessionError::TrialLimitExceeded { requested: 11, limit: 10 })
        );
        assert_eq!(
            store.run_trials(id, MeasureScope::Both, 0),
            Err(SessionError::Engine(EngineError::InvalidTrialCount(0)))
        );
    }

    #[test]
    fn test_execute_dispatch() {
        let store = seeded_store();
        let id = store.create_session().session_id;
        let outcome = store.execute(id, &"gate:H".parse().unwrap()).unwrap();
        assert!(matches!(outcome, CommandOutcome::State(_)));
        let outcome = store.execute(id, &"trials:BOTH,20".parse().unwrap()).unwrap();
        assert!(matches!(outcome, CommandOutcome::Trials(ref s) if s.total() == 20));
        let outcome = store.execute(id, &"measure:Q2".parse().unwrap()).unwrap();
        assert!(matches!(outcome, CommandOutcome::Measured(ref r) if r.outcome.q2 == Some(0)));
        let outcome = store.execute(id, &Command::HardReset).unwrap();
        assert!(matches!(outcome, CommandOutcome::State(ref s) if s.last_measurement == PerQubit::new(Some(0), Some(0))));
    }

    #[test]
    fn test_remove_and_timestamps() {
        let store = seeded_store();
        let id = store.create_session().session_id;
        let (created, updated) = store.timestamps(id).unwrap();
        assert!(updated >= created);
        store.remove(id).unwrap();
        assert_eq!(store.fetch(id), Err(SessionError::NotFound(id)));
    }
}
