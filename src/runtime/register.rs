/// Per-session register: the latest amplitude vector plus classical bookkeeping.
///
/// `QubitRegister` wraps the stateless engine behind a stateful handle and
/// tracks, per qubit:
///   - whether the most recent operation left it individually collapsed
///   - the most recently observed classical bit (`None` = unknown)
///
/// Flag transitions:
///   gate         → collapsed {F, F}, last {None, None}
///   measure q    → collapsed only q, last only q (other None)
///   measure BOTH → collapsed {T, T}, last {b1, b2}
///   reset q      → collapsed {F, F}, last q = 0 (other None)
///   hard reset   → collapsed {F, F}, last {0, 0}
///   trials       → unchanged
use crate::core::basis::{MeasureScope, Qubit};
use crate::core::gates::Gate;
use crate::core::state::AmplitudeVector;
use crate::core::trials::TrialStats;
use crate::core::{measure, reset, trials};
use crate::error::Result;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// One value per qubit, serialized as `{"Q1": …, "Q2": …}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PerQubit<T> {
    #[serde(rename = "Q1")]
    pub q1: T,
    #[serde(rename = "Q2")]
    pub q2: T,
}

impl<T> PerQubit<T> {
    pub const fn new(q1: T, q2: T) -> Self {
        Self { q1, q2 }
    }
}

impl<T: Clone> PerQubit<T> {
    pub fn splat(value: T) -> Self {
        Self {
            q1: value.clone(),
            q2: value,
        }
    }
}

impl<T> Index<Qubit> for PerQubit<T> {
    type Output = T;
    fn index(&self, qubit: Qubit) -> &T {
        match qubit {
            Qubit::Q1 => &self.q1,
            Qubit::Q2 => &self.q2,
        }
    }
}

impl<T> IndexMut<Qubit> for PerQubit<T> {
    fn index_mut(&mut self, qubit: Qubit) -> &mut T {
        match qubit {
            Qubit::Q1 => &mut self.q1,
            Qubit::Q2 => &mut self.q2,
        }
    }
}

/// Classical outcome reported by a measurement, one optional bit per qubit.
pub type MeasureOutcome = PerQubit<Option<u8>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QubitRegister {
    pub vector: AmplitudeVector,
    pub collapsed: PerQubit<bool>,
    pub last_measurement: PerQubit<Option<u8>>,
}

impl Default for QubitRegister {
    fn default() -> Self {
        Self::new()
    }
}

impl QubitRegister {
    /// Fresh register at |00⟩ with nothing measured.
    pub fn new() -> Self {
        Self {
            vector: AmplitudeVector::initial(),
            collapsed: PerQubit::splat(false),
            last_measurement: PerQubit::splat(None),
        }
    }

    pub fn probabilities(&self) -> [f64; 4] {
        self.vector.probabilities()
    }

    // ── Gates ─────────────────────────────────────────────────────────────

    pub fn apply_gate(&mut self, gate: Gate) -> Result<&mut Self> {
        self.vector = gate.apply(&self.vector)?;
        self.collapsed = PerQubit::splat(false);
        self.last_measurement = PerQubit::splat(None);
        Ok(self)
    }

    // ── Measurement ───────────────────────────────────────────────────────

    /// Measure `scope`, collapse the register and return the reported outcome.
    ///
    /// For a single qubit the outcome pairs the fresh bit with the other
    /// qubit's previous last measurement.
    pub fn measure<R>(&mut self, scope: MeasureScope, rng: &mut R) -> Result<MeasureOutcome>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        match scope {
            MeasureScope::Both => {
                let (basis, collapsed) = measure::measure_both(&self.vector, rng)?;
                let bits = PerQubit::new(Some(basis.bit(Qubit::Q1)), Some(basis.bit(Qubit::Q2)));
                self.vector = collapsed;
                self.collapsed = PerQubit::splat(true);
                self.last_measurement = bits;
                Ok(bits)
            }
            MeasureScope::Single(qubit) => {
                let (bit, collapsed) = measure::measure_qubit(&self.vector, qubit, rng)?;
                let mut outcome = self.last_measurement;
                outcome[qubit] = Some(bit);

                self.vector = collapsed;
                self.collapsed = PerQubit::splat(false);
                self.collapsed[qubit] = true;
                self.last_measurement = PerQubit::splat(None);
                self.last_measurement[qubit] = Some(bit);
                Ok(outcome)
            }
        }
    }

    // ── Reset ─────────────────────────────────────────────────────────────

    pub fn reset(&mut self, qubit: Qubit) -> &mut Self {
        self.vector = reset::reset_qubit(&self.vector, qubit);
        self.collapsed = PerQubit::splat(false);
        self.last_measurement = PerQubit::splat(None);
        self.last_measurement[qubit] = Some(0);
        self
    }

    pub fn hard_reset(&mut self) -> &mut Self {
        self.vector = reset::hard_reset();
        self.collapsed = PerQubit::splat(false);
        self.last_measurement = PerQubit::splat(Some(0));
        self
    }

    // ── Trials ────────────────────────────────────────────────────────────

    /// Sample `n` trials against the current vector without collapsing it.
    pub fn run_trials<R>(&self, scope: MeasureScope, n: usize, rng: &mut R) -> Result<TrialStats>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        trials::run_trials(&self.vector, scope, n, rng)
    }
}

impl fmt::Display for QubitRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.vector)?;
        write!(f, "Measurements: [")?;
        for (i, qubit) in Qubit::ALL.iter().enumerate() {
            match self.last_measurement[*qubit] {
                Some(bit) => write!(f, "{qubit}={bit}")?,
                None => write!(f, "{qubit}=?")?,
            }
            if self.collapsed[*qubit] {
                write!(f, " (collapsed)")?;
            }
            if i + 1 < Qubit::ALL.len() {
                write!(f, ", ")?;
            }
        }
        writeln!(f, "]")
    }
}
