/// Trial runner: repeated independent measurements against a fixed state.
///
/// Every trial measures its own copy of the input, so no collapse leaks
/// into the next trial or back to the caller. Labels are `"00".."11"` for
/// joint trials and `"0"` / `"1"` for single-qubit trials; only observed
/// labels appear in the output.
use super::basis::MeasureScope;
use super::measure::{measure_both, measure_qubit};
use super::state::AmplitudeVector;
use crate::error::{EngineError, Result};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug_span;

/// Outcome counts and relative frequencies of one trial batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialStats {
    pub counts: BTreeMap<String, u64>,
    pub freqs: BTreeMap<String, f64>,
}

impl TrialStats {
    /// Total number of trials recorded.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn count(&self, label: &str) -> u64 {
        self.counts.get(label).copied().unwrap_or(0)
    }

    pub fn frequency(&self, label: &str) -> f64 {
        self.freqs.get(label).copied().unwrap_or(0.0)
    }
}

/// Run `n` independent measurements of `scope` against `state`.
///
/// Fails with [`EngineError::InvalidTrialCount`] when `n` is zero.
pub fn run_trials<R>(state: &AmplitudeVector, scope: MeasureScope, n: usize, rng: &mut R) -> Result<TrialStats>
where
    R: RngCore + CryptoRng + ?Sized,
{
    if n == 0 {
        return Err(EngineError::InvalidTrialCount(0));
    }
    let _span = debug_span!("run_trials", scope = scope.label(), n).entered();

    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for _ in 0..n {
        let working = *state;
        let label = match scope {
            MeasureScope::Both => measure_both(&working, rng)?.0.label(),
            MeasureScope::Single(qubit) => match measure_qubit(&working, qubit, rng)?.0 {
                0 => "0",
                _ => "1",
            },
        };
        *counts.entry(label.to_string()).or_insert(0) += 1;
    }

    let freqs = counts
        .iter()
        .map(|(label, &count)| (label.clone(), count as f64 / n as f64))
        .collect();
    Ok(TrialStats { counts, freqs })
}

/// Checked conversion for trial counts that arrive as signed integers.
pub fn trial_count(n: i64) -> Result<usize> {
    usize::try_from(n)
        .ok()
        .filter(|&n| n > 0)
        .ok_or(EngineError::InvalidTrialCount(n))
}
