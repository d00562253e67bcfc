/// Measurement engine: Born-rule sampling and wavefunction collapse.
///
/// Sampling draws one uniform threshold in [0, 1) and walks the cumulative
/// distribution in list order; the first bucket whose running sum reaches
/// the threshold (`threshold <= cumulative`) wins. If rounding leaves no
/// bucket satisfying that, the last index is returned.
///
/// Single-qubit measurement keeps the amplitudes consistent with the sampled
/// bit and renormalizes. When the sampled outcome carried exactly zero
/// probability (a threshold of exactly 0.0 against a leading empty bucket),
/// the result snaps to the pure basis state with the measured qubit at that
/// bit and the other qubit at 0. Joint measurement always collapses to the
/// sampled basis state.
use super::basis::{BasisState, Qubit};
use super::complex::Complex;
use super::state::AmplitudeVector;
use crate::error::{EngineError, Result};
use rand::{CryptoRng, Rng, RngCore};
use tracing::{debug, warn};

// ── Sampling primitive ────────────────────────────────────────────────────

/// Sample an index from an unnormalized categorical distribution.
///
/// Fails with [`EngineError::InvalidDistribution`] when the weights sum to
/// zero or less, to infinity, or to NaN (which includes an empty list).
pub fn sample_index<R>(probabilities: &[f64], rng: &mut R) -> Result<usize>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let total: f64 = probabilities.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return Err(EngineError::InvalidDistribution { total });
    }

    let threshold: f64 = rng.gen();
    Ok(walk_cumulative(probabilities, total, threshold))
}

/// First index whose normalized running sum reaches `threshold`.
fn walk_cumulative(probabilities: &[f64], total: f64, threshold: f64) -> usize {
    let mut cumulative = 0.0;
    for (index, p) in probabilities.iter().enumerate() {
        cumulative += p / total;
        if threshold <= cumulative {
            return index;
        }
    }
    // threshold sat just above a cumulative sum that rounded below 1
    probabilities.len() - 1
}

// ── Single-qubit measurement ──────────────────────────────────────────────

/// Measure `qubit`, returning the observed bit and the collapsed state.
///
/// The input state is not modified.
pub fn measure_qubit<R>(state: &AmplitudeVector, qubit: Qubit, rng: &mut R) -> Result<(u8, AmplitudeVector)>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let probabilities = [
        state.marginal_probability(qubit, 0),
        state.marginal_probability(qubit, 1),
    ];
    if probabilities[0] + probabilities[1] <= 0.0 {
        return Err(EngineError::ZeroNormState);
    }

    let bit = sample_index(&probabilities, rng)? as u8;

    if probabilities[bit as usize] == 0.0 {
        let snapped = BasisState::from_bits(
            if qubit == Qubit::Q1 { bit } else { 0 },
            if qubit == Qubit::Q2 { bit } else { 0 },
        );
        warn!(
            qubit = qubit.label(),
            bit,
            basis = snapped.label(),
            "sampled a zero-probability outcome, snapping to basis state"
        );
        return Ok((bit, AmplitudeVector::basis(snapped)));
    }

    let source = state.amplitudes();
    let mut collapsed = [Complex::zero(); 4];
    for idx in qubit.indices(bit) {
        collapsed[idx] = source[idx];
    }
    let collapsed = AmplitudeVector::from_amplitudes(collapsed)?;

    debug!(
        qubit = qubit.label(),
        bit,
        p0 = probabilities[0],
        p1 = probabilities[1],
        "qubit measured"
    );
    Ok((bit, collapsed))
}

// ── Joint measurement ─────────────────────────────────────────────────────

/// Measure both qubits at once, returning the observed basis state and the
/// pure state it collapses to.
pub fn measure_both<R>(state: &AmplitudeVector, rng: &mut R) -> Result<(BasisState, AmplitudeVector)>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let probabilities = state.probabilities();
    let index = sample_index(&probabilities, rng)?;
    let outcome = BasisState::ALL[index];

    debug!(outcome = outcome.label(), ?probabilities, "register measured");
    Ok((outcome, AmplitudeVector::basis(outcome)))
}
