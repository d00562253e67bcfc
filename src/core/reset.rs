/// Reset engine: force one qubit back to |0⟩ while keeping the other's amplitudes.
///
/// For Q1 the `1x` amplitudes are added onto their `0x` partners
/// (00 += 10, 01 += 11) and then cleared; for Q2 the `x1` amplitudes fold
/// onto `x0` (00 += 01, 10 += 11). The sum is renormalized. This is an
/// additive projection onto the reset subspace, not a mixed-state average,
/// so entanglement with the other qubit is lost.
///
/// A result with (near) zero norm, such as resetting Q1 of (|00⟩ − |10⟩)/√2,
/// falls back to the initial state rather than failing.
use super::basis::Qubit;
use super::complex::Complex;
use super::state::{squared_norm, AmplitudeVector};
use tracing::{debug, warn};

/// Norm below which a reset result counts as empty.
pub const RESET_ZERO_NORM: f64 = 1e-8;

/// Reset `qubit` to |0⟩, returning the new state. Never fails.
pub fn reset_qubit(state: &AmplitudeVector, qubit: Qubit) -> AmplitudeVector {
    let a = state.amplitudes();
    let mut folded = [Complex::zero(); 4];
    for (zero_idx, one_idx) in qubit.indices(0).into_iter().zip(qubit.indices(1)) {
        folded[zero_idx] = a[zero_idx] + a[one_idx];
    }

    if squared_norm(&folded).sqrt() < RESET_ZERO_NORM {
        warn!(qubit = qubit.label(), "reset produced a zero-norm state, falling back to |00⟩");
        return AmplitudeVector::initial();
    }

    debug!(qubit = qubit.label(), "qubit reset");
    AmplitudeVector::from_amplitudes(folded).unwrap_or_else(|_| AmplitudeVector::initial())
}

/// The fixed initial state |00⟩, regardless of the current state.
pub fn hard_reset() -> AmplitudeVector {
    debug!("register hard reset");
    AmplitudeVector::initial()
}
