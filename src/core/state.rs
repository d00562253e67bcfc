/// Two-qubit amplitude vector.
///
/// Exactly four complex amplitudes, index-aligned to the basis order
/// `00, 01, 10, 11`. Every public constructor yields a unit-norm vector,
/// and the type is `Copy`: engine operations take a vector by reference and
/// return a new one, so a caller can always keep the pre-operation state.
///
/// Serialized form is a map from basis label to `{"real", "imag"}`.
/// Deserialization accepts the keys in any order, rejects missing or unknown
/// labels and non-finite components, and renormalizes.
use super::basis::{BasisState, Qubit};
use super::complex::Complex;
use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Tolerance used by [`AmplitudeVector::is_normalized`].
pub const NORM_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AmplitudeMap", into = "AmplitudeMap")]
pub struct AmplitudeVector {
    amplitudes: [Complex; 4],
}

impl AmplitudeVector {
    /// The fixed initial state |00⟩.
    pub fn initial() -> Self {
        Self::basis(BasisState::Zero0)
    }

    /// The pure basis state `basis`: amplitude 1 there, 0 elsewhere.
    pub fn basis(basis: BasisState) -> Self {
        let mut amplitudes = [Complex::zero(); 4];
        amplitudes[basis.index()] = Complex::one();
        Self { amplitudes }
    }

    /// Build a state from raw amplitudes, renormalizing them.
    ///
    /// Fails with [`EngineError::ZeroNormState`] when every amplitude is
    /// exactly zero and with [`EngineError::NonFiniteAmplitude`] on NaN or ±∞.
    pub fn from_amplitudes(amplitudes: [Complex; 4]) -> Result<Self> {
        normalize(amplitudes).map(|amplitudes| Self { amplitudes })
    }

    /// Raw amplitudes in basis order.
    #[inline(always)]
    pub fn amplitudes(&self) -> &[Complex; 4] {
        &self.amplitudes
    }

    #[inline(always)]
    pub fn amplitude(&self, basis: BasisState) -> Complex {
        self.amplitudes[basis.index()]
    }

    /// Born-rule probability of each basis state, in basis order.
    pub fn probabilities(&self) -> [f64; 4] {
        self.amplitudes.map(|a| a.norm_sq())
    }

    /// Probability that `qubit` reads `bit`, marginalized over the other qubit.
    pub fn marginal_probability(&self, qubit: Qubit, bit: u8) -> f64 {
        qubit
            .indices(bit)
            .iter()
            .map(|&i| self.amplitudes[i].norm_sq())
            .sum()
    }

    /// Euclidean norm; 1 within float tolerance for every engine output.
    pub fn norm(&self) -> f64 {
        squared_norm(&self.amplitudes).sqrt()
    }

    pub fn is_normalized(&self) -> bool {
        (self.norm() - 1.0).abs() <= NORM_TOLERANCE
    }
}

impl Default for AmplitudeVector {
    fn default() -> Self {
        Self::initial()
    }
}

// ── Vector utilities ──────────────────────────────────────────────────────

pub(crate) fn squared_norm(amplitudes: &[Complex; 4]) -> f64 {
    amplitudes.iter().map(|a| a.norm_sq()).sum()
}

/// Divide by the Euclidean norm. Only an exactly-zero vector is rejected;
/// anything else, however small or large, is scaled back to unit length.
///
/// Components are first divided by the largest absolute component so the
/// squared sum can neither overflow nor underflow.
pub(crate) fn normalize(amplitudes: [Complex; 4]) -> Result<[Complex; 4]> {
    if let Some(i) = amplitudes.iter().position(|a| !a.is_finite()) {
        return Err(EngineError::NonFiniteAmplitude(
            BasisState::ALL[i].label().to_string(),
        ));
    }
    let largest = amplitudes
        .iter()
        .map(|a| a.re.abs().max(a.im.abs()))
        .fold(0.0, f64::max);
    if largest == 0.0 {
        return Err(EngineError::ZeroNormState);
    }

    let scaled = amplitudes.map(|a| Complex::new(a.re / largest, a.im / largest));
    let inv_norm = 1.0 / squared_norm(&scaled).sqrt();
    Ok(scaled.map(|a| a.scale(inv_norm)))
}

// ── Wire format ───────────────────────────────────────────────────────────

/// Label-keyed form used for persistence and transport.
pub type AmplitudeMap = BTreeMap<String, Complex>;

impl From<AmplitudeVector> for AmplitudeMap {
    fn from(state: AmplitudeVector) -> Self {
        BasisState::ALL
            .iter()
            .map(|b| (b.label().to_string(), state.amplitude(*b)))
            .collect()
    }
}

impl TryFrom<AmplitudeMap> for AmplitudeVector {
    type Error = EngineError;

    fn try_from(mut map: AmplitudeMap) -> Result<Self> {
        let mut amplitudes = [Complex::zero(); 4];
        for basis in BasisState::ALL {
            let amp = map
                .remove(basis.label())
                .ok_or_else(|| EngineError::MissingBasisState(basis.label().to_string()))?;
            if !amp.is_finite() {
                return Err(EngineError::NonFiniteAmplitude(basis.label().to_string()));
            }
            amplitudes[basis.index()] = amp;
        }
        if let Some(extra) = map.into_keys().next() {
            return Err(EngineError::UnknownBasisState(extra));
        }
        Self::from_amplitudes(amplitudes)
    }
}

impl fmt::Display for AmplitudeVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "AmplitudeVector (2 qubits, dim=4):")?;
        for basis in BasisState::ALL {
            let amp = self.amplitude(basis);
            let prob = amp.norm_sq();
            if prob > 1e-12 {
                writeln!(
                    f,
                    "  |{}⟩  amplitude: {}  probability: {:.4}",
                    basis, amp, prob
                )?;
            }
        }
        Ok(())
    }
}
