/// Gate library for the two-qubit register.
///
/// The gate set is closed: `H` and `X` act on Q1 only and are built as the
/// Kronecker product of the single-qubit matrix with the 2×2 identity;
/// `CNOT` is the fixed 4×4 permutation with Q1 as control and Q2 as target.
///
/// Application is a dense 4×4 matrix-vector product followed by a
/// renormalization that only absorbs floating-point drift.
use super::complex::Complex;
use super::state::AmplitudeVector;
use crate::error::{EngineError, Result};
use std::f64::consts::FRAC_1_SQRT_2;
use std::fmt;
use std::str::FromStr;
use tracing::trace;

/// A 2×2 complex matrix acting on one qubit. Row-major: matrix[row][col]
pub type Matrix2x2 = [[Complex; 2]; 2];

/// A 4×4 complex matrix acting on the joint register. Row-major.
pub type Matrix4x4 = [[Complex; 4]; 4];

// ── Single-Qubit Matrices ─────────────────────────────────────────────────

/// Hadamard gate: creates superposition from a basis state.
/// H = (1/√2) * [[1, 1], [1, -1]]
pub fn hadamard() -> Matrix2x2 {
    let h = Complex::new(FRAC_1_SQRT_2, 0.0);
    let neg_h = Complex::new(-FRAC_1_SQRT_2, 0.0);
    [
        [h, h],
        [h, neg_h],
    ]
}

/// Pauli-X gate: quantum NOT, flips |0⟩ ↔ |1⟩.
/// X = [[0, 1], [1, 0]]
pub fn pauli_x() -> Matrix2x2 {
    [
        [Complex::zero(), Complex::one()],
        [Complex::one(),  Complex::zero()],
    ]
}

pub fn identity() -> Matrix2x2 {
    [
        [Complex::one(),  Complex::zero()],
        [Complex::zero(), Complex::one()],
    ]
}

// ── Joint Matrices ────────────────────────────────────────────────────────

/// Kronecker product `a ⊗ b`, with `a` acting on Q1 (high bit) and `b` on Q2.
///
/// (a ⊗ b)[2·r1 + r2][2·c1 + c2] = a[r1][c1] · b[r2][c2]
pub fn kron(a: &Matrix2x2, b: &Matrix2x2) -> Matrix4x4 {
    let mut out = [[Complex::zero(); 4]; 4];
    for (row, out_row) in out.iter_mut().enumerate() {
        for (col, cell) in out_row.iter_mut().enumerate() {
            *cell = a[row >> 1][col >> 1] * b[row & 1][col & 1];
        }
    }
    out
}

/// Controlled-NOT with Q1 as control: fixes `00`, `01`, swaps `10` ↔ `11`.
pub fn cnot() -> Matrix4x4 {
    let o = Complex::zero();
    let l = Complex::one();
    [
        [l, o, o, o],
        [o, l, o, o],
        [o, o, o, l],
        [o, o, l, o],
    ]
}

/// Dense product `m · v`.
pub fn mat_vec(m: &Matrix4x4, v: &[Complex; 4]) -> [Complex; 4] {
    let mut out = [Complex::zero(); 4];
    for (row, slot) in out.iter_mut().enumerate() {
        *slot = m[row]
            .iter()
            .zip(v.iter())
            .fold(Complex::zero(), |acc, (&a, &b)| acc + a * b);
    }
    out
}

// ── Gate ──────────────────────────────────────────────────────────────────

/// One of the three gates the register supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gate {
    /// Hadamard on Q1.
    H,
    /// Pauli-X on Q1.
    X,
    /// Controlled-NOT, Q1 controls Q2.
    Cnot,
}

impl Gate {
    pub const ALL: [Gate; 3] = [Gate::H, Gate::X, Gate::Cnot];

    pub const fn name(self) -> &'static str {
        match self {
            Gate::H => "H",
            Gate::X => "X",
            Gate::Cnot => "CNOT",
        }
    }

    /// The 4×4 unitary this gate applies to the joint register.
    pub fn matrix(self) -> Matrix4x4 {
        match self {
            Gate::H => kron(&hadamard(), &identity()),
            Gate::X => kron(&pauli_x(), &identity()),
            Gate::Cnot => cnot(),
        }
    }

    /// Apply this gate, returning the new state. The input is untouched.
    pub fn apply(self, state: &AmplitudeVector) -> Result<AmplitudeVector> {
        let product = mat_vec(&self.matrix(), state.amplitudes());
        trace!(gate = self.name(), "gate applied");
        AmplitudeVector::from_amplitudes(product)
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Gate {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        Gate::ALL
            .into_iter()
            .find(|g| g.name() == s)
            .ok_or_else(|| EngineError::UnsupportedGate(s.to_string()))
    }
}

/// Apply the gate named `gate_name` (`"H"`, `"X"` or `"CNOT"`) to `state`.
///
/// Fails with [`EngineError::UnsupportedGate`] for any other name.
pub fn apply_gate(gate_name: &str, state: &AmplitudeVector) -> Result<AmplitudeVector> {
    gate_name.parse::<Gate>()?.apply(state)
}
