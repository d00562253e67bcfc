/// Basis enumeration and qubit selectors for the two-qubit register.
///
/// The joint basis is fixed as `00, 01, 10, 11` with Q1 the left
/// (most-significant) character and Q2 the right one, so basis index
/// `i` has Q1 = bit 1 of `i` and Q2 = bit 0 of `i`. Amplitude vectors are
/// index-aligned to this order; it is never reordered.
use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── BasisState ────────────────────────────────────────────────────────────

/// One of the four joint classical configurations of the register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BasisState {
    Zero0 = 0,
    Zero1 = 1,
    One0 = 2,
    One1 = 3,
}

impl BasisState {
    /// All basis states in vector-index order.
    pub const ALL: [BasisState; 4] = [
        BasisState::Zero0,
        BasisState::Zero1,
        BasisState::One0,
        BasisState::One1,
    ];

    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Basis state at vector index `index`, `None` past the end.
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Zero0),
            1 => Some(Self::Zero1),
            2 => Some(Self::One0),
            3 => Some(Self::One1),
            _ => None,
        }
    }

    /// Basis state with Q1 = `q1` and Q2 = `q2` (nonzero bits count as 1).
    pub const fn from_bits(q1: u8, q2: u8) -> Self {
        match (q1 != 0, q2 != 0) {
            (false, false) => Self::Zero0,
            (false, true) => Self::Zero1,
            (true, false) => Self::One0,
            (true, true) => Self::One1,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Zero0 => "00",
            Self::Zero1 => "01",
            Self::One0 => "10",
            Self::One1 => "11",
        }
    }

    /// Classical value of `qubit` in this basis state.
    #[inline(always)]
    pub const fn bit(self, qubit: Qubit) -> u8 {
        qubit.bit_of(self.index())
    }
}

impl fmt::Display for BasisState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BasisState {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|b| b.label() == s)
            .ok_or_else(|| EngineError::UnknownBasisState(s.to_string()))
    }
}

// ── Qubit ─────────────────────────────────────────────────────────────────

/// Selector for one qubit of the register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Qubit {
    Q1,
    Q2,
}

impl Qubit {
    pub const ALL: [Qubit; 2] = [Qubit::Q1, Qubit::Q2];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Q1 => "Q1",
            Self::Q2 => "Q2",
        }
    }

    /// Value of this qubit in basis index `basis_idx`.
    #[inline(always)]
    pub const fn bit_of(self, basis_idx: usize) -> u8 {
        match self {
            Self::Q1 => ((basis_idx >> 1) & 1) as u8,
            Self::Q2 => (basis_idx & 1) as u8,
        }
    }

    /// The two basis indices where this qubit reads `bit`, ascending.
    ///
    /// Q1: 0 → {0, 1}, 1 → {2, 3}. Q2: 0 → {0, 2}, 1 → {1, 3}.
    pub const fn indices(self, bit: u8) -> [usize; 2] {
        match (self, bit != 0) {
            (Self::Q1, false) => [0, 1],
            (Self::Q1, true) => [2, 3],
            (Self::Q2, false) => [0, 2],
            (Self::Q2, true) => [1, 3],
        }
    }
}

impl fmt::Display for Qubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Qubit {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Q1" => Ok(Self::Q1),
            "Q2" => Ok(Self::Q2),
            other => Err(EngineError::invalid_selector(other)),
        }
    }
}

// ── MeasureScope ──────────────────────────────────────────────────────────

/// What a measurement or trial batch observes: one qubit or both jointly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasureScope {
    Single(Qubit),
    Both,
}

impl MeasureScope {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Single(q) => q.label(),
            Self::Both => "BOTH",
        }
    }
}

impl From<Qubit> for MeasureScope {
    fn from(qubit: Qubit) -> Self {
        Self::Single(qubit)
    }
}

impl fmt::Display for MeasureScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MeasureScope {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BOTH" => Ok(Self::Both),
            other => other.parse::<Qubit>().map(Self::Single),
        }
    }
}

impl Serialize for MeasureScope {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for MeasureScope {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
