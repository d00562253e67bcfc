//! # qplay
//!
//! Two-qubit quantum register engine: a fixed gate set, Born-rule
//! measurement with collapse, reset by projection, and Monte Carlo trials,
//! plus an in-memory session runtime on top.
//!
//! ## Quick Start
//!
//! ```rust
//! use qplay::core::{measure_both, AmplitudeVector, EngineRng, Gate};
//!
//! // Build a Bell state: (|00⟩ + |11⟩) / √2
//! let state = AmplitudeVector::initial();
//! let state = Gate::H.apply(&state)?;
//! let state = Gate::Cnot.apply(&state)?;
//!
//! // Inspect probabilities (no collapse)
//! let probs = state.probabilities();
//! println!("P(|00⟩) = {:.4}", probs[0]);
//! println!("P(|11⟩) = {:.4}", probs[3]);
//!
//! // Measure: returns the outcome and a new, collapsed state
//! let mut rng = EngineRng::os();
//! let (outcome, collapsed) = measure_both(&state, &mut rng)?;
//! assert!(outcome.label() == "00" || outcome.label() == "11");
//! assert!(collapsed.is_normalized());
//! # Ok::<(), qplay::EngineError>(())
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod runtime;

pub use config::PlaygroundConfig;
pub use error::{ConfigError, EngineError, SessionError};
