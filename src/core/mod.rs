pub mod basis;
pub mod complex;
pub mod gates;
pub mod measure;
pub mod reset;
pub mod rng;
pub mod state;
pub mod trials;

// Convenience re-exports for library users
pub use basis::{BasisState, MeasureScope, Qubit};
pub use complex::Complex;
pub use gates::{apply_gate, Gate, Matrix2x2, Matrix4x4};
pub use measure::{measure_both, measure_qubit, sample_index};
pub use reset::{hard_reset, reset_qubit};
pub use rng::EngineRng;
pub use state::{AmplitudeMap, AmplitudeVector};
pub use trials::{run_trials, trial_count, TrialStats};
