/// Session runtime.
///
/// The runtime layer sits above the stateless engine and handles:
///   - the textual operation grammar (`gate:H`, `trials:BOTH,500`, …)
///   - per-session register bookkeeping (collapse flags, last measurement)
///   - session storage, write serialization per session and the audit log
///
/// Architecture:
///   command text → Command → SessionStore → QubitRegister → core engine
pub mod command;
pub mod register;
pub mod store;

pub use command::{parse_script, Command};
pub use register::{MeasureOutcome, PerQubit, QubitRegister};
pub use store::{
    ActionEntry, ActionKind, CommandOutcome, MeasureReport, SessionSnapshot, SessionStore,
    TrialEntry,
};
