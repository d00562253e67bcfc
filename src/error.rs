/// Error types for the engine, the session runtime and configuration loading.
///
/// Every variant is a local, deterministic validation failure. Nothing here
/// is retryable: each one means the caller asked for something the register
/// cannot do.
use thiserror::Error;
use uuid::Uuid;

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Failures raised by the quantum state engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Gate name is not one of `H`, `X`, `CNOT`.
    #[error("Unsupported gate: {0}")]
    UnsupportedGate(String),

    /// Qubit or scope selector outside the set valid for the operation.
    #[error("Invalid qubit selector '{0}': expected Q1, Q2 or BOTH where allowed")]
    InvalidQubitSelector(String),

    /// Probabilities handed to the sampler sum to zero or less (or NaN).
    #[error("Invalid probability distribution: total = {total}")]
    InvalidDistribution {
        /// Unnormalized sum of the offered probabilities.
        total: f64,
    },

    /// Attempted to normalize an all-zero amplitude vector.
    #[error("State vector cannot be zero")]
    ZeroNormState,

    /// Trial count was zero or negative.
    #[error("Number of trials must be positive, got {0}")]
    InvalidTrialCount(i64),

    /// Serialized state is missing one of the four basis labels.
    #[error("Missing amplitude for basis state {0}")]
    MissingBasisState(String),

    /// Serialized state carries a key that is not a basis label.
    #[error("Unknown basis state label '{0}'")]
    UnknownBasisState(String),

    /// Serialized amplitude component is NaN or infinite.
    #[error("Non-finite amplitude for basis state {0}")]
    NonFiniteAmplitude(String),
}

impl EngineError {
    /// Create an invalid selector error.
    pub fn invalid_selector(selector: impl Into<String>) -> Self {
        Self::InvalidQubitSelector(selector.into())
    }
}

/// Result alias for session runtime operations.
pub type SessionResult<T> = std::result::Result<T, SessionError>;

/// Failures raised by the session runtime.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    /// No session is stored under this id.
    #[error("Session not found: {0}")]
    NotFound(Uuid),

    /// Command text does not follow the `kind:argument` grammar.
    #[error("Malformed command '{input}': {reason}")]
    MalformedCommand {
        /// Offending input.
        input: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Script line failed to parse.
    #[error("line {line}: {source}")]
    Script {
        /// 1-based line number.
        line: usize,
        /// Underlying parse failure.
        #[source]
        source: Box<SessionError>,
    },

    /// Trial request above the configured ceiling.
    #[error("Requested {requested} trials, limit is {limit}")]
    TrialLimitExceeded {
        /// Requested trial count.
        requested: usize,
        /// Configured `max_trials`.
        limit: usize,
    },

    /// Engine rejected the operation.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl SessionError {
    /// Create a malformed command error.
    pub fn malformed(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedCommand {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

/// Failures raised while loading [`crate::config::PlaygroundConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot parse config file: {0}")]
    Json(#[from] serde_json::Error),

    /// Environment variable present but unparsable.
    #[error("Invalid value '{value}' for {key}")]
    InvalidEnv { key: String, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EngineError::UnsupportedGate("Y".into());
        assert_eq!(err.to_string(), "Unsupported gate: Y");

        let err = EngineError::InvalidTrialCount(-3);
        assert!(err.to_string().contains("-3"));

        let err = EngineError::invalid_selector("Q3");
        assert!(err.to_string().contains("Q3"));
    }

    #[test]
    fn test_engine_error_converts_into_session_error() {
        let err: SessionError = EngineError::ZeroNormState.into();
        assert_eq!(err, SessionError::Engine(EngineError::ZeroNormState));
        assert_eq!(err.to_string(), "State vector cannot be zero");
    }

    #[test]
    fn test_script_error_carries_line() {
        let err = SessionError::Script {
            line: 4,
            source: Box::new(SessionError::malformed("gate", "missing ':'")),
        };
        assert!(err.to_string().starts_with("line 4:"));
    }
}
