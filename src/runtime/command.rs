/// Operation grammar for the session runtime.
///
/// One command per token, `kind:argument`, case-sensitive:
///
///   gate:X | gate:H | gate:CNOT
///   measure:Q1 | measure:Q2 | measure:BOTH
///   reset:Q1 | reset:Q2
///   hard_reset
///   trials:<Q1|Q2|BOTH>,<n>
///
/// Scripts are line-oriented: one command per line, blank lines ignored,
/// comments begin with `//` or `#` and run to end of line.
use crate::core::basis::{MeasureScope, Qubit};
use crate::core::gates::Gate;
use crate::core::trials::trial_count;
use crate::error::{SessionError, SessionResult};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ApplyGate(Gate),
    Measure(MeasureScope),
    Reset(Qubit),
    HardReset,
    Trials { scope: MeasureScope, n: usize },
}

impl Command {
    /// True for commands that replace the stored vector.
    pub fn mutates_state(&self) -> bool {
        !matches!(self, Command::Trials { .. })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::ApplyGate(gate) => write!(f, "gate:{gate}"),
            Command::Measure(scope) => write!(f, "measure:{scope}"),
            Command::Reset(qubit) => write!(f, "reset:{qubit}"),
            Command::HardReset => f.write_str("hard_reset"),
            Command::Trials { scope, n } => write!(f, "trials:{scope},{n}"),
        }
    }
}

impl FromStr for Command {
    type Err = SessionError;

    fn from_str(input: &str) -> SessionResult<Self> {
        let input = input.trim();
        if input == "hard_reset" {
            return Ok(Command::HardReset);
        }

        let (kind, arg) = input
            .split_once(':')
            .ok_or_else(|| SessionError::malformed(input, "expected '<kind>:<argument>'"))?;
        if arg.is_empty() {
            return Err(SessionError::malformed(input, "missing argument"));
        }

        match kind {
            "gate" => Ok(Command::ApplyGate(arg.parse()?)),
            "measure" => Ok(Command::Measure(arg.parse()?)),
            "reset" => Ok(Command::Reset(arg.parse()?)),
            "trials" => {
                let (scope, n) = arg
                    .split_once(',')
                    .ok_or_else(|| SessionError::malformed(input, "expected 'trials:<scope>,<n>'"))?;
                let scope: MeasureScope = scope.trim().parse()?;
                let n: i64 = n
                    .trim()
                    .parse()
                    .map_err(|_| SessionError::malformed(input, format!("'{}' is not an integer", n.trim())))?;
                Ok(Command::Trials {
                    scope,
                    n: trial_count(n)?,
                })
            }
            other => Err(SessionError::malformed(input, format!("unknown command kind '{other}'"))),
        }
    }
}

/// Parse a command script, one command per non-empty line.
pub fn parse_script(source: &str) -> SessionResult<Vec<Command>> {
    let mut commands = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        let content = strip_comment(line).trim();
        if content.is_empty() {
            continue;
        }
        let command = content.parse().map_err(|err| SessionError::Script {
            line: idx + 1,
            source: Box::new(err),
        })?;
        commands.push(command);
    }
    Ok(commands)
}

fn strip_comment(line: &str) -> &str {
    let cut = [line.find("//"), line.find('#')]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(line.len());
    &line[..cut]
}
