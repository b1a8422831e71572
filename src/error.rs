//! Ambient error types.
//!
//! The domain-level outcome of validating or simulating a malformed graph
//! is never a Rust error — it is a [`crate::validator::ValidationResult`]
//! with a populated `errors` list (see the module docs on
//! [`crate::validator`]). `CoreError` exists only for conditions a caller
//! cannot recover from by inspecting a result: a bad configuration file, an
//! unreadable input file, or undecodable JSON at the CLI boundary. The
//! library itself never performs I/O and never returns `CoreError` from
//! `validate`/`simulate`.

use std::fmt;

#[derive(Debug)]
pub enum CoreError {
    Config(ConfigError),
    Io(std::io::Error),
    Decode(serde_json::Error),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::Config(e) => write!(f, "configuration error: {e}"),
            CoreError::Io(e) => write!(f, "i/o error: {e}"),
            CoreError::Decode(e) => write!(f, "malformed graph: {e}"),
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CoreError::Config(_) => None,
            CoreError::Io(e) => Some(e),
            CoreError::Decode(e) => Some(e),
        }
    }
}

impl From<ConfigError> for CoreError {
    fn from(value: ConfigError) -> Self {
        CoreError::Config(value)
    }
}

impl From<std::io::Error> for CoreError {
    fn from(value: std::io::Error) -> Self {
        CoreError::Io(value)
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(value: serde_json::Error) -> Self {
        CoreError::Decode(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidToml(String),
    ZeroLimit(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidToml(msg) => write!(f, "invalid config: {msg}"),
            ConfigError::ZeroLimit(field) => write!(f, "{field} must be greater than zero"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Error from [`crate::graph_builder::GraphBuilder`], the programmatic
/// construction helper. Distinct from [`crate::validator::ValidationResult`]:
/// this catches caller mistakes while *building* a graph in Rust code
/// (e.g. in tests), not structural defects in an already-assembled one —
/// those are still reported by `validate` as usual.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphBuilderError {
    DuplicateNodeId(String),
}

impl fmt::Display for GraphBuilderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphBuilderError::DuplicateNodeId(id) => {
                write!(f, "node id {id:?} is already present in this builder")
            }
        }
    }
}

impl std::error::Error for GraphBuilderError {}
