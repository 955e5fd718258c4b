use std::io;

use thiserror::Error;

/// Errors produced while building, driving or reporting on a [`FieldStore`](crate::FieldStore).
#[derive(Debug, Error)]
pub enum Error {
    /// A read or write addressed a field the store does not have.
    #[error("field index {index} is out of range for a store with {field_count} fields")]
    IndexOutOfRange { index: usize, field_count: usize },

    /// An executor thread panicked before finishing its replay.
    #[error("an executor thread panicked")]
    ExecutorPanicked,

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

/// Reasons a single line of an operation log could not be parsed.
///
/// These never reach an executor: malformed lines are skipped while reading a
/// log.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseOperationError {
    #[error("empty line")]
    Empty,

    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error("missing {0}")]
    MissingArgument(&'static str),

    #[error("invalid number `{0}`")]
    InvalidNumber(String),
}
