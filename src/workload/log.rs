//! The text format for persisted workloads.
//!
//! One operation per line, as whitespace-separated tokens:
//!
//! ```text
//! read <index>
//! write <index> <value>
//! snapshot
//! ```
//!
//! Blank lines, unknown commands and lines whose numbers are missing or do not
//! parse are skipped when a log is read. Tokens after the last expected one
//! are ignored.
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use tracing::{debug, trace};

use super::Operation;
use crate::{Error, ParseOperationError};

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Read(index) => write!(f, "read {index}"),
            Operation::Write(index, value) => write!(f, "write {index} {value}"),
            Operation::Snapshot => write!(f, "snapshot"),
        }
    }
}

impl FromStr for Operation {
    type Err = ParseOperationError;

    /// Parses one line of a workload log.
    ///
    /// # Examples
    ///
    /// ```
    /// use todc_contention::Operation;
    ///
    /// assert_eq!("write 2 -7".parse(), Ok(Operation::Write(2, -7)));
    /// assert!("read".parse::<Operation>().is_err());
    /// ```
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            None => Err(ParseOperationError::Empty),
            Some("read") => Ok(Operation::Read(number(tokens.next(), "index")?)),
            Some("write") => {
                let index = number(tokens.next(), "index")?;
                let value = number(tokens.next(), "value")?;
                Ok(Operation::Write(index, value))
            }
            Some("snapshot") => Ok(Operation::Snapshot),
            Some(command) => Err(ParseOperationError::UnknownCommand(command.to_owned())),
        }
    }
}

fn number<T: FromStr>(token: Option<&str>, name: &'static str) -> Result<T, ParseOperationError> {
    let token = token.ok_or(ParseOperationError::MissingArgument(name))?;
    token
        .parse()
        .map_err(|_| ParseOperationError::InvalidNumber(token.to_owned()))
}

/// Parses every well-formed line of a workload log, skipping the rest.
///
/// Only I/O failures are reported as errors.
pub fn parse_log<R: BufRead>(reader: R) -> Result<Vec<Operation>, Error> {
    let mut operations = Vec::new();
    let mut skipped = 0usize;
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        match line.parse() {
            Ok(operation) => operations.push(operation),
            Err(reason) => {
                trace!(line = number + 1, %reason, "skipping log line");
                skipped += 1;
            }
        }
    }
    if skipped > 0 {
        debug!(skipped, parsed = operations.len(), "skipped malformed log lines");
    }
    Ok(operations)
}

/// Reads a workload log from a file.
pub fn read_log(path: impl AsRef<Path>) -> Result<Vec<Operation>, Error> {
    parse_log(BufReader::new(File::open(path)?))
}

/// Writes operations, one per line.
pub fn write_operations<W: Write>(mut writer: W, operations: &[Operation]) -> Result<(), Error> {
    for operation in operations {
        writeln!(writer, "{operation}")?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes a workload log to a file, replacing any existing contents.
pub fn write_log(path: impl AsRef<Path>, operations: &[Operation]) -> Result<(), Error> {
    write_operations(BufWriter::new(File::create(path)?), operations)
}
