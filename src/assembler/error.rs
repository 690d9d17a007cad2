//! Errors produced while assembling a Hack program.
//!
//! Every error is fatal: assembly is all-or-nothing.
use thiserror::Error;

#[derive(Error, Clone, PartialEq, Eq, Debug)]
pub enum Error {
    #[error("unresolved symbol `{0}`")]
    UnresolvedSymbol(String),

    #[error("unrecognized computation `{0}`")]
    UnknownComputation(String),

    #[error("unrecognized jump mnemonic `{0}`")]
    UnknownJump(String),

    #[error("unparseable instruction `{0}`")]
    Malformed(String),

    #[error("address `{0}` does not fit in 15 bits (max 32767)")]
    AddressOutOfRange(String),

    #[error("label `{0}` is already defined at address {1}")]
    RedefinedLabel(String, u16),
}

/// An `Error` tied to the 1-based source line it was raised on.
#[derive(Error, Clone, PartialEq, Eq, Debug)]
#[error("line {line}: {error}")]
pub struct LineError {
    pub line: usize,
    #[source]
    pub error: Error,
}

impl LineError {
    pub fn new(line: usize, error: Error) -> Self {
        LineError { line, error }
    }
}
