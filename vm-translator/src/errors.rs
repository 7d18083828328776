//! Error taxonomy for the VM translator.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VmError {
    #[error("unknown segment '{0}'")]
    UnknownSegment(String),

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("wrong number of arguments for '{command}': expected {expected}, found {found}")]
    WrongArgCount {
        command: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid pointer offset {0}, must be 0 or 1")]
    InvalidPointerOffset(i32),

    #[error("unparsable numeric argument '{0}'")]
    UnparsableArg(String),
}

/// Translation-unit-level error: either a semantic [`VmError`] or an I/O
/// failure while writing assembly output.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error(transparent)]
    Vm(#[from] VmError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
