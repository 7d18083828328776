//! Error taxonomy for the Jack compiler.

use jack_tokenizer::LexError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JackError {
    #[error("unexpected token at {line}:{column}: expected {expected}, found '{found}'")]
    UnexpectedToken {
        expected: String,
        found: String,
        line: u32,
        column: u32,
    },

    #[error("symbol '{0}' already declared in this scope")]
    DuplicateSymbol(String),

    #[error("reference to undeclared identifier '{0}'")]
    UndeclaredIdentifier(String),

    #[error(transparent)]
    Lex(#[from] LexError),
}

/// Compilation-unit-level error: either a semantic [`JackError`] or an I/O
/// failure while writing the emitted VM text.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Jack(#[from] JackError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
