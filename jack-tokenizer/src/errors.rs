//! Error taxonomy for the Jack tokenizer.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LexError {
    #[error("invalid character '{ch}' at {line}:{column}")]
    InvalidCharacter { ch: char, line: u32, column: u32 },

    #[error("unterminated string constant starting at {line}:{column}")]
    UnterminatedString { line: u32, column: u32 },

    #[error("unterminated block comment starting at {line}:{column}")]
    UnterminatedComment { line: u32, column: u32 },

    #[error("integer constant '{value}' at {line}:{column} overflows 16 bits")]
    IntegerOverflow {
        value: String,
        line: u32,
        column: u32,
    },
}
