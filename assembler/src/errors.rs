//! Error taxonomy for the Hack assembler.
//!
//! Per the assembler's contract, unknown `comp`/`jmp`/`dest` mnemonics and
//! unparsable lines are all fatal to translation.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssemblerError {
    #[error("unknown computation mnemonic '{0}'")]
    UnknownComp(String),

    #[error("unknown jump mnemonic '{0}'")]
    UnknownJump(String),

    #[error("unknown destination mnemonic '{0}'")]
    UnknownDest(String),

    #[error("unparsable line '{0}'")]
    UnparsableLine(String),
}
