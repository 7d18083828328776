//! Hack VM Translator for the `Nand2Tetris` course
//!
//! Translates Hack VM bytecode (`.vm`) into Hack assembly (`.asm`),
//! implementing the full calling convention: arithmetic/logical commands,
//! memory segment access, program flow (`label`/`goto`/`if-goto`), and
//! function call/return with a `SP=256; call Sys.init 0` bootstrap prelude
//! for multi-file translation units.
//!
//! # Architecture
//! - [`parser`]: classifies and extracts the arguments of each VM command
//! - [`code_writer`]: emits the corresponding Hack assembly
//! - [`errors`]: the crate's typed error taxonomy

#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod code_writer;
pub mod errors;
pub mod parser;

pub use code_writer::CodeWriter;
pub use errors::{TranslateError, VmError};
pub use parser::{CommandType, Parser};

/// Translates one module's worth of VM source lines (already stripped of
/// comments and blank lines) into the writer's output stream, tagging
/// `static` references with `module_name`.
///
/// # Errors
/// Returns the first [`TranslateError`] encountered.
pub fn translate_module<W: std::io::Write>(
    lines: Vec<String>,
    module_name: &str,
    writer: &mut CodeWriter<W>,
) -> Result<(), TranslateError> {
    writer.set_module(module_name);
    let mut parser = Parser::from_lines(lines);

    while parser.has_more_commands() {
        parser.advance();
        match parser.command_type() {
            CommandType::Arithmetic => writer.write_arithmetic(parser.arg1()?)?,
            CommandType::Push => writer.write_push_pop("push", parser.arg1()?, parser.arg2()?)?,
            CommandType::Pop => writer.write_push_pop("pop", parser.arg1()?, parser.arg2()?)?,
            CommandType::Label => writer.write_label(parser.arg1()?)?,
            CommandType::Goto => writer.write_goto(parser.arg1()?)?,
            CommandType::If => writer.write_if_goto(parser.arg1()?)?,
            CommandType::Function => {
                let n = non_negative_arg(parser.arg2()?)?;
                writer.write_function(parser.arg1()?, n)?;
            }
            CommandType::Call => {
                let n = non_negative_arg(parser.arg2()?)?;
                writer.write_call(parser.arg1()?, n)?;
            }
            CommandType::Return => writer.write_return()?,
        }
    }
    Ok(())
}

fn non_negative_arg(value: i32) -> Result<u16, VmError> {
    u16::try_from(value).map_err(|_| VmError::UnparsableArg(value.to_string()))
}

/// Derives the module name the assembler uses to qualify `static i`
/// variables: the file's stem, matching spec's "basename of the source
/// file" rule.
#[must_use]
pub fn module_name(path: &std::path::Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Unknown")
        .to_string()
}
