//! Hack Assembler for the `Nand2Tetris` course
//!
//! This crate provides a high-performance Hack assembly language assembler that translates
//! assembly code into Hack machine code.
//!
//! # Architecture
//!
//! The assembler consists of four main modules:
//! - [`parser`]: Zero-copy parsing of assembly instructions
//! - [`code`]: Binary encoding using perfect hash functions (PHF)
//! - [`symbol_table`]: Symbol management with predefined symbols
//! - [`macros`]: Compile-time optimizations and utilities
//!
//! # Performance Optimizations
//!
//! - **PHF (Perfect Hash Functions)**: O(1) compile-time hash maps for instruction encoding
//! - **Zero-copy parsing**: Uses string slices to avoid allocations
//! - **Aggressive inlining**: Hot path functions are force-inlined
//! - **Pre-allocated capacity**: Reduces rehashing overhead
//! - **Link-time optimization (LTO)**: Enabled in release profile
//!
//! # Example
//!
//! ```rust
//! use assembler::{ParserLines, CommandType, SymbolTable, code};
//!
//! // Parse assembly code
//! let lines = vec!["@100".to_string(), "D=M".to_string()];
//! let mut parser = ParserLines::from_lines(&lines);
//!
//! // Process first instruction
//! parser.advance();
//! assert_eq!(parser.command_type().unwrap(), CommandType::ACommand);
//! assert_eq!(parser.symbol().unwrap(), "100");
//!
//! // Process second instruction
//! parser.advance();
//! assert_eq!(parser.command_type().unwrap(), CommandType::CCommand);
//! let instruction = code::encode_c_instruction("D", "M", "").unwrap();
//! assert_eq!(instruction, "1111110000010000");
//!
//! // Use symbol table
//! let mut symbols = SymbolTable::new();
//! symbols.add_entry("LOOP", 10);
//! assert_eq!(symbols.get_address("LOOP"), 10);
//! assert_eq!(symbols.get_address("SP"), 0); // Predefined symbol
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::inline_always,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

#[macro_use]
pub mod macros;

pub mod code;
pub mod errors;
pub mod parser;
pub mod symbol_table;

// Re-export commonly used types for convenience
pub use errors::AssemblerError;
pub use parser::{CommandType, ParserError, ParserLines};
pub use symbol_table::SymbolTable;

/// Assembles a complete `.asm` source (given as lines) into the sequence of
/// 16-bit machine words, running the standard two-pass symbol resolution
/// described in the assembler's contract.
///
/// # Errors
/// Returns the first [`AssemblerError`] encountered during pass 2.
pub fn assemble(lines: &[String]) -> Result<Vec<u16>, AssemblerError> {
    let mut symbols = SymbolTable::new();

    // Pass 1: bind label symbols to the address of the following instruction.
    let mut rom_address: u16 = 0;
    let mut parser = ParserLines::from_lines(lines);
    while parser.advance() {
        parser.validate_current()?;
        match parser.command_type().expect("advance() guarantees a command") {
            CommandType::LCommand => {
                let symbol = parser.symbol().expect("L-command always has a symbol");
                symbols.add_entry(symbol, rom_address);
            }
            CommandType::ACommand | CommandType::CCommand => rom_address += 1,
        }
    }

    // Pass 2: resolve symbols and emit machine words.
    let mut ram_address: u16 = 16;
    let mut words = Vec::with_capacity(lines.len());
    let mut parser = ParserLines::from_lines(lines);
    while parser.advance() {
        match parser.command_type().expect("advance() guarantees a command") {
            CommandType::ACommand => {
                let symbol = parser.symbol().expect("A-command always has a symbol");
                let address = symbol
                    .parse::<u16>()
                    .unwrap_or_else(|_| symbols.get_or_insert(symbol, &mut ram_address));
                words.push(code::encode_a_word(address));
            }
            CommandType::CCommand => {
                let dest = parser
                    .dest()
                    .expect("C-command dest")
                    .unwrap_or("");
                let comp = parser
                    .comp()
                    .expect("C-command comp")
                    .unwrap_or("");
                let jump = parser
                    .jump()
                    .expect("C-command jump")
                    .unwrap_or("");
                words.push(code::encode_c_word(dest, comp, jump)?);
            }
            CommandType::LCommand => {}
        }
    }

    Ok(words)
}

/// Renders machine words as `.hack` text: one 16-character '0'/'1' line per
/// word, in program order.
#[must_use]
pub fn words_to_hack_text(words: &[u16]) -> String {
    let mut out = String::with_capacity(words.len() * 17);
    for word in words {
        out.push_str(&format!("{word:016b}\n"));
    }
    out
}

/// Renders machine words as big-endian `.bin` bytes, two per instruction, no
/// header and no padding.
#[must_use]
pub fn words_to_bin_bytes(words: &[u16]) -> Vec<u8> {
    let mut out = Vec::with_capacity(words.len() * 2);
    for word in words {
        out.extend_from_slice(&word.to_be_bytes());
    }
    out
}
