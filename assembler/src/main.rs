//! Hack Assembler - Main Entry Point
//!
//! A two-pass assembler for the Hack assembly language (`Nand2Tetris` Project 6).
//!
//! # Architecture
//! - **Pass 1**: Builds the symbol table by recording label positions
//! - **Pass 2**: Generates machine code, resolving all symbols
//!
//! # Usage
//! ```bash
//! assembler <input.asm>
//! ```
//!
//! Writes `<base>.hack` (text) and `<base>.bin` (big-endian binary) next to
//! the input file.

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use tracing::{debug, info};

use assembler::{assemble, words_to_bin_bytes, words_to_hack_text};

/// Translate Hack assembly (`.asm`) into machine code (`.hack` and `.bin`).
#[derive(ClapParser, Debug)]
#[command(name = "assembler", version, about)]
struct Cli {
    /// Path to the `.asm` source file.
    input: PathBuf,
}

fn read_lines(path: &PathBuf) -> Result<Vec<String>> {
    let file = fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    BufReader::new(file)
        .lines()
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("failed to read {}", path.display()))
}

fn main() -> Result<()> {
    hack_common::init_logging();

    let cli = Cli::parse();
    debug!(input = %cli.input.display(), "reading assembly source");

    let lines = read_lines(&cli.input)?;
    let words = assemble(&lines)
        .with_context(|| format!("failed to assemble {}", cli.input.display()))?;

    let hack_path = cli.input.with_extension("hack");
    let bin_path = cli.input.with_extension("bin");

    fs::write(&hack_path, words_to_hack_text(&words))
        .with_context(|| format!("failed to write {}", hack_path.display()))?;
    fs::write(&bin_path, words_to_bin_bytes(&words))
        .with_context(|| format!("failed to write {}", bin_path.display()))?;

    info!(
        instructions = words.len(),
        hack = %hack_path.display(),
        bin = %bin_path.display(),
        "assembly complete"
    );
    Ok(())
}
