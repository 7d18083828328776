//! Hack VM Translator - Main Entry Point
//!
//! Translates a single `.vm` file, or every `.vm` file in a directory (one
//! compilation unit sharing a bootstrap prelude), into a single `.asm`
//! output.
//!
//! # Usage
//! ```bash
//! vm-translator <input.vm|dir> [--no-bootstrap]
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use tracing::{debug, info};

use vm_translator::{module_name, translate_module, CodeWriter};

/// Translate Hack VM bytecode (`.vm`) into Hack assembly (`.asm`).
#[derive(ClapParser, Debug)]
#[command(name = "vm-translator", version, about)]
struct Cli {
    /// A `.vm` file, or a directory containing one or more `.vm` files.
    input: PathBuf,

    /// Skip the `SP=256; call Sys.init 0` bootstrap prelude.
    #[arg(short = 'n', long = "no-bootstrap")]
    no_bootstrap: bool,
}

fn strip_source(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| match line.find("//") {
            Some(pos) => &line[..pos],
            None => line,
        })
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn read_source(path: &Path) -> Result<String> {
    let mut buf = String::new();
    File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?
        .read_to_string(&mut buf)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(buf)
}

/// Resolves the input path into (module `.vm` files, output `.asm` path),
/// matching the Python reference's directory-vs-file handling in `main()`.
fn resolve_inputs(input: &Path) -> Result<(Vec<PathBuf>, PathBuf)> {
    if input.is_dir() {
        let mut vm_files: Vec<PathBuf> = fs::read_dir(input)
            .with_context(|| format!("failed to read directory {}", input.display()))?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("vm"))
            .collect();
        vm_files.sort();
        let dir_name = input
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("out")
            .to_string();
        let output = input.join(format!("{dir_name}.asm"));
        Ok((vm_files, output))
    } else {
        Ok((vec![input.to_path_buf()], input.with_extension("asm")))
    }
}

fn main() -> Result<()> {
    hack_common::init_logging();

    let cli = Cli::parse();
    let (vm_files, output_path) = resolve_inputs(&cli.input)?;
    if vm_files.is_empty() {
        anyhow::bail!("no .vm files found in {}", cli.input.display());
    }
    debug!(count = vm_files.len(), "resolved VM source files");

    // Buffer the whole translation in memory and only touch the filesystem
    // once everything succeeds, so a failing module never leaves a
    // partial/invalid `.asm` file behind.
    let mut writer = CodeWriter::new(Vec::new());

    if cli.input.is_dir() && !cli.no_bootstrap {
        writer.write_bootstrap().context("failed to write bootstrap")?;
    }

    for vm_file in &vm_files {
        let module = module_name(vm_file);
        let raw = read_source(vm_file)?;
        let lines = strip_source(&raw);
        translate_module(lines, &module, &mut writer)
            .with_context(|| format!("failed to translate {}", vm_file.display()))?;
    }

    writer.flush().context("failed to flush output")?;
    fs::write(&output_path, writer.into_inner())
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    info!(
        modules = vm_files.len(),
        output = %output_path.display(),
        "translation complete"
    );
    Ok(())
}
