//! Jack Compiler - Main Entry Point
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use tracing::{debug, info};

#[derive(ClapParser, Debug)]
#[command(name = "jack-compiler", version, about)]
struct Cli {
    /// A single `.jack` file, or a directory containing one or more.
    input: PathBuf,

    /// Where to write the compiled `.vm` files (defaults to alongside the input).
    outdir: Option<PathBuf>,
}

fn jack_files(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_dir() {
        let mut files: Vec<PathBuf> = fs::read_dir(input)
            .with_context(|| format!("failed to read directory {}", input.display()))?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "jack"))
            .collect();
        files.sort();
        Ok(files)
    } else {
        Ok(vec![input.to_path_buf()])
    }
}

fn compile_one(path: &Path, outdir: &Path) -> Result<()> {
    debug!(file = %path.display(), "compiling class");
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let vm_text =
        jack_compiler::compile_source(&source).with_context(|| format!("failed to compile {}", path.display()))?;

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Unknown");
    let out_path = outdir.join(format!("{stem}.vm"));
    fs::write(&out_path, vm_text)
        .with_context(|| format!("failed to write {}", out_path.display()))?;
    info!(output = %out_path.display(), "wrote compiled VM code");
    Ok(())
}

fn main() -> Result<()> {
    hack_common::init_logging();
    let cli = Cli::parse();

    let files = jack_files(&cli.input)?;
    if files.is_empty() {
        anyhow::bail!("no .jack files found in {}", cli.input.display());
    }

    let default_outdir = if cli.input.is_dir() {
        cli.input.clone()
    } else {
        cli.input
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    };
    let outdir = cli.outdir.unwrap_or(default_outdir);

    for file in &files {
        compile_one(file, &outdir)?;
    }

    info!(count = files.len(), "compilation complete");
    Ok(())
}
