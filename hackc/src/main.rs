//! `hackc` - Umbrella CLI for the Hack toolchain
//!
//! A thin multi-command wrapper around the `assembler`, `vm-translator`, and
//! `jack-compiler` library crates, kept alongside their standalone binaries
//! for a single entry point into the whole pipeline.
//!
//! ```bash
//! hackc asm <file.asm>
//! hackc vm <path> [--no-bootstrap]
//! hackc jack <path> [outdir]
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use tracing::{debug, info};

use assembler::{assemble, words_to_bin_bytes, words_to_hack_text};
use vm_translator::{module_name, translate_module, CodeWriter};

#[derive(ClapParser, Debug)]
#[command(name = "hackc", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assemble Hack assembly (`.asm`) into machine code (`.hack` and `.bin`).
    Asm {
        /// Path to the `.asm` source file.
        input: PathBuf,
    },
    /// Translate Hack VM bytecode (`.vm`) into Hack assembly (`.asm`).
    Vm {
        /// A `.vm` file, or a directory containing one or more `.vm` files.
        input: PathBuf,
        /// Skip the `SP=256; call Sys.init 0` bootstrap prelude.
        #[arg(short = 'n', long = "no-bootstrap")]
        no_bootstrap: bool,
    },
    /// Compile Jack source (`.jack`) into VM bytecode (`.vm`).
    Jack {
        /// A `.jack` file, or a directory containing one or more.
        input: PathBuf,
        /// Where to write the compiled `.vm` files (defaults alongside the input).
        outdir: Option<PathBuf>,
    },
}

fn run_asm(input: &PathBuf) -> Result<()> {
    let lines = BufReader::new(
        File::open(input).with_context(|| format!("failed to open {}", input.display()))?,
    )
    .lines()
    .collect::<std::io::Result<Vec<_>>>()
    .with_context(|| format!("failed to read {}", input.display()))?;

    let words =
        assemble(&lines).with_context(|| format!("failed to assemble {}", input.display()))?;

    let hack_path = input.with_extension("hack");
    let bin_path = input.with_extension("bin");
    fs::write(&hack_path, words_to_hack_text(&words))
        .with_context(|| format!("failed to write {}", hack_path.display()))?;
    fs::write(&bin_path, words_to_bin_bytes(&words))
        .with_context(|| format!("failed to write {}", bin_path.display()))?;

    info!(instructions = words.len(), hack = %hack_path.display(), "assembly complete");
    Ok(())
}

fn strip_vm_comments(raw: &str) -> Vec<String> {
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

fn resolve_vm_inputs(input: &Path) -> Result<(Vec<PathBuf>, PathBuf)> {
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
        Ok((vm_files, input.join(format!("{dir_name}.asm"))))
    } else {
        Ok((vec![input.to_path_buf()], input.with_extension("asm")))
    }
}

fn run_vm(input: &Path, no_bootstrap: bool) -> Result<()> {
    let (vm_files, output_path) = resolve_vm_inputs(input)?;
    if vm_files.is_empty() {
        anyhow::bail!("no .vm files found in {}", input.display());
    }
    debug!(count = vm_files.len(), "resolved VM source files");

    let mut writer = CodeWriter::new(Vec::new());
    if input.is_dir() && !no_bootstrap {
        writer.write_bootstrap().context("failed to write bootstrap")?;
    }

    for vm_file in &vm_files {
        let module = module_name(vm_file);
        let mut raw = String::new();
        File::open(vm_file)
            .with_context(|| format!("failed to open {}", vm_file.display()))?
            .read_to_string(&mut raw)
            .with_context(|| format!("failed to read {}", vm_file.display()))?;
        translate_module(strip_vm_comments(&raw), &module, &mut writer)
            .with_context(|| format!("failed to translate {}", vm_file.display()))?;
    }

    writer.flush().context("failed to flush output")?;
    fs::write(&output_path, writer.into_inner())
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    info!(modules = vm_files.len(), output = %output_path.display(), "translation complete");
    Ok(())
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

fn run_jack(input: &Path, outdir: Option<PathBuf>) -> Result<()> {
    let files = jack_files(input)?;
    if files.is_empty() {
        anyhow::bail!("no .jack files found in {}", input.display());
    }
    let default_outdir = if input.is_dir() {
        input.to_path_buf()
    } else {
        input.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."))
    };
    let outdir = outdir.unwrap_or(default_outdir);

    for file in &files {
        let source = fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))?;
        let vm_text = jack_compiler::compile_source(&source)
            .with_context(|| format!("failed to compile {}", file.display()))?;
        let stem = file.file_stem().and_then(|s| s.to_str()).unwrap_or("Unknown");
        let out_path = outdir.join(format!("{stem}.vm"));
        fs::write(&out_path, vm_text)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        info!(output = %out_path.display(), "wrote compiled VM code");
    }

    info!(count = files.len(), "compilation complete");
    Ok(())
}

fn main() -> Result<()> {
    hack_common::init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Asm { input } => run_asm(&input),
        Command::Vm { input, no_bootstrap } => run_vm(&input, no_bootstrap),
        Command::Jack { input, outdir } => run_jack(&input, outdir),
    }
}
