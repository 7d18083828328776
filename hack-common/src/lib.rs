//! Shared logging setup for the Hack toolchain.
//!
//! Every binary (assembler, vm-translator, jack-compiler, hackc) calls
//! [`init_logging`] once at the top of `main` so `tracing` output is
//! configured consistently across the pipeline.

/// Initializes a process-wide `tracing` subscriber reading `RUST_LOG`,
/// defaulting to `info` when unset. Each binary calls this once at the top
/// of `main`.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
