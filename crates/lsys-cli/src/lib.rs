// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! lsys command line.
//!
//! Wires argument parsing, saved prefs and the rewrite engine together. The
//! binary in `src/bin/lsys.rs` only calls [`entrypoint`]; [`run`] takes the
//! parsed [`Cli`] and an output writer so the commands can be driven in tests.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

pub mod args;
mod commands;
mod rule_input;
mod store;

use std::io::Write;

use anyhow::{anyhow, Result};
use clap::Parser;
use lsys_app_core::config_port::PrefsPort;
use tracing_subscriber::EnvFilter;

pub use args::{Cli, Commands};
pub use store::PrefsStore;

/// Parses the process arguments, installs logging and runs the command against stdout.
pub fn entrypoint() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(cli, &mut out)
}

/// Runs an already parsed command line, writing its report to `out`.
pub fn run<W: Write>(cli: Cli, out: &mut W) -> Result<()> {
    let svc = PrefsStore::open(cli.no_prefs, cli.config_dir.as_deref());
    let prefs = svc.load_prefs().unwrap_or_default();

    match cli.command {
        Commands::Generate(args) => commands::generate(args, &prefs, out),
        Commands::Modify(args) => commands::modify(args, &prefs, out),
        Commands::Presets => commands::list_presets(out),
        Commands::Inspect(args) => commands::inspect(args, out),
        Commands::Rules(args) => commands::save_rules(args, out),
        Commands::Prefs { action } => commands::prefs(action, &svc, prefs, out),
    }
}

/// Installs the stderr log subscriber (`RUST_LOG` overrides `--verbose`).
fn init_tracing(verbose: bool) -> Result<()> {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(fallback))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {err}"))
}
