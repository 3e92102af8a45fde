// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Command-line surface of the `lsys` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use lsys_core::ReplacementMode;

/// Top-level arguments.
#[derive(Debug, Parser)]
#[command(name = "lsys", version)]
#[command(about = "Generate and modify Lindenmayer-system grammars")]
pub struct Cli {
    /// Log at debug level (`RUST_LOG` takes precedence when set).
    #[arg(short, long, global = true)]
    pub verbose: bool,
    /// Ignore saved prefs; `prefs set` then only affects this invocation.
    #[arg(long, global = true)]
    pub no_prefs: bool,
    /// Directory holding saved prefs (defaults to the platform config dir).
    #[arg(long, global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// `lsys` subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a preset or a user-defined rule table from a start string
    Generate(GenerateArgs),
    /// Continue from generation N of a stored `.lstrace` trace
    Modify(ModifyArgs),
    /// List the built-in presets
    Presets,
    /// Show the contents of a stored `.lstrace` trace
    Inspect(InspectArgs),
    /// Validate a rule table and save it as a rule listing
    Rules(RulesArgs),
    /// Show or change saved defaults
    Prefs {
        /// Prefs action.
        #[command(subcommand)]
        action: PrefsAction,
    },
}

/// Where a rule table comes from.
#[derive(Debug, Clone, Default, Args)]
pub struct RuleArgs {
    /// Rule as `PATTERN=REPLACEMENT`; repeat in declaration order
    #[arg(short = 'r', long = "rule", value_name = "PATTERN=REPLACEMENT")]
    pub rules: Vec<String>,
    /// Read rules from a listing with one `pattern  -->  replacement` per line
    #[arg(long, value_name = "FILE", conflicts_with = "rules")]
    pub rules_file: Option<PathBuf>,
    /// Replacement mode: classic, segmentwise, continuous or continuous-skip
    /// (classic is assumed when every pattern is one symbol)
    #[arg(short, long)]
    pub mode: Option<ReplacementMode>,
}

impl RuleArgs {
    /// `true` when neither `--rule` nor `--rules-file` was given.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.rules_file.is_none()
    }
}

/// Output selection shared by `generate` and `modify`.
#[derive(Debug, Clone, Default, Args)]
pub struct OutputArgs {
    /// Directory the results are written to
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,
    /// File name prefix for the results
    #[arg(long)]
    pub prefix: Option<String>,
    /// Write the three text listings
    #[arg(long, overrides_with = "no_text")]
    pub text: bool,
    /// Skip the text listings
    #[arg(long, overrides_with = "text")]
    pub no_text: bool,
    /// Write a binary `.lstrace` trace that `modify` can reload
    #[arg(long, overrides_with = "no_binary")]
    pub binary: bool,
    /// Skip the binary trace
    #[arg(long, overrides_with = "binary")]
    pub no_binary: bool,
    /// Stop once a generation grows past this many symbols
    #[arg(long, value_name = "SYMBOLS")]
    pub max_len: Option<usize>,
    /// Print every generation to stdout, one per line
    #[arg(long)]
    pub print: bool,
}

/// `lsys generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Built-in system to run (see `lsys presets`)
    #[arg(short, long, conflicts_with_all = ["rules", "rules_file"])]
    pub preset: Option<String>,
    /// User-defined rules.
    #[command(flatten)]
    pub rule_args: RuleArgs,
    /// Start string (generation 0)
    #[arg(short, long)]
    pub start: String,
    /// Number of rewrite steps
    #[arg(short = 'n', long)]
    pub recursions: Option<u32>,
    /// Output selection.
    #[command(flatten)]
    pub output: OutputArgs,
}

/// `lsys modify`.
#[derive(Debug, Args)]
pub struct ModifyArgs {
    /// Trace written by `generate --binary`
    #[arg(long, value_name = "FILE")]
    pub from: PathBuf,
    /// Generation to continue from, 0-based (defaults to the last one)
    #[arg(short, long)]
    pub generation: Option<usize>,
    /// New rules; the stored rules are reused when none are given.
    #[command(flatten)]
    pub rule_args: RuleArgs,
    /// Number of rewrite steps
    #[arg(short = 'n', long)]
    pub recursions: Option<u32>,
    /// Output selection.
    #[command(flatten)]
    pub output: OutputArgs,
}

/// `lsys inspect`.
#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Trace file to read
    pub path: PathBuf,
    /// Print only generation N
    #[arg(short, long, conflicts_with = "json")]
    pub generation: Option<usize>,
    /// Print a JSON summary instead of tables
    #[arg(long)]
    pub json: bool,
}

/// `lsys rules`.
#[derive(Debug, Args)]
pub struct RulesArgs {
    /// Rules to validate and save.
    #[command(flatten)]
    pub rule_args: RuleArgs,
    /// Directory the listing is written to
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub out: PathBuf,
}

/// `lsys prefs` actions.
#[derive(Debug, Subcommand)]
pub enum PrefsAction {
    /// Print the saved prefs as JSON
    Show,
    /// Change saved prefs; unspecified fields keep their value
    Set(PrefsSetArgs),
    /// Restore the default prefs
    Reset,
}

/// `lsys prefs set`.
#[derive(Debug, Args)]
pub struct PrefsSetArgs {
    /// Default output directory
    #[arg(short, long, value_name = "DIR", conflicts_with = "clear_out")]
    pub out: Option<PathBuf>,
    /// Forget the default output directory (print only)
    #[arg(long)]
    pub clear_out: bool,
    /// Default file prefix
    #[arg(long)]
    pub prefix: Option<String>,
    /// Write text listings by default
    #[arg(long, value_name = "BOOL")]
    pub text: Option<bool>,
    /// Write the binary trace by default
    #[arg(long, value_name = "BOOL")]
    pub binary: Option<bool>,
    /// Default number of rewrite steps
    #[arg(short = 'n', long)]
    pub recursions: Option<u32>,
    /// Default length budget per generation
    #[arg(long, value_name = "SYMBOLS", conflicts_with = "clear_max_len")]
    pub max_len: Option<usize>,
    /// Remove the default length budget
    #[arg(long)]
    pub clear_max_len: bool,
}
