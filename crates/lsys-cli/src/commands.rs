// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Subcommand handlers. Each takes parsed arguments and writes its report to `out`.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use comfy_table::{presets::UTF8_FULL, Table};
use lsys_app_core::config::ConfigService;
use lsys_app_core::config_port::PrefsPort;
use lsys_app_core::prefs::ToolPrefs;
use lsys_app_core::run::{check_prefix, OutputFlags, RunConfig};
use lsys_core::{presets, BoundedRun, GrammarTrace, RuleSet};
use lsys_trace_io::text::write_rule_listing;
use lsys_trace_io::{file_stamp, read_trace, BlobSink, StoredTrace, TextSink, TraceSink};
use serde::Serialize;
use tracing::{info, warn};

use crate::args::{
    GenerateArgs, InspectArgs, ModifyArgs, OutputArgs, PrefsAction, PrefsSetArgs, RulesArgs,
};
use crate::rule_input::resolve;
use crate::store::PrefsStore;

/// `lsys generate`
pub fn generate<W: Write>(args: GenerateArgs, prefs: &ToolPrefs, out: &mut W) -> Result<()> {
    let rules = match &args.preset {
        Some(name) => {
            let preset = presets::lookup(name)
                .with_context(|| format!("unknown preset {name:?}; see `lsys presets`"))?;
            let rules = preset.rule_set()?;
            match args.rule_args.mode {
                Some(mode) => rules
                    .with_mode(mode)
                    .with_context(|| format!("preset {} cannot run in {mode} mode", preset.name))?,
                None => rules,
            }
        }
        None => resolve(&args.rule_args, None)?,
    };
    let config = build_run(rules, args.start, args.recursions, &args.output, prefs)?;
    execute(&config, args.output.print, out)
}

/// `lsys modify`
pub fn modify<W: Write>(args: ModifyArgs, prefs: &ToolPrefs, out: &mut W) -> Result<()> {
    let stored = load_trace(&args.from)?;
    let index = args.generation.unwrap_or_else(|| stored.trace.recursions());
    let Some(start) = stored.generation(index).map(str::to_owned) else {
        bail!(
            "{} holds generations 0..={}; generation {index} does not exist",
            args.from.display(),
            stored.trace.recursions()
        );
    };
    info!(from = %args.from.display(), generation = index, "continuing stored trace");

    let rules = if args.rule_args.is_empty() {
        match args.rule_args.mode {
            Some(mode) => stored
                .rules
                .with_mode(mode)
                .with_context(|| format!("stored rules cannot run in {mode} mode"))?,
            None => stored.rules,
        }
    } else {
        resolve(&args.rule_args, None)?
    };
    let config = build_run(rules, start, args.recursions, &args.output, prefs)?;
    execute(&config, args.output.print, out)
}

/// `lsys presets`
pub fn list_presets<W: Write>(out: &mut W) -> Result<()> {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["name", "system", "rules"]);
    for preset in presets::all() {
        let rules: Vec<String> = preset
            .rules
            .iter()
            .map(|(p, r)| format!("{p} -> {r}"))
            .collect();
        table.add_row(vec![
            preset.name.to_owned(),
            preset.title.to_owned(),
            rules.join("\n"),
        ]);
    }
    writeln!(out, "{table}")?;
    Ok(())
}

#[derive(Serialize)]
struct TraceSummary<'a> {
    path: &'a Path,
    digest: String,
    mode: &'static str,
    rules: Vec<RuleView<'a>>,
    recursions: usize,
    lengths: Vec<usize>,
}

#[derive(Serialize)]
struct RuleView<'a> {
    pattern: &'a str,
    replacement: &'a str,
}

/// `lsys inspect`
pub fn inspect<W: Write>(args: InspectArgs, out: &mut W) -> Result<()> {
    let stored = load_trace(&args.path)?;

    if let Some(n) = args.generation {
        let Some(generation) = stored.generation(n) else {
            bail!(
                "{} holds generations 0..={}; generation {n} does not exist",
                args.path.display(),
                stored.trace.recursions()
            );
        };
        writeln!(out, "{generation}")?;
        return Ok(());
    }

    if args.json {
        let summary = TraceSummary {
            path: &args.path,
            digest: stored.digest_hex(),
            mode: stored.rules.mode().as_str(),
            rules: stored
                .rules
                .rules()
                .iter()
                .map(|rule| RuleView {
                    pattern: rule.pattern(),
                    replacement: rule.replacement(),
                })
                .collect(),
            recursions: stored.trace.recursions(),
            lengths: stored.trace.lengths().collect(),
        };
        serde_json::to_writer_pretty(&mut *out, &summary)?;
        writeln!(out)?;
        return Ok(());
    }

    let mut header = Table::new();
    header.load_preset(UTF8_FULL);
    header.add_row(vec!["file".to_owned(), args.path.display().to_string()]);
    header.add_row(vec!["digest".to_owned(), stored.digest_hex()]);
    header.add_row(vec!["mode".to_owned(), stored.rules.mode().to_string()]);
    header.add_row(vec![
        "recursions".to_owned(),
        stored.trace.recursions().to_string(),
    ]);
    writeln!(out, "{header}")?;

    let mut rules = Table::new();
    rules.load_preset(UTF8_FULL);
    rules.set_header(vec!["#", "pattern", "replacement"]);
    for (index, rule) in stored.rules.rules().iter().enumerate() {
        rules.add_row(vec![
            index.to_string(),
            rule.pattern().to_owned(),
            rule.replacement().to_owned(),
        ]);
    }
    writeln!(out, "{rules}")?;
    writeln!(out, "{}", length_table(&stored.trace))?;
    Ok(())
}

/// `lsys rules`
pub fn save_rules<W: Write>(args: RulesArgs, out: &mut W) -> Result<()> {
    let rules = resolve(&args.rule_args, None)?;
    fs::create_dir_all(&args.out)
        .with_context(|| format!("failed to create {}", args.out.display()))?;
    let path = args
        .out
        .join(format!("User_defined_rules_{}.txt", file_stamp()?));
    let file =
        File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    write_rule_listing(&mut w, &rules)?;
    w.flush()?;
    info!(path = %path.display(), rules = rules.len(), "rule listing written");
    writeln!(
        out,
        "{} {} rules -> {}",
        rules.len(),
        rules.mode(),
        path.display()
    )?;
    Ok(())
}

/// `lsys prefs ...`
pub fn prefs<W: Write>(
    action: PrefsAction,
    svc: &ConfigService<PrefsStore>,
    current: ToolPrefs,
    out: &mut W,
) -> Result<()> {
    let updated = match action {
        PrefsAction::Show => {
            print_json(&current, out)?;
            return Ok(());
        }
        PrefsAction::Set(set) => apply_prefs(current, set)?,
        PrefsAction::Reset => ToolPrefs::default(),
    };
    if !svc.save_prefs(&updated) {
        bail!("failed to save prefs");
    }
    if !svc.store().is_persistent() {
        warn!("prefs are not persisted for this invocation");
    }
    print_json(&updated, out)
}

fn apply_prefs(mut prefs: ToolPrefs, set: PrefsSetArgs) -> Result<ToolPrefs> {
    if let Some(dir) = set.out {
        prefs.output_dir = Some(dir);
    }
    if set.clear_out {
        prefs.output_dir = None;
    }
    if let Some(prefix) = set.prefix {
        check_prefix(&prefix)?;
        prefs.prefix = prefix;
    }
    if let Some(text) = set.text {
        prefs.output.text = text;
    }
    if let Some(binary) = set.binary {
        prefs.output.binary = binary;
    }
    if let Some(recursions) = set.recursions {
        prefs.recursions = recursions;
    }
    if let Some(max_len) = set.max_len {
        if max_len == 0 {
            bail!("max length must be greater than zero");
        }
        prefs.max_len = Some(max_len);
    }
    if set.clear_max_len {
        prefs.max_len = None;
    }
    Ok(prefs)
}

fn print_json<W: Write>(prefs: &ToolPrefs, out: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, prefs)?;
    writeln!(out)?;
    Ok(())
}

/// Merges command-line output flags over saved prefs.
///
/// Saved sink defaults only apply when an output directory is known; explicit
/// `--text`/`--binary` without one is reported as an error by [`RunConfig`].
fn build_run(
    rules: RuleSet,
    start: String,
    recursions: Option<u32>,
    output: &OutputArgs,
    prefs: &ToolPrefs,
) -> Result<RunConfig> {
    let output_dir = output.out.clone().or_else(|| prefs.output_dir.clone());
    let has_dir = output_dir.is_some();
    let flags = OutputFlags {
        text: output.text || (!output.no_text && has_dir && prefs.output.text),
        binary: output.binary || (!output.no_binary && has_dir && prefs.output.binary),
    };

    let mut builder = RunConfig::builder(rules)
        .prefs(prefs)
        .start(start)
        .output(flags);
    if let Some(recursions) = recursions {
        builder = builder.recursions(recursions);
    }
    if let Some(dir) = output_dir {
        builder = builder.output_dir(dir);
    }
    if let Some(prefix) = &output.prefix {
        builder = builder.prefix(prefix.clone());
    }
    if let Some(max_len) = output.max_len {
        builder = builder.max_len(max_len);
    }
    Ok(builder.build()?)
}

/// Runs `config`, feeds the selected sinks and reports to `out`.
///
/// Generations are printed when `print` is set or when nothing was written;
/// otherwise `out` gets a length table and the written paths.
fn execute<W: Write>(config: &RunConfig, print: bool, out: &mut W) -> Result<()> {
    let run = config.execute();
    let written = persist(config, &run)?;

    if print || written.is_empty() {
        for generation in &run.trace {
            writeln!(out, "{generation}")?;
        }
        return Ok(());
    }

    writeln!(out, "{}", length_table(&run.trace))?;
    if let Some(cut) = run.truncated {
        writeln!(
            out,
            "stopped at generation {}: {} symbols exceeds the budget of {}",
            cut.generation, cut.length, cut.limit
        )?;
    }
    for path in &written {
        writeln!(out, "wrote {}", path.display())?;
    }
    Ok(())
}

fn persist(config: &RunConfig, run: &BoundedRun) -> Result<Vec<PathBuf>> {
    let flags = config.output();
    let Some(dir) = config.output_dir().filter(|_| flags.any()) else {
        return Ok(Vec::new());
    };
    let stamp = file_stamp()?;
    let mut sinks: Vec<Box<dyn TraceSink>> = Vec::new();
    if flags.text {
        sinks.push(Box::new(TextSink::new(dir, config.prefix(), &stamp)));
    }
    if flags.binary {
        sinks.push(Box::new(BlobSink::new(dir, config.prefix(), &stamp)));
    }

    let mut written = Vec::new();
    for sink in &sinks {
        let paths = sink
            .persist(&run.trace, config.rules())
            .with_context(|| format!("failed to write results to {}", dir.display()))?;
        written.extend(paths);
    }
    Ok(written)
}

fn length_table(trace: &GrammarTrace) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["generation", "length"]);
    for (index, length) in trace.lengths().enumerate() {
        table.add_row(vec![index.to_string(), length.to_string()]);
    }
    table
}

fn load_trace(path: &Path) -> Result<StoredTrace> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    read_trace(&mut BufReader::new(file))
        .with_context(|| format!("failed to read trace {}", path.display()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::args::RuleArgs;
    use lsys_core::ReplacementMode;

    fn output() -> OutputArgs {
        OutputArgs::default()
    }

    fn fib() -> RuleSet {
        presets::lookup("fibonacci").unwrap().rule_set().unwrap()
    }

    #[test]
    fn saved_sinks_need_a_directory() {
        let prefs = ToolPrefs::default();
        assert!(prefs.output.text);
        let config = build_run(fib(), "0".into(), Some(2), &output(), &prefs).unwrap();
        assert!(!config.output().any());
        assert_eq!(config.output_dir(), None);
    }

    #[test]
    fn flags_override_saved_sinks() {
        let prefs = ToolPrefs {
            output_dir: Some(PathBuf::from("/tmp/lsys")),
            ..ToolPrefs::default()
        };
        let args = OutputArgs {
            no_text: true,
            binary: true,
            ..OutputArgs::default()
        };
        let config = build_run(fib(), "0".into(), None, &args, &prefs).unwrap();
        assert_eq!(
            config.output(),
            OutputFlags {
                text: false,
                binary: true
            }
        );
        assert_eq!(config.recursions(), prefs.recursions);
    }

    #[test]
    fn explicit_sink_without_directory_is_rejected() {
        let args = OutputArgs {
            binary: true,
            ..OutputArgs::default()
        };
        assert!(build_run(fib(), "0".into(), None, &args, &ToolPrefs::default()).is_err());
    }

    #[test]
    fn print_only_run_writes_generations() {
        let config = build_run(fib(), "0".into(), Some(3), &output(), &ToolPrefs::default()).unwrap();
        let mut out = Vec::new();
        execute(&config, false, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "0\n1\n10\n101\n");
    }

    #[test]
    fn prefs_set_validates_values() {
        let set = PrefsSetArgs {
            out: None,
            clear_out: false,
            prefix: Some("a/b".into()),
            text: None,
            binary: None,
            recursions: None,
            max_len: None,
            clear_max_len: false,
        };
        assert!(apply_prefs(ToolPrefs::default(), set).is_err());
    }

    #[test]
    fn prefs_set_changes_only_given_fields() {
        let set = PrefsSetArgs {
            out: Some(PathBuf::from("runs")),
            clear_out: false,
            prefix: None,
            text: None,
            binary: Some(true),
            recursions: Some(8),
            max_len: None,
            clear_max_len: false,
        };
        let prefs = apply_prefs(ToolPrefs::default(), set).unwrap();
        assert_eq!(prefs.output_dir, Some(PathBuf::from("runs")));
        assert!(prefs.output.text);
        assert!(prefs.output.binary);
        assert_eq!(prefs.recursions, 8);
        assert_eq!(prefs.prefix, "lsys");
    }

    #[test]
    fn preset_mode_override_is_validated() {
        let args = GenerateArgs {
            preset: Some("algae".into()),
            rule_args: RuleArgs {
                mode: Some(ReplacementMode::ContinuousSkip),
                ..RuleArgs::default()
            },
            start: "0".into(),
            recursions: Some(2),
            output: output(),
        };
        let mut out = Vec::new();
        generate(args, &ToolPrefs::default(), &mut out).unwrap();
        // Skip-n over one-symbol windows behaves like classic with pass-through.
        assert_eq!(String::from_utf8(out).unwrap(), "0\n01\n010\n");
    }
}
