// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Turning `--rule` / `--rules-file` / `--mode` into a validated [`RuleSet`].

use std::fs::File;
use std::io::BufReader;

use anyhow::{bail, Context, Result};
use lsys_core::{ReplacementMode, RuleSet};
use lsys_trace_io::parse_rule_listing;

use crate::args::RuleArgs;

/// Splits `PATTERN=REPLACEMENT` at the first `=`.
///
/// The replacement may be empty (`a=` deletes `a`) and may itself contain `=`.
pub fn parse_rule_arg(raw: &str) -> Result<(String, String)> {
    let Some((pattern, replacement)) = raw.split_once('=') else {
        bail!("rule {raw:?} is not of the form PATTERN=REPLACEMENT");
    };
    Ok((pattern.to_owned(), replacement.to_owned()))
}

/// Reads the `(pattern, replacement)` pairs named by `args`, in declaration order.
pub fn rule_pairs(args: &RuleArgs) -> Result<Vec<(String, String)>> {
    if let Some(path) = &args.rules_file {
        let file = File::open(path)
            .with_context(|| format!("failed to open rule listing {}", path.display()))?;
        return parse_rule_listing(BufReader::new(file))
            .with_context(|| format!("failed to parse rule listing {}", path.display()));
    }
    args.rules.iter().map(|raw| parse_rule_arg(raw)).collect()
}

/// Builds the rule set, taking the mode from `--mode`, then `fallback`, then inference.
pub fn resolve(args: &RuleArgs, fallback: Option<ReplacementMode>) -> Result<RuleSet> {
    let pairs = rule_pairs(args)?;
    if pairs.is_empty() {
        bail!("no rules given; pass --rule PATTERN=REPLACEMENT or --rules-file FILE");
    }
    let patterns: Vec<&str> = pairs.iter().map(|(p, _)| p.as_str()).collect();
    let mode = match args.mode.or(fallback).or_else(|| ReplacementMode::infer(&patterns)) {
        Some(mode) => mode,
        None => bail!(
            "multi-symbol patterns need an explicit --mode (segmentwise, continuous or continuous-skip)"
        ),
    };
    RuleSet::from_pairs(pairs, mode).with_context(|| format!("invalid {mode} rule table"))
}
