// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Line-oriented text listings.
//!
//! Each listing is UTF-8 with one entry per line and a trailing newline after
//! every entry:
//!
//! - generations: the generation strings, index ascending
//! - lengths: the symbol count of each generation, index ascending
//! - rules: `pattern  -->  replacement`, declaration order
use std::fs;
use std::io::{self, BufRead, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use lsys_core::{GrammarTrace, RuleSet, RULE_ARROW};

use crate::TraceIoError;

/// The three listing paths written for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextArtifacts {
    /// `<prefix>_grammar_<stamp>.txt`
    pub grammar: PathBuf,
    /// `<prefix>_grammar_length_<stamp>.txt`
    pub lengths: PathBuf,
    /// `<prefix>_grammar_rule_<stamp>.txt`
    pub rules: PathBuf,
}

impl TextArtifacts {
    /// Listing paths for `prefix`/`stamp` inside `dir`.
    pub fn in_dir(dir: &Path, prefix: &str, stamp: &str) -> Self {
        Self {
            grammar: dir.join(format!("{prefix}_grammar_{stamp}.txt")),
            lengths: dir.join(format!("{prefix}_grammar_length_{stamp}.txt")),
            rules: dir.join(format!("{prefix}_grammar_rule_{stamp}.txt")),
        }
    }

    /// Paths in write order.
    pub fn paths(&self) -> Vec<PathBuf> {
        vec![self.grammar.clone(), self.lengths.clone(), self.rules.clone()]
    }

    /// Writes all three listings, creating the directory if needed.
    pub fn write(&self, trace: &GrammarTrace, rules: &RuleSet) -> Result<(), TraceIoError> {
        if let Some(parent) = self.grammar.parent() {
            fs::create_dir_all(parent)?;
        }
        with_file(&self.grammar, |w| write_generations(w, trace))?;
        with_file(&self.lengths, |w| Ok(write_lengths(w, trace)?))?;
        with_file(&self.rules, |w| Ok(write_rule_listing(w, rules)?))?;
        tracing::info!(
            grammar = %self.grammar.display(),
            generations = trace.len(),
            "text listings written"
        );
        Ok(())
    }
}

fn with_file(
    path: &Path,
    body: impl FnOnce(&mut BufWriter<fs::File>) -> Result<(), TraceIoError>,
) -> Result<(), TraceIoError> {
    let mut w = BufWriter::new(fs::File::create(path)?);
    body(&mut w)?;
    w.flush()?;
    Ok(())
}

/// One generation per line.
///
/// Generations containing `\n` are rejected: they would split into two lines
/// and break the listing's index-per-line contract.
pub fn write_generations<W: Write>(w: &mut W, trace: &GrammarTrace) -> Result<(), TraceIoError> {
    for (index, generation) in trace.iter().enumerate() {
        if generation.contains('\n') {
            return Err(TraceIoError::LineBreak(index));
        }
        writeln!(w, "{generation}")?;
    }
    Ok(())
}

/// One symbol count per line.
pub fn write_lengths<W: Write>(w: &mut W, trace: &GrammarTrace) -> io::Result<()> {
    for len in trace.lengths() {
        writeln!(w, "{len}")?;
    }
    Ok(())
}

/// One `pattern  -->  replacement` line per rule.
pub fn write_rule_listing<W: Write>(w: &mut W, rules: &RuleSet) -> io::Result<()> {
    for line in rules.listing() {
        writeln!(w, "{line}")?;
    }
    Ok(())
}

/// Reads a generation listing back, byte-for-byte.
///
/// Only `\n` terminates an entry, so a generation ending in `\r` survives the
/// round trip. Empty generations come back as empty strings.
pub fn parse_generations<R: Read>(mut r: R) -> Result<Vec<String>, TraceIoError> {
    let mut text = String::new();
    r.read_to_string(&mut text)?;
    if text.is_empty() {
        return Ok(Vec::new());
    }
    let body = text.strip_suffix('\n').unwrap_or(&text);
    Ok(body.split('\n').map(str::to_owned).collect())
}

/// Reads a rule listing into `(pattern, replacement)` pairs.
///
/// Blank lines are skipped. The separator is the first `-->` on the line with
/// the surrounding two-space padding stripped.
pub fn parse_rule_listing<R: BufRead>(r: R) -> Result<Vec<(String, String)>, TraceIoError> {
    let mut pairs = Vec::new();
    for (index, line) in r.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let (pattern, replacement) = split_rule_line(&line).ok_or_else(|| {
            TraceIoError::MalformedRuleLine {
                line: index + 1,
                text: line.clone(),
            }
        })?;
        pairs.push((pattern.to_owned(), replacement.to_owned()));
    }
    Ok(pairs)
}

fn split_rule_line(line: &str) -> Option<(&str, &str)> {
    if let Some(split) = line.split_once(RULE_ARROW) {
        return Some(split);
    }
    line.split_once("-->").map(|(p, r)| (p.trim(), r.trim()))
}
