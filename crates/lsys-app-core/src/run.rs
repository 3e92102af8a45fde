// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Typed, validated run configuration.
//!
//! Every input a run needs (start string, recursion count, rule set, output
//! selection) is collected here and checked once, before any rewriting.

use std::path::{Path, PathBuf};

use lsys_core::{BoundedRun, RewriteEngine, RuleSet};
use thiserror::Error;
use tracing::info;

use crate::prefs::ToolPrefs;

/// Which persistence sinks a run feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutputFlags {
    /// Text listings (generations, lengths, rules).
    pub text: bool,
    /// Binary `.lstrace` blob.
    pub binary: bool,
}

impl OutputFlags {
    /// `true` when at least one sink is selected.
    pub fn any(self) -> bool {
        self.text || self.binary
    }
}

/// Reasons a [`RunConfigBuilder`] refuses to build.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunConfigError {
    /// No start string was supplied.
    #[error("a start string is required")]
    MissingStart,
    /// Outputs were requested without a directory to put them in.
    #[error("output requested but no output directory set")]
    MissingOutputDir,
    /// The prefix would not form a plain file name.
    #[error("invalid output prefix: {0:?}")]
    InvalidPrefix(String),
    /// A zero length budget would stop before the first rewrite.
    #[error("max length must be greater than zero")]
    ZeroLengthBudget,
}

/// Rejects prefixes that would not form a plain file name.
pub fn check_prefix(prefix: &str) -> Result<(), RunConfigError> {
    let ok = !prefix.is_empty()
        && !prefix.contains(['/', '\\'])
        && !prefix.chars().any(char::is_control);
    if ok {
        Ok(())
    } else {
        Err(RunConfigError::InvalidPrefix(prefix.to_owned()))
    }
}

/// A fully validated run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    start: String,
    recursions: u32,
    rules: RuleSet,
    output: OutputFlags,
    output_dir: Option<PathBuf>,
    prefix: String,
    max_len: Option<usize>,
}

impl RunConfig {
    /// Starts a builder for `rules` with no defaults applied.
    pub fn builder(rules: RuleSet) -> RunConfigBuilder {
        RunConfigBuilder {
            rules,
            start: None,
            recursions: 0,
            output: OutputFlags::default(),
            output_dir: None,
            prefix: "lsys".to_owned(),
            max_len: None,
        }
    }

    /// Generation 0.
    pub fn start(&self) -> &str {
        &self.start
    }

    /// Number of rewrite steps.
    pub fn recursions(&self) -> u32 {
        self.recursions
    }

    /// Rule table and mode.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Selected sinks.
    pub fn output(&self) -> OutputFlags {
        self.output
    }

    /// Output directory, present whenever [`OutputFlags::any`] holds.
    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    /// Output file prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Length budget per generation.
    pub fn max_len(&self) -> Option<usize> {
        self.max_len
    }

    /// Runs the engine with this configuration.
    pub fn execute(&self) -> BoundedRun {
        info!(
            mode = %self.rules.mode(),
            recursions = self.recursions,
            start_len = self.start.chars().count(),
            "executing run"
        );
        RewriteEngine::run_bounded(
            &self.rules,
            self.start.clone(),
            self.recursions,
            self.max_len.unwrap_or(usize::MAX),
        )
    }
}

/// Collects run inputs; see [`RunConfig::builder`].
#[derive(Debug, Clone)]
pub struct RunConfigBuilder {
    rules: RuleSet,
    start: Option<String>,
    recursions: u32,
    output: OutputFlags,
    output_dir: Option<PathBuf>,
    prefix: String,
    max_len: Option<usize>,
}

impl RunConfigBuilder {
    /// Seeds recursions, output selection, directory, prefix and budget from saved prefs.
    pub fn prefs(mut self, prefs: &ToolPrefs) -> Self {
        self.recursions = prefs.recursions;
        self.output = OutputFlags {
            text: prefs.output.text,
            binary: prefs.output.binary,
        };
        self.output_dir.clone_from(&prefs.output_dir);
        self.prefix.clone_from(&prefs.prefix);
        self.max_len = prefs.max_len;
        self
    }

    /// Sets generation 0.
    pub fn start(mut self, start: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self
    }

    /// Sets the number of rewrite steps.
    pub fn recursions(mut self, recursions: u32) -> Self {
        self.recursions = recursions;
        self
    }

    /// Selects sinks.
    pub fn output(mut self, output: OutputFlags) -> Self {
        self.output = output;
        self
    }

    /// Sets the output directory.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Sets the output file prefix.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the per-generation length budget.
    pub fn max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    /// Validates and freezes the configuration.
    pub fn build(self) -> Result<RunConfig, RunConfigError> {
        let start = self.start.ok_or(RunConfigError::MissingStart)?;
        if self.output.any() && self.output_dir.is_none() {
            return Err(RunConfigError::MissingOutputDir);
        }
        check_prefix(&self.prefix)?;
        if self.max_len == Some(0) {
            return Err(RunConfigError::ZeroLengthBudget);
        }
        Ok(RunConfig {
            start,
            recursions: self.recursions,
            rules: self.rules,
            output: self.output,
            output_dir: self.output_dir,
            prefix: self.prefix,
            max_len: self.max_len,
        })
    }
}
