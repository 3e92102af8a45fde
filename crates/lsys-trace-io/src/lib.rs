// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Persistence sinks for lsys grammar traces.
//!
//! Two output shapes are supported:
//!
//! - **Text listings**: three UTF-8, line-oriented files per run (generations,
//!   generation lengths, rules), one entry per line in ascending generation
//!   order. See [`text`].
//! - **Trace blob** (`.lstrace`): a framed CBOR payload holding the generations
//!   and the originating rule table, guarded by a BLAKE3 digest, so a later run
//!   can reload "generation N" of a previous trace. See [`blob`].
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

pub mod blob;
mod error;
pub mod text;

use std::path::{Path, PathBuf};

use lsys_core::{GrammarTrace, RuleSet};

pub use blob::{read_trace, write_trace, StoredTrace, BLOB_EXTENSION};
pub use error::TraceIoError;
pub use text::{parse_generations, parse_rule_listing, TextArtifacts};

/// Destination for a finished run.
///
/// Implementations receive the trace together with the rule set that produced
/// it and report the files they wrote.
pub trait TraceSink {
    /// Persist `trace` and `rules`. Returns the paths written, in write order.
    fn persist(&self, trace: &GrammarTrace, rules: &RuleSet)
        -> Result<Vec<PathBuf>, TraceIoError>;
}

/// Writes the three text listings into a directory.
#[derive(Debug, Clone)]
pub struct TextSink {
    dir: PathBuf,
    prefix: String,
    stamp: String,
}

impl TextSink {
    /// Sink writing `<dir>/<prefix>_grammar*_<stamp>.txt`.
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>, stamp: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            stamp: stamp.into(),
        }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl TraceSink for TextSink {
    fn persist(
        &self,
        trace: &GrammarTrace,
        rules: &RuleSet,
    ) -> Result<Vec<PathBuf>, TraceIoError> {
        let artifacts = TextArtifacts::in_dir(&self.dir, &self.prefix, &self.stamp);
        artifacts.write(trace, rules)?;
        Ok(artifacts.paths())
    }
}

/// Writes a single `.lstrace` blob into a directory.
#[derive(Debug, Clone)]
pub struct BlobSink {
    dir: PathBuf,
    prefix: String,
    stamp: String,
}

impl BlobSink {
    /// Sink writing `<dir>/<prefix>_grammar_<stamp>.lstrace`.
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>, stamp: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            stamp: stamp.into(),
        }
    }

    /// Path the blob is written to.
    pub fn path(&self) -> PathBuf {
        self.dir.join(format!(
            "{}_grammar_{}.{BLOB_EXTENSION}",
            self.prefix, self.stamp
        ))
    }
}

impl TraceSink for BlobSink {
    fn persist(
        &self,
        trace: &GrammarTrace,
        rules: &RuleSet,
    ) -> Result<Vec<PathBuf>, TraceIoError> {
        let path = self.path();
        std::fs::create_dir_all(&self.dir)?;
        let mut file = std::io::BufWriter::new(std::fs::File::create(&path)?);
        let digest = write_trace(&mut file, trace, rules)?;
        std::io::Write::flush(&mut file)?;
        tracing::info!(path = %path.display(), digest = %hex::encode(digest), "trace blob written");
        Ok(vec![path])
    }
}

/// Local-time file stamp `YYYY-MM-DD_HH-MM-SS` used in output file names.
///
/// Falls back to UTC when the local offset cannot be determined.
pub fn file_stamp() -> Result<String, TraceIoError> {
    let now = time::OffsetDateTime::now_local().unwrap_or_else(|_| time::OffsetDateTime::now_utc());
    now.format(time::macros::format_description!(
        "[year]-[month]-[day]_[hour]-[minute]-[second]"
    ))
    .map_err(|e| TraceIoError::Stamp(e.to_string()))
}
