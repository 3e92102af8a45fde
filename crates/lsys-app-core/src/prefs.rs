// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Persisted defaults for lsys runs.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Config key under which [`ToolPrefs`] are stored.
pub const PREFS_KEY: &str = "prefs";

/// Saved defaults applied when a command-line flag is not given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolPrefs {
    /// Directory results are written to; `None` means print only.
    pub output_dir: Option<PathBuf>,
    /// Output file prefix.
    pub prefix: String,
    /// Output selection.
    pub output: OutputPrefs,
    /// Recursions used when none is given.
    pub recursions: u32,
    /// Length budget per generation, if any.
    pub max_len: Option<usize>,
}

impl Default for ToolPrefs {
    fn default() -> Self {
        Self {
            output_dir: None,
            prefix: "lsys".to_owned(),
            output: OutputPrefs::default(),
            recursions: 5,
            max_len: None,
        }
    }
}

/// Which sinks run after a generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputPrefs {
    /// Write the three text listings.
    pub text: bool,
    /// Write the binary trace blob.
    pub binary: bool,
}

impl Default for OutputPrefs {
    fn default() -> Self {
        Self {
            text: true,
            binary: false,
        }
    }
}
