// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Built-in classic Lindenmayer systems.

use crate::rule::{ReplacementMode, RuleSet, ValidationError};

/// A named classic rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    /// Lookup key (kebab-case).
    pub name: &'static str,
    /// Display title.
    pub title: &'static str,
    /// `(pattern, replacement)` pairs in declaration order.
    pub rules: &'static [(&'static str, &'static str)],
}

impl Preset {
    /// Builds the preset's classic [`RuleSet`].
    ///
    /// # Errors
    /// Never fails for the shipped presets; the signature mirrors [`RuleSet::build`].
    pub fn rule_set(&self) -> Result<RuleSet, ValidationError> {
        RuleSet::from_pairs(self.rules.iter().copied(), ReplacementMode::Classic)
    }
}

const PRESETS: &[Preset] = &[
    Preset {
        name: "fibonacci",
        title: "Fibonacci",
        rules: &[("0", "1"), ("1", "10")],
    },
    Preset {
        name: "algae",
        title: "Algae",
        rules: &[("0", "01"), ("1", "0")],
    },
    Preset {
        name: "thue-morse",
        title: "Thue-Morse",
        rules: &[("0", "01"), ("1", "10")],
    },
    Preset {
        name: "feigenbaum",
        title: "Feigenbaum",
        rules: &[("0", "11"), ("1", "01")],
    },
    Preset {
        name: "cantor-dust",
        title: "Cantor dust",
        rules: &[("0", "010"), ("1", "111")],
    },
    Preset {
        name: "pythagoras-tree",
        title: "Pythagoras tree",
        rules: &[("0", "1[0]1"), ("1", "11")],
    },
    Preset {
        name: "koch-curve",
        title: "Koch curve",
        rules: &[("1", "1+1-1-1+1")],
    },
    Preset {
        name: "sierpinski-triangle",
        title: "Sierpinski triangle",
        rules: &[("0", "+1-0-1+"), ("1", "-0+1+0-")],
    },
];

/// Every shipped preset, in catalogue order.
pub fn all() -> &'static [Preset] {
    PRESETS
}

/// Finds a preset by name, ignoring ASCII case; `_` and spaces match `-`.
pub fn lookup(name: &str) -> Option<&'static Preset> {
    let key: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '_' | ' ' => '-',
            other => other.to_ascii_lowercase(),
        })
        .collect();
    PRESETS.iter().find(|p| p.name == key)
}
