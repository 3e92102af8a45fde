// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Rewrite engine: drives a rule set over successive generations.
use tracing::{debug, info, warn};

use crate::rule::{ReplacementMode, RuleSet};
use crate::trace::GrammarTrace;

/// Stateless driver that turns a start string into a [`GrammarTrace`].
///
/// Every step reads only the previous generation, so steps are strictly
/// sequential. A step never fails for a validated [`RuleSet`]: unmatched input
/// is dropped or passed through according to the mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct RewriteEngine;

/// Where a bounded run stopped early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncation {
    /// Index of the generation that crossed the limit (it is kept in the trace).
    pub generation: usize,
    /// Symbol length of that generation.
    pub length: usize,
    /// Limit the caller supplied.
    pub limit: usize,
}

/// Result of [`RewriteEngine::run_bounded`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedRun {
    /// Generations produced before the run finished or stopped.
    pub trace: GrammarTrace,
    /// Set when the length budget cut the run short.
    pub truncated: Option<Truncation>,
}

impl RewriteEngine {
    /// Produces `recursions + 1` generations starting from `start`.
    ///
    /// `recursions == 0` yields a trace holding only the start string.
    pub fn run(rules: &RuleSet, start: impl Into<String>, recursions: u32) -> GrammarTrace {
        Self::run_bounded(rules, start, recursions, usize::MAX).trace
    }

    /// Like [`RewriteEngine::run`] but stops after the first generation whose
    /// symbol length exceeds `max_len`.
    pub fn run_bounded(
        rules: &RuleSet,
        start: impl Into<String>,
        recursions: u32,
        max_len: usize,
    ) -> BoundedRun {
        let mut trace = GrammarTrace::start(start.into());
        info!(
            mode = %rules.mode(),
            rules = rules.len(),
            recursions,
            "starting rewrite run"
        );

        for step in 1..=recursions as usize {
            let next = Self::step(rules, trace.last());
            let length = next.chars().count();
            debug!(generation = step, length, "generation produced");
            trace.push(next);

            if length > max_len {
                warn!(
                    generation = step,
                    length,
                    limit = max_len,
                    "length budget exceeded; stopping run"
                );
                return BoundedRun {
                    trace,
                    truncated: Some(Truncation {
                        generation: step,
                        length,
                        limit: max_len,
                    }),
                };
            }
        }

        BoundedRun {
            trace,
            truncated: None,
        }
    }

    /// Applies one rewrite pass in the rule set's mode.
    pub fn step(rules: &RuleSet, current: &str) -> String {
        match rules.mode() {
            ReplacementMode::Classic => rewrite_classic(current, rules),
            ReplacementMode::Segmentwise => rewrite_segmentwise(current, rules),
            ReplacementMode::ContinuousOverlap => rewrite_continuous(current, rules),
            ReplacementMode::ContinuousSkip => rewrite_continuous_skip(current, rules),
        }
    }
}

/// Single-symbol substitution.
///
/// Each symbol takes the replacement of the first rule whose one-symbol
/// pattern equals it. Symbols without a rule are dropped; supply an identity
/// rule (`a → a`) to keep them.
pub fn rewrite_classic(current: &str, rules: &RuleSet) -> String {
    let mut out = String::with_capacity(current.len());
    for symbol in current.chars() {
        if let Some(rule) = rules.first_match(&[symbol]) {
            out.push_str(rule.replacement());
        }
    }
    out
}

/// Non-overlapping segment substitution.
///
/// `current` is cut into segments of the rule set's pattern length, left to
/// right. A segment equal to a pattern emits that rule's replacement, an
/// unmatched full segment emits nothing, and the trailing short segment (when
/// the length is not a multiple of the segment size) is copied unchanged.
pub fn rewrite_segmentwise(current: &str, rules: &RuleSet) -> String {
    let Some(width) = rules.window_len() else {
        return current.to_owned();
    };
    let symbols: Vec<char> = current.chars().collect();
    let mut out = String::with_capacity(current.len());

    for segment in symbols.chunks(width) {
        if let Some(rule) = rules.first_match(segment) {
            out.push_str(rule.replacement());
        } else if segment.len() < width {
            out.extend(segment);
        }
    }
    out
}

/// Overlapping window substitution.
///
/// Every offset `i` is probed, with no skipping: for each rule in declaration
/// order the window of that rule's pattern length starting at `i` (cut at the
/// end of the input) is compared to the pattern. The first match emits its
/// replacement for slot `i`; otherwise slot `i` keeps `current[i]`.
///
/// Because offsets are never skipped, a match of length `k` is followed by
/// `k - 1` further probes inside the matched text, and those probes can match
/// again. The output therefore has one slot per input symbol and may repeat
/// replacement content.
pub fn rewrite_continuous(current: &str, rules: &RuleSet) -> String {
    let symbols: Vec<char> = current.chars().collect();
    let mut out = String::with_capacity(current.len());

    for (i, &symbol) in symbols.iter().enumerate() {
        let hit = rules.rules().iter().find(|rule| {
            let end = (i + rule.pattern_len()).min(symbols.len());
            rule.matches(&symbols[i..end])
        });
        match hit {
            Some(rule) => out.push_str(rule.replacement()),
            None => out.push(symbol),
        }
    }
    out
}

/// Non-overlapping window substitution ("skip-n").
///
/// A cursor walks `current` with a window as wide as rule 0's pattern. When
/// the window equals a pattern (declaration order, first match wins) the
/// replacement is emitted and the cursor jumps past the whole window, so each
/// input symbol takes part in at most one match. Otherwise the symbol under
/// the cursor is copied and the cursor advances by one.
pub fn rewrite_continuous_skip(current: &str, rules: &RuleSet) -> String {
    let Some(width) = rules.window_len() else {
        return current.to_owned();
    };
    let symbols: Vec<char> = current.chars().collect();
    let mut out = String::with_capacity(current.len());

    let mut i = 0;
    while i < symbols.len() {
        let end = (i + width).min(symbols.len());
        if let Some(rule) = rules.first_match(&symbols[i..end]) {
            out.push_str(rule.replacement());
            i += width;
        } else {
            out.push(symbols[i]);
            i += 1;
        }
    }
    out
}
