// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Rewrite rule definitions and rule-set validation.
use core::fmt;
use core::str::FromStr;

use thiserror::Error;

/// Separator used in human-readable rule listings: `pattern  -->  replacement`.
pub const RULE_ARROW: &str = "  -->  ";

/// How a [`RuleSet`] is applied to a generation.
///
/// The mode is chosen once per run and never changes between generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplacementMode {
    /// One-symbol patterns; unmatched symbols are dropped.
    Classic,
    /// Non-overlapping fixed-size segments; unmatched full segments are dropped,
    /// a trailing short segment passes through.
    Segmentwise,
    /// Every offset is probed and emits exactly one slot; matches may overlap.
    ContinuousOverlap,
    /// Cursor walk that skips past a matched window ("skip-n").
    ContinuousSkip,
}

impl ReplacementMode {
    /// All modes in declaration order.
    pub const ALL: [Self; 4] = [
        Self::Classic,
        Self::Segmentwise,
        Self::ContinuousOverlap,
        Self::ContinuousSkip,
    ];

    /// Canonical lowercase name (`classic`, `segmentwise`, `continuous`, `continuous-skip`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Segmentwise => "segmentwise",
            Self::ContinuousOverlap => "continuous",
            Self::ContinuousSkip => "continuous-skip",
        }
    }

    /// Picks the only mode that needs no further input from the caller.
    ///
    /// Returns `Some(Classic)` when every pattern is exactly one symbol long,
    /// `None` otherwise: multi-symbol patterns require an explicit extended mode.
    pub fn infer<S: AsRef<str>>(patterns: &[S]) -> Option<Self> {
        patterns
            .iter()
            .all(|p| p.as_ref().chars().count() == 1)
            .then_some(Self::Classic)
    }

    /// `true` for the modes that accept multi-symbol patterns.
    pub fn is_extended(self) -> bool {
        !matches!(self, Self::Classic)
    }
}

impl fmt::Display for ReplacementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a mode name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown replacement mode: {0:?} (expected classic, segmentwise, continuous or continuous-skip)")]
pub struct ParseModeError(pub String);

impl FromStr for ReplacementMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(Self::Classic),
            "segmentwise" | "segm" => Ok(Self::Segmentwise),
            "continuous" | "cont" | "continuous-overlap" => Ok(Self::ContinuousOverlap),
            "continuous-skip" | "cont_n" | "skip" => Ok(Self::ContinuousSkip),
            _ => Err(ParseModeError(s.to_owned())),
        }
    }
}

/// Reasons a rule table is rejected by [`RuleSet::build`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Pattern and replacement lists differ in length.
    #[error("{patterns} patterns but {replacements} replacements")]
    LengthMismatch {
        /// Number of patterns supplied.
        patterns: usize,
        /// Number of replacements supplied.
        replacements: usize,
    },
    /// A pattern has no symbols.
    #[error("rule {index} has an empty pattern")]
    EmptyPattern {
        /// Position of the offending rule.
        index: usize,
    },
    /// Classic mode requires single-symbol patterns.
    #[error("classic rules need one-symbol patterns; rule {index} has length {len}")]
    InvalidPatternLength {
        /// Position of the offending rule.
        index: usize,
        /// Symbol count of the offending pattern.
        len: usize,
    },
    /// Segmentwise mode requires every pattern to share one length.
    #[error("segmentwise rules must share one pattern length; rule {index} has {found}, expected {expected}")]
    InconsistentPatternLength {
        /// Position of the first offending rule.
        index: usize,
        /// Length taken from rule 0.
        expected: usize,
        /// Length of the offending rule.
        found: usize,
    },
    /// The mode derives a window width from the rules, so at least one is needed.
    #[error("{0} mode needs at least one rule")]
    EmptyRuleSet(ReplacementMode),
}

/// A single `pattern → replacement` rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pattern: String,
    replacement: String,
    symbols: Vec<char>,
}

impl Rule {
    fn new(pattern: String, replacement: String) -> Self {
        let symbols = pattern.chars().collect();
        Self {
            pattern,
            replacement,
            symbols,
        }
    }

    /// Left-hand side.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Right-hand side.
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Pattern length in symbols.
    pub fn pattern_len(&self) -> usize {
        self.symbols.len()
    }

    pub(crate) fn symbols(&self) -> &[char] {
        &self.symbols
    }

    pub(crate) fn matches(&self, window: &[char]) -> bool {
        self.symbols == window
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{RULE_ARROW}{}", self.pattern, self.replacement)
    }
}

/// Validated, immutable rule table plus its replacement mode.
///
/// Rules keep their declaration order. Matching is always first-listed-wins;
/// there is no longest-match preference, so callers that want one must sort
/// their rules by descending pattern length before building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
    mode: ReplacementMode,
}

impl RuleSet {
    /// Validates parallel pattern/replacement lists for `mode`.
    ///
    /// # Errors
    /// See [`ValidationError`] for the individual failure cases. Nothing is
    /// truncated or padded: a table that does not fit the mode is rejected.
    pub fn build<P, R>(
        patterns: impl IntoIterator<Item = P>,
        replacements: impl IntoIterator<Item = R>,
        mode: ReplacementMode,
    ) -> Result<Self, ValidationError>
    where
        P: Into<String>,
        R: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        let replacements: Vec<String> = replacements.into_iter().map(Into::into).collect();
        if patterns.len() != replacements.len() {
            return Err(ValidationError::LengthMismatch {
                patterns: patterns.len(),
                replacements: replacements.len(),
            });
        }

        let rules: Vec<Rule> = patterns
            .into_iter()
            .zip(replacements)
            .map(|(p, r)| Rule::new(p, r))
            .collect();
        validate(&rules, mode)?;
        Ok(Self { rules, mode })
    }

    /// Same as [`RuleSet::build`] but from `(pattern, replacement)` pairs.
    ///
    /// # Errors
    /// See [`ValidationError`].
    pub fn from_pairs<P, R>(
        pairs: impl IntoIterator<Item = (P, R)>,
        mode: ReplacementMode,
    ) -> Result<Self, ValidationError>
    where
        P: Into<String>,
        R: Into<String>,
    {
        let (patterns, replacements): (Vec<String>, Vec<String>) = pairs
            .into_iter()
            .map(|(p, r)| (p.into(), r.into()))
            .unzip();
        Self::build(patterns, replacements, mode)
    }

    /// Re-validates the same rules under another mode.
    ///
    /// # Errors
    /// See [`ValidationError`].
    pub fn with_mode(&self, mode: ReplacementMode) -> Result<Self, ValidationError> {
        validate(&self.rules, mode)?;
        Ok(Self {
            rules: self.rules.clone(),
            mode,
        })
    }

    /// Replacement mode fixed for every run using this set.
    pub fn mode(&self) -> ReplacementMode {
        self.mode
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// `true` when the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Window width used by the segmentwise and skip-n passes: rule 0's pattern length.
    pub fn window_len(&self) -> Option<usize> {
        self.rules.first().map(Rule::pattern_len)
    }

    /// First rule (declaration order) whose pattern equals `window`.
    pub(crate) fn first_match(&self, window: &[char]) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.matches(window))
    }

    /// One `pattern  -->  replacement` line per rule.
    pub fn listing(&self) -> impl Iterator<Item = String> + '_ {
        self.rules.iter().map(ToString::to_string)
    }
}

fn validate(rules: &[Rule], mode: ReplacementMode) -> Result<(), ValidationError> {
    if let Some(index) = rules.iter().position(|r| r.symbols().is_empty()) {
        return Err(ValidationError::EmptyPattern { index });
    }

    match mode {
        ReplacementMode::Classic => {
            if let Some((index, rule)) = rules
                .iter()
                .enumerate()
                .find(|(_, r)| r.pattern_len() != 1)
            {
                return Err(ValidationError::InvalidPatternLength {
                    index,
                    len: rule.pattern_len(),
                });
            }
        }
        ReplacementMode::Segmentwise => {
            let expected = rules
                .first()
                .map(Rule::pattern_len)
                .ok_or(ValidationError::EmptyRuleSet(mode))?;
            if let Some((index, rule)) = rules
                .iter()
                .enumerate()
                .find(|(_, r)| r.pattern_len() != expected)
            {
                return Err(ValidationError::InconsistentPatternLength {
                    index,
                    expected,
                    found: rule.pattern_len(),
                });
            }
        }
        ReplacementMode::ContinuousSkip => {
            if rules.is_empty() {
                return Err(ValidationError::EmptyRuleSet(mode));
            }
        }
        ReplacementMode::ContinuousOverlap => {}
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_lists_are_rejected() {
        let err = RuleSet::build(["0", "1"], ["1"], ReplacementMode::Classic).unwrap_err();
        assert_eq!(
            err,
            ValidationError::LengthMismatch {
                patterns: 2,
                replacements: 1
            }
        );
    }

    #[test]
    fn empty_pattern_is_rejected_in_every_mode() {
        for mode in ReplacementMode::ALL {
            let err = RuleSet::build(["ab", ""], ["x", "y"], mode).unwrap_err();
            assert_eq!(err, ValidationError::EmptyPattern { index: 1 }, "{mode}");
        }
    }

    #[test]
    fn classic_requires_single_symbols() {
        let err = RuleSet::build(["0", "10"], ["1", "0"], ReplacementMode::Classic).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidPatternLength { index: 1, len: 2 }
        );
    }

    #[test]
    fn classic_counts_symbols_not_bytes() {
        let set = RuleSet::build(["é", "→"], ["e", "->"], ReplacementMode::Classic).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.rules()[1].pattern_len(), 1);
    }

    #[test]
    fn segmentwise_rejects_unequal_lengths() {
        let err = RuleSet::build(["111", "10"], ["2", "3"], ReplacementMode::Segmentwise)
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::InconsistentPatternLength {
                index: 1,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn continuous_modes_accept_mixed_lengths() {
        for mode in [
            ReplacementMode::ContinuousOverlap,
            ReplacementMode::ContinuousSkip,
        ] {
            let set = RuleSet::build(["111", "1"], ["2", "3"], mode).unwrap();
            assert_eq!(set.window_len(), Some(3));
        }
    }

    #[test]
    fn window_modes_need_rules() {
        let none: [&str; 0] = [];
        for mode in [ReplacementMode::Segmentwise, ReplacementMode::ContinuousSkip] {
            let err = RuleSet::build(none, none, mode).unwrap_err();
            assert_eq!(err, ValidationError::EmptyRuleSet(mode));
        }
        assert!(RuleSet::build(none, none, ReplacementMode::Classic)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn duplicate_patterns_keep_declaration_order() {
        let set = RuleSet::from_pairs([("0", "a"), ("0", "b")], ReplacementMode::Classic).unwrap();
        assert_eq!(set.first_match(&['0']).unwrap().replacement(), "a");
    }

    #[test]
    fn with_mode_revalidates() {
        let set = RuleSet::from_pairs([("111", "2"), ("1", "3")], ReplacementMode::ContinuousSkip)
            .unwrap();
        assert!(matches!(
            set.with_mode(ReplacementMode::Segmentwise),
            Err(ValidationError::InconsistentPatternLength { .. })
        ));
        assert_eq!(
            set.with_mode(ReplacementMode::ContinuousOverlap)
                .unwrap()
                .mode(),
            ReplacementMode::ContinuousOverlap
        );
    }

    #[test]
    fn listing_uses_arrow_format() {
        let set = RuleSet::from_pairs([("0", "1"), ("1", "10")], ReplacementMode::Classic).unwrap();
        let lines: Vec<String> = set.listing().collect();
        assert_eq!(lines, ["0  -->  1", "1  -->  10"]);
    }

    #[test]
    fn infer_and_parse_modes() {
        assert_eq!(
            ReplacementMode::infer(&["0", "1"]),
            Some(ReplacementMode::Classic)
        );
        assert_eq!(ReplacementMode::infer(&["01", "1"]), None);
        for mode in ReplacementMode::ALL {
            assert_eq!(mode.as_str().parse::<ReplacementMode>().unwrap(), mode);
        }
        assert_eq!(
            "cont_n".parse::<ReplacementMode>().unwrap(),
            ReplacementMode::ContinuousSkip
        );
        assert!("spiral".parse::<ReplacementMode>().is_err());
    }
}
