// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
use lsys_core::{presets, ReplacementMode, RewriteEngine, RuleSet, ValidationError};

const BITS: &str = "001110110010011110010011110000";

fn triad(mode: ReplacementMode) -> RuleSet {
    RuleSet::build(["111", "110", "100"], ["2", "3", "4"], mode).unwrap()
}

#[test]
fn skip_mode_reference_vector() {
    let trace = RewriteEngine::run(&triad(ReplacementMode::ContinuousSkip), BITS, 1);
    assert_eq!(trace.generation(1), Some("00203042442400"));
}

#[test]
fn overlap_mode_reference_vector() {
    let trace = RewriteEngine::run(&triad(ReplacementMode::ContinuousOverlap), BITS, 1);
    assert_eq!(trace.generation(1), Some("002310340040022340040022340000"));
}

#[test]
fn segmentwise_reference_vector() {
    let trace = RewriteEngine::run(&triad(ReplacementMode::Segmentwise), BITS, 2);
    assert_eq!(trace.iter().collect::<Vec<_>>(), [BITS, "3333", "3"]);
}

#[test]
fn skip_mode_iterates_until_nothing_matches() {
    let trace = RewriteEngine::run(&triad(ReplacementMode::ContinuousSkip), BITS, 3);
    // The second pass sees no binary triples left and copies everything.
    assert_eq!(trace.generation(2), trace.generation(1));
    assert_eq!(trace.generation(3), trace.generation(1));
}

#[test]
fn segmentwise_rejects_unequal_lengths_without_truncating() {
    let err = RuleSet::build(["111", "11"], ["2", "3"], ReplacementMode::Segmentwise).unwrap_err();
    assert!(matches!(
        err,
        ValidationError::InconsistentPatternLength {
            index: 1,
            expected: 3,
            found: 2
        }
    ));
}

#[test]
fn koch_curve_growth() {
    let rules = presets::lookup("koch-curve").unwrap().rule_set().unwrap();
    let trace = RewriteEngine::run(&rules, "1", 3);
    // '+' and '-' have no rule and vanish; each of the five '1's expands to 9.
    assert_eq!(trace.lengths().collect::<Vec<_>>(), [1, 9, 45, 225]);
    assert_eq!(trace.generation(1), Some("1+1-1-1+1"));
}
