// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
use std::fs;
use std::io::BufReader;

use lsys_core::{presets, ReplacementMode, RewriteEngine, RuleSet};
use lsys_trace_io::{
    parse_generations, parse_rule_listing, read_trace, BlobSink, TextArtifacts, TextSink,
    TraceSink,
};

const STAMP: &str = "2017-03-01_09-30-00";

#[test]
fn text_sink_writes_three_listings_that_parse_back() {
    let dir = tempfile::tempdir().unwrap();
    let rules = presets::lookup("sierpinski-triangle")
        .unwrap()
        .rule_set()
        .unwrap();
    let trace = RewriteEngine::run(&rules, "0", 4);

    let written = TextSink::new(dir.path(), "sierp", STAMP)
        .persist(&trace, &rules)
        .unwrap();
    let expected = TextArtifacts::in_dir(dir.path(), "sierp", STAMP);
    assert_eq!(written, expected.paths());

    let generations = parse_generations(fs::File::open(&expected.grammar).unwrap()).unwrap();
    assert_eq!(generations, trace.clone().into_generations());

    let lengths = fs::read_to_string(&expected.lengths).unwrap();
    let parsed: Vec<usize> = lengths.lines().map(|l| l.parse().unwrap()).collect();
    assert_eq!(parsed, trace.lengths().collect::<Vec<_>>());

    let listing =
        parse_rule_listing(BufReader::new(fs::File::open(&expected.rules).unwrap())).unwrap();
    let rebuilt = RuleSet::from_pairs(listing, ReplacementMode::Classic).unwrap();
    assert_eq!(rebuilt, rules);
}

#[test]
fn blob_sink_reloads_any_generation() {
    let dir = tempfile::tempdir().unwrap();
    let rules = RuleSet::from_pairs(
        [("111", "2"), ("110", "3"), ("100", "4")],
        ReplacementMode::ContinuousOverlap,
    )
    .unwrap();
    let trace = RewriteEngine::run(&rules, "001110110010011110010011110000", 3);

    let sink = BlobSink::new(dir.path().join("nested"), "bits", STAMP);
    let written = sink.persist(&trace, &rules).unwrap();
    assert_eq!(written, [sink.path()]);

    let mut file = fs::File::open(sink.path()).unwrap();
    let stored = read_trace(&mut file).unwrap();
    assert_eq!(stored.trace, trace);
    assert_eq!(stored.rules.mode(), ReplacementMode::ContinuousOverlap);
    for n in 0..trace.len() {
        assert_eq!(stored.generation(n), trace.generation(n));
    }
    assert_eq!(stored.digest_hex().len(), 64);
}
