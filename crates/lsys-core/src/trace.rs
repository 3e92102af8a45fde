// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Generation sequence produced by one run.
use core::ops::Index;

/// Ordered generations `0..=recursions` of a single run.
///
/// Generation 0 is the start string. A trace always holds at least one
/// generation and is never mutated after the engine hands it out. Lengths are
/// derived from the generations on demand and counted in symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarTrace {
    generations: Vec<String>,
}

impl GrammarTrace {
    pub(crate) fn start(start: String) -> Self {
        Self {
            generations: vec![start],
        }
    }

    pub(crate) fn push(&mut self, generation: String) {
        self.generations.push(generation);
    }

    /// Rebuilds a trace from stored generations (e.g. a reloaded trace blob).
    ///
    /// Returns `None` for an empty list: a trace always contains its start string.
    pub fn from_generations(generations: Vec<String>) -> Option<Self> {
        (!generations.is_empty()).then_some(Self { generations })
    }

    /// Number of generations (`recursions + 1`).
    pub fn len(&self) -> usize {
        self.generations.len()
    }

    /// Always `false`; present for API symmetry with [`GrammarTrace::len`].
    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }

    /// Number of rewrite steps that produced this trace.
    pub fn recursions(&self) -> usize {
        self.generations.len().saturating_sub(1)
    }

    /// Generation `n` (0-based), if present.
    pub fn generation(&self, n: usize) -> Option<&str> {
        self.generations.get(n).map(String::as_str)
    }

    /// The start string (generation 0).
    pub fn first(&self) -> &str {
        self.generations.first().map_or("", String::as_str)
    }

    /// The final generation.
    pub fn last(&self) -> &str {
        self.generations.last().map_or("", String::as_str)
    }

    /// Generations in ascending index order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.generations.iter().map(String::as_str)
    }

    /// Symbol count of every generation, in index order.
    pub fn lengths(&self) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.generations.iter().map(|g| g.chars().count())
    }

    /// Consumes the trace and returns the owned generations.
    pub fn into_generations(self) -> Vec<String> {
        self.generations
    }
}

impl Index<usize> for GrammarTrace {
    type Output = str;

    fn index(&self, index: usize) -> &Self::Output {
        &self.generations[index]
    }
}

impl<'a> IntoIterator for &'a GrammarTrace {
    type Item = &'a str;
    type IntoIter = core::iter::Map<core::slice::Iter<'a, String>, fn(&'a String) -> &'a str>;

    fn into_iter(self) -> Self::IntoIter {
        self.generations
            .iter()
            .map(String::as_str as fn(&'a String) -> &'a str)
    }
}
