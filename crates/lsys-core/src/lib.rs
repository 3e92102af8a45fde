// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! lsys-core: iterative string rewriting for Lindenmayer-style grammars.
//!
//! A run starts from a validated [`RuleSet`] and a start string and produces a
//! [`GrammarTrace`]: generation 0 is the start string, generation `k + 1` is the
//! rewrite of generation `k`. Four replacement modes are supported (see
//! [`ReplacementMode`]); the mode is fixed for the whole run.
//!
//! The crate performs no I/O. Persistence lives in `lsys-trace-io`.
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
    clippy::return_self_not_must_use,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

mod engine_impl;
/// Built-in Lindenmayer systems (Fibonacci, algae, Thue-Morse, ...).
pub mod presets;
mod rule;
mod trace;

/// Stateless rewrite engine and the per-mode rewrite passes.
pub use engine_impl::{
    rewrite_classic, rewrite_continuous, rewrite_continuous_skip, rewrite_segmentwise,
    BoundedRun, RewriteEngine, Truncation,
};
/// Preset lookup helpers.
pub use presets::Preset;
/// Rule primitives and validation.
pub use rule::{ParseModeError, ReplacementMode, Rule, RuleSet, ValidationError, RULE_ARROW};
/// Generation sequence produced by a run.
pub use trace::GrammarTrace;
