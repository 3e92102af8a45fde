// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared application services for lsys tools (run config, prefs, config storage).
//! Keeps the CLI thin and free of ad hoc state.

pub mod config;
pub mod config_port;
pub mod prefs;
pub mod run;
