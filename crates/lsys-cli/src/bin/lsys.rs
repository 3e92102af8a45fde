// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `lsys` binary entry point.

use anyhow::Result;

fn main() -> Result<()> {
    lsys_cli::entrypoint()
}
