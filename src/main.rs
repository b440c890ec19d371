// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Mindmap: print and maintain the stored maps from the command line

use clap::Parser;

fn main() -> anyhow::Result<()> {
    mindmap::init_logging();
    mindmap::run(mindmap::CliArgs::parse())
}
