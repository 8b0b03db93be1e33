// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Split test files for CLI parsing, one per command group.

use super::*;


fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(args)
}
