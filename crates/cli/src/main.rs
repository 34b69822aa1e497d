// Copyright 2025 Compbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! compbench entry point.

fn main() {
    if let Err(e) = compbench_cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
