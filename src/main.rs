// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// CLI entrypoint for mocasm.

fn main() {
    let use_color = std::env::var("NO_COLOR").is_err();
    if let Err(err) = mocasm::assembler::run() {
        eprintln!("{}", err.format_with_context(use_color));
        std::process::exit(1);
    }
}
