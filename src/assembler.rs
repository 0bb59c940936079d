// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// Run orchestration: CLI, source load, parse, debug output.

use std::fs;
use std::path::Path;

use clap::Parser;

use crate::assembler::cli::{Cli, CliConfig};
use crate::cursor::SourceCursor;
use crate::error::{AsmError, ErrorKind, RunError};
use crate::lexer::Lexer;
use crate::parser::{ParsedLine, ParserDriver};

pub mod cli;

/// Parse arguments and run one assembly pass over the input file.
pub fn run() -> Result<RunReport, RunError> {
    let args = Cli::parse();
    let config = cli::validate_cli(&args).map_err(bare)?;
    run_one(&config)
}

/// Run the front-end pipeline for a validated configuration.
pub fn run_one(config: &CliConfig) -> Result<RunReport, RunError> {
    let cursor = SourceCursor::from_path(&config.file).map_err(bare)?;
    let file_name = config.file.to_string_lossy().to_string();
    let source_lines: Vec<String> = String::from_utf8_lossy(cursor.contents())
        .lines()
        .map(|s| s.to_string())
        .collect();

    let mut driver = ParserDriver::new(Lexer::new(cursor));
    let lines = driver
        .parse_all()
        .map_err(|err| RunError::new(err, Some(file_name.clone()), source_lines.clone()))?;

    let report = RunReport::new(file_name, config, lines, source_lines);

    if config.debug {
        print!("{}", report.dump());
    }
    if let Some(log_path) = &config.debug_log {
        write_debug_log(log_path, &report)?;
    }

    Ok(report)
}

fn write_debug_log(path: &Path, report: &RunReport) -> Result<(), RunError> {
    fs::write(path, report.dump()).map_err(|err| {
        bare(AsmError::new(
            ErrorKind::File,
            0,
            format!(
                "there was an error writing the debug log `{}`: {err}",
                path.display()
            ),
        ))
    })
}

fn bare(error: AsmError) -> RunError {
    RunError::new(error, None, Vec::new())
}

/// Result of a successful run: the parsed line stream a backend would
/// consume, plus the source for debug rendering.
#[derive(Debug)]
pub struct RunReport {
    file: String,
    arch: cli::Arch,
    boot_protocol: cli::BootProtocol,
    store_names: bool,
    lines: Vec<ParsedLine>,
    source_lines: Vec<String>,
}

impl RunReport {
    fn new(
        file: String,
        config: &CliConfig,
        lines: Vec<ParsedLine>,
        source_lines: Vec<String>,
    ) -> Self {
        Self {
            file,
            arch: config.arch,
            boot_protocol: config.boot_protocol,
            store_names: config.store_names,
            lines,
            source_lines,
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn lines(&self) -> &[ParsedLine] {
        &self.lines
    }

    pub fn source_lines(&self) -> &[String] {
        &self.source_lines
    }

    /// Names declared by labels and storage declarations, in source
    /// order.
    pub fn declared_names(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter_map(|line| match line {
                ParsedLine::LabelDef { name, .. } | ParsedLine::Data { name, .. } => {
                    Some(name.as_str())
                }
                ParsedLine::Instruction { .. } => None,
            })
            .collect()
    }

    /// Human-readable dump of the parsed line stream for --debug and
    /// --debug-log.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "mocasm v{} :: {} (arch {}, protocol {})\n",
            cli::VERSION,
            self.file,
            self.arch.as_str(),
            self.boot_protocol.as_str()
        ));
        for line in &self.lines {
            out.push_str(&format!("{:>5} | {line}\n", line.line()));
        }
        out.push_str(&format!("Lines parsed: {}\n", self.lines.len()));
        if self.store_names {
            out.push_str("NAMES:");
            for name in self.declared_names() {
                out.push(' ');
                out.push_str(name);
            }
            out.push('\n');
        }
        out
    }
}
