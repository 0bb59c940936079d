// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Command-line interface parsing and argument validation.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

use crate::error::{AsmError, ErrorKind};

pub const VERSION: &str = "1.0";

const LONG_ABOUT: &str = "Assembler for an x86-compatible instruction subset targeting \
bootloader-class artifacts.

The front end validates the source file completely before any output is
considered: lexing, token classification, and per-instruction operand
checking all run to the first error. Byte emission is selected by the
boot protocol and is not performed yet.";

#[derive(Parser, Debug)]
#[command(
    name = "mocasm",
    version = VERSION,
    about = "Assembler for an x86-compatible instruction subset",
    long_about = LONG_ABOUT
)]
pub struct Cli {
    #[arg(
        short = 'f',
        long = "file",
        value_name = "FILE",
        long_help = "Input assembly file. Must end with .asm."
    )]
    pub file: Option<PathBuf>,
    #[arg(
        long = "arch",
        value_name = "ARCH",
        value_enum,
        default_value_t = Arch::Bit16,
        long_help = "Target architecture width. Only bit16 output is planned; the other values are accepted for forward compatibility."
    )]
    pub arch: Arch,
    #[arg(
        long = "debug",
        action = ArgAction::SetTrue,
        long_help = "Print the parsed line stream to stdout after a successful run."
    )]
    pub debug: bool,
    #[arg(
        long = "debug-log",
        value_name = "FILE",
        long_help = "Write the parsed line stream to FILE after a successful run."
    )]
    pub debug_log: Option<PathBuf>,
    #[arg(
        long = "boot-protocol",
        value_name = "PROTO",
        value_enum,
        default_value_t = BootProtocol::Mbr,
        long_help = "Artifact category the eventual backend will emit: master boot record, second-stage bootloader, or add-on library."
    )]
    pub boot_protocol: BootProtocol,
    #[arg(
        long = "store-names",
        action = ArgAction::SetTrue,
        long_help = "Include declared label and variable names in the debug output."
    )]
    pub store_names: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Arch {
    Bit16,
    Bit32,
    Bit64,
}

impl Arch {
    pub fn as_str(self) -> &'static str {
        match self {
            Arch::Bit16 => "bit16",
            Arch::Bit32 => "bit32",
            Arch::Bit64 => "bit64",
        }
    }
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BootProtocol {
    Mbr,
    Ssboot,
    Adasm,
}

impl BootProtocol {
    pub fn as_str(self) -> &'static str {
        match self {
            BootProtocol::Mbr => "mbr",
            BootProtocol::Ssboot => "ssboot",
            BootProtocol::Adasm => "adasm",
        }
    }
}

impl std::fmt::Display for BootProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated CLI configuration.
#[derive(Debug)]
pub struct CliConfig {
    pub file: PathBuf,
    pub arch: Arch,
    pub debug: bool,
    pub debug_log: Option<PathBuf>,
    pub boot_protocol: BootProtocol,
    pub store_names: bool,
}

/// Validate CLI arguments and return parsed configuration.
pub fn validate_cli(cli: &Cli) -> Result<CliConfig, AsmError> {
    let file = match &cli.file {
        Some(file) => file.clone(),
        None => {
            return Err(AsmError::new(
                ErrorKind::Cli,
                0,
                "No input file specified. Use -f/--file",
            ));
        }
    };
    let file_name = file
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| AsmError::new(ErrorKind::Cli, 0, "Invalid input file name"))?;
    if !file_name.ends_with(".asm") {
        return Err(AsmError::new(
            ErrorKind::Cli,
            0,
            "Input file must end with .asm",
        ));
    }
    Ok(CliConfig {
        file,
        arch: cli.arch,
        debug: cli.debug,
        debug_log: cli.debug_log.clone(),
        boot_protocol: cli.boot_protocol,
        store_names: cli.store_names,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn cli_parses_flags() {
        let cli = Cli::parse_from([
            "mocasm",
            "-f",
            "boot.asm",
            "--arch",
            "bit16",
            "--debug",
            "--debug-log",
            "boot.log",
            "--boot-protocol",
            "ssboot",
            "--store-names",
        ]);
        assert_eq!(cli.file, Some(PathBuf::from("boot.asm")));
        assert_eq!(cli.arch, Arch::Bit16);
        assert!(cli.debug);
        assert_eq!(cli.debug_log, Some(PathBuf::from("boot.log")));
        assert_eq!(cli.boot_protocol, BootProtocol::Ssboot);
        assert!(cli.store_names);
    }

    #[test]
    fn cli_defaults() {
        let cli = Cli::parse_from(["mocasm", "-f", "boot.asm"]);
        assert_eq!(cli.arch, Arch::Bit16);
        assert_eq!(cli.boot_protocol, BootProtocol::Mbr);
        assert!(!cli.debug);
        assert!(!cli.store_names);
    }

    #[test]
    fn arch_vocabulary_is_closed() {
        assert!(Cli::try_parse_from(["mocasm", "-f", "boot.asm", "--arch", "bit8"]).is_err());
        assert!(
            Cli::try_parse_from(["mocasm", "-f", "boot.asm", "--boot-protocol", "uefi"]).is_err()
        );
    }

    #[test]
    fn validate_cli_requires_input_file() {
        let cli = Cli::parse_from(["mocasm"]);
        let err = validate_cli(&cli).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cli);
        assert_eq!(err.message(), "No input file specified. Use -f/--file");
    }

    #[test]
    fn validate_cli_requires_asm_extension() {
        let cli = Cli::parse_from(["mocasm", "-f", "boot.txt"]);
        let err = validate_cli(&cli).unwrap_err();
        assert_eq!(err.message(), "Input file must end with .asm");
    }

    #[test]
    fn validate_cli_accepts_asm_file() {
        let cli = Cli::parse_from(["mocasm", "-f", "boot.asm", "--debug"]);
        let config = validate_cli(&cli).expect("validate cli");
        assert_eq!(config.file, PathBuf::from("boot.asm"));
        assert!(config.debug);
    }
}
