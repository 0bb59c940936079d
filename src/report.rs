// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// Reporter for front-end errors with source context.

use crate::error::AsmError;

pub fn format_error_with_context(
    err: &AsmError,
    file: Option<&str>,
    lines: Option<&[String]>,
    use_color: bool,
) -> String {
    let mut out = String::new();

    if err.line() == 0 {
        out.push_str(&render_severity("ERROR", use_color));
        out.push_str(&format!(": [{}] {}", err.kind().label(), err.message()));
        return out;
    }

    let header = match file {
        Some(file) => format!("{file}:{}: ERROR", err.line()),
        None => format!("{}: ERROR", err.line()),
    };
    out.push_str(&header);
    out.push('\n');

    let line_idx = err.line().saturating_sub(1) as usize;
    let line_text = lines
        .and_then(|lines| lines.get(line_idx))
        .map(|s| s.as_str())
        .unwrap_or("<source unavailable>");
    out.push_str(&format!("{:>5} | {}", err.line(), line_text));
    out.push('\n');

    out.push_str(&render_severity("ERROR", use_color));
    out.push_str(&format!(": [{}] {}", err.kind().label(), err.message()));
    out
}

fn render_severity(sev: &str, use_color: bool) -> String {
    if use_color {
        format!("\x1b[31m{sev}\x1b[0m")
    } else {
        sev.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::format_error_with_context;
    use crate::error::{AsmError, ErrorKind};

    #[test]
    fn context_shows_gutter_and_source_line() {
        let err = AsmError::new(ErrorKind::UnexpectedToken, 2, "expected a register");
        let lines = vec!["mov ax, bx".to_string(), "or 1, ax".to_string()];
        let out = format_error_with_context(&err, Some("boot.asm"), Some(&lines), false);
        assert!(out.starts_with("boot.asm:2: ERROR"));
        assert!(out.contains("    2 | or 1, ax"));
        assert!(out.ends_with("ERROR: [UNEXPECTED TOKEN] expected a register"));
    }

    #[test]
    fn location_free_errors_render_on_one_line() {
        let err = AsmError::new(ErrorKind::File, 0, "the file `x.asm` is empty");
        let out = format_error_with_context(&err, None, None, false);
        assert_eq!(out, "ERROR: [FILE ERROR] the file `x.asm` is empty");
    }
}
