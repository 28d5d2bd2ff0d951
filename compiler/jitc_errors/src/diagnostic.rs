// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::fmt::Write;

use crate::code::ErrCode;
use crate::error::CompileError;
use crate::span::Span;
use crate::terminal::*;

/// A `CompileError` prepared for display against its source text.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub code:               ErrCode,
    pub primary_span:       Option<Span>,
    pub message:            String,
}

impl Diagnostic {
    pub fn from_error(err: &CompileError) -> Self {
        Self {
            code: err.code(),
            primary_span: err.span(),
            message: err.to_string(),
        }
    }

    /// Renders the diagnostic with the offending source line and a caret
    /// underline. Plain text; `report` adds color.
    pub fn render(&self, source: &str) -> String {
        let mut out = String::new();
        _ = writeln!(out, "Error[{}]: {}", self.code, self.message);

        let Some(span) = self.primary_span else {
            return out;
        };

        let line_num = span.start.line;   // 1-based
        let col_num = span.start.column;  // 0-based
        let span_len = if span.end.line == span.start.line {
            span.end.column.saturating_sub(col_num)
        } else {
            1
        };

        let source_line = source.lines().nth(line_num.saturating_sub(1)).unwrap_or("");
        _ = writeln!(out, " --> {}:{}", line_num, col_num + 1);
        _ = writeln!(out, "  |");
        _ = writeln!(out, "{: >4} | {}", line_num, source_line);
        _ = writeln!(out, "     | {}{}", " ".repeat(col_num), "^".repeat(span_len.max(1)));
        out
    }

    pub fn report(&self, source: &str) {
        let rendered = self.render(source);
        let mut lines = rendered.lines();
        if let Some(head) = lines.next() {
            eprintln!("{ANSI_COLOR_RED}{head}{ANSI_COLOR_RESET}");
        }
        for line in lines {
            eprintln!("{line}");
        }
    }
}
