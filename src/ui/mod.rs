//! Terminal output.
//!
//! The persisted report is always plain text. When the same lines are echoed
//! to a terminal, outcome prefixes and metadata keys are styled.

pub mod theme;

use std::io::{self, Write};

use crate::audit::report::{DETAIL_INDENT, FAIL_PREFIX, OK_PREFIX};

pub use theme::CompatTheme;

/// Echoes report lines with styling.
#[derive(Debug, Clone)]
pub struct ReportPrinter {
    theme: CompatTheme,
}

impl ReportPrinter {
    /// Colored printer, unless `no_color` is set or `NO_COLOR` is present.
    pub fn new(no_color: bool) -> Self {
        let theme = if no_color || std::env::var_os("NO_COLOR").is_some() {
            CompatTheme::plain()
        } else {
            CompatTheme::new()
        };
        Self { theme }
    }

    pub fn with_theme(theme: CompatTheme) -> Self {
        Self { theme }
    }

    /// Style one report line for display.
    pub fn style_line(&self, line: &str) -> String {
        if let Some(rest) = line.strip_prefix(OK_PREFIX) {
            format!("{}{}", self.theme.ok.apply_to(OK_PREFIX), rest)
        } else if let Some(rest) = line.strip_prefix(FAIL_PREFIX) {
            format!("{}{}", self.theme.fail.apply_to(FAIL_PREFIX), rest)
        } else if line.starts_with(DETAIL_INDENT) {
            self.theme.dim.apply_to(line).to_string()
        } else if let Some((key, value)) = line.split_once('=') {
            format!("{}={}", self.theme.key.apply_to(key), value)
        } else {
            line.to_string()
        }
    }

    /// Write all lines to `out`.
    pub fn print(&self, out: &mut dyn Write, lines: &[String]) -> io::Result<()> {
        for line in lines {
            writeln!(out, "{}", self.style_line(line))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_theme_leaves_lines_untouched() {
        let printer = ReportPrinter::with_theme(CompatTheme::plain());
        for line in ["[OK] fine", "[FAIL] broken", "  detail", "result=PASS", "other"] {
            assert_eq!(printer.style_line(line), line);
        }
    }

    #[test]
    fn print_writes_one_line_each() {
        let printer = ReportPrinter::with_theme(CompatTheme::plain());
        let mut buf = Vec::new();
        printer
            .print(&mut buf, &["a=1".to_string(), "[OK] b".to_string()])
            .unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "a=1\n[OK] b\n");
    }
}
