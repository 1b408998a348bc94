//! Visual theme and styling.

use console::Style;

/// Styles for echoed report lines.
#[derive(Debug, Clone)]
pub struct CompatTheme {
    /// `[OK]` prefix (green bold).
    pub ok: Style,
    /// `[FAIL]` prefix (red bold).
    pub fail: Style,
    /// Metadata keys (bold).
    pub key: Style,
    /// Indented evidence details (dim).
    pub dim: Style,
}

impl Default for CompatTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl CompatTheme {
    pub fn new() -> Self {
        Self {
            ok: Style::new().green().bold(),
            fail: Style::new().red().bold(),
            key: Style::new().bold(),
            dim: Style::new().dim(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            ok: Style::new(),
            fail: Style::new(),
            key: Style::new(),
            dim: Style::new(),
        }
    }
}
