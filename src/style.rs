//! Depth colors and ANSI styling for tree output.

use owo_colors::{AnsiColors, OwoColorize};
use serde::{Deserialize, Serialize};

/// Colors available to the tree renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeColor {
    Red,
    Green,
    Yellow,
    BrightBlue,
    Magenta,
    Cyan,
    White,
}

impl TreeColor {
    fn ansi(self) -> AnsiColors {
        match self {
            TreeColor::Red => AnsiColors::Red,
            TreeColor::Green => AnsiColors::Green,
            TreeColor::Yellow => AnsiColors::Yellow,
            TreeColor::BrightBlue => AnsiColors::BrightBlue,
            TreeColor::Magenta => AnsiColors::Magenta,
            TreeColor::Cyan => AnsiColors::Cyan,
            TreeColor::White => AnsiColors::White,
        }
    }
}

/// Per-depth palette, repeated for deeper levels.
pub const PALETTE: [TreeColor; 7] = [
    TreeColor::Red,
    TreeColor::Green,
    TreeColor::Yellow,
    TreeColor::BrightBlue,
    TreeColor::Magenta,
    TreeColor::Cyan,
    TreeColor::White,
];

/// Color of a tree level.
pub fn depth_color(depth: usize) -> TreeColor {
    PALETTE[depth % PALETTE.len()]
}

/// Wraps `text` in the color's escape codes, or returns it unchanged.
pub fn paint(text: &str, color: TreeColor, enabled: bool) -> String {
    if enabled {
        text.color(color.ansi()).to_string()
    } else {
        text.to_string()
    }
}

/// Whether the environment allows colored output on a stream.
///
/// Honors `NO_COLOR` and `TERM=dumb`; `is_terminal` is the caller's
/// tty check for the target stream.
pub fn color_supported(is_terminal: bool) -> bool {
    if std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
        return false;
    }
    if std::env::var("TERM").is_ok_and(|term| term == "dumb") {
        return false;
    }
    is_terminal
}
