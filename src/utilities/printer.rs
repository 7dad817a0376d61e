//! Console printer with optional ANSI color.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

/// Available colors for printed output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrinterColor {
    Red,
    Green,
    Yellow,
    Cyan,
    White,
    BoldCyan,
    BoldWhite,
}

impl PrinterColor {
    /// ANSI escape code for this color.
    fn ansi_code(&self) -> &'static str {
        match self {
            Self::Red => "\x1b[31m",
            Self::Green => "\x1b[32m",
            Self::Yellow => "\x1b[33m",
            Self::Cyan => "\x1b[36m",
            Self::White => "\x1b[37m",
            Self::BoldCyan => "\x1b[1;36m",
            Self::BoldWhite => "\x1b[1;37m",
        }
    }
}

/// ANSI reset code.
const RESET: &str = "\x1b[0m";

/// Writes lines to any sink, colored only when enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct Printer {
    pub colored: bool,
}

impl Printer {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    /// Plain output, no escape codes.
    pub fn plain() -> Self {
        Self { colored: false }
    }

    /// Write `content` followed by a newline.
    pub fn line(&self, out: &mut dyn Write, content: &str, color: PrinterColor) -> io::Result<()> {
        if self.colored {
            writeln!(out, "{}{}{}", color.ansi_code(), content, RESET)
        } else {
            writeln!(out, "{}", content)
        }
    }

    /// Write `content` without a newline and flush, for prompts.
    pub fn prompt(&self, out: &mut dyn Write, content: &str) -> io::Result<()> {
        write!(out, "{}", content)?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_line_has_no_escape_codes() {
        let mut out = Vec::new();
        Printer::plain().line(&mut out, "hello", PrinterColor::Green).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "hello\n");
    }

    #[test]
    fn test_colored_line_wraps_in_ansi() {
        let mut out = Vec::new();
        Printer::new(true).line(&mut out, "hi", PrinterColor::Red).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\x1b[31mhi\x1b[0m\n");
    }
}
