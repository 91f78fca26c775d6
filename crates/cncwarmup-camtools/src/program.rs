//! Program text
//!
//! An emitted controller program is an ordered list of lines. A line is a
//! directive (with an optional trailing comment), a comment on its own, or a
//! blank separator. Rendering joins the lines with `\n` and no trailing
//! newline, which is the layout of the reference `.H` programs.

use cncwarmup_core::EmitResult;
use std::fmt;

/// Comment delimiter of the conversational dialects
pub const COMMENT_PREFIX: &str = ";";

/// Decimal places kept when a value is not integral
const MAX_DECIMALS: usize = 4;

/// Above this magnitude every f64 is printed as a whole number and scaling
/// by `10^MAX_DECIMALS` could overflow.
const WHOLE_NUMBER_LIMIT: f64 = 1.0e15;

/// One line of a controller program
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramLine {
    /// Executable code, optionally followed by a comment
    Directive {
        code: String,
        comment: Option<String>,
    },
    /// Comment-only line
    Comment(String),
    /// Empty separator line
    Blank,
}

impl ProgramLine {
    /// Executable code of the line, if it has any
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Directive { code, .. } => Some(code),
            _ => None,
        }
    }

    pub fn is_directive(&self) -> bool {
        matches!(self, Self::Directive { .. })
    }
}

impl fmt::Display for ProgramLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Directive {
                code,
                comment: Some(comment),
            } => write!(f, "{} {} {}", code, COMMENT_PREFIX, comment),
            Self::Directive {
                code,
                comment: None,
            } => write!(f, "{}", code),
            Self::Comment(text) if text.is_empty() => write!(f, "{}", COMMENT_PREFIX),
            Self::Comment(text) => write!(f, "{} {}", COMMENT_PREFIX, text),
            Self::Blank => Ok(()),
        }
    }
}

/// An emitted controller program
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramText {
    lines: Vec<ProgramLine>,
}

impl ProgramText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a directive with a trailing comment
    pub fn directive(&mut self, code: impl Into<String>, comment: impl Into<String>) {
        self.lines.push(ProgramLine::Directive {
            code: code.into(),
            comment: Some(comment.into()),
        });
    }

    /// Append a directive without a comment
    pub fn code(&mut self, code: impl Into<String>) {
        self.lines.push(ProgramLine::Directive {
            code: code.into(),
            comment: None,
        });
    }

    pub fn comment(&mut self, text: impl Into<String>) {
        self.lines.push(ProgramLine::Comment(text.into()));
    }

    pub fn blank(&mut self) {
        self.lines.push(ProgramLine::Blank);
    }

    pub fn lines(&self) -> &[ProgramLine] {
        &self.lines
    }

    /// Code of every directive line, in program order
    pub fn directives(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(ProgramLine::code)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Render into any formatter sink
    pub fn write_to<W: fmt::Write>(&self, out: &mut W) -> EmitResult<()> {
        for (index, line) in self.lines.iter().enumerate() {
            if index > 0 {
                out.write_char('\n')?;
            }
            write!(out, "{}", line)?;
        }
        Ok(())
    }
}

impl fmt::Display for ProgramText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f).map_err(|_| fmt::Error)
    }
}

/// Format a value the way the controller reads it.
///
/// Integral values have no decimal point, others keep up to four decimals
/// with trailing zeros removed. Never uses scientific notation.
pub fn format_number(value: f64) -> String {
    if value.abs() >= WHOLE_NUMBER_LIMIT {
        return format!("{:.0}", value);
    }
    let scale = 10f64.powi(MAX_DECIMALS as i32);
    let rounded = (value * scale).round() / scale;
    if rounded == 0.0 {
        return "0".to_string();
    }
    if rounded.fract() == 0.0 {
        return format!("{:.0}", rounded);
    }
    let text = format!("{:.*}", MAX_DECIMALS, rounded);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Format a value with an explicit sign, as in `S+500` or `X-12.5`.
pub fn format_signed(value: f64) -> String {
    let text = format_number(value);
    if text.starts_with('-') {
        text
    } else {
        format!("+{}", text)
    }
}
