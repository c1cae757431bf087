//! Shared error utilities used across the compilation pipeline.
//!
//! Diagnostics are kept lightweight on purpose – frontend errors point at the
//! offending byte with a caret, backend errors name the symbol that failed to
//! resolve. Everything funnels through one enum so the driver only has one
//! failure type to report.

use snafu::Snafu;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Snafu)]
pub enum CompileError {
  #[snafu(display("{source_line}\n{marker} {message}"))]
  WithLocation {
    source_line: String,
    marker: String,
    message: String,
  },

  #[snafu(display("undefined variable '{name}'"))]
  UndefinedVariable { name: String },
}

impl CompileError {
  /// Construct an error anchored at a specific byte offset in the source.
  pub fn at(source: &str, loc: usize, message: impl Into<String>) -> Self {
    let line_start = source[..loc.min(source.len())]
      .rfind('\n')
      .map(|i| i + 1)
      .unwrap_or(0);
    let line_end = source[line_start..]
      .find('\n')
      .map(|i| line_start + i)
      .unwrap_or(source.len());
    let source_line = format!("'{}'", &source[line_start..line_end]);
    let safe_loc = loc.clamp(line_start, line_end);
    let char_offset = source[line_start..safe_loc].chars().count() + 1; // account for opening quote
    let marker = format!("{}^", " ".repeat(char_offset));
    Self::WithLocation {
      source_line,
      marker,
      message: message.into(),
    }
  }

  pub fn undefined_variable(name: impl Into<String>) -> Self {
    Self::UndefinedVariable { name: name.into() }
  }
}
