//! Structured error model for the filter compiler.
//! Every error carries the kind of failure, the byte offset of the offending
//! token in the filter text, and a one-line caret snippet so frontends
//! (HTTP, CLI) can show the operator where the filter went wrong.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterErrorKind {
    Syntax,
    UnknownColumn,
    OperatorNotSupported,
    InvalidIp,
    InvalidSubnet,
    IntegerOutOfRange,
    UnterminatedString,
    UnterminatedComment,
    EmptyList,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message} at position {offset}\n{snippet}")]
pub struct FilterError {
    pub kind: FilterErrorKind,
    pub offset: usize,
    pub message: String,
    pub snippet: String,
}

impl FilterError {
    pub fn new<S: Into<String>>(kind: FilterErrorKind, src: &str, offset: usize, message: S) -> Self {
        FilterError { kind, offset, message: message.into(), snippet: caret_snippet(src, offset) }
    }

    pub fn syntax<S: Into<String>>(src: &str, offset: usize, msg: S) -> Self { Self::new(FilterErrorKind::Syntax, src, offset, msg) }
    pub fn unknown_column<S: Into<String>>(src: &str, offset: usize, msg: S) -> Self { Self::new(FilterErrorKind::UnknownColumn, src, offset, msg) }
    pub fn operator_not_supported<S: Into<String>>(src: &str, offset: usize, msg: S) -> Self { Self::new(FilterErrorKind::OperatorNotSupported, src, offset, msg) }
    pub fn invalid_ip<S: Into<String>>(src: &str, offset: usize, msg: S) -> Self { Self::new(FilterErrorKind::InvalidIp, src, offset, msg) }
    pub fn invalid_subnet<S: Into<String>>(src: &str, offset: usize, msg: S) -> Self { Self::new(FilterErrorKind::InvalidSubnet, src, offset, msg) }
    pub fn out_of_range<S: Into<String>>(src: &str, offset: usize, msg: S) -> Self { Self::new(FilterErrorKind::IntegerOutOfRange, src, offset, msg) }
    pub fn unterminated_string<S: Into<String>>(src: &str, offset: usize, msg: S) -> Self { Self::new(FilterErrorKind::UnterminatedString, src, offset, msg) }
    pub fn unterminated_comment<S: Into<String>>(src: &str, offset: usize, msg: S) -> Self { Self::new(FilterErrorKind::UnterminatedComment, src, offset, msg) }
    pub fn empty_list<S: Into<String>>(src: &str, offset: usize, msg: S) -> Self { Self::new(FilterErrorKind::EmptyList, src, offset, msg) }

    /// Stable machine-readable code for frontends surfacing the error.
    pub fn code_str(&self) -> &'static str {
        match self.kind {
            FilterErrorKind::Syntax => "syntax_error",
            FilterErrorKind::UnknownColumn => "unknown_column",
            FilterErrorKind::OperatorNotSupported => "operator_not_supported",
            FilterErrorKind::InvalidIp => "invalid_ip",
            FilterErrorKind::InvalidSubnet => "invalid_subnet",
            FilterErrorKind::IntegerOutOfRange => "integer_out_of_range",
            FilterErrorKind::UnterminatedString => "unterminated_string",
            FilterErrorKind::UnterminatedComment => "unterminated_comment",
            FilterErrorKind::EmptyList => "empty_list",
        }
    }
}

pub type FilterResult<T> = Result<T, FilterError>;

/// Produce a one-line snippet of the offending line with a caret under the
/// column (approximate for ASCII).
pub fn caret_snippet(src: &str, pos: usize) -> String {
    let pos = pos.min(src.len());
    let prefix = &src[..pos];
    let line_start = prefix.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line_end = src[pos..].find('\n').map(|i| pos + i).unwrap_or(src.len());
    let line = &src[line_start..line_end];
    let col = prefix[line_start..].chars().count();
    let mut caret = String::new();
    for _ in 0..col { caret.push(' '); }
    caret.push('^');
    format!("{}\n{}", line, caret)
}
