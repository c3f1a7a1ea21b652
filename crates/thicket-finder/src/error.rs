//! [§ 2.5 Error names](https://webidl.spec.whatwg.org/#idl-DOMException-error-names)
//!
//! The Finder reports the same three error classes a browser throws from
//! `querySelector` and friends.

use strum_macros::Display;
use thicket_selector::ParseError;
use thiserror::Error;

/// Errors raised by selector compilation and matching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FinderError {
    /// "`SyntaxError`: The string did not match the expected pattern."
    #[error("SyntaxError: {0}")]
    Syntax(String),
    /// "`NotSupportedError`: The operation is not supported."
    ///
    /// Never returned to the caller; recognized-but-unsupported selectors
    /// resolve to a non-match and this variant only feeds diagnostics.
    #[error("NotSupportedError: {0}")]
    NotSupported(String),
    /// An argument of the wrong node kind.
    #[error("TypeError: {0}")]
    Type(String),
}

/// Discriminant of [`FinderError`], used by the downgrade policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ErrorKind {
    /// `SyntaxError`
    #[strum(serialize = "SyntaxError")]
    Syntax,
    /// `NotSupportedError`
    #[strum(serialize = "NotSupportedError")]
    NotSupported,
    /// `TypeError`
    #[strum(serialize = "TypeError")]
    Type,
}

impl FinderError {
    /// The error class.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Syntax(_) => ErrorKind::Syntax,
            Self::NotSupported(_) => ErrorKind::NotSupported,
            Self::Type(_) => ErrorKind::Type,
        }
    }

    /// The message without the class prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Syntax(message) | Self::NotSupported(message) | Self::Type(message) => message,
        }
    }

    pub(crate) fn invalid_selector(selector: &str, reason: &dyn std::fmt::Display) -> Self {
        Self::Syntax(format!("Invalid selector {selector}: {reason}"))
    }
}

impl From<ParseError> for FinderError {
    fn from(err: ParseError) -> Self {
        Self::Syntax(err.to_string())
    }
}
