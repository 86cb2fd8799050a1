use crate::ast::Location;
use crate::common::descriptor::DescriptorError;
use crate::wash::Diagnostic;

use super::span::line_at;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Unexpected token encountered
    #[error("expected {expected}, found '{found}'")]
    UnexpectedToken {
        expected: String,
        found: String,
        location: Location,
    },

    /// Unexpected end of input
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEndOfInput {
        expected: String,
        location: Location,
    },

    /// Method descriptor that does not decode
    #[error("invalid method descriptor: {source}")]
    InvalidDescriptor {
        #[source]
        source: DescriptorError,
        location: Location,
    },

    /// Literal that does not fit its token class (overflow, bad escape)
    #[error("invalid literal '{literal}': {message}")]
    InvalidLiteral {
        literal: String,
        message: String,
        location: Location,
    },

    /// Annotation values nested deeper than the parser accepts
    #[error("annotation value nested too deeply")]
    TooDeep { location: Location },
}

impl ParseError {
    /// Create a new unexpected token error
    pub fn unexpected_token(expected: &str, found: &str, location: Location) -> Self {
        ParseError::UnexpectedToken { expected: expected.to_string(), found: found.to_string(), location }
    }

    /// Create a new unexpected end of input error
    pub fn unexpected_end_of_input(expected: &str, location: Location) -> Self {
        ParseError::UnexpectedEndOfInput { expected: expected.to_string(), location }
    }

    pub fn invalid_literal(literal: &str, message: impl Into<String>, location: Location) -> Self {
        ParseError::InvalidLiteral { literal: literal.to_string(), message: message.into(), location }
    }

    /// Get the location of the error
    pub fn location(&self) -> Location {
        match self {
            ParseError::UnexpectedToken { location, .. }
            | ParseError::UnexpectedEndOfInput { location, .. }
            | ParseError::InvalidDescriptor { location, .. }
            | ParseError::InvalidLiteral { location, .. }
            | ParseError::TooDeep { location } => *location,
        }
    }

    /// Turn into a `MalformedIndexEntry` diagnostic quoting the offending line
    pub fn into_diagnostic(self, source: &str) -> Diagnostic {
        let location = self.location();
        Diagnostic::MalformedIndexEntry {
            location,
            message: self.to_string(),
            line: line_at(source, location).trim().to_string(),
        }
    }
}

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_quotes_line() {
        let src = "package p:\n  class Test:\n    retrun: @p.NonNull\n";
        let mut loc = Location::start();
        loc.advance_str("package p:\n  class Test:\n    ");
        let err = ParseError::unexpected_token("'method', 'field' or '@'", "retrun", loc);
        match err.into_diagnostic(src) {
            Diagnostic::MalformedIndexEntry { location, message, line } => {
                assert_eq!(location.line, 3);
                assert!(message.contains("retrun"));
                assert_eq!(line, "retrun: @p.NonNull");
            }
            other => panic!("unexpected diagnostic {other:?}"),
        }
    }
}
