use crate::ast::Location;

/// Non-fatal problems found while loading or applying an annotation index.
///
/// None of these stop injection; the affected entry or element is skipped and
/// the host decides whether the collected diagnostics should fail the build.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// Syntax error or undecodable descriptor; the entry was excluded
    #[error("malformed index entry at {location}: {message}\n    {line}")]
    MalformedIndexEntry {
        location: Location,
        message: String,
        line: String,
    },

    /// Annotation type with no source, index or built-in declaration
    #[error("unresolved annotation type '{name}'")]
    UnresolvedAnnotationType { name: String },

    #[error("invalid value for element '{element}' of @{annotation}: {message}")]
    InvalidElementValue {
        annotation: String,
        element: String,
        message: String,
    },
}

impl Diagnostic {
    pub fn unresolved(name: impl Into<String>) -> Self {
        Diagnostic::UnresolvedAnnotationType { name: name.into() }
    }

    pub fn invalid_value(annotation: &str, element: &str, message: impl Into<String>) -> Self {
        Diagnostic::InvalidElementValue {
            annotation: annotation.to_string(),
            element: element.to_string(),
            message: message.into(),
        }
    }

    pub fn is_malformed_entry(&self) -> bool {
        matches!(self, Diagnostic::MalformedIndexEntry { .. })
    }
}
