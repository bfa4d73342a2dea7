//! What went wrong.

use strum_macros::{Display, IntoStaticStr};

/// The kind of error that occurred.
///
/// Callers match on `ErrorKind` to tell a broken input file apart from an
/// inconsistent in-memory document or a failed write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, Display)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Bad command-line usage, such as a format that cannot be guessed
    InvalidArgument,

    // =========================================================================
    // Import errors
    // =========================================================================
    /// Input text is not syntactically valid (XML or JSON)
    ParseFailed,

    /// Input parsed but does not have the structure of the declared format
    MalformedFile,

    /// A required field is absent
    MissingField,

    /// A field is present but its value has the wrong type or range
    InvalidValue,

    /// A color string could not be interpreted
    InvalidColor,

    // =========================================================================
    // Document errors
    // =========================================================================
    /// Two elements in the same collection share an id
    DuplicateId,

    /// Attribute schema is inconsistent (duplicate or reserved attribute ids)
    InvalidSchema,

    /// Rendering a document to text failed
    SerializationFailed,

    // =========================================================================
    // File errors
    // =========================================================================
    FileNotFound,
    PermissionDenied,
    IoFailed,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }

    /// True for errors caused by the input data rather than the caller.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ErrorKind::ParseFailed
                | ErrorKind::MalformedFile
                | ErrorKind::MissingField
                | ErrorKind::InvalidValue
                | ErrorKind::InvalidColor
                | ErrorKind::DuplicateId
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(ErrorKind::ParseFailed.to_string(), "ParseFailed");
        assert_eq!(ErrorKind::InvalidSchema.as_str(), "InvalidSchema");
    }

    #[test]
    fn test_is_input_error() {
        assert!(ErrorKind::MalformedFile.is_input_error());
        assert!(ErrorKind::InvalidColor.is_input_error());
        assert!(!ErrorKind::InvalidSchema.is_input_error());
        assert!(!ErrorKind::IoFailed.is_input_error());
    }
}
