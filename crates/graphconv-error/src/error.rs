//! The error type shared by every graphconv crate.

use std::fmt;

use crate::ErrorKind;

type Source = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A conversion failure.
///
/// Besides its kind and message, an error records the operation that raised
/// it (`"gexf::import"`), key/value context locating the problem inside the
/// input (`index`, `field`, `format`), and the lower-level error it wraps.
pub struct Error {
    kind: ErrorKind,
    message: String,
    operation: &'static str,
    context: Vec<(&'static str, String)>,
    source: Option<Source>,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            operation: "",
            context: Vec::new(),
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Outermost operation that handled this error; empty if none did.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn context(&self) -> &[(&'static str, String)] {
        &self.context
    }

    /// First context value recorded under `key`.
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn source_ref(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    /// Innermost error of the source chain, `self` if there is none.
    ///
    /// For `MalformedFile` this is the structural problem that was found.
    pub fn root_cause(&self) -> &(dyn std::error::Error + 'static) {
        let mut cause: &(dyn std::error::Error + 'static) = self;
        while let Some(next) = cause.source() {
            cause = next;
        }
        cause
    }

    /// Record the operation handling this error.
    ///
    /// A previously recorded operation moves to the `called` context entry, so
    /// the chain of layers stays visible.
    pub fn with_operation(mut self, operation: &'static str) -> Self {
        if !self.operation.is_empty() && self.operation != operation {
            self.context.push(("called", self.operation.to_string()));
        }
        self.operation = operation;
        self
    }

    pub fn with_context(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.context.push((key, value.into()));
        self
    }

    /// Wrap the lower-level error that caused this one.
    ///
    /// # Panics (debug only)
    /// Panics in debug mode if a source was already set.
    pub fn set_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        debug_assert!(self.source.is_none(), "source error already set");
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.as_str())?;
        if !self.operation.is_empty() {
            write!(f, " in {}", self.operation)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if !self.context.is_empty() {
            let pairs: Vec<String> = self
                .context
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect();
            write!(f, " [{}]", pairs.join(", "))?;
        }
        if let Some(source) = &self.source {
            write!(f, "; caused by {source}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .field("operation", &self.operation)
            .field("context", &self.context)
            .field("source", &self.source)
            .finish()
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            _ => ErrorKind::IoFailed,
        };
        Error::new(kind, err.to_string())
            .with_operation("io")
            .set_source(err)
    }
}

impl Error {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    /// Input text is not well-formed XML or JSON.
    pub fn parse_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ParseFailed, message)
    }

    /// The generic error an XML importer reports when the parsed tree does not
    /// have the structure of `format`. The specific cause goes in the source.
    pub fn malformed_file(format: &'static str) -> Self {
        Self::new(
            ErrorKind::MalformedFile,
            format!("an error occurred while creating the graph, the {format} file is malformed"),
        )
        .with_context("format", format)
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::new(ErrorKind::MissingField, format!("missing required field '{field}'"))
            .with_context("field", field)
    }

    /// `field` is present but is not what was `expected` ("a number").
    pub fn invalid_value(field: impl Into<String>, expected: &str) -> Self {
        let field = field.into();
        Self::new(ErrorKind::InvalidValue, format!("field '{field}' must be {expected}"))
            .with_context("field", field)
    }

    pub fn invalid_color(color: impl Into<String>) -> Self {
        let color = color.into();
        Self::new(ErrorKind::InvalidColor, format!("cannot interpret '{color}' as a color"))
            .with_context("color", color)
    }

    pub fn duplicate_id(id: impl Into<String>) -> Self {
        let id = id.into();
        Self::new(ErrorKind::DuplicateId, format!("id '{id}' is used twice"))
            .with_context("id", id)
    }

    pub fn invalid_schema(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidSchema, message)
    }

    pub fn serialization_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SerializationFailed, message)
    }
}
