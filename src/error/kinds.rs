use std::{fmt, io};

/// Crate-wide `Result` type using [`ExportError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Top-level error type for export operations.
///
/// This type wraps more specific error kinds and provides a single
/// error type that can be used throughout the crate.
#[derive(Debug)]
pub enum ExportError {
    /// Failure writing to or flushing the output sink.
    Io(io::Error),

    /// A document could not be converted to Extended JSON.
    Encoding(EncodingError),

    /// Configuration errors.
    Config(ConfigError),

    /// Malformed input documents.
    Input(InputError),

    /// Operation called in the wrong lifecycle state.
    InvalidState(String),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Extended JSON encoding errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// Value nests deeper than the encoder allows.
    NestingTooDeep { depth: usize },

    /// The JSON serializer rejected the value.
    Serialize(String),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Missing required field.
    MissingField(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/// Input document errors.
#[derive(Debug)]
pub enum InputError {
    /// Line is not valid (extended) JSON.
    InvalidJson { line: usize, message: String },

    /// Line parsed but is not a JSON object.
    NotADocument { line: usize },
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "I/O error: {e}"),
            ExportError::Encoding(e) => write!(f, "Encoding error: {e}"),
            ExportError::Config(e) => write!(f, "Configuration error: {e}"),
            ExportError::Input(e) => write!(f, "Input error: {e}"),
            ExportError::InvalidState(msg) => write!(f, "Invalid state: {msg}"),
            ExportError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for EncodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodingError::NestingTooDeep { depth } => {
                write!(f, "value nested deeper than {depth} levels")
            }
            EncodingError::Serialize(msg) => {
                write!(f, "error converting BSON to extended JSON: {msg}")
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::MissingField(field) => write!(f, "Missing required field: {field}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::InvalidJson { line, message } => {
                write!(f, "line {line}: invalid JSON: {message}")
            }
            InputError::NotADocument { line } => {
                write!(f, "line {line}: expected a JSON object")
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(e) => Some(e),
            ExportError::Encoding(e) => Some(e),
            ExportError::Config(e) => Some(e),
            ExportError::Input(e) => Some(e),
            _ => None,
        }
    }
}
impl std::error::Error for EncodingError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for InputError {}

/* ========================= Conversions to ExportError ========================= */

impl From<io::Error> for ExportError {
    fn from(err: io::Error) -> Self {
        ExportError::Io(err)
    }
}

impl From<EncodingError> for ExportError {
    fn from(err: EncodingError) -> Self {
        ExportError::Encoding(err)
    }
}

impl From<ConfigError> for ExportError {
    fn from(err: ConfigError) -> Self {
        ExportError::Config(err)
    }
}

impl From<InputError> for ExportError {
    fn from(err: InputError) -> Self {
        ExportError::Input(err)
    }
}

impl From<serde_json::Error> for EncodingError {
    fn from(err: serde_json::Error) -> Self {
        EncodingError::Serialize(err.to_string())
    }
}

impl From<String> for ExportError {
    fn from(msg: String) -> Self {
        ExportError::Generic(msg)
    }
}

impl From<&str> for ExportError {
    fn from(msg: &str) -> Self {
        ExportError::Generic(msg.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_messages() {
        let err: ExportError = EncodingError::NestingTooDeep { depth: 100 }.into();
        assert_eq!(
            err.to_string(),
            "Encoding error: value nested deeper than 100 levels"
        );

        let err: ExportError = ConfigError::MissingField("fields".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing required field: fields"
        );

        let err: ExportError = InputError::NotADocument { line: 3 }.into();
        assert_eq!(err.to_string(), "Input error: line 3: expected a JSON object");
    }

    #[test]
    fn test_io_error_source() {
        let err: ExportError = io::Error::new(io::ErrorKind::BrokenPipe, "closed").into();
        assert!(matches!(err, ExportError::Io(_)));
        assert!(err.source().is_some());
    }
}
