use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    /// Returns `true` if the error was raised while decoding an encoded term set.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidFormat { .. }
                | ErrorKind::ChecksumMismatch { .. }
                | ErrorKind::TooManyTerms { .. }
                | ErrorKind::DecodeFailed { .. }
        )
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn decode_failed(message: impl Into<String>) -> Error {
        Error(
            ErrorKind::DecodeFailed {
                message: message.into(),
            }
            .into(),
        )
    }

    /// Wraps a doc values read failure.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Error {
        Error(
            ErrorKind::Io {
                context: context.into(),
                source,
            }
            .into(),
        )
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("checksum mismatch for '{element}'")]
    ChecksumMismatch { element: String },

    #[error("invalid storage format for '{element}': {message}")]
    InvalidFormat { element: String, message: String },

    #[error("term set holds {count} terms, above the limit of {limit}")]
    TooManyTerms { count: usize, limit: usize },

    #[error("term set decoding failed earlier: {message}")]
    DecodeFailed { message: String },

    #[error("IO error for '{context}': {source}")]
    Io {
        context: String,
        source: std::io::Error,
    },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::io("", e)
    }
}
