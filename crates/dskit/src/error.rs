use crate::{backend::BackendError, config::ConfigError};
use derive_more::Display;
use dskit_core::{
    codec::DecodeError,
    error::{Error as CoreError, ErrorClass, MultiError},
    key::KeyError,
};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }

    /// Class of the caller fault, when this error is one.
    #[must_use]
    pub const fn class(&self) -> Option<ErrorClass> {
        match self.kind {
            ErrorKind::Invalid(class) => Some(class),
            _ => None,
        }
    }
}

impl From<CoreError> for Error {
    fn from(err: CoreError) -> Self {
        let origin = match &err {
            CoreError::Key(_) | CoreError::Persist(_) => ErrorOrigin::Key,
            CoreError::Decode(_) | CoreError::Cursor(_) => ErrorOrigin::Codec,
            CoreError::Query(_) | CoreError::Range(_) | CoreError::Value(_) => ErrorOrigin::Query,
        };

        Self::new(ErrorKind::Invalid(err.class()), origin, err.to_string())
    }
}

// Kind and origin follow the first recorded fault; the message lists all.
impl From<MultiError> for Error {
    fn from(errors: MultiError) -> Self {
        match errors.iter().next() {
            Some(first) => {
                let Self { kind, origin, .. } = first.clone().into();
                Self::new(kind, origin, errors.to_string())
            }
            None => Self::new(ErrorKind::Internal, ErrorOrigin::Client, errors.to_string()),
        }
    }
}

impl From<KeyError> for Error {
    fn from(err: KeyError) -> Self {
        CoreError::from(err).into()
    }
}

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        CoreError::from(err).into()
    }
}

impl From<BackendError> for Error {
    fn from(err: BackendError) -> Self {
        Self::new(ErrorKind::Backend, ErrorOrigin::Backend, err.to_string())
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorKind::Config, ErrorOrigin::Config, err.to_string())
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// Caller input failed validation or conversion.
    Invalid(ErrorClass),

    /// Client configuration is unusable.
    Config,

    /// The backend failed or refused the request.
    Backend,

    /// The caller cannot remediate this.
    Internal,
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum ErrorOrigin {
    Backend,
    Client,
    Codec,
    Config,
    Key,
    Query,
}
