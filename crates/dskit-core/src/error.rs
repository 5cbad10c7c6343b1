
use crate::{
    codec::DecodeError,
    key::{KeyError, PersistError},
    query::{CursorDecodeError, QueryError, RangeError},
    value::ValueError,
};
use derive_more::Display;
use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// One fault found while validating or converting a key, query, or option set.
/// Composite conversions collect these into a [`MultiError`].
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum Error {
    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Cursor(#[from] CursorDecodeError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Range(#[from] RangeError),

    #[error(transparent)]
    Value(#[from] ValueError),

    #[error(transparent)]
    Persist(#[from] PersistError),
}

impl Error {
    /// Stable classification for this error.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Key(_) => ErrorClass::StructuralKey,
            Self::Decode(_) | Self::Cursor(_) => ErrorClass::Decode,
            Self::Query(_) => ErrorClass::QueryShape,
            Self::Range(_) => ErrorClass::Range,
            Self::Value(_) => ErrorClass::ValueConversion,
            Self::Persist(_) => ErrorClass::Persist,
        }
    }
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum ErrorClass {
    #[display("structural_key")]
    StructuralKey,

    #[display("decode")]
    Decode,

    #[display("query_shape")]
    QueryShape,

    #[display("range")]
    Range,

    #[display("value_conversion")]
    ValueConversion,

    #[display("persist")]
    Persist,
}

///
/// MultiError
///
/// Accumulates every fault found during one conversion pass.
///
/// Slots are positional: batch callers reserve one slot per input with
/// [`MultiError::with_slots`] and leave valid inputs empty. Sequential
/// callers just [`push`](MultiError::push). An accumulator with no filled
/// slot is "no error" and [`into_result`](MultiError::into_result) yields `Ok`.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MultiError {
    slots: Vec<Option<Error>>,
}

impl MultiError {
    #[must_use]
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Accumulator with `len` empty positional slots.
    #[must_use]
    pub fn with_slots(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    pub fn push(&mut self, err: impl Into<Error>) {
        self.slots.push(Some(err.into()));
    }

    /// Fill the slot at `index`, growing the accumulator if needed.
    pub fn set(&mut self, index: usize, err: impl Into<Error>) {
        if index >= self.slots.len() {
            self.slots.resize(index + 1, None);
        }
        self.slots[index] = Some(err.into());
    }

    /// Error recorded at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Error> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Append every filled slot of `other`.
    pub fn extend(&mut self, other: Self) {
        self.slots.extend(other.slots.into_iter().filter(Option::is_some));
    }

    /// Number of positional slots, filled or not.
    #[must_use]
    pub const fn slots(&self) -> usize {
        self.slots.len()
    }

    /// Number of recorded errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Error> {
        self.slots.iter().flatten()
    }

    /// `Ok(value)` when nothing was recorded, otherwise the accumulator itself.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl From<Error> for MultiError {
    fn from(err: Error) -> Self {
        Self {
            slots: vec![Some(err)],
        }
    }
}

impl fmt::Display for MultiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut errors = self.iter();

        match (errors.next(), self.len()) {
            (None, _) => f.write_str("no errors"),
            (Some(only), 1) => write!(f, "{only}"),
            (Some(first), count) => {
                write!(f, "{count} errors: {first}")?;
                for err in errors {
                    write!(f, "; {err}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for MultiError {}

impl IntoIterator for MultiError {
    type Item = Error;
    type IntoIter = std::iter::Flatten<std::vec::IntoIter<Option<Error>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.into_iter().flatten()
    }
}
