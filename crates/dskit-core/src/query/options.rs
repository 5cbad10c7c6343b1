use crate::{error::MultiError, query::Cursor, wire};
use thiserror::Error as ThisError;

///
/// RangeError
/// Pagination values that do not fit a non-negative `i32`.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum RangeError {
    #[error("negative value for {field}: {value}")]
    Negative { field: &'static str, value: i64 },

    #[error("value overflow for {field}: {value}")]
    Overflow { field: &'static str, value: i64 },
}

/// Check that `value` is representable as a non-negative `i32`.
/// Out-of-range values are rejected, never clamped.
pub fn valid_range(value: i64, field: &'static str) -> Result<i32, RangeError> {
    if value < 0 {
        return Err(RangeError::Negative { field, value });
    }

    i32::try_from(value).map_err(|_| RangeError::Overflow { field, value })
}

///
/// QueryOptions
///
/// Immutable pagination and result-shape controls for running a query.
/// Builders return new values; validation happens on lowering.
///
/// A zero limit is passed to the backend as-is.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct QueryOptions {
    limit: i64,
    offset: i64,
    keys_only: bool,
    compile: bool,
    start_cursor: Option<Cursor>,
    end_cursor: Option<Cursor>,
}

impl QueryOptions {
    #[must_use]
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit,
            offset,
            ..Self::default()
        }
    }

    // ------------------------------------------------------------------
    // Builders
    // ------------------------------------------------------------------

    /// Maximum number of results to return. Negative values are invalid.
    #[must_use]
    pub fn with_limit(&self, limit: i64) -> Self {
        Self {
            limit,
            ..self.clone()
        }
    }

    /// Number of results to skip. Negative values are invalid.
    #[must_use]
    pub fn with_offset(&self, offset: i64) -> Self {
        Self {
            offset,
            ..self.clone()
        }
    }

    /// Return keys instead of keys and entities.
    #[must_use]
    pub fn with_keys_only(&self, keys_only: bool) -> Self {
        Self {
            keys_only,
            ..self.clone()
        }
    }

    /// Ask the backend to produce cursors.
    #[must_use]
    pub fn with_compile(&self, compile: bool) -> Self {
        Self {
            compile,
            ..self.clone()
        }
    }

    /// Resume from `cursor`.
    #[must_use]
    pub fn with_start_cursor(&self, cursor: Cursor) -> Self {
        Self {
            start_cursor: Some(cursor),
            ..self.clone()
        }
    }

    /// Stop at `cursor`.
    #[must_use]
    pub fn with_end_cursor(&self, cursor: Cursor) -> Self {
        Self {
            end_cursor: Some(cursor),
            ..self.clone()
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.limit
    }

    #[must_use]
    pub const fn offset(&self) -> i64 {
        self.offset
    }

    #[must_use]
    pub const fn keys_only(&self) -> bool {
        self.keys_only
    }

    #[must_use]
    pub const fn compile(&self) -> bool {
        self.compile
    }

    #[must_use]
    pub const fn start_cursor(&self) -> Option<&Cursor> {
        self.start_cursor.as_ref()
    }

    #[must_use]
    pub const fn end_cursor(&self) -> Option<&Cursor> {
        self.end_cursor.as_ref()
    }

    // ------------------------------------------------------------------
    // Lowering
    // ------------------------------------------------------------------

    /// Lower into wire options; succeeds only if every field is valid.
    pub fn to_wire(&self) -> Result<WireOptions, MultiError> {
        let (options, errors) = self.lower();

        errors.into_result(options)
    }

    /// Write the valid fields into `dst`, leaving invalid ones unset, and
    /// report every invalid field.
    pub fn apply_to(&self, dst: &mut wire::Query) -> Result<(), MultiError> {
        let (options, errors) = self.lower();
        options.apply_to(dst);

        errors.into_result(())
    }

    fn lower(&self) -> (WireOptions, MultiError) {
        let mut errors = MultiError::new();

        let limit = checked_range(self.limit, "limit", &mut errors);
        let offset = checked_range(self.offset, "offset", &mut errors);

        let options = WireOptions {
            limit,
            offset,
            keys_only: self.keys_only,
            compile: self.compile,
            compiled_cursor: self.start_cursor.as_ref().map(|c| c.as_bytes().to_vec()),
            end_compiled_cursor: self.end_cursor.as_ref().map(|c| c.as_bytes().to_vec()),
        };

        (options, errors)
    }
}

// Invalid values are recorded and left out of the wire form.
fn checked_range(value: i64, field: &'static str, errors: &mut MultiError) -> Option<i32> {
    match valid_range(value, field) {
        Ok(value) => Some(value),
        Err(err) => {
            errors.push(err);
            None
        }
    }
}

///
/// WireOptions
/// Validated pagination fields, ready to merge into a wire query.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct WireOptions {
    pub limit: Option<i32>,
    pub offset: Option<i32>,
    pub keys_only: bool,
    pub compile: bool,
    pub compiled_cursor: Option<Vec<u8>>,
    pub end_compiled_cursor: Option<Vec<u8>>,
}

impl WireOptions {
    /// Merge into `dst`; flags are always written, the rest only when set.
    pub fn apply_to(self, dst: &mut wire::Query) {
        dst.limit = self.limit;
        dst.offset = self.offset;
        dst.keys_only = Some(self.keys_only);
        dst.compile = Some(self.compile);
        dst.compiled_cursor = self.compiled_cursor;
        dst.end_compiled_cursor = self.end_compiled_cursor;
    }
}
