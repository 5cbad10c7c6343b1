use crate::{
    Error,
    backend::Backend,
    config::ClientConfig,
    error::{ErrorKind, ErrorOrigin},
};
use dskit_core::{
    codec::{self, DecodeError},
    error::MultiError,
    key::Key,
    query::{self, Cursor, Query, QueryOptions},
};
use tracing::{debug, warn};

///
/// QueryPage
/// One batch of result keys plus what is needed to fetch the next one.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QueryPage {
    keys: Vec<Key>,
    cursor: Option<Cursor>,
    more_results: bool,
}

impl QueryPage {
    #[must_use]
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    #[must_use]
    pub fn into_keys(self) -> Vec<Key> {
        self.keys
    }

    /// Cursor positioned after the last returned key; only present when
    /// the query ran with `compile` set.
    #[must_use]
    pub const fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    #[must_use]
    pub const fn more_results(&self) -> bool {
        self.more_results
    }
}

///
/// Client
///
/// Runs queries against a [`Backend`] under one [`ClientConfig`].
///

#[derive(Debug)]
pub struct Client<B> {
    config: ClientConfig,
    backend: B,
}

impl<B: Backend> Client<B> {
    pub const fn new(config: ClientConfig, backend: B) -> Self {
        Self { config, backend }
    }

    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    // ------------------------------------------------------------------
    // Keys
    // ------------------------------------------------------------------

    /// Complete key owned by this client's realm.
    #[must_use]
    pub fn key(
        &self,
        kind: impl Into<String>,
        string_id: impl Into<String>,
        int_id: i64,
        parent: Option<Key>,
    ) -> Key {
        Key::new(&self.config, kind, string_id, int_id, parent)
    }

    #[must_use]
    pub fn incomplete_key(&self, kind: impl Into<String>, parent: Option<Key>) -> Key {
        Key::new_incomplete(&self.config, kind, parent)
    }

    /// Decode a key token, bounded by the configured maximum length.
    pub fn decode_key(&self, encoded: &str) -> Result<Key, Error> {
        let max = self.config.max_encoded_key_len();
        if encoded.len() > max {
            return Err(DecodeError::TooLong {
                len: encoded.len(),
                max,
            }
            .into());
        }

        Ok(Key::decode(encoded)?)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Run one batch of `query`.
    ///
    /// Every fault in the query and options is reported before anything is
    /// sent. Result keys are decoded through the wire codec; a key the
    /// backend returns that fails structural checks is an internal error.
    pub fn run(&self, query: &Query, options: &QueryOptions) -> Result<QueryPage, Error> {
        let request = query::build_request(&self.config, query, options).map_err(|errors| {
            warn!(kind = query.kind(), errors = errors.len(), "query rejected: {errors}");
            Error::from(errors)
        })?;

        debug!(
            kind = query.kind(),
            filters = query.filters().len(),
            orders = query.orders().len(),
            limit = ?request.limit,
            "running query"
        );

        let result = self.backend.run_query(&request).map_err(|err| {
            warn!(kind = query.kind(), "backend failed: {err}");
            Error::from(err)
        })?;

        let mut errors = MultiError::with_slots(result.result.len());
        let mut keys = Vec::with_capacity(result.result.len());
        for (i, entity) in result.result.into_iter().enumerate() {
            match codec::reference_to_key(entity.key) {
                Ok(key) => keys.push(key),
                Err(err) => errors.set(i, err),
            }
        }

        if !errors.is_empty() {
            warn!(kind = query.kind(), errors = errors.len(), "undecodable result keys");
            return Err(Error::new(
                ErrorKind::Internal,
                ErrorOrigin::Backend,
                format!("undecodable result keys: {errors}"),
            ));
        }

        Ok(QueryPage {
            keys,
            cursor: result.compiled_cursor.map(Cursor::from_bytes),
            more_results: result.more_results,
        })
    }
}
