use crate::key::Key;
use serde::{Deserialize, Serialize};
use std::panic::{AssertUnwindSafe, catch_unwind};
use thiserror::Error as ThisError;

/// Largest persisted key record accepted by [`PersistedKey::from_bytes`].
pub const MAX_PERSISTED_KEY_BYTES: usize = 64 * 1024;

///
/// PersistError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum PersistError {
    #[error("cannot encode persisted key: {0}")]
    Encode(String),

    #[error("cannot decode persisted key: {0}")]
    Decode(String),

    #[error("persisted key record too large: {len} bytes (max {max})")]
    TooLarge { len: usize, max: usize },
}

///
/// PersistedKey
///
/// Tagged recursive record for keys embedded in durable storage.
/// Independent of the wire reference message, so stored keys survive
/// protocol changes. Field names are part of the stored format.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PersistedKey {
    pub kind: String,
    pub string_id: String,
    pub int_id: i64,
    #[serde(default)]
    pub parent: Option<Box<Self>>,
    pub owner_id: String,
    #[serde(default)]
    pub namespace: String,
}

impl PersistedKey {
    /// CBOR encoding of the record, parents nested inline.
    pub fn to_bytes(&self) -> Result<Vec<u8>, PersistError> {
        serde_cbor::to_vec(self).map_err(|err| PersistError::Encode(err.to_string()))
    }

    /// Decode a record written by [`PersistedKey::to_bytes`].
    ///
    /// Stored bytes are untrusted: the size is checked before parsing and a
    /// decoder panic is reported as [`PersistError::Decode`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PersistError> {
        if bytes.len() > MAX_PERSISTED_KEY_BYTES {
            return Err(PersistError::TooLarge {
                len: bytes.len(),
                max: MAX_PERSISTED_KEY_BYTES,
            });
        }

        catch_unwind(AssertUnwindSafe(|| serde_cbor::from_slice::<Self>(bytes)))
            .map_err(|_| PersistError::Decode("decoder panicked".to_string()))?
            .map_err(|err| PersistError::Decode(err.to_string()))
    }
}

impl From<&Key> for PersistedKey {
    fn from(key: &Key) -> Self {
        Self {
            kind: key.kind().to_string(),
            string_id: key.string_id().to_string(),
            int_id: key.int_id(),
            parent: key.parent().map(|parent| Box::new(Self::from(parent))),
            owner_id: key.owner_id().to_string(),
            namespace: key.namespace().to_string(),
        }
    }
}

impl From<PersistedKey> for Key {
    fn from(record: PersistedKey) -> Self {
        Self::from_parts(
            record.owner_id,
            record.namespace,
            record.kind,
            record.string_id,
            record.int_id,
            record.parent.map(|parent| Self::from(*parent)),
        )
    }
}
