mod persist;
#[cfg(test)]
mod tests;

pub use persist::{MAX_PERSISTED_KEY_BYTES, PersistError, PersistedKey};

use crate::{
    codec::{self, DecodeError},
    error::MultiError,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::{fmt, iter, sync::Arc};
use thiserror::Error as ThisError;

/// Longest namespace accepted by [`is_valid_namespace`].
pub const MAX_NAMESPACE_LEN: usize = 100;

///
/// Context
///
/// Execution context that scopes newly constructed keys.
/// Supplies the owning realm and the default namespace.
///

pub trait Context {
    /// Fully qualified identifier of the owning application realm.
    fn owner_id(&self) -> &str;

    /// Namespace used when neither the caller nor a parent key names one.
    fn namespace(&self) -> &str {
        ""
    }
}

///
/// KeyError
///
/// Structural fault in a key chain. `depth` counts from the leaf (0)
/// towards the root, so callers can tell which ancestor level failed.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum KeyError {
    #[error("key at depth {depth} has an empty kind")]
    EmptyKind { depth: usize },

    #[error("key at depth {depth} ({kind}) has an empty owner id")]
    EmptyOwner { depth: usize, kind: String },

    #[error("key at depth {depth} ({kind}) sets both a string id and an int id")]
    ConflictingIds { depth: usize, kind: String },

    #[error("key at depth {depth} ({kind}) has an incomplete parent")]
    IncompleteParent { depth: usize, kind: String },

    #[error("key at depth {depth} ({kind}) has a different owner id than its parent")]
    OwnerMismatch { depth: usize, kind: String },

    #[error("key at depth {depth} ({kind}) has a different namespace than its parent")]
    NamespaceMismatch { depth: usize, kind: String },
}

///
/// Key
///
/// Immutable hierarchical identifier for a stored entity.
///
/// A key is one node of an ancestor chain: a kind, at most one of a string
/// or integer id, and an optional parent. Construction never validates;
/// structural checks run when the key is converted to its wire form, so
/// intermediate states during incremental building never fail.
///
/// Parents are held behind `Arc`, so cloning a key is cheap and never
/// exposes mutation of a shared chain.
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Key {
    kind: String,
    string_id: String,
    int_id: i64,
    parent: Option<Arc<Self>>,
    owner_id: String,
    namespace: String,
}

impl Key {
    /// Build a key from raw parts without consulting a context.
    #[must_use]
    pub fn from_parts(
        owner_id: impl Into<String>,
        namespace: impl Into<String>,
        kind: impl Into<String>,
        string_id: impl Into<String>,
        int_id: i64,
        parent: Option<Self>,
    ) -> Self {
        Self {
            kind: kind.into(),
            string_id: string_id.into(),
            int_id,
            parent: parent.map(Arc::new),
            owner_id: owner_id.into(),
            namespace: namespace.into(),
        }
    }

    /// Build a key owned by the context's realm.
    ///
    /// Either one or both of `string_id` and `int_id` must be zero; when
    /// both are zero the key is incomplete. The namespace is inherited from
    /// the parent chain, falling back to the context default.
    #[must_use]
    pub fn new<C: Context + ?Sized>(
        ctx: &C,
        kind: impl Into<String>,
        string_id: impl Into<String>,
        int_id: i64,
        parent: Option<Self>,
    ) -> Self {
        Self::new_namespaced(ctx, kind, string_id, int_id, parent, "")
    }

    /// Build an incomplete key, whose id the backend assigns on write.
    #[must_use]
    pub fn new_incomplete<C: Context + ?Sized>(
        ctx: &C,
        kind: impl Into<String>,
        parent: Option<Self>,
    ) -> Self {
        Self::new(ctx, kind, "", 0, parent)
    }

    /// Build a key in an explicit namespace.
    ///
    /// An empty `namespace` takes the nearest ancestor's namespace, then the
    /// context default. A non-empty namespace must match the parent's or
    /// the key fails validation.
    #[must_use]
    pub fn new_namespaced<C: Context + ?Sized>(
        ctx: &C,
        kind: impl Into<String>,
        string_id: impl Into<String>,
        int_id: i64,
        parent: Option<Self>,
        namespace: &str,
    ) -> Self {
        let namespace = if namespace.is_empty() {
            parent
                .iter()
                .flat_map(|parent| parent.ancestors())
                .map(Self::namespace)
                .find(|ns| !ns.is_empty())
                .unwrap_or_else(|| ctx.namespace())
                .to_string()
        } else {
            namespace.to_string()
        };

        Self::from_parts(ctx.owner_id(), namespace, kind, string_id, int_id, parent)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Entity kind (also known as entity type).
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// String id (also known as key name), which may be empty.
    #[must_use]
    pub fn string_id(&self) -> &str {
        &self.string_id
    }

    /// Integer id, which may be zero.
    #[must_use]
    pub const fn int_id(&self) -> i64 {
        self.int_id
    }

    #[must_use]
    pub fn parent(&self) -> Option<&Self> {
        self.parent.as_deref()
    }

    #[must_use]
    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// This key followed by each ancestor, leaf first.
    pub fn ancestors(&self) -> impl Iterator<Item = &Self> {
        iter::successors(Some(self), |key| key.parent())
    }

    /// Furthest ancestor, which may be the key itself.
    #[must_use]
    pub fn root(&self) -> &Self {
        self.ancestors().last().unwrap_or(self)
    }

    /// Number of nodes in the chain, counting this key.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------

    /// True when the key has neither a string id nor an integer id.
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        self.string_id.is_empty() && self.int_id == 0
    }

    /// Predicate form of [`Key::validate`].
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Check every node from the leaf to the root, reporting the first
    /// structural fault with the depth it was found at.
    pub fn validate(&self) -> Result<(), KeyError> {
        for (depth, key) in self.ancestors().enumerate() {
            key.validate_node(depth)?;
        }

        Ok(())
    }

    pub(crate) fn validate_node(&self, depth: usize) -> Result<(), KeyError> {
        let kind = || self.kind.clone();

        if self.kind.is_empty() {
            return Err(KeyError::EmptyKind { depth });
        }
        if self.owner_id.is_empty() {
            return Err(KeyError::EmptyOwner { depth, kind: kind() });
        }
        if !self.string_id.is_empty() && self.int_id != 0 {
            return Err(KeyError::ConflictingIds { depth, kind: kind() });
        }

        if let Some(parent) = self.parent() {
            if parent.is_incomplete() {
                return Err(KeyError::IncompleteParent { depth, kind: kind() });
            }
            if parent.owner_id != self.owner_id {
                return Err(KeyError::OwnerMismatch { depth, kind: kind() });
            }
            if parent.namespace != self.namespace {
                return Err(KeyError::NamespaceMismatch { depth, kind: kind() });
            }
        }

        Ok(())
    }

    // ------------------------------------------------------------------
    // Encoding
    // ------------------------------------------------------------------

    /// Opaque URL-safe representation, compatible with other runtimes
    /// speaking the same backend protocol.
    ///
    /// # Panics
    ///
    /// Panics if the key is structurally invalid. Callers encode keys they
    /// have already validated; use [`Key::try_encode`] otherwise.
    #[must_use]
    pub fn encode(&self) -> String {
        match self.try_encode() {
            Ok(encoded) => encoded,
            Err(err) => panic!("cannot encode invalid key {self}: {err}"),
        }
    }

    /// Recoverable form of [`Key::encode`].
    pub fn try_encode(&self) -> Result<String, KeyError> {
        codec::encode_key(self)
    }

    /// Decode the representation produced by [`Key::encode`].
    pub fn decode(encoded: &str) -> Result<Self, DecodeError> {
        codec::decode_key(encoded)
    }

    // ------------------------------------------------------------------
    // Persisted form
    // ------------------------------------------------------------------

    /// Portable binary form for keys stored outside the backend protocol.
    pub fn to_persisted(&self) -> Result<Vec<u8>, PersistError> {
        PersistedKey::from(self).to_bytes()
    }

    /// Restore a key written by [`Key::to_persisted`].
    ///
    /// Persisted keys are restored as written; call [`Key::validate`] if the
    /// source is not trusted.
    pub fn from_persisted(bytes: &[u8]) -> Result<Self, PersistError> {
        PersistedKey::from_bytes(bytes).map(Self::from)
    }

    // write the chain root-first: `namespace/kind,id/kind,id`
    fn write_path(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parent() {
            Some(parent) => parent.write_path(f)?,
            None => f.write_str(&self.namespace)?,
        }

        if self.string_id.is_empty() {
            write!(f, "/{},{}", self.kind, self.int_id)
        } else {
            write!(f, "/{},{}", self.kind, self.string_id)
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_path(f)
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let encoded = self.try_encode().map_err(serde::ser::Error::custom)?;

        serializer.serialize_str(&encoded)
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EncodedKeyVisitor;

        impl de::Visitor<'_> for EncodedKeyVisitor {
            type Value = Key;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an encoded datastore key string")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Key, E> {
                Key::decode(value).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(EncodedKeyVisitor)
    }
}

/// Validate a batch of keys, recording faults positionally.
///
/// The accumulator has one slot per input; slots for valid keys stay empty.
pub fn validate_keys(keys: &[Key]) -> Result<(), MultiError> {
    let mut errors = MultiError::with_slots(keys.len());
    for (index, key) in keys.iter().enumerate() {
        if let Err(err) = key.validate() {
            errors.set(index, err);
        }
    }

    errors.into_result(())
}

/// Whether `namespace` matches `^[0-9A-Za-z._-]{0,100}$`.
#[must_use]
pub fn is_valid_namespace(namespace: &str) -> bool {
    namespace.len() <= MAX_NAMESPACE_LEN
        && namespace
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'))
}
