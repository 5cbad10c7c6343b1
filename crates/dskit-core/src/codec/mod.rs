//! Module: codec
//! Responsibility: key <-> wire reference conversion and the URL-safe text form.
//! Does not own: key validation rules (see `key`) or message shapes (see `wire`).
//! Boundary: encoded keys must stay byte-compatible with other runtimes.

#[cfg(test)]
mod tests;

use crate::{
    MAX_ENCODED_TOKEN_LEN,
    key::{Key, KeyError},
    wire::{Path, PathElement, Reference, ReferenceValue, ReferenceValuePathElement},
};
use base64::{
    Engine as _,
    engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD},
};
use prost::Message;
use thiserror::Error as ThisError;
use tracing::debug;

///
/// DecodeError
/// Failures turning an encoded key back into a [`Key`].
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum DecodeError {
    #[error("encoded key exceeds max length: {len} chars (max {max})")]
    TooLong { len: usize, max: usize },

    #[error("malformed base64 in encoded key: {0}")]
    Base64(String),

    #[error("malformed key reference: {0}")]
    Wire(String),

    #[error("key reference has an empty path")]
    EmptyPath,

    #[error("invalid key in reference: {0}")]
    Key(#[from] KeyError),
}

// ----------------------------------------------------------------------
// Key <-> Reference
// ----------------------------------------------------------------------

/// Convert a key into its wire reference, root element first.
pub fn key_to_reference(key: &Key) -> Result<Reference, KeyError> {
    key.validate()?;

    let mut element = Vec::with_capacity(key.depth());
    push_path(Some(key), &mut element);

    Ok(Reference {
        app: key.owner_id().to_string(),
        path: Path { element },
        name_space: non_empty(key.namespace()),
    })
}

// Recurse to the root first so elements land root-to-leaf.
fn push_path(key: Option<&Key>, out: &mut Vec<PathElement>) {
    let Some(key) = key else {
        return;
    };

    push_path(key.parent(), out);

    let (name, id) = id_fields(key);
    out.push(PathElement {
        r#type: key.kind().to_string(),
        id,
        name,
    });
}

/// Rebuild a key chain from a wire reference.
///
/// Elements are consumed root first; every node is checked as soon as it is
/// linked to its parent, and the first invalid node aborts the rebuild.
pub fn reference_to_key(reference: Reference) -> Result<Key, DecodeError> {
    let Reference {
        app,
        path,
        name_space,
    } = reference;
    let namespace = name_space.unwrap_or_default();
    let levels = path.element.len();

    let mut key: Option<Key> = None;
    for (index, element) in path.element.into_iter().enumerate() {
        let node = Key::from_parts(
            app.as_str(),
            namespace.as_str(),
            element.r#type,
            element.name.unwrap_or_default(),
            element.id.unwrap_or_default(),
            key.take(),
        );
        node.validate_node(levels - 1 - index)?;
        key = Some(node);
    }

    key.ok_or(DecodeError::EmptyPath)
}

/// Convert a key into the group-framed reference carried inside property values.
pub fn key_to_reference_value(key: &Key) -> Result<ReferenceValue, KeyError> {
    let reference = key_to_reference(key)?;

    Ok(ReferenceValue {
        app: reference.app,
        path_element: reference
            .path
            .element
            .into_iter()
            .map(|element| ReferenceValuePathElement {
                r#type: element.r#type,
                id: element.id,
                name: element.name,
            })
            .collect(),
        name_space: reference.name_space,
    })
}

// ----------------------------------------------------------------------
// Text form
// ----------------------------------------------------------------------

/// Serialize a key to its opaque URL-safe text form.
pub fn encode_key(key: &Key) -> Result<String, KeyError> {
    let reference = key_to_reference(key)?;

    Ok(encode_reference(&reference))
}

/// URL-safe base64 of the serialized reference, with `=` padding stripped.
#[must_use]
pub fn encode_reference(reference: &Reference) -> String {
    URL_SAFE_NO_PAD.encode(reference.encode_to_vec())
}

/// Decode the text form produced by [`encode_key`].
pub fn decode_key(encoded: &str) -> Result<Key, DecodeError> {
    let result = decode_reference(encoded).and_then(reference_to_key);
    if let Err(err) = &result {
        debug!(error = %err, len = encoded.len(), "rejected encoded key");
    }

    result
}

/// Decode the text form into a wire reference without rebuilding the key.
pub fn decode_reference(encoded: &str) -> Result<Reference, DecodeError> {
    let bytes = decode_unpadded(encoded)?;

    Reference::decode(bytes.as_slice()).map_err(|err| DecodeError::Wire(err.to_string()))
}

// Restore `=` padding to a multiple of four, then decode strictly.
pub(crate) fn decode_unpadded(encoded: &str) -> Result<Vec<u8>, DecodeError> {
    if encoded.len() > MAX_ENCODED_TOKEN_LEN {
        return Err(DecodeError::TooLong {
            len: encoded.len(),
            max: MAX_ENCODED_TOKEN_LEN,
        });
    }

    let mut padded = String::with_capacity(encoded.len() + 3);
    padded.push_str(encoded);
    let rem = encoded.len() % 4;
    if rem != 0 {
        padded.extend(std::iter::repeat_n('=', 4 - rem));
    }

    URL_SAFE
        .decode(padded)
        .map_err(|err| DecodeError::Base64(err.to_string()))
}

// ----------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------

// A string id wins over an int id; an incomplete key sets neither.
fn id_fields(key: &Key) -> (Option<String>, Option<i64>) {
    if !key.string_id().is_empty() {
        (Some(key.string_id().to_string()), None)
    } else if key.int_id() != 0 {
        (None, Some(key.int_id()))
    } else {
        (None, None)
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
