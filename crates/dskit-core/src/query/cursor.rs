//! Opaque continuation cursors.
//!
//! Cursors are backend-issued tokens; this layer only carries them and
//! gives them a URL-safe text form. Their contents are never interpreted.

use crate::{MAX_ENCODED_TOKEN_LEN, codec};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use derive_more::Deref;
use std::fmt;

///
/// CursorDecodeError
///

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum CursorDecodeError {
    #[error("cursor token is empty")]
    Empty,

    #[error("cursor token exceeds max length: {len} chars (max {max})")]
    TooLong { len: usize, max: usize },

    #[error("malformed cursor token: {0}")]
    Malformed(String),
}

///
/// Cursor
///

#[derive(Clone, Debug, Deref, Eq, Hash, PartialEq)]
pub struct Cursor(Vec<u8>);

impl Cursor {
    #[must_use]
    pub const fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// URL-safe base64 token without padding.
    #[must_use]
    pub fn encode(&self) -> String {
        URL_SAFE_NO_PAD.encode(&self.0)
    }

    /// Decode a token produced by [`Cursor::encode`].
    ///
    /// The token may include surrounding whitespace, which is trimmed.
    pub fn decode(token: &str) -> Result<Self, CursorDecodeError> {
        let token = token.trim();

        if token.is_empty() {
            return Err(CursorDecodeError::Empty);
        }

        if token.len() > MAX_ENCODED_TOKEN_LEN {
            return Err(CursorDecodeError::TooLong {
                len: token.len(),
                max: MAX_ENCODED_TOKEN_LEN,
            });
        }

        codec::decode_unpadded(token)
            .map(Self)
            .map_err(|err| CursorDecodeError::Malformed(err.to_string()))
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl From<Vec<u8>> for Cursor {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}
