//! Core runtime for dskit: hierarchical keys, the wire codec that keeps
//! encoded keys compatible with other runtimes, and immutable query
//! descriptors lowered into wire query requests.
#![warn(unreachable_pub)]

pub mod codec;
pub mod error;
pub mod key;
pub mod query;
pub mod value;
pub mod wire;

///
/// CONSTANTS
///

/// Maximum accepted length of an encoded key or cursor token.
///
/// Decoding treats its input as untrusted; anything longer is rejected
/// before base64 or protobuf decoding runs.
pub const MAX_ENCODED_TOKEN_LEN: usize = 8 * 1024;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, codecs, or serializers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        key::{Context, Key},
        query::{Cursor, Direction, Filter, Operator, Order, Query, QueryOptions},
        value::Value,
    };
}
