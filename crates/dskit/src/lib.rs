//! ## Crate layout
//! - `core`: keys, the wire codec, query descriptors, and the error taxonomy.
//! - `config`: TOML client configuration; also the context keys are built in.
//! - `backend`: the seam to the datastore service that executes queries.
//! - `client`: request assembly, execution, and result decoding.
//!
//! The `prelude` module re-exports the types most callers need.

pub use dskit_core as core;

pub mod backend;
pub mod client;
pub mod config;
pub mod error;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::Error;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        backend::{Backend, BackendError},
        client::{Client, QueryPage},
        config::ClientConfig,
        core::prelude::*,
        error::{Error, ErrorKind, ErrorOrigin},
    };
}
