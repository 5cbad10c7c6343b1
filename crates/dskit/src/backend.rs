use dskit_core::wire;
use thiserror::Error as ThisError;

///
/// BackendError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum BackendError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("backend rejected request: {0}")]
    Rejected(String),
}

///
/// Backend
///
/// The datastore service that executes wire queries. This crate only
/// assembles requests and decodes responses; transport and auth belong to
/// the implementor.
///

pub trait Backend {
    fn run_query(&self, request: &wire::Query) -> Result<wire::QueryResult, BackendError>;
}

impl<B: Backend + ?Sized> Backend for &B {
    fn run_query(&self, request: &wire::Query) -> Result<wire::QueryResult, BackendError> {
        (**self).run_query(request)
    }
}
