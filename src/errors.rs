//! Error types for the resource pool

use thiserror::Error;

/// Boxed error type carried by the `create`/`destroy` callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum PoolError {
    #[error("invalid pool configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("resource factory failed: {0}")]
    Factory(#[source] BoxError),

    #[error("pool is closed")]
    Closed,

    #[error("resource destructor failed: {0}")]
    Destroy(#[source] BoxError),
}

pub type PoolResult<T> = Result<T, PoolError>;
