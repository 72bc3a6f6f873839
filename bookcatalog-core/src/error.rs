//! Error types and result types for catalog operations.
//!
//! Use [`CatalogResult<T>`] as the return type for fallible operations.
//! Engine-side failures are not interpreted by this layer; they arrive
//! wrapped in [`CatalogError::Backend`] with the engine's message intact.

use bson::error::Error as BsonError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when interacting with the catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Serialization/deserialization error when converting between record formats (BSON, JSON).
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Error during engine initialization or connection setup.
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// A value retrieved from or handed to the engine does not have the expected structure.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    /// An error reported by the underlying document-store engine, propagated verbatim.
    #[error("Engine error: {0}")]
    Backend(String),
}

/// A specialized `Result` type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<BsonError> for CatalogError {
    fn from(err: BsonError) -> Self {
        CatalogError::Serialization(err.to_string())
    }
}

impl From<SerdeJsonError> for CatalogError {
    fn from(err: SerdeJsonError) -> Self {
        CatalogError::Serialization(err.to_string())
    }
}
