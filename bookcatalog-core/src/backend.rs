//! Engine abstraction for the catalog.
//!
//! This module defines the trait that abstracts over document-store
//! engines, allowing the catalog façade to work against different
//! implementations (in-memory, MongoDB, ...).
//!
//! # Overview
//!
//! [`CatalogBackend`] provides a unified async interface for the
//! operations the catalog issues: inserting documents, running structured
//! queries, filter-addressed single-document writes, aggregation
//! pipelines, index creation, and the engine's explain facility.
//! Implementations are required to be thread-safe (`Send + Sync`).
//!
//! # Error Handling
//!
//! Operations return [`CatalogResult<T>`](crate::error::CatalogResult).
//! Engines perform no interpretation of their own failures; messages are
//! wrapped into [`CatalogError::Backend`](crate::error::CatalogError)
//! verbatim.

use async_trait::async_trait;
use bson::Bson;
use std::fmt::Debug;

use crate::{error::CatalogResult, index::IndexSpec, pipeline::Pipeline, query::{Expr, Query}};

/// Abstract interface for document-store engines.
///
/// Every method is a single round-trip; engines implement no local
/// retry, caching, or cross-operation atomicity. Single-document writes
/// are atomic only to the extent the engine guarantees per-document
/// atomicity.
#[async_trait]
pub trait CatalogBackend: Send + Sync + Debug {
    /// Inserts new documents into a collection.
    ///
    /// The collection is created automatically if it doesn't exist. Any
    /// record identity (such as an engine-side id) is assigned and owned
    /// by the engine.
    ///
    /// # Arguments
    ///
    /// * `documents` - BSON documents to insert
    /// * `collection` - The name of the collection to insert into
    async fn insert_documents(
        &self,
        documents: Vec<Bson>,
        collection: &str,
    ) -> CatalogResult<()>;

    /// Queries documents in a collection using a structured query.
    ///
    /// Applies the query's filter, sort, skip/limit window and projection
    /// and returns the matching documents. Engine-side record ids are
    /// never part of the result.
    ///
    /// # Arguments
    ///
    /// * `query` - The [`Query`] specifying filter, projection, sort, offset and limit
    /// * `collection` - The name of the collection to query
    async fn query_documents(&self, query: Query, collection: &str) -> CatalogResult<Vec<Bson>>;

    /// Sets fields on the first document matching a filter.
    ///
    /// Returns the engine's modification count (0 or 1). A filter
    /// matching zero documents is a no-op, not an error; callers inspect
    /// the count to detect it.
    ///
    /// # Arguments
    ///
    /// * `filter` - The filter locating the document
    /// * `changes` - `(field, value)` pairs to set on the document
    /// * `collection` - The name of the collection
    async fn update_first(
        &self,
        filter: Expr,
        changes: Vec<(String, Bson)>,
        collection: &str,
    ) -> CatalogResult<u64>;

    /// Removes the first document matching a filter.
    ///
    /// Returns the engine's deletion count (0 or 1). A filter matching
    /// zero documents is a no-op, not an error.
    async fn delete_first(&self, filter: Expr, collection: &str) -> CatalogResult<u64>;

    /// Runs an aggregation pipeline over a collection.
    ///
    /// Returns the pipeline's output documents. Group stages expose their
    /// key under `_id`, which is part of the result rows by design.
    async fn aggregate(&self, pipeline: Pipeline, collection: &str) -> CatalogResult<Vec<Bson>>;

    /// Requests that the engine maintain the given index.
    ///
    /// Idempotent: requesting an index that already exists is a no-op.
    async fn ensure_index(&self, index: IndexSpec, collection: &str) -> CatalogResult<()>;

    /// Passes a filter through to the engine's explain facility.
    ///
    /// Returns the engine-reported execution statistics verbatim. Purely
    /// observational; no documents are touched.
    async fn explain(&self, filter: Option<Expr>, collection: &str) -> CatalogResult<Bson>;

    /// Cleanly shuts down the engine, releasing its resources.
    ///
    /// The default implementation is a no-op; engines holding connections
    /// should override this.
    async fn shutdown(self) -> CatalogResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// Factory trait for constructing engine instances.
#[async_trait]
pub trait CatalogBackendBuilder {
    type Backend: CatalogBackend;

    async fn build(self) -> CatalogResult<Self::Backend>;
}
