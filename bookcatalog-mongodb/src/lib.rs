//! MongoDB engine for the bookcatalog layer.
//!
//! This crate implements the `CatalogBackend` trait on top of the MongoDB
//! async driver, translating the catalog's typed filters, queries and
//! pipeline stages into MongoDB's native representation.
//!
//! To use this engine, enable the `mongodb` feature on the umbrella crate:
//!
//! ```toml
//! [dependencies]
//! bookcatalog = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Features
//!
//! - **Full query support** - Filtering, projection, sorting and pagination via `find`
//! - **Aggregation** - Typed stage descriptors translated to aggregation documents
//! - **Indexing** - Compound ordered indexes via `createIndexes`
//! - **Explain** - Execution statistics via `runCommand`, returned verbatim
//!
//! # Connection
//!
//! The engine needs a MongoDB connection string and a database name,
//! provided through the builder:
//!
//! ```ignore
//! use bookcatalog::{backend::CatalogBackendBuilder, mongodb::MongoDbEngine};
//!
//! let engine = MongoDbEngine::builder("mongodb://localhost:27017", "plp_bookstore")
//!     .build()
//!     .await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as bookcatalog_mongodb;

pub mod pipeline;
pub mod query;
pub mod store;

pub use store::{MongoDbEngine, MongoDbEngineBuilder};
