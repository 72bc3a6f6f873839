//! In-memory engine for the bookcatalog layer.
//!
//! This crate provides a thread-safe, in-memory implementation of the
//! `CatalogBackend` trait. It keeps collections as insertion-ordered
//! vectors of BSON documents behind async-aware read-write locks and is
//! intended for development and testing.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using async-aware RwLock
//! - **Full query support** - Filtering, projection, sorting and pagination
//! - **Aggregation** - Executes the catalog's typed pipeline stages directly
//! - **Index registry** - Tracks requested indexes so re-creation is a no-op
//!
//! # Quick Start
//!
//! ```ignore
//! use bookcatalog::{prelude::*, memory::MemoryEngine};
//!
//! #[tokio::main]
//! async fn main() -> CatalogResult<()> {
//!     let catalog = BookCatalog::new(MemoryEngine::new());
//!
//!     catalog.add_books(vec![/* ... */]).await?;
//!     let fiction = catalog.in_genre("Fiction").await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as bookcatalog_memory;

pub mod aggregate;
pub mod evaluator;
pub mod store;

pub use store::{MemoryEngine, MemoryEngineBuilder};
