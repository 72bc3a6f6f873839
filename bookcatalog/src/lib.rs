//! Main bookcatalog crate providing a typed data-access layer over a
//! books collection.
//!
//! This crate is the primary entry point for users of the bookcatalog
//! layer. It re-exports the core types and provides convenient access to
//! the available storage engines.
//!
//! # Features
//!
//! - **Typed records** - A structured `Book` record instead of open-ended dynamic maps
//! - **Multiple engines** - In-memory and MongoDB engines behind one trait
//! - **Composable queries** - Filter, projection, sort and pagination builders
//! - **Typed aggregation** - Pipeline stages as composable descriptors
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
//!     catalog
//!         .add_books(vec![Book {
//!             title: "The Hobbit".into(),
//!             author: "J.R.R. Tolkien".into(),
//!             genre: "Fantasy".into(),
//!             published_year: 1937,
//!             price: 14.50,
//!             in_stock: true,
//!         }])
//!         .await?;
//!
//!     // filtering
//!     let fantasy = catalog.in_genre("Fantasy").await?;
//!     assert_eq!(fantasy.len(), 1);
//!
//!     // single-document write addressed by title; the returned count
//!     // is the only signal for a zero-match no-op
//!     let modified = catalog.set_price("The Hobbit", 16.99).await?;
//!     assert_eq!(modified, 1);
//!
//!     // aggregation
//!     let per_genre = catalog.average_price_by_genre().await?;
//!     println!("{per_genre:?}");
//!
//!     catalog.shutdown().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # MongoDB
//!
//! The MongoDB engine is gated behind the `mongodb` feature:
//!
//! ```ignore
//! use bookcatalog::{backend::CatalogBackendBuilder, catalog::BookCatalog, mongodb::MongoDbEngine};
//!
//! let engine = MongoDbEngine::builder("mongodb://localhost:27017", "plp_bookstore")
//!     .build()
//!     .await?;
//! let catalog = BookCatalog::new(engine);
//! ```
//!
//! # Engines
//!
//! - [`memory`] - Fast in-memory engine for development and testing
//! - [`mongodb`] - Persistent MongoDB engine (requires the `mongodb` feature)

pub mod prelude;

pub use bookcatalog_core::{backend, book, catalog, error, index, page, pipeline, query};

// Re-export BSON types for convenience
pub use bson;

/// In-memory engine implementations.
pub mod memory {
    pub use bookcatalog_memory::{MemoryEngine, MemoryEngineBuilder};
}

/// MongoDB engine implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use bookcatalog_mongodb::{MongoDbEngine, MongoDbEngineBuilder};
}
