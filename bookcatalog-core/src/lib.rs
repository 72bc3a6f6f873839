//! A thin, typed query and aggregation layer over a book catalog hosted by a document-store engine.
//!
//! This crate is the core of the bookcatalog project and provides:
//!
//! - **Record types** ([`book`]) - The catalog's record shapes and their serialization seam
//! - **Engine abstraction** ([`backend`]) - Traits for implementing different storage engines
//! - **Query API** ([`query`]) - Type-safe filter, projection, sort and pagination construction
//! - **Aggregation pipelines** ([`pipeline`]) - Composable, strongly-typed stage descriptors
//! - **Index management** ([`index`]) - Ordered compound index specifications
//! - **Catalog façade** ([`catalog`]) - The operations issued against the books collection
//! - **Error handling** ([`error`]) - Error and result types
//!
//! # Example
//!
//! ```ignore
//! use bookcatalog::{prelude::*, memory::MemoryEngine};
//!
//! let catalog = BookCatalog::new(MemoryEngine::new());
//!
//! let recent = catalog.published_after(1950).await?;
//! let modified = catalog.set_price("The Hobbit", 16.99).await?;
//! ```
//!
//! The layer performs no validation, retry, or recovery of its own: every
//! operation is a single round-trip translated into the engine's native
//! query representation, and engine-side failures propagate verbatim.

#[allow(unused_extern_crates)]
extern crate self as bookcatalog_core;

pub mod backend;
pub mod book;
pub mod catalog;
pub mod error;
pub mod index;
pub mod page;
pub mod pipeline;
pub mod query;
