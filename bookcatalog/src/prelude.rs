//! Convenient re-exports of commonly used types from bookcatalog.
//!
//! Import this prelude module to quickly access the most frequently used
//! types and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use bookcatalog::prelude::*;
//! ```

pub use bookcatalog_core::{
    backend::{CatalogBackend, CatalogBackendBuilder},
    book::{Book, BookSummary, Record, RecordExt},
    catalog::BookCatalog,
    error::{CatalogError, CatalogResult},
    index::IndexSpec,
    page::PageRequest,
    pipeline::{Accumulator, Pipeline, PipelineBuilder, Stage, ValueExpr},
    query::{Expr, FieldOp, Filter, Query, QueryBuilder, QueryVisitor, Sort, SortDirection},
};
