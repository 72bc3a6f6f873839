//! The catalog façade: typed operations over the books collection.
//!
//! [`BookCatalog`] owns an engine and translates each operation into a
//! single structured query, filter-addressed write, aggregation pipeline,
//! or index request against the `books` collection. There is no local
//! state, locking, or caching; every call is one round-trip.

use bson::{Bson, Document, de::deserialize_from_bson};
use std::collections::HashMap;

use crate::{
    backend::CatalogBackend,
    book::{Book, BookSummary, Record, RecordExt},
    error::{CatalogError, CatalogResult},
    index::IndexSpec,
    page::PageRequest,
    pipeline::{Accumulator, Pipeline, ValueExpr},
    query::{Expr, Filter, Query, SortDirection},
};

/// Typed access to the books collection, bound to an engine implementation.
///
/// # Example
///
/// ```ignore
/// use bookcatalog::{prelude::*, memory::MemoryEngine};
///
/// let catalog = BookCatalog::new(MemoryEngine::new());
/// let orwell = catalog.by_author("George Orwell").await?;
/// ```
#[derive(Debug)]
pub struct BookCatalog<B: CatalogBackend> {
    backend: B,
}

impl<B: CatalogBackend> BookCatalog<B> {
    /// Creates a new catalog over the given engine.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Returns a reference to the underlying engine.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Inserts books into the collection.
    pub async fn add_books(&self, books: Vec<Book>) -> CatalogResult<()> {
        self.backend
            .insert_documents(
                books
                    .iter()
                    .map(|book| book.to_bson())
                    .collect::<CatalogResult<Vec<_>>>()?,
                Book::collection_name(),
            )
            .await
    }

    /// Runs an arbitrary composed query and decodes the matching books.
    pub async fn find(&self, query: Query) -> CatalogResult<Vec<Book>> {
        self.backend
            .query_documents(query, Book::collection_name())
            .await?
            .into_iter()
            .map(Book::from_bson)
            .collect()
    }

    /// Books whose `genre` exactly matches the given value.
    pub async fn in_genre(&self, genre: &str) -> CatalogResult<Vec<Book>> {
        self.find(Query::builder().filter(Filter::eq("genre", genre)).build())
            .await
    }

    /// Books published strictly after the given year.
    pub async fn published_after(&self, year: i32) -> CatalogResult<Vec<Book>> {
        self.find(
            Query::builder()
                .filter(Filter::gt("published_year", year))
                .build(),
        )
        .await
    }

    /// Books whose `author` exactly matches the given value.
    pub async fn by_author(&self, author: &str) -> CatalogResult<Vec<Book>> {
        self.find(Query::builder().filter(Filter::eq("author", author)).build())
            .await
    }

    /// Sets the price of the first book with the given title.
    ///
    /// Returns the engine's modification count (0 or 1); a title matching
    /// no book is a no-op reported as 0, not an error.
    pub async fn set_price(&self, title: &str, price: f64) -> CatalogResult<u64> {
        self.backend
            .update_first(
                Filter::eq("title", title),
                vec![("price".to_string(), Bson::Double(price))],
                Book::collection_name(),
            )
            .await
    }

    /// Removes the first book with the given title.
    ///
    /// Returns the engine's deletion count (0 or 1).
    pub async fn remove_by_title(&self, title: &str) -> CatalogResult<u64> {
        self.backend
            .delete_first(Filter::eq("title", title), Book::collection_name())
            .await
    }

    /// Books that are in stock and published strictly after the given year.
    pub async fn in_stock_after(&self, year: i32) -> CatalogResult<Vec<Book>> {
        self.find(
            Query::builder()
                .filter(Filter::eq("in_stock", true).and(Filter::gt("published_year", year)))
                .build(),
        )
        .await
    }

    /// Title/author/price summaries of every book, with all other fields
    /// (including any engine-side record id) suppressed.
    pub async fn summaries(&self) -> CatalogResult<Vec<BookSummary>> {
        self.backend
            .query_documents(
                Query::builder()
                    .project(["title", "author", "price"])
                    .build(),
                Book::collection_name(),
            )
            .await?
            .into_iter()
            .map(|document| Ok(deserialize_from_bson(document)?))
            .collect()
    }

    /// The whole collection, sorted by price.
    pub async fn sorted_by_price(&self, direction: SortDirection) -> CatalogResult<Vec<Book>> {
        self.find(Query::builder().sort("price", direction).build())
            .await
    }

    /// One page of the collection, in engine order.
    ///
    /// Without a sort the engine guarantees no ordering across pages; see
    /// [`PageRequest`] for the caveat, and [`BookCatalog::page_by_price`]
    /// for the sorted composition.
    pub async fn page(&self, request: PageRequest) -> CatalogResult<Vec<Book>> {
        self.find(
            Query::builder()
                .offset(request.offset())
                .limit(request.size)
                .build(),
        )
        .await
    }

    /// One page of the collection, sorted by price.
    pub async fn page_by_price(
        &self,
        request: PageRequest,
        direction: SortDirection,
    ) -> CatalogResult<Vec<Book>> {
        self.find(
            Query::builder()
                .sort("price", direction)
                .offset(request.offset())
                .limit(request.size)
                .build(),
        )
        .await
    }

    /// Arithmetic mean of `price` per genre.
    pub async fn average_price_by_genre(&self) -> CatalogResult<HashMap<String, f64>> {
        let rows = self
            .backend
            .aggregate(
                Pipeline::builder()
                    .group(
                        ValueExpr::Field("genre".into()),
                        vec![("averagePrice", Accumulator::Avg("price".into()))],
                    )
                    .build(),
                Book::collection_name(),
            )
            .await?;

        rows.iter()
            .map(|row| {
                let row = as_row(row)?;
                Ok((string_key(row)?, numeric_field(row, "averagePrice")?))
            })
            .collect()
    }

    /// The author with the most books in the collection, with the count.
    ///
    /// When several authors tie for the maximum, which one is returned is
    /// engine-defined and may vary between calls; callers must not rely
    /// on a particular tie-break. Returns `None` for an empty collection.
    pub async fn most_prolific_author(&self) -> CatalogResult<Option<(String, u64)>> {
        let rows = self
            .backend
            .aggregate(
                Pipeline::builder()
                    .group(
                        ValueExpr::Field("author".into()),
                        vec![("bookCount", Accumulator::Count)],
                    )
                    .sort("bookCount", SortDirection::Desc)
                    .limit(1)
                    .build(),
                Book::collection_name(),
            )
            .await?;

        match rows.first() {
            Some(row) => {
                let row = as_row(row)?;
                Ok(Some((string_key(row)?, integer_field(row, "bookCount")? as u64)))
            }
            None => Ok(None),
        }
    }

    /// Book counts per publication decade, ascending by decade.
    ///
    /// The decade of a book is `published_year - (published_year mod 10)`.
    pub async fn count_by_decade(&self) -> CatalogResult<Vec<(i32, u64)>> {
        let rows = self
            .backend
            .aggregate(
                Pipeline::builder()
                    .project(vec![("decade", ValueExpr::DecadeOf("published_year".into()))])
                    .group(
                        ValueExpr::Field("decade".into()),
                        vec![("bookCount", Accumulator::Count)],
                    )
                    .sort("_id", SortDirection::Asc)
                    .build(),
                Book::collection_name(),
            )
            .await?;

        rows.iter()
            .map(|row| {
                let row = as_row(row)?;
                Ok((
                    integer_field(row, "_id")? as i32,
                    integer_field(row, "bookCount")? as u64,
                ))
            })
            .collect()
    }

    /// Requests that the engine maintain the given index over the collection.
    ///
    /// Idempotent: re-requesting an existing index is a no-op.
    pub async fn ensure_index(&self, index: IndexSpec) -> CatalogResult<()> {
        self.backend
            .ensure_index(index, Book::collection_name())
            .await
    }

    /// Passes a filter through to the engine's explain facility and
    /// returns the engine-reported statistics verbatim. No side effects.
    pub async fn explain(&self, filter: Option<Expr>) -> CatalogResult<Bson> {
        self.backend
            .explain(filter, Book::collection_name())
            .await
    }

    /// Shuts down the catalog and releases engine resources.
    pub async fn shutdown(self) -> CatalogResult<()> {
        self.backend.shutdown().await
    }
}

fn as_row(value: &Bson) -> CatalogResult<&Document> {
    value
        .as_document()
        .ok_or_else(|| CatalogError::InvalidDocument("aggregation row is not a document".into()))
}

fn string_key(row: &Document) -> CatalogResult<String> {
    match row.get("_id") {
        Some(Bson::String(key)) => Ok(key.clone()),
        other => Err(CatalogError::InvalidDocument(format!(
            "group key is not a string: {other:?}"
        ))),
    }
}

fn numeric_field(row: &Document, field: &str) -> CatalogResult<f64> {
    match row.get(field) {
        Some(Bson::Double(value)) => Ok(*value),
        Some(Bson::Int32(value)) => Ok(*value as f64),
        Some(Bson::Int64(value)) => Ok(*value as f64),
        other => Err(CatalogError::InvalidDocument(format!(
            "field '{field}' is not numeric: {other:?}"
        ))),
    }
}

fn integer_field(row: &Document, field: &str) -> CatalogResult<i64> {
    match row.get(field) {
        Some(Bson::Int32(value)) => Ok(*value as i64),
        Some(Bson::Int64(value)) => Ok(*value),
        Some(Bson::Double(value)) => Ok(*value as i64),
        other => Err(CatalogError::InvalidDocument(format!(
            "field '{field}' is not an integer: {other:?}"
        ))),
    }
}
