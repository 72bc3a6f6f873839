//! Record types for the catalog and their serialization seam.
//!
//! The catalog stores structured records rather than open-ended dynamic
//! maps, trading true schema-lessness for compile-time field safety. The
//! engine itself remains schema-less; nothing here is enforced on its side.

use bson::{Bson, de::deserialize_from_bson, ser::serialize_to_bson};
use serde::{Deserialize, Serialize};
use serde_json::{Value, from_value, to_value};

use crate::error::CatalogResult;

/// Core trait binding a record type to its collection.
///
/// Records carry no engine-managed identity; single-document writes
/// address records through filter matching instead (the catalog uses
/// `title` as its natural, non-unique-enforced key).
///
/// # Example
///
/// ```ignore
/// use bookcatalog::book::Record;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct Book {
///     pub title: String,
///     pub author: String,
/// }
///
/// impl Record for Book {
///     fn collection_name() -> &'static str {
///         "books"
///     }
/// }
/// ```
pub trait Record: Serialize + for<'de> Deserialize<'de> + Send + Sync + Clone + 'static {
    /// Returns the name of the collection this record belongs to.
    ///
    /// This should be a static, lowercase identifier (e.g., "books").
    /// The collection is created by the engine on first insert.
    fn collection_name() -> &'static str;
}

/// Extension trait providing serialization/deserialization utilities for records.
///
/// This trait is automatically implemented for all types that implement [`Record`].
pub trait RecordExt: Record {
    /// Converts this record to a BSON value for the engine.
    fn to_bson(&self) -> CatalogResult<Bson>;

    /// Creates a record from a BSON value returned by the engine.
    fn from_bson(bson: Bson) -> CatalogResult<Self>;

    /// Converts this record to a JSON value.
    fn to_json(&self) -> CatalogResult<Value>;

    /// Creates a record from a JSON value.
    fn from_json(value: Value) -> CatalogResult<Self>;
}

impl<R: Record> RecordExt for R {
    fn to_bson(&self) -> CatalogResult<Bson> {
        Ok(serialize_to_bson(self)?)
    }

    fn from_bson(bson: Bson) -> CatalogResult<Self> {
        Ok(deserialize_from_bson(bson)?)
    }

    fn to_json(&self) -> CatalogResult<Value> {
        Ok(to_value(self)?)
    }

    fn from_json(value: Value) -> CatalogResult<Self> {
        Ok(from_value(value)?)
    }
}

/// A book in the catalog.
///
/// `title` serves as the natural identifier for single-document updates
/// and deletes; the engine does not enforce its uniqueness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub published_year: i32,
    pub price: f64,
    pub in_stock: bool,
}

impl Record for Book {
    fn collection_name() -> &'static str {
        "books"
    }
}

/// The projected shape returned by the catalog's summary listing.
///
/// Only `title`, `author` and `price` are populated; every other field,
/// including any engine-side record id, is suppressed by the projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSummary {
    pub title: String,
    pub author: String,
    pub price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn book_from_json_fixture() {
        let book = Book::from_json(json!({
            "title": "1984",
            "author": "George Orwell",
            "genre": "Dystopian",
            "published_year": 1949,
            "price": 10.99,
            "in_stock": true,
        }))
        .unwrap();

        assert_eq!(book.author, "George Orwell");
        assert_eq!(book.published_year, 1949);
    }

    #[test]
    fn book_bson_uses_wire_field_names() {
        let book = Book {
            title: "Moby Dick".to_string(),
            author: "Herman Melville".to_string(),
            genre: "Adventure".to_string(),
            published_year: 1851,
            price: 12.50,
            in_stock: false,
        };

        let bson = book.to_bson().unwrap();
        let doc = bson.as_document().unwrap();

        assert!(doc.contains_key("published_year"));
        assert!(doc.contains_key("in_stock"));
        assert!(!doc.contains_key("_id"));
    }
}
