//! Ordered compound index specifications.

use crate::query::SortDirection;

/// An ordered sequence of `(field, direction)` pairs describing an index
/// the engine should maintain over a collection.
///
/// Requesting an index that already exists is a no-op on every engine.
///
/// # Example
///
/// ```ignore
/// use bookcatalog::index::IndexSpec;
///
/// let by_title = IndexSpec::new().asc("title");
/// let by_author_recency = IndexSpec::new().asc("author").desc("published_year");
/// ```
#[derive(Debug, Clone, Default)]
pub struct IndexSpec {
    fields: Vec<(String, SortDirection)>,
}

impl IndexSpec {
    /// Creates a new empty index specification.
    pub fn new() -> Self {
        IndexSpec::default()
    }

    /// Appends an ascending field to the specification.
    pub fn asc(mut self, field: impl Into<String>) -> Self {
        self.fields.push((field.into(), SortDirection::Asc));
        self
    }

    /// Appends a descending field to the specification.
    pub fn desc(mut self, field: impl Into<String>) -> Self {
        self.fields.push((field.into(), SortDirection::Desc));
        self
    }

    /// Returns the ordered fields of this specification.
    pub fn fields(&self) -> &[(String, SortDirection)] {
        &self.fields
    }

    /// Canonical `(field, ±1)` signature, used by engines both as the
    /// native key representation and to detect re-creation.
    pub fn signature(&self) -> Vec<(String, i32)> {
        self.fields
            .iter()
            .map(|(field, direction)| {
                (
                    field.clone(),
                    match direction {
                        SortDirection::Asc => 1,
                        SortDirection::Desc => -1,
                    },
                )
            })
            .collect()
    }

    /// Deterministic index name in the engine's `field_1_field_-1` convention.
    pub fn name(&self) -> String {
        self.signature()
            .iter()
            .map(|(field, direction)| format!("{field}_{direction}"))
            .collect::<Vec<_>>()
            .join("_")
    }
}
