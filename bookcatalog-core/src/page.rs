//! Pagination parameters for catalog queries.

use serde::{Deserialize, Serialize};

/// A zero-based page request: skip `index * size` documents, take `size`.
///
/// A page request on its own implies no ordering. Consecutive pages are
/// only consistent when the query is also sorted; without a sort, pages
/// may overlap or skip documents across concurrent mutations. That is a
/// property of the underlying engine, not something this layer corrects.
///
/// # Example
///
/// ```ignore
/// use bookcatalog::page::PageRequest;
///
/// let second_page = PageRequest::new(1, 5);
/// assert_eq!(second_page.offset(), 5);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// The page index (0-based).
    pub index: usize,
    /// Number of documents per page.
    pub size: usize,
}

impl PageRequest {
    /// Creates a new page request.
    pub fn new(index: usize, size: usize) -> Self {
        Self { index, size }
    }

    /// Number of documents to skip for this page.
    pub fn offset(&self) -> usize {
        self.index * self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_skips_whole_pages() {
        assert_eq!(PageRequest::new(0, 5).offset(), 0);
        assert_eq!(PageRequest::new(1, 5).offset(), 5);
        assert_eq!(PageRequest::new(3, 20).offset(), 60);
    }
}
