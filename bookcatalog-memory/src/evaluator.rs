//! Filter expression evaluation for in-memory document matching.

use std::cmp::Ordering;

use bson::{Bson, Document};

use bookcatalog_core::{
    error::{CatalogError, CatalogResult},
    query::{Expr, FieldOp, QueryVisitor},
};

/// Type-erased, comparable representation of BSON values.
///
/// Wraps the value types the catalog's records produce and provides the
/// comparison operations filtering and sorting need. Numeric types are
/// normalized to f64. Values outside this set compare as `Null`.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    /// Null or non-comparable value
    Null,
    /// Boolean value
    Bool(bool),
    /// Numeric value (all integers and floats normalized to f64)
    Number(f64),
    /// String value
    String(&'a str),
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Number(*value as f64),
            Bson::Int64(value) => Comparable::Number(*value as f64),
            Bson::Double(value) => Comparable::Number(*value),
            Bson::String(value) => Comparable::String(value),
            _ => Comparable::Null,
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Number(a), Comparable::Number(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            _ => false,
        }
    }
}

impl<'a> PartialOrd for Comparable<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Comparable::Bool(a), Comparable::Bool(b)) => a.partial_cmp(b),
            (Comparable::Number(a), Comparable::Number(b)) => a.partial_cmp(b),
            (Comparable::String(a), Comparable::String(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

pub(crate) struct DocumentEvaluator<'a> {
    document: &'a Document,
}

impl<'a> DocumentEvaluator<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }

    pub fn evaluate(&mut self, expr: &Expr) -> CatalogResult<bool> {
        self.visit_expr(expr)
    }

    pub fn filter_documents(
        documents: impl IntoIterator<Item = &'a Document>,
        expr: &Expr,
    ) -> CatalogResult<Vec<Document>> {
        let mut matched = Vec::new();
        for document in documents {
            if DocumentEvaluator::new(document).evaluate(expr)? {
                matched.push(document.clone());
            }
        }

        Ok(matched)
    }
}

impl<'a> QueryVisitor for DocumentEvaluator<'a> {
    type Output = bool;
    type Error = CatalogError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if !self.visit_expr(expr)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if self.visit_expr(expr)? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn visit_field(
        &mut self,
        field: &str,
        op: &FieldOp,
        value: &Bson,
    ) -> Result<Self::Output, Self::Error> {
        match self.document.get(field) {
            Some(field_value) => match op {
                FieldOp::Eq => Ok(Comparable::from(field_value) == Comparable::from(value)),
                FieldOp::Ne => Ok(Comparable::from(field_value) != Comparable::from(value)),
                FieldOp::Gt | FieldOp::Gte | FieldOp::Lt | FieldOp::Lte => {
                    match Comparable::from(field_value).partial_cmp(&Comparable::from(value)) {
                        Some(ordering) => Ok(match op {
                            FieldOp::Gt => ordering == Ordering::Greater,
                            FieldOp::Gte => {
                                ordering == Ordering::Greater || ordering == Ordering::Equal
                            }
                            FieldOp::Lt => ordering == Ordering::Less,
                            FieldOp::Lte => {
                                ordering == Ordering::Less || ordering == Ordering::Equal
                            }
                            _ => unreachable!(),
                        }),
                        None => Ok(false),
                    }
                }
            },
            // a missing field matches nothing
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookcatalog_core::query::Filter;
    use bson::doc;

    fn hobbit() -> Document {
        doc! {
            "title": "The Hobbit",
            "author": "J.R.R. Tolkien",
            "genre": "Fantasy",
            "published_year": 1937,
            "price": 14.50,
            "in_stock": true,
        }
    }

    #[test]
    fn equality_matches_exact_values_only() {
        let document = hobbit();

        assert!(DocumentEvaluator::new(&document)
            .evaluate(&Filter::eq("genre", "Fantasy"))
            .unwrap());
        assert!(!DocumentEvaluator::new(&document)
            .evaluate(&Filter::eq("genre", "Fiction"))
            .unwrap());
    }

    #[test]
    fn greater_than_is_strict() {
        let document = hobbit();

        assert!(DocumentEvaluator::new(&document)
            .evaluate(&Filter::gt("published_year", 1936))
            .unwrap());
        assert!(!DocumentEvaluator::new(&document)
            .evaluate(&Filter::gt("published_year", 1937))
            .unwrap());
    }

    #[test]
    fn conjunction_requires_every_branch() {
        let document = hobbit();
        let expr = Filter::eq("in_stock", true).and(Filter::gt("published_year", 2010));

        assert!(!DocumentEvaluator::new(&document).evaluate(&expr).unwrap());
    }

    #[test]
    fn missing_field_matches_nothing() {
        let document = hobbit();

        assert!(!DocumentEvaluator::new(&document)
            .evaluate(&Filter::eq("publisher", "Allen & Unwin"))
            .unwrap());
    }

    #[test]
    fn numeric_types_compare_across_widths() {
        let document = doc! { "published_year": Bson::Int64(1937) };

        assert!(DocumentEvaluator::new(&document)
            .evaluate(&Filter::gte("published_year", 1937))
            .unwrap());
    }
}
