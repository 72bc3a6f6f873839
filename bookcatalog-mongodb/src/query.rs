//! Filter translation from the catalog's query AST to MongoDB query syntax.

use bson::{Bson, Document, doc};

use bookcatalog_core::{
    error::CatalogError,
    query::{Expr, FieldOp, QueryVisitor},
};

/// Translates filter expressions into MongoDB filter documents.
pub(crate) struct MongoQueryTranslator;

impl QueryVisitor for MongoQueryTranslator {
    type Output = Document;
    type Error = CatalogError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            "$and": exprs
                .iter()
                .map(|expr| self.visit_expr(expr))
                .collect::<Result<Vec<_>, _>>()?,
        })
    }

    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            "$or": exprs
                .iter()
                .map(|expr| self.visit_expr(expr))
                .collect::<Result<Vec<_>, _>>()?,
        })
    }

    fn visit_field(
        &mut self,
        field: &str,
        op: &FieldOp,
        value: &Bson,
    ) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            field: match op {
                FieldOp::Eq => doc! { "$eq": value },
                FieldOp::Ne => doc! { "$ne": value },
                FieldOp::Gt => doc! { "$gt": value },
                FieldOp::Gte => doc! { "$gte": value },
                FieldOp::Lt => doc! { "$lt": value },
                FieldOp::Lte => doc! { "$lte": value },
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookcatalog_core::query::Filter;

    #[test]
    fn equality_filter_uses_eq_operator() {
        let filter = MongoQueryTranslator
            .visit_expr(&Filter::eq("genre", "Fiction"))
            .unwrap();

        assert_eq!(filter, doc! { "genre": { "$eq": "Fiction" } });
    }

    #[test]
    fn conjunction_translates_to_and_document() {
        let filter = MongoQueryTranslator
            .visit_expr(&Filter::eq("in_stock", true).and(Filter::gt("published_year", 2010)))
            .unwrap();

        assert_eq!(
            filter,
            doc! {
                "$and": [
                    { "in_stock": { "$eq": true } },
                    { "published_year": { "$gt": 2010 } },
                ]
            },
        );
    }
}
