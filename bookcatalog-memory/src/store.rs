//! In-memory engine implementation.
//!
//! Collections are insertion-ordered vectors of BSON documents behind
//! async-aware read-write locks. Insertion order is what gives the
//! "first match" semantics of single-document updates and deletes.

use std::{
    cmp::Ordering,
    collections::{HashMap, HashSet},
    sync::Arc,
};

use async_trait::async_trait;
use bson::{Bson, Document, doc};
use mea::rwlock::RwLock;
use tracing::debug;

use bookcatalog_core::{
    backend::{CatalogBackend, CatalogBackendBuilder},
    error::{CatalogError, CatalogResult},
    index::IndexSpec,
    pipeline::Pipeline,
    query::{Expr, Query, SortDirection},
};

use crate::{
    aggregate::run_pipeline,
    evaluator::{Comparable, DocumentEvaluator},
};

type CollectionVec = Vec<Document>;
type StoreMap = HashMap<String, CollectionVec>;
type IndexKey = (String, Vec<(String, i32)>);

/// Thread-safe in-memory document engine.
///
/// `MemoryEngine` is cloneable and uses `Arc`-wrapped internal state, so
/// clones share the same underlying data across async tasks.
///
/// Queries scan every document in a collection; the index registry only
/// records which indexes were requested (it feeds the explain report and
/// makes re-creation a no-op). For small development datasets this is
/// fine; production workloads belong on a real engine.
#[derive(Default, Clone, Debug)]
pub struct MemoryEngine {
    /// The main storage map: collection name -> documents in insertion order
    store: Arc<RwLock<StoreMap>>,
    /// Registered index signatures per collection
    indexes: Arc<RwLock<HashSet<IndexKey>>>,
}

impl MemoryEngine {
    /// Creates a new empty in-memory engine.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
            indexes: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Creates a builder for constructing a `MemoryEngine`.
    pub fn builder() -> MemoryEngineBuilder {
        MemoryEngineBuilder::default()
    }
}

fn as_owned_document(value: Bson) -> CatalogResult<Document> {
    match value {
        Bson::Document(document) => Ok(document),
        other => Err(CatalogError::InvalidDocument(format!(
            "expected a document, got {other:?}"
        ))),
    }
}

fn apply_projection(document: &Document, fields: &[String]) -> Document {
    fields
        .iter()
        .filter_map(|field| {
            document
                .get(field)
                .map(|value| (field.clone(), value.clone()))
        })
        .collect()
}

/// Leading field of a filter, used to decide which registered index
/// would serve the query in the explain report.
fn leading_field(expr: &Expr) -> Option<&str> {
    match expr {
        Expr::Field { field, .. } => Some(field),
        Expr::And(exprs) | Expr::Or(exprs) => exprs.first().and_then(leading_field),
    }
}

fn index_name(signature: &[(String, i32)]) -> String {
    signature
        .iter()
        .map(|(field, direction)| format!("{field}_{direction}"))
        .collect::<Vec<_>>()
        .join("_")
}

#[async_trait]
impl CatalogBackend for MemoryEngine {
    async fn insert_documents(
        &self,
        documents: Vec<Bson>,
        collection: &str,
    ) -> CatalogResult<()> {
        let mut store = self.store.write().await;
        let docs = store.entry(collection.to_string()).or_default();

        for value in documents {
            docs.push(as_owned_document(value)?);
        }

        Ok(())
    }

    async fn query_documents(&self, query: Query, collection: &str) -> CatalogResult<Vec<Bson>> {
        let store = self.store.read().await;
        let docs = match store.get(collection) {
            Some(docs) => docs,
            None => return Ok(vec![]),
        };

        let mut matched = match &query.filter {
            Some(filter) => DocumentEvaluator::filter_documents(docs.iter(), filter)?,
            None => docs.clone(),
        };

        if let Some(sort) = &query.sort {
            matched.sort_by(|a, b| {
                let left = a
                    .get(&sort.field)
                    .map(Comparable::from)
                    .unwrap_or(Comparable::Null);
                let right = b
                    .get(&sort.field)
                    .map(Comparable::from)
                    .unwrap_or(Comparable::Null);

                match sort.direction {
                    SortDirection::Asc => left.partial_cmp(&right).unwrap_or(Ordering::Equal),
                    SortDirection::Desc => right.partial_cmp(&left).unwrap_or(Ordering::Equal),
                }
            });
        }

        let windowed = matched
            .into_iter()
            .skip(query.offset.unwrap_or(0))
            .take(query.limit.unwrap_or(usize::MAX));

        Ok(match &query.projection {
            Some(fields) => windowed
                .map(|document| Bson::Document(apply_projection(&document, fields)))
                .collect(),
            None => windowed.map(Bson::Document).collect(),
        })
    }

    async fn update_first(
        &self,
        filter: Expr,
        changes: Vec<(String, Bson)>,
        collection: &str,
    ) -> CatalogResult<u64> {
        let mut store = self.store.write().await;
        let docs = match store.get_mut(collection) {
            Some(docs) => docs,
            None => return Ok(0),
        };

        for document in docs.iter_mut() {
            if DocumentEvaluator::new(document).evaluate(&filter)? {
                // modified count, not matched count: setting a field to
                // its current value reports 0, as the external engine does
                let mut modified = 0;
                for (field, value) in &changes {
                    if document.get(field) != Some(value) {
                        document.insert(field.clone(), value.clone());
                        modified = 1;
                    }
                }

                debug!(collection, modified, "updated first matching document");
                return Ok(modified);
            }
        }

        Ok(0)
    }

    async fn delete_first(&self, filter: Expr, collection: &str) -> CatalogResult<u64> {
        let mut store = self.store.write().await;
        let docs = match store.get_mut(collection) {
            Some(docs) => docs,
            None => return Ok(0),
        };

        let mut position = None;
        for (candidate, document) in docs.iter().enumerate() {
            if DocumentEvaluator::new(document).evaluate(&filter)? {
                position = Some(candidate);
                break;
            }
        }

        match position {
            Some(position) => {
                docs.remove(position);
                debug!(collection, "removed first matching document");
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn aggregate(&self, pipeline: Pipeline, collection: &str) -> CatalogResult<Vec<Bson>> {
        let store = self.store.read().await;
        let stream = store.get(collection).cloned().unwrap_or_default();

        debug!(collection, stages = pipeline.stages.len(), "running pipeline");

        Ok(run_pipeline(stream, &pipeline)?
            .into_iter()
            .map(Bson::Document)
            .collect())
    }

    async fn ensure_index(&self, index: IndexSpec, collection: &str) -> CatalogResult<()> {
        let key = (collection.to_string(), index.signature());
        let mut indexes = self.indexes.write().await;

        if indexes.insert(key) {
            debug!(collection, name = %index.name(), "registered index");
        } else {
            debug!(collection, name = %index.name(), "index already present");
        }

        Ok(())
    }

    async fn explain(&self, filter: Option<Expr>, collection: &str) -> CatalogResult<Bson> {
        let store = self.store.read().await;
        let docs = store.get(collection).cloned().unwrap_or_default();

        let matched = match &filter {
            Some(expr) => DocumentEvaluator::filter_documents(docs.iter(), expr)?.len(),
            None => docs.len(),
        };

        let indexes = self.indexes.read().await;
        let covering = filter
            .as_ref()
            .and_then(leading_field)
            .and_then(|field| {
                indexes
                    .iter()
                    .find(|(owner, signature)| {
                        owner == collection
                            && signature
                                .first()
                                .is_some_and(|(first, _)| first == field)
                    })
                    .map(|(_, signature)| index_name(signature))
            });

        Ok(Bson::Document(doc! {
            "queryPlanner": {
                "namespace": collection,
                "indexName": match covering {
                    Some(name) => Bson::String(name),
                    None => Bson::Null,
                },
            },
            "executionStats": {
                "nReturned": matched as i64,
                "totalDocsExamined": docs.len() as i64,
            },
        }))
    }
}

/// Builder for constructing [`MemoryEngine`] instances.
#[derive(Default)]
pub struct MemoryEngineBuilder;

#[async_trait]
impl CatalogBackendBuilder for MemoryEngineBuilder {
    type Backend = MemoryEngine;

    async fn build(self) -> CatalogResult<Self::Backend> {
        Ok(MemoryEngine::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookcatalog_core::query::Filter;

    fn sample() -> Vec<Bson> {
        vec![
            Bson::Document(doc! { "title": "A", "price": 5.0, "published_year": 1950 }),
            Bson::Document(doc! { "title": "B", "price": 3.0, "published_year": 1960 }),
            Bson::Document(doc! { "title": "B", "price": 9.0, "published_year": 1970 }),
        ]
    }

    #[tokio::test]
    async fn query_applies_filter_sort_and_window() {
        let engine = MemoryEngine::new();
        engine.insert_documents(sample(), "books").await.unwrap();

        let results = engine
            .query_documents(
                Query::builder()
                    .filter(Filter::gt("published_year", 1950))
                    .sort("price", SortDirection::Asc)
                    .limit(1)
                    .build(),
                "books",
            )
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].as_document().unwrap().get_str("title").unwrap(), "B");
        assert_eq!(results[0].as_document().unwrap().get_f64("price").unwrap(), 3.0);
    }

    #[tokio::test]
    async fn projection_keeps_only_requested_fields() {
        let engine = MemoryEngine::new();
        engine.insert_documents(sample(), "books").await.unwrap();

        let results = engine
            .query_documents(Query::builder().project(["title"]).build(), "books")
            .await
            .unwrap();

        let row = results[0].as_document().unwrap();
        assert!(row.contains_key("title"));
        assert!(!row.contains_key("price"));
    }

    #[tokio::test]
    async fn update_first_touches_only_the_first_match() {
        let engine = MemoryEngine::new();
        engine.insert_documents(sample(), "books").await.unwrap();

        let modified = engine
            .update_first(
                Filter::eq("title", "B"),
                vec![("price".to_string(), Bson::Double(4.0))],
                "books",
            )
            .await
            .unwrap();
        assert_eq!(modified, 1);

        let books = engine
            .query_documents(
                Query::builder().filter(Filter::eq("title", "B")).build(),
                "books",
            )
            .await
            .unwrap();
        let prices = books
            .iter()
            .map(|b| b.as_document().unwrap().get_f64("price").unwrap())
            .collect::<Vec<_>>();
        assert_eq!(prices, vec![4.0, 9.0]);
    }

    #[tokio::test]
    async fn update_to_identical_value_reports_zero() {
        let engine = MemoryEngine::new();
        engine.insert_documents(sample(), "books").await.unwrap();

        let modified = engine
            .update_first(
                Filter::eq("title", "A"),
                vec![("price".to_string(), Bson::Double(5.0))],
                "books",
            )
            .await
            .unwrap();

        assert_eq!(modified, 0);
    }

    #[tokio::test]
    async fn delete_first_removes_one_document_per_call() {
        let engine = MemoryEngine::new();
        engine.insert_documents(sample(), "books").await.unwrap();

        assert_eq!(
            engine.delete_first(Filter::eq("title", "B"), "books").await.unwrap(),
            1
        );
        assert_eq!(
            engine.delete_first(Filter::eq("title", "B"), "books").await.unwrap(),
            1
        );
        assert_eq!(
            engine.delete_first(Filter::eq("title", "B"), "books").await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn writes_against_unknown_collections_are_noops() {
        let engine = MemoryEngine::new();

        assert_eq!(
            engine
                .update_first(
                    Filter::eq("title", "A"),
                    vec![("price".to_string(), Bson::Double(1.0))],
                    "books",
                )
                .await
                .unwrap(),
            0
        );
        assert_eq!(
            engine.delete_first(Filter::eq("title", "A"), "books").await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn ensure_index_twice_registers_once() {
        let engine = MemoryEngine::new();

        engine
            .ensure_index(IndexSpec::new().asc("title"), "books")
            .await
            .unwrap();
        engine
            .ensure_index(IndexSpec::new().asc("title"), "books")
            .await
            .unwrap();

        assert_eq!(engine.indexes.read().await.len(), 1);
    }

    #[tokio::test]
    async fn explain_reports_stats_and_covering_index() {
        let engine = MemoryEngine::new();
        engine.insert_documents(sample(), "books").await.unwrap();
        engine
            .ensure_index(IndexSpec::new().asc("title"), "books")
            .await
            .unwrap();

        let report = engine
            .explain(Some(Filter::eq("title", "B")), "books")
            .await
            .unwrap();
        let report = report.as_document().unwrap();

        let stats = report.get_document("executionStats").unwrap();
        assert_eq!(stats.get_i64("nReturned").unwrap(), 2);
        assert_eq!(stats.get_i64("totalDocsExamined").unwrap(), 3);

        let planner = report.get_document("queryPlanner").unwrap();
        assert_eq!(planner.get_str("indexName").unwrap(), "title_1");
    }
}
