use async_trait::async_trait;
use bson::{Bson, Document, doc};
use futures::TryStreamExt;
use mongodb::{
    Client, Collection as MongoCollection, IndexModel,
    options::{ClientOptions, FindOptions, IndexOptions},
};
use tracing::debug;

use bookcatalog_core::{
    backend::{CatalogBackend, CatalogBackendBuilder},
    error::{CatalogError, CatalogResult},
    index::IndexSpec,
    pipeline::Pipeline,
    query::{Query, QueryVisitor, SortDirection, Expr},
};

use crate::{pipeline::translate_pipeline, query::MongoQueryTranslator};


#[derive(Debug)]
pub struct MongoDbEngine {
    client: Client,
    database: String,
}

impl MongoDbEngine {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbEngineBuilder {
        MongoDbEngineBuilder::new(dsn, database)
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(collection_name)
    }

    fn prepare_document(&self, value: &Bson) -> CatalogResult<Document> {
        value
            .as_document()
            .cloned()
            .ok_or_else(|| CatalogError::InvalidDocument("expected a document".into()))
    }

    fn restore_document(&self, document: &Document) -> Bson {
        // the record id belongs to the engine, never to the caller
        Bson::Document(Document::from_iter(
            document
                .clone()
                .into_iter()
                .filter(|(key, _)| key != "_id"),
        ))
    }

    fn translate_filter(&self, filter: Option<&Expr>) -> CatalogResult<Document> {
        match filter {
            Some(expr) => MongoQueryTranslator.visit_expr(expr),
            None => Ok(doc! {}),
        }
    }
}

#[async_trait]
impl CatalogBackend for MongoDbEngine {
    async fn insert_documents(
        &self,
        documents: Vec<Bson>,
        collection: &str,
    ) -> CatalogResult<()> {
        self.get_collection(collection)
            .insert_many(
                documents
                    .iter()
                    .map(|value| self.prepare_document(value))
                    .collect::<CatalogResult<Vec<Document>>>()?,
            )
            .await
            .map_err(|e| CatalogError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn query_documents(&self, query: Query, collection: &str) -> CatalogResult<Vec<Bson>> {
        let mut options = FindOptions::default();

        if let Some(limit) = query.limit {
            options.limit = Some(limit as i64);
        }
        if let Some(skip) = query.offset {
            options.skip = Some(skip as u64);
        }
        if let Some(sort) = &query.sort {
            options.sort = Some(doc! {
                sort.field.clone(): match sort.direction {
                    SortDirection::Asc => 1,
                    SortDirection::Desc => -1,
                }
            })
        }
        if let Some(fields) = &query.projection {
            let mut projection = Document::new();
            for field in fields {
                projection.insert(field.clone(), 1);
            }
            projection.insert("_id", 0);
            options.projection = Some(projection);
        }

        Ok(self
            .get_collection(collection)
            .find(self.translate_filter(query.filter.as_ref())?)
            .with_options(options)
            .await
            .map_err(|e| CatalogError::Backend(e.to_string()))?
            .try_collect::<Vec<Document>>()
            .await
            .map_err(|e| CatalogError::Backend(e.to_string()))?
            .into_iter()
            .map(|document| self.restore_document(&document))
            .collect())
    }

    async fn update_first(
        &self,
        filter: Expr,
        changes: Vec<(String, Bson)>,
        collection: &str,
    ) -> CatalogResult<u64> {
        let result = self
            .get_collection(collection)
            .update_one(
                MongoQueryTranslator.visit_expr(&filter)?,
                doc! { "$set": changes.into_iter().collect::<Document>() },
            )
            .await
            .map_err(|e| CatalogError::Backend(e.to_string()))?;

        Ok(result.modified_count)
    }

    async fn delete_first(&self, filter: Expr, collection: &str) -> CatalogResult<u64> {
        let result = self
            .get_collection(collection)
            .delete_one(MongoQueryTranslator.visit_expr(&filter)?)
            .await
            .map_err(|e| CatalogError::Backend(e.to_string()))?;

        Ok(result.deleted_count)
    }

    async fn aggregate(&self, pipeline: Pipeline, collection: &str) -> CatalogResult<Vec<Bson>> {
        debug!(collection, stages = pipeline.stages.len(), "running pipeline");

        // group rows carry their key under `_id`; unlike find results it
        // is part of the contract and left in place
        Ok(self
            .get_collection(collection)
            .aggregate(translate_pipeline(&pipeline))
            .await
            .map_err(|e| CatalogError::Backend(e.to_string()))?
            .try_collect::<Vec<Document>>()
            .await
            .map_err(|e| CatalogError::Backend(e.to_string()))?
            .into_iter()
            .map(Bson::Document)
            .collect())
    }

    async fn ensure_index(&self, index: IndexSpec, collection: &str) -> CatalogResult<()> {
        self.get_collection(collection)
            .create_index(
                IndexModel::builder()
                    .keys(
                        index
                            .signature()
                            .into_iter()
                            .map(|(field, direction)| (field, Bson::Int32(direction)))
                            .collect::<Document>(),
                    )
                    .options(
                        IndexOptions::builder()
                            .name(index.name())
                            .build(),
                    )
                    .build(),
            )
            .await
            .map_err(|e| CatalogError::Backend(e.to_string()))?;

        debug!(collection, name = %index.name(), "ensured index");

        Ok(())
    }

    async fn explain(&self, filter: Option<Expr>, collection: &str) -> CatalogResult<Bson> {
        let report = self
            .client
            .database(&self.database)
            .run_command(doc! {
                "explain": {
                    "find": collection,
                    "filter": self.translate_filter(filter.as_ref())?,
                },
                "verbosity": "executionStats",
            })
            .await
            .map_err(|e| CatalogError::Backend(e.to_string()))?;

        Ok(Bson::Document(report))
    }

    async fn shutdown(self) -> CatalogResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

pub struct MongoDbEngineBuilder {
    dsn: String,
    database: String,
}

impl MongoDbEngineBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
        }
    }
}

#[async_trait]
impl CatalogBackendBuilder for MongoDbEngineBuilder {
    type Backend = MongoDbEngine;

    async fn build(self) -> CatalogResult<Self::Backend> {
        Ok(MongoDbEngine::new(
            Client::with_options(
                ClientOptions::parse(&self.dsn)
                    .await
                    .map_err(|e| CatalogError::Initialization(e.to_string()))?,
            )
            .map_err(|e| CatalogError::Initialization(e.to_string()))?,
            self.database,
        ))
    }
}
