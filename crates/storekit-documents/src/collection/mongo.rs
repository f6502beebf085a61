//! MongoDB-backed collection.

use super::{DocumentCollection, UpdateOutcome};
use crate::error::DocumentResult;
use crate::query::{pipeline_documents, Filter, Stage, Update};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{Bson, Document};
use mongodb::{Client, Collection, Database};
use storekit_common_config::MongoConfig;
use tracing::debug;

/// Collection handle backed by the MongoDB driver.
///
/// Cloning is cheap; clones share the driver's connection pool.
#[derive(Clone)]
pub struct MongoCollection {
    inner: Collection<Document>,
}

impl MongoCollection {
    /// Wrap an existing driver handle.
    pub fn new(inner: Collection<Document>) -> Self {
        Self { inner }
    }

    /// Handle to `name` in `database`.
    pub fn from_database(database: &Database, name: &str) -> Self {
        Self::new(database.collection::<Document>(name))
    }

    /// Connect using `config` and open the configured collection.
    ///
    /// The driver connects lazily, so an unreachable server surfaces on the
    /// first operation rather than here.
    pub async fn connect(config: &MongoConfig) -> DocumentResult<Self> {
        let client = Client::with_uri_str(&config.uri).await?;
        debug!(
            database = %config.database,
            collection = %config.collection,
            "Opened MongoDB collection"
        );
        Ok(Self::from_database(&client.database(&config.database), &config.collection))
    }

    /// Underlying driver handle.
    pub fn inner(&self) -> &Collection<Document> {
        &self.inner
    }
}

#[async_trait]
impl DocumentCollection for MongoCollection {
    async fn find(&self, filter: &Filter) -> DocumentResult<Vec<Document>> {
        let cursor = self.inner.find(filter.to_document(), None).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        debug!(collection = %self.inner.name(), count = documents.len(), "MongoDB find");
        Ok(documents)
    }

    async fn update_many(&self, filter: &Filter, update: &Update) -> DocumentResult<UpdateOutcome> {
        let result = self
            .inner
            .update_many(filter.to_document(), update.to_document(), None)
            .await?;
        debug!(
            collection = %self.inner.name(),
            matched = result.matched_count,
            modified = result.modified_count,
            "MongoDB update_many"
        );
        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn aggregate(&self, pipeline: &[Stage]) -> DocumentResult<Vec<Document>> {
        let cursor = self
            .inner
            .aggregate(pipeline_documents(pipeline), None)
            .await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        debug!(collection = %self.inner.name(), count = documents.len(), "MongoDB aggregate");
        Ok(documents)
    }

    async fn insert_one(&self, document: Document) -> DocumentResult<Bson> {
        let result = self.inner.insert_one(document, None).await?;
        debug!(collection = %self.inner.name(), id = %result.inserted_id, "MongoDB insert_one");
        Ok(result.inserted_id)
    }

    async fn count(&self, filter: &Filter) -> DocumentResult<u64> {
        Ok(self.inner.count_documents(filter.to_document(), None).await?)
    }
}
