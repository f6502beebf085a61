//! Collection backends.
//!
//! Helpers talk to a [`DocumentCollection`]; MongoDB and in-memory backends
//! implement it with the same semantics.

pub mod memory;
pub mod mongo;

use crate::error::DocumentResult;
use crate::query::{Filter, Stage, Update};
use async_trait::async_trait;
use mongodb::bson::{Bson, Document};

pub use memory::MemoryCollection;
pub use mongo::MongoCollection;

/// Counts reported by an update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Documents matching the filter.
    pub matched: u64,
    /// Documents whose contents actually changed.
    pub modified: u64,
}

/// A named set of documents in an external store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    /// Documents matching `filter`, in store order.
    async fn find(&self, filter: &Filter) -> DocumentResult<Vec<Document>>;

    /// Apply `update` to every document matching `filter`.
    async fn update_many(&self, filter: &Filter, update: &Update) -> DocumentResult<UpdateOutcome>;

    /// Run an aggregation pipeline.
    async fn aggregate(&self, pipeline: &[Stage]) -> DocumentResult<Vec<Document>>;

    /// Insert one document and return its `_id`.
    async fn insert_one(&self, document: Document) -> DocumentResult<Bson>;

    /// Number of documents matching `filter`.
    async fn count(&self, filter: &Filter) -> DocumentResult<u64>;
}
