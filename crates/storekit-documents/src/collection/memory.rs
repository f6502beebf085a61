//! In-memory collection.

use super::{DocumentCollection, UpdateOutcome};
use crate::error::DocumentResult;
use crate::eval;
use crate::query::{Filter, Stage, Update};
use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use parking_lot::RwLock;
use tracing::debug;

/// Collection held in process memory, in insertion order.
pub struct MemoryCollection {
    name: String,
    documents: RwLock<Vec<Document>>,
}

impl MemoryCollection {
    /// Create an empty collection.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: RwLock::new(Vec::new()),
        }
    }

    /// Create a collection seeded with `documents`; missing `_id`s are generated.
    pub fn with_documents(name: impl Into<String>, documents: impl IntoIterator<Item = Document>) -> Self {
        let collection = Self::new(name);
        {
            let mut stored = collection.documents.write();
            for document in documents {
                stored.push(with_id(document).0);
            }
        }
        collection
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }
}

fn with_id(mut document: Document) -> (Document, Bson) {
    let id = match document.get("_id") {
        Some(id) => id.clone(),
        None => {
            let id = Bson::ObjectId(ObjectId::new());
            // `_id` leads the document, as the server stores it.
            let mut ordered = Document::new();
            ordered.insert("_id", id.clone());
            for (key, value) in document {
                ordered.insert(key, value);
            }
            document = ordered;
            id
        }
    };
    (document, id)
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    async fn find(&self, filter: &Filter) -> DocumentResult<Vec<Document>> {
        let found: Vec<Document> = self
            .documents
            .read()
            .iter()
            .filter(|doc| eval::matches(doc, filter))
            .cloned()
            .collect();
        debug!(collection = %self.name, count = found.len(), "Memory find");
        Ok(found)
    }

    async fn update_many(&self, filter: &Filter, update: &Update) -> DocumentResult<UpdateOutcome> {
        let mut outcome = UpdateOutcome::default();
        for doc in self.documents.write().iter_mut() {
            if eval::matches(doc, filter) {
                outcome.matched += 1;
                if eval::apply_update(doc, update) {
                    outcome.modified += 1;
                }
            }
        }
        debug!(
            collection = %self.name,
            matched = outcome.matched,
            modified = outcome.modified,
            "Memory update_many"
        );
        Ok(outcome)
    }

    async fn aggregate(&self, pipeline: &[Stage]) -> DocumentResult<Vec<Document>> {
        let mut documents = self.documents.read().clone();
        for stage in pipeline {
            match stage {
                Stage::Project(projection) => {
                    documents = documents
                        .iter()
                        .map(|doc| eval::project(doc, projection))
                        .collect();
                }
                Stage::Sort(keys) => eval::sort(&mut documents, keys),
            }
        }
        debug!(collection = %self.name, stages = pipeline.len(), count = documents.len(), "Memory aggregate");
        Ok(documents)
    }

    async fn insert_one(&self, document: Document) -> DocumentResult<Bson> {
        let (document, id) = with_id(document);
        self.documents.write().push(document);
        debug!(collection = %self.name, id = %id, "Memory insert_one");
        Ok(id)
    }

    async fn count(&self, filter: &Filter) -> DocumentResult<u64> {
        let count = self
            .documents
            .read()
            .iter()
            .filter(|doc| eval::matches(doc, filter))
            .count();
        Ok(count as u64)
    }
}
