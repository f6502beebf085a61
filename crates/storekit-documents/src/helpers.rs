//! School and student helpers.
//!
//! Each helper is one round trip to the collection; errors from the backend
//! propagate unchanged.

use crate::collection::DocumentCollection;
use crate::error::DocumentResult;
use crate::query::{Expr, Filter, Projection, SortOrder, Stage, Update};
use mongodb::bson::{self, Bson, Document};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Output field holding the mean topic score.
pub const AVERAGE_SCORE: &str = "averageScore";

/// Every document in the collection; empty when there are none.
pub async fn list_all<C>(collection: &C) -> DocumentResult<Vec<Document>>
where
    C: DocumentCollection + ?Sized,
{
    let documents = collection.find(&Filter::All).await?;
    debug!(count = documents.len(), "Listed all documents");
    Ok(documents)
}

/// Set `topics` on every document whose `name` equals `name`.
///
/// Returns the number of documents actually modified; matches whose topics
/// already equal `topics` are not counted.
pub async fn update_topics<C>(
    collection: &C,
    name: &str,
    topics: impl IntoIterator<Item = impl Into<String>>,
) -> DocumentResult<u64>
where
    C: DocumentCollection + ?Sized,
{
    let topics: Vec<Bson> = topics.into_iter().map(|t| Bson::String(t.into())).collect();
    let outcome = collection
        .update_many(&Filter::eq("name", name), &Update::set("topics", topics))
        .await?;
    debug!(name = %name, matched = outcome.matched, modified = outcome.modified, "Updated topics");
    Ok(outcome.modified)
}

/// Schools whose `topic` field equals (or, for arrays, contains) `topic`.
///
/// Note the singular `topic`: [`update_topics`] writes the plural `topics`
/// field, so schools updated through it are not found here.
pub async fn schools_by_topic<C>(collection: &C, topic: &str) -> DocumentResult<Vec<Document>>
where
    C: DocumentCollection + ?Sized,
{
    let schools = collection.find(&Filter::eq("topic", topic)).await?;
    debug!(topic = %topic, count = schools.len(), "Schools by topic");
    Ok(schools)
}

/// Pipeline used by [`top_students`].
pub fn top_students_pipeline() -> Vec<Stage> {
    vec![
        Stage::Project(
            Projection::new()
                .field("name", Expr::field("name"))
                .field(AVERAGE_SCORE, Expr::avg("topics.score")),
        ),
        Stage::sort_by(AVERAGE_SCORE, SortOrder::Descending),
    ]
}

/// One `{_id, name, averageScore}` projection per student, best average first.
///
/// Ties keep the order the store returns them in.
pub async fn top_students<C>(collection: &C) -> DocumentResult<Vec<Document>>
where
    C: DocumentCollection + ?Sized,
{
    let students = collection.aggregate(&top_students_pipeline()).await?;
    debug!(count = students.len(), "Ranked students");
    Ok(students)
}

/// Typed view of a [`top_students`] row.
///
/// `name` stays a raw [`Bson`] because nothing stops a student from being named `2024`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentAverage {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Bson>,
    #[serde(default)]
    pub name: Option<Bson>,
    #[serde(rename = "averageScore", default)]
    pub average_score: Option<f64>,
}

impl StudentAverage {
    /// The name as plain text: strings unquoted, anything else in its BSON display form.
    pub fn display_name(&self) -> Option<String> {
        match self.name.as_ref()? {
            Bson::String(s) => Some(s.clone()),
            Bson::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// Insert a school built from `fields` and return its `_id`.
pub async fn insert_school<C, K, V>(
    collection: &C,
    fields: impl IntoIterator<Item = (K, V)>,
) -> DocumentResult<Bson>
where
    C: DocumentCollection + ?Sized,
    K: Into<String>,
    V: Into<Bson>,
{
    let mut school = Document::new();
    for (key, value) in fields {
        school.insert(key, value);
    }
    let id = collection.insert_one(school).await?;
    debug!(id = %id, "Inserted school");
    Ok(id)
}

/// Number of documents in the collection.
pub async fn count_documents<C>(collection: &C) -> DocumentResult<u64>
where
    C: DocumentCollection + ?Sized,
{
    collection.count(&Filter::All).await
}

/// Deserialize documents into `T`.
pub fn decode<T: DeserializeOwned>(documents: Vec<Document>) -> DocumentResult<Vec<T>> {
    documents
        .into_iter()
        .map(|doc| bson::from_document(doc).map_err(Into::into))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::{MockDocumentCollection, UpdateOutcome};
    use crate::error::DocumentError;
    use mongodb::bson::doc;

    #[tokio::test]
    async fn test_update_topics_sends_name_filter_and_set() {
        let mut collection = MockDocumentCollection::new();
        collection
            .expect_update_many()
            .withf(|filter, update| {
                *filter == Filter::eq("name", "Holberton school")
                    && update.to_document()
                        == doc! { "$set": { "topics": ["Sys admin", "AI", "Algorithm"] } }
            })
            .times(1)
            .returning(|_, _| Ok(UpdateOutcome { matched: 3, modified: 2 }));

        let modified = update_topics(
            &collection,
            "Holberton school",
            ["Sys admin", "AI", "Algorithm"],
        )
        .await
        .unwrap();

        assert_eq!(modified, 2);
    }

    #[tokio::test]
    async fn test_schools_by_topic_filters_singular_field() {
        let mut collection = MockDocumentCollection::new();
        collection
            .expect_find()
            .withf(|filter| filter.to_document() == doc! { "topic": "Python" })
            .times(1)
            .returning(|_| Ok(vec![doc! { "name": "Holberton school" }]));

        let schools = schools_by_topic(&collection, "Python").await.unwrap();
        assert_eq!(schools.len(), 1);
    }

    #[tokio::test]
    async fn test_list_all_propagates_backend_error() {
        let mut collection = MockDocumentCollection::new();
        collection
            .expect_find()
            .returning(|_| Err(DocumentError::Serialization("connection reset".into())));

        let err = list_all(&collection).await.unwrap_err();
        assert_eq!(err.to_string(), "Serialization error: connection reset");
    }

    #[tokio::test]
    async fn test_top_students_runs_project_then_sort() {
        let mut collection = MockDocumentCollection::new();
        collection
            .expect_aggregate()
            .withf(|pipeline| {
                crate::query::pipeline_documents(pipeline)
                    == vec![
                        doc! { "$project": { "name": "$name", "averageScore": { "$avg": "$topics.score" } } },
                        doc! { "$sort": { "averageScore": -1 } },
                    ]
            })
            .returning(|_| Ok(Vec::new()));

        assert!(top_students(&collection).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_school_builds_document() {
        let mut collection = MockDocumentCollection::new();
        collection
            .expect_insert_one()
            .withf(|doc| *doc == doc! { "name": "UCSF", "address": "505 Parnassus Ave" })
            .returning(|_| Ok(Bson::Int32(1)));

        let id = insert_school(&collection, [("name", "UCSF"), ("address", "505 Parnassus Ave")])
            .await
            .unwrap();
        assert_eq!(id, Bson::Int32(1));
    }

    #[test]
    fn test_decode_student_averages() {
        let rows = vec![
            doc! { "_id": 1, "name": "Bob", "averageScore": 85.0 },
            doc! { "_id": 2, "name": "Ann", "averageScore": Bson::Null },
        ];
        let decoded: Vec<StudentAverage> = decode(rows).unwrap();
        assert_eq!(decoded[0].average_score, Some(85.0));
        assert_eq!(decoded[1].display_name().as_deref(), Some("Ann"));
        assert_eq!(decoded[1].average_score, None);
    }

    #[test]
    fn test_display_name_accepts_any_bson() {
        let rows = vec![
            doc! { "name": 2024_i64 },
            doc! { "name": Bson::Null },
            doc! { "averageScore": 1.0 },
        ];
        let decoded: Vec<StudentAverage> = decode(rows).unwrap();
        assert_eq!(decoded[0].name, Some(Bson::Int64(2024)));
        assert_eq!(decoded[0].display_name().as_deref(), Some("2024"));
        assert_eq!(decoded[1].display_name(), None);
        assert_eq!(decoded[2].display_name(), None);
    }

    #[test]
    fn test_decode_reports_type_mismatch() {
        let rows = vec![doc! { "name": "Bob", "averageScore": "high" }];
        let result: DocumentResult<Vec<StudentAverage>> = decode(rows);
        assert!(matches!(result, Err(DocumentError::Serialization(_))));
    }
}
