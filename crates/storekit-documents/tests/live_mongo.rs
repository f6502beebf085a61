//! Round trips against a real MongoDB server.
//!
//! Run with `cargo test -p storekit-documents -- --ignored` and
//! `STOREKIT_MONGO_URI` pointing at a disposable server.

use storekit_common_config::MongoConfig;
use storekit_documents::bson::{doc, Bson};
use storekit_documents::{
    list_all, schools_by_topic, top_students, update_topics, DocumentCollection, MongoCollection,
};

async fn scratch_collection(name: &str) -> MongoCollection {
    let config = MongoConfig {
        uri: std::env::var("STOREKIT_MONGO_URI")
            .unwrap_or_else(|_| MongoConfig::default().uri),
        database: "storekit_test".to_string(),
        collection: name.to_string(),
    };
    let collection = MongoCollection::connect(&config).await.expect("connect");
    collection.inner().drop(None).await.expect("drop scratch collection");
    collection
}

#[tokio::test]
#[ignore = "requires a MongoDB server"]
async fn helpers_round_trip_against_mongodb() {
    let school = scratch_collection("school").await;
    assert!(list_all(&school).await.unwrap().is_empty());

    school
        .insert_one(doc! { "name": "Holberton school", "topic": "Python" })
        .await
        .unwrap();
    school.insert_one(doc! { "name": "UCSF" }).await.unwrap();

    assert_eq!(update_topics(&school, "Holberton school", ["Sys admin", "AI"]).await.unwrap(), 1);
    assert_eq!(schools_by_topic(&school, "Python").await.unwrap().len(), 1);
    assert_eq!(list_all(&school).await.unwrap().len(), 2);
}

#[tokio::test]
#[ignore = "requires a MongoDB server"]
async fn top_students_matches_server_aggregation() {
    let students = scratch_collection("students").await;
    students
        .insert_one(doc! { "name": "School2", "topics": [{ "score": 70 }] })
        .await
        .unwrap();
    students
        .insert_one(doc! { "name": "School1", "topics": [{ "score": 80 }, { "score": 90 }] })
        .await
        .unwrap();

    let ranked = top_students(&students).await.unwrap();
    assert_eq!(ranked[0].get_str("name").unwrap(), "School1");
    assert_eq!(ranked[0].get("averageScore"), Some(&Bson::Double(85.0)));
    assert_eq!(ranked[1].get("averageScore"), Some(&Bson::Double(70.0)));
}
