//! Helper behaviour against the in-memory collection.

use proptest::prelude::*;
use storekit_documents::bson::{doc, Bson, Document};
use storekit_documents::{
    count_documents, decode, insert_school, list_all, schools_by_topic, top_students,
    update_topics, MemoryCollection, StudentAverage, AVERAGE_SCORE,
};
use storekit_test_utils::assert_ok;

#[tokio::test]
async fn list_all_on_empty_collection_is_empty() {
    let school = MemoryCollection::new("school");
    assert!(assert_ok!(list_all(&school).await).is_empty());
}

#[tokio::test]
async fn list_all_returns_every_document() {
    let school = MemoryCollection::new("school");
    for name in ["Holberton school", "UCSF", "Stanford"] {
        assert_ok!(insert_school(&school, [("name", name)]).await);
    }

    let documents = assert_ok!(list_all(&school).await);
    assert_eq!(documents.len() as u64, assert_ok!(count_documents(&school).await));
    let names: Vec<_> = documents.iter().map(|d| d.get_str("name").unwrap()).collect();
    assert_eq!(names, vec!["Holberton school", "UCSF", "Stanford"]);
}

#[tokio::test]
async fn update_topics_sets_topics_on_every_matching_school() {
    let school = MemoryCollection::with_documents(
        "school",
        vec![
            doc! { "name": "Holberton school" },
            doc! { "name": "UCSF" },
            doc! { "name": "Holberton school", "topics": ["C"] },
        ],
    );

    let modified = assert_ok!(update_topics(&school, "Holberton school", ["Sys admin", "AI", "Algorithm"]).await);
    assert_eq!(modified, 2);

    let expected = Bson::from(vec!["Sys admin", "AI", "Algorithm"]);
    for document in assert_ok!(list_all(&school).await) {
        if document.get_str("name").unwrap() == "Holberton school" {
            assert_eq!(document.get("topics"), Some(&expected));
        } else {
            assert_eq!(document.get("topics"), None);
        }
    }

    // Same topics again: matched, not modified.
    let modified = assert_ok!(update_topics(&school, "Holberton school", ["Sys admin", "AI", "Algorithm"]).await);
    assert_eq!(modified, 0);
}

#[tokio::test]
async fn update_topics_uses_exact_name_match() {
    let school = MemoryCollection::with_documents(
        "school",
        vec![doc! { "name": "holberton school" }, doc! { "name": "Holberton school " }],
    );
    assert_eq!(assert_ok!(update_topics(&school, "Holberton school", ["C"]).await), 0);
}

#[tokio::test]
async fn schools_by_topic_reads_singular_topic_field() {
    let school = MemoryCollection::with_documents(
        "school",
        vec![
            doc! { "name": "Holberton school", "topic": ["Algo", "C", "Python"] },
            doc! { "name": "UCSF", "topic": "Python" },
            doc! { "name": "Stanford", "topics": ["Python"] },
        ],
    );

    let schools = assert_ok!(schools_by_topic(&school, "Python").await);
    let names: Vec<_> = schools.iter().map(|d| d.get_str("name").unwrap()).collect();
    assert_eq!(names, vec!["Holberton school", "UCSF"]);

    // update_topics writes the plural field, which schools_by_topic ignores.
    assert_ok!(update_topics(&school, "UCSF", ["Rust"]).await);
    assert!(assert_ok!(schools_by_topic(&school, "Rust").await).is_empty());
}

#[tokio::test]
async fn top_students_ranks_by_average_score() {
    let students = MemoryCollection::new("students");
    assert_ok!(
        insert_school(
            &students,
            [
                ("name", Bson::from("School2")),
                ("topics", Bson::from(vec![doc! { "score": 70 }])),
            ],
        )
        .await
    );
    assert_ok!(
        insert_school(
            &students,
            [
                ("name", Bson::from("School1")),
                ("topics", Bson::from(vec![doc! { "score": 80 }, doc! { "score": 90 }])),
            ],
        )
        .await
    );

    let ranked = assert_ok!(top_students(&students).await);
    let ranked: Vec<StudentAverage> = assert_ok!(decode(ranked));

    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].display_name().as_deref(), Some("School1"));
    assert_eq!(ranked[0].average_score, Some(85.0));
    assert_eq!(ranked[1].display_name().as_deref(), Some("School2"));
    assert_eq!(ranked[1].average_score, Some(70.0));
    assert!(ranked.iter().all(|row| row.id.is_some()));
}

#[tokio::test]
async fn top_students_decodes_numeric_names() {
    let students = MemoryCollection::new("students");
    assert_ok!(
        insert_school(
            &students,
            [
                ("name", Bson::Int64(2024)),
                ("topics", Bson::from(vec![doc! { "score": 60 }])),
            ],
        )
        .await
    );
    assert_ok!(
        insert_school(
            &students,
            [
                ("name", Bson::from("Ann")),
                ("topics", Bson::from(vec![doc! { "score": 90 }])),
            ],
        )
        .await
    );

    let ranked: Vec<StudentAverage> = assert_ok!(decode(assert_ok!(top_students(&students).await)));

    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].display_name().as_deref(), Some("Ann"));
    assert_eq!(ranked[1].name, Some(Bson::Int64(2024)));
    assert_eq!(ranked[1].display_name().as_deref(), Some("2024"));
    assert_eq!(ranked[1].average_score, Some(60.0));
}

#[tokio::test]
async fn top_students_projection_has_only_id_name_and_average() {
    let students = MemoryCollection::with_documents(
        "students",
        vec![doc! { "name": "Bob", "age": 20, "topics": [{ "title": "Algo", "score": 10 }] }],
    );
    let ranked = assert_ok!(top_students(&students).await);
    let keys: Vec<_> = ranked[0].keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["_id", "name", AVERAGE_SCORE]);
}

fn student(name: String, scores: Vec<i32>) -> Document {
    let topics: Vec<Bson> = scores
        .into_iter()
        .map(|score| Bson::Document(doc! { "score": score }))
        .collect();
    doc! { "name": name, "topics": topics }
}

proptest! {
    #[test]
    fn top_students_is_sorted_non_increasing(
        scores in prop::collection::vec(prop::collection::vec(0i32..100, 1..6), 0..20)
    ) {
        let documents: Vec<Document> = scores
            .into_iter()
            .enumerate()
            .map(|(i, s)| student(format!("student-{i}"), s))
            .collect();
        let students = MemoryCollection::with_documents("students", documents);

        let ranked = tokio_test::block_on(top_students(&students)).unwrap();
        let averages: Vec<f64> = ranked
            .iter()
            .map(|row| row.get_f64(AVERAGE_SCORE).unwrap())
            .collect();

        for pair in averages.windows(2) {
            prop_assert!(pair[0] >= pair[1]);
        }
    }

    #[test]
    fn update_topics_modifies_every_school_with_the_name(
        names in prop::collection::vec(prop::sample::select(vec!["A", "B", "C"]), 0..15),
        topics in prop::collection::vec("[a-z]{1,8}", 1..4)
    ) {
        let documents: Vec<Document> = names
            .iter()
            .map(|n| {
                let name = *n;
                doc! { "name": name }
            })
            .collect();
        let school = MemoryCollection::with_documents("school", documents);

        let modified = tokio_test::block_on(update_topics(&school, "B", topics.clone())).unwrap();
        let expected = names.iter().filter(|n| **n == "B").count() as u64;
        prop_assert_eq!(modified, expected);

        let topics = Bson::from(topics);
        for document in tokio_test::block_on(list_all(&school)).unwrap() {
            if document.get_str("name").unwrap() == "B" {
                prop_assert_eq!(document.get("topics"), Some(&topics));
            }
        }
    }
}
