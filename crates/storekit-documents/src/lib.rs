//! Query, update and aggregation helpers over a document collection.
//!
//! The helpers in [`helpers`] are thin pass-throughs: each builds a typed
//! [`Filter`], [`Update`] or pipeline of [`Stage`]s and hands it to a
//! [`DocumentCollection`]. Two backends are provided:
//!
//! - [`MongoCollection`] sends the request to MongoDB through the official driver.
//! - [`MemoryCollection`] evaluates it in process with the same semantics, for
//!   tests and offline runs.
//!
//! ```ignore
//! let schools = MemoryCollection::new("school");
//! insert_school(&schools, [("name", "Holberton school")]).await?;
//! let modified = update_topics(&schools, "Holberton school", ["Sys admin", "AI"]).await?;
//! ```

#![warn(clippy::all)]

pub mod collection;
pub mod error;
mod eval;
pub mod helpers;
pub mod query;

pub use collection::{DocumentCollection, MemoryCollection, MongoCollection, UpdateOutcome};
pub use error::{DocumentError, DocumentResult};
pub use helpers::{
    count_documents, decode, insert_school, list_all, schools_by_topic, top_students,
    top_students_pipeline, update_topics, StudentAverage, AVERAGE_SCORE,
};
pub use mongodb::bson;
pub use query::{Expr, Filter, Projection, SortOrder, Stage, Update};
