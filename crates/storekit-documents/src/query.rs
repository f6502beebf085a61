//! Typed filters, updates and aggregation stages.
//!
//! Each type renders to the MongoDB document the driver sends with
//! `to_document()`. The in-memory backend evaluates the same types directly.

use mongodb::bson::{Bson, Document};

/// Query filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every document: `{}`.
    All,
    /// Equality on a (possibly dotted) field: `{field: value}`.
    ///
    /// Follows MongoDB semantics: an array field matches when it contains the value.
    Eq { field: String, value: Bson },
}

impl Filter {
    pub fn all() -> Self {
        Self::All
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Self::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn to_document(&self) -> Document {
        let mut filter = Document::new();
        if let Self::Eq { field, value } = self {
            filter.insert(field.clone(), value.clone());
        }
        filter
    }
}

/// Update modifier.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// `{"$set": {field: value}}`.
    Set { field: String, value: Bson },
}

impl Update {
    pub fn set(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Self::Set {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn to_document(&self) -> Document {
        let Self::Set { field, value } = self;
        let mut fields = Document::new();
        fields.insert(field.clone(), value.clone());

        let mut update = Document::new();
        update.insert("$set", fields);
        update
    }
}

/// Aggregation expression used in a projection.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Field reference: `"$path"`.
    Field(String),
    /// Mean of the numeric values at `path`: `{"$avg": "$path"}`.
    Avg(String),
}

impl Expr {
    pub fn field(path: impl Into<String>) -> Self {
        Self::Field(path.into())
    }

    pub fn avg(path: impl Into<String>) -> Self {
        Self::Avg(path.into())
    }

    pub fn to_bson(&self) -> Bson {
        match self {
            Self::Field(path) => Bson::String(format!("${path}")),
            Self::Avg(path) => {
                let mut avg = Document::new();
                avg.insert("$avg", format!("${path}"));
                Bson::Document(avg)
            }
        }
    }
}

/// `$project` specification. `_id` always passes through.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    fields: Vec<(String, Expr)>,
}

impl Projection {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Add an output field computed by `expr`.
    pub fn field(mut self, name: impl Into<String>, expr: Expr) -> Self {
        self.fields.push((name.into(), expr));
        self
    }

    pub fn fields(&self) -> &[(String, Expr)] {
        &self.fields
    }

    pub fn to_document(&self) -> Document {
        let mut spec = Document::new();
        for (name, expr) in &self.fields {
            spec.insert(name.clone(), expr.to_bson());
        }
        spec
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::new()
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    fn as_i32(self) -> i32 {
        match self {
            Self::Ascending => 1,
            Self::Descending => -1,
        }
    }
}

/// Aggregation pipeline stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Project(Projection),
    Sort(Vec<(String, SortOrder)>),
}

impl Stage {
    /// Single-key sort.
    pub fn sort_by(field: impl Into<String>, order: SortOrder) -> Self {
        Self::Sort(vec![(field.into(), order)])
    }

    pub fn to_document(&self) -> Document {
        let mut stage = Document::new();
        match self {
            Self::Project(projection) => {
                stage.insert("$project", projection.to_document());
            }
            Self::Sort(keys) => {
                let mut spec = Document::new();
                for (field, order) in keys {
                    spec.insert(field.clone(), order.as_i32());
                }
                stage.insert("$sort", spec);
            }
        }
        stage
    }
}

/// Render a whole pipeline for the driver.
pub fn pipeline_documents(pipeline: &[Stage]) -> Vec<Document> {
    pipeline.iter().map(Stage::to_document).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_filter_documents() {
        assert_eq!(Filter::all().to_document(), doc! {});
        assert_eq!(
            Filter::eq("name", "Holberton school").to_document(),
            doc! { "name": "Holberton school" }
        );
    }

    #[test]
    fn test_update_set_document() {
        let update = Update::set("topics", vec!["Sys admin", "AI"]);
        assert_eq!(
            update.to_document(),
            doc! { "$set": { "topics": ["Sys admin", "AI"] } }
        );
    }

    #[test]
    fn test_projection_keeps_id_by_default() {
        let projection = Projection::new().field("name", Expr::field("name"));
        assert_eq!(projection.to_document(), doc! { "name": "$name" });
        assert_eq!(projection.fields().len(), 1);
    }

    #[test]
    fn test_pipeline_rendering() {
        let pipeline = vec![
            Stage::Project(
                Projection::new()
                    .field("name", Expr::field("name"))
                    .field("averageScore", Expr::avg("topics.score")),
            ),
            Stage::sort_by("averageScore", SortOrder::Descending),
        ];

        assert_eq!(
            pipeline_documents(&pipeline),
            vec![
                doc! { "$project": { "name": "$name", "averageScore": { "$avg": "$topics.score" } } },
                doc! { "$sort": { "averageScore": -1 } },
            ]
        );
    }
}
