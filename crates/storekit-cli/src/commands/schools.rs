//! `storekit schools` subcommands.

use clap::{Parser, Subcommand};
use serde::Serialize;
use storekit_documents::bson::{Bson, Document};
use storekit_documents::{count_documents, insert_school, list_all, schools_by_topic, update_topics};

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::{print_output, FormattedOutput};

/// Query and update the school collection
#[derive(Debug, Parser)]
pub struct SchoolsCommand {
    #[command(subcommand)]
    pub action: SchoolsAction,
}

#[derive(Debug, Subcommand)]
pub enum SchoolsAction {
    /// List every school
    List,

    /// Replace the topics of every school with this exact name
    UpdateTopics {
        name: String,
        #[arg(required = true)]
        topics: Vec<String>,
    },

    /// Schools whose `topic` field matches
    ByTopic { topic: String },

    /// Insert a school from key=value fields
    Insert {
        #[arg(required = true, value_parser = parse_field)]
        fields: Vec<(String, Bson)>,
    },

    /// Count schools
    Count,
}

/// Parse `key=value`; integers, floats and booleans keep their type, anything else is a string.
pub fn parse_field(s: &str) -> Result<(String, Bson), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid key=value pair: {s}"))?;
    if key.is_empty() {
        return Err(format!("Missing field name in: {s}"));
    }

    let value = if let Ok(n) = value.parse::<i64>() {
        Bson::Int64(n)
    } else if let Ok(x) = value.parse::<f64>() {
        Bson::Double(x)
    } else if let Ok(b) = value.parse::<bool>() {
        Bson::Boolean(b)
    } else {
        Bson::String(value.to_string())
    };
    Ok((key.to_string(), value))
}

/// Documents as returned by the store.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct DocumentsOutput {
    pub documents: Vec<Document>,
}

impl FormattedOutput for DocumentsOutput {
    fn format_text(&self) -> String {
        if self.documents.is_empty() {
            return "No documents".to_string();
        }
        self.documents
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Serialize)]
pub struct ModifiedOutput {
    pub modified: u64,
}

impl FormattedOutput for ModifiedOutput {
    fn format_text(&self) -> String {
        format!("Modified {} document(s)", self.modified)
    }
}

#[derive(Debug, Serialize)]
pub struct InsertedOutput {
    pub id: Bson,
}

impl FormattedOutput for InsertedOutput {
    fn format_text(&self) -> String {
        match &self.id {
            Bson::ObjectId(oid) => oid.to_hex(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CountOutput {
    pub count: u64,
}

impl FormattedOutput for CountOutput {
    fn format_text(&self) -> String {
        self.count.to_string()
    }
}

impl SchoolsCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let collection = ctx.collection().await?;
        let collection = collection.as_ref();

        match &self.action {
            SchoolsAction::List => {
                let documents = list_all(collection).await?;
                print_output(ctx, &DocumentsOutput { documents })
            }
            SchoolsAction::UpdateTopics { name, topics } => {
                let modified = update_topics(collection, name, topics).await?;
                print_output(ctx, &ModifiedOutput { modified })
            }
            SchoolsAction::ByTopic { topic } => {
                let documents = schools_by_topic(collection, topic).await?;
                print_output(ctx, &DocumentsOutput { documents })
            }
            SchoolsAction::Insert { fields } => {
                let id = insert_school(collection, fields.iter().cloned()).await?;
                print_output(ctx, &InsertedOutput { id })
            }
            SchoolsAction::Count => {
                let count = count_documents(collection).await?;
                print_output(ctx, &CountOutput { count })
            }
        }
    }
}
