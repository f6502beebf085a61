//! CLI argument definitions using clap derive macros.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::builder::NonEmptyStringValueParser;
use clap::{ArgAction, Parser, Subcommand, ValueHint};
use storekit_cache::{KeyValueStore, MemoryStore, RedisStore};
use storekit_common_config::{vars, ConfigLoader, StorekitConfig};
use storekit_documents::{DocumentCollection, MemoryCollection, MongoCollection};
use tracing::debug;

use crate::commands::{CacheCommand, SchoolsCommand, StudentsCommand};
use crate::error::CliError;

/// storekit - MongoDB school helpers and an instrumented Redis cache
#[derive(Debug, Parser)]
#[command(
    name = "storekit",
    version,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(
        short,
        long,
        global = true,
        env = vars::STOREKIT_CONFIG,
        value_hint = ValueHint::FilePath
    )]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Use in-process backends instead of MongoDB and Redis
    #[arg(long, global = true)]
    pub memory: bool,

    /// Collection to operate on (overrides mongo.collection)
    #[arg(long, global = true, value_parser = NonEmptyStringValueParser::new())]
    pub collection: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Query and update the school collection
    Schools(SchoolsCommand),

    /// Rank students by average topic score
    Students(StudentsCommand),

    /// Store and read values through the instrumented cache
    Cache(CacheCommand),
}

impl Cli {
    /// Load configuration from `--config` or `.storekit/config.yaml` in the current directory
    pub fn load_config(&self) -> Result<StorekitConfig, CliError> {
        let config = match &self.config {
            Some(path) => {
                let project_dir = path.parent().unwrap_or_else(|| Path::new("."));
                ConfigLoader::new(project_dir).load_file(path)?
            }
            None => ConfigLoader::default().load()?,
        };
        Ok(config)
    }

    /// Execute the selected command
    pub async fn execute(self, mut config: StorekitConfig) -> Result<(), CliError> {
        if let Some(collection) = self.collection {
            config.mongo.collection = collection;
        }

        let ctx = if self.memory {
            CommandContext::in_memory(config, self.format)
        } else {
            CommandContext::new(config, self.format)
        };

        match self.command {
            Command::Schools(cmd) => cmd.execute(&ctx).await,
            Command::Students(cmd) => cmd.execute(&ctx).await,
            Command::Cache(cmd) => cmd.execute(&ctx).await,
        }
    }
}

enum Backends {
    Live,
    Memory {
        collection: Arc<MemoryCollection>,
        store: Arc<MemoryStore>,
    },
}

/// Context passed to all commands
pub struct CommandContext {
    pub config: StorekitConfig,
    pub format: OutputFormat,
    backends: Backends,
}

impl std::fmt::Debug for CommandContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandContext")
            .field("config", &self.config)
            .field("format", &self.format)
            .field("memory", &matches!(self.backends, Backends::Memory { .. }))
            .finish()
    }
}

impl CommandContext {
    /// Context that connects to the configured MongoDB and Redis servers.
    pub fn new(config: StorekitConfig, format: OutputFormat) -> Self {
        Self {
            config,
            format,
            backends: Backends::Live,
        }
    }

    /// Context backed by in-process stores that live as long as the context.
    pub fn in_memory(config: StorekitConfig, format: OutputFormat) -> Self {
        let collection = Arc::new(MemoryCollection::new(config.mongo.collection.clone()));
        Self {
            config,
            format,
            backends: Backends::Memory {
                collection,
                store: Arc::new(MemoryStore::new()),
            },
        }
    }

    /// The document collection commands operate on.
    pub async fn collection(&self) -> Result<Arc<dyn DocumentCollection>, CliError> {
        match &self.backends {
            Backends::Live => {
                debug!(database = %self.config.mongo.database, "Connecting to MongoDB");
                let collection = MongoCollection::connect(&self.config.mongo).await?;
                Ok(Arc::new(collection))
            }
            Backends::Memory { collection, .. } => Ok(collection.clone()),
        }
    }

    /// The key-value store behind the cache.
    pub async fn key_value_store(&self) -> Result<Arc<dyn KeyValueStore>, CliError> {
        match &self.backends {
            Backends::Live => {
                let store = RedisStore::connect(&self.config.redis).await?;
                Ok(Arc::new(store))
            }
            Backends::Memory { store, .. } => Ok(store.clone()),
        }
    }
}
