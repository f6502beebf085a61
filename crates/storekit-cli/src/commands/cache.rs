//! `storekit cache` subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use storekit_cache::{Cache, CacheOptions, CacheValue, FlushScope, Replay, STORE};

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::{print_output, FormattedOutput};

/// Store and read values through the instrumented cache
#[derive(Debug, Parser)]
pub struct CacheCommand {
    #[command(subcommand)]
    pub action: CacheAction,
}

#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// Store a value and print its generated key
    ///
    /// Uses the configured flush scope, which defaults to flushing the whole database.
    Store {
        value: String,
        #[arg(long = "as", value_enum, default_value = "str")]
        kind: ValueKind,
    },

    /// Read the value stored under a key
    Get {
        key: String,
        #[arg(long = "as", value_enum, default_value = "str")]
        kind: ValueKind,
    },

    /// How many times an operation was called
    Count {
        #[arg(default_value = STORE)]
        name: String,
    },

    /// Recorded calls of an operation
    Replay {
        #[arg(default_value = STORE)]
        name: String,
    },
}

/// How a value is encoded or decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ValueKind {
    #[default]
    Str,
    Int,
    Float,
    Bytes,
}

impl ValueKind {
    /// Interpret command-line text as a cache value.
    pub fn parse(self, text: &str) -> Result<CacheValue, CliError> {
        match self {
            Self::Str => Ok(CacheValue::from(text)),
            Self::Bytes => Ok(CacheValue::from(text.as_bytes())),
            Self::Int => text
                .parse::<i64>()
                .map(CacheValue::from)
                .map_err(|e| CliError::validation("value", format!("not an integer: {e}"))),
            Self::Float => text
                .parse::<f64>()
                .map(CacheValue::from)
                .map_err(|e| CliError::validation("value", format!("not a float: {e}"))),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct KeyOutput {
    pub key: String,
}

impl FormattedOutput for KeyOutput {
    fn format_text(&self) -> String {
        self.key.clone()
    }
}

#[derive(Debug, Serialize)]
pub struct ValueOutput {
    pub key: String,
    pub value: Option<serde_json::Value>,
}

impl FormattedOutput for ValueOutput {
    fn format_text(&self) -> String {
        match &self.value {
            None => "(nil)".to_string(),
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CallCountOutput {
    pub name: String,
    pub count: i64,
}

impl FormattedOutput for CallCountOutput {
    fn format_text(&self) -> String {
        self.count.to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct ReplayOutput {
    pub name: String,
    pub count: i64,
    pub calls: Vec<CallRecord>,
    #[serde(skip)]
    rendered: String,
}

#[derive(Debug, Serialize)]
pub struct CallRecord {
    pub input: String,
    pub output: String,
}

impl From<Replay> for ReplayOutput {
    fn from(replay: Replay) -> Self {
        let rendered = replay.to_string();
        Self {
            name: replay.name,
            count: replay.count,
            calls: replay
                .calls
                .into_iter()
                .map(|(input, output)| CallRecord { input, output })
                .collect(),
            rendered,
        }
    }
}

impl FormattedOutput for ReplayOutput {
    fn format_text(&self) -> String {
        self.rendered.clone()
    }
}

/// Build a cache over the context's store. Read-only actions never flush.
async fn open_cache(ctx: &CommandContext, flush: bool) -> Result<Cache, CliError> {
    let mut options = CacheOptions::from(&ctx.config.cache);
    if !flush {
        options.flush = FlushScope::None;
    }
    Ok(Cache::with_options(ctx.key_value_store().await?, options).await?)
}

async fn read_value(
    cache: &Cache,
    key: &str,
    kind: ValueKind,
) -> Result<Option<serde_json::Value>, CliError> {
    let value = match kind {
        ValueKind::Str => cache.get_str(key).await?.map(serde_json::Value::from),
        ValueKind::Int => cache.get_int(key).await?.map(serde_json::Value::from),
        ValueKind::Float => cache.get_float(key).await?.map(serde_json::Value::from),
        ValueKind::Bytes => cache
            .get(key)
            .await?
            .map(|raw| serde_json::Value::from(raw.escape_ascii().to_string())),
    };
    Ok(value)
}

impl CacheCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        match &self.action {
            CacheAction::Store { value, kind } => {
                let value = kind.parse(value)?;
                let cache = open_cache(ctx, true).await?;
                let key = cache.store(value).await?;
                print_output(ctx, &KeyOutput { key })
            }
            CacheAction::Get { key, kind } => {
                let cache = open_cache(ctx, false).await?;
                let value = read_value(&cache, key, *kind).await?;
                print_output(
                    ctx,
                    &ValueOutput {
                        key: key.clone(),
                        value,
                    },
                )
            }
            CacheAction::Count { name } => {
                let cache = open_cache(ctx, false).await?;
                let count = cache.call_count(name).await?;
                print_output(
                    ctx,
                    &CallCountOutput {
                        name: name.clone(),
                        count,
                    },
                )
            }
            CacheAction::Replay { name } => {
                let cache = open_cache(ctx, false).await?;
                let replay = cache.replay(name).await?;
                print_output(ctx, &ReplayOutput::from(replay))
            }
        }
    }
}
