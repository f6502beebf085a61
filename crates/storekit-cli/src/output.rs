//! Output formatting for CLI commands.

use serde::Serialize;
use std::io::Write;

use crate::cli::{CommandContext, OutputFormat};
use crate::error::CliError;

/// Types that can be printed as text or JSON.
pub trait FormattedOutput: Serialize {
    fn format_text(&self) -> String;

    fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Render `value` in the context's format.
pub fn render<T: FormattedOutput>(format: OutputFormat, value: &T) -> Result<String, CliError> {
    Ok(match format {
        OutputFormat::Text => value.format_text(),
        OutputFormat::Json => value.format_json()?,
    })
}

/// Print formatted output to stdout
pub fn print_output<T: FormattedOutput>(ctx: &CommandContext, value: &T) -> Result<(), CliError> {
    write_output(ctx, value, std::io::stdout().lock())
}

/// Print formatted output to a writer
pub fn write_output<T, W>(ctx: &CommandContext, value: &T, mut writer: W) -> Result<(), CliError>
where
    T: FormattedOutput,
    W: Write,
{
    let output = render(ctx.format, value)?;
    writeln!(writer, "{output}")?;
    Ok(())
}
