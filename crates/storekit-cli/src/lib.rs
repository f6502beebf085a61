//! storekit CLI library.
//!
//! Argument definitions and command implementations for the `storekit`
//! binary.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use error::{CliError, Exit};
