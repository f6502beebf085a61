//! Command implementations.

mod cache;
mod schools;
mod students;

pub use cache::{CacheAction, CacheCommand, ValueKind};
pub use schools::{parse_field, SchoolsAction, SchoolsCommand};
pub use students::{StudentsAction, StudentsCommand};
