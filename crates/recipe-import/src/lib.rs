//! Recipe Import - one-time bulk load of the recipe JSON dump
//!
//! The import is idempotent by skipping: it does nothing once the store holds
//! any record.

pub mod error;
pub mod import;
pub mod loader;

pub use error::ImportError;
pub use import::{import_if_empty, ImportOutcome};
pub use loader::{parse_recipes, read_recipes_file, report, ImportReport};
