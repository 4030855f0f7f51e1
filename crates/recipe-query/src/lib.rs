//! Recipe Query - filter composition and paged reads over the recipe store
//!
//! Request flow:
//! - [`params`] decodes raw query-string values into filter criteria
//! - [`filter`] folds the criteria into a single [`Predicate`]
//! - [`executor`] runs the predicate against a [`RecipeStore`]
//! - [`page`] wraps the result in the `{page, limit, total, data}` envelope
//!
//! Stores:
//! - PostgreSQL ([`PgRecipeStore`])
//! - In-memory ([`MemoryRecipeStore`])

pub mod error;
pub mod executor;
pub mod filter;
pub mod memory;
pub mod model;
pub mod page;
pub mod params;
pub mod postgres;
pub mod store;

pub use error::QueryError;
pub use executor::QueryExecutor;
pub use filter::{build_predicate, CompareOp, FilterCriterion, Number, NumericField, Predicate, TextField};
pub use memory::MemoryRecipeStore;
pub use model::{NewRecipe, Recipe};
pub use page::{Page, PageRequest, PageResponse, Sort, SortDirection, SortField, Window};
pub use params::{ListParams, SearchParams, SearchRequest};
pub use postgres::PgRecipeStore;
pub use store::RecipeStore;
