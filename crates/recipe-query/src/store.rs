//! RecipeStore trait: the persistence boundary for the query engine.

use async_trait::async_trait;

use crate::error::QueryError;
use crate::filter::Predicate;
use crate::model::{NewRecipe, Recipe};
use crate::page::{Sort, Window};

/// A recipe collection that can be filtered, ordered and paged.
///
/// Implementations report every failure as [`QueryError::StoreUnavailable`]
/// and never retry.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Count all records matching `predicate`, ignoring pagination.
    async fn count(&self, predicate: &Predicate) -> Result<u64, QueryError>;

    /// Fetch the `window` of records matching `predicate`. Without a `sort`
    /// the store's natural order is used.
    async fn fetch(
        &self,
        predicate: &Predicate,
        sort: Option<&Sort>,
        window: Window,
    ) -> Result<Vec<Recipe>, QueryError>;

    /// Insert records in one unit of work and return how many were written.
    /// Only the importer calls this.
    async fn insert_all(&self, recipes: &[NewRecipe]) -> Result<u64, QueryError>;
}
