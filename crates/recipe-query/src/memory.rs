//! In-process recipe store.
//!
//! Used when no database is configured, and by tests. Natural order is
//! insertion order.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::QueryError;
use crate::filter::Predicate;
use crate::model::{NewRecipe, Recipe};
use crate::page::{Sort, Window};
use crate::store::RecipeStore;

#[derive(Debug, Default)]
pub struct MemoryRecipeStore {
    records: RwLock<Vec<Recipe>>,
}

impl MemoryRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `recipes`, assigning ids from 1.
    pub fn with_recipes(recipes: Vec<NewRecipe>) -> Self {
        let records = recipes
            .into_iter()
            .zip(1..)
            .map(|(recipe, id)| recipe.with_id(id))
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl RecipeStore for MemoryRecipeStore {
    async fn count(&self, predicate: &Predicate) -> Result<u64, QueryError> {
        let records = self.records.read().await;
        Ok(records.iter().filter(|r| predicate.matches(r)).count() as u64)
    }

    async fn fetch(
        &self,
        predicate: &Predicate,
        sort: Option<&Sort>,
        window: Window,
    ) -> Result<Vec<Recipe>, QueryError> {
        let records = self.records.read().await;
        let mut matched: Vec<&Recipe> = records.iter().filter(|r| predicate.matches(r)).collect();
        if let Some(sort) = sort {
            matched.sort_by(|a, b| sort.compare(a, b));
        }

        let offset = usize::try_from(window.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(window.limit).unwrap_or(usize::MAX);
        debug!(
            "memory store: {} matched, returning window offset={} limit={}",
            matched.len(),
            offset,
            limit
        );

        Ok(matched.into_iter().skip(offset).take(limit).cloned().collect())
    }

    async fn insert_all(&self, recipes: &[NewRecipe]) -> Result<u64, QueryError> {
        let mut records = self.records.write().await;
        let next_id = records.last().map_or(1, |r| r.id + 1);
        records.extend(
            recipes
                .iter()
                .cloned()
                .zip(next_id..)
                .map(|(recipe, id)| recipe.with_id(id)),
        );
        Ok(recipes.len() as u64)
    }
}
