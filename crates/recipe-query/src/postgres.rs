//! PostgreSQL recipe store.
//!
//! Every user-supplied value is sent as a bound parameter; only column names
//! and keywords chosen by this crate are pushed as SQL text.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, info};

use crate::error::QueryError;
use crate::filter::Predicate;
use crate::model::{NewRecipe, Recipe};
use crate::page::{Sort, Window};
use crate::store::RecipeStore;

const SELECT_COLUMNS: &str = "id, title, cuisine, rating, prep_time, cook_time, total_time, \
                              description, serves, ingredients, instructions, nutrients";

const INSERT_COLUMNS: &str = "title, cuisine, rating, prep_time, cook_time, total_time, \
                              description, serves, ingredients, instructions, nutrients";

/// Rows per INSERT statement; 11 binds per row keeps well under the
/// 65535-parameter limit.
const INSERT_CHUNK: usize = 500;

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS recipes (
    id BIGSERIAL PRIMARY KEY,
    title TEXT,
    cuisine TEXT,
    rating REAL,
    prep_time INTEGER,
    cook_time INTEGER,
    total_time INTEGER,
    description TEXT,
    serves TEXT,
    ingredients TEXT,
    instructions TEXT,
    nutrients TEXT
)
"#;

pub struct PgRecipeStore {
    pool: PgPool,
}

impl PgRecipeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, QueryError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Create the `recipes` table if it is missing.
    pub async fn ensure_table(&self) -> Result<(), QueryError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        info!("recipes table ready");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// `SELECT COUNT(*)` over the records matching `predicate`.
pub fn count_query(predicate: &Predicate) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM recipes");
    predicate.push_where(&mut qb);
    qb
}

/// Paged `SELECT` over the records matching `predicate`.
pub fn page_query(
    predicate: &Predicate,
    sort: Option<&Sort>,
    window: Window,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM recipes", SELECT_COLUMNS));
    predicate.push_where(&mut qb);
    if let Some(sort) = sort {
        sort.push_order_by(&mut qb);
    }
    qb.push(" LIMIT ")
        .push_bind(i64::from(window.limit))
        .push(" OFFSET ")
        .push_bind(i64::try_from(window.offset).unwrap_or(i64::MAX));
    qb
}

/// Multi-row `INSERT` for one chunk of recipes.
pub fn insert_query(chunk: &[NewRecipe]) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("INSERT INTO recipes ({}) ", INSERT_COLUMNS));
    qb.push_values(chunk, |mut row, recipe| {
        row.push_bind(recipe.title.clone())
            .push_bind(recipe.cuisine.clone())
            .push_bind(recipe.rating)
            .push_bind(recipe.prep_time)
            .push_bind(recipe.cook_time)
            .push_bind(recipe.total_time)
            .push_bind(recipe.description.clone())
            .push_bind(recipe.serves.clone())
            .push_bind(recipe.ingredients.clone())
            .push_bind(recipe.instructions.clone())
            .push_bind(recipe.nutrients.clone());
    });
    qb
}

/// One [`insert_query`] per `INSERT_CHUNK` recipes.
pub fn insert_queries(
    recipes: &[NewRecipe],
) -> impl Iterator<Item = QueryBuilder<'static, Postgres>> + '_ {
    recipes.chunks(INSERT_CHUNK).map(insert_query)
}

#[async_trait]
impl RecipeStore for PgRecipeStore {
    async fn count(&self, predicate: &Predicate) -> Result<u64, QueryError> {
        let mut qb = count_query(predicate);
        debug!("count query: {}", qb.sql());
        let total = qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        Ok(u64::try_from(total).unwrap_or(0))
    }

    async fn fetch(
        &self,
        predicate: &Predicate,
        sort: Option<&Sort>,
        window: Window,
    ) -> Result<Vec<Recipe>, QueryError> {
        let mut qb = page_query(predicate, sort, window);
        debug!("page query: {}", qb.sql());
        let rows = qb.build_query_as::<Recipe>().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn insert_all(&self, recipes: &[NewRecipe]) -> Result<u64, QueryError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0u64;

        for mut qb in insert_queries(recipes) {
            inserted += qb.build().execute(&mut *tx).await?.rows_affected();
            debug!("inserted {} of {} recipes", inserted, recipes.len());
        }

        tx.commit().await?;
        Ok(inserted)
    }
}
