//! Query executor: predicate + page request in, page of recipes out.

use std::sync::Arc;

use tracing::debug;

use crate::error::QueryError;
use crate::filter::{build_predicate, Predicate};
use crate::model::Recipe;
use crate::page::{Page, PageRequest, PageResponse, Sort};
use crate::params::{ListParams, SearchParams};
use crate::store::RecipeStore;

/// Runs paged queries against a [`RecipeStore`]. Holds no per-request state.
#[derive(Clone)]
pub struct QueryExecutor {
    store: Arc<dyn RecipeStore>,
}

impl QueryExecutor {
    pub fn new(store: Arc<dyn RecipeStore>) -> Self {
        Self { store }
    }

    /// Unfiltered listing. Ordered by rating, highest first, unless the
    /// request carries its own sort.
    pub async fn list(&self, request: &PageRequest) -> Result<Page<Recipe>, QueryError> {
        let sort = request.sort.unwrap_or(Sort::rating_desc());
        self.run(&Predicate::Always, Some(&sort), request).await
    }

    /// Filtered query. Uses the store's natural order unless the request
    /// carries a sort.
    pub async fn search(
        &self,
        predicate: &Predicate,
        request: &PageRequest,
    ) -> Result<Page<Recipe>, QueryError> {
        self.run(predicate, request.sort.as_ref(), request).await
    }

    async fn run(
        &self,
        predicate: &Predicate,
        sort: Option<&Sort>,
        request: &PageRequest,
    ) -> Result<Page<Recipe>, QueryError> {
        let window = request.window();
        let total = self.store.count(predicate).await?;

        let records = if window.offset >= total {
            Vec::new()
        } else {
            self.store.fetch(predicate, sort, window).await?
        };

        debug!(
            page = request.page,
            limit = request.limit,
            total,
            returned = records.len(),
            "query executed"
        );

        Ok(Page { records, total })
    }

    /// Decode list parameters, run the listing and wrap it in the envelope.
    pub async fn handle_list(&self, params: &ListParams) -> Result<PageResponse<Recipe>, QueryError> {
        let request = params.parse()?;
        let page = self.list(&request).await?;
        Ok(PageResponse::assemble(&request, page))
    }

    /// Decode search parameters, build the predicate, run the search and
    /// wrap it in the envelope. Nothing reaches the store if decoding fails.
    pub async fn handle_search(
        &self,
        params: &SearchParams,
    ) -> Result<PageResponse<Recipe>, QueryError> {
        let request = params.parse()?;
        let predicate = build_predicate(&request.criteria)?;
        let page = self.search(&predicate, &request.page).await?;
        Ok(PageResponse::assemble(&request.page, page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryRecipeStore;
    use crate::model::NewRecipe;
    use crate::page::{SortDirection, SortField, Window};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn new_recipe(title: &str, rating: Option<f32>, total_time: Option<i32>) -> NewRecipe {
        NewRecipe {
            title: Some(title.to_string()),
            rating,
            total_time,
            ..Default::default()
        }
    }

    fn executor(recipes: Vec<NewRecipe>) -> QueryExecutor {
        QueryExecutor::new(Arc::new(MemoryRecipeStore::with_recipes(recipes)))
    }

    fn titles(records: &[Recipe]) -> Vec<&str> {
        records.iter().filter_map(|r| r.title.as_deref()).collect()
    }

    /// Store that fails every call and counts how often it was touched.
    #[derive(Default)]
    struct FailingStore {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RecipeStore for FailingStore {
        async fn count(&self, _predicate: &Predicate) -> Result<u64, QueryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(QueryError::StoreUnavailable("connection refused".to_string()))
        }

        async fn fetch(
            &self,
            _predicate: &Predicate,
            _sort: Option<&Sort>,
            _window: Window,
        ) -> Result<Vec<Recipe>, QueryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(QueryError::StoreUnavailable("connection refused".to_string()))
        }

        async fn insert_all(&self, _recipes: &[NewRecipe]) -> Result<u64, QueryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(QueryError::StoreUnavailable("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn list_sorts_by_rating_desc() {
        let exec = executor(vec![
            new_recipe("Bean Stew", Some(3.0), Some(45)),
            new_recipe("Unrated", None, None),
            new_recipe("Tomato Soup", Some(4.5), Some(20)),
        ]);
        let page = exec.list(&PageRequest::new(1, 10)).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(titles(&page.records), vec!["Tomato Soup", "Bean Stew", "Unrated"]);
    }

    #[tokio::test]
    async fn list_honours_an_explicit_sort() {
        let exec = executor(vec![
            new_recipe("b", Some(3.0), Some(45)),
            new_recipe("a", Some(4.5), Some(20)),
        ]);
        let request = PageRequest::new(1, 10).with_sort(Sort::new(SortField::Title, SortDirection::Asc));
        let page = exec.list(&request).await.unwrap();
        assert_eq!(titles(&page.records), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn total_ignores_limit() {
        let exec = executor((0..7).map(|i| new_recipe(&format!("r{}", i), Some(i as f32 / 2.0), None)).collect());
        let page = exec.list(&PageRequest::new(2, 3)).await.unwrap();
        assert_eq!(page.total, 7);
        assert_eq!(titles(&page.records), vec!["r3", "r2", "r1"]);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty_with_true_total() {
        let exec = executor(vec![
            new_recipe("Tomato Soup", Some(4.5), Some(20)),
            new_recipe("Bean Stew", Some(3.0), Some(45)),
        ]);
        let page = exec.list(&PageRequest::new(9999, 10)).await.unwrap();
        assert!(page.records.is_empty());
        assert_eq!(page.total, 2);
    }

    #[tokio::test]
    async fn search_uses_natural_order_without_sort() {
        let exec = executor(vec![
            new_recipe("Soup B", Some(1.0), None),
            new_recipe("Soup A", Some(5.0), None),
        ]);
        let response = exec
            .handle_search(&SearchParams {
                title: Some("soup".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(titles(&response.data), vec!["Soup B", "Soup A"]);
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        let store = Arc::new(FailingStore::default());
        let exec = QueryExecutor::new(store.clone());
        let err = exec.list(&PageRequest::new(1, 10)).await.unwrap_err();
        assert!(matches!(err, QueryError::StoreUnavailable(_)));
        assert_eq!(store.calls.load(Ordering::SeqCst), 1, "no retry");
    }

    #[tokio::test]
    async fn invalid_params_never_reach_the_store() {
        let store = Arc::new(FailingStore::default());
        let exec = QueryExecutor::new(store.clone());

        let err = exec
            .handle_search(&SearchParams {
                rating: Some("4.5".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::InvalidFilterEncoding { param: "rating", .. }));

        let err = exec
            .handle_list(&ListParams {
                page: Some("0".to_string()),
                limit: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::InvalidPagination { param: "page", .. }));

        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn handle_list_echoes_external_page() {
        let exec = executor(vec![
            new_recipe("Tomato Soup", Some(4.5), Some(20)),
            new_recipe("Bean Stew", Some(3.0), Some(45)),
        ]);
        let response = exec
            .handle_list(&ListParams {
                page: Some("2".to_string()),
                limit: Some("1".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(response.page, 2);
        assert_eq!(response.limit, 1);
        assert_eq!(response.total, 2);
        assert_eq!(titles(&response.data), vec!["Bean Stew"]);
    }
}
