//! End-to-end list/search behaviour over the in-memory store

use std::sync::Arc;

use recipe_query::{
    ListParams, MemoryRecipeStore, NewRecipe, QueryError, QueryExecutor, Recipe, SearchParams,
};

fn sample_recipes() -> Vec<NewRecipe> {
    vec![
        NewRecipe {
            title: Some("Tomato Soup".to_string()),
            cuisine: Some("Southern Recipes".to_string()),
            rating: Some(4.5),
            total_time: Some(20),
            ..Default::default()
        },
        NewRecipe {
            title: Some("Bean Stew".to_string()),
            cuisine: Some("Southern Recipes".to_string()),
            rating: Some(3.0),
            total_time: Some(45),
            ..Default::default()
        },
    ]
}

fn catalog() -> Vec<NewRecipe> {
    let mut recipes = sample_recipes();
    recipes.extend([
        NewRecipe {
            title: Some("Chicken Noodle SOUP".to_string()),
            cuisine: Some("Soups".to_string()),
            rating: Some(4.8),
            total_time: Some(60),
            ..Default::default()
        },
        NewRecipe {
            title: Some("Mystery Casserole".to_string()),
            cuisine: Some("southern recipes".to_string()),
            rating: None,
            total_time: None,
            ..Default::default()
        },
        NewRecipe {
            title: None,
            cuisine: None,
            rating: Some(0.0),
            total_time: Some(5),
            ..Default::default()
        },
    ]);
    recipes
}

fn executor(recipes: Vec<NewRecipe>) -> QueryExecutor {
    QueryExecutor::new(Arc::new(MemoryRecipeStore::with_recipes(recipes)))
}

fn titles(records: &[Recipe]) -> Vec<Option<&str>> {
    records.iter().map(|r| r.title.as_deref()).collect()
}

fn ids(records: &[Recipe]) -> Vec<i64> {
    let mut ids: Vec<i64> = records.iter().map(|r| r.id).collect();
    ids.sort_unstable();
    ids
}

fn search() -> SearchParams {
    SearchParams {
        limit: Some("100".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn scenario_comparison_filters() {
    let exec = executor(sample_recipes());
    let response = exec
        .handle_search(&SearchParams {
            rating: Some(">4".to_string()),
            total_time: Some("<30".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(response.total, 1);
    assert_eq!(titles(&response.data), vec![Some("Tomato Soup")]);
}

#[tokio::test]
async fn scenario_title_filter() {
    let exec = executor(sample_recipes());
    let response = exec
        .handle_search(&SearchParams {
            title: Some("soup".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(titles(&response.data), vec![Some("Tomato Soup")]);
}

#[tokio::test]
async fn scenario_first_page_of_one() {
    let exec = executor(sample_recipes());
    let response = exec
        .handle_list(&ListParams {
            page: Some("1".to_string()),
            limit: Some("1".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(response.page, 1);
    assert_eq!(response.limit, 1);
    assert_eq!(response.total, 2);
    assert_eq!(titles(&response.data), vec![Some("Tomato Soup")]);
}

#[tokio::test]
async fn list_pages_are_bounded_sorted_and_counted() {
    let exec = executor(catalog());
    for limit in 1..=6u32 {
        let response = exec
            .handle_list(&ListParams {
                page: Some("1".to_string()),
                limit: Some(limit.to_string()),
            })
            .await
            .unwrap();
        assert!(response.data.len() <= limit as usize);
        assert_eq!(response.total, 5);

        let ratings: Vec<f32> = response.data.iter().filter_map(|r| r.rating).collect();
        assert!(ratings.windows(2).all(|w| w[0] >= w[1]), "not descending: {:?}", ratings);
    }
}

#[tokio::test]
async fn search_is_the_conjunction_of_its_filters() {
    let exec = executor(catalog());
    let everything = exec.handle_search(&search()).await.unwrap();
    assert_eq!(everything.total, 5);

    let combined = exec
        .handle_search(&SearchParams {
            cuisine: Some("SOUTHERN RECIPES".to_string()),
            rating: Some(">1".to_string()),
            ..search()
        })
        .await
        .unwrap();

    let expected: Vec<i64> = ids(&everything.data)
        .into_iter()
        .filter(|id| {
            let r = everything.data.iter().find(|r| r.id == *id).unwrap();
            r.cuisine.as_deref().map(str::to_lowercase).as_deref() == Some("southern recipes")
                && r.rating.is_some_and(|v| v > 1.0)
        })
        .collect();
    assert_eq!(ids(&combined.data), expected);
    assert_eq!(combined.total, 2);
}

#[tokio::test]
async fn title_search_is_case_insensitive() {
    let exec = executor(catalog());
    let lower = exec
        .handle_search(&SearchParams {
            title: Some("soup".to_string()),
            ..search()
        })
        .await
        .unwrap();
    let upper = exec
        .handle_search(&SearchParams {
            title: Some("SOUP".to_string()),
            ..search()
        })
        .await
        .unwrap();
    assert_eq!(lower, upper);
    assert_eq!(lower.total, 2);
}

#[tokio::test]
async fn null_ratings_never_match_comparisons() {
    let exec = executor(catalog());
    for rating in [">0", "<5", "=0"] {
        let response = exec
            .handle_search(&SearchParams {
                rating: Some(rating.to_string()),
                ..search()
            })
            .await
            .unwrap();
        assert!(
            response.data.iter().all(|r| r.rating.is_some()),
            "rating{} returned an unrated recipe",
            rating
        );
    }
}

#[tokio::test]
async fn equals_zero_matches_only_zero_rated() {
    let exec = executor(catalog());
    let response = exec
        .handle_search(&SearchParams {
            rating: Some("=0".to_string()),
            ..search()
        })
        .await
        .unwrap();
    assert_eq!(response.total, 1);
    assert_eq!(titles(&response.data), vec![None]);
}

#[tokio::test]
async fn malformed_comparisons_are_errors() {
    let exec = executor(catalog());
    for raw in ["4.5", ">abc"] {
        let err = exec
            .handle_search(&SearchParams {
                rating: Some(raw.to_string()),
                ..search()
            })
            .await
            .unwrap_err();
        assert!(
            matches!(err, QueryError::InvalidFilterEncoding { param: "rating", .. }),
            "rating={} gave {:?}",
            raw,
            err
        );
    }
}

#[tokio::test]
async fn search_past_the_end() {
    let exec = executor(catalog());
    let response = exec
        .handle_search(&SearchParams {
            title: Some("soup".to_string()),
            page: Some("9999".to_string()),
            limit: Some("10".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(response.data.is_empty());
    assert_eq!(response.total, 2);
    assert_eq!(response.page, 9999);
}

#[tokio::test]
async fn explicit_sort_orders_search_results() {
    let exec = executor(catalog());
    let response = exec
        .handle_search(&SearchParams {
            sort: Some("total_time".to_string()),
            order: Some("desc".to_string()),
            ..search()
        })
        .await
        .unwrap();
    let times: Vec<Option<i32>> = response.data.iter().map(|r| r.total_time).collect();
    assert_eq!(times, vec![Some(60), Some(45), Some(20), Some(5), None]);
}
