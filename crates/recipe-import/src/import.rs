//! Idempotent one-time import.

use std::path::Path;

use recipe_query::{Predicate, RecipeStore};
use tracing::info;

use crate::error::ImportError;
use crate::loader::read_recipes_file;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The store already held records; the file was not read.
    Skipped { existing: u64 },
    Imported { inserted: u64 },
}

/// Load `path` into `store` unless the store already holds any recipe.
///
/// The whole file is decoded before anything is written, so a malformed
/// record leaves the store empty.
pub async fn import_if_empty(
    store: &dyn RecipeStore,
    path: &Path,
) -> Result<ImportOutcome, ImportError> {
    let existing = store.count(&Predicate::Always).await?;
    if existing > 0 {
        info!("{} recipes already present, skipping import", existing);
        return Ok(ImportOutcome::Skipped { existing });
    }

    let recipes = read_recipes_file(path).await?;
    info!("Parsed {} recipes from {:?}", recipes.len(), path);

    let inserted = store.insert_all(&recipes).await?;
    info!("Imported {} recipes", inserted);
    Ok(ImportOutcome::Imported { inserted })
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipe_query::{MemoryRecipeStore, NewRecipe};
    use std::io::Write;

    fn recipes_file(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn imports_into_empty_store() {
        let store = MemoryRecipeStore::new();
        let file = recipes_file(r#"[{"title": "Tomato Soup"}, {"title": "Bean Stew"}]"#);

        let outcome = import_if_empty(&store, file.path()).await.unwrap();
        assert_eq!(outcome, ImportOutcome::Imported { inserted: 2 });
        assert_eq!(store.count(&Predicate::Always).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn second_run_is_a_no_op() {
        let store = MemoryRecipeStore::new();
        let file = recipes_file(r#"[{"title": "Tomato Soup"}]"#);

        import_if_empty(&store, file.path()).await.unwrap();
        let outcome = import_if_empty(&store, file.path()).await.unwrap();
        assert_eq!(outcome, ImportOutcome::Skipped { existing: 1 });
        assert_eq!(store.count(&Predicate::Always).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn populated_store_never_reads_the_file() {
        let store = MemoryRecipeStore::with_recipes(vec![NewRecipe::default()]);
        let outcome = import_if_empty(&store, Path::new("/nonexistent/recipes.json"))
            .await
            .unwrap();
        assert_eq!(outcome, ImportOutcome::Skipped { existing: 1 });
    }

    #[tokio::test]
    async fn malformed_file_writes_nothing() {
        let store = MemoryRecipeStore::new();
        let file = recipes_file(r#"[{"title": "ok"}, {"rating": "five"}]"#);

        let err = import_if_empty(&store, file.path()).await.unwrap_err();
        assert!(matches!(err, ImportError::InvalidField { index: 1, .. }));
        assert_eq!(store.count(&Predicate::Always).await.unwrap(), 0);
    }
}
