//! Recipe Server - paginated, filterable read API over the recipe catalog

mod api;
mod config;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use recipe_import::{import_if_empty, ImportOutcome};
use recipe_query::{MemoryRecipeStore, PgRecipeStore, QueryExecutor, RecipeStore};

use crate::api::AppState;
use crate::config::{redact_database_url, ServerConfig};

async fn open_store(config: &ServerConfig) -> anyhow::Result<Arc<dyn RecipeStore>> {
    let Some(url) = config.database_url.as_deref() else {
        info!("DATABASE_URL not set. Running without persistence.");
        return Ok(Arc::new(MemoryRecipeStore::new()));
    };

    let store = PgRecipeStore::connect(url, config.db_max_connections)
        .await
        .with_context(|| format!("Failed to connect to {}", redact_database_url(url)))?;
    info!("Connected to database {}", redact_database_url(url));
    store
        .ensure_table()
        .await
        .context("Failed to prepare recipes table")?;
    Ok(Arc::new(store))
}

/// One-time startup import. Failures are logged and the server starts anyway.
async fn run_startup_import(store: &dyn RecipeStore, path: Option<&str>) {
    let Some(path) = path else {
        info!("RECIPES_JSON_PATH is empty, skipping startup import");
        return;
    };
    match import_if_empty(store, Path::new(path)).await {
        Ok(ImportOutcome::Imported { inserted }) => {
            info!("Startup import loaded {} recipes from {}", inserted, path)
        }
        Ok(ImportOutcome::Skipped { existing }) => {
            info!("Startup import skipped, store holds {} recipes", existing)
        }
        Err(e) => error!("Startup import from {} failed: {}", path, e),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = ServerConfig::from_env()?;
    info!("Store mode: {:?}", config.mode());

    let store = open_store(&config).await?;
    run_startup_import(store.as_ref(), config.recipes_json_path.as_deref()).await;

    let state = Arc::new(AppState {
        executor: QueryExecutor::new(store),
    });

    let app = api::router(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http());

    info!("Starting recipe server on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
