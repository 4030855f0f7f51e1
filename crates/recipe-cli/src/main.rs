//! Recipe CLI - import and query the recipe catalog from the command line

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use recipe_import::{import_if_empty, read_recipes_file, report, ImportOutcome};
use recipe_query::{PgRecipeStore, QueryExecutor, SearchParams};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "recipes")]
#[command(about = "Import and search the recipe catalog")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a recipe JSON dump into an empty database
    Import {
        /// Path to the recipes JSON file
        #[arg(short, long)]
        file: PathBuf,

        /// PostgreSQL connection URL
        #[arg(long, env = "DATABASE_URL")]
        database_url: String,
    },

    /// Decode a recipe JSON dump and report null counts without importing it
    Check {
        /// Path to the recipes JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Search recipes and print the result page as JSON
    Search {
        /// Case-insensitive substring of the title
        #[arg(long)]
        title: Option<String>,

        /// Cuisine, matched exactly ignoring case
        #[arg(long)]
        cuisine: Option<String>,

        /// Rating comparison, e.g. ">4.5"
        #[arg(long, allow_hyphen_values = true)]
        rating: Option<String>,

        /// Total time comparison in minutes, e.g. "<30"
        #[arg(long, allow_hyphen_values = true)]
        total_time: Option<String>,

        #[arg(long)]
        page: Option<String>,

        #[arg(long)]
        limit: Option<String>,

        /// Sort column (id, title, cuisine, rating, prep_time, cook_time, total_time)
        #[arg(long)]
        sort: Option<String>,

        /// asc or desc
        #[arg(long)]
        order: Option<String>,

        /// PostgreSQL connection URL
        #[arg(long, env = "DATABASE_URL")]
        database_url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Import { file, database_url } => {
            run_import(&file, &database_url).await?;
        }
        Commands::Check { file } => {
            check_file(&file).await?;
        }
        Commands::Search {
            title,
            cuisine,
            rating,
            total_time,
            page,
            limit,
            sort,
            order,
            database_url,
        } => {
            let params = SearchParams {
                title,
                cuisine,
                rating,
                total_time,
                page,
                limit,
                sort,
                order,
            };
            run_search(params, &database_url).await?;
        }
    }

    Ok(())
}

async fn connect(database_url: &str) -> Result<PgRecipeStore> {
    let store = PgRecipeStore::connect(database_url, 1)
        .await
        .context("Failed to connect to database")?;
    Ok(store)
}

async fn run_import(file: &PathBuf, database_url: &str) -> Result<()> {
    let store = connect(database_url).await?;
    store.ensure_table().await?;

    match import_if_empty(&store, file).await? {
        ImportOutcome::Imported { inserted } => {
            println!("Imported {} recipes from {}", inserted, file.display());
        }
        ImportOutcome::Skipped { existing } => {
            println!("Database already holds {} recipes, nothing imported", existing);
        }
    }
    Ok(())
}

async fn check_file(file: &PathBuf) -> Result<()> {
    info!("Checking {:?}", file);
    let recipes = read_recipes_file(file).await?;
    let report = report(&recipes);

    println!("Recipes: {}", report.records);
    println!("Null values per field:");
    for (field, nulls) in &report.null_counts {
        println!("  {:<14} {}", field, nulls);
    }
    Ok(())
}

async fn run_search(params: SearchParams, database_url: &str) -> Result<()> {
    let store = connect(database_url).await?;
    let executor = QueryExecutor::new(Arc::new(store));

    let response = executor.handle_search(&params).await?;
    info!(
        "Page {} of {} matching recipes",
        response.page, response.total
    );
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
