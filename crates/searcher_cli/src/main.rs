//! Searcher CLI - search GitHub repositories and keep a local copy in sync.

mod commands;
mod config;
mod shutdown;

use clap::{Parser, Subcommand};
use console::Term;
use searcher::SearchRequest;
use tracing_subscriber::EnvFilter;

use crate::commands::output::OutputFormat;

#[derive(Parser)]
#[command(name = "searcher")]
#[command(version)]
#[command(about = "Search GitHub repositories and keep a local copy in sync")]
#[command(
    long_about = "Searcher runs repository searches against the GitHub API and reconciles \
the results into a local database: new repositories are added, changed ones are \
updated in place, and unchanged ones are left alone. Stored repositories can be \
listed with language and star filters, or served over a small REST API."
)]
#[command(after_long_help = r#"EXAMPLES
    Search for Rust repositories about tetris, sorted by stars:
        $ searcher search tetris -l Rust -s stars

    List stored Java repositories with at least 100 stars, most forked first:
        $ searcher list -l java -m 100 -s forks

    Serve the REST API:
        $ searcher serve --bind 0.0.0.0:8080

CONFIGURATION
    Searcher reads configuration from:
      1. ~/.config/searcher/config.toml (or $XDG_CONFIG_HOME/searcher/config.toml)
      2. ./searcher.toml
      3. Environment variables (SEARCHER_* prefix, e.g., SEARCHER_DATABASE__URL)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    SEARCHER_DATABASE__URL           Database connection string (default: ~/.local/state/searcher/searcher.db)
    SEARCHER_GITHUB__API_BASE_URL    GitHub API base URL (default: https://api.github.com)
    SEARCHER_GITHUB__TIMEOUT_SECS    Request timeout in seconds, 0 to disable (default: 30)
    SEARCHER_SERVER__BIND            REST server address (default: 127.0.0.1:8080)
    SEARCHER_STORE__CONCURRENCY      Maximum concurrent store operations (default: 8)
    RUST_LOG                         Log filter (default: searcher=info,searcher_cli=info)
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search GitHub and reconcile the results into the local database
    Search {
        /// Search terms, passed to GitHub verbatim
        query: String,

        /// Restrict results to a language
        #[arg(short, long)]
        language: Option<String>,

        /// GitHub sort key (stars, forks, updated)
        #[arg(short, long)]
        sort: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
    /// List stored repositories
    List {
        /// Only repositories in this language (case-insensitive)
        #[arg(short, long)]
        language: Option<String>,

        /// Only repositories with at least this many stars
        #[arg(short, long)]
        min_stars: Option<i32>,

        /// Sort descending by stars (default), forks or lastUpdated
        #[arg(short, long)]
        sort: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Serve the REST API
    Serve {
        /// Address to bind (default from config or 127.0.0.1:8080)
        #[arg(short, long)]
        bind: Option<String>,
    },
}

#[derive(Subcommand)]
enum MigrateAction {
    /// Apply all pending migrations
    Up,
    /// Rollback the last migration
    Down,
    /// Show migration status
    Status,
    /// Fresh install - drop all tables and reapply migrations
    Fresh,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so JSON output on stdout stays machine-readable
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("searcher=info,searcher_cli=info"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(Term::stderr().is_term())
        .with_writer(std::io::stderr)
        .init();

    // Load configuration (config file -> env vars -> defaults)
    let config = config::Config::load();

    let cli = Cli::parse();

    let database_url = config
        .database_url()
        .ok_or("Failed to determine database URL: no home directory found")?;

    // Ensure the database directory exists for SQLite
    if database_url.starts_with("sqlite://") {
        let db_path = database_url.trim_start_matches("sqlite://");
        // Strip query parameters (e.g., ?mode=rwc) before path operations
        let db_path = db_path.split('?').next().unwrap_or(db_path);
        let db_path = std::path::Path::new(db_path);

        if db_path.is_relative() && !db_path.as_os_str().is_empty() {
            tracing::warn!(
                "Database path '{}' is relative - behavior depends on current directory. \
                 Consider using an absolute path.",
                db_path.display()
            );
        }

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
    }

    match cli.command {
        Commands::Search {
            query,
            language,
            sort,
            output,
        } => {
            let mut request = SearchRequest::new(query);
            request.language = language;
            request.sort = sort;
            commands::search::handle_search(request, output, &config, &database_url).await?;
        }
        Commands::List {
            language,
            min_stars,
            sort,
            output,
        } => {
            commands::list::handle_list(language, min_stars, sort, output, &config, &database_url)
                .await?;
        }
        Commands::Migrate { action } => {
            commands::migrate::handle_migrate(action, &database_url).await?;
        }
        Commands::Serve { bind } => {
            commands::serve::run_server(&config, &database_url, bind).await?;
        }
    }

    Ok(())
}
