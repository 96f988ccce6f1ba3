// Gateway entry point - CLI parsing, settings, storage init, serve

use anyhow::{Context, Result};
use clap::Arg;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stencil::client::HttpTreeStore;
use stencil::config::Settings;
use stencil::db::{self, SqliteTemplateStore};
use stencil::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse CLI arguments
    let matches = clap::Command::new("stencil")
        .about("Template gateway for hierarchical data stores")
        .arg(
            Arg::new("settings")
                .short('s')
                .long("settings")
                .value_name("SETTINGS")
                .help("Path to a YAML settings file"),
        )
        .arg(
            Arg::new("database")
                .short('d')
                .long("database")
                .value_name("DATABASE")
                .help("Path to the SQLite template store (overrides settings)"),
        )
        .arg(
            Arg::new("templates")
                .short('t')
                .long("templates")
                .value_name("TEMPLATES")
                .help("Path to a YAML file of templates to preload at startup"),
        )
        .get_matches();

    let mut settings = match matches.get_one::<String>("settings") {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };
    if let Some(database) = matches.get_one::<String>("database") {
        settings.database = database.clone();
    }

    // Initialize the template store
    let pool = db::init_db(&settings.database)
        .await
        .context("Failed to initialize database")?;
    let store = Arc::new(SqliteTemplateStore::new(pool));

    if let Some(path) = matches.get_one::<String>("templates") {
        let seeded = db::seed::seed_templates(store.as_ref(), path).await?;
        info!(count = seeded, file = %path, "preloaded templates");
    }

    let backend = Arc::new(HttpTreeStore::new(&settings.backend)?);
    let state = Arc::new(AppState::new(store, backend, &settings));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&settings.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", settings.listen_addr))?;
    info!(addr = %settings.listen_addr, backend = %settings.backend.base_url, "stencil listening");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
