// Template persistence

pub mod seed;
pub mod templates;

pub use templates::SqliteTemplateStore;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;

use crate::domain::Template;
use crate::error::AppError;

/// Storage seam for stored templates.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    async fn find_by_id(&self, template_id: &str) -> Result<Option<Template>, AppError>;

    /// Insert or replace. Template ids are stable external identifiers, so
    /// storing under an existing id redefines that template.
    async fn upsert(&self, template: &Template) -> Result<(), AppError>;

    /// Returns false when no such template existed.
    async fn delete(&self, template_id: &str) -> Result<bool, AppError>;

    async fn list(&self) -> Result<Vec<Template>, AppError>;
}

// Initialize database and run migrations
pub async fn init_db(db_path: &str) -> Result<SqlitePool> {
    // In-memory databases skip file handling entirely
    let database_url = if db_path == ":memory:" {
        db_path.to_string()
    } else {
        // Create the database file if it doesn't exist
        if !std::path::Path::new(db_path).exists() {
            std::fs::File::create(db_path)?;
        }
        format!("sqlite:{}", db_path)
    };

    // Connect to the database
    let pool = SqlitePool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    // Run migrations
    let migration_sql = include_str!("../../migrations/001_initial_schema.sql");
    sqlx::query(migration_sql)
        .execute(&pool)
        .await
        .context("Failed to run migrations")?;

    Ok(pool)
}
