// SQLite-backed template store

use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;

use super::TemplateStore;
use crate::domain::{RequestKind, Template};
use crate::error::{AppError, DbResultExt};

/// Template store backed by the shared SQLite pool.
#[derive(Clone)]
pub struct SqliteTemplateStore {
    pool: SqlitePool,
}

impl SqliteTemplateStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

// Row shape of the templates table
#[derive(Debug, sqlx::FromRow)]
struct TemplateRow {
    template_id: String,
    model: String,
    path_template: String,
    request_kind: String,
    include_descendants: bool,
    chained_template_id: Option<String>,
    extraction_path: Option<String>,
}

impl TemplateRow {
    // A row that no longer parses is a configuration problem, not a crash
    fn into_template(self) -> Result<Template, AppError> {
        let request_kind = RequestKind::parse(&self.request_kind).ok_or_else(|| {
            AppError::Configuration(format!(
                "Template '{}' has unknown request kind '{}'",
                self.template_id, self.request_kind
            ))
        })?;

        Ok(Template {
            id: self.template_id,
            model: self.model,
            path_template: self.path_template,
            request_kind,
            include_descendants: self.include_descendants,
            chained_template_id: self.chained_template_id.filter(|id| !id.trim().is_empty()),
            extraction_path: split_extraction_path(self.extraction_path.as_deref()),
        })
    }
}

// Extraction paths are stored comma-separated
fn split_extraction_path(stored: Option<&str>) -> Vec<String> {
    stored
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(str::to_string)
        .collect()
}

fn join_extraction_path(fields: &[String]) -> Option<String> {
    if fields.is_empty() {
        None
    } else {
        Some(fields.join(","))
    }
}

#[async_trait]
impl TemplateStore for SqliteTemplateStore {
    async fn find_by_id(&self, template_id: &str) -> Result<Option<Template>, AppError> {
        let row = sqlx::query_as::<_, TemplateRow>(
            "SELECT template_id, model, path_template, request_kind, include_descendants, chained_template_id, extraction_path
             FROM templates
             WHERE template_id = ?",
        )
        .bind(template_id)
        .fetch_optional(&self.pool)
        .await
        .db_err()?;

        row.map(TemplateRow::into_template).transpose()
    }

    async fn upsert(&self, template: &Template) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO templates
             (template_id, model, path_template, request_kind, include_descendants, chained_template_id, extraction_path)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(template_id)
             DO UPDATE SET model = ?, path_template = ?, request_kind = ?, include_descendants = ?, chained_template_id = ?, extraction_path = ?",
        )
        .bind(&template.id)
        .bind(&template.model)
        .bind(&template.path_template)
        .bind(template.request_kind.as_str())
        .bind(template.include_descendants)
        .bind(template.chained_template_id.as_deref())
        .bind(join_extraction_path(&template.extraction_path))
        .bind(&template.model)
        .bind(&template.path_template)
        .bind(template.request_kind.as_str())
        .bind(template.include_descendants)
        .bind(template.chained_template_id.as_deref())
        .bind(join_extraction_path(&template.extraction_path))
        .execute(&self.pool)
        .await
        .db_err()?;

        Ok(())
    }

    async fn delete(&self, template_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM templates WHERE template_id = ?")
            .bind(template_id)
            .execute(&self.pool)
            .await
            .db_err()?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<Template>, AppError> {
        let rows = sqlx::query_as::<_, TemplateRow>(
            "SELECT template_id, model, path_template, request_kind, include_descendants, chained_template_id, extraction_path
             FROM templates
             ORDER BY template_id",
        )
        .fetch_all(&self.pool)
        .await
        .db_err()?;

        rows.into_iter().map(TemplateRow::into_template).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;

    async fn test_store() -> SqliteTemplateStore {
        let pool = init_db(":memory:").await.expect("in-memory db");
        SqliteTemplateStore::new(pool)
    }

    fn sample_template() -> Template {
        Template {
            id: "get-coverage".to_string(),
            model: "ran-network".to_string(),
            path_template: "/coverage-area[@name='{{name}}']".to_string(),
            request_kind: RequestKind::Query,
            include_descendants: true,
            chained_template_id: Some("list-names".to_string()),
            extraction_path: vec!["zones".to_string(), "name".to_string()],
        }
    }

    #[tokio::test]
    async fn test_upsert_and_find_round_trip() {
        let store = test_store().await;
        let template = sample_template();

        store.upsert(&template).await.unwrap();
        let found = store.find_by_id("get-coverage").await.unwrap().unwrap();

        assert_eq!(found, template);
    }

    #[tokio::test]
    async fn test_find_missing_returns_none() {
        let store = test_store().await;
        assert!(store.find_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing() {
        let store = test_store().await;
        let mut template = sample_template();
        store.upsert(&template).await.unwrap();

        template.path_template = "/other".to_string();
        template.request_kind = RequestKind::Get;
        template.extraction_path.clear();
        store.upsert(&template).await.unwrap();

        let found = store.find_by_id(&template.id).await.unwrap().unwrap();
        assert_eq!(found.path_template, "/other");
        assert_eq!(found.request_kind, RequestKind::Get);
        assert!(found.extraction_path.is_empty());
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let store = test_store().await;
        store.upsert(&sample_template()).await.unwrap();

        assert!(store.delete("get-coverage").await.unwrap());
        assert!(!store.delete("get-coverage").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_orders_by_id() {
        let store = test_store().await;
        for id in ["b-template", "a-template", "c-template"] {
            let mut template = sample_template();
            template.id = id.to_string();
            store.upsert(&template).await.unwrap();
        }

        let ids: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec!["a-template", "b-template", "c-template"]);
    }

    #[tokio::test]
    async fn test_unknown_stored_kind_is_configuration_error() {
        let store = test_store().await;
        sqlx::query(
            "INSERT INTO templates (template_id, model, path_template, request_kind, include_descendants)
             VALUES ('bad', 'm', '/p', 'fetch', 0)",
        )
        .execute(&store.pool)
        .await
        .unwrap();

        let err = store.find_by_id("bad").await.unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
        assert!(err.to_string().contains("fetch"));
    }

    #[tokio::test]
    async fn test_blank_chained_id_reads_as_none() {
        let store = test_store().await;
        sqlx::query(
            "INSERT INTO templates (template_id, model, path_template, request_kind, include_descendants, chained_template_id)
             VALUES ('t', 'm', '/p', 'get', 0, '   ')",
        )
        .execute(&store.pool)
        .await
        .unwrap();

        let template = store.find_by_id("t").await.unwrap().unwrap();
        assert!(template.chained_template_id.is_none());
        assert!(!template.is_chained());
    }

    #[test]
    fn test_extraction_path_split_ignores_blanks() {
        assert_eq!(
            split_extraction_path(Some("zones, name ,, code")),
            vec!["zones", "name", "code"]
        );
        assert!(split_extraction_path(Some("")).is_empty());
        assert!(split_extraction_path(None).is_empty());
    }
}
