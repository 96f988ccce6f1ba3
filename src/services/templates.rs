// Template management service

use std::sync::Arc;
use tracing::info;

use crate::db::TemplateStore;
use crate::domain::{Template, TemplateRequest};
use crate::error::AppError;
use crate::validation;

/// CRUD over stored templates.
pub struct TemplateService {
    store: Arc<dyn TemplateStore>,
}

impl TemplateService {
    pub fn new(store: Arc<dyn TemplateStore>) -> Self {
        Self { store }
    }

    /// Validate and store a template definition. Storing under an existing
    /// id redefines that template.
    pub async fn create_template(&self, request: TemplateRequest) -> Result<Template, AppError> {
        let template = validation::validate_template_request(&request)?;
        self.store.upsert(&template).await?;
        info!(
            template_id = %template.id,
            kind = template.request_kind.as_str(),
            "stored template"
        );
        Ok(template)
    }

    pub async fn get_template(&self, template_id: &str) -> Result<Template, AppError> {
        self.store
            .find_by_id(template_id)
            .await?
            .ok_or_else(|| not_found(template_id))
    }

    pub async fn get_all_templates(&self) -> Result<Vec<Template>, AppError> {
        self.store.list().await
    }

    pub async fn delete_template(&self, template_id: &str) -> Result<(), AppError> {
        if self.store.delete(template_id).await? {
            info!(template_id, "deleted template");
            Ok(())
        } else {
            Err(not_found(template_id))
        }
    }
}

fn not_found(template_id: &str) -> AppError {
    AppError::TemplateNotFound(format!("Template not found for given id: {}", template_id))
}
