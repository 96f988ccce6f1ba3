// Execution engine - resolves stored templates and drives the tree store

use futures::stream::{self, StreamExt, TryStreamExt};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::client::{DeleteKind, TreeStore, WriteKind};
use crate::db::TemplateStore;
use crate::domain::{extract, path, ExecutionRequest, RequestKind, Template, DYNAMIC_MODEL};
use crate::error::AppError;

// Deletes have no response body; callers still get a result string
const DELETE_RESULT: &str = "Success";

/// Resolves stored templates, dispatches them against the tree store, and
/// reshapes responses through their extraction pipelines.
///
/// The engine is stateless across calls; shared state is limited to the
/// read-only anchor mapping and the store handles.
pub struct ExecutionEngine {
    templates: Arc<dyn TemplateStore>,
    backend: Arc<dyn TreeStore>,
    schema_anchors: HashMap<String, String>,
    chain_concurrency: usize,
}

impl ExecutionEngine {
    pub fn new(
        templates: Arc<dyn TemplateStore>,
        backend: Arc<dyn TreeStore>,
        schema_anchors: HashMap<String, String>,
        chain_concurrency: usize,
    ) -> Self {
        Self {
            templates,
            backend,
            schema_anchors,
            chain_concurrency: chain_concurrency.max(1),
        }
    }

    /// Execute the stored template `template_id`.
    ///
    /// For templates on the dynamic model, `anchor_or_model` is the anchor
    /// to address; for every other template the anchor comes from the
    /// configured model mapping and this value is ignored.
    pub async fn execute_template(
        &self,
        anchor_or_model: &str,
        template_id: &str,
        request: &ExecutionRequest,
    ) -> Result<String, AppError> {
        let template = self.templates.find_by_id(template_id).await?.ok_or_else(|| {
            AppError::TemplateNotFound(format!("No template with id '{}'", template_id))
        })?;

        if template.is_chained() {
            self.execute_chained(&template, anchor_or_model, request).await
        } else {
            self.execute_single(
                &template,
                anchor_or_model,
                &request.input_parameters,
                request.payload.as_ref(),
            )
            .await
        }
    }

    // One template, one backend call: resolve anchor, render path, dispatch,
    // then run the extraction pipeline if the template declares one.
    async fn execute_single(
        &self,
        template: &Template,
        anchor_or_model: &str,
        parameters: &HashMap<String, String>,
        payload: Option<&Value>,
    ) -> Result<String, AppError> {
        let anchor = self.resolve_anchor(template, anchor_or_model)?;
        let path = path::render_path(&template.path_template, parameters);
        debug!(
            template_id = %template.id,
            kind = template.request_kind.as_str(),
            %anchor,
            %path,
            "executing template"
        );

        let raw = self.dispatch(template, &anchor, &path, payload).await?;

        if !template.has_extraction() {
            return Ok(raw);
        }

        let root: Value = serde_json::from_str(&raw)
            .map_err(|e| AppError::Transform(format!("response is not valid JSON: {}", e)))?;
        let candidates = extract::extract(&template.extraction_path, &root);
        let normalized = extract::normalize_brackets(candidates, root.is_array());

        serde_json::to_string(&normalized)
            .map_err(|e| AppError::Transform(format!("failed to encode extraction result: {}", e)))
    }

    fn resolve_anchor(
        &self,
        template: &Template,
        anchor_or_model: &str,
    ) -> Result<String, AppError> {
        if template.model == DYNAMIC_MODEL {
            return Ok(anchor_or_model.to_string());
        }

        self.schema_anchors
            .get(&template.model)
            .cloned()
            .ok_or_else(|| {
                AppError::AnchorNotFound(format!(
                    "No anchor configured for model '{}'",
                    template.model
                ))
            })
    }

    async fn dispatch(
        &self,
        template: &Template,
        anchor: &str,
        path: &str,
        payload: Option<&Value>,
    ) -> Result<String, AppError> {
        let descendants = template.include_descendants;
        // Writes pass the payload through untouched; absent means JSON null
        let body = payload.cloned().unwrap_or(Value::Null);

        let raw = match template.request_kind {
            RequestKind::Get => self.backend.read(anchor, path, descendants).await?,
            RequestKind::Query => self.backend.query(anchor, path, false, descendants).await?,
            RequestKind::QueryTreePath => {
                self.backend.query(anchor, path, true, descendants).await?
            }
            RequestKind::Put => self.backend.write(anchor, path, WriteKind::Put, &body).await?,
            RequestKind::Post => self.backend.write(anchor, path, WriteKind::Post, &body).await?,
            RequestKind::Patch => {
                self.backend.write(anchor, path, WriteKind::Patch, &body).await?
            }
            RequestKind::PostListNode => {
                self.backend
                    .write(anchor, path, WriteKind::PostListNode, &body)
                    .await?
            }
            RequestKind::Delete => {
                self.backend.remove(anchor, path, DeleteKind::Node).await?;
                DELETE_RESULT.to_string()
            }
            RequestKind::DeleteListNode => {
                self.backend
                    .remove(anchor, path, DeleteKind::ListNode)
                    .await?;
                DELETE_RESULT.to_string()
            }
        };

        Ok(raw)
    }

    // Chained execution: the inner template's extracted values drive one
    // outer execution each, in order, failing fast on the first error.
    async fn execute_chained(
        &self,
        outer: &Template,
        anchor_or_model: &str,
        request: &ExecutionRequest,
    ) -> Result<String, AppError> {
        let inner_id = outer.chained_template_id.as_deref().unwrap_or_default();
        let inner = self.templates.find_by_id(inner_id).await?.ok_or_else(|| {
            AppError::TemplateNotFound(format!(
                "Chained template '{}' referenced by '{}' does not exist",
                inner_id, outer.id
            ))
        })?;

        // The last extraction field names the parameter each outer iteration
        // binds. An inner template without extraction cannot drive anything,
        // so fail before touching the backend.
        let binding_key = match inner.extraction_path.last() {
            Some(field) => field.clone(),
            None => {
                return Err(AppError::Configuration(format!(
                    "Chained template '{}' declares no extraction path",
                    inner.id
                )))
            }
        };

        let inner_result = self
            .execute_single(
                &inner,
                anchor_or_model,
                &request.input_parameters,
                request.payload.as_ref(),
            )
            .await?;
        let bindings = binding_values(&inner_result);
        debug!(
            outer = %outer.id,
            inner = %inner.id,
            iterations = bindings.len(),
            "fanning out chained execution"
        );

        let results: Vec<Value> = stream::iter(bindings)
            .map(|value| {
                let binding_key = binding_key.clone();
                async move {
                    let mut parameters = HashMap::new();
                    parameters.insert(binding_key, value);
                    let rendered = self
                        .execute_single(
                            outer,
                            anchor_or_model,
                            &parameters,
                            request.payload.as_ref(),
                        )
                        .await?;
                    // Keep JSON results structured; anything else becomes a JSON string
                    Ok::<Value, AppError>(
                        serde_json::from_str(&rendered).unwrap_or(Value::String(rendered)),
                    )
                }
            })
            .buffered(self.chain_concurrency)
            .try_collect()
            .await?;

        serde_json::to_string(&results)
            .map_err(|e| AppError::Internal(format!("failed to encode chained result: {}", e)))
    }
}

// Inner results drive outer iterations as plain strings: JSON strings bind
// unquoted, everything else keeps its JSON encoding
fn binding_values(inner_result: &str) -> Vec<String> {
    match serde_json::from_str::<Value>(inner_result) {
        Ok(Value::Array(items)) => items.iter().map(scalar_form).collect(),
        Ok(single) => vec![scalar_form(&single)],
        Err(_) => vec![inner_result.to_string()],
    }
}

fn scalar_form(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
