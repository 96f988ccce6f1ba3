// Validation for template definitions
// Shared by the creation endpoint and startup seeding

use crate::domain::path::PathTemplate;
use crate::domain::{RequestKind, Template, TemplateRequest};
use crate::error::AppError;

/// Validate a template definition and convert it into its stored form.
///
/// All problems are collected into a single Validation error rather than
/// stopping at the first.
pub fn validate_template_request(request: &TemplateRequest) -> Result<Template, AppError> {
    let mut details = Vec::new();

    if request.template_id.trim().is_empty() {
        details.push("template id missing".to_string());
    }
    if request.model.trim().is_empty() {
        details.push("model missing".to_string());
    }
    if request.path_template.trim().is_empty() {
        details.push("path template missing".to_string());
    }

    let request_kind = match request.request_kind.trim() {
        "" => {
            details.push("request kind missing".to_string());
            None
        }
        kind => match RequestKind::parse(kind) {
            Some(parsed) => Some(parsed),
            None => {
                details.push(format!("unknown request kind '{}'", kind));
                None
            }
        },
    };

    if PathTemplate::parse(&request.path_template)
        .placeholder_names()
        .iter()
        .any(|name| name.is_empty())
    {
        details.push("path template has an empty {{}} placeholder".to_string());
    }

    let extraction_path: Vec<String> = request
        .extraction_path
        .clone()
        .unwrap_or_default()
        .iter()
        .map(|field| field.trim().to_string())
        .collect();
    if extraction_path.iter().any(|field| field.is_empty()) {
        details.push("extraction path contains an empty field name".to_string());
    }

    match (details.is_empty(), request_kind) {
        (true, Some(request_kind)) => Ok(Template {
            id: request.template_id.trim().to_string(),
            model: request.model.trim().to_string(),
            path_template: request.path_template.clone(),
            request_kind,
            include_descendants: request.include_descendants.unwrap_or(false),
            chained_template_id: request
                .chained_template_id
                .clone()
                .filter(|id| !id.trim().is_empty()),
            extraction_path,
        }),
        _ => Err(AppError::Validation(details)),
    }
}
