// Template seeding from a YAML file at startup

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::TemplateStore;
use crate::domain::TemplateRequest;
use crate::validation;

/// Load template definitions from a YAML file into the store.
///
/// Entries use the same shape and validation as the creation endpoint.
/// Invalid entries are skipped with a warning so one bad definition cannot
/// block startup. Returns the number of templates stored.
pub async fn seed_templates(store: &dyn TemplateStore, path: &str) -> Result<usize> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read template file {}", path))?;

    let requests: Vec<TemplateRequest> =
        serde_yaml::from_str(&content).context("Failed to parse template file")?;

    let mut seeded = 0;
    for request in requests {
        match validation::validate_template_request(&request) {
            Ok(template) => {
                store.upsert(&template).await?;
                info!(template_id = %template.id, "seeded template");
                seeded += 1;
            }
            Err(err) => {
                warn!(template_id = %request.template_id, %err, "skipping invalid template");
            }
        }
    }

    Ok(seeded)
}
