// Settings loaded from a YAML file, with usable local-run defaults

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Top-level application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Address the gateway listens on.
    pub listen_addr: String,
    /// Path to the SQLite template store.
    pub database: String,
    /// Tree-store backend connection.
    pub backend: BackendSettings,
    /// Logical model name to backend anchor. The "dynamic" model never
    /// appears here; it takes its anchor from the request path.
    pub schema_anchors: HashMap<String, String>,
    /// Maximum in-flight outer executions during chained fan-out.
    pub chain_concurrency: usize,
}

/// Connection settings for the tree-store backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            database: "stencil.db".to_string(),
            backend: BackendSettings::default(),
            schema_anchors: HashMap::new(),
            chain_concurrency: 1,
        }
    }
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            username: None,
            password: None,
            timeout_secs: 10,
        }
    }
}

impl Settings {
    /// Load settings from a YAML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path))?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let settings: Settings =
            serde_yaml::from_str(yaml).context("Failed to parse settings")?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        url::Url::parse(&self.backend.base_url)
            .with_context(|| format!("backend.base_url '{}' is not a valid URL", self.backend.base_url))?;

        if self.chain_concurrency == 0 {
            bail!("chain_concurrency must be at least 1");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.listen_addr, "0.0.0.0:8080");
        assert_eq!(settings.database, "stencil.db");
        assert_eq!(settings.chain_concurrency, 1);
        assert!(settings.schema_anchors.is_empty());
        assert!(settings.backend.username.is_none());
    }

    #[test]
    fn test_parse_full_settings() {
        let yaml = r#"
listen_addr: "127.0.0.1:9090"
database: "/var/lib/stencil/templates.db"
backend:
  base_url: "http://tree-store:8000/api/v1"
  username: "svc-stencil"
  password: "secret"
  timeout_secs: 30
schema_anchors:
  ran-network: ran-coverage-area-anchor
  bookstore: bookstore-anchor
chain_concurrency: 4
"#;
        let settings = Settings::from_yaml(yaml).unwrap();
        assert_eq!(settings.listen_addr, "127.0.0.1:9090");
        assert_eq!(settings.backend.base_url, "http://tree-store:8000/api/v1");
        assert_eq!(settings.backend.username.as_deref(), Some("svc-stencil"));
        assert_eq!(settings.backend.timeout_secs, 30);
        assert_eq!(
            settings.schema_anchors.get("ran-network").map(String::as_str),
            Some("ran-coverage-area-anchor")
        );
        assert_eq!(settings.chain_concurrency, 4);
    }

    #[test]
    fn test_partial_settings_fall_back_to_defaults() {
        let yaml = r#"
backend:
  base_url: "http://tree-store:8000"
"#;
        let settings = Settings::from_yaml(yaml).unwrap();
        assert_eq!(settings.listen_addr, "0.0.0.0:8080");
        assert_eq!(settings.backend.base_url, "http://tree-store:8000");
        assert_eq!(settings.backend.timeout_secs, 10);
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let yaml = r#"
backend:
  base_url: "not a url"
"#;
        let result = Settings::from_yaml(yaml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("base_url"));
    }

    #[test]
    fn test_zero_chain_concurrency_rejected() {
        let yaml = "chain_concurrency: 0";
        let result = Settings::from_yaml(yaml);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("chain_concurrency"));
    }
}
