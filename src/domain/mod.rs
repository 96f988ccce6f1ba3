// Domain model for stored templates and execution requests

pub mod extract;
pub mod path;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Model name that defers anchor selection to the caller at execution time.
pub const DYNAMIC_MODEL: &str = "dynamic";

/// Backend operation a template performs.
///
/// The set is closed: unknown kind strings are rejected when a template is
/// created, and a bad kind found in storage surfaces as a configuration
/// error. There is no fallback kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestKind {
    Get,
    Query,
    QueryTreePath,
    Put,
    Post,
    Patch,
    PostListNode,
    Delete,
    DeleteListNode,
}

impl RequestKind {
    /// Parse a stored kind string. Matching is case-insensitive.
    pub fn parse(kind: &str) -> Option<Self> {
        match kind.trim().to_ascii_lowercase().as_str() {
            "get" => Some(RequestKind::Get),
            "query" => Some(RequestKind::Query),
            "query-tree-path" => Some(RequestKind::QueryTreePath),
            "put" => Some(RequestKind::Put),
            "post" => Some(RequestKind::Post),
            "patch" => Some(RequestKind::Patch),
            "post-list-node" => Some(RequestKind::PostListNode),
            "delete" => Some(RequestKind::Delete),
            "delete-list-node" => Some(RequestKind::DeleteListNode),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Get => "get",
            RequestKind::Query => "query",
            RequestKind::QueryTreePath => "query-tree-path",
            RequestKind::Put => "put",
            RequestKind::Post => "post",
            RequestKind::Patch => "patch",
            RequestKind::PostListNode => "post-list-node",
            RequestKind::Delete => "delete",
            RequestKind::DeleteListNode => "delete-list-node",
        }
    }
}

/// A stored template: a parameterized path expression plus the metadata
/// needed to execute it against the tree store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    #[serde(rename = "templateId")]
    pub id: String,
    pub model: String,
    pub path_template: String,
    pub request_kind: RequestKind,
    #[serde(default)]
    pub include_descendants: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chained_template_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extraction_path: Vec<String>,
}

impl Template {
    /// Whether execution should fan out through another template first.
    pub fn is_chained(&self) -> bool {
        self.chained_template_id
            .as_deref()
            .map_or(false, |id| !id.trim().is_empty())
    }

    pub fn has_extraction(&self) -> bool {
        !self.extraction_path.is_empty()
    }
}

/// Payload of a template creation request, before validation.
///
/// Every field is optional on the wire; validation reports all problems at
/// once rather than stopping at the first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRequest {
    #[serde(default)]
    pub template_id: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub path_template: String,
    #[serde(default)]
    pub request_kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_descendants: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chained_template_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction_path: Option<Vec<String>>,
}

/// Runtime input for one execution: named parameters for path substitution
/// plus an optional free-form payload for write operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRequest {
    #[serde(default)]
    pub input_parameters: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}
