// Common test utilities shared across test files

use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use stencil::client::{ClientError, DeleteKind, TreeStore, WriteKind};
use stencil::config::Settings;
use stencil::db::{SqliteTemplateStore, TemplateStore};
use stencil::domain::{RequestKind, Template};
use stencil::{build_router, AppState};

/// One recorded backend interaction, captured by [`MockTreeStore`].
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub enum BackendCall {
    Read {
        anchor: String,
        path: String,
        include_descendants: bool,
    },
    Query {
        anchor: String,
        path: String,
        by_tree_path: bool,
        include_descendants: bool,
    },
    Write {
        anchor: String,
        path: String,
        kind: WriteKind,
        payload: Value,
    },
    Remove {
        anchor: String,
        path: String,
        kind: DeleteKind,
    },
}

struct Script {
    path_contains: String,
    body: String,
    status: Option<u16>,
    delay_ms: u64,
}

/// Scripted tree store: records every call and answers by path substring.
/// Paths with no matching script get an empty JSON object.
pub struct MockTreeStore {
    calls: Mutex<Vec<BackendCall>>,
    scripts: Vec<Script>,
}

#[allow(dead_code)]
impl MockTreeStore {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            scripts: Vec::new(),
        }
    }

    /// Answer paths containing `path_contains` with `body`.
    pub fn respond(mut self, path_contains: &str, body: &str) -> Self {
        self.scripts.push(Script {
            path_contains: path_contains.to_string(),
            body: body.to_string(),
            status: None,
            delay_ms: 0,
        });
        self
    }

    /// Like [`respond`](Self::respond), but only after a delay.
    pub fn respond_after(mut self, path_contains: &str, body: &str, delay_ms: u64) -> Self {
        self.scripts.push(Script {
            path_contains: path_contains.to_string(),
            body: body.to_string(),
            status: None,
            delay_ms,
        });
        self
    }

    /// Fail paths containing `path_contains` with the given HTTP status.
    pub fn fail(mut self, path_contains: &str, status: u16) -> Self {
        self.scripts.push(Script {
            path_contains: path_contains.to_string(),
            body: "backend failure".to_string(),
            status: Some(status),
            delay_ms: 0,
        });
        self
    }

    /// Snapshot of every call made so far, in order.
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: BackendCall) {
        self.calls.lock().unwrap().push(call);
    }

    async fn scripted(&self, path: &str) -> Result<String, ClientError> {
        let script = self
            .scripts
            .iter()
            .find(|script| path.contains(&script.path_contains));
        match script {
            Some(script) => {
                if script.delay_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(script.delay_ms)).await;
                }
                match script.status {
                    Some(code) => Err(ClientError::status(code, script.body.clone())),
                    None => Ok(script.body.clone()),
                }
            }
            None => Ok("{}".to_string()),
        }
    }
}

#[async_trait]
impl TreeStore for MockTreeStore {
    async fn read(
        &self,
        anchor: &str,
        path: &str,
        include_descendants: bool,
    ) -> Result<String, ClientError> {
        self.record(BackendCall::Read {
            anchor: anchor.to_string(),
            path: path.to_string(),
            include_descendants,
        });
        self.scripted(path).await
    }

    async fn query(
        &self,
        anchor: &str,
        path: &str,
        by_tree_path: bool,
        include_descendants: bool,
    ) -> Result<String, ClientError> {
        self.record(BackendCall::Query {
            anchor: anchor.to_string(),
            path: path.to_string(),
            by_tree_path,
            include_descendants,
        });
        self.scripted(path).await
    }

    async fn write(
        &self,
        anchor: &str,
        path: &str,
        kind: WriteKind,
        payload: &Value,
    ) -> Result<String, ClientError> {
        self.record(BackendCall::Write {
            anchor: anchor.to_string(),
            path: path.to_string(),
            kind,
            payload: payload.clone(),
        });
        self.scripted(path).await
    }

    async fn remove(
        &self,
        anchor: &str,
        path: &str,
        kind: DeleteKind,
    ) -> Result<(), ClientError> {
        self.record(BackendCall::Remove {
            anchor: anchor.to_string(),
            path: path.to_string(),
            kind,
        });
        self.scripted(path).await.map(|_| ())
    }
}

/// Settings with the anchors the tests rely on.
#[allow(dead_code)]
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.schema_anchors.insert(
        "ran-network".to_string(),
        "ran-coverage-area-anchor".to_string(),
    );
    settings
}

/// Create a test Axum router backed by an in-memory template store and the
/// given scripted backend. Returns the store so tests can arrange templates
/// without going through the API.
#[allow(dead_code)]
pub async fn create_test_app(
    backend: Arc<MockTreeStore>,
) -> (axum::Router, Arc<SqliteTemplateStore>) {
    create_test_app_with_settings(backend, test_settings()).await
}

#[allow(dead_code)]
pub async fn create_test_app_with_settings(
    backend: Arc<MockTreeStore>,
    settings: Settings,
) -> (axum::Router, Arc<SqliteTemplateStore>) {
    let pool = stencil::db::init_db(":memory:")
        .await
        .expect("Failed to create in-memory database");
    let store = Arc::new(SqliteTemplateStore::new(pool));
    let state = Arc::new(AppState::new(store.clone(), backend, &settings));
    (build_router(state), store)
}

/// Minimal template with the given coordinates; callers adjust the rest.
#[allow(dead_code)]
pub fn template(id: &str, model: &str, path_template: &str, kind: RequestKind) -> Template {
    Template {
        id: id.to_string(),
        model: model.to_string(),
        path_template: path_template.to_string(),
        request_kind: kind,
        include_descendants: false,
        chained_template_id: None,
        extraction_path: Vec::new(),
    }
}

#[allow(dead_code)]
pub async fn insert_template(store: &SqliteTemplateStore, template: &Template) {
    store
        .upsert(template)
        .await
        .expect("Failed to insert template");
}

/// Build a JSON POST request.
#[allow(dead_code)]
pub fn post_json(uri: &str, body: Value) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .uri(uri)
        .method("POST")
        .header("Content-Type", "application/json")
        .body(axum::body::Body::from(body.to_string()))
        .unwrap()
}
