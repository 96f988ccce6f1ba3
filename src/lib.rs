// stencil - template gateway for hierarchical data stores
//
// Stores parameterized path templates, executes them against a tree-store
// backend, and reshapes responses through declarative extraction pipelines.

pub mod client;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod services;
pub mod validation;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::client::TreeStore;
use crate::config::Settings;
use crate::db::TemplateStore;
use crate::services::{ExecutionEngine, TemplateService};

// Request bodies are template definitions or execution inputs; 1 MiB is plenty
const MAX_BODY_BYTES: usize = 1024 * 1024;

// Application state
pub struct AppState {
    pub engine: ExecutionEngine,
    pub templates: TemplateService,
}

impl AppState {
    pub fn new(
        store: Arc<dyn TemplateStore>,
        backend: Arc<dyn TreeStore>,
        settings: &Settings,
    ) -> Self {
        Self {
            engine: ExecutionEngine::new(
                store.clone(),
                backend,
                settings.schema_anchors.clone(),
                settings.chain_concurrency,
            ),
            templates: TemplateService::new(store),
        }
    }
}

// Public function to create the router
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Template management
        .route(
            "/templates",
            post(handlers::templates::create_template).get(handlers::templates::get_all_templates),
        )
        .route(
            "/templates/{templateId}",
            get(handlers::templates::get_template).delete(handlers::templates::delete_template),
        )
        // Execution
        .route(
            "/execute/{anchorOrModel}/{templateId}",
            post(handlers::execute::execute_template),
        )
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}
