// Service layer - execution engine and template management

pub mod execution;
pub mod templates;

pub use execution::ExecutionEngine;
pub use templates::TemplateService;
