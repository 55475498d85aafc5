// src/lib.rs
//! Resume document pipeline: schema detection and normalization, skill
//! categorization, generated-markup structuring, template rendering and
//! analysis normalization.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod template_system;
pub mod templates;
pub mod types;
pub mod utils;

pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use template_system::{RenderedDocument, TemplateId, TemplateRegistry};
pub use types::{AnalysisResult, CanonicalResume, PdfExportRequest, StructuredResume};
