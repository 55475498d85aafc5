// src/core/mod.rs
//! Pipeline stages between the generation/analysis services and the renderers

pub mod analysis;
pub mod date_range;
pub mod generation;
pub mod markup;
pub mod normalizer;
pub mod skills;

pub use analysis::normalize_analysis;
pub use date_range::DateRange;
pub use generation::GenerationOutput;
pub use markup::{structure_markup, MarkupConfig, MarkupStructurer, StructuredMarkup};
pub use normalizer::{detect_format, normalize, ResumeDocument, ResumeFormat};
