// src/types/mod.rs
pub mod analysis;
pub mod canonical;
pub mod lenient;
pub mod response;
pub mod structured;

pub use analysis::AnalysisResult;
pub use canonical::{CanonicalResume, SkillBucket, SkillSet};
pub use response::PdfExportRequest;
pub use structured::StructuredResume;
