// src/types/response.rs
use serde::{Deserialize, Serialize};

use crate::core::normalizer::canonical_to_structured;
use crate::template_system::TemplateId;
use crate::types::canonical::CanonicalResume;
use crate::types::structured::StructuredResume;

/// Payload handed to the PDF export service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfExportRequest {
    pub template_id: TemplateId,
    pub resume_data: StructuredResume,
}

impl PdfExportRequest {
    /// The export service only accepts the structured schema.
    pub fn new(template_id: TemplateId, resume: &CanonicalResume) -> Self {
        Self {
            template_id,
            resume_data: canonical_to_structured(resume),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_export_request_shape() {
        let resume: CanonicalResume = serde_json::from_value(json!({
            "name": "Linus",
            "contact": {"email": "l@kernel.org"},
            "summary": "Kernel hacker"
        }))
        .expect("decodes");

        let value = serde_json::to_value(PdfExportRequest::new(TemplateId::Classic, &resume))
            .expect("serializes");
        assert_eq!(value["template_id"], json!("classic"));
        assert_eq!(value["resume_data"]["basics"]["full_name"], json!("Linus"));
        assert_eq!(value["resume_data"]["summary"]["headline"], json!("Kernel hacker"));
    }
}
