// src/core/generation.rs
//! Intake of generation-service output: a resume object, a string holding one, or
//! loosely tagged markup

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::core::markup::{MarkupStructurer, StructuredMarkup};
use crate::core::normalizer::{detect_format, ResumeDocument};
use crate::error::{json_kind, PipelineError, PipelineResult};
use crate::types::canonical::CanonicalResume;
use crate::utils::{extract_json_object, looks_like_markup, strip_code_fence};

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutput {
    Document(ResumeDocument),
    /// Fallback path when the service answered with markup.
    Markup(StructuredMarkup),
}

impl GenerationOutput {
    pub fn from_value(raw: &Value, structurer: &MarkupStructurer) -> PipelineResult<Self> {
        match raw {
            Value::Null => Err(PipelineError::EmptyPayload),
            Value::String(text) => Self::from_text(text, structurer),
            Value::Object(_) => Ok(GenerationOutput::Document(detect_format(raw)?)),
            other => Err(PipelineError::unrecognized(format!(
                "generation output is {}",
                json_kind(other)
            ))),
        }
    }

    pub fn from_text(text: &str, structurer: &MarkupStructurer) -> PipelineResult<Self> {
        let body = strip_code_fence(text);
        if body.is_empty() {
            return Err(PipelineError::EmptyPayload);
        }

        let is_markup = looks_like_markup(body);

        if let Some(json) = extract_json_object(body) {
            match serde_json::from_str::<Value>(json) {
                Ok(value) => match detect_format(&value) {
                    Ok(document) => {
                        debug!("generation output carried an embedded JSON document");
                        return Ok(GenerationOutput::Document(document));
                    }
                    // a JSON snippet inside markup is content, not the resume
                    Err(e) if is_markup => {
                        debug!(error = %e, "embedded JSON is not a resume, structuring markup");
                    }
                    Err(e) => return Err(e),
                },
                Err(e) if !is_markup => {
                    warn!(error = %e, "generation output looked like JSON but failed to parse");
                    return Err(PipelineError::InvalidJson(e));
                }
                Err(_) => {}
            }
        }

        if is_markup {
            info!("generation output is markup, structuring sections");
            return Ok(GenerationOutput::Markup(structurer.structure(body)));
        }

        Err(PipelineError::unrecognized(
            "generation output is neither JSON nor markup",
        ))
    }

    /// Canonical form when the output was a resume document.
    pub fn into_canonical(self) -> Option<CanonicalResume> {
        match self {
            GenerationOutput::Document(document) => Some(document.into_canonical()),
            GenerationOutput::Markup(_) => None,
        }
    }
}
