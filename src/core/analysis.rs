// src/core/analysis.rs
//! Reconciles analysis-service payloads whose field names drift between versions

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{json_kind, PipelineError, PipelineResult};
use crate::types::analysis::AnalysisResult;
use crate::types::lenient::value_to_text;

pub const DEFAULT_SCORE: f64 = 75.0;
pub const DEFAULT_MATCH_SCORE: f64 = 70.0;

// Source keys in priority order for each canonical field.
const SCORE_KEYS: &[&str] = &["resumeScore", "score"];
const MATCH_SCORE_KEYS: &[&str] = &["jobMatchScore", "matchScore"];
const STRENGTHS_KEYS: &[&str] = &["strengths"];
const WEAKNESSES_KEYS: &[&str] = &["improvements", "weaknesses"];
const SUGGESTIONS_KEYS: &[&str] = &["recommendations", "suggestions"];
const KEYWORDS_KEYS: &[&str] = &["keywords", "recommendedKeywords"];
const MISSING_KEYWORDS_KEYS: &[&str] = &["missingKeywords"];
const RECOMMENDED_KEYWORDS_KEYS: &[&str] = &["recommendedKeywords"];

/// First alias present with a non-null value, with the key it came from.
fn lookup<'a>(
    object: &'a Map<String, Value>,
    aliases: &[&'static str],
) -> Option<(&'static str, &'a Value)> {
    aliases.iter().find_map(|key| {
        object
            .get(*key)
            .filter(|value| !value.is_null())
            .map(|value| (*key, value))
    })
}

fn score(object: &Map<String, Value>, aliases: &[&'static str], default: f64) -> f64 {
    let Some((key, value)) = lookup(object, aliases) else {
        debug!(aliases = ?aliases, default, "score absent, using default");
        return default;
    };

    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed.filter(|n| n.is_finite()).unwrap_or_else(|| {
        warn!(field = key, found = json_kind(value), default, "field coercion fallback");
        default
    })
}

fn list(object: &Map<String, Value>, aliases: &[&'static str]) -> Vec<String> {
    match lookup(object, aliases) {
        None => Vec::new(),
        Some((_, Value::Array(items))) => items.iter().filter_map(value_to_text).collect(),
        Some((key, other)) => {
            warn!(field = key, found = json_kind(other), "field coercion fallback");
            Vec::new()
        }
    }
}

/// Normalizes an analysis payload. Fails only when `raw` is not a JSON object.
pub fn normalize_analysis(raw: &Value) -> PipelineResult<AnalysisResult> {
    let object = raw.as_object().ok_or(PipelineError::NotAnObject {
        found: json_kind(raw),
    })?;

    Ok(AnalysisResult {
        score: score(object, SCORE_KEYS, DEFAULT_SCORE),
        match_score: score(object, MATCH_SCORE_KEYS, DEFAULT_MATCH_SCORE),
        strengths: list(object, STRENGTHS_KEYS),
        weaknesses: list(object, WEAKNESSES_KEYS),
        suggestions: list(object, SUGGESTIONS_KEYS),
        keywords: list(object, KEYWORDS_KEYS),
        missing_keywords: list(object, MISSING_KEYWORDS_KEYS),
        recommended_keywords: list(object, RECOMMENDED_KEYWORDS_KEYS),
    })
}
