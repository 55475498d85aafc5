// src/types/analysis.rs
use serde::{Deserialize, Serialize};

/// Resume analysis in a single stable shape. Every list is always present.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub score: f64,
    pub match_score: f64,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub suggestions: Vec<String>,
    pub keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub recommended_keywords: Vec<String>,
}
