// src/types/structured.rs
//! Structured resume schema used by the generation service and the PDF renderer

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::json_kind;
use crate::types::lenient;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StructuredResume {
    #[serde(default, deserialize_with = "lenient::record")]
    pub basics: Basics,
    #[serde(
        default,
        skip_serializing_if = "StructuredSummary::is_empty",
        deserialize_with = "summary_block"
    )]
    pub summary: StructuredSummary,
    #[serde(default, deserialize_with = "lenient::record_vec")]
    pub experience: Vec<StructuredExperience>,
    #[serde(default, deserialize_with = "lenient::record_vec")]
    pub projects: Vec<StructuredProject>,
    #[serde(default, deserialize_with = "lenient::record_vec")]
    pub education: Vec<StructuredEducation>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "skills_block"
    )]
    pub skills: Option<StructuredSkills>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string_vec"
    )]
    pub certifications: Option<Vec<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string_vec"
    )]
    pub achievements: Option<Vec<String>>,
    /// Generation bookkeeping; never rendered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Basics {
    #[serde(default, deserialize_with = "lenient::string")]
    pub full_name: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "location_block")]
    pub location: Location,
    #[serde(default, deserialize_with = "lenient::record")]
    pub contact: StructuredContact,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub city: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub region: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub country: Option<String>,
}

impl Location {
    /// Best-effort split of a display string: first segment is the city, second the
    /// region, everything after that the country.
    pub fn from_display(display: &str) -> Self {
        let segments: Vec<&str> = display.split(',').map(str::trim).collect();
        let pick = |s: Option<&&str>| s.filter(|s| !s.is_empty()).map(|s| s.to_string());
        let country = if segments.len() > 2 {
            let rest = segments[2..]
                .iter()
                .filter(|s| !s.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join(", ");
            Some(rest).filter(|r| !r.is_empty())
        } else {
            None
        };

        Self {
            city: pick(segments.first()),
            region: pick(segments.get(1)),
            country,
        }
    }

    /// Non-empty parts joined with `", "`; `None` when nothing is set.
    pub fn display(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.city, &self.region, &self.country]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StructuredContact {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub email: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub phone: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub linkedin: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub github: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub portfolio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StructuredSummary {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub headline: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string_vec"
    )]
    pub highlights: Option<Vec<String>>,
}

impl StructuredSummary {
    pub fn is_empty(&self) -> bool {
        self.headline.is_none() && self.highlights.as_ref().map_or(true, Vec::is_empty)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StructuredExperience {
    #[serde(default, deserialize_with = "lenient::string")]
    pub company: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub role: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub location: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub start_date: Option<String>,
    /// `null` means the role is ongoing.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub end_date: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_bool"
    )]
    pub is_current: Option<bool>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub summary: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string_vec"
    )]
    pub highlights: Option<Vec<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string_vec"
    )]
    pub tech_stack: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StructuredProject {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(
        rename = "type",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub kind: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub link: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub description: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string_vec"
    )]
    pub highlights: Option<Vec<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string_vec"
    )]
    pub tech_stack: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StructuredEducation {
    #[serde(default, deserialize_with = "lenient::string")]
    pub institution: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub degree: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub location: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub start_date: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub end_date: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub gpa: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string_vec"
    )]
    pub highlights: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StructuredSkills {
    #[serde(default, deserialize_with = "lenient::record_vec")]
    pub categories: Vec<SkillCategory>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SkillCategory {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string_vec")]
    pub items: Vec<String>,
}

/// Accepts a summary object or a bare string (taken as the headline).
fn summary_block<'de, D>(deserializer: D) -> Result<StructuredSummary, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?.unwrap_or(Value::Null);
    Ok(match value {
        Value::Null => StructuredSummary::default(),
        Value::String(text) => StructuredSummary {
            headline: Some(text).filter(|t| !t.trim().is_empty()),
            highlights: None,
        },
        Value::Object(_) => serde_json::from_value(value).unwrap_or_else(|e| {
            warn!(field = "summary", error = %e, "field coercion fallback");
            StructuredSummary::default()
        }),
        other => {
            warn!(field = "summary", found = json_kind(&other), "field coercion fallback");
            StructuredSummary::default()
        }
    })
}

/// Accepts a location object or a comma-separated display string.
fn location_block<'de, D>(deserializer: D) -> Result<Location, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?.unwrap_or(Value::Null);
    Ok(match value {
        Value::Null => Location::default(),
        Value::String(text) => Location::from_display(&text),
        Value::Object(_) => serde_json::from_value(value).unwrap_or_else(|e| {
            warn!(field = "basics.location", error = %e, "field coercion fallback");
            Location::default()
        }),
        other => {
            warn!(field = "basics.location", found = json_kind(&other), "field coercion fallback");
            Location::default()
        }
    })
}

/// Accepts `{categories: [...]}`, a bare list of categories, or a
/// `{"Category": [items]}` map.
fn skills_block<'de, D>(deserializer: D) -> Result<Option<StructuredSkills>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?.unwrap_or(Value::Null);
    let categories = match value {
        Value::Null => return Ok(None),
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<SkillCategory>(item) {
                Ok(category) => Some(category),
                Err(e) => {
                    warn!(field = "skills", error = %e, "field coercion fallback");
                    None
                }
            })
            .collect(),
        Value::Object(map) if map.contains_key("categories") => {
            return Ok(match serde_json::from_value(Value::Object(map)) {
                Ok(skills) => Some(skills),
                Err(e) => {
                    warn!(field = "skills", error = %e, "field coercion fallback");
                    None
                }
            });
        }
        Value::Object(map) => map
            .into_iter()
            .map(|(name, items)| SkillCategory {
                name,
                items: lenient::text_list(items),
            })
            .collect(),
        other => {
            warn!(field = "skills", found = json_kind(&other), "field coercion fallback");
            return Ok(None);
        }
    };
    Ok(Some(StructuredSkills { categories }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_location_from_display_segments() {
        let loc = Location::from_display("Austin, TX, USA");
        assert_eq!(loc.city.as_deref(), Some("Austin"));
        assert_eq!(loc.region.as_deref(), Some("TX"));
        assert_eq!(loc.country.as_deref(), Some("USA"));

        let loc = Location::from_display("Berlin");
        assert_eq!(loc.city.as_deref(), Some("Berlin"));
        assert_eq!(loc.region, None);
        assert_eq!(loc.country, None);
    }

    #[test]
    fn test_location_remainder_goes_to_country() {
        let loc = Location::from_display("Brooklyn, New York, NY, USA");
        assert_eq!(loc.region.as_deref(), Some("New York"));
        assert_eq!(loc.country.as_deref(), Some("NY, USA"));
        assert_eq!(
            loc.display().as_deref(),
            Some("Brooklyn, New York, NY, USA")
        );
    }

    #[test]
    fn test_location_display_skips_empty_parts() {
        let loc = Location {
            city: Some("Paris".to_string()),
            region: None,
            country: Some("France".to_string()),
        };
        assert_eq!(loc.display().as_deref(), Some("Paris, France"));
        assert_eq!(Location::default().display(), None);
    }

    #[test]
    fn test_summary_accepts_plain_string() {
        let resume: StructuredResume =
            serde_json::from_value(json!({"basics": {"full_name": "A"}, "summary": "Builder"}))
                .expect("decodes");
        assert_eq!(resume.summary.headline.as_deref(), Some("Builder"));
    }

    #[test]
    fn test_skills_accepts_map_form() {
        let resume: StructuredResume = serde_json::from_value(json!({
            "basics": {"full_name": "A"},
            "skills": {"Languages": ["Rust", "Go"]}
        }))
        .expect("decodes");
        let skills = resume.skills.expect("skills present");
        assert_eq!(skills.categories[0].name, "Languages");
        assert_eq!(skills.categories[0].items, vec!["Rust", "Go"]);
    }

    #[test]
    fn test_basics_location_string() {
        let resume: StructuredResume = serde_json::from_value(json!({
            "basics": {"full_name": "A", "location": "Pune, MH, India"}
        }))
        .expect("decodes");
        assert_eq!(resume.basics.location.region.as_deref(), Some("MH"));
    }

    #[test]
    fn test_current_role_serializes_null_end_date() {
        let exp = StructuredExperience {
            company: "Acme".to_string(),
            role: "Engineer".to_string(),
            start_date: Some("2021-04".to_string()),
            is_current: Some(true),
            ..Default::default()
        };
        let value = serde_json::to_value(&exp).expect("serializes");
        assert_eq!(value["end_date"], Value::Null);
        assert!(value.as_object().expect("object").contains_key("end_date"));
        assert!(value.get("highlights").is_none());
    }

    #[test]
    fn test_malformed_blocks_fall_back_without_failing() {
        let resume: StructuredResume = serde_json::from_value(json!({
            "basics": {"full_name": "A", "location": 42},
            "summary": ["not", "an", "object"],
            "skills": [{"name": "Languages", "items": ["Rust"]}, "Go", 7]
        }))
        .expect("decodes");
        assert_eq!(resume.basics.location, Location::default());
        assert!(resume.summary.is_empty());
        let skills = resume.skills.expect("skills present");
        assert_eq!(skills.categories.len(), 1);
        assert_eq!(skills.categories[0].name, "Languages");

        let resume: StructuredResume =
            serde_json::from_value(json!({"basics": {"full_name": "A"}, "skills": {"categories": 3}}))
                .expect("decodes");
        assert_eq!(resume.skills, Some(StructuredSkills::default()));
    }

    #[test]
    fn test_metadata_is_kept_opaque() {
        let resume: StructuredResume = serde_json::from_value(json!({
            "basics": {"full_name": "A"},
            "metadata": {"model": "gen-2", "tokens": 1200}
        }))
        .expect("decodes");
        assert_eq!(resume.metadata, Some(json!({"model": "gen-2", "tokens": 1200})));
    }
}
