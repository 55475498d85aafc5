// src/core/normalizer.rs
//! Schema detection and conversion between the structured and canonical resume shapes

use serde_json::Value;
use std::fmt;
use tracing::{debug, info, warn};

use crate::core::date_range::{self, DateRange};
use crate::core::skills;
use crate::error::{json_kind, PipelineError, PipelineResult};
use crate::types::canonical::{
    CanonicalResume, Contact, EducationEntry, ExperienceEntry, ProjectEntry,
};
use crate::types::structured::{
    Basics, Location, StructuredContact, StructuredEducation, StructuredExperience,
    StructuredProject, StructuredResume, StructuredSummary,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Structured,
    Canonical,
}

impl fmt::Display for ResumeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResumeFormat::Structured => write!(f, "structured"),
            ResumeFormat::Canonical => write!(f, "canonical"),
        }
    }
}

/// A decoded resume tagged with the schema it arrived in.
#[derive(Debug, Clone, PartialEq)]
pub enum ResumeDocument {
    Structured(StructuredResume),
    Canonical(CanonicalResume),
}

impl ResumeDocument {
    pub fn format(&self) -> ResumeFormat {
        match self {
            ResumeDocument::Structured(_) => ResumeFormat::Structured,
            ResumeDocument::Canonical(_) => ResumeFormat::Canonical,
        }
    }

    pub fn into_canonical(self) -> CanonicalResume {
        match self {
            ResumeDocument::Structured(structured) => structured_to_canonical(&structured),
            ResumeDocument::Canonical(canonical) => canonical,
        }
    }

    pub fn into_structured(self) -> StructuredResume {
        match self {
            ResumeDocument::Structured(structured) => structured,
            ResumeDocument::Canonical(canonical) => canonical_to_structured(&canonical),
        }
    }
}

/// Classifies a raw payload without decoding it.
pub fn classify(raw: &Value) -> Option<ResumeFormat> {
    let object = raw.as_object()?;

    let has_basics = object.contains_key("basics");
    let summary_has_headline = object
        .get("summary")
        .and_then(Value::as_object)
        .is_some_and(|summary| summary.contains_key("headline"));
    let experience_has_start = object
        .get("experience")
        .and_then(Value::as_array)
        .and_then(|entries| entries.first())
        .and_then(Value::as_object)
        .is_some_and(|first| first.contains_key("start_date"));

    if has_basics || summary_has_headline || experience_has_start {
        return Some(ResumeFormat::Structured);
    }

    let has_name = object.get("name").is_some_and(|v| !v.is_null());
    let has_email = object
        .get("contact")
        .and_then(|contact| contact.get("email"))
        .is_some_and(|v| !v.is_null());

    if has_name && has_email {
        Some(ResumeFormat::Canonical)
    } else {
        None
    }
}

/// Detects the schema of `raw` and decodes it into the matching variant.
pub fn detect_format(raw: &Value) -> PipelineResult<ResumeDocument> {
    let format = classify(raw).ok_or_else(|| {
        let reason = if raw.is_object() {
            "neither structured keys nor name with contact.email present".to_string()
        } else {
            format!("top-level value is {}", json_kind(raw))
        };
        PipelineError::unrecognized(reason)
    })?;

    debug!(%format, "detected resume format");

    let document = match format {
        ResumeFormat::Structured => ResumeDocument::Structured(
            serde_json::from_value(raw.clone()).map_err(|source| PipelineError::Schema {
                context: "structured resume",
                source,
            })?,
        ),
        ResumeFormat::Canonical => ResumeDocument::Canonical(
            serde_json::from_value(raw.clone()).map_err(|source| PipelineError::Schema {
                context: "canonical resume",
                source,
            })?,
        ),
    };
    Ok(document)
}

/// Detects and converts any supported payload into the canonical model.
pub fn normalize(raw: &Value) -> PipelineResult<CanonicalResume> {
    let document = detect_format(raw)?;
    info!(format = %document.format(), "normalizing resume");
    Ok(document.into_canonical())
}

fn non_empty(items: &Option<Vec<String>>) -> Option<&Vec<String>> {
    items.as_ref().filter(|items| !items.is_empty())
}

/// Highlights when present, otherwise the single fallback text, otherwise nothing.
fn details_from(highlights: &Option<Vec<String>>, fallback: &Option<String>) -> Vec<String> {
    match non_empty(highlights) {
        Some(items) => items.clone(),
        None => fallback.iter().cloned().collect(),
    }
}

fn compose_summary(summary: &StructuredSummary) -> String {
    let highlights = summary
        .highlights
        .as_deref()
        .unwrap_or_default()
        .join(" ");
    summary
        .headline
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(highlights.as_str()))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn structured_to_canonical(structured: &StructuredResume) -> CanonicalResume {
    let basics = &structured.basics;
    let highlights = non_empty(&structured.summary.highlights).cloned();

    CanonicalResume {
        name: basics.full_name.clone(),
        title: basics.title.clone(),
        contact: Contact {
            phone: basics.contact.phone.clone(),
            email: basics.contact.email.clone().unwrap_or_default(),
            location: basics.location.display(),
            linkedin: basics.contact.linkedin.clone(),
            github: basics.contact.github.clone(),
            portfolio: basics.contact.portfolio.clone(),
        },
        summary: compose_summary(&structured.summary),
        summary_headline: highlights
            .as_ref()
            .and(structured.summary.headline.clone()),
        summary_highlights: highlights.or_else(|| structured.summary.highlights.clone()),
        experience: structured
            .experience
            .iter()
            .map(|exp| ExperienceEntry {
                role: exp.role.clone(),
                company: exp.company.clone(),
                location: exp.location.clone(),
                duration: date_range::encode(
                    exp.start_date.as_deref(),
                    exp.end_date.as_deref(),
                    exp.is_current.unwrap_or(false),
                ),
                details: details_from(&exp.highlights, &exp.summary),
            })
            .collect(),
        projects: structured
            .projects
            .iter()
            .map(|project| ProjectEntry {
                title: project.name.clone(),
                link: project.link.clone(),
                details: details_from(&project.highlights, &project.description),
            })
            .collect(),
        education: structured
            .education
            .iter()
            .map(|edu| EducationEntry {
                degree: edu.degree.clone(),
                university: edu.institution.clone(),
                duration: date_range::encode(
                    edu.start_date.as_deref(),
                    edu.end_date.as_deref(),
                    false,
                ),
                cgpa: edu.gpa.clone(),
            })
            .collect(),
        skills: structured
            .skills
            .as_ref()
            .map(|s| skills::categorize(&s.categories))
            .unwrap_or_default(),
        certifications: structured.certifications.clone(),
        achievements: structured.achievements.clone(),
    }
}

fn is_bare_year(text: &str) -> bool {
    text.len() == 4 && text.chars().all(|c| c.is_ascii_digit())
}

/// One side of a duration: the decoded `YYYY-MM` when it re-encodes to the same
/// text, otherwise the text itself so the display survives the round trip.
fn duration_point(field: &'static str, text: &str, decoded: Option<String>) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Some(point) = decoded {
        if date_range::encode(None, Some(&point), false) == text {
            return Some(point);
        }
    }
    if !is_bare_year(text) {
        warn!(field, value = text, "field coercion fallback: date kept as free text");
    }
    Some(text.to_string())
}

/// Decodes a duration for the structured side. A lone date with no separator is a
/// completion date, so it is stored as the end of the range.
fn split_duration(field: &'static str, duration: &str) -> DateRange {
    let original = duration.trim();
    let normalized = original.replace(['\u{2013}', '\u{2014}'], "-");
    if normalized.is_empty() {
        return DateRange::default();
    }

    let decoded = date_range::decode(&normalized);
    let range = match normalized.split_once('-') {
        None => DateRange {
            start_date: None,
            end_date: duration_point(field, &normalized, decoded.start_date),
            is_current: None,
        },
        Some((start, _)) if decoded.is_current == Some(true) => DateRange {
            start_date: duration_point(field, start, decoded.start_date),
            end_date: None,
            is_current: Some(true),
        },
        Some((start, end)) => {
            let end_date = duration_point(field, end, decoded.end_date);
            DateRange {
                start_date: duration_point(field, start, decoded.start_date),
                is_current: end_date.as_ref().and(decoded.is_current),
                end_date,
            }
        }
    };

    let restored = date_range::encode(
        range.start_date.as_deref(),
        range.end_date.as_deref(),
        range.is_current.unwrap_or(false),
    );
    if restored != original {
        warn!(field, original, restored = %restored, "field coercion fallback: duration rewritten");
    }
    range
}

/// Structured summary for a canonical resume. The structured side has no room for a
/// plain summary next to highlights, so that combination is reported when it loses text.
fn split_summary(canonical: &CanonicalResume) -> StructuredSummary {
    let summary = match canonical.highlights() {
        Some(highlights) => StructuredSummary {
            headline: canonical.summary_headline.clone(),
            highlights: Some(highlights.to_vec()),
        },
        None => StructuredSummary {
            headline: Some(canonical.summary.clone())
                .filter(|s| !s.trim().is_empty())
                .or_else(|| canonical.summary_headline.clone()),
            // keeps an explicit empty list
            highlights: canonical.summary_highlights.clone(),
        },
    };

    if compose_summary(&summary) != canonical.summary.trim() {
        warn!(field = "summary", "field coercion fallback: summary rebuilt from headline and highlights");
    }
    let restored_headline = non_empty(&summary.highlights).and(summary.headline.as_ref());
    if restored_headline != canonical.summary_headline.as_ref() {
        warn!(field = "summaryHeadline", "field coercion fallback: headline not carried");
    }
    summary
}

pub fn canonical_to_structured(canonical: &CanonicalResume) -> StructuredResume {
    let contact = &canonical.contact;

    let summary = split_summary(canonical);

    StructuredResume {
        basics: Basics {
            full_name: canonical.name.clone(),
            title: canonical.title.clone(),
            location: contact
                .location
                .as_deref()
                .map(Location::from_display)
                .unwrap_or_default(),
            contact: StructuredContact {
                email: Some(contact.email.clone()).filter(|e| !e.is_empty()),
                phone: contact.phone.clone(),
                linkedin: contact.linkedin.clone(),
                github: contact.github.clone(),
                portfolio: contact.portfolio.clone(),
            },
        },
        summary,
        experience: canonical
            .experience
            .iter()
            .map(|exp| {
                let range = split_duration("experience.duration", &exp.duration);
                StructuredExperience {
                    company: exp.company.clone(),
                    role: exp.role.clone(),
                    location: exp.location.clone(),
                    start_date: range.start_date,
                    end_date: range.end_date,
                    is_current: range.is_current,
                    summary: None,
                    highlights: Some(exp.details.clone()).filter(|d| !d.is_empty()),
                    tech_stack: None,
                }
            })
            .collect(),
        projects: canonical
            .projects
            .iter()
            .map(|project| StructuredProject {
                name: project.title.clone(),
                link: project.link.clone(),
                highlights: Some(project.details.clone()).filter(|d| !d.is_empty()),
                ..Default::default()
            })
            .collect(),
        education: canonical
            .education
            .iter()
            .map(|edu| {
                let range = split_duration("education.duration", &edu.duration);
                StructuredEducation {
                    institution: edu.university.clone(),
                    degree: edu.degree.clone(),
                    start_date: range.start_date,
                    end_date: range.end_date,
                    gpa: edu.cgpa.clone(),
                    ..Default::default()
                }
            })
            .collect(),
        skills: skills::to_categories(&canonical.skills),
        certifications: canonical.certifications.clone(),
        achievements: canonical.achievements.clone(),
        metadata: None,
    }
}
