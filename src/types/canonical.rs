// src/types/canonical.rs
//! Canonical resume model read by every template and by PDF export

use serde::{Deserialize, Serialize};

use crate::types::lenient;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CanonicalResume {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::record")]
    pub contact: Contact,
    #[serde(default, deserialize_with = "lenient::string")]
    pub summary: String,
    /// Only meaningful together with `summary_highlights`.
    #[serde(
        rename = "summaryHeadline",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub summary_headline: Option<String>,
    #[serde(
        rename = "summaryHighlights",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string_vec"
    )]
    pub summary_highlights: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::record_vec")]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default, deserialize_with = "lenient::record_vec")]
    pub projects: Vec<ProjectEntry>,
    #[serde(default, deserialize_with = "lenient::record_vec")]
    pub education: Vec<EducationEntry>,
    #[serde(default, deserialize_with = "lenient::record")]
    pub skills: SkillSet,
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
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Contact {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: String,
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

impl Contact {
    /// Display lines in header order: email, phone, location, then profile links.
    pub fn lines(&self) -> Vec<String> {
        std::iter::once(Some(&self.email).filter(|e| !e.is_empty()))
            .chain([
                self.phone.as_ref(),
                self.location.as_ref(),
                self.linkedin.as_ref(),
                self.github.as_ref(),
                self.portfolio.as_ref(),
            ])
            .flatten()
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default, deserialize_with = "lenient::string")]
    pub role: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub company: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub duration: String,
    #[serde(default, deserialize_with = "lenient::string_vec")]
    pub details: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectEntry {
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_vec")]
    pub details: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default, deserialize_with = "lenient::string")]
    pub degree: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub university: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub duration: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub cgpa: Option<String>,
}

/// The fixed legacy skill taxonomy, in rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkillBucket {
    Frontend,
    Backend,
    Database,
    Tools,
    SoftSkills,
}

impl SkillBucket {
    pub const ALL: [SkillBucket; 5] = [
        SkillBucket::Frontend,
        SkillBucket::Backend,
        SkillBucket::Database,
        SkillBucket::Tools,
        SkillBucket::SoftSkills,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SkillBucket::Frontend => "frontend",
            SkillBucket::Backend => "backend",
            SkillBucket::Database => "database",
            SkillBucket::Tools => "tools",
            SkillBucket::SoftSkills => "soft_skills",
        }
    }

    /// Category name used on the structured side.
    pub fn display_name(self) -> &'static str {
        match self {
            SkillBucket::Frontend => "Frontend",
            SkillBucket::Backend => "Backend",
            SkillBucket::Database => "Database",
            SkillBucket::Tools => "Tools & Technologies",
            SkillBucket::SoftSkills => "Soft Skills",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SkillSet {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string_vec"
    )]
    pub frontend: Option<Vec<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string_vec"
    )]
    pub backend: Option<Vec<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string_vec"
    )]
    pub database: Option<Vec<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string_vec"
    )]
    pub tools: Option<Vec<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string_vec"
    )]
    pub soft_skills: Option<Vec<String>>,
}

impl SkillSet {
    pub fn bucket(&self, bucket: SkillBucket) -> Option<&Vec<String>> {
        match bucket {
            SkillBucket::Frontend => self.frontend.as_ref(),
            SkillBucket::Backend => self.backend.as_ref(),
            SkillBucket::Database => self.database.as_ref(),
            SkillBucket::Tools => self.tools.as_ref(),
            SkillBucket::SoftSkills => self.soft_skills.as_ref(),
        }
    }

    fn bucket_mut(&mut self, bucket: SkillBucket) -> &mut Option<Vec<String>> {
        match bucket {
            SkillBucket::Frontend => &mut self.frontend,
            SkillBucket::Backend => &mut self.backend,
            SkillBucket::Database => &mut self.database,
            SkillBucket::Tools => &mut self.tools,
            SkillBucket::SoftSkills => &mut self.soft_skills,
        }
    }

    /// Appends items to a bucket, creating it on first use.
    pub(crate) fn extend_bucket(&mut self, bucket: SkillBucket, items: &[String]) {
        self.bucket_mut(bucket)
            .get_or_insert_with(Vec::new)
            .extend(items.iter().cloned());
    }

    /// Non-empty buckets in the fixed taxonomy order.
    pub fn populated(&self) -> impl Iterator<Item = (SkillBucket, &[String])> + '_ {
        SkillBucket::ALL.into_iter().filter_map(|bucket| {
            self.bucket(bucket)
                .filter(|items| !items.is_empty())
                .map(|items| (bucket, items.as_slice()))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.populated().next().is_none()
    }
}

impl CanonicalResume {
    /// Highlights that take precedence over the plain summary when rendering.
    pub fn highlights(&self) -> Option<&[String]> {
        self.summary_highlights
            .as_deref()
            .filter(|items| !items.is_empty())
    }

    pub fn has_summary(&self) -> bool {
        self.highlights().is_some() || !self.summary.trim().is_empty()
    }

    pub fn certifications(&self) -> &[String] {
        self.certifications.as_deref().unwrap_or_default()
    }

    pub fn achievements(&self) -> &[String] {
        self.achievements.as_deref().unwrap_or_default()
    }
}
