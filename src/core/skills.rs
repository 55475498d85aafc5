// src/core/skills.rs
//! Heuristic mapping of free-form skill categories onto the legacy taxonomy

use tracing::debug;

use crate::types::canonical::{SkillBucket, SkillSet};
use crate::types::structured::{SkillCategory, StructuredSkills};

/// Keyword rules checked in order; the first rule whose keyword appears in the
/// category name wins.
const BUCKET_RULES: &[(&[&str], SkillBucket)] = &[
    (&["frontend"], SkillBucket::Frontend),
    (&["backend"], SkillBucket::Backend),
    (&["database"], SkillBucket::Database),
    (&["cloud", "devops", "tools", "platform"], SkillBucket::Tools),
    (&["soft"], SkillBucket::SoftSkills),
];

/// Bucket for a single category name. Unmatched names fall back to `tools`.
pub fn bucket_for(category_name: &str) -> SkillBucket {
    let name = category_name.to_lowercase();
    BUCKET_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| name.contains(k)))
        .map(|(_, bucket)| *bucket)
        .unwrap_or_else(|| {
            debug!(category = category_name, "unmatched skill category, using tools");
            SkillBucket::Tools
        })
}

/// Collapses structured categories into legacy buckets. Items keep source order
/// and are not deduplicated.
pub fn categorize(categories: &[SkillCategory]) -> SkillSet {
    let mut skills = SkillSet::default();
    for category in categories.iter().filter(|c| !c.items.is_empty()) {
        skills.extend_bucket(bucket_for(&category.name), &category.items);
    }
    skills
}

/// One category per populated bucket, named with the bucket's display name.
/// Returns `None` when every bucket is empty or absent.
pub fn to_categories(skills: &SkillSet) -> Option<StructuredSkills> {
    let categories: Vec<SkillCategory> = skills
        .populated()
        .map(|(bucket, items)| SkillCategory {
            name: bucket.display_name().to_string(),
            items: items.to_vec(),
        })
        .collect();

    if categories.is_empty() {
        None
    } else {
        Some(StructuredSkills { categories })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name: &str, items: &[&str]) -> SkillCategory {
        SkillCategory {
            name: name.to_string(),
            items: items.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_cloud_goes_to_tools_and_frontend_stays() {
        let skills = categorize(&[
            category("Cloud Platforms", &["AWS"]),
            category("Frontend", &["React"]),
        ]);
        assert_eq!(skills.tools, Some(vec!["AWS".to_string()]));
        assert_eq!(skills.frontend, Some(vec!["React".to_string()]));
        assert_eq!(skills.backend, None);
    }

    #[test]
    fn test_precedence_order() {
        assert_eq!(bucket_for("Frontend & Backend"), SkillBucket::Frontend);
        assert_eq!(bucket_for("Backend Databases"), SkillBucket::Backend);
        assert_eq!(bucket_for("DATABASE"), SkillBucket::Database);
        assert_eq!(bucket_for("DevOps"), SkillBucket::Tools);
        assert_eq!(bucket_for("Soft Skills"), SkillBucket::SoftSkills);
        assert_eq!(bucket_for("Tools & Technologies"), SkillBucket::Tools);
    }

    #[test]
    fn test_unmatched_category_falls_back_to_tools() {
        let skills = categorize(&[
            category("Languages", &["Rust", "Go"]),
            category("Tools", &["Git"]),
        ]);
        assert_eq!(
            skills.tools,
            Some(vec!["Rust".to_string(), "Go".to_string(), "Git".to_string()])
        );
    }

    #[test]
    fn test_duplicates_are_kept() {
        let skills = categorize(&[
            category("Frontend", &["React"]),
            category("Frontend Frameworks", &["React", "Vue"]),
        ]);
        assert_eq!(
            skills.frontend,
            Some(vec!["React".to_string(), "React".to_string(), "Vue".to_string()])
        );
    }

    #[test]
    fn test_empty_categories_create_no_bucket() {
        let skills = categorize(&[category("Backend", &[])]);
        assert_eq!(skills, SkillSet::default());
    }

    #[test]
    fn test_to_categories_uses_display_names_and_omits_empty() {
        let skills = SkillSet {
            backend: Some(vec!["Axum".to_string()]),
            soft_skills: Some(vec!["Mentoring".to_string()]),
            database: Some(vec![]),
            ..Default::default()
        };
        let structured = to_categories(&skills).expect("categories present");
        let names: Vec<_> = structured.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Backend", "Soft Skills"]);
        assert_eq!(to_categories(&SkillSet::default()), None);
    }

    #[test]
    fn test_display_names_map_back_to_their_bucket() {
        for bucket in SkillBucket::ALL {
            assert_eq!(bucket_for(bucket.display_name()), bucket);
        }
    }
}
