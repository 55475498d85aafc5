// src/templates/mod.rs
//! Building blocks shared by the resume templates. Each template module exposes a
//! pure `render` function registered in [`crate::template_system::TemplateRegistry`].

pub mod classic;
pub mod minimal;
pub mod modern;

use crate::template_system::{Align, Block};
use crate::types::canonical::CanonicalResume;

fn non_blank(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn optional(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

pub(crate) fn header(resume: &CanonicalResume, align: Align) -> Block {
    Block::Header {
        name: resume.name.clone(),
        title: resume.title.as_deref().and_then(optional),
        contact: resume.contact.lines(),
        align,
    }
}

/// Highlights take precedence over the plain summary; the headline leads them.
pub(crate) fn summary_blocks(resume: &CanonicalResume) -> Vec<Block> {
    if let Some(highlights) = resume.highlights() {
        let mut blocks = Vec::new();
        if let Some(headline) = resume.summary_headline.as_deref().and_then(optional) {
            blocks.push(Block::Paragraph { text: headline });
        }
        let items = non_blank(highlights);
        if !items.is_empty() {
            blocks.push(Block::Bullets { items });
        }
        return blocks;
    }
    optional(&resume.summary)
        .map(|text| vec![Block::Paragraph { text }])
        .unwrap_or_default()
}

pub(crate) fn experience_entries(resume: &CanonicalResume) -> Vec<Block> {
    resume
        .experience
        .iter()
        .map(|job| Block::Entry {
            title: job.role.clone(),
            subtitle: optional(&job.company),
            meta: optional(&job.duration),
            location: job.location.as_deref().and_then(optional),
            note: None,
            bullets: non_blank(&job.details),
        })
        .collect()
}

pub(crate) fn project_entries(resume: &CanonicalResume) -> Vec<Block> {
    resume
        .projects
        .iter()
        .map(|project| Block::Entry {
            title: project.title.clone(),
            subtitle: None,
            meta: project.link.as_deref().and_then(optional),
            location: None,
            note: None,
            bullets: non_blank(&project.details),
        })
        .collect()
}

pub(crate) fn education_entries(resume: &CanonicalResume) -> Vec<Block> {
    resume
        .education
        .iter()
        .map(|school| Block::Entry {
            title: school.degree.clone(),
            subtitle: optional(&school.university),
            meta: optional(&school.duration),
            location: None,
            note: school
                .cgpa
                .as_deref()
                .and_then(optional)
                .map(|cgpa| format!("CGPA: {}", cgpa)),
            bullets: Vec::new(),
        })
        .collect()
}

/// One labelled group per populated skill bucket, in the fixed bucket order.
pub(crate) fn skill_groups(resume: &CanonicalResume) -> Vec<Block> {
    resume
        .skills
        .populated()
        .map(|(bucket, items)| (bucket, non_blank(items)))
        .filter(|(_, items)| !items.is_empty())
        .map(|(bucket, items)| Block::SkillGroup {
            label: bucket.display_name().to_string(),
            items,
        })
        .collect()
}

pub(crate) fn bullet_list(items: &[String]) -> Vec<Block> {
    let items = non_blank(items);
    if items.is_empty() {
        Vec::new()
    } else {
        vec![Block::Bullets { items }]
    }
}

/// Items on a single line joined by `separator`, or nothing when the list is empty.
pub(crate) fn inline_list(label: Option<&str>, items: &[String], separator: &str) -> Vec<Block> {
    let items = non_blank(items);
    if items.is_empty() {
        return Vec::new();
    }
    vec![Block::Inline {
        label: label.map(str::to_string),
        text: items.join(separator),
    }]
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::canonical::SkillBucket;

    #[test]
    fn test_highlights_take_precedence_over_summary() {
        let mut resume = fixtures::full_resume();
        resume.summary_headline = Some("Pioneer".to_string());
        resume.summary_highlights = Some(vec!["First program".to_string()]);
        assert_eq!(
            summary_blocks(&resume),
            vec![
                Block::Paragraph { text: "Pioneer".to_string() },
                Block::Bullets { items: vec!["First program".to_string()] },
            ]
        );
    }

    #[test]
    fn test_plain_summary_without_highlights() {
        let mut resume = fixtures::full_resume();
        resume.summary_headline = Some("ignored".to_string());
        resume.summary_highlights = Some(vec![]);
        assert_eq!(
            summary_blocks(&resume),
            vec![Block::Paragraph { text: "Writes programs for engines.".to_string() }]
        );
        assert!(summary_blocks(&fixtures::sparse_resume()).is_empty());
    }

    #[test]
    fn test_skill_groups_follow_bucket_order() {
        let labels: Vec<String> = skill_groups(&fixtures::full_resume())
            .into_iter()
            .filter_map(|block| match block {
                Block::SkillGroup { label, .. } => Some(label),
                _ => None,
            })
            .collect();
        assert_eq!(
            labels,
            vec![
                SkillBucket::Frontend.display_name(),
                SkillBucket::Backend.display_name(),
                SkillBucket::SoftSkills.display_name(),
            ]
        );
    }

    #[test]
    fn test_blank_details_are_dropped() {
        match &experience_entries(&fixtures::full_resume())[0] {
            Block::Entry { bullets, meta, .. } => {
                assert_eq!(bullets, &vec!["Published notes".to_string()]);
                assert_eq!(meta.as_deref(), Some("Jan 1842 - Present"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_empty_lists_produce_no_blocks() {
        assert!(bullet_list(&[]).is_empty());
        assert!(bullet_list(&["  ".to_string()]).is_empty());
        assert!(inline_list(Some("Skills"), &[], " · ").is_empty());
    }
}
