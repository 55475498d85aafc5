// src/templates/minimal.rs
//! Single column with skills and credentials collapsed onto inline lines.

use crate::template_system::{Align, Block, Layout, RenderedDocument, TemplateId};
use crate::types::canonical::CanonicalResume;

use super::{education_entries, experience_entries, header, inline_list, project_entries, summary_blocks};

const SEPARATOR: &str = " · ";

fn inline_skills(resume: &CanonicalResume) -> Vec<Block> {
    resume
        .skills
        .populated()
        .flat_map(|(bucket, items)| inline_list(Some(bucket.display_name()), items, ", "))
        .collect()
}

pub fn render(resume: &CanonicalResume) -> RenderedDocument {
    let main = [
        Block::section("About", summary_blocks(resume)),
        Block::section("Experience", experience_entries(resume)),
        Block::section("Education", education_entries(resume)),
        Block::section("Skills", inline_skills(resume)),
        Block::section("Projects", project_entries(resume)),
        Block::section("Certifications", inline_list(None, resume.certifications(), SEPARATOR)),
        Block::section("Achievements", inline_list(None, resume.achievements(), SEPARATOR)),
    ];

    RenderedDocument {
        template: TemplateId::Minimal,
        layout: Layout::SingleColumn,
        header: header(resume, Align::Left),
        main: main.into_iter().flatten().collect(),
        sidebar: Vec::new(),
    }
}
