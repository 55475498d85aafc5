// src/templates/classic.rs
//! Traditional single column with a centered header and full section titles.

use crate::template_system::{Align, Block, Layout, RenderedDocument, TemplateId};
use crate::types::canonical::CanonicalResume;

use super::{
    bullet_list, education_entries, experience_entries, header, project_entries, skill_groups,
    summary_blocks,
};

pub fn render(resume: &CanonicalResume) -> RenderedDocument {
    let main = [
        Block::section("Professional Summary", summary_blocks(resume)),
        Block::section("Professional Experience", experience_entries(resume)),
        Block::section("Education", education_entries(resume)),
        Block::section("Technical Skills", skill_groups(resume)),
        Block::section("Projects", project_entries(resume)),
        Block::section("Certifications", bullet_list(resume.certifications())),
        Block::section("Honors & Achievements", bullet_list(resume.achievements())),
    ];

    RenderedDocument {
        template: TemplateId::Classic,
        layout: Layout::SingleColumn,
        header: header(resume, Align::Center),
        main: main.into_iter().flatten().collect(),
        sidebar: Vec::new(),
    }
}
