// src/templates/modern.rs
//! Two-column layout: narrative sections in the main column, skills and
//! credentials in the sidebar.

use crate::template_system::{Align, Block, Layout, RenderedDocument, TemplateId};
use crate::types::canonical::CanonicalResume;

use super::{
    bullet_list, education_entries, experience_entries, header, project_entries, skill_groups,
    summary_blocks,
};

pub fn render(resume: &CanonicalResume) -> RenderedDocument {
    let main = [
        Block::section("Summary", summary_blocks(resume)),
        Block::section("Experience", experience_entries(resume)),
        Block::section("Projects", project_entries(resume)),
    ];
    let sidebar = [
        Block::section("Skills", skill_groups(resume)),
        Block::section("Education", education_entries(resume)),
        Block::section("Certifications", bullet_list(resume.certifications())),
        Block::section("Achievements", bullet_list(resume.achievements())),
    ];

    RenderedDocument {
        template: TemplateId::Modern,
        layout: Layout::Sidebar,
        header: header(resume, Align::Left),
        main: main.into_iter().flatten().collect(),
        sidebar: sidebar.into_iter().flatten().collect(),
    }
}
