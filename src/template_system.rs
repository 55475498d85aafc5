// src/template_system.rs
//! Presentation tree and the template registry that produces it

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

use crate::templates;
use crate::types::canonical::CanonicalResume;
use crate::utils::{escape_attr, escape_text, slugify};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateId {
    #[default]
    Modern,
    Minimal,
    Classic,
}

impl TemplateId {
    pub const ALL: [TemplateId; 3] = [TemplateId::Modern, TemplateId::Minimal, TemplateId::Classic];

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateId::Modern => "modern",
            TemplateId::Minimal => "minimal",
            TemplateId::Classic => "classic",
        }
    }

    /// Exact (case-insensitive) lookup without fallback.
    pub fn parse(id: &str) -> Option<Self> {
        let id = id.trim().to_lowercase();
        Self::ALL.into_iter().find(|t| t.as_str() == id)
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    SingleColumn,
    /// Main column plus a narrower sidebar.
    Sidebar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Header {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        contact: Vec<String>,
        align: Align,
    },
    Section {
        id: String,
        heading: String,
        body: Vec<Block>,
    },
    Paragraph {
        text: String,
    },
    Bullets {
        items: Vec<String>,
    },
    Entry {
        title: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        subtitle: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        meta: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        location: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        note: Option<String>,
        bullets: Vec<String>,
    },
    SkillGroup {
        label: String,
        items: Vec<String>,
    },
    Inline {
        #[serde(skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        text: String,
    },
}

impl Block {
    /// A section block, or `None` when it would have nothing under its heading.
    pub fn section(heading: &str, body: Vec<Block>) -> Option<Block> {
        if body.is_empty() {
            debug!(section = heading, "omitting empty section");
            return None;
        }
        Some(Block::Section {
            id: slugify(heading),
            heading: heading.to_string(),
            body,
        })
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Block::Header {
                name,
                title,
                contact,
                align,
            } => {
                let class = match align {
                    Align::Left => "resume-header",
                    Align::Center => "resume-header centered",
                };
                out.push_str(&format!("<header class=\"{}\">", class));
                out.push_str(&format!("<h1>{}</h1>", escape_text(name)));
                if let Some(title) = title {
                    out.push_str(&format!("<p class=\"title\">{}</p>", escape_text(title)));
                }
                if !contact.is_empty() {
                    out.push_str("<p class=\"contact\">");
                    let lines: Vec<String> = contact.iter().map(|c| escape_text(c)).collect();
                    out.push_str(&lines.join(" | "));
                    out.push_str("</p>");
                }
                out.push_str("</header>");
            }
            Block::Section { id, heading, body } => {
                out.push_str(&format!(
                    "<section id=\"{}\"><h2>{}</h2>",
                    escape_attr(id),
                    escape_text(heading)
                ));
                for block in body {
                    block.write_html(out);
                }
                out.push_str("</section>");
            }
            Block::Paragraph { text } => {
                out.push_str(&format!("<p>{}</p>", escape_text(text)));
            }
            Block::Bullets { items } => write_list(items, out),
            Block::Entry {
                title,
                subtitle,
                meta,
                location,
                note,
                bullets,
            } => {
                out.push_str("<div class=\"entry\"><div class=\"entry-head\">");
                out.push_str(&format!("<strong>{}</strong>", escape_text(title)));
                if let Some(subtitle) = subtitle {
                    out.push_str(&format!("<span class=\"subtitle\">{}</span>", escape_text(subtitle)));
                }
                if let Some(meta) = meta {
                    out.push_str(&format!("<span class=\"meta\">{}</span>", escape_text(meta)));
                }
                out.push_str("</div>");
                if let Some(location) = location {
                    out.push_str(&format!("<p class=\"location\">{}</p>", escape_text(location)));
                }
                if let Some(note) = note {
                    out.push_str(&format!("<p class=\"note\">{}</p>", escape_text(note)));
                }
                if !bullets.is_empty() {
                    write_list(bullets, out);
                }
                out.push_str("</div>");
            }
            Block::SkillGroup { label, items } => {
                out.push_str(&format!(
                    "<p class=\"skill-group\"><strong>{}:</strong> {}</p>",
                    escape_text(label),
                    escape_text(&items.join(", "))
                ));
            }
            Block::Inline { label, text } => {
                out.push_str("<p class=\"inline\">");
                if let Some(label) = label {
                    out.push_str(&format!("<strong>{}:</strong> ", escape_text(label)));
                }
                out.push_str(&escape_text(text));
                out.push_str("</p>");
            }
        }
    }
}

fn write_list(items: &[String], out: &mut String) {
    out.push_str("<ul>");
    for item in items {
        out.push_str(&format!("<li>{}</li>", escape_text(item)));
    }
    out.push_str("</ul>");
}

/// Output of a template: a header plus ordered blocks for each column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedDocument {
    pub template: TemplateId,
    pub layout: Layout,
    pub header: Block,
    pub main: Vec<Block>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sidebar: Vec<Block>,
}

impl RenderedDocument {
    /// Section headings in display order: main column first, then the sidebar.
    pub fn section_headings(&self) -> Vec<&str> {
        self.main
            .iter()
            .chain(self.sidebar.iter())
            .filter_map(|block| match block {
                Block::Section { heading, .. } => Some(heading.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn to_html(&self) -> String {
        let mut out = format!(
            "<article class=\"resume template-{}\">",
            self.template.as_str()
        );
        self.header.write_html(&mut out);
        match self.layout {
            Layout::SingleColumn => {
                for block in &self.main {
                    block.write_html(&mut out);
                }
            }
            Layout::Sidebar => {
                out.push_str("<div class=\"columns\"><main>");
                for block in &self.main {
                    block.write_html(&mut out);
                }
                out.push_str("</main><aside>");
                for block in &self.sidebar {
                    block.write_html(&mut out);
                }
                out.push_str("</aside></div>");
            }
        }
        out.push_str("</article>");
        out
    }
}

pub type RenderFn = fn(&CanonicalResume) -> RenderedDocument;

#[derive(Debug, Clone)]
pub struct Template {
    pub id: TemplateId,
    pub description: &'static str,
    render: RenderFn,
}

impl Template {
    pub fn render(&self, resume: &CanonicalResume) -> RenderedDocument {
        (self.render)(resume)
    }
}

/// Lookup table from template identifier to render function.
pub struct TemplateRegistry {
    templates: HashMap<&'static str, Template>,
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            templates: HashMap::new(),
        };
        registry.register(
            TemplateId::Modern,
            "Two-column layout with a skills and education sidebar",
            templates::modern::render,
        );
        registry.register(
            TemplateId::Minimal,
            "Single column with compact inline skills",
            templates::minimal::render,
        );
        registry.register(
            TemplateId::Classic,
            "Traditional centered header and full section titles",
            templates::classic::render,
        );
        registry
    }

    fn register(&mut self, id: TemplateId, description: &'static str, render: RenderFn) {
        self.templates.insert(
            id.as_str(),
            Template {
                id,
                description,
                render,
            },
        );
    }

    /// Template for `id`; unknown identifiers fall back to `modern`.
    pub fn get(&self, id: &str) -> &Template {
        let key = id.trim().to_lowercase();
        self.templates.get(key.as_str()).unwrap_or_else(|| {
            warn!(template = id, "unknown template, falling back to modern");
            &self.templates[TemplateId::Modern.as_str()]
        })
    }

    pub fn resolve(&self, id: &str) -> TemplateId {
        self.get(id).id
    }

    pub fn render(&self, id: &str, resume: &CanonicalResume) -> RenderedDocument {
        self.get(id).render(resume)
    }

    /// Registered templates in identifier order.
    pub fn list(&self) -> Vec<&Template> {
        TemplateId::ALL
            .iter()
            .filter_map(|id| self.templates.get(id.as_str()))
            .collect()
    }
}
