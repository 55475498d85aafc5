// src/core/markup.rs
//! Rebuilds loosely tagged generated HTML into resume sections.
//!
//! The input is parsed once with `scraper` into an owned [`MarkupNode`] tree and a
//! new [`StructuredMarkup`] is assembled from it. Nothing is mutated in place, and
//! nodes that do not fit an expected shape are carried over unchanged.

use regex::Regex;
use scraper::{ElementRef, Html, Node};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::debug;

use crate::utils::{escape_attr, escape_text, strip_code_fence};

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "meta", "link", "col", "source", "wbr"];
const CONTAINER_ELEMENTS: &[&str] = &["div", "article", "main", "section", "body"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupConfig {
    /// Skill lists longer than this are split into two columns.
    pub skill_column_threshold: usize,
    /// Section titles whose fourth-level headings become title/date rows.
    pub section_labels: Vec<String>,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            skill_column_threshold: 6,
            section_labels: vec![
                "Experience".to_string(),
                "Education".to_string(),
                "Work Experience".to_string(),
                "Professional Experience".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarkupNode {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        children: Vec<MarkupNode>,
    },
    Text(String),
}

impl MarkupNode {
    pub fn element(tag: &str, children: Vec<MarkupNode>) -> Self {
        MarkupNode::Element {
            tag: tag.to_string(),
            attrs: Vec::new(),
            children,
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            MarkupNode::Element { tag, .. } => Some(tag.as_str()),
            MarkupNode::Text(_) => None,
        }
    }

    pub fn children(&self) -> &[MarkupNode] {
        match self {
            MarkupNode::Element { children, .. } => children,
            MarkupNode::Text(_) => &[],
        }
    }

    pub fn heading_level(&self) -> Option<u8> {
        match self.tag()?.as_bytes() {
            [b'h', level @ b'1'..=b'6'] => Some(level - b'0'),
            _ => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self.tag(), Some("ul") | Some("ol"))
    }

    /// Whitespace-only text nodes carry no content.
    pub fn is_blank(&self) -> bool {
        matches!(self, MarkupNode::Text(t) if t.trim().is_empty())
    }

    /// Visible text with whitespace collapsed.
    pub fn text(&self) -> String {
        let mut raw = String::new();
        self.collect_text(&mut raw);
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            MarkupNode::Text(t) => out.push_str(t),
            MarkupNode::Element { children, .. } => {
                for child in children {
                    child.collect_text(out);
                    out.push(' ');
                }
            }
        }
    }

    /// Copy of this element with `class` appended to its class list.
    pub fn with_class(&self, class: &str) -> MarkupNode {
        match self {
            MarkupNode::Text(_) => self.clone(),
            MarkupNode::Element {
                tag,
                attrs,
                children,
            } => {
                let mut attrs = attrs.clone();
                match attrs.iter_mut().find(|(name, _)| name == "class") {
                    Some((_, value)) if !value.split_whitespace().any(|c| c == class) => {
                        value.push(' ');
                        value.push_str(class);
                    }
                    Some(_) => {}
                    None => attrs.push(("class".to_string(), class.to_string())),
                }
                MarkupNode::Element {
                    tag: tag.clone(),
                    attrs,
                    children: children.clone(),
                }
            }
        }
    }

    pub fn write_html(&self, out: &mut String) {
        match self {
            MarkupNode::Text(t) => out.push_str(&escape_text(t)),
            MarkupNode::Element {
                tag,
                attrs,
                children,
            } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    out.push_str(&format!(" {}=\"{}\"", name, escape_attr(value)));
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&tag.as_str()) {
                    return;
                }
                for child in children {
                    child.write_html(out);
                }
                out.push_str(&format!("</{}>", tag));
            }
        }
    }
}

fn convert_element(element: ElementRef<'_>) -> MarkupNode {
    let children = element
        .children()
        .filter_map(|child| match child.value() {
            Node::Text(text) => Some(MarkupNode::Text(text.to_string())),
            Node::Element(_) => ElementRef::wrap(child).map(convert_element),
            _ => None,
        })
        .collect();

    MarkupNode::Element {
        tag: element.value().name().to_string(),
        attrs: element
            .value()
            .attrs()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect(),
        children,
    }
}

/// Parses an HTML fragment into owned top-level nodes.
pub fn parse_fragment(input: &str) -> Vec<MarkupNode> {
    let fragment = Html::parse_fragment(input);
    match convert_element(fragment.root_element()) {
        MarkupNode::Element { children, .. } => children,
        text => vec![text],
    }
}

/// Descends through lone wrapper elements so headings become siblings.
fn unwrap_containers(nodes: Vec<MarkupNode>) -> Vec<MarkupNode> {
    let mut nodes = nodes;
    loop {
        let mut content = nodes.iter().filter(|n| !n.is_blank());
        let (Some(only), None) = (content.next(), content.next()) else {
            return nodes;
        };
        let is_wrapper = only
            .tag()
            .is_some_and(|tag| CONTAINER_ELEMENTS.contains(&tag))
            && only.children().iter().any(|c| c.heading_level().is_some());
        if !is_wrapper {
            return nodes;
        }
        debug!(tag = only.tag(), "descending into wrapper element");
        nodes = only.children().to_vec();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// Experience or education: fourth-level headings become rows.
    Entries,
    Skills,
    General,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryRow {
    pub primary: String,
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionItem {
    Entry(EntryRow),
    /// A long list split in two. Both columns keep the source list's tag and attributes.
    SkillColumns {
        list_tag: String,
        attrs: Vec<(String, String)>,
        left: Vec<MarkupNode>,
        right: Vec<MarkupNode>,
    },
    Node(MarkupNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkupSection {
    pub title: String,
    pub kind: SectionKind,
    pub heading: MarkupNode,
    pub items: Vec<SectionItem>,
}

impl MarkupSection {
    pub fn rows(&self) -> impl Iterator<Item = &EntryRow> {
        self.items.iter().filter_map(|item| match item {
            SectionItem::Entry(row) => Some(row),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarkupBlock {
    Node(MarkupNode),
    /// Second-level heading directly under the document title.
    Subtitle(MarkupNode),
    Section(MarkupSection),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructuredMarkup {
    pub blocks: Vec<MarkupBlock>,
}

impl StructuredMarkup {
    pub fn sections(&self) -> impl Iterator<Item = &MarkupSection> {
        self.blocks.iter().filter_map(|block| match block {
            MarkupBlock::Section(section) => Some(section),
            _ => None,
        })
    }

    pub fn section(&self, title: &str) -> Option<&MarkupSection> {
        self.sections()
            .find(|s| s.title.eq_ignore_ascii_case(title.trim()))
    }

    pub fn subtitle(&self) -> Option<&MarkupNode> {
        self.blocks.iter().find_map(|block| match block {
            MarkupBlock::Subtitle(node) => Some(node),
            _ => None,
        })
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            match block {
                MarkupBlock::Node(node) => node.write_html(&mut out),
                MarkupBlock::Subtitle(node) => node.with_class("subtitle").write_html(&mut out),
                MarkupBlock::Section(section) => write_section(section, &mut out),
            }
        }
        out
    }
}

fn write_section(section: &MarkupSection, out: &mut String) {
    out.push_str(&format!(
        "<section class=\"resume-section\" data-title=\"{}\">",
        escape_attr(&section.title)
    ));
    section.heading.with_class("section-title").write_html(out);
    for item in &section.items {
        match item {
            SectionItem::Node(node) => node.write_html(out),
            SectionItem::Entry(row) => {
                out.push_str("<div class=\"entry-row\">");
                out.push_str(&format!(
                    "<span class=\"entry-title\">{}</span>",
                    escape_text(&row.primary)
                ));
                if let Some(date) = &row.date {
                    out.push_str(&format!(
                        "<span class=\"entry-date\">{}</span>",
                        escape_text(date)
                    ));
                }
                out.push_str("</div>");
            }
            SectionItem::SkillColumns {
                list_tag,
                attrs,
                left,
                right,
            } => {
                out.push_str("<div class=\"skills-columns\">");
                for column in [left, right] {
                    MarkupNode::Element {
                        tag: list_tag.clone(),
                        attrs: attrs.clone(),
                        children: column.clone(),
                    }
                    .with_class("skills-column")
                    .write_html(out);
                }
                out.push_str("</div>");
            }
        }
    }
    out.push_str("</section>");
}

fn entry_heading_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(.+?)\s*\(([^()]*)\)\s*$").expect("valid regex"))
}

/// Splits `"Title (dates)"` into a row; anything else becomes a title-only row.
pub fn parse_entry_heading(text: &str) -> EntryRow {
    let text = text.trim();
    match entry_heading_pattern().captures(text) {
        Some(caps) => EntryRow {
            primary: caps[1].trim().to_string(),
            date: Some(caps[2].trim().to_string()).filter(|d| !d.is_empty()),
        },
        None => {
            debug!(heading = text, "entry heading has no trailing date range");
            EntryRow {
                primary: text.to_string(),
                date: None,
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct MarkupStructurer {
    pub config: MarkupConfig,
}

impl Default for MarkupStructurer {
    fn default() -> Self {
        Self::new(MarkupConfig::default())
    }
}

impl MarkupStructurer {
    pub fn new(config: MarkupConfig) -> Self {
        Self { config }
    }

    pub fn structure(&self, input: &str) -> StructuredMarkup {
        let nodes = unwrap_containers(parse_fragment(strip_code_fence(input)));
        let subtitle_index = subtitle_index(&nodes);

        let mut blocks = Vec::new();
        let mut open: Option<(MarkupNode, Vec<MarkupNode>)> = None;

        for (index, node) in nodes.into_iter().enumerate() {
            match node.heading_level() {
                Some(level) if level <= 3 => {
                    if let Some((heading, body)) = open.take() {
                        blocks.push(MarkupBlock::Section(self.build_section(heading, body)));
                    }
                    if level == 3 {
                        open = Some((node, Vec::new()));
                    } else if Some(index) == subtitle_index {
                        blocks.push(MarkupBlock::Subtitle(node));
                    } else {
                        blocks.push(MarkupBlock::Node(node));
                    }
                }
                _ => match open.as_mut() {
                    Some((_, body)) => body.push(node),
                    None => blocks.push(MarkupBlock::Node(node)),
                },
            }
        }
        if let Some((heading, body)) = open.take() {
            blocks.push(MarkupBlock::Section(self.build_section(heading, body)));
        }

        StructuredMarkup { blocks }
    }

    fn section_kind(&self, title: &str) -> SectionKind {
        if self
            .config
            .section_labels
            .iter()
            .any(|label| label.trim().eq_ignore_ascii_case(title))
        {
            SectionKind::Entries
        } else if title.to_lowercase().contains("skill") {
            SectionKind::Skills
        } else {
            SectionKind::General
        }
    }

    fn build_section(&self, heading: MarkupNode, body: Vec<MarkupNode>) -> MarkupSection {
        let title = heading.text();
        let kind = self.section_kind(&title);

        let items = match kind {
            SectionKind::Entries => body
                .into_iter()
                .map(|node| match node.heading_level() {
                    Some(4) => SectionItem::Entry(parse_entry_heading(&node.text())),
                    _ => SectionItem::Node(node),
                })
                .collect(),
            SectionKind::Skills => self.split_skill_list(&title, body),
            SectionKind::General => body.into_iter().map(SectionItem::Node).collect(),
        };

        MarkupSection {
            title,
            kind,
            heading,
            items,
        }
    }

    fn split_skill_list(&self, title: &str, body: Vec<MarkupNode>) -> Vec<SectionItem> {
        let list_count = body.iter().filter(|n| n.is_list()).count();
        if list_count != 1 {
            if list_count > 1 {
                debug!(section = title, lists = list_count, "skill section has several lists, left as-is");
            }
            return body.into_iter().map(SectionItem::Node).collect();
        }

        body.into_iter()
            .map(|node| {
                if !node.is_list() {
                    return SectionItem::Node(node);
                }
                let item_count = node.children().iter().filter(|c| c.tag() == Some("li")).count();
                if item_count <= self.config.skill_column_threshold {
                    return SectionItem::Node(node);
                }
                let MarkupNode::Element { tag, attrs, children } = node else {
                    return SectionItem::Node(node);
                };

                // Items alternate between columns; anything else follows the item before it.
                let (mut left, mut right) = (Vec::new(), Vec::new());
                let mut li_seen = 0usize;
                for child in children {
                    if child.is_blank() {
                        continue;
                    }
                    let is_item = child.tag() == Some("li");
                    let to_left = if is_item { li_seen % 2 == 0 } else { li_seen == 0 || li_seen % 2 == 1 };
                    if is_item {
                        li_seen += 1;
                    }
                    if to_left {
                        left.push(child);
                    } else {
                        right.push(child);
                    }
                }
                SectionItem::SkillColumns {
                    list_tag: tag,
                    attrs,
                    left,
                    right,
                }
            })
            .collect()
    }
}

/// Index of the second-level heading that immediately follows the document's only
/// first-level heading.
fn subtitle_index(nodes: &[MarkupNode]) -> Option<usize> {
    let mut titles = nodes
        .iter()
        .enumerate()
        .filter(|(_, n)| n.heading_level() == Some(1));
    let (title_index, _) = titles.next()?;
    if titles.next().is_some() {
        return None;
    }

    nodes
        .iter()
        .enumerate()
        .skip(title_index + 1)
        .find(|(_, n)| !n.is_blank())
        .filter(|(_, n)| n.heading_level() == Some(2))
        .map(|(index, _)| index)
}

/// Structures markup with the default section labels and column threshold.
pub fn structure_markup(input: &str) -> StructuredMarkup {
    MarkupStructurer::default().structure(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENERATED: &str = r#"
        <h1>Jane Doe</h1>
        <h2>Platform Engineer</h2>
        <p>jane@example.com</p>
        <h3>Experience</h3>
        <h4>Engineer (2020-2022)</h4>
        <ul><li>Built pipelines</li></ul>
        <h4>Intern at Initech</h4>
        <p>Summer project</p>
        <h3>Skills</h3>
        <ul><li>Rust</li><li>Go</li><li>SQL</li><li>Docker</li><li>AWS</li><li>Linux</li><li>Git</li></ul>
        <h3>Interests</h3>
        <p>Climbing</p>
    "#;

    #[test]
    fn test_entry_row_from_dated_heading() {
        let doc = structure_markup(GENERATED);
        let experience = doc.section("Experience").expect("experience section");
        let rows: Vec<_> = experience.rows().collect();
        assert_eq!(rows[0].primary, "Engineer");
        assert_eq!(rows[0].date.as_deref(), Some("2020-2022"));
        assert_eq!(rows[1].primary, "Intern at Initech");
        assert_eq!(rows[1].date, None);
        assert_eq!(experience.kind, SectionKind::Entries);
    }

    #[test]
    fn test_section_collects_siblings_until_next_heading() {
        let doc = structure_markup(GENERATED);
        let titles: Vec<_> = doc.sections().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Experience", "Skills", "Interests"]);

        let interests = doc.section("interests").expect("interests");
        let texts: Vec<String> = interests
            .items
            .iter()
            .filter_map(|item| match item {
                SectionItem::Node(node) if !node.is_blank() => Some(node.text()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["Climbing"]);
    }

    #[test]
    fn test_long_skill_list_splits_into_alternating_columns() {
        let doc = structure_markup(GENERATED);
        let skills = doc.section("Skills").expect("skills");
        let columns = skills
            .items
            .iter()
            .find_map(|item| match item {
                SectionItem::SkillColumns { left, right, .. } => Some((left, right)),
                _ => None,
            })
            .expect("columns");
        let left: Vec<_> = columns.0.iter().map(MarkupNode::text).collect();
        let right: Vec<_> = columns.1.iter().map(MarkupNode::text).collect();
        assert_eq!(left, vec!["Rust", "SQL", "AWS", "Git"]);
        assert_eq!(right, vec!["Go", "Docker", "Linux"]);
    }

    #[test]
    fn test_short_skill_list_is_untouched() {
        let doc = structure_markup("<h3>Technical Skills</h3><ul><li>Rust</li><li>Go</li></ul>");
        let skills = doc.section("Technical Skills").expect("skills");
        assert_eq!(skills.kind, SectionKind::Skills);
        assert!(matches!(&skills.items[0], SectionItem::Node(n) if n.is_list()));
    }

    #[test]
    fn test_subtitle_after_single_title() {
        let doc = structure_markup(GENERATED);
        assert_eq!(doc.subtitle().map(MarkupNode::text).as_deref(), Some("Platform Engineer"));
        assert!(doc.to_html().contains("<h2 class=\"subtitle\">Platform Engineer</h2>"));
    }

    #[test]
    fn test_no_subtitle_when_title_is_not_unique() {
        let doc = structure_markup("<h1>A</h1><h2>B</h2><h1>C</h1>");
        assert!(doc.subtitle().is_none());
        let doc = structure_markup("<h1>A</h1><p>x</p><h2>B</h2>");
        assert!(doc.subtitle().is_none());
    }

    #[test]
    fn test_fourth_level_headings_outside_entry_sections_are_kept() {
        let doc = structure_markup("<h3>Projects</h3><h4>Compiler (2019)</h4>");
        let projects = doc.section("Projects").expect("projects");
        assert_eq!(projects.rows().count(), 0);
        assert!(matches!(&projects.items[0], SectionItem::Node(n) if n.heading_level() == Some(4)));
    }

    #[test]
    fn test_wrapper_div_and_code_fence_are_tolerated() {
        let doc = structure_markup(
            "```html\n<div class=\"resume\"><h3>Education</h3><h4>BSc CS (2014 - 2018)</h4></div>\n```",
        );
        let education = doc.section("Education").expect("education");
        let row = education.rows().next().expect("row");
        assert_eq!(row.primary, "BSc CS");
        assert_eq!(row.date.as_deref(), Some("2014 - 2018"));
    }

    #[test]
    fn test_unstructured_input_passes_through() {
        let doc = structure_markup("<p>Just a paragraph &amp; more</p>");
        assert_eq!(doc.sections().count(), 0);
        assert_eq!(doc.to_html(), "<p>Just a paragraph &amp; more</p>");
    }

    #[test]
    fn test_html_output_shapes() {
        let html = structure_markup(GENERATED).to_html();
        assert!(html.contains("<section class=\"resume-section\" data-title=\"Experience\">"));
        assert!(html.contains("<h3 class=\"section-title\">Experience</h3>"));
        assert!(html.contains(
            "<div class=\"entry-row\"><span class=\"entry-title\">Engineer</span><span class=\"entry-date\">2020-2022</span></div>"
        ));
        assert!(html.contains("<div class=\"skills-columns\"><ul class=\"skills-column\"><li>Rust</li>"));
    }

    #[test]
    fn test_parse_entry_heading_edge_cases() {
        assert_eq!(parse_entry_heading("Lead ()").date, None);
        assert_eq!(parse_entry_heading("Lead ()").primary, "Lead");
        assert_eq!(parse_entry_heading("(2020)").primary, "(2020)");
        let row = parse_entry_heading("Dev (Acme) (2019 - Present)");
        assert_eq!(row.primary, "Dev (Acme)");
        assert_eq!(row.date.as_deref(), Some("2019 - Present"));
    }

    #[test]
    fn test_skill_columns_keep_list_attributes_and_extra_children() {
        let structurer = MarkupStructurer::new(MarkupConfig {
            skill_column_threshold: 2,
            ..Default::default()
        });
        let doc = structurer.structure(
            "<h3>Skills</h3><ul class=\"tags\"><li>a</li><li>b</li><!-- x --><li>c</li></ul>",
        );
        let html = doc.to_html();
        assert!(html.contains("<ul class=\"tags skills-column\"><li>a</li><li>c</li></ul>"));
        assert!(html.contains("<ul class=\"tags skills-column\"><li>b</li></ul>"));

        let doc = structurer.structure(
            "<h3>Skills</h3><ul><li>a</li><li>b</li><span>more</span><li>c</li></ul>",
        );
        let skills = doc.section("Skills").expect("skills");
        match &skills.items[0] {
            SectionItem::SkillColumns { right, .. } => {
                let texts: Vec<_> = right.iter().map(MarkupNode::text).collect();
                assert_eq!(texts, vec!["b", "more"]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_custom_threshold() {
        let structurer = MarkupStructurer::new(MarkupConfig {
            skill_column_threshold: 2,
            ..Default::default()
        });
        let doc = structurer.structure("<h3>Skills</h3><ul><li>a</li><li>b</li><li>c</li></ul>");
        let skills = doc.section("Skills").expect("skills");
        assert!(skills
            .items
            .iter()
            .any(|item| matches!(item, SectionItem::SkillColumns { .. })));
    }
}
