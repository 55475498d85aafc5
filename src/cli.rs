// src/cli.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::PipelineConfig;
use crate::core::{detect_format, normalize, normalize_analysis, GenerationOutput};
use crate::error::PipelineError;
use crate::template_system::{TemplateId, TemplateRegistry};
use crate::types::PdfExportRequest;
use crate::utils::{get_file_extension, read_file_safe};

#[derive(Parser)]
#[command(name = "resume-pipeline")]
#[command(about = "Normalize, structure and render generated resumes")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (defaults to resume-pipeline.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Report which resume schema a JSON document uses
    Detect { input: PathBuf },
    /// Convert a resume in either schema to the canonical schema
    Normalize { input: PathBuf },
    /// Convert a resume in either schema to the structured schema
    ToStructured { input: PathBuf },
    /// Rebuild generated markup into resume sections
    StructureMarkup { input: PathBuf },
    /// Accept raw generation-service output (JSON, fenced JSON, or markup)
    Intake { input: PathBuf },
    /// Render a resume with one of the templates
    Render {
        input: PathBuf,
        #[arg(long)]
        template: Option<String>,
        /// Emit an HTML preview instead of the JSON presentation tree
        #[arg(long)]
        html: bool,
    },
    /// Normalize an analysis-service payload
    Analyze { input: PathBuf },
    /// Build the request body for the PDF export service
    ExportRequest {
        input: PathBuf,
        #[arg(long)]
        template: Option<String>,
    },
    /// List available templates
    Templates,
}

async fn read_json(path: &Path) -> Result<Value> {
    let content = read_file_safe(path).await?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON from {}", path.display()))
}

fn pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output")
}

fn user_facing(err: PipelineError) -> anyhow::Error {
    let message = err.user_message();
    anyhow::Error::new(err).context(message)
}

/// Runs one subcommand and returns what should be printed on stdout.
pub async fn run(command: Command, config: &PipelineConfig) -> Result<String> {
    let registry = TemplateRegistry::new();
    let template_or_default = |requested: Option<String>| match requested {
        Some(id) => registry.resolve(&id),
        None => config.default_template,
    };

    match command {
        Command::Detect { input } => {
            let document = detect_format(&read_json(&input).await?).map_err(user_facing)?;
            info!(format = %document.format(), "Detected resume format");
            pretty(&json!({ "format": document.format().to_string() }))
        }
        Command::Normalize { input } => {
            let canonical = normalize(&read_json(&input).await?).map_err(user_facing)?;
            pretty(&canonical)
        }
        Command::ToStructured { input } => {
            let document = detect_format(&read_json(&input).await?).map_err(user_facing)?;
            pretty(&document.into_structured())
        }
        Command::StructureMarkup { input } => {
            let markup = read_file_safe(&input).await?;
            Ok(config.markup_structurer().structure(&markup).to_html())
        }
        Command::Intake { input } => {
            let content = read_file_safe(&input).await?;
            let raw = match get_file_extension(&input.to_string_lossy()).as_deref() {
                Some("json") => serde_json::from_str(&content)
                    .with_context(|| format!("Failed to parse JSON from {}", input.display()))?,
                _ => Value::String(content),
            };
            match GenerationOutput::from_value(&raw, &config.markup_structurer())
                .map_err(user_facing)?
            {
                GenerationOutput::Document(document) => pretty(&document.into_canonical()),
                GenerationOutput::Markup(markup) => Ok(markup.to_html()),
            }
        }
        Command::Render {
            input,
            template,
            html,
        } => {
            let canonical = normalize(&read_json(&input).await?).map_err(user_facing)?;
            let template = template_or_default(template);
            let document = registry.render(template.as_str(), &canonical);
            info!(template = %template, sections = document.section_headings().len(), "Rendered resume");
            if html {
                Ok(document.to_html())
            } else {
                pretty(&document)
            }
        }
        Command::Analyze { input } => {
            let analysis = normalize_analysis(&read_json(&input).await?)?;
            pretty(&analysis)
        }
        Command::ExportRequest { input, template } => {
            let canonical = normalize(&read_json(&input).await?).map_err(user_facing)?;
            let template: TemplateId = template_or_default(template);
            pretty(&PdfExportRequest::new(template, &canonical))
        }
        Command::Templates => {
            let listing: Vec<Value> = registry
                .list()
                .iter()
                .map(|t| json!({ "id": t.id, "description": t.description }))
                .collect();
            pretty(&listing)
        }
    }
}
