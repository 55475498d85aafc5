// src/config.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::core::markup::{MarkupConfig, MarkupStructurer};
use crate::template_system::TemplateId;

pub const DEFAULT_CONFIG_FILE: &str = "resume-pipeline.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Template used when none is requested explicitly.
    pub default_template: TemplateId,
    pub log_level: String,
    /// When set, logs are written to this file as JSON lines.
    pub log_file: Option<PathBuf>,
    pub markup: MarkupConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_template: TemplateId::Modern,
            log_level: "info".to_string(),
            log_file: None,
            markup: MarkupConfig::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    local: Option<PipelineConfig>,
    production: Option<PipelineConfig>,
}

impl PipelineConfig {
    /// Load configuration for the current environment.
    ///
    /// An explicit path must exist. Without one, `resume-pipeline.yaml` in the
    /// working directory is used when present, built-in defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let environment = Self::get_environment();
        let config = match explicit {
            Some(path) => Self::load_from(path, &environment)?,
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::load_from(&path, &environment)?
                } else {
                    info!("No {} found, using built-in defaults", DEFAULT_CONFIG_FILE);
                    Self::default()
                }
            }
        };
        Ok(config.with_template_override(std::env::var("RESUME_TEMPLATE").ok()))
    }

    fn get_environment() -> String {
        std::env::var("RESUME_PIPELINE_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    pub fn load_from(path: &Path, environment: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_yaml(&content, environment)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        info!(
            environment,
            path = %path.display(),
            "Loaded pipeline configuration"
        );
        Ok(config)
    }

    /// Selects the `production` section for that environment, `local` for anything else.
    pub fn from_yaml(content: &str, environment: &str) -> Result<Self> {
        let file: ConfigFile =
            serde_yaml::from_str(content).context("Invalid pipeline configuration")?;
        let section = match environment {
            "production" => file.production,
            _ => file.local,
        };
        Ok(section.unwrap_or_else(|| {
            warn!(environment, "No configuration section for environment, using defaults");
            Self::default()
        }))
    }

    pub fn with_template_override(mut self, template: Option<String>) -> Self {
        if let Some(requested) = template.filter(|t| !t.trim().is_empty()) {
            match TemplateId::parse(&requested) {
                Some(id) => self.default_template = id,
                None => warn!(template = %requested, "Ignoring unknown template override"),
            }
        }
        self
    }

    pub fn markup_structurer(&self) -> MarkupStructurer {
        MarkupStructurer::new(self.markup.clone())
    }
}
