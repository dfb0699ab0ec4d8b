//! `load_config` module: loads the static YAML config and injects secrets from the environment.
//!
//! This is the only place where user-supplied YAML is parsed and mapped to typed settings.
//!
//! # Responsibilities
//! - Parse the config file into [`CliConfig`]
//! - Map loosely-typed values (format names) onto core types, rejecting unknown ones by name
//! - Inject the narrative API key from `NARRATIVE_API_KEY`; the file never holds secrets
//!
//! # Errors
//! All errors use `anyhow::Error` and are surfaced at the CLI boundary.
use anyhow::{bail, Result};
use netdoc_core::render::{Format, ReportLabels};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Environment variable holding the narrative service key.
pub const NARRATIVE_API_KEY_ENV: &str = "NARRATIVE_API_KEY";

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub output: OutputSection,
    pub report: ReportLabels,
    pub narrative: NarrativeSection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputSection {
    pub dir: PathBuf,
    pub formats: Vec<Format>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NarrativeSection {
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
    /// Injected from the environment, never read from the file.
    pub api_key: Option<String>,
}

impl Default for NarrativeSection {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    output: RawOutput,
    #[serde(default)]
    report: Option<RawReport>,
    #[serde(default)]
    narrative: Option<RawNarrative>,
}

#[derive(Debug, Deserialize)]
struct RawOutput {
    dir: PathBuf,
    #[serde(default)]
    formats: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawReport {
    organization: Option<String>,
    user: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawNarrative {
    #[serde(default)]
    enabled: bool,
    endpoint: Option<String>,
    model: Option<String>,
}

fn parse_formats(names: Option<Vec<String>>) -> Result<Vec<Format>> {
    let Some(names) = names else {
        return Ok(Format::ALL.to_vec());
    };
    if names.is_empty() {
        bail!("output.formats must list at least one format");
    }
    let mut formats = Vec::with_capacity(names.len());
    for name in names {
        let format: Format = match name.parse() {
            Ok(format) => format,
            Err(e) => {
                error!(format = %name, "Unknown output format in config");
                bail!("Invalid output.formats entry {name:?}: {e}");
            }
        };
        if !formats.contains(&format) {
            formats.push(format);
        }
    }
    Ok(formats)
}

/// Loads a static YAML config file and injects secrets from the environment.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let raw: RawConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    let formats = parse_formats(raw.output.formats)?;

    let defaults = ReportLabels::default();
    let report = match raw.report {
        Some(r) => ReportLabels {
            organization: r.organization.unwrap_or(defaults.organization),
            user: r.user.unwrap_or(defaults.user),
        },
        None => defaults,
    };

    let mut narrative = NarrativeSection::default();
    if let Some(n) = raw.narrative {
        narrative.enabled = n.enabled;
        if let Some(endpoint) = n.endpoint {
            narrative.endpoint = endpoint;
        }
        if let Some(model) = n.model {
            narrative.model = model;
        }
    }

    if narrative.enabled {
        match env::var(NARRATIVE_API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => {
                info!(
                    model = %narrative.model,
                    "Narrative enabled; API key loaded from environment"
                );
                narrative.api_key = Some(key);
            }
            _ => {
                error!("Narrative enabled but {} is not set", NARRATIVE_API_KEY_ENV);
                bail!("narrative.enabled is true but {NARRATIVE_API_KEY_ENV} is not set");
            }
        }
    } else {
        info!("Narrative disabled; reports will omit narrative sections");
    }

    Ok(CliConfig {
        output: OutputSection {
            dir: raw.output.dir,
            formats,
        },
        report,
        narrative,
    })
}
