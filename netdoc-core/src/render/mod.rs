//! Report renderer.
//!
//! Every format renders the same fixed section order from the same input
//! tuple. The markup and paginated backends consume one intermediate
//! [`Document`] assembled by [`build_document`]; the structured-data backend
//! serialises the typed values directly. Backends share no state.

mod document;
mod html;
mod json;
mod markdown;
mod pdf;
pub mod wrap;

pub use document::{build_document, Block, Document, DocumentBuilder, Section, SectionBuilder};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::audit::AuditReport;
use crate::model::ParsedConfig;
use crate::narrative::NarrativeSections;
use crate::topology::TopologyGraph;

pub const REPORT_TITLE: &str = "NetDoc Network Report";

/// Section titles, in the order every format renders them.
pub const SECTION_ORDER: [&str; 8] = [
    "Device Summary",
    "VLANs",
    "Interfaces",
    "Neighbors",
    "Routing Summary",
    "Topology",
    "Audit Findings",
    "Narrative Sections",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Markdown,
    Html,
    Pdf,
}

impl Format {
    pub const ALL: [Format; 4] = [Format::Json, Format::Markdown, Format::Html, Format::Pdf];

    pub fn extension(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Markdown => "md",
            Format::Html => "html",
            Format::Pdf => "pdf",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Json => f.write_str("json"),
            Format::Markdown => f.write_str("markdown"),
            Format::Html => f.write_str("html"),
            Format::Pdf => f.write_str("pdf"),
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "markdown" | "md" => Ok(Format::Markdown),
            "html" => Ok(Format::Html),
            "pdf" => Ok(Format::Pdf),
            other => Err(format!("unsupported report format: {other}")),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("{format} backend cannot encode character {character:?} in: {context}")]
    Unencodable {
        format: Format,
        character: char,
        context: String,
    },
    #[error("{format} serialisation failed: {source}")]
    Serialization {
        format: Format,
        #[source]
        source: serde_json::Error,
    },
}

impl RenderError {
    pub fn format(&self) -> Format {
        match self {
            RenderError::Unencodable { format, .. }
            | RenderError::Serialization { format, .. } => *format,
        }
    }
}

/// Header labels supplied by the caller; the core does not look them up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLabels {
    pub organization: String,
    pub user: String,
}

impl Default for ReportLabels {
    fn default() -> Self {
        Self {
            organization: "Unknown Org".to_string(),
            user: "unknown".to_string(),
        }
    }
}

/// Everything a backend needs. Borrowed, never mutated.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub model: &'a ParsedConfig,
    pub audit: &'a AuditReport,
    pub topology: &'a TopologyGraph,
    pub narrative: Option<&'a NarrativeSections>,
    pub labels: &'a ReportLabels,
}

/// Render one format.
pub fn render(format: Format, input: &ReportInput<'_>) -> Result<Vec<u8>, RenderError> {
    let result = match format {
        Format::Json => json::render(input),
        Format::Markdown => Ok(markdown::render(&build_document(input)).into_bytes()),
        Format::Html => Ok(html::render(&build_document(input)).into_bytes()),
        Format::Pdf => pdf::render(&build_document(input)),
    };
    match &result {
        Ok(bytes) => info!(%format, bytes = bytes.len(), "Rendered report"),
        Err(e) => error!(%format, error = %e, "Rendering failed"),
    }
    result
}
