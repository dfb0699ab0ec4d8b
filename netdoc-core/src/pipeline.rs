//! One-call entry point: raw upload bytes in, analysed device out.

use std::collections::BTreeMap;

use tracing::info;

use crate::audit::{run_audit, AuditReport};
use crate::extract::extract;
use crate::model::ParsedConfig;
use crate::narrative::NarrativeSections;
use crate::normalize::normalize;
use crate::render::{self, Format, RenderError, ReportInput, ReportLabels};
use crate::topology::TopologyGraph;

/// Everything derived from one upload.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub model: ParsedConfig,
    pub audit: AuditReport,
    pub topology: TopologyGraph,
}

/// Normalize, extract, audit and build the topology for `raw`.
///
/// Never fails: undecodable bytes are replaced and unrecognised text is
/// ignored, so the worst case is an empty model with an all-OK report.
pub fn analyze(raw: &[u8]) -> Analysis {
    let text = normalize(raw);
    info!(bytes = raw.len(), lines = text.lines().count(), "Normalized upload");

    let model = extract(&text);

    let audit = run_audit(&model);

    let topology = TopologyGraph::build(&model);
    info!(
        nodes = topology.nodes.len(),
        edges = topology.edges.len(),
        "Topology built"
    );

    Analysis { model, audit, topology }
}

impl Analysis {
    /// Mermaid `graph TD` source for the topology.
    pub fn diagram(&self) -> String {
        self.topology.to_mermaid()
    }

    fn input<'a>(
        &'a self,
        labels: &'a ReportLabels,
        narrative: Option<&'a NarrativeSections>,
    ) -> ReportInput<'a> {
        ReportInput {
            model: &self.model,
            audit: &self.audit,
            topology: &self.topology,
            narrative,
            labels,
        }
    }

    pub fn render(
        &self,
        format: Format,
        labels: &ReportLabels,
        narrative: Option<&NarrativeSections>,
    ) -> Result<Vec<u8>, RenderError> {
        render::render(format, &self.input(labels, narrative))
    }

    /// Render every requested format, stopping at the first failure.
    pub fn render_all(
        &self,
        formats: &[Format],
        labels: &ReportLabels,
        narrative: Option<&NarrativeSections>,
    ) -> Result<BTreeMap<Format, Vec<u8>>, RenderError> {
        let input = self.input(labels, narrative);
        formats
            .iter()
            .map(|format| render::render(*format, &input).map(|bytes| (*format, bytes)))
            .collect()
    }
}
