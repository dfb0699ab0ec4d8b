use std::collections::BTreeSet;

use serde::Serialize;

use crate::audit::AuditReport;
use crate::model::{DeviceIdentity, Interface, Neighbor, RoutingProtocol, Vlan};
use crate::narrative::NarrativeSections;
use crate::topology::TopologyGraph;

use super::{Format, RenderError, ReportInput, REPORT_TITLE};

// Field order is section order.
#[derive(Serialize)]
struct StructuredReport<'a> {
    title: &'a str,
    organization: &'a str,
    user: &'a str,
    device_summary: DeviceSummary<'a>,
    vlans: &'a [Vlan],
    interfaces: &'a [Interface],
    neighbors: &'a [Neighbor],
    routing_summary: RoutingSummary<'a>,
    topology: Topology<'a>,
    audit_findings: &'a AuditReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    narrative_sections: Option<&'a NarrativeSections>,
}

#[derive(Serialize)]
struct DeviceSummary<'a> {
    hostname: Option<&'a str>,
    identity: Option<&'a DeviceIdentity>,
    vlan_count: usize,
    interface_count: usize,
    neighbor_count: usize,
    acl_count: usize,
}

#[derive(Serialize)]
struct RoutingSummary<'a> {
    protocols: &'a BTreeSet<RoutingProtocol>,
    acls: &'a BTreeSet<String>,
}

#[derive(Serialize)]
struct Topology<'a> {
    #[serde(flatten)]
    graph: &'a TopologyGraph,
    mermaid: String,
}

pub(super) fn render(input: &ReportInput<'_>) -> Result<Vec<u8>, RenderError> {
    let model = input.model;
    let report = StructuredReport {
        title: REPORT_TITLE,
        organization: &input.labels.organization,
        user: &input.labels.user,
        device_summary: DeviceSummary {
            hostname: model.hostname.as_deref(),
            identity: model.identity.as_ref(),
            vlan_count: model.vlans.len(),
            interface_count: model.interfaces.len(),
            neighbor_count: model.neighbors.len(),
            acl_count: model.acls.len(),
        },
        vlans: &model.vlans,
        interfaces: &model.interfaces,
        neighbors: &model.neighbors,
        routing_summary: RoutingSummary {
            protocols: &model.routing_protocols,
            acls: &model.acls,
        },
        topology: Topology {
            graph: input.topology,
            mermaid: input.topology.to_mermaid(),
        },
        audit_findings: input.audit,
        narrative_sections: input.narrative,
    };

    let mut bytes = serde_json::to_vec_pretty(&report).map_err(|source| RenderError::Serialization {
        format: Format::Json,
        source,
    })?;
    bytes.push(b'\n');
    Ok(bytes)
}
