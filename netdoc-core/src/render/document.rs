//! Intermediate document representation shared by the markup and paginated backends.

use crate::audit::{Finding, Severity};
use crate::model::{ParsedConfig, PortState};

use super::{ReportInput, REPORT_TITLE, SECTION_ORDER};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub header: Vec<(String, String)>,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Subheading(String),
    Paragraph(String),
    Fields(Vec<(String, String)>),
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Bullets(Vec<String>),
    Code {
        language: String,
        text: String,
    },
}

pub struct DocumentBuilder {
    doc: Document,
}

impl DocumentBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            doc: Document {
                title: title.into(),
                header: Vec::new(),
                sections: Vec::new(),
            },
        }
    }

    pub fn header(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.doc.header.push((label.into(), value.into()));
        self
    }

    pub fn section(
        mut self,
        title: impl Into<String>,
        build: impl FnOnce(SectionBuilder) -> SectionBuilder,
    ) -> Self {
        let section = build(SectionBuilder {
            section: Section {
                title: title.into(),
                blocks: Vec::new(),
            },
        })
        .section;
        self.doc.sections.push(section);
        self
    }

    pub fn build(self) -> Document {
        self.doc
    }
}

pub struct SectionBuilder {
    section: Section,
}

impl SectionBuilder {
    pub fn subheading(mut self, text: impl Into<String>) -> Self {
        self.section.blocks.push(Block::Subheading(text.into()));
        self
    }

    pub fn paragraph(mut self, text: impl Into<String>) -> Self {
        self.section.blocks.push(Block::Paragraph(text.into()));
        self
    }

    pub fn fields(mut self, fields: Vec<(String, String)>) -> Self {
        self.section.blocks.push(Block::Fields(fields));
        self
    }

    /// Adds a table, or `empty` as a paragraph when there are no rows.
    pub fn table_or(mut self, headers: &[&str], rows: Vec<Vec<String>>, empty: &str) -> Self {
        if rows.is_empty() {
            return self.paragraph(empty);
        }
        self.section.blocks.push(Block::Table {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
        });
        self
    }

    pub fn bullets(mut self, items: Vec<String>) -> Self {
        self.section.blocks.push(Block::Bullets(items));
        self
    }

    pub fn code(mut self, language: impl Into<String>, text: impl Into<String>) -> Self {
        self.section.blocks.push(Block::Code {
            language: language.into(),
            text: text.into(),
        });
        self
    }
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

fn state(s: PortState) -> String {
    s.to_string()
}

fn finding_line(f: &Finding) -> String {
    let tag = match f.severity {
        Severity::Issue => "ISSUE",
        Severity::Warning => "WARNING",
        Severity::Info => "INFO",
    };
    match &f.evidence {
        Some(evidence) => format!("[{tag}] {} (evidence: {evidence})", f.message),
        None => format!("[{tag}] {}", f.message),
    }
}

fn device_fields(model: &ParsedConfig) -> Vec<(String, String)> {
    let identity = model.identity.clone().unwrap_or_default();
    vec![
        ("Hostname".into(), or_dash(model.hostname.as_deref())),
        ("Model".into(), or_dash(identity.model.as_deref())),
        ("Serial".into(), or_dash(identity.serial.as_deref())),
        ("OS version".into(), or_dash(identity.os_version.as_deref())),
        ("VLANs".into(), model.vlans.len().to_string()),
        ("Interfaces".into(), model.interfaces.len().to_string()),
        ("Neighbors".into(), model.neighbors.len().to_string()),
        ("ACLs".into(), model.acls.len().to_string()),
    ]
}

/// Assemble the shared document for one report.
pub fn build_document(input: &ReportInput<'_>) -> Document {
    let model = input.model;
    let [device, vlans, interfaces, neighbors, routing, topology, audit, narrative] = SECTION_ORDER;

    let mut builder = DocumentBuilder::new(REPORT_TITLE)
        .header("Organization", input.labels.organization.as_str())
        .header("User", input.labels.user.as_str())
        .header("Device", model.hostname.as_deref().unwrap_or("Unknown"))
        .section(device, |s| s.fields(device_fields(model)))
        .section(vlans, |s| {
            let rows = model
                .vlans
                .iter()
                .map(|v| vec![v.vlan_id.clone(), or_dash(v.name.as_deref()), v.ports.join(", ")])
                .collect();
            s.table_or(&["VLAN", "Name", "Ports"], rows, "No VLANs detected.")
        })
        .section(interfaces, |s| {
            let rows = model
                .interfaces
                .iter()
                .map(|i| {
                    vec![
                        i.name.clone(),
                        or_dash(i.description.as_deref()),
                        or_dash(i.ip_address.as_deref()),
                        or_dash(i.vlan_membership.as_deref()),
                        i.switchport_mode.map(|m| m.to_string()).unwrap_or_else(|| "-".into()),
                        state(i.admin_state),
                        state(i.protocol_state),
                    ]
                })
                .collect();
            s.table_or(
                &["Interface", "Description", "IP address", "VLAN", "Mode", "Admin", "Protocol"],
                rows,
                "No interfaces detected.",
            )
        })
        .section(neighbors, |s| {
            let rows = model
                .neighbors
                .iter()
                .map(|n| {
                    vec![
                        n.local_interface.clone(),
                        n.remote_device_id.clone(),
                        n.remote_interface.clone(),
                    ]
                })
                .collect();
            s.table_or(
                &["Local interface", "Remote device", "Remote interface"],
                rows,
                "No CDP/LLDP neighbors detected.",
            )
        })
        .section(routing, |s| {
            let protocols: Vec<String> = model
                .routing_protocols
                .iter()
                .map(|p| format!("{} ({})", p.kind, p.declaration()))
                .collect();
            let s = if protocols.is_empty() {
                s.paragraph("No dynamic routing protocols declared.")
            } else {
                s.bullets(protocols)
            };
            let acls = if model.acls.is_empty() {
                "none".to_string()
            } else {
                model.acls.iter().cloned().collect::<Vec<_>>().join(", ")
            };
            s.fields(vec![("ACLs".into(), acls)])
        })
        .section(topology, |s| s.code("mermaid", input.topology.to_mermaid()))
        .section(audit, |mut s| {
            for (category, findings) in input.audit.iter() {
                s = s
                    .subheading(category.title())
                    .bullets(findings.iter().map(finding_line).collect());
            }
            s
        });

    if let Some(sections) = input.narrative {
        builder = builder.section(narrative, |mut s| {
            for (title, body) in sections.sections() {
                s = s.subheading(title).paragraph(body);
            }
            s
        });
    }

    builder.build()
}
