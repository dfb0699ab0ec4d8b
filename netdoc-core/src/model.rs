//! Parsed configuration model: the fixed-shape record the extractor produces
//! and every later stage (audit, topology, rendering) consumes.
//!
//! Absence is always an explicit `None` or an empty collection. Sets are kept in
//! `BTreeSet`s so serialised output is sorted and stable between runs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, info};

/// Everything the extractor could recover from one analysed document set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedConfig {
    pub hostname: Option<String>,
    pub identity: Option<DeviceIdentity>,
    pub vlans: Vec<Vlan>,
    pub interfaces: Vec<Interface>,
    pub routing_protocols: BTreeSet<RoutingProtocol>,
    pub acls: BTreeSet<String>,
    pub neighbors: Vec<Neighbor>,
    /// Normalised source text, kept for rule checks not captured by the fields above.
    pub raw_text: String,
}

impl ParsedConfig {
    /// True when the text carries running-config markers rather than only
    /// `show` output (or nothing at all).
    pub fn looks_like_running_config(&self) -> bool {
        self.hostname.is_some()
            || !self.interfaces.is_empty()
            || self
                .raw_text
                .lines()
                .any(|l| l.starts_with("version "))
    }

    pub fn vlan(&self, vlan_id: &str) -> Option<&Vlan> {
        self.vlans.iter().find(|v| v.vlan_id == vlan_id)
    }

    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    /// Iterate trimmed, non-empty lines of the retained raw text.
    pub fn raw_lines(&self) -> impl Iterator<Item = &str> {
        self.raw_text.lines().map(str::trim).filter(|l| !l.is_empty())
    }

    pub fn trace_extracted(&self) {
        info!(
            hostname = self.hostname.as_deref().unwrap_or("<none>"),
            vlans = self.vlans.len(),
            interfaces = self.interfaces.len(),
            routing_protocols = self.routing_protocols.len(),
            acls = self.acls.len(),
            neighbors = self.neighbors.len(),
            "Extracted configuration model"
        );
        debug!(identity = ?self.identity, "Extracted device identity");
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    pub model: Option<String>,
    pub serial: Option<String>,
    pub os_version: Option<String>,
}

impl DeviceIdentity {
    pub fn is_empty(&self) -> bool {
        self.model.is_none() && self.serial.is_none() && self.os_version.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vlan {
    pub vlan_id: String,
    pub name: Option<String>,
    pub ports: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortState {
    Up,
    Down,
}

impl fmt::Display for PortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortState::Up => f.write_str("up"),
            PortState::Down => f.write_str("down"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwitchportMode {
    Access,
    Trunk,
}

impl fmt::Display for SwitchportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwitchportMode::Access => f.write_str("access"),
            SwitchportMode::Trunk => f.write_str("trunk"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    pub name: String,
    pub description: Option<String>,
    /// `address/prefix` when the mask was a valid dotted mask, `dhcp` for DHCP clients.
    pub ip_address: Option<String>,
    /// Access VLAN the port is a member of.
    pub vlan_membership: Option<String>,
    pub admin_state: PortState,
    pub protocol_state: PortState,
    pub switchport_mode: Option<SwitchportMode>,
    pub trunk_allowed_vlans: Option<String>,
    pub portfast: bool,
    pub bpdu_guard: bool,
}

impl Interface {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            ip_address: None,
            vlan_membership: None,
            admin_state: PortState::Up,
            protocol_state: PortState::Up,
            switchport_mode: None,
            trunk_allowed_vlans: None,
            portfast: false,
            bpdu_guard: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoutingKind {
    Ospf,
    Bgp,
    Eigrp,
    Isis,
}

impl RoutingKind {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "ospf" => Some(RoutingKind::Ospf),
            "bgp" => Some(RoutingKind::Bgp),
            "eigrp" => Some(RoutingKind::Eigrp),
            "isis" => Some(RoutingKind::Isis),
            _ => None,
        }
    }

    /// The keyword used on a `router <keyword>` line.
    pub fn keyword(&self) -> &'static str {
        match self {
            RoutingKind::Ospf => "ospf",
            RoutingKind::Bgp => "bgp",
            RoutingKind::Eigrp => "eigrp",
            RoutingKind::Isis => "isis",
        }
    }
}

impl fmt::Display for RoutingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutingKind::Ospf => f.write_str("OSPF"),
            RoutingKind::Bgp => f.write_str("BGP"),
            RoutingKind::Eigrp => f.write_str("EIGRP"),
            RoutingKind::Isis => f.write_str("ISIS"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoutingProtocol {
    pub kind: RoutingKind,
    /// Process id (OSPF/EIGRP), AS number (BGP) or area tag (IS-IS); empty for an
    /// untagged IS-IS process.
    pub process_or_as_id: String,
}

impl RoutingProtocol {
    /// The declaration as it appears in the configuration, e.g. `router ospf 10`.
    pub fn declaration(&self) -> String {
        if self.process_or_as_id.is_empty() {
            format!("router {}", self.kind.keyword())
        } else {
            format!("router {} {}", self.kind.keyword(), self.process_or_as_id)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighbor {
    pub local_interface: String,
    pub remote_device_id: String,
    pub remote_interface: String,
}
