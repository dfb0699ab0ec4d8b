//! Entity extractor: maps normalised text onto a [`ParsedConfig`].
//!
//! Every field is recovered by its own scan over the text; scans share no
//! state and never fail. When a scalar field has several candidates the
//! first one in document order wins.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::model::{
    DeviceIdentity, Interface, Neighbor, ParsedConfig, PortState, RoutingKind, RoutingProtocol,
    SwitchportMode, Vlan,
};
use crate::normalize::FILE_MARKER;

/// Highest valid 802.1Q VLAN id; bounds range expansion.
const MAX_VLAN_ID: u32 = 4094;

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($re).expect("static pattern is valid"));
    };
}

pattern!(HOSTNAME, r"(?im)^[ \t]*hostname[ \t]+(\S+)");
// Top-level `version 15.2` config line; indented `version` belongs to a sub-mode.
pattern!(CONFIG_VERSION, r"(?i)^version[ \t]+(\d[\w.()\-]*)");
// `show version` banner: `Cisco IOS Software, ... Version 15.2(4)E7, RELEASE SOFTWARE`.
pattern!(BANNER_VERSION, r"\bSoftware\b.*,[ \t]*Version[ \t]+(\d[\w.()\-]*)");
pattern!(
    MODEL,
    r"(?im)^[ \t]*Model[ \t]+number[ \t]*:[ \t]*(\S+)|^[ \t]*cisco[ \t]+(\S+)[ \t]+\(.*\)[ \t]+processor"
);
pattern!(
    SERIAL,
    r"(?im)^[ \t]*System[ \t]+serial[ \t]+number[ \t]*:[ \t]*(\S+)|Processor[ \t]+board[ \t]+ID[ \t]+(\S+)"
);
pattern!(VLAN_DECL, r"(?i)^vlan\s+(\d[\d,\-]*)$");
pattern!(VLAN_NAME, r"(?i)^\s*name\s+(.+)$");
pattern!(
    VLAN_BRIEF_ROW,
    r"(?i)^(\d{1,4})\s+(\S+)\s+(?:active|act/lshut|act/unsup|sus|suspended)\b\s*(.*)$"
);
pattern!(PORT_LIST, r"^\s+([A-Za-z][\w/.:\-]*(?:\s*,\s*[A-Za-z][\w/.:\-]*)*)\s*,?$");
pattern!(INTERFACE_START, r"(?i)^interface\s+(\S+)");
// Column header of `show ip interface brief`, which also starts with "Interface".
pattern!(IP_BRIEF_HEADER, r"(?i)^interface\s+ip-address\s+ok\?");
pattern!(IP_ADDRESS, r"(?i)^ip\s+address\s+(\S+)(?:\s+(\S+))?");
pattern!(ACCESS_VLAN, r"(?i)^switchport\s+access\s+vlan\s+(\d+)");
pattern!(SWITCHPORT_MODE, r"(?i)^switchport\s+mode\s+(access|trunk)\b");
pattern!(TRUNK_ALLOWED, r"(?i)^switchport\s+trunk\s+allowed\s+vlan\s+(?:add\s+)?(\S+)");
pattern!(
    IP_BRIEF_ROW,
    r"(?i)^(\S+)\s+\S+\s+(?:YES|NO)\s+\S+\s+(up|down|administratively\s+down)\s+(up|down)\s*$"
);
pattern!(
    LINE_PROTOCOL,
    r"(?i)^(\S+)\s+is\s+(up|down|administratively\s+down),\s+line\s+protocol\s+is\s+(up|down)"
);
pattern!(ROUTER, r"(?i)^router\s+(ospf|bgp|eigrp|isis)\b\s*(\S*)");
pattern!(
    ACL_DECL,
    r"(?i)^(?:ip|ipv6)\s+access-list\s+(?:(?:standard|extended|resequence)\s+)?(\S+)|^access-list\s+(\S+)"
);
pattern!(ACL_REF, r"(?i)^(?:access-class|ip\s+access-group|ipv6\s+traffic-filter)\s+(\S+)");
pattern!(CDP_DEVICE, r"(?i)^Device\s+ID\s*:\s*(\S*)");
pattern!(
    CDP_PORTS,
    r"(?i)^Interface\s*:\s*([^,]+?)\s*,\s*Port\s+ID\s+\(outgoing\s+port\)\s*:\s*(\S+)"
);
pattern!(LLDP_LOCAL, r"(?i)^Local\s+Intf\s*:\s*(\S+)");
pattern!(LLDP_PORT, r"(?i)^Port\s+id\s*:\s*(\S+)");
pattern!(LLDP_SYSTEM, r"(?i)^System\s+Name\s*:\s*(\S+)");
pattern!(LLDP_CHASSIS, r"(?i)^Chassis\s+id\s*:\s*(\S+)");

/// Extract the full model from normalised text.
pub fn extract(text: &str) -> ParsedConfig {
    let model = ParsedConfig {
        hostname: extract_hostname(text),
        identity: extract_identity(text),
        vlans: extract_vlans(text),
        interfaces: extract_interfaces(text),
        routing_protocols: extract_routing(text),
        acls: extract_acls(text),
        neighbors: extract_neighbors(text),
        raw_text: text.to_string(),
    };
    model.trace_extracted();
    model
}

/// First capture group that matched in the first match of `re`.
fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text).and_then(|caps| {
        caps.iter()
            .skip(1)
            .flatten()
            .next()
            .map(|m| m.as_str().to_string())
    })
}

pub fn extract_hostname(text: &str) -> Option<String> {
    first_capture(&HOSTNAME, text)
}

pub fn extract_identity(text: &str) -> Option<DeviceIdentity> {
    let identity = DeviceIdentity {
        model: first_capture(&MODEL, text),
        serial: first_capture(&SERIAL, text),
        os_version: extract_os_version(text),
    };
    (!identity.is_empty()).then_some(identity)
}

/// The device's own software version.
///
/// Banner lines inside CDP/LLDP neighbour records describe the neighbour,
/// so they are skipped until the record closes.
pub fn extract_os_version(text: &str) -> Option<String> {
    let mut in_neighbor_record = false;
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("---") || trimmed.starts_with(FILE_MARKER) {
            in_neighbor_record = false;
            continue;
        }
        if CDP_DEVICE.is_match(trimmed) || LLDP_LOCAL.is_match(trimmed) {
            in_neighbor_record = true;
            continue;
        }
        let caps = match CONFIG_VERSION.captures(line) {
            Some(caps) => caps,
            None if in_neighbor_record => continue,
            None => match BANNER_VERSION.captures(trimmed) {
                Some(caps) => caps,
                None => continue,
            },
        };
        return Some(caps[1].trim_end_matches(['.', '-']).to_string());
    }
    None
}

/// Expand `10,20,30-32` into individual ids. Malformed pieces are skipped.
pub fn expand_vlan_list(list: &str) -> Vec<String> {
    let mut ids = Vec::new();
    for piece in list.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match piece.split_once('-') {
            Some((lo, hi)) => {
                let (Ok(lo), Ok(hi)) = (lo.trim().parse::<u32>(), hi.trim().parse::<u32>()) else {
                    continue;
                };
                if lo > hi || hi > MAX_VLAN_ID {
                    continue;
                }
                ids.extend((lo..=hi).map(|id| id.to_string()));
            }
            None => {
                if let Ok(id) = piece.parse::<u32>() {
                    if id <= MAX_VLAN_ID {
                        ids.push(id.to_string());
                    }
                }
            }
        }
    }
    ids
}

/// True when a VLAN list such as `1,10-20` (or `all`) covers `vlan_id`.
pub fn vlan_list_contains(list: &str, vlan_id: u32) -> bool {
    if list.eq_ignore_ascii_case("all") {
        return true;
    }
    list.split(',').map(str::trim).any(|piece| match piece.split_once('-') {
        Some((lo, hi)) => matches!(
            (lo.trim().parse::<u32>(), hi.trim().parse::<u32>()),
            (Ok(lo), Ok(hi)) if lo <= vlan_id && vlan_id <= hi
        ),
        None => piece.parse::<u32>() == Ok(vlan_id),
    })
}

#[derive(Default)]
struct VlanTable {
    vlans: Vec<Vlan>,
}

impl VlanTable {
    fn entry(&mut self, vlan_id: &str) -> &mut Vlan {
        let idx = match self.vlans.iter().position(|v| v.vlan_id == vlan_id) {
            Some(idx) => idx,
            None => {
                self.vlans.push(Vlan {
                    vlan_id: vlan_id.to_string(),
                    name: None,
                    ports: Vec::new(),
                });
                self.vlans.len() - 1
            }
        };
        &mut self.vlans[idx]
    }

    fn name(&mut self, vlan_id: &str, name: &str) {
        let vlan = self.entry(vlan_id);
        if vlan.name.is_none() {
            vlan.name = Some(name.to_string());
        }
    }

    fn ports(&mut self, vlan_id: &str, ports: &str) {
        let vlan = self.entry(vlan_id);
        for port in ports.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            if !vlan.ports.iter().any(|p| p == port) {
                vlan.ports.push(port.to_string());
            }
        }
    }
}

/// VLANs from `vlan <ids>` declarations and `show vlan brief` rows.
pub fn extract_vlans(text: &str) -> Vec<Vlan> {
    let mut table = VlanTable::default();
    // Declared ids whose `name` sub-line may follow.
    let mut open_decl: Vec<String> = Vec::new();
    // Last `show vlan brief` row, for wrapped port lists.
    let mut open_row: Option<String> = None;

    for line in text.lines() {
        let trimmed = line.trim();

        if let Some(caps) = VLAN_DECL.captures(trimmed) {
            open_decl = expand_vlan_list(&caps[1]);
            for id in &open_decl {
                table.entry(id);
            }
            open_row = None;
            continue;
        }

        if let Some(caps) = VLAN_BRIEF_ROW.captures(trimmed) {
            let id = caps[1].to_string();
            table.name(&id, &caps[2]);
            table.ports(&id, &caps[3]);
            open_row = Some(id);
            open_decl.clear();
            continue;
        }

        if !open_decl.is_empty() {
            if let Some(caps) = VLAN_NAME.captures(line) {
                let name = caps[1].trim().to_string();
                for id in &open_decl {
                    table.name(id, &name);
                }
                continue;
            }
        }

        if let Some(id) = &open_row {
            if let Some(caps) = PORT_LIST.captures(line) {
                let id = id.clone();
                table.ports(&id, &caps[1]);
                continue;
            }
        }

        // Any other top-level line closes an open declaration or table row.
        if !line.starts_with(char::is_whitespace) {
            open_decl.clear();
            open_row = None;
        }
    }

    debug!(count = table.vlans.len(), "Extracted VLANs");
    table.vlans
}

/// Convert a dotted mask to a prefix length; `None` for non-contiguous or malformed masks.
fn mask_to_prefix(mask: &str) -> Option<u32> {
    let octets: Vec<u8> = mask
        .split('.')
        .map(|o| o.parse::<u8>())
        .collect::<Result<_, _>>()
        .ok()?;
    if octets.len() != 4 {
        return None;
    }
    let bits = u32::from_be_bytes([octets[0], octets[1], octets[2], octets[3]]);
    let prefix = bits.leading_ones();
    (bits.checked_shl(prefix).unwrap_or(0) == 0).then_some(prefix)
}

fn format_address(addr: &str, mask: Option<&str>) -> String {
    if addr.eq_ignore_ascii_case("dhcp") {
        return "dhcp".to_string();
    }
    match mask {
        Some(mask) => match mask_to_prefix(mask) {
            Some(prefix) => format!("{addr}/{prefix}"),
            None => format!("{addr} {mask}"),
        },
        None => addr.to_string(),
    }
}

fn parse_state(word: &str) -> PortState {
    if word.eq_ignore_ascii_case("up") {
        PortState::Up
    } else {
        PortState::Down
    }
}

/// Fill `iface` from the lines of its block.
fn apply_block_line(iface: &mut Interface, line: &str, seen_shutdown: &mut bool) {
    let lower = line.to_ascii_lowercase();
    if let Some(rest) = line.strip_prefix("description ") {
        iface.description.get_or_insert_with(|| rest.trim().to_string());
    } else if let Some(caps) = IP_ADDRESS.captures(line) {
        if iface.ip_address.is_none() && !lower.contains(" secondary") {
            iface.ip_address = Some(format_address(&caps[1], caps.get(2).map(|m| m.as_str())));
        }
    } else if let Some(caps) = ACCESS_VLAN.captures(line) {
        iface.vlan_membership.get_or_insert_with(|| caps[1].to_string());
    } else if let Some(caps) = SWITCHPORT_MODE.captures(line) {
        iface.switchport_mode.get_or_insert(if caps[1].eq_ignore_ascii_case("trunk") {
            SwitchportMode::Trunk
        } else {
            SwitchportMode::Access
        });
    } else if let Some(caps) = TRUNK_ALLOWED.captures(line) {
        iface.trunk_allowed_vlans.get_or_insert_with(|| caps[1].to_string());
    } else if lower.starts_with("spanning-tree portfast") && !lower.contains("disable") {
        iface.portfast = true;
    } else if lower == "spanning-tree bpduguard enable" {
        iface.bpdu_guard = true;
    } else if lower == "shutdown" {
        *seen_shutdown = true;
    }
}

/// Interface blocks plus any status evidence from `show` output.
///
/// A block starts at `interface <name>` and runs until the next interface
/// line, a bare `!`, a file marker, or end of text. Admin state is `down`
/// only when the block holds a bare `shutdown`; protocol state comes from
/// `show ip interface brief` / `show interfaces` lines when available and
/// otherwise mirrors the admin state.
pub fn extract_interfaces(text: &str) -> Vec<Interface> {
    let mut interfaces: Vec<Interface> = Vec::new();
    let mut current: Option<(usize, bool, bool)> = None; // (index, is_new, saw shutdown)

    let close = |interfaces: &mut Vec<Interface>, current: &mut Option<(usize, bool, bool)>| {
        if let Some((idx, is_new, shutdown)) = current.take() {
            if is_new && shutdown {
                interfaces[idx].admin_state = PortState::Down;
                interfaces[idx].protocol_state = PortState::Down;
            }
        }
    };

    for line in text.lines() {
        let trimmed = line.trim();

        if IP_BRIEF_HEADER.is_match(trimmed) {
            close(&mut interfaces, &mut current);
            continue;
        }

        if let Some(caps) = INTERFACE_START.captures(trimmed) {
            close(&mut interfaces, &mut current);
            let name = &caps[1];
            current = Some(match interfaces.iter().position(|i| i.name == name) {
                Some(idx) => (idx, false, false),
                None => {
                    interfaces.push(Interface::new(name));
                    (interfaces.len() - 1, true, false)
                }
            });
            continue;
        }

        if trimmed == "!" || trimmed.starts_with(FILE_MARKER) {
            close(&mut interfaces, &mut current);
            continue;
        }

        if let Some((idx, _, shutdown)) = current.as_mut() {
            apply_block_line(&mut interfaces[*idx], trimmed, shutdown);
        }
    }
    close(&mut interfaces, &mut current);

    apply_status_evidence(text, &mut interfaces);
    debug!(count = interfaces.len(), "Extracted interfaces");
    interfaces
}

fn apply_status_evidence(text: &str, interfaces: &mut [Interface]) {
    let mut seen: BTreeSet<String> = BTreeSet::new();
    for line in text.lines().map(str::trim) {
        let caps = match IP_BRIEF_ROW
            .captures(line)
            .or_else(|| LINE_PROTOCOL.captures(line))
        {
            Some(caps) => caps,
            None => continue,
        };
        let name = &caps[1];
        if !seen.insert(name.to_string()) {
            continue;
        }
        if let Some(iface) = interfaces.iter_mut().find(|i| i.name == name) {
            iface.admin_state = parse_state(&caps[2]);
            iface.protocol_state = parse_state(&caps[3]);
        }
    }
}

pub fn extract_routing(text: &str) -> BTreeSet<RoutingProtocol> {
    text.lines()
        .filter_map(|line| ROUTER.captures(line.trim()))
        .filter_map(|caps| {
            Some(RoutingProtocol {
                kind: RoutingKind::from_keyword(&caps[1])?,
                process_or_as_id: caps[2].to_string(),
            })
        })
        .collect()
}

pub fn extract_acls(text: &str) -> BTreeSet<String> {
    text.lines()
        .map(str::trim)
        .filter_map(|line| ACL_DECL.captures(line).or_else(|| ACL_REF.captures(line)))
        .filter_map(|caps| caps.iter().skip(1).flatten().next().map(|m| m.as_str().to_string()))
        .collect()
}

/// A neighbour record being assembled from discovery output.
#[derive(Default)]
struct PendingLldp {
    local: Option<String>,
    port: Option<String>,
    system: Option<String>,
    chassis: Option<String>,
}

impl PendingLldp {
    fn finish(self) -> Option<Neighbor> {
        Some(Neighbor {
            local_interface: self.local?,
            remote_device_id: self.system.or(self.chassis)?,
            remote_interface: self.port?,
        })
    }
}

/// Neighbour adjacency from CDP and LLDP detail output. Incomplete records are dropped.
pub fn extract_neighbors(text: &str) -> Vec<Neighbor> {
    let mut neighbors: Vec<Neighbor> = Vec::new();
    let mut push = |n: Neighbor| {
        if !neighbors.contains(&n) {
            neighbors.push(n);
        }
    };

    let mut cdp_device: Option<String> = None;
    let mut lldp: Option<PendingLldp> = None;

    for line in text.lines().map(str::trim) {
        if line.starts_with("---") || line.starts_with(FILE_MARKER) {
            cdp_device = None;
            if let Some(n) = lldp.take().and_then(PendingLldp::finish) {
                push(n);
            }
            continue;
        }

        if let Some(caps) = CDP_DEVICE.captures(line) {
            cdp_device = Some(caps[1].to_string());
            continue;
        }
        if let Some(caps) = CDP_PORTS.captures(line) {
            if let Some(device) = cdp_device.take() {
                push(Neighbor {
                    local_interface: caps[1].to_string(),
                    remote_device_id: device,
                    remote_interface: caps[2].to_string(),
                });
            }
            continue;
        }

        if let Some(caps) = LLDP_LOCAL.captures(line) {
            if let Some(n) = lldp.take().and_then(PendingLldp::finish) {
                push(n);
            }
            lldp = Some(PendingLldp {
                local: Some(caps[1].to_string()),
                ..PendingLldp::default()
            });
            continue;
        }
        if let Some(pending) = lldp.as_mut() {
            if let Some(caps) = LLDP_PORT.captures(line) {
                pending.port.get_or_insert_with(|| caps[1].to_string());
            } else if let Some(caps) = LLDP_SYSTEM.captures(line) {
                pending.system.get_or_insert_with(|| caps[1].to_string());
            } else if let Some(caps) = LLDP_CHASSIS.captures(line) {
                pending.chassis.get_or_insert_with(|| caps[1].to_string());
            }
        }
    }
    if let Some(n) = lldp.take().and_then(PendingLldp::finish) {
        push(n);
    }

    debug!(count = neighbors.len(), "Extracted neighbours");
    neighbors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_conversion() {
        assert_eq!(mask_to_prefix("255.255.255.0"), Some(24));
        assert_eq!(mask_to_prefix("255.255.255.255"), Some(32));
        assert_eq!(mask_to_prefix("0.0.0.0"), Some(0));
        assert_eq!(mask_to_prefix("255.0.255.0"), None);
        assert_eq!(mask_to_prefix("garbage"), None);
    }

    #[test]
    fn vlan_list_expansion_and_membership() {
        assert_eq!(expand_vlan_list("10,20,30-32"), vec!["10", "20", "30", "31", "32"]);
        assert!(expand_vlan_list("5-1,x,9999").is_empty());
        assert!(vlan_list_contains("1-5,10", 1));
        assert!(vlan_list_contains("all", 1));
        assert!(!vlan_list_contains("10,20-30", 1));
    }

    #[test]
    fn os_version_ignores_sub_mode_and_feature_versions() {
        assert_eq!(extract_os_version("ip ssh version 2\nsnmp-server version 3\n"), None);
        assert_eq!(extract_os_version("router rip\n version 2\n"), None);
        assert_eq!(
            extract_os_version("ip ssh version 2\nversion 15.2\n"),
            Some("15.2".to_string())
        );
    }

    #[test]
    fn os_version_from_show_version_banner() {
        let text = "Cisco IOS Software, C2960X Software (C2960X-UNIVERSALK9-M), Version 15.2(4)E7, RELEASE SOFTWARE (fc2)\n";
        assert_eq!(extract_os_version(text), Some("15.2(4)E7".to_string()));
        // Lowercase prose is not a banner.
        assert_eq!(extract_os_version("software, version 9.9\n"), None);
    }

    #[test]
    fn first_capture_picks_whichever_alternative_matched() {
        assert_eq!(
            first_capture(&SERIAL, "Processor board ID FOC1234X0AB"),
            Some("FOC1234X0AB".to_string())
        );
    }
}
