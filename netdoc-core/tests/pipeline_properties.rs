use std::collections::BTreeSet;

use netdoc_core::audit::{run_audit, run_rules, Category, RULES};
use netdoc_core::normalize::normalize;
use netdoc_core::pipeline::analyze;
use netdoc_core::render::{Format, ReportLabels};

const CAMPUS_SWITCH: &str = "\
Building configuration...
!
version 15.2
hostname ACC-SW-01
!
banner motd ^C
Authorized access only!
  Disconnect now
^C
enable password letmein
username admin password 0 admin
ip http server
!
vlan 1,10,20-22
 name USERS
vlan 99
 name MGMT
!
interface Vlan1
 ip address 192.168.1.2 255.255.255.0
!
interface GigabitEthernet0/1
 description \"uplink\" to <core>
 switchport mode trunk
!
interface GigabitEthernet0/2
 switchport access vlan 10
 spanning-tree portfast
!
interface GigabitEthernet0/2
 description duplicate block
 switchport access vlan 20
!
router eigrp 100
 network 10.0.0.0
router ospf 1
!
access-list 10 permit 10.0.0.0 0.255.255.255
line vty 0 4
 transport input telnet ssh
!
cdp run
lldp run
Device ID: \"CORE\"-1
Interface: GigabitEthernet0/1,  Port ID (outgoing port): Te1/1/1
end
";

fn corpus() -> Vec<Vec<u8>> {
    let mut inputs: Vec<Vec<u8>> = vec![
        Vec::new(),
        b"\n\n   \n".to_vec(),
        b"! only a comment\n# another\n".to_vec(),
        CAMPUS_SWITCH.as_bytes().to_vec(),
        CAMPUS_SWITCH.replace('\n', "\r\n").into_bytes(),
        b"interface Gi0/1\ninterface Gi0/1\ninterface gi0/1\nvlan 10\nvlan 10\nvlan 10-12\n"
            .to_vec(),
        b"hostname\nvlan\ninterface\nrouter\nDevice ID:\nInterface: , Port ID (outgoing port): x\n"
            .to_vec(),
        b"banner login # never closed\nhostname HIDDEN\n".to_vec(),
        vec![0xff, 0xfe, b'h', b'o', b's', b't', 0x00, b'\n', 0xc3, 0x28, b'\n'],
    ];

    // Deterministic pseudo-random garbage.
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    for len in [16usize, 256, 4096] {
        let mut bytes = Vec::with_capacity(len);
        for _ in 0..len {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            bytes.push((state & 0xff) as u8);
        }
        inputs.push(bytes);
    }

    // Keyword soup: plausible tokens in implausible order.
    let words = [
        "interface", "vlan", "router", "ospf", "bgp", "neighbor", "!", "name", "shutdown",
        "Device ID:", "Local Intf:", "hostname", "password", "\n", " ", "Gi0/1", "10",
    ];
    for seed in 1u64..6 {
        let mut s = seed;
        let mut text = String::new();
        for _ in 0..300 {
            s = s.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            text.push_str(words[(s >> 33) as usize % words.len()]);
            text.push(' ');
        }
        inputs.push(text.into_bytes());
    }
    inputs
}

#[test]
fn test_vlan_ids_and_interface_names_are_unique() {
    for input in corpus() {
        let model = analyze(&input).model;
        let vlan_ids: BTreeSet<&str> = model.vlans.iter().map(|v| v.vlan_id.as_str()).collect();
        assert_eq!(vlan_ids.len(), model.vlans.len(), "duplicate vlan id in {model:?}");
        let names: BTreeSet<&str> = model.interfaces.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names.len(), model.interfaces.len(), "duplicate interface in {model:?}");
    }
}

#[test]
fn test_audit_covers_every_category() {
    let expected: Vec<Category> = Category::ALL.to_vec();
    for input in corpus() {
        let audit = analyze(&input).audit;
        let keys: Vec<Category> = audit.categories().collect();
        assert_eq!(keys, expected);
        for category in Category::ALL {
            assert!(!audit.findings(category).is_empty());
        }
    }
}

#[test]
fn test_topology_is_never_empty() {
    for input in corpus() {
        let topology = analyze(&input).topology;
        assert!(!topology.nodes.is_empty());
        assert!(!topology.edges.is_empty());
        for edge in &topology.edges {
            assert!(topology.node(&edge.source_node_id).is_some());
            assert!(topology.node(&edge.dest_node_id).is_some());
        }
    }
}

#[test]
fn test_normalize_is_idempotent() {
    for input in corpus() {
        let once = normalize(&input);
        let twice = normalize(once.as_bytes());
        assert_eq!(once, twice);
    }
}

#[test]
fn test_rule_order_does_not_change_report() {
    let mut reversed = RULES.to_vec();
    reversed.reverse();
    let mut rotated = RULES.to_vec();
    rotated.rotate_left(RULES.len() / 3);

    for input in corpus() {
        let model = analyze(&input).model;
        let baseline = run_audit(&model);
        assert_eq!(run_rules(&reversed, &model), baseline);
        assert_eq!(run_rules(&rotated, &model), baseline);
    }
}

#[test]
fn test_identical_input_renders_identical_bytes() {
    let labels = ReportLabels::default();
    for input in corpus() {
        let first = analyze(&input);
        let second = analyze(&input);
        assert_eq!(first, second);
        assert_eq!(first.diagram(), second.diagram());
        for format in Format::ALL {
            // Garbage input can hold characters the PDF fonts cannot show; both
            // runs must then fail the same way.
            match (
                first.render(format, &labels, None),
                second.render(format, &labels, None),
            ) {
                (Ok(a), Ok(b)) => assert_eq!(a, b, "{format} output differs between runs"),
                (Err(a), Err(b)) => assert_eq!(a.to_string(), b.to_string()),
                (a, b) => panic!("{format} rendered once but not twice: {a:?} / {b:?}"),
            }
        }
    }
}

#[test]
fn test_campus_switch_extraction() {
    let analysis = analyze(CAMPUS_SWITCH.as_bytes());
    let model = &analysis.model;

    assert_eq!(model.hostname.as_deref(), Some("ACC-SW-01"));
    let ids: Vec<&str> = model.vlans.iter().map(|v| v.vlan_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "10", "20", "21", "22", "99"]);
    assert_eq!(model.vlan("99").and_then(|v| v.name.as_deref()), Some("MGMT"));

    // Duplicate block fills gaps only.
    let gi2 = model.interface("GigabitEthernet0/2").expect("Gi0/2");
    assert_eq!(gi2.vlan_membership.as_deref(), Some("10"));
    assert_eq!(gi2.description.as_deref(), Some("duplicate block"));
    assert!(gi2.portfast);

    assert_eq!(model.routing_protocols.len(), 2);
    assert!(model.acls.contains("10"));
    assert_eq!(model.neighbors.len(), 1);
    assert!(!model.raw_text.contains("Authorized access"));
    assert_eq!(
        model.identity.as_ref().and_then(|i| i.os_version.as_deref()),
        Some("15.2")
    );

    let vlan_evidence: Vec<Option<&str>> = analysis
        .audit
        .findings(Category::VlanHygiene)
        .iter()
        .map(|f| f.evidence.as_deref())
        .collect();
    assert!(vlan_evidence.contains(&Some("Vlan1")));
    assert!(vlan_evidence.contains(&Some("GigabitEthernet0/1")));
}
