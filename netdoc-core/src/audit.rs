//! Audit rule engine.
//!
//! A fixed table of [`Rule`]s, each a pure check over the parsed model (and
//! its retained raw text) with a fixed category and severity. Results are
//! merged per category in an order-insensitive way, and every category is
//! always present in the report: a category with no warning or issue gets a
//! single `OK` finding.

use std::collections::BTreeMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::extract::vlan_list_contains;
use crate::model::{ParsedConfig, PortState, SwitchportMode};

/// The closed set of audit categories. Declaration order is report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    CredentialHygiene,
    Aaa,
    AccessControl,
    SpanningTree,
    VlanHygiene,
    Routing,
    NeighborDiscoveryExposure,
    Logging,
    InterfaceHygiene,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::CredentialHygiene,
        Category::Aaa,
        Category::AccessControl,
        Category::SpanningTree,
        Category::VlanHygiene,
        Category::Routing,
        Category::NeighborDiscoveryExposure,
        Category::Logging,
        Category::InterfaceHygiene,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            Category::CredentialHygiene => "credential-hygiene",
            Category::Aaa => "aaa",
            Category::AccessControl => "access-control",
            Category::SpanningTree => "spanning-tree",
            Category::VlanHygiene => "vlan-hygiene",
            Category::Routing => "routing",
            Category::NeighborDiscoveryExposure => "neighbor-discovery-exposure",
            Category::Logging => "logging",
            Category::InterfaceHygiene => "interface-hygiene",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Category::CredentialHygiene => "Credential hygiene",
            Category::Aaa => "AAA",
            Category::AccessControl => "Access control",
            Category::SpanningTree => "Spanning tree",
            Category::VlanHygiene => "VLAN hygiene",
            Category::Routing => "Routing",
            Category::NeighborDiscoveryExposure => "Neighbor discovery exposure",
            Category::Logging => "Logging",
            Category::InterfaceHygiene => "Interface hygiene",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Ordered from most to least severe so sorted findings list issues first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Issue,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Issue => f.write_str("issue"),
            Severity::Warning => f.write_str("warning"),
            Severity::Info => f.write_str("info"),
        }
    }
}

pub const OK_MESSAGE: &str = "OK";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
}

impl Finding {
    pub fn ok() -> Self {
        Self {
            severity: Severity::Info,
            message: OK_MESSAGE.to_string(),
            evidence: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.severity == Severity::Info && self.message == OK_MESSAGE
    }

    /// Warnings and issues count as problems; info never does.
    pub fn is_problem(&self) -> bool {
        self.severity != Severity::Info
    }
}

/// What a rule check reports; the rule supplies category and severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub message: String,
    pub evidence: Option<String>,
}

impl Violation {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            evidence: None,
        }
    }

    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence = Some(evidence.into());
        self
    }
}

pub type Check = fn(&ParsedConfig) -> Vec<Violation>;

/// One entry of the rule table.
#[derive(Clone, Copy)]
pub struct Rule {
    pub id: &'static str,
    pub category: Category,
    pub severity: Severity,
    pub check: Check,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("severity", &self.severity)
            .finish()
    }
}

/// Findings a single rule produced, tagged for merging.
#[derive(Debug, Clone)]
pub struct RuleOutcome {
    pub rule_id: &'static str,
    pub category: Category,
    pub findings: Vec<Finding>,
}

impl Rule {
    /// Run the check. A panicking check contributes no findings.
    pub fn evaluate(&self, model: &ParsedConfig) -> RuleOutcome {
        let findings = match panic::catch_unwind(AssertUnwindSafe(|| (self.check)(model))) {
            Ok(violations) => violations
                .into_iter()
                .map(|v| Finding {
                    severity: self.severity,
                    message: v.message,
                    evidence: v.evidence,
                })
                .collect(),
            Err(_) => {
                error!(rule = self.id, "Rule check failed; contributing no findings");
                Vec::new()
            }
        };
        debug!(rule = self.id, findings = findings.len(), "Evaluated audit rule");
        RuleOutcome {
            rule_id: self.id,
            category: self.category,
            findings,
        }
    }
}

/// Category → findings. Always covers every [`Category`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditReport {
    categories: BTreeMap<Category, Vec<Finding>>,
}

impl AuditReport {
    /// Merge rule outcomes. The result does not depend on the order of `outcomes`.
    pub fn from_outcomes(outcomes: impl IntoIterator<Item = RuleOutcome>) -> Self {
        let mut tagged: BTreeMap<Category, Vec<(&'static str, Finding)>> = BTreeMap::new();
        for outcome in outcomes {
            let bucket = tagged.entry(outcome.category).or_default();
            bucket.extend(outcome.findings.into_iter().map(|f| (outcome.rule_id, f)));
        }

        let mut categories = BTreeMap::new();
        for category in Category::ALL {
            let mut entries = tagged.remove(&category).unwrap_or_default();
            entries.sort_by(|(ra, fa), (rb, fb)| {
                fa.severity
                    .cmp(&fb.severity)
                    .then_with(|| ra.cmp(rb))
                    .then_with(|| fa.message.cmp(&fb.message))
                    .then_with(|| fa.evidence.cmp(&fb.evidence))
            });
            entries.dedup_by(|(ra, fa), (rb, fb)| ra == rb && fa == fb);
            let mut findings: Vec<Finding> = entries.into_iter().map(|(_, f)| f).collect();
            if !findings.iter().any(Finding::is_problem) {
                findings.push(Finding::ok());
            }
            categories.insert(category, findings);
        }
        Self { categories }
    }

    pub fn findings(&self, category: Category) -> &[Finding] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &[Finding])> {
        self.categories.iter().map(|(c, f)| (*c, f.as_slice()))
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.categories.keys().copied()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.categories
            .values()
            .flatten()
            .filter(|f| f.severity == severity && !f.is_ok())
            .count()
    }

    pub fn is_all_ok(&self) -> bool {
        self.categories
            .values()
            .all(|findings| !findings.iter().any(Finding::is_problem))
    }
}

/// Evaluate the full rule table against `model`.
pub fn run_audit(model: &ParsedConfig) -> AuditReport {
    run_rules(RULES, model)
}

/// Evaluate an explicit rule list; used by [`run_audit`] and by tests that reorder the table.
pub fn run_rules(rules: &[Rule], model: &ParsedConfig) -> AuditReport {
    let report = AuditReport::from_outcomes(rules.iter().map(|rule| rule.evaluate(model)));
    info!(
        issues = report.count(Severity::Issue),
        warnings = report.count(Severity::Warning),
        info = report.count(Severity::Info),
        "Audit completed"
    );
    report
}

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

pub static RULES: &[Rule] = &[
    Rule {
        id: "weak-password-literal",
        category: Category::CredentialHygiene,
        severity: Severity::Issue,
        check: weak_password_literal,
    },
    Rule {
        id: "plaintext-enable-password",
        category: Category::CredentialHygiene,
        severity: Severity::Issue,
        check: plaintext_enable_password,
    },
    Rule {
        id: "reversible-user-password",
        category: Category::CredentialHygiene,
        severity: Severity::Issue,
        check: reversible_user_password,
    },
    Rule {
        id: "no-password-encryption",
        category: Category::CredentialHygiene,
        severity: Severity::Warning,
        check: no_password_encryption,
    },
    Rule {
        id: "md5-enable-secret",
        category: Category::CredentialHygiene,
        severity: Severity::Warning,
        check: md5_enable_secret,
    },
    Rule {
        id: "missing-enable-secret",
        category: Category::CredentialHygiene,
        severity: Severity::Warning,
        check: missing_enable_secret,
    },
    Rule {
        id: "aaa-disabled",
        category: Category::Aaa,
        severity: Severity::Warning,
        check: aaa_disabled,
    },
    Rule {
        id: "no-aaa-server",
        category: Category::Aaa,
        severity: Severity::Warning,
        check: no_aaa_server,
    },
    Rule {
        id: "no-acl",
        category: Category::AccessControl,
        severity: Severity::Warning,
        check: no_acl,
    },
    Rule {
        id: "open-vty",
        category: Category::AccessControl,
        severity: Severity::Issue,
        check: open_vty,
    },
    Rule {
        id: "telnet-vty",
        category: Category::AccessControl,
        severity: Severity::Issue,
        check: telnet_vty,
    },
    Rule {
        id: "http-server",
        category: Category::AccessControl,
        severity: Severity::Warning,
        check: http_server,
    },
    Rule {
        id: "missing-portfast",
        category: Category::SpanningTree,
        severity: Severity::Warning,
        check: missing_portfast,
    },
    Rule {
        id: "missing-bpduguard",
        category: Category::SpanningTree,
        severity: Severity::Warning,
        check: missing_bpduguard,
    },
    Rule {
        id: "vlan-count",
        category: Category::VlanHygiene,
        severity: Severity::Info,
        check: vlan_count,
    },
    Rule {
        id: "default-vlan-in-use",
        category: Category::VlanHygiene,
        severity: Severity::Warning,
        check: default_vlan_in_use,
    },
    Rule {
        id: "default-vlan-on-trunk",
        category: Category::VlanHygiene,
        severity: Severity::Warning,
        check: default_vlan_on_trunk,
    },
    Rule {
        id: "routing-count",
        category: Category::Routing,
        severity: Severity::Info,
        check: routing_count,
    },
    Rule {
        id: "routing-without-neighbor",
        category: Category::Routing,
        severity: Severity::Issue,
        check: routing_without_neighbor,
    },
    Rule {
        id: "routing-without-default",
        category: Category::Routing,
        severity: Severity::Warning,
        check: routing_without_default,
    },
    Rule {
        id: "cdp-enabled",
        category: Category::NeighborDiscoveryExposure,
        severity: Severity::Warning,
        check: cdp_enabled,
    },
    Rule {
        id: "lldp-enabled",
        category: Category::NeighborDiscoveryExposure,
        severity: Severity::Warning,
        check: lldp_enabled,
    },
    Rule {
        id: "no-buffered-logging",
        category: Category::Logging,
        severity: Severity::Warning,
        check: no_buffered_logging,
    },
    Rule {
        id: "no-syslog-host",
        category: Category::Logging,
        severity: Severity::Warning,
        check: no_syslog_host,
    },
    Rule {
        id: "up-but-unused",
        category: Category::InterfaceHygiene,
        severity: Severity::Warning,
        check: up_but_unused,
    },
];

/// VLANs reserved for FDDI/Token Ring that switches create by default.
const RESERVED_DEFAULT_VLANS: [&str; 4] = ["1002", "1003", "1004", "1005"];

static WEAK_PASSWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:password|secret)\s+(?:\d\s+)?(?:cisco|admin|12345|1234|password)\b")
        .expect("static pattern is valid")
});

static DEFAULT_ROUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^ip\s+route\s+(?:vrf\s+\S+\s+)?0\.0\.0\.0\s+0\.0\.0\.0\b|^default-information\s+originate\b",
    )
    .expect("static pattern is valid")
});

static SYSLOG_HOST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^logging\s+(?:host\s+\S+|server\s+\S+|\d{1,3}(?:\.\d{1,3}){3})")
        .expect("static pattern is valid")
});

/// First raw line starting with `prefix` (case-insensitive).
fn line_starting<'a>(model: &'a ParsedConfig, prefix: &str) -> Option<&'a str> {
    model
        .raw_lines()
        .find(|l| starts_with_ignore_case(l, prefix))
}

fn starts_with_ignore_case(line: &str, prefix: &str) -> bool {
    line.len() >= prefix.len()
        && line.is_char_boundary(prefix.len())
        && line[..prefix.len()].eq_ignore_ascii_case(prefix)
}

fn raw_contains(model: &ParsedConfig, needle: &str) -> bool {
    model.raw_text.to_ascii_lowercase().contains(needle)
}

/// Lines belonging to `line vty ...` sections.
fn vty_lines(model: &ParsedConfig) -> Vec<&str> {
    let mut in_vty = false;
    let mut out = Vec::new();
    for line in model.raw_text.lines() {
        let trimmed = line.trim();
        if !line.starts_with(char::is_whitespace) {
            in_vty = starts_with_ignore_case(trimmed, "line vty");
            continue;
        }
        if in_vty {
            out.push(trimmed);
        }
    }
    out
}

fn weak_password_literal(model: &ParsedConfig) -> Vec<Violation> {
    let mut seen: Vec<String> = Vec::new();
    for m in WEAK_PASSWORD.find_iter(&model.raw_text) {
        let text = m.as_str().to_string();
        if !seen.contains(&text) {
            seen.push(text);
        }
    }
    seen.into_iter()
        .map(|text| {
            Violation::new("Weak or default password in configuration").with_evidence(text)
        })
        .collect()
}

fn plaintext_enable_password(model: &ParsedConfig) -> Vec<Violation> {
    line_starting(model, "enable password")
        .map(|line| {
            Violation::new("Privileged access uses 'enable password' instead of a hashed secret")
                .with_evidence(redact(line))
        })
        .into_iter()
        .collect()
}

fn reversible_user_password(model: &ParsedConfig) -> Vec<Violation> {
    model
        .raw_lines()
        .filter(|l| {
            starts_with_ignore_case(l, "username ") && l.to_ascii_lowercase().contains(" password ")
        })
        .map(|line| {
            Violation::new("Local user stored with a reversible password instead of a secret")
                .with_evidence(redact(line))
        })
        .collect()
}

fn no_password_encryption(model: &ParsedConfig) -> Vec<Violation> {
    let has_passwords = model
        .raw_lines()
        .any(|l| l.to_ascii_lowercase().split_whitespace().any(|w| w == "password"));
    if has_passwords && line_starting(model, "service password-encryption").is_none() {
        vec![Violation::new("Passwords present but 'service password-encryption' is not enabled")]
    } else {
        Vec::new()
    }
}

fn md5_enable_secret(model: &ParsedConfig) -> Vec<Violation> {
    model
        .raw_lines()
        .filter(|l| starts_with_ignore_case(l, "enable secret 5 $1$"))
        .map(|line| {
            Violation::new("Enable secret uses legacy MD5 hashing").with_evidence(redact(line))
        })
        .collect()
}

fn missing_enable_secret(model: &ParsedConfig) -> Vec<Violation> {
    if model.looks_like_running_config() && line_starting(model, "enable secret").is_none() {
        vec![Violation::new("No hashed 'enable secret' configured for privileged access")]
    } else {
        Vec::new()
    }
}

fn aaa_disabled(model: &ParsedConfig) -> Vec<Violation> {
    if model.looks_like_running_config() && line_starting(model, "aaa new-model").is_none() {
        vec![Violation::new("AAA is not enabled ('aaa new-model' missing)")]
    } else {
        Vec::new()
    }
}

fn no_aaa_server(model: &ParsedConfig) -> Vec<Violation> {
    if model.looks_like_running_config()
        && !raw_contains(model, "tacacs")
        && !raw_contains(model, "radius")
    {
        vec![Violation::new("No TACACS+ or RADIUS server configured")]
    } else {
        Vec::new()
    }
}

fn no_acl(model: &ParsedConfig) -> Vec<Violation> {
    if model.looks_like_running_config() && model.acls.is_empty() {
        vec![Violation::new("No access control lists configured anywhere")]
    } else {
        Vec::new()
    }
}

fn open_vty(model: &ParsedConfig) -> Vec<Violation> {
    let Some(line) = line_starting(model, "line vty") else {
        return Vec::new();
    };
    if vty_lines(model)
        .iter()
        .any(|l| starts_with_ignore_case(l, "access-class"))
    {
        return Vec::new();
    }
    vec![
        Violation::new("VTY lines allow management access from anywhere (no access-class)")
            .with_evidence(line),
    ]
}

fn telnet_vty(model: &ParsedConfig) -> Vec<Violation> {
    vty_lines(model)
        .into_iter()
        .filter(|l| {
            let lower = l.to_ascii_lowercase();
            lower.starts_with("transport input")
                && lower.split_whitespace().any(|w| w == "telnet" || w == "all")
        })
        .map(|l| Violation::new("VTY lines accept unencrypted Telnet sessions").with_evidence(l))
        .collect()
}

fn http_server(model: &ParsedConfig) -> Vec<Violation> {
    model
        .raw_lines()
        .find(|l| l.eq_ignore_ascii_case("ip http server"))
        .map(|l| Violation::new("Plain HTTP management server is enabled").with_evidence(l))
        .into_iter()
        .collect()
}

fn missing_portfast(model: &ParsedConfig) -> Vec<Violation> {
    if model.interfaces.is_empty()
        || model.interfaces.iter().any(|i| i.portfast)
        || raw_contains(model, "spanning-tree portfast")
    {
        return Vec::new();
    }
    vec![Violation::new("No edge ports use PortFast; hosts wait for full STP convergence")]
}

fn missing_bpduguard(model: &ParsedConfig) -> Vec<Violation> {
    if model.interfaces.is_empty()
        || model.interfaces.iter().any(|i| i.bpdu_guard)
        || raw_contains(model, "bpduguard")
    {
        return Vec::new();
    }
    vec![Violation::new("BPDU guard is not enabled on any port")]
}

fn vlan_count(model: &ParsedConfig) -> Vec<Violation> {
    match model.vlans.len() {
        0 => Vec::new(),
        1 => vec![Violation::new("1 VLAN detected")],
        n => vec![Violation::new(format!("{n} VLANs detected"))],
    }
}

fn default_vlan_in_use(model: &ParsedConfig) -> Vec<Violation> {
    let mut out = Vec::new();
    if let Some(vlan) = model.vlan("1") {
        if !vlan.ports.is_empty() {
            out.push(
                Violation::new("Default VLAN 1 still carries access ports")
                    .with_evidence(vlan.ports.join(", ")),
            );
        }
    }
    let access: Vec<&str> = model
        .interfaces
        .iter()
        .filter(|i| i.vlan_membership.as_deref() == Some("1"))
        .map(|i| i.name.as_str())
        .collect();
    if !access.is_empty() {
        out.push(
            Violation::new("Interfaces assigned to default VLAN 1")
                .with_evidence(access.join(", ")),
        );
    }
    if let Some(svi) = model.interfaces.iter().find(|i| {
        i.name.eq_ignore_ascii_case("vlan1")
            && i.ip_address.is_some()
            && i.admin_state == PortState::Up
    }) {
        out.push(
            Violation::new("Default VLAN 1 interface is addressed and up")
                .with_evidence(svi.name.clone()),
        );
    }
    for id in RESERVED_DEFAULT_VLANS {
        if let Some(vlan) = model.vlan(id) {
            let evidence = match &vlan.name {
                Some(name) => format!("vlan {id} ({name})"),
                None => format!("vlan {id}"),
            };
            out.push(
                Violation::new(format!("Reserved default VLAN {id} still active"))
                    .with_evidence(evidence),
            );
        }
    }
    out
}

fn default_vlan_on_trunk(model: &ParsedConfig) -> Vec<Violation> {
    model
        .interfaces
        .iter()
        .filter(|i| i.switchport_mode == Some(SwitchportMode::Trunk))
        .filter(|i| match &i.trunk_allowed_vlans {
            Some(list) => vlan_list_contains(list, 1),
            None => true,
        })
        .map(|i| Violation::new("Default VLAN 1 allowed on trunk").with_evidence(i.name.clone()))
        .collect()
}

fn routing_count(model: &ParsedConfig) -> Vec<Violation> {
    if model.routing_protocols.is_empty() {
        return Vec::new();
    }
    let list: Vec<String> = model.routing_protocols.iter().map(|p| p.declaration()).collect();
    vec![Violation::new(format!(
        "{} routing process(es) declared",
        model.routing_protocols.len()
    ))
    .with_evidence(list.join(", "))]
}

fn routing_without_neighbor(model: &ParsedConfig) -> Vec<Violation> {
    if model.raw_lines().any(|l| starts_with_ignore_case(l, "neighbor ")) {
        return Vec::new();
    }
    model
        .routing_protocols
        .iter()
        .map(|p| {
            Violation::new(format!(
                "Incomplete routing declaration: {} process {} has no neighbor statement",
                p.kind,
                if p.process_or_as_id.is_empty() {
                    "(untagged)"
                } else {
                    p.process_or_as_id.as_str()
                }
            ))
            .with_evidence(p.declaration())
        })
        .collect()
}

fn routing_without_default(model: &ParsedConfig) -> Vec<Violation> {
    if model.routing_protocols.is_empty() || model.raw_lines().any(|l| DEFAULT_ROUTE.is_match(l)) {
        return Vec::new();
    }
    vec![Violation::new(
        "Dynamic routing declared but no default route is configured or originated",
    )]
}

fn cdp_enabled(model: &ParsedConfig) -> Vec<Violation> {
    if model.raw_lines().any(|l| l.eq_ignore_ascii_case("no cdp run")) {
        return Vec::new();
    }
    let run_line = model.raw_lines().find(|l| l.eq_ignore_ascii_case("cdp run"));
    if run_line.is_none() && model.neighbors.is_empty() {
        return Vec::new();
    }
    let evidence = match run_line {
        Some(line) => line.to_string(),
        None => format!("{} CDP/LLDP neighbour record(s) visible", model.neighbors.len()),
    };
    vec![
        Violation::new("CDP is enabled and not explicitly disabled; it exposes device details")
            .with_evidence(evidence),
    ]
}

fn lldp_enabled(model: &ParsedConfig) -> Vec<Violation> {
    model
        .raw_lines()
        .find(|l| l.eq_ignore_ascii_case("lldp run"))
        .map(|l| {
            Violation::new("LLDP is enabled globally; it exposes device details").with_evidence(l)
        })
        .into_iter()
        .collect()
}

fn no_buffered_logging(model: &ParsedConfig) -> Vec<Violation> {
    if model.looks_like_running_config() && line_starting(model, "logging buffered").is_none() {
        vec![Violation::new(
            "No persistent buffered logging configured ('logging buffered' missing)",
        )]
    } else {
        Vec::new()
    }
}

fn no_syslog_host(model: &ParsedConfig) -> Vec<Violation> {
    if model.looks_like_running_config() && !model.raw_lines().any(|l| SYSLOG_HOST.is_match(l)) {
        vec![Violation::new("No remote syslog host configured")]
    } else {
        Vec::new()
    }
}

fn up_but_unused(model: &ParsedConfig) -> Vec<Violation> {
    model
        .interfaces
        .iter()
        .filter(|i| i.admin_state == PortState::Up && i.protocol_state == PortState::Down)
        .map(|i| {
            Violation::new(format!(
                "{} is administratively up but its line protocol is down",
                i.name
            ))
            .with_evidence(i.name.clone())
        })
        .collect()
}

/// Mask the credential token of a password/secret line.
fn redact(line: &str) -> String {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.len() {
        0 => String::new(),
        1 => words[0].to_string(),
        n => format!("{} ****", words[..n - 1].join(" ")),
    }
}
