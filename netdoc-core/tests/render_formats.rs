use netdoc_core::narrative::NarrativeSections;
use netdoc_core::pipeline::{analyze, Analysis};
use netdoc_core::render::wrap::wrap_line;
use netdoc_core::render::{Format, RenderError, ReportLabels, REPORT_TITLE, SECTION_ORDER};
use serde_json::Value;

const SWITCH: &[u8] = b"hostname EDGE-7\n\
vlan 10\n name STAFF\n\
interface Gi0/1\n description printer <2nd floor> & \"lab\"\n switchport access vlan 10\n!\n\
router ospf 5\n\
Device ID: CORE\n\
Interface: Gi0/24,  Port ID (outgoing port): Te1/0/1\n";

fn labels() -> ReportLabels {
    ReportLabels {
        organization: "Acme Networks".to_string(),
        user: "ops@acme.example".to_string(),
    }
}

fn narrative() -> NarrativeSections {
    NarrativeSections {
        summary: "Edge switch for the second floor.".to_string(),
        explanation: "One access VLAN and an OSPF process.".to_string(),
        best_practices: "Enable BPDU guard on edge ports.".to_string(),
        recommendations: "Add an OSPF neighbor or remove the process.".to_string(),
    }
}

fn text(analysis: &Analysis, format: Format, narrative: Option<&NarrativeSections>) -> String {
    let bytes = analysis.render(format, &labels(), narrative).expect("render succeeds");
    String::from_utf8(bytes).expect("textual format is UTF-8")
}

fn assert_in_order(haystack: &str, needles: &[String]) {
    let mut from = 0;
    for needle in needles {
        let pos = haystack[from..]
            .find(needle.as_str())
            .unwrap_or_else(|| panic!("{needle:?} missing or out of order"));
        from += pos + needle.len();
    }
}

#[test]
fn test_markdown_sections_follow_fixed_order() {
    let analysis = analyze(SWITCH);
    let md = text(&analysis, Format::Markdown, Some(&narrative()));

    assert!(md.starts_with(&format!("# {REPORT_TITLE}\n")));
    let headings: Vec<String> = SECTION_ORDER.iter().map(|s| format!("\n## {s}\n")).collect();
    assert_in_order(&md, &headings);
    assert!(md.contains("- **Organization:** Acme Networks"));
    assert!(md.contains("```mermaid\ngraph TD\n"));
    assert!(md.contains("### Best Practices"));
}

#[test]
fn test_html_sections_follow_fixed_order_and_escape_text() {
    let analysis = analyze(SWITCH);
    let html = text(&analysis, Format::Html, Some(&narrative()));

    assert!(html.starts_with("<!DOCTYPE html>"));
    let headings: Vec<String> = SECTION_ORDER.iter().map(|s| format!("<h2>{s}</h2>")).collect();
    assert_in_order(&html, &headings);
    assert!(html.contains("printer &lt;2nd floor&gt; &amp; &quot;lab&quot;"));
    assert!(!html.contains("<2nd floor>"));
    assert!(html.contains("<pre class=\"mermaid\">graph TD"));
}

#[test]
fn test_json_keys_follow_section_order() {
    let analysis = analyze(SWITCH);
    let json = text(&analysis, Format::Json, Some(&narrative()));

    let keys = [
        "\"device_summary\"",
        "\"vlans\"",
        "\"interfaces\"",
        "\"neighbors\"",
        "\"routing_summary\"",
        "\"topology\"",
        "\"audit_findings\"",
        "\"narrative_sections\"",
    ]
    .map(String::from);
    assert_in_order(&json, &keys);

    let value: Value = serde_json::from_str(&json).expect("valid JSON");
    assert_eq!(value["organization"], "Acme Networks");
    assert_eq!(value["device_summary"]["hostname"], "EDGE-7");
    assert_eq!(value["vlans"][0]["vlan_id"], "10");
    assert_eq!(value["topology"]["nodes"][1]["label"], "CORE");
    assert!(value["topology"]["mermaid"].as_str().unwrap().starts_with("graph TD"));
    assert!(value["audit_findings"]["routing"].is_array());
    assert_eq!(value["audit_findings"].as_object().unwrap().len(), 9);
}

#[test]
fn test_narrative_section_is_optional() {
    let analysis = analyze(SWITCH);

    let md = text(&analysis, Format::Markdown, None);
    assert!(!md.contains("## Narrative Sections"));
    assert!(md.contains("## Audit Findings"));

    let json: Value = serde_json::from_str(&text(&analysis, Format::Json, None)).unwrap();
    assert!(json.get("narrative_sections").is_none());

    let placeholder = NarrativeSections::unavailable("collaborator timed out");
    let html = text(&analysis, Format::Html, Some(&placeholder));
    assert!(html.contains("Narrative unavailable: collaborator timed out"));
}

#[test]
fn test_audit_findings_are_rendered_with_severity_tags() {
    let analysis = analyze(SWITCH);
    let md = text(&analysis, Format::Markdown, None);

    assert!(md.contains("### Routing"));
    assert!(md.contains(
        "- [ISSUE] Incomplete routing declaration: OSPF process 5 has no neighbor statement (evidence: router ospf 5)"
    ));
}

#[test]
fn test_pdf_has_header_and_is_nonempty() {
    let analysis = analyze(SWITCH);
    let pdf = analysis
        .render(Format::Pdf, &labels(), Some(&narrative()))
        .expect("pdf renders");
    assert!(pdf.starts_with(b"%PDF"));
    assert!(pdf.len() > 500);
}

#[test]
fn test_pdf_handles_long_reports() {
    let mut raw = String::from("hostname BIG\n");
    for i in 1..=400 {
        raw.push_str(&format!(
            "interface GigabitEthernet1/0/{i}\n description {}\n switchport access vlan {}\n!\n",
            "patch-panel-row ".repeat(8),
            i % 50 + 2
        ));
    }
    let analysis = analyze(raw.as_bytes());
    let pdf = analysis.render(Format::Pdf, &labels(), None).expect("pdf renders");
    assert!(pdf.starts_with(b"%PDF"));
}

#[test]
fn test_pdf_rejects_characters_outside_builtin_encoding() {
    let analysis = analyze("hostname R1\ninterface Gi0/1\n description 上海 uplink\n".as_bytes());
    let err = analysis
        .render(Format::Pdf, &labels(), None)
        .expect_err("non-Latin text cannot be shown by builtin fonts");

    assert_eq!(err.format(), Format::Pdf);
    match err {
        RenderError::Unencodable { character, context, .. } => {
            assert_eq!(character, '上');
            assert!(context.contains("上海 uplink"));
        }
        other => panic!("unexpected error: {other}"),
    }

    // The same content is fine in the textual formats.
    let md = text(&analysis, Format::Markdown, None);
    assert!(md.contains("上海 uplink"));
}

#[test]
fn test_pdf_shows_undecodable_bytes_as_question_marks() {
    let analysis = analyze(b"hostname R1\ninterface Gi0/1\n description bad\xff byte\n");
    let pdf = analysis
        .render(Format::Pdf, &labels(), None)
        .expect("a stray invalid byte does not block the pdf");
    assert!(pdf.starts_with(b"%PDF"));

    let md = text(&analysis, Format::Markdown, None);
    assert!(md.contains("bad\u{fffd} byte"));
}

#[test]
fn test_pdf_bytes_repeat_across_renders() {
    let analysis = analyze(b"hostname SW1\nvlan 10\n");
    let first = analysis.render(Format::Pdf, &labels(), None).expect("pdf renders");
    let second = analysis.render(Format::Pdf, &labels(), None).expect("pdf renders");
    assert_eq!(first, second);

    let other = analyze(b"hostname SW2\nvlan 10\n")
        .render(Format::Pdf, &labels(), None)
        .expect("pdf renders");
    assert_ne!(first, other);
}

#[test]
fn test_render_all_returns_every_requested_format() {
    let analysis = analyze(SWITCH);
    let outputs = analysis
        .render_all(&Format::ALL, &labels(), None)
        .expect("all formats render");
    assert_eq!(outputs.len(), 4);
    assert!(outputs[&Format::Pdf].starts_with(b"%PDF"));
    assert!(outputs[&Format::Html].starts_with(b"<!DOCTYPE html>"));
}

#[test]
fn test_format_names_parse() {
    assert_eq!("md".parse::<Format>(), Ok(Format::Markdown));
    assert_eq!("PDF".parse::<Format>(), Ok(Format::Pdf));
    assert_eq!(
        "docx".parse::<Format>(),
        Err("unsupported report format: docx".to_string())
    );
    assert_eq!(Format::Markdown.extension(), "md");
}

#[test]
fn test_wrapped_lines_reassemble_exactly() {
    let line = "interface GigabitEthernet1/0/1 description uplink-to-distribution-switch-in-building-north";
    let segments = wrap_line(line, 20);
    assert!(segments.len() > 1);
    assert_eq!(segments.concat(), line);
}
