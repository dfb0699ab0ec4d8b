use futures::future::join_all;
use netdoc_core::narrative::{
    resolve_narrative, MockNarrativeGenerator, NarrativeError, NarrativeSections,
    UNAVAILABLE_PREFIX,
};
use netdoc_core::pipeline::analyze;
use netdoc_core::render::{Format, ReportLabels};

fn sections(summary: &str) -> NarrativeSections {
    NarrativeSections {
        summary: summary.to_string(),
        explanation: "explanation".to_string(),
        best_practices: "best practices".to_string(),
        recommendations: "recommendations".to_string(),
    }
}

#[tokio::test]
async fn test_resolve_narrative_passes_sections_through() {
    let analysis = analyze(b"hostname SW1\n");
    let mut generator = MockNarrativeGenerator::new();
    generator
        .expect_generate()
        .withf(|model| model.hostname.as_deref() == Some("SW1"))
        .times(1)
        .returning(|_| Ok(sections("Access switch SW1.")));

    let narrative = resolve_narrative(&generator, &analysis.model).await;
    assert_eq!(narrative.summary, "Access switch SW1.");
    assert!(!narrative.is_unavailable());
}

#[tokio::test]
async fn test_resolve_narrative_turns_failure_into_placeholder() {
    let analysis = analyze(b"hostname SW1\n");
    let mut generator = MockNarrativeGenerator::new();
    generator
        .expect_generate()
        .times(1)
        .returning(|_| Err(NarrativeError::Transport("connection refused".to_string())));

    let narrative = resolve_narrative(&generator, &analysis.model).await;
    assert!(narrative.is_unavailable());
    for (_, body) in narrative.sections() {
        assert!(body.starts_with(UNAVAILABLE_PREFIX));
        assert!(body.contains("connection refused"));
    }

    // The placeholder still renders in every format.
    let outputs = analysis
        .render_all(&Format::ALL, &ReportLabels::default(), Some(&narrative))
        .expect("placeholder renders");
    let md = String::from_utf8(outputs[&Format::Markdown].clone()).unwrap();
    assert!(md.contains("## Narrative Sections"));
    assert!(md.contains("Narrative unavailable: narrative transport failed: connection refused"));
}

#[tokio::test]
async fn test_concurrent_pipeline_runs_are_independent() {
    let inputs: Vec<String> = (0..8)
        .map(|i| {
            format!(
                "hostname SW{i}\nrouter ospf {i}\ninterface Gi0/{i}\n switchport access vlan {}\n",
                i + 10
            )
        })
        .collect();

    let mut generator = MockNarrativeGenerator::new();
    generator
        .expect_generate()
        .times(inputs.len())
        .returning(|model| Ok(sections(model.hostname.as_deref().unwrap_or("?"))));

    let analyses: Vec<_> = inputs.iter().map(|raw| analyze(raw.as_bytes())).collect();
    let narratives = join_all(
        analyses
            .iter()
            .map(|analysis| resolve_narrative(&generator, &analysis.model)),
    )
    .await;

    for (i, (analysis, narrative)) in analyses.iter().zip(&narratives).enumerate() {
        let expected = format!("SW{i}");
        assert_eq!(analysis.model.hostname.as_deref(), Some(expected.as_str()));
        assert_eq!(narrative.summary, expected);
        assert!(analysis.model.vlan("10").is_none());
        assert_eq!(
            analysis.model.interfaces[0].vlan_membership.as_deref(),
            Some((i + 10).to_string().as_str())
        );
    }

    // Same inputs on plain threads give the same results as the sequential run.
    let threaded: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|raw| scope.spawn(move || analyze(raw.as_bytes())))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(threaded, analyses);
}

#[test]
fn test_fenced_model_reply_is_parsed() {
    let raw = "Here you go:\n```json\n{\"summary\": \"Core router\", \"best_practices\": [\"Use SSH\", \"Disable HTTP\"]}\n```";
    let parsed = NarrativeSections::from_response(raw).expect("lenient parse");
    assert_eq!(parsed.summary, "Core router");
    assert_eq!(parsed.best_practices, "Use SSH\nDisable HTTP");
    assert_eq!(parsed.explanation, "");

    assert!(matches!(
        NarrativeSections::from_response("no json here"),
        Err(NarrativeError::Malformed(_))
    ));
    assert!(matches!(
        NarrativeSections::from_response("{\"summary\": 42}"),
        Err(NarrativeError::Malformed(_))
    ));
}
