//! # narrative: the seam to the external narrative collaborator
//!
//! The core never generates prose and never talks to a network service. It
//! defines the [`NarrativeGenerator`] trait that an outer layer implements
//! (an HTTP language-model client, a canned fixture, a mock), parses the
//! collaborator's raw reply leniently, and turns every failure into an
//! explicit "unavailable" placeholder so rendering never depends on the
//! collaborator behaving.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall`; enable the `test-export-mocks`
//!   feature (on by default) to use `MockNarrativeGenerator` from other crates.

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::model::ParsedConfig;

/// Placeholder body used for every section when the collaborator fails.
pub const UNAVAILABLE_PREFIX: &str = "Narrative unavailable";

/// The four free-text sections the collaborator supplies. Opaque to the core.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeSections {
    pub summary: String,
    pub explanation: String,
    pub best_practices: String,
    pub recommendations: String,
}

#[derive(Debug, thiserror::Error)]
pub enum NarrativeError {
    #[error("narrative transport failed: {0}")]
    Transport(String),
    #[error("narrative response malformed: {0}")]
    Malformed(String),
}

impl NarrativeSections {
    /// Placeholder that names why the collaborator produced nothing.
    pub fn unavailable(reason: impl std::fmt::Display) -> Self {
        let text = format!("{UNAVAILABLE_PREFIX}: {reason}");
        Self {
            summary: text.clone(),
            explanation: text.clone(),
            best_practices: text.clone(),
            recommendations: text,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        self.summary.starts_with(UNAVAILABLE_PREFIX)
    }

    /// Titled sections in render order.
    pub fn sections(&self) -> [(&'static str, &str); 4] {
        [
            ("Summary", self.summary.as_str()),
            ("Explanation", self.explanation.as_str()),
            ("Best Practices", self.best_practices.as_str()),
            ("Recommendations", self.recommendations.as_str()),
        ]
    }

    /// Parse a collaborator reply.
    ///
    /// Accepts a JSON object directly, or the outermost `{...}` span when the
    /// object is wrapped in other text. Each section may be a string or an
    /// array of strings (joined one per line); missing sections are empty.
    pub fn from_response(raw: &str) -> Result<Self, NarrativeError> {
        let value: Value = match serde_json::from_str(raw.trim()) {
            Ok(v) => v,
            Err(_) => {
                let start = raw.find('{');
                let end = raw.rfind('}');
                match (start, end) {
                    (Some(s), Some(e)) if s < e => serde_json::from_str(&raw[s..=e])
                        .map_err(|e| NarrativeError::Malformed(e.to_string()))?,
                    _ => return Err(NarrativeError::Malformed("no JSON object in response".into())),
                }
            }
        };

        let object = value
            .as_object()
            .ok_or_else(|| NarrativeError::Malformed("response is not a JSON object".into()))?;

        let field = |key: &str| -> Result<String, NarrativeError> {
            match object.get(key) {
                None | Some(Value::Null) => Ok(String::new()),
                Some(Value::String(s)) => Ok(s.clone()),
                Some(Value::Array(items)) => items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => Ok(s.clone()),
                        other => Err(NarrativeError::Malformed(format!(
                            "section '{key}' holds a non-string item: {other}"
                        ))),
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(|lines| lines.join("\n")),
                Some(other) => Err(NarrativeError::Malformed(format!(
                    "section '{key}' has unexpected type: {other}"
                ))),
            }
        };

        Ok(Self {
            summary: field("summary")?,
            explanation: field("explanation")?,
            best_practices: field("best_practices")?,
            recommendations: field("recommendations")?,
        })
    }
}

/// External narrative collaborator. Implemented by real clients and by test mocks.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    /// Produce narrative sections for a parsed configuration.
    async fn generate(&self, model: &ParsedConfig) -> Result<NarrativeSections, NarrativeError>;
}

/// Ask the collaborator for narrative; any failure becomes a placeholder.
pub async fn resolve_narrative<G>(generator: &G, model: &ParsedConfig) -> NarrativeSections
where
    G: NarrativeGenerator + ?Sized,
{
    match generator.generate(model).await {
        Ok(sections) => {
            info!(summary_len = sections.summary.len(), "Narrative sections received");
            sections
        }
        Err(e) => {
            warn!(error = %e, "Narrative collaborator failed; using placeholder");
            NarrativeSections::unavailable(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_direct_json() {
        let raw = r#"{"summary":"Access switch","explanation":"x","best_practices":["a","b"],"recommendations":"r"}"#;
        let n = NarrativeSections::from_response(raw).unwrap();
        assert_eq!(n.summary, "Access switch");
        assert_eq!(n.best_practices, "a\nb");
    }

    #[test]
    fn parses_wrapped_json() {
        let raw = "Here you go:\n```json\n{\"summary\": \"s\"}\n```";
        let n = NarrativeSections::from_response(raw).unwrap();
        assert_eq!(n.summary, "s");
        assert_eq!(n.recommendations, "");
    }

    #[test]
    fn rejects_non_json() {
        assert!(matches!(
            NarrativeSections::from_response("sorry, I cannot help"),
            Err(NarrativeError::Malformed(_))
        ));
        assert!(matches!(
            NarrativeSections::from_response(r#"{"summary": 42}"#),
            Err(NarrativeError::Malformed(_))
        ));
    }

    #[test]
    fn every_error_kind_reaches_the_placeholder() {
        let errors = [
            NarrativeError::Transport("connection refused".into()),
            NarrativeError::Malformed("no JSON object in response".into()),
        ];
        for error in errors {
            let detail = match &error {
                NarrativeError::Transport(d) | NarrativeError::Malformed(d) => d.clone(),
            };
            let placeholder = NarrativeSections::unavailable(&error);
            assert!(placeholder.is_unavailable());
            assert!(placeholder.summary.contains(&detail));
        }
    }
}
