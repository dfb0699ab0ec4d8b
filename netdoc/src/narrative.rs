#![doc = "HTTP narrative client: implements the core NarrativeGenerator against an OpenAI-compatible chat-completions endpoint."]
//
//! # Narrative client (CLI <-> external language model)
//!
//! [`ChatNarrator`] turns a parsed configuration into a prompt, posts it to
//! the configured endpoint and parses the reply with
//! [`NarrativeSections::from_response`]. Transport failures map to
//! [`NarrativeError::Transport`] and unusable replies to
//! [`NarrativeError::Malformed`]; the caller decides what to do with them
//! (the report command falls back to a placeholder).

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use netdoc_core::model::ParsedConfig;
use netdoc_core::narrative::{NarrativeError, NarrativeGenerator, NarrativeSections};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::load_config::NarrativeSection;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const TEMPERATURE: f32 = 0.2;
const MAX_TOKENS: u32 = 2000;
const SYSTEM_PROMPT: &str = "You are NetDoc, a network engineering expert.";

pub struct ChatNarrator {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl ChatNarrator {
    pub fn new(settings: &NarrativeSection) -> Result<Self> {
        let api_key = settings
            .api_key
            .clone()
            .context("narrative API key missing; it is injected from the environment")?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client for narrative service")?;
        tracing::info!(
            endpoint = %settings.endpoint,
            model = %settings.model,
            "Initialised narrative client"
        );
        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            model: settings.model.clone(),
            api_key,
        })
    }
}

/// The model as sent to the collaborator: structured fields only, no raw text.
fn prompt_payload(model: &ParsedConfig) -> String {
    let mut value = serde_json::to_value(model).unwrap_or(Value::Null);
    if let Some(object) = value.as_object_mut() {
        object.remove("raw_text");
    }
    serde_json::to_string_pretty(&value).unwrap_or_default()
}

pub fn build_prompt(model: &ParsedConfig) -> String {
    format!(
        "You are given a parsed network device configuration.\n\n\
PARSED DATA:\n{}\n\n\
Generate the following:\n\
1) Summary: what the configuration shows, the device type (switch/router) and its likely role (access/core/edge).\n\
2) Explanation: section by section, covering interfaces, VLANs, routing, security, AAA, STP and CDP/LLDP.\n\
3) Best practices: vendor and industry recommendations that apply to this device.\n\
4) Recommendations: actionable remediation steps.\n\n\
Output strict JSON with exactly these keys: \"summary\", \"explanation\", \"best_practices\", \"recommendations\".\n",
        prompt_payload(model)
    )
}

fn first_choice(response: ChatResponse) -> Result<String, NarrativeError> {
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| NarrativeError::Malformed("response has no choices".to_string()))
}

#[async_trait]
impl NarrativeGenerator for ChatNarrator {
    async fn generate(&self, model: &ParsedConfig) -> Result<NarrativeSections, NarrativeError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: build_prompt(model),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        tracing::info!(endpoint = %self.endpoint, model = %self.model, "Requesting narrative");
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    tracing::error!(error = %e, "Narrative request timed out");
                } else {
                    tracing::error!(error = %e, "Narrative request failed");
                }
                NarrativeError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, "Narrative service returned an error status");
            return Err(NarrativeError::Transport(format!(
                "HTTP {status}: {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| NarrativeError::Malformed(e.to_string()))?;
        let content = first_choice(parsed)?;
        tracing::debug!(chars = content.len(), "Narrative reply received");
        NarrativeSections::from_response(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_carries_structure_but_not_raw_text() {
        let model = ParsedConfig {
            hostname: Some("SW1".to_string()),
            raw_text: "enable password hunter2".to_string(),
            ..ParsedConfig::default()
        };
        let prompt = build_prompt(&model);
        assert!(prompt.contains("\"hostname\": \"SW1\""));
        assert!(!prompt.contains("hunter2"));
        assert!(prompt.contains("\"best_practices\""));
    }

    #[test]
    fn first_choice_content_is_used() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"{\"summary\":\"ok\"}"}}]}"#,
        )
        .unwrap();
        let content = first_choice(response).unwrap();
        let sections = NarrativeSections::from_response(&content).unwrap();
        assert_eq!(sections.summary, "ok");
    }

    #[test]
    fn empty_choices_is_malformed() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(first_choice(response), Err(NarrativeError::Malformed(_))));
    }

    #[test]
    fn missing_key_is_rejected() {
        let settings = NarrativeSection {
            enabled: true,
            ..NarrativeSection::default()
        };
        assert!(ChatNarrator::new(&settings).is_err());
    }
}
