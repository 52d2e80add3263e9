// file: src/generator/drafter.rs
// description: drafts DSP sections and extracts project metadata through the model transport
// reference: retrieval-augmented generation with structured JSON replies

use crate::config::LlmConfig;
use crate::error::{DspError, Result};
use crate::generator::prompt::{SECTION_FIELD, metadata_prompt, section_prompt};
use crate::generator::sanitize::{parse_json_reply, sanitize_content};
use crate::llm::{ChatCompletionsClient, CompletionRequest, LlmTransport, RetryPolicy};
use crate::models::PartialMetadata;
use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Reply shape for a drafted section.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SectionDraft {
    /// Markdown body of the section, without its title and without HTML
    pub section_content: String,
}

pub fn error_sentinel(reason: impl std::fmt::Display) -> String {
    format!("[[ERROR: Generation failed: {}]]", reason)
}

#[derive(Clone)]
pub struct DspGenerator {
    transport: Arc<dyn LlmTransport>,
    retry: RetryPolicy,
    structured_output: bool,
}

impl DspGenerator {
    pub fn new(transport: Arc<dyn LlmTransport>, retry: RetryPolicy, structured_output: bool) -> Self {
        Self {
            transport,
            retry,
            structured_output,
        }
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let client = ChatCompletionsClient::new(config)?;
        info!("Using model {} at {}", client.model(), config.base_url);

        Ok(Self::new(
            Arc::new(client),
            RetryPolicy::from_config(config),
            config.structured_output,
        ))
    }

    /// Drafts one section. Never fails: once retries are exhausted the
    /// content is an `[[ERROR: ...]]` sentinel so the batch can go on.
    /// Returns the prompt alongside the content.
    pub async fn generate_section(
        &self,
        section_title: &str,
        section_body: &str,
        project_summary: &str,
        context: &str,
    ) -> (String, String) {
        let prompt = section_prompt(section_title, section_body, project_summary, context);
        info!("Generating content for: {}", section_title);

        let request = self.request::<SectionDraft>("section_draft", &prompt);
        let label = format!("Section '{}'", section_title);

        let request = &request;
        let result = self
            .retry
            .run(&label, move |_| async move {
                let draft: SectionDraft = self.attempt(request).await?;
                let content = sanitize_content(&draft.section_content);
                if content.is_empty() {
                    return Err(DspError::Response(format!(
                        "'{}' is empty",
                        SECTION_FIELD
                    )));
                }
                Ok(content)
            })
            .await;

        match result {
            Ok(content) => {
                debug!("Drafted {} chars for {}", content.len(), section_title);
                (prompt, content)
            }
            Err(e) => {
                error!("Generation failed for {}: {}", section_title, e);
                (prompt, error_sentinel(e))
            }
        }
    }

    /// Best-effort metadata extraction; an empty record on any failure.
    pub async fn extract_metadata(&self, summary_text: &str) -> PartialMetadata {
        let prompt = metadata_prompt(summary_text);
        let request = self.request::<PartialMetadata>("project_metadata", &prompt);

        let request = &request;
        let result = self
            .retry
            .run("Metadata extraction", move |_| {
                self.attempt::<PartialMetadata>(request)
            })
            .await;

        match result {
            Ok(metadata) => {
                debug!("Extracted metadata: {:?}", metadata);
                metadata
            }
            Err(e) => {
                warn!("Metadata extraction failed: {}", e);
                PartialMetadata::default()
            }
        }
    }

    fn request<T: JsonSchema>(&self, name: &str, prompt: &str) -> CompletionRequest {
        let request = CompletionRequest::new(prompt);
        if self.structured_output {
            request.with_schema(name, response_schema::<T>())
        } else {
            request
        }
    }

    async fn attempt<T: DeserializeOwned>(&self, request: &CompletionRequest) -> Result<T> {
        let raw = self.transport.complete(request).await?;
        let value = parse_json_reply(&raw)?;
        Ok(serde_json::from_value(value)?)
    }
}

fn response_schema<T: JsonSchema>() -> Value {
    let mut value = schema_for!(T).to_value();
    if let Some(object) = value.as_object_mut() {
        object.remove("$schema");
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::MockTransport;
    use crate::models::{DataClassification, InfrastructureType};
    use pretty_assertions::assert_eq;

    fn generator(transport: Arc<MockTransport>, structured: bool) -> DspGenerator {
        DspGenerator::new(transport, RetryPolicy::immediate(5), structured)
    }

    #[tokio::test]
    async fn test_generate_section_mocked_content() {
        let transport = Arc::new(MockTransport::replying(r#"{"section_content": "Mocked Content"}"#));
        let generator = generator(transport.clone(), true);

        let (prompt, content) = generator
            .generate_section("Title", "Body", "Summary", "Examples")
            .await;

        assert_eq!(content, "Mocked Content");
        assert!(prompt.contains("Title"));
        assert!(prompt.contains("Examples"));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_generate_section_sanitizes_reply() {
        let reply = "```json\n{\"section_content\": \"```markdown\\n<p>Hello</p>\\n```\"}\n```";
        let transport = Arc::new(MockTransport::replying(reply));

        let (_, content) = generator(transport, false)
            .generate_section("Title", "Body", "Summary", "")
            .await;

        assert_eq!(content, "Hello");
    }

    #[tokio::test]
    async fn test_generate_section_sentinel_after_retries() {
        let transport = Arc::new(MockTransport::failing("service unavailable"));
        let generator = generator(transport.clone(), true);

        let (prompt, content) = generator
            .generate_section("Access Control", "Body", "Summary", "")
            .await;

        assert!(content.starts_with("[[ERROR: Generation failed:"));
        assert!(content.contains("service unavailable"));
        assert!(prompt.contains("Access Control"));
        assert_eq!(transport.calls(), 5);
    }

    #[tokio::test]
    async fn test_malformed_and_missing_field_are_retried() {
        let transport = Arc::new(MockTransport::with_responder({
            let counter = std::sync::atomic::AtomicU32::new(0);
            move |_| {
                let n = counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                Ok(match n {
                    0 => "not json".to_string(),
                    1 => r#"{"other": "x"}"#.to_string(),
                    2 => r#"{"section_content": "   "}"#.to_string(),
                    _ => r#"{"section_content": "Recovered"}"#.to_string(),
                })
            }
        }));

        let (_, content) = generator(transport.clone(), true)
            .generate_section("T", "B", "S", "C")
            .await;

        assert_eq!(content, "Recovered");
        assert_eq!(transport.calls(), 4);
    }

    #[tokio::test]
    async fn test_structured_output_sends_schema() {
        let transport = Arc::new(MockTransport::replying(r#"{"section_content": "x"}"#));
        generator(transport.clone(), true)
            .generate_section("T", "B", "S", "C")
            .await;

        let requests = transport.requests();
        let schema = requests[0].schema.as_ref().unwrap();
        assert_eq!(schema.name, "section_draft");
        assert!(schema.schema["properties"]["section_content"].is_object());
        assert!(schema.schema.get("$schema").is_none());

        let unstructured = Arc::new(MockTransport::replying(r#"{"section_content": "x"}"#));
        generator(unstructured.clone(), false)
            .generate_section("T", "B", "S", "C")
            .await;
        assert!(unstructured.requests()[0].schema.is_none());
    }

    #[tokio::test]
    async fn test_extract_metadata() {
        let transport = Arc::new(MockTransport::replying(
            r#"{"project_name": "Nebula", "classification": "CUI", "is_cui": true,
                "infrastructure": "Air-Gapped Server"}"#,
        ));

        let metadata = generator(transport, true)
            .extract_metadata("Nebula analyzes CUI on an air-gapped server.")
            .await;

        assert_eq!(metadata.project_name.as_deref(), Some("Nebula"));
        assert_eq!(metadata.classification, Some(DataClassification::Cui));
        assert_eq!(metadata.is_cui, Some(true));
        assert_eq!(metadata.infrastructure, Some(InfrastructureType::AirGap));
        assert!(metadata.pi_name.is_none());
    }

    #[tokio::test]
    async fn test_extract_metadata_failure_is_empty() {
        let transport = Arc::new(MockTransport::failing("unauthorized"));

        let metadata = generator(transport.clone(), true)
            .extract_metadata("Anything")
            .await;

        assert!(metadata.is_empty());
        assert_eq!(transport.calls(), 5);
    }
}
