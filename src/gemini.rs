//! Gemini backend: turns a query into a raw JSON suggestion.
//!
//! One `generateContent` POST per query, temperature 0 and JSON response
//! mode so decoding is deterministic and schema-constrained. All transport
//! failures collapse into an empty result; callers treat "empty" as "no
//! suggestion available" and never see an error.

use crate::config::ApiConfig;
use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Client for the Gemini generateContent API.
pub struct GeminiClient {
    config: ApiConfig,
    client: Client,
}

impl GeminiClient {
    /// Create a new client from resolved API configuration.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { config, client })
    }

    /// Ask the model for a command suggestion. Returns the raw JSON reply
    /// text, or an empty string on any transport failure.
    pub async fn suggest(&self, prompt: &str, query: &str) -> String {
        match self.try_suggest(prompt, query).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Suggestion request failed: {e:#}");
                eprintln!("Error contacting the model: {e}");
                String::new()
            }
        }
    }

    async fn try_suggest(&self, prompt: &str, query: &str) -> Result<String> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![
                    GeminiPart {
                        text: prompt.to_string(),
                    },
                    GeminiPart {
                        text: query.to_string(),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: 0.0,
                response_mime_type: "application/json".to_string(),
                response_schema: response_schema(),
            },
        };

        let mut builder = self
            .client
            .post(&self.config.endpoint_url)
            .query(&[("key", self.config.api_key.as_str())]);
        for (name, value) in &self.config.headers {
            builder = builder.header(name, value);
        }

        debug!("POST {}", self.config.endpoint_url);
        let response = builder
            .json(&request)
            .send()
            .await
            .context("Failed to connect to the Gemini API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Gemini API request failed with status {status}: {body}"));
        }

        let envelope: GeminiResponse = response
            .json()
            .await
            .context("Failed to parse Gemini response envelope")?;

        let text = envelope
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| anyhow!("Empty response from Gemini"))?;

        Ok(text)
    }
}

/// The response schema sent with every request, mirroring the four fields
/// the prompt promises.
fn response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "command": { "type": "STRING" },
            "explanation": { "type": "STRING" },
            "known_command": { "type": "BOOLEAN" },
            "platform": { "type": "STRING" },
        },
        "required": ["command", "explanation", "known_command", "platform"],
    })
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    response_mime_type: String,
    response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_camel_case_config() {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart {
                    text: "hi".to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.0,
                response_mime_type: "application/json".to_string(),
                response_schema: response_schema(),
            },
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"generationConfig\""));
        assert!(json.contains("\"responseMimeType\":\"application/json\""));
        assert!(json.contains("\"responseSchema\""));
        assert!(json.contains("\"temperature\":0.0"));
    }

    #[test]
    fn test_schema_covers_all_four_fields() {
        let schema = response_schema();
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 4);
        for field in ["command", "explanation", "known_command", "platform"] {
            assert!(schema["properties"].get(field).is_some());
        }
    }

    #[test]
    fn test_envelope_first_candidate_first_part() {
        let body = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "{\"command\":\"ls\"}"}]}}
            ],
            "usageMetadata": {"promptTokenCount": 10}
        }"#;
        let envelope: GeminiResponse = serde_json::from_str(body).unwrap();
        let text = envelope
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str());
        assert_eq!(text, Some("{\"command\":\"ls\"}"));
    }

    #[test]
    fn test_envelope_without_candidates() {
        let envelope: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert!(envelope.candidates.is_empty());
    }
}
