//! Ollama-compatible `/api/generate` client.

use crate::error::{check_status, Result};
use crate::llm::LanguageModel;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434/api/generate";

pub struct OllamaClient {
    endpoint: String,
    model: String,
    client: Client,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaClient {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        Ok(Self {
            endpoint: endpoint.into(),
            model: model.into(),
            client: Client::builder().build()?,
        })
    }
}

impl LanguageModel for OllamaClient {
    fn generate(&self, prompt: &str) -> Result<String> {
        let req = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };
        debug!("Generating with {} ({} chars of prompt)", self.model, prompt.len());
        let resp = self.client.post(&self.endpoint).json(&req).send()?;
        let body: GenerateResponse = check_status(resp)?.json()?;
        Ok(body.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body() {
        let req = GenerateRequest {
            model: "llama3",
            prompt: "why is the sky blue",
            stream: false,
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({"model": "llama3", "prompt": "why is the sky blue", "stream": false})
        );
    }
}
