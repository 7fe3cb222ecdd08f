//! OpenAI-compatible API client.
//!
//! Implements both provider traits against the `/embeddings` and
//! `/chat/completions` endpoints. Chat completions are requested with
//! `stream: true` and parsed from the server-sent event stream.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::mpsc;

use crate::config::LlmConfig;
use crate::error::{Error, Result};
use crate::rag::provider::{ChatProvider, EmbeddingProvider};

pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    chat_model: String,
    embed_model: String,
    embedding_dimensions: usize,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiClient {
    pub fn new(config: &LlmConfig, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::internal(format!("failed to build http client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            chat_model: config.chat_model.clone(),
            embed_model: config.embed_model.clone(),
            embedding_dimensions: config.embedding_dimensions,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for OpenAiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.embed_model,
                "input": text,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::embedding(format!(
                "embeddings request failed ({}): {}",
                status, body
            )));
        }

        let parsed: EmbeddingResponse = response.json().await?;
        parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| Error::embedding("embeddings response contained no data"))
    }

    fn dimensions(&self) -> usize {
        self.embedding_dimensions
    }
}

/// Parse one SSE line from a streaming chat completion, returning the
/// delta text fragment if the line carries one.
fn parse_stream_line(line: &str) -> Option<String> {
    let payload = line.strip_prefix("data: ")?.trim();
    if payload == "[DONE]" {
        return None;
    }

    let value: serde_json::Value = serde_json::from_str(payload).ok()?;
    value["choices"][0]["delta"]["content"]
        .as_str()
        .map(|s| s.to_string())
}

#[async_trait]
impl ChatProvider for OpenAiClient {
    async fn stream_chat(&self, prompt: &str, tx: mpsc::Sender<String>) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.chat_model,
                "messages": [{"role": "user", "content": prompt}],
                "temperature": self.temperature,
                "max_tokens": self.max_tokens,
                "stream": true,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::llm(format!(
                "chat request failed ({}): {}",
                status, body
            )));
        }

        let mut stream = response.bytes_stream();
        let mut buffer = String::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            buffer.push_str(&String::from_utf8_lossy(&chunk));

            // Events are newline-delimited; keep any partial line buffered.
            while let Some(newline) = buffer.find('\n') {
                let line = buffer[..newline].trim_end_matches('\r').to_string();
                buffer.drain(..=newline);

                if let Some(fragment) = parse_stream_line(&line) {
                    if tx.send(fragment).await.is_err() {
                        // Receiver hung up; stop streaming.
                        return Ok(());
                    }
                }
            }
        }

        Ok(())
    }

    fn model(&self) -> &str {
        &self.chat_model
    }
}
