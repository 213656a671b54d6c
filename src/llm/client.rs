//! Inference clients.
//!
//! The pipeline only needs "prompt in, text out". Two Ollama backends are
//! provided: spawning `ollama run <model>` per call, and the HTTP
//! generate endpoint.

use crate::config::{Backend, ModelConfig};
use crate::error::AtsError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// A model that turns a prompt into generated text.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Name of the model behind this client.
    fn model(&self) -> &str;

    /// Generate a completion for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String, AtsError>;
}

/// Build the client selected by the model configuration.
pub fn build_client(config: &ModelConfig) -> Result<Box<dyn InferenceClient>, AtsError> {
    let timeout = config.timeout_seconds.map(Duration::from_secs);

    let client: Box<dyn InferenceClient> = match config.backend {
        Backend::Cli => Box::new(OllamaCli::new(
            config.ollama_bin.clone(),
            config.name.clone(),
            timeout,
        )),
        Backend::Http => Box::new(OllamaHttp::new(
            config.ollama_url.clone(),
            config.name.clone(),
            config.temperature,
            timeout,
        )?),
    };

    Ok(client)
}

/// Runs `<binary> run <model>` with the prompt on stdin.
pub struct OllamaCli {
    binary: String,
    model: String,
    timeout: Option<Duration>,
}

impl OllamaCli {
    pub fn new(binary: String, model: String, timeout: Option<Duration>) -> Self {
        Self {
            binary,
            model,
            timeout,
        }
    }
}

#[async_trait]
impl InferenceClient for OllamaCli {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, AtsError> {
        debug!("Running {} run {} ({} prompt chars)", self.binary, self.model, prompt.len());

        let mut child = Command::new(&self.binary)
            .arg("run")
            .arg(&self.model)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                AtsError::Inference(format!(
                    "Failed to start '{}': {}. Is Ollama installed?",
                    self.binary, e
                ))
            })?;

        // Feed stdin from a separate task so a chatty child cannot block on a full stdout pipe.
        let writer = child.stdin.take().map(|mut stdin| {
            let prompt = prompt.to_string();
            tokio::spawn(async move {
                let result = stdin.write_all(prompt.as_bytes()).await;
                drop(stdin);
                result
            })
        });

        let waited = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| {
                    AtsError::Inference(format!(
                        "{} timed out after {}s",
                        self.binary,
                        limit.as_secs()
                    ))
                })?,
            None => child.wait_with_output().await,
        };
        let output = waited
            .map_err(|e| AtsError::Inference(format!("Failed to wait for {}: {}", self.binary, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AtsError::Inference(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            )));
        }

        if let Some(writer) = writer {
            match writer.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => debug!("Writing prompt to stdin failed: {}", e),
                Err(e) => debug!("Stdin writer task failed: {}", e),
            }
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Ollama `/api/generate` request.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

/// Ollama `/api/generate` response (non-streaming).
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Talks to a running Ollama server over HTTP.
pub struct OllamaHttp {
    url: String,
    model: String,
    temperature: f32,
    timeout: Option<Duration>,
    http_client: reqwest::Client,
}

impl OllamaHttp {
    pub fn new(
        url: String,
        model: String,
        temperature: f32,
        timeout: Option<Duration>,
    ) -> Result<Self, AtsError> {
        let mut builder = reqwest::Client::builder();
        if let Some(limit) = timeout {
            builder = builder.timeout(limit);
        }
        let http_client = builder
            .build()
            .map_err(|e| AtsError::Inference(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            model,
            temperature,
            timeout,
            http_client,
        })
    }
}

#[async_trait]
impl InferenceClient for OllamaHttp {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, AtsError> {
        let url = format!("{}/api/generate", self.url);

        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
            },
        };

        debug!("POST {} ({} prompt chars)", url, prompt.len());

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AtsError::Inference(format!(
                        "Request timed out after {}s",
                        self.timeout.map(|t| t.as_secs()).unwrap_or_default()
                    ))
                } else if e.is_connect() {
                    AtsError::Inference(format!(
                        "Cannot connect to Ollama at {}. Is Ollama running?",
                        self.url
                    ))
                } else {
                    AtsError::Inference(format!("Failed to send request: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AtsError::Inference(format!(
                "Ollama API error {}: {}",
                status, body
            )));
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AtsError::Inference(format!("Failed to parse Ollama response: {}", e)))?;

        Ok(generated.response)
    }
}
