use std::cell::Cell;
use std::time::Duration;

use reqwest::blocking::Client as HttpClient;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::model::{Model, ModelError};

/// Connection and runtime settings for a local Ollama server
#[derive(Debug, Clone)]
pub struct OllamaSettings {
    pub base_url: String,
    pub model: String,
    /// Context window requested from the runtime
    pub ctx: usize,
    /// CPU threads used by the runtime
    pub threads: usize,
    pub temperature: f32,
    pub timeout: Duration,
}

/// Model backed by a locally hosted Ollama server.
///
/// Uses the chat endpoint when available and falls back to the plain
/// completion endpoint on servers that do not expose it.
pub struct OllamaModel {
    client: HttpClient,
    settings: OllamaSettings,
    base_url: String,
    completion_only: Cell<bool>,
}

#[derive(Serialize)]
struct Options {
    num_predict: usize,
    num_ctx: usize,
    num_thread: usize,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    options: Options,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
    options: Options,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<InstalledModel>,
}

#[derive(Deserialize)]
struct InstalledModel {
    name: String,
}

impl OllamaModel {
    /// Connect to the server and verify the requested model is installed.
    pub fn connect(settings: OllamaSettings) -> Result<Self, ModelError> {
        let base_url = settings.base_url.trim_end_matches('/').to_string();
        let client = HttpClient::builder().timeout(settings.timeout).build()?;

        info!("Connecting to model server at {}", base_url);

        let tags_url = format!("{}/api/tags", base_url);
        let response = client
            .get(&tags_url)
            .send()
            .map_err(|e| ModelError::Unavailable {
                url: base_url.clone(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(ModelError::Unavailable {
                url: base_url,
                reason: format!("HTTP {}", response.status()),
            });
        }

        let tags: TagsResponse = response.json()?;
        let installed: Vec<String> = tags.models.into_iter().map(|m| m.name).collect();

        if !installed.iter().any(|name| same_model(name, &settings.model)) {
            return Err(ModelError::MissingModel {
                name: settings.model.clone(),
                url: base_url,
                installed: if installed.is_empty() {
                    "none".to_string()
                } else {
                    installed.join(", ")
                },
            });
        }

        info!("Using model {}", settings.model);

        Ok(OllamaModel {
            client,
            settings,
            base_url,
            completion_only: Cell::new(false),
        })
    }

    fn options(&self, max_tokens: usize) -> Options {
        Options {
            num_predict: max_tokens,
            num_ctx: self.settings.ctx,
            num_thread: self.settings.threads,
            temperature: self.settings.temperature,
        }
    }

    /// Returns `Ok(None)` when the server has no chat endpoint.
    fn chat(
        &self,
        prompt: &str,
        max_tokens: usize,
        system_prompt: Option<&str>,
    ) -> Result<Option<String>, ModelError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system_prompt {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        let request = ChatRequest {
            model: &self.settings.model,
            messages,
            stream: false,
            options: self.options(max_tokens),
        };

        let url = format!("{}/api/chat", self.base_url);
        let response = self.client.post(&url).json(&request).send()?;
        let status = response.status();

        if endpoint_missing(status) {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ModelError::Status {
                code: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        let body: ChatResponse = response.json()?;
        Ok(Some(body.message.content))
    }

    fn complete(
        &self,
        prompt: &str,
        max_tokens: usize,
        system_prompt: Option<&str>,
    ) -> Result<String, ModelError> {
        let request = GenerateRequest {
            model: &self.settings.model,
            prompt,
            system: system_prompt,
            stream: false,
            options: self.options(max_tokens),
        };

        let url = format!("{}/api/generate", self.base_url);
        let response = self.client.post(&url).json(&request).send()?;
        let status = response.status();

        if !status.is_success() {
            return Err(ModelError::Status {
                code: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        let body: GenerateResponse = response.json()?;
        Ok(body.response)
    }
}

impl Model for OllamaModel {
    fn name(&self) -> &str {
        &self.settings.model
    }

    fn generate(
        &self,
        prompt: &str,
        max_tokens: usize,
        system_prompt: Option<&str>,
    ) -> Result<String, ModelError> {
        let text = if self.completion_only.get() {
            self.complete(prompt, max_tokens, system_prompt)?
        } else {
            match self.chat(prompt, max_tokens, system_prompt)? {
                Some(text) => text,
                None => {
                    warn!("Chat endpoint not available, falling back to completion");
                    self.completion_only.set(true);
                    self.complete(prompt, max_tokens, system_prompt)?
                }
            }
        };

        debug!("Model produced {} bytes", text.len());
        Ok(text)
    }
}

/// Installed names carry a tag; a bare requested name means `:latest`.
fn same_model(installed: &str, requested: &str) -> bool {
    if installed == requested {
        return true;
    }
    !requested.contains(':') && installed == format!("{}:latest", requested)
}

fn endpoint_missing(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::NOT_FOUND | StatusCode::METHOD_NOT_ALLOWED | StatusCode::NOT_IMPLEMENTED
    )
}
