//! Fusara imaging API client.
//!
//! Every response is wrapped in `{ data, statusCode, succeeded, statusCodeInt }`; numeric task
//! and image ids are turned into strings at this boundary.

use async_trait::async_trait;
use dbot_core::{GeneratedImage, Orientation, Style};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::engine::{GenerateImageRequest, GenerationTask, ImageGenerationEngine};
use crate::error::EngineError;

const FUSARA_API_BASE: &str = "https://api.fusara.ai";
const GENERATE_PATH: &str = "/api/integration/imaging/generate";
const TASKS_PATH: &str = "/api/integration/imaging/tasks";
const ENHANCE_PATH: &str = "/api/integration/assistants/enhance-prompt";
const API_KEY_HEADER: &str = "X-API-Key";

/// Engine aspect ratio for an orientation.
pub fn aspect_ratio(orientation: Orientation) -> &'static str {
    match orientation {
        Orientation::Vertical => "3:4",
        Orientation::Horizontal => "4:3",
    }
}

/// Text prepended to the prompt when it is not enhanced.
pub fn style_descriptor(style: Style) -> &'static str {
    match style {
        Style::Photo => "realistic hd Photo very detailed high resolution",
        Style::Illustration => "illustration",
    }
}

/// Style id understood by the prompt enhancer: 1 photorealistic, 2 illustration.
pub fn target_style_id(style: Style) -> u8 {
    match style {
        Style::Photo => 1,
        Style::Illustration => 2,
    }
}

/// Masks an API key for logs: first 7 + `***` + last 4 characters; short keys become `***`.
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 11 {
        return "***".to_string();
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}***{}", head, tail)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateBody<'a> {
    #[serde(rename = "__type")]
    kind: u8,
    prompt: &'a str,
    aspect_ratio: &'a str,
    completion_callback_url: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EnhanceBody<'a> {
    prompt: &'a str,
    target_style_id: u8,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<T> {
    data: Option<T>,
    status_code: i64,
    succeeded: bool,
    #[allow(dead_code)]
    status_code_int: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskData {
    task_id: u64,
    images: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    id: u64,
    url: String,
}

impl From<TaskData> for GenerationTask {
    fn from(data: TaskData) -> Self {
        Self {
            task_id: data.task_id.to_string(),
            images: data
                .images
                .into_iter()
                .map(|image| GeneratedImage {
                    id: image.id.to_string(),
                    url: image.url,
                })
                .collect(),
        }
    }
}

/// Fusara implementation of [`ImageGenerationEngine`].
#[derive(Debug, Clone)]
pub struct FusaraClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl FusaraClient {
    /// Creates a client against the public Fusara API.
    pub fn new(api_key: String) -> Result<Self, EngineError> {
        Self::with_base_url(api_key, FUSARA_API_BASE.to_string())
    }

    /// Creates a client against a custom base URL (staging, tests).
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, EngineError> {
        let client = Client::builder().build().map_err(|e| EngineError::Http {
            url: base_url.clone(),
            message: e.to_string(),
        })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Rewrites the prompt with the engine's assistant for the given style.
    #[instrument(skip(self, prompt))]
    pub async fn enhance_prompt(&self, prompt: &str, style: Style) -> Result<String, EngineError> {
        let body = EnhanceBody {
            prompt,
            target_style_id: target_style_id(style),
        };
        let url = format!("{}{}", self.base_url, ENHANCE_PATH);
        let enhanced: String = self.send(self.client.post(&url).json(&body), &url).await?;
        debug!(enhanced_len = enhanced.len(), "prompt enhanced");
        Ok(enhanced)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<T, EngineError> {
        let http_error = |message: String| EngineError::Http {
            url: url.to_string(),
            message,
        };

        let response = request
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| http_error(e.to_string()))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| http_error(e.to_string()))?;
        if !status.is_success() {
            return Err(http_error(format!("status {}: {}", status, preview(&text))));
        }

        let envelope: Envelope<T> = serde_json::from_str(&text)
            .map_err(|e| EngineError::InvalidResponse(format!("{}: {}", e, preview(&text))))?;

        if !envelope.succeeded {
            return Err(EngineError::Rejected(format!(
                "statusCode {} from {}: {}",
                envelope.status_code,
                url,
                preview(&text)
            )));
        }

        envelope
            .data
            .ok_or_else(|| EngineError::InvalidResponse(format!("missing data from {}", url)))
    }
}

fn preview(text: &str) -> String {
    const LOG_PREVIEW_LEN: usize = 300;
    if text.chars().count() <= LOG_PREVIEW_LEN {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(LOG_PREVIEW_LEN).collect::<String>())
    }
}

#[async_trait]
impl ImageGenerationEngine for FusaraClient {
    #[instrument(skip(self, request), fields(style = %request.style, orientation = %request.orientation))]
    async fn generate(&self, request: &GenerateImageRequest) -> Result<GenerationTask, EngineError> {
        let prompt = if request.enhance_prompt {
            self.enhance_prompt(&request.prompt, request.style).await?
        } else {
            format!("{} {}", style_descriptor(request.style), request.prompt)
        };

        info!(
            prompt_preview = %prompt.chars().take(100).collect::<String>(),
            enhanced = request.enhance_prompt,
            api_key = %mask_api_key(&self.api_key),
            "Fusara generation request"
        );

        let body = GenerateBody {
            kind: 1,
            prompt: &prompt,
            aspect_ratio: aspect_ratio(request.orientation),
            completion_callback_url: &request.completion_callback_url,
        };
        let url = format!("{}{}", self.base_url, GENERATE_PATH);
        let data: TaskData = self.send(self.client.post(&url).json(&body), &url).await?;
        let task = GenerationTask::from(data);

        info!(task_id = %task.task_id, "Fusara accepted generation");
        Ok(task)
    }

    #[instrument(skip(self))]
    async fn get_generated_images(&self, task_id: &str) -> Result<GenerationTask, EngineError> {
        let url = format!("{}{}/{}", self.base_url, TASKS_PATH, task_id);
        let data: TaskData = self.send(self.client.get(&url), &url).await?;
        let task = GenerationTask::from(data);

        info!(task_id = %task.task_id, image_count = task.images.len(), "Fusara task fetched");
        Ok(task)
    }
}
