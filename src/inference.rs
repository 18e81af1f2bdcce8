use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::InferenceConfig;

/// Returned in place of a tip when the model answers with an unexpected shape.
pub const NO_TIP: &str = "No tip generated.";

const MAX_NEW_TOKENS: u32 = 256;
const TEMPERATURE: f64 = 0.7;
const TOP_P: f64 = 0.9;

#[derive(Error, Debug)]
pub enum InferenceError {
    /// The endpoint answered with something other than 200; `body` is kept verbatim.
    #[error("{body}")]
    Upstream { status: u16, body: String },

    #[error("inference request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("inference response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

#[async_trait]
pub trait TipModel: Send + Sync {
    /// Sends `prompt` to the model and returns the generated text.
    async fn complete(&self, prompt: &str) -> Result<String, InferenceError>;
}

#[derive(Clone, Debug, PartialEq, Serialize)]
struct GenerationParameters {
    max_new_tokens: u32,
    temperature: f64,
    top_p: f64,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            max_new_tokens: MAX_NEW_TOKENS,
            temperature: TEMPERATURE,
            top_p: TOP_P,
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

impl<'a> GenerationRequest<'a> {
    fn new(inputs: &'a str) -> Self {
        Self {
            inputs,
            parameters: GenerationParameters::default(),
        }
    }
}

/// Text generation through the Hugging Face Inference API.
pub struct HuggingFaceClient {
    client: Client,
    url: String,
    token: String,
}

impl HuggingFaceClient {
    pub fn new(config: &InferenceConfig) -> Result<Self, InferenceError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            url: config.endpoint(),
            token: config.api_token.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TipModel for HuggingFaceClient {
    async fn complete(&self, prompt: &str) -> Result<String, InferenceError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&GenerationRequest::new(prompt))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status != StatusCode::OK {
            warn!("inference endpoint answered {status}");
            return Err(InferenceError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = serde_json::from_str(&body)?;
        Ok(generated_text(&value).unwrap_or_else(|| {
            debug!("inference response had no generated_text, using fallback");
            NO_TIP.to_owned()
        }))
    }
}

/// Pulls `generated_text` out of the first element of a text-generation response.
pub fn generated_text(response: &Value) -> Option<String> {
    response
        .as_array()?
        .first()?
        .get("generated_text")?
        .as_str()
        .map(str::to_owned)
}
