#[cfg(test)]
#[path = "gemini_test.rs"]
mod tests;

use std::error;
use std::time::Duration;

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Backend;
use crate::domain::models::RequestEnvelope;

const API_KEY_HEADER: &str = "x-goog-api-key";

const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Model {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ModelListResponse {
    #[serde(default)]
    models: Vec<Model>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SafetySetting {
    category: String,
    threshold: String,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    safety_settings: Vec<SafetySetting>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ApiErrorResponse {
    error: ApiError,
}

/// Everything the Gemini client needs, read once from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct GeminiOptions {
    pub url: String,
    pub token: String,
    pub model: String,
    pub health_check_timeout: Duration,
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
    /// Applied to every harm category. Empty leaves the backend defaults.
    pub safety_threshold: String,
}

impl GeminiOptions {
    pub fn from_config() -> Result<GeminiOptions> {
        return Ok(GeminiOptions {
            url: Config::get(ConfigKey::GeminiURL),
            token: Config::get(ConfigKey::GeminiToken),
            model: Config::get(ConfigKey::Model),
            health_check_timeout: Duration::from_millis(Config::parse(
                ConfigKey::HealthCheckTimeout,
            )?),
            temperature: Config::parse(ConfigKey::Temperature)?,
            top_k: Config::parse(ConfigKey::TopK)?,
            top_p: Config::parse(ConfigKey::TopP)?,
            max_output_tokens: Config::parse(ConfigKey::MaxOutputTokens)?,
            safety_threshold: Config::get(ConfigKey::SafetyThreshold),
        });
    }
}

pub struct Gemini {
    client: reqwest::Client,
    options: GeminiOptions,
}

impl Gemini {
    pub fn new(options: GeminiOptions) -> Gemini {
        return Gemini {
            client: reqwest::Client::new(),
            options,
        };
    }

    fn model_path(&self) -> String {
        let model = self.options.model.trim_start_matches("models/");
        return format!("models/{model}");
    }

    fn build_request(&self, envelope: &RequestEnvelope) -> GenerateContentRequest {
        let contents = envelope
            .turns()
            .into_iter()
            .map(|turn| {
                return Content {
                    role: Some(turn.role.gemini_role().to_string()),
                    parts: vec![Part {
                        text: Some(turn.text),
                    }],
                };
            })
            .collect::<Vec<Content>>();

        let system_instruction = envelope.persona.map(|persona| {
            return Content {
                role: None,
                parts: vec![Part {
                    text: Some(persona.to_string()),
                }],
            };
        });

        let mut safety_settings = vec![];
        if !self.options.safety_threshold.is_empty() {
            safety_settings = HARM_CATEGORIES
                .iter()
                .map(|category| {
                    return SafetySetting {
                        category: category.to_string(),
                        threshold: self.options.safety_threshold.to_string(),
                    };
                })
                .collect();
        }

        return GenerateContentRequest {
            contents,
            system_instruction,
            generation_config: GenerationConfig {
                temperature: self.options.temperature,
                top_k: self.options.top_k,
                top_p: self.options.top_p,
                max_output_tokens: self.options.max_output_tokens,
            },
            safety_settings,
        };
    }
}

/// Flattens a reqwest failure into a single line. The request URL is dropped.
fn request_error(err: reqwest::Error) -> anyhow::Error {
    let err = err.without_url();
    tracing::error!(error = ?err, "Gemini request did not complete");
    if err.is_timeout() {
        return anyhow!("Gemini request timeout");
    }

    let mut cause: &dyn error::Error = &err;
    while let Some(source) = cause.source() {
        cause = source;
    }

    if err.is_decode() {
        return anyhow!("Gemini returned an unreadable response: {cause}");
    }
    return anyhow!("Could not reach Gemini: {cause}");
}

fn response_text(res: GenerateContentResponse) -> Result<String> {
    if let Some(reason) = res.prompt_feedback.and_then(|feedback| return feedback.block_reason) {
        bail!("Gemini blocked the prompt: {reason}");
    }

    let candidate = match res.candidates.into_iter().next() {
        Some(candidate) => candidate,
        None => bail!("No response received from Gemini API"),
    };

    let text = candidate
        .content
        .map(|content| {
            return content
                .parts
                .into_iter()
                .filter_map(|part| return part.text)
                .collect::<Vec<String>>()
                .join("");
        })
        .unwrap_or_default();

    if text.is_empty() && candidate.finish_reason.as_deref() == Some("SAFETY") {
        bail!("Gemini blocked the response for safety reasons");
    }

    return Ok(text);
}

#[async_trait]
impl Backend for Gemini {
    fn name(&self) -> &'static str {
        return "gemini";
    }

    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<()> {
        if self.options.url.is_empty() {
            bail!("Gemini URL is not defined");
        }
        if self.options.token.is_empty() {
            bail!("Gemini API key is not configured");
        }

        let url = format!(
            "{url}/v1beta/{model}",
            url = self.options.url,
            model = self.model_path()
        );

        let res = match self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.options.token)
            .timeout(self.options.health_check_timeout)
            .send()
            .await
        {
            Ok(res) => res,
            Err(err) => {
                tracing::error!(error = ?err.without_url(), "Gemini is not reachable");
                bail!("Gemini is not reachable");
            }
        };

        let status = res.status().as_u16();
        if status >= 400 {
            tracing::error!(status = status, "Gemini health check failed");
            bail!("Gemini health check failed with status {status}");
        }

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn list_models(&self) -> Result<Vec<String>> {
        let res = self
            .client
            .get(format!("{url}/v1beta/models", url = self.options.url))
            .header(API_KEY_HEADER, &self.options.token)
            .send()
            .await
            .map_err(request_error)?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            tracing::error!(status = status, "Failed to list Gemini models");
            bail!("Failed to list Gemini models, {status}");
        }

        let body = res
            .json::<ModelListResponse>()
            .await
            .map_err(request_error)?;
        let mut models: Vec<String> = body
            .models
            .iter()
            .filter(|model| {
                return model
                    .supported_generation_methods
                    .contains(&"generateContent".to_string());
            })
            .map(|model| {
                return model.name.to_string();
            })
            .collect();

        models.sort();

        return Ok(models);
    }

    #[allow(clippy::implicit_return)]
    async fn generate(&self, envelope: &RequestEnvelope) -> Result<String> {
        if self.options.token.is_empty() {
            bail!("Gemini API key is not configured");
        }

        let req = self.build_request(envelope);
        let res = self
            .client
            .post(format!(
                "{url}/v1beta/{model}:generateContent",
                url = self.options.url,
                model = self.model_path()
            ))
            .header(API_KEY_HEADER, &self.options.token)
            .json(&req)
            .send()
            .await
            .map_err(request_error)?;

        let status = res.status();
        if !status.is_success() {
            tracing::error!(
                status = status.as_u16(),
                "Failed to make completion request to Gemini"
            );

            let body = res.text().await.unwrap_or_default();
            if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&body) {
                bail!(
                    "Gemini request failed ({code} {status}): {message}",
                    code = api_err.error.code,
                    status = api_err.error.status,
                    message = api_err.error.message
                );
            }

            bail!("Gemini request failed with status {}", status.as_u16());
        }

        let body = res
            .json::<GenerateContentResponse>()
            .await
            .map_err(request_error)?;
        return response_text(body);
    }
}
