use crate::domain::model::{CandidateItems, MAX_POOL_ITEMS};
use crate::domain::ports::{ConfigProvider, ItemSource};
use crate::utils::error::{BingoError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

const API_KEY_HEADER: &str = "x-goog-api-key";

// ---------------------------------------------------------------------------
// Wire types for the generateContent API
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: ResponseSchema,
}

#[derive(Debug, Serialize)]
struct ResponseSchema {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    items: Option<Box<ResponseSchema>>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

// ---------------------------------------------------------------------------
// Item source
// ---------------------------------------------------------------------------

/// Custom topic items generated by the upstream text-generation service.
pub struct GeminiItemSource {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    item_count: usize,
    retry_on_transient: bool,
}

impl GeminiItemSource {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            BingoError::ConfigValidationError {
                field: "upstream".to_string(),
                message: format!("Failed to build HTTP client: {}", e),
            }
        })?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: None,
            item_count: MAX_POOL_ITEMS,
            retry_on_transient: true,
        })
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let mut source = Self::new(config.upstream_endpoint(), config.request_timeout())?
            .with_item_count(config.item_count())
            .with_retry(config.retry_on_transient());
        if let Some(key) = config.api_key() {
            source = source.with_api_key(key);
        }
        Ok(source)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_item_count(mut self, item_count: usize) -> Self {
        self.item_count = item_count;
        self
    }

    pub fn with_retry(mut self, retry_on_transient: bool) -> Self {
        self.retry_on_transient = retry_on_transient;
        self
    }

    fn prompt(&self, topic: &str) -> String {
        format!(
            "Generate a list of {count} unique, child-friendly items related to \"{topic}\". \
             The items should be suitable for a bingo card. \
             Return the list as a JSON array of strings, for example [\"item1\", \"item2\", \"item3\"]. \
             Return exactly {count} items.",
            count = self.item_count,
            topic = topic
        )
    }

    fn request_body(&self, topic: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(self.prompt(topic)),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: ResponseSchema {
                    kind: "ARRAY",
                    items: Some(Box::new(ResponseSchema {
                        kind: "STRING",
                        items: None,
                    })),
                },
            },
        }
    }

    async fn send_once(
        &self,
        body: &GenerateContentRequest,
    ) -> std::result::Result<Response, reqwest::Error> {
        let mut request = self.client.post(&self.endpoint).json(body);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }
        request.send().await
    }

    /// 只有連線失敗或逾時才重試一次，HTTP 錯誤狀態不重試
    async fn send(&self, body: &GenerateContentRequest) -> Result<Response> {
        match self.send_once(body).await {
            Ok(response) => Ok(response),
            Err(e) if self.retry_on_transient && is_transient(&e) => {
                tracing::warn!(
                    "🔁 Transient upstream failure, retrying once: {}",
                    e.without_url()
                );
                self.send_once(body).await.map_err(transport_error)
            }
            Err(e) => Err(transport_error(e)),
        }
    }
}

fn is_transient(error: &reqwest::Error) -> bool {
    error.is_timeout() || error.is_connect()
}

/// 錯誤訊息不帶 URL，避免洩漏端點參數
fn transport_error(error: reqwest::Error) -> BingoError {
    let error = error.without_url();
    let detail = if error.is_timeout() {
        format!("request timed out: {}", error)
    } else {
        error.to_string()
    };
    BingoError::Upstream {
        status: None,
        detail,
    }
}

/// Pull the generated item list out of a generateContent response body.
fn parse_generate_response(body: &str) -> Result<CandidateItems> {
    let response: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| BingoError::Upstream {
            status: None,
            detail: format!("malformed response body: {}", e),
        })?;

    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .ok_or_else(|| BingoError::Upstream {
            status: None,
            detail: "unexpected response structure: missing candidates[0].content.parts[0].text"
                .to_string(),
        })?;

    let payload: serde_json::Value =
        serde_json::from_str(&text).map_err(|e| BingoError::Upstream {
            status: None,
            detail: format!("generated text is not valid JSON: {}", e),
        })?;

    serde_json::from_value::<Vec<String>>(payload).map_err(|e| {
        BingoError::InvalidResponseShape {
            detail: format!("expected a JSON array of strings: {}", e),
        }
    })
}

#[async_trait]
impl ItemSource for GeminiItemSource {
    async fn fetch_candidates(&self, topic: &str) -> Result<CandidateItems> {
        tracing::debug!("Requesting {} items for custom topic \"{}\"", self.item_count, topic);

        let body = self.request_body(topic);
        let response = self.send(&body).await?;
        let status = response.status();
        tracing::debug!("Upstream response status: {}", status);

        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|e| format!("unreadable error body: {}", e.without_url()));
            return Err(BingoError::Upstream {
                status: Some(status.as_u16()),
                detail,
            });
        }

        let text = response.text().await.map_err(transport_error)?;

        let items = parse_generate_response(&text)?;
        tracing::debug!("Upstream returned {} candidate items", items.len());
        Ok(items)
    }
}
