//! OpenRouter chat-completions transport

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Credential, ModelTransport, RemoteReply, SYSTEM_PREAMBLE};

pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

const TITLE: &str = "Jarvis Assistant";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl<'a> ChatRequest<'a> {
    fn new(model: &'a str, prompt: &'a str) -> Self {
        Self {
            model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PREAMBLE,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        }
    }
}

/// Extract the first choice's text from a response body
fn parse_reply(body: &str) -> Option<String> {
    let response: ChatResponse = serde_json::from_str(body).ok()?;
    response.choices.into_iter().next()?.message.content
}

/// Sends chat completions to OpenRouter (or any compatible endpoint)
pub struct OpenRouterTransport {
    endpoint: String,
    /// Sent as `HTTP-Referer` when set
    referer: Option<String>,
    client: reqwest::Client,
}

impl OpenRouterTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            referer: None,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_referer(mut self, referer: Option<String>) -> Self {
        self.referer = referer;
        self
    }

    fn request(
        &self,
        credential: &Credential,
        model: &str,
        prompt: &str,
        timeout: Duration,
    ) -> reqwest::RequestBuilder {
        let mut request = self
            .client
            .post(&self.endpoint)
            .bearer_auth(credential.token())
            .header("X-Title", TITLE);

        if let Some(referer) = &self.referer {
            request = request.header("HTTP-Referer", referer);
        }

        request.timeout(timeout).json(&ChatRequest::new(model, prompt))
    }
}

impl ModelTransport for OpenRouterTransport {
    async fn call(
        &self,
        credential: &Credential,
        model: &str,
        prompt: &str,
        timeout: Duration,
    ) -> RemoteReply {
        debug!(model, endpoint = %self.endpoint, "sending chat completion");

        let result = self
            .request(credential, model, prompt, timeout)
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => return RemoteReply::failure(format!("connection error: {e}")),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return RemoteReply::failure(format!("{status}: failed to read body: {e}")),
        };

        if status != reqwest::StatusCode::OK {
            return RemoteReply::failure(format!("{status} - {body}"));
        }

        RemoteReply {
            ok: true,
            text: parse_reply(&body),
            status_info: status.to_string(),
        }
    }
}
