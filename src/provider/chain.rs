//! Sequential fail-through over remote model providers

use std::time::Duration;

use tracing::{debug, info, warn};

use super::sanitize::clean_response;
use super::{Credential, ModelTransport, ProviderResult, RemoteReply};

pub const NOT_CONFIGURED_REPLY: &str =
    "The AI service is not configured. Please set your OpenRouter API key.";
pub const ALL_FAILED_REPLY: &str = "Sorry, I couldn't connect to any AI services at the moment.";

/// Tries each provider once, in order, until one answers.
///
/// Attempts are strictly sequential: at most one request is outstanding and
/// nothing is sent after the first success.
pub struct ProviderChain<T> {
    transport: T,
    models: Vec<String>,
    credential: Option<Credential>,
    timeout: Duration,
}

impl<T: ModelTransport> ProviderChain<T> {
    pub fn new(
        transport: T,
        models: Vec<String>,
        credential: Option<Credential>,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            models,
            credential,
            timeout,
        }
    }

    /// Whether a usable credential was supplied
    pub fn is_configured(&self) -> bool {
        self.credential.is_some()
    }

    /// Ask the providers, returning the first answer or a fixed apology
    pub async fn query(&self, prompt: &str) -> String {
        let Some(credential) = &self.credential else {
            warn!("provider chain has no credential, skipping remote call");
            return NOT_CONFIGURED_REPLY.to_string();
        };

        for (index, model) in self.models.iter().enumerate() {
            debug!(model = %model, attempt = index + 1, "querying provider");

            match self.attempt(credential, model, prompt).await {
                ProviderResult::Success(text) => {
                    info!(model = %model, attempt = index + 1, "provider answered");
                    return clean_response(&text);
                }
                ProviderResult::Failure(reason) => {
                    warn!(model = %model, %reason, "provider failed");
                }
            }
        }

        warn!(providers = self.models.len(), "all providers failed");
        ALL_FAILED_REPLY.to_string()
    }

    async fn attempt(&self, credential: &Credential, model: &str, prompt: &str) -> ProviderResult {
        let call = self.transport.call(credential, model, prompt, self.timeout);
        let reply = match tokio::time::timeout(self.timeout, call).await {
            Ok(reply) => reply,
            Err(_) => RemoteReply::failure(format!(
                "timed out after {}ms",
                self.timeout.as_millis()
            )),
        };
        reply.into()
    }
}
