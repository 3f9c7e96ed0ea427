//! Remote conversational model access
//!
//! `ProviderChain` walks an ordered list of model identifiers, giving each
//! exactly one attempt, and always returns a sentence the loop can announce.
//! The network boundary is the `ModelTransport` trait; `OpenRouterTransport`
//! is the production implementation.

mod chain;
mod openrouter;
mod sanitize;

pub use chain::{ProviderChain, ALL_FAILED_REPLY, NOT_CONFIGURED_REPLY};
pub use openrouter::{OpenRouterTransport, DEFAULT_API_URL};

use std::time::Duration;

/// System preamble sent with every prompt
pub const SYSTEM_PREAMBLE: &str =
    "You are Jarvis, an intelligent, concise, and helpful AI assistant.";

/// Value shipped in sample configs; treated as "no key"
pub const PLACEHOLDER_API_KEY: &str = "sk-or-v1-YOUR-API-KEY-HERE";

/// Bearer token for the provider API
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    /// Build a credential, rejecting empty and placeholder values
    pub fn from_value(value: Option<&str>) -> Option<Self> {
        let value = value?.trim();
        if value.is_empty() || value == PLACEHOLDER_API_KEY {
            return None;
        }
        Some(Self(value.to_string()))
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Raw outcome of one transport call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteReply {
    /// Transport succeeded with a success status
    pub ok: bool,
    /// Response text, when the payload was well formed
    pub text: Option<String>,
    /// Status line or diagnostic, for logging
    pub status_info: String,
}

impl RemoteReply {
    #[cfg(test)]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            ok: true,
            text: Some(text.into()),
            status_info: "200 OK".to_string(),
        }
    }

    pub fn failure(status_info: impl Into<String>) -> Self {
        Self {
            ok: false,
            text: None,
            status_info: status_info.into(),
        }
    }
}

/// Result of a single provider attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderResult {
    Success(String),
    Failure(String),
}

impl From<RemoteReply> for ProviderResult {
    fn from(reply: RemoteReply) -> Self {
        match reply {
            RemoteReply {
                ok: true,
                text: Some(text),
                ..
            } => ProviderResult::Success(text),
            RemoteReply {
                ok: true,
                text: None,
                status_info,
            } => ProviderResult::Failure(format!("malformed payload ({status_info})")),
            RemoteReply { status_info, .. } => ProviderResult::Failure(status_info),
        }
    }
}

/// Network boundary to a chat-completion service
#[allow(async_fn_in_trait)]
pub trait ModelTransport {
    /// Issue one request for `model`. Never fails; failures are reported
    /// through `RemoteReply::ok`.
    async fn call(
        &self,
        credential: &Credential,
        model: &str,
        prompt: &str,
        timeout: Duration,
    ) -> RemoteReply;
}
