//! Completion gateway - the external generative-text capability.
//!
//! Prompt in, text out, or failure. A single blocking attempt per call:
//! no retries, no backoff, no streaming, matching the source behavior.
//! The wire shape is the OpenAI-compatible chat completions endpoint.

use std::env;

use crate::config::GatewaySettings;

/// Gateway failures surface verbatim to the user. The conversation log is
/// never mutated on failure.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Seam for the external completion capability, so tests can substitute a
/// scripted backend.
pub trait CompletionBackend: Send + Sync {
    fn complete(&self, prompt: &str) -> Result<String, GatewayError>;
}

/// HTTP backend speaking the OpenAI-compatible chat completions shape.
/// The assembled prompt travels as a single user message.
pub struct HttpCompletionBackend {
    base_url: String,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
}

impl HttpCompletionBackend {
    /// Build the backend from config. The API key is read from the
    /// environment variable the config names; credentials never live in
    /// the config file itself.
    pub fn new(settings: &GatewaySettings) -> Result<Self, GatewayError> {
        if settings.base_url.is_empty() {
            return Err(GatewayError::Config(
                "base_url is required for the completion gateway".to_string(),
            ));
        }
        if settings.model.is_empty() {
            return Err(GatewayError::Config(
                "model is required for the completion gateway".to_string(),
            ));
        }

        let api_key = match &settings.api_key_env {
            Some(var) => match env::var(var) {
                Ok(key) if !key.is_empty() => Some(key),
                _ => {
                    return Err(GatewayError::Config(format!(
                        "API key env var {} is not set",
                        var
                    )))
                }
            },
            None => None,
        };

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
        })
    }
}

impl CompletionBackend for HttpCompletionBackend {
    fn complete(&self, prompt: &str) -> Result<String, GatewayError> {
        let url = format!("{}/chat/completions", self.base_url);

        let request_body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "user", "content": prompt }
            ],
            "max_tokens": self.max_tokens,
        });

        let client = reqwest::blocking::Client::new();
        let mut req = client.post(&url).header("Content-Type", "application/json");
        if let Some(key) = &self.api_key {
            req = req.header("Authorization", format!("Bearer {}", key));
        }

        let response = req
            .json(&request_body)
            .send()
            .map_err(|e| GatewayError::Http(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(GatewayError::Http(format!("HTTP {}: {}", status, body)));
        }

        let response_json: serde_json::Value = response
            .json()
            .map_err(|e| GatewayError::Http(format!("Failed to parse response: {}", e)))?;

        let text = response_json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| GatewayError::Unexpected("No content in response".to_string()))?
            .to_string();

        Ok(text)
    }
}

/// Backend used when the gateway could not be configured. Every call fails
/// with the configuration error that prevented setup, so the shortcut path
/// keeps working and the user sees why model calls do not.
struct UnconfiguredBackend {
    reason: String,
}

impl CompletionBackend for UnconfiguredBackend {
    fn complete(&self, _prompt: &str) -> Result<String, GatewayError> {
        Err(GatewayError::Config(self.reason.clone()))
    }
}

/// High-level gateway handle.
pub struct CompletionGateway {
    backend: Box<dyn CompletionBackend>,
}

impl CompletionGateway {
    /// Create the gateway from configuration.
    pub fn from_config(settings: &GatewaySettings) -> Result<Self, GatewayError> {
        Ok(Self {
            backend: Box::new(HttpCompletionBackend::new(settings)?),
        })
    }

    /// Create a gateway around an explicit backend (used by tests).
    pub fn with_backend(backend: Box<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    /// Create a gateway that rejects every call with the given reason.
    pub fn unconfigured(reason: impl Into<String>) -> Self {
        Self {
            backend: Box::new(UnconfiguredBackend {
                reason: reason.into(),
            }),
        }
    }

    /// Send the assembled prompt and return the completion text.
    pub fn complete(&self, prompt: &str) -> Result<String, GatewayError> {
        self.backend.complete(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(base_url: &str, model: &str) -> GatewaySettings {
        GatewaySettings {
            base_url: base_url.to_string(),
            model: model.to_string(),
            api_key_env: None,
            max_tokens: 512,
        }
    }

    #[test]
    fn test_backend_requires_base_url() {
        let result = HttpCompletionBackend::new(&settings("", "gemini-2.0-flash"));
        assert!(matches!(result, Err(GatewayError::Config(_))));
    }

    #[test]
    fn test_backend_requires_model() {
        let result = HttpCompletionBackend::new(&settings("http://localhost:11434/v1", ""));
        assert!(matches!(result, Err(GatewayError::Config(_))));
    }

    #[test]
    fn test_backend_requires_named_api_key_to_exist() {
        let mut s = settings("http://localhost:11434/v1", "gemini-2.0-flash");
        s.api_key_env = Some("TARIFFCTL_TEST_KEY_THAT_DOES_NOT_EXIST".to_string());

        let result = HttpCompletionBackend::new(&s);
        assert!(matches!(result, Err(GatewayError::Config(_))));
    }

    #[test]
    fn test_backend_without_api_key_env_is_valid() {
        // Local OpenAI-compatible servers take no key
        let backend = HttpCompletionBackend::new(&settings("http://localhost:11434/v1/", "llama3"));
        assert!(backend.is_ok());
    }

    #[test]
    fn test_unconfigured_gateway_always_fails() {
        let gateway = CompletionGateway::unconfigured("API key env var GEMINI_API_KEY is not set");
        let result = gateway.complete("anything");
        match result {
            Err(GatewayError::Config(reason)) => assert!(reason.contains("GEMINI_API_KEY")),
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_scripted_backend_through_gateway() {
        struct Scripted;
        impl CompletionBackend for Scripted {
            fn complete(&self, prompt: &str) -> Result<String, GatewayError> {
                Ok(format!("echo: {}", prompt))
            }
        }

        let gateway = CompletionGateway::with_backend(Box::new(Scripted));
        assert_eq!(gateway.complete("hi").unwrap(), "echo: hi");
    }
}
