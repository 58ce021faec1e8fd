use serde::Deserialize;
use serde_json::json;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Failure modes of the completion capability.
///
/// Both are recovered by the orchestrator into a `success = false` result;
/// the split exists so the failure text can report elapsed time for a stall
/// and the status/body detail for everything else.
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("GLM request timed out after {elapsed_secs}s (limit {limit_secs}s)")]
    Timeout { elapsed_secs: u64, limit_secs: u64 },

    #[error("GLM request failed: {0}")]
    Transport(String),
}

/// The completion capability the orchestrator depends on.
///
/// Implementations own the timeout: `complete` must give up and return
/// `InvokeError::Timeout` once `timeout` has elapsed rather than blocking
/// indefinitely.
pub trait CompletionBackend {
    fn complete(&self, prompt: &str, model: &str, timeout: Duration)
        -> Result<String, InvokeError>;
}

/// Blocking client for an OpenAI-compatible GLM `chat/completions` endpoint.
pub struct GlmHttpClient {
    base_url: String,
    auth_token: String,
}

impl GlmHttpClient {
    pub fn new(base_url: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth_token: auth_token.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl CompletionBackend for GlmHttpClient {
    fn complete(
        &self,
        prompt: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<String, InvokeError> {
        let started = Instant::now();

        let result = ureq::post(&self.endpoint())
            .timeout(timeout)
            .set("Authorization", &format!("Bearer {}", self.auth_token))
            .set("Content-Type", "application/json")
            .send_json(json!({
                "model": model,
                "messages": [{ "role": "user", "content": prompt }],
            }));

        let response = match result {
            Ok(r) => r,
            Err(ureq::Error::Status(code, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                return Err(InvokeError::Transport(format!(
                    "status {code}: {}",
                    truncate(&body, 300)
                )));
            }
            Err(ureq::Error::Transport(t)) => {
                // ureq reports deadline expiry as a transport-level I/O
                // error; the elapsed clock distinguishes a stalled call
                // from a broken one.
                let elapsed = started.elapsed();
                if elapsed >= timeout {
                    return Err(InvokeError::Timeout {
                        elapsed_secs: elapsed.as_secs(),
                        limit_secs: timeout.as_secs(),
                    });
                }
                return Err(InvokeError::Transport(t.to_string()));
            }
        };

        let parsed: ChatResponse = response
            .into_json()
            .map_err(|e| InvokeError::Transport(format!("malformed response: {e}")))?;

        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
