use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::selector::{ModelTimeoutPolicy, DEFAULT_TIMEOUT_SECS, MAX_TIMEOUT_SECS};

/// Process-wide configuration, constructed once at startup and passed by
/// reference into the server and orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlmConfig {
    /// Root of the OpenAI-compatible GLM API, without the
    /// `/chat/completions` suffix.
    pub base_url: String,

    /// Bearer token. Usually supplied via `GLM_AUTH_TOKEN` rather than the
    /// config file.
    pub auth_token: String,

    /// Model used when the tool call does not name one.
    pub default_model: String,

    /// Supported model identifiers, in the order advertised to clients.
    pub models: Vec<String>,

    pub default_timeout_secs: u64,
    pub max_timeout_secs: u64,

    /// Per-model timeout defaults. glm-4.5-air answers fast; a long hang on
    /// it means a stalled call, so it fails at 120s instead of waiting out
    /// the global default.
    pub model_timeouts: HashMap<String, u64>,
}

impl Default for GlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://open.bigmodel.cn/api/paas/v4".to_string(),
            auth_token: String::new(),
            default_model: "glm-4.7".to_string(),
            models: vec!["glm-4.7".to_string(), "glm-4.5-air".to_string()],
            default_timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_timeout_secs: MAX_TIMEOUT_SECS,
            model_timeouts: HashMap::from([("glm-4.5-air".to_string(), 120)]),
        }
    }
}

impl GlmConfig {
    pub fn is_supported_model(&self, model: &str) -> bool {
        self.models.iter().any(|m| m == model)
    }

    pub fn policy(&self) -> ModelTimeoutPolicy {
        ModelTimeoutPolicy {
            default_model: self.default_model.clone(),
            default_timeout_secs: self.default_timeout_secs,
            max_timeout_secs: self.max_timeout_secs,
            per_model_secs: self.model_timeouts.clone(),
        }
    }
}

/// Load configuration for `dir`: `.ccglm.json` when present, then
/// `GLM_BASE_URL` / `GLM_AUTH_TOKEN` environment overrides. A missing or
/// unparseable file falls back to defaults.
pub fn load_config(dir: &Path) -> GlmConfig {
    let primary = dir.join(".ccglm.json");

    let mut cfg = match std::fs::read_to_string(&primary) {
        Ok(text) => serde_json::from_str::<GlmConfig>(&text).unwrap_or_default(),
        Err(_) => GlmConfig::default(),
    };

    if let Ok(url) = std::env::var("GLM_BASE_URL") {
        if !url.is_empty() {
            cfg.base_url = url;
        }
    }
    if let Ok(token) = std::env::var("GLM_AUTH_TOKEN") {
        if !token.is_empty() {
            cfg.auth_token = token;
        }
    }

    cfg
}
