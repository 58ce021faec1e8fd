use std::collections::HashMap;

/// Fallback timeout for models without a registered per-model default.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Hard ceiling: no invocation waits longer than this, whatever the request says.
pub const MAX_TIMEOUT_SECS: u64 = 600;

/// Per-model timeout defaults plus the global default/ceiling pair.
///
/// Invariant: `resolve` never returns a timeout outside `[1, max_timeout_secs]`.
#[derive(Debug, Clone)]
pub struct ModelTimeoutPolicy {
    pub default_model: String,
    pub default_timeout_secs: u64,
    pub max_timeout_secs: u64,
    pub per_model_secs: HashMap<String, u64>,
}

impl ModelTimeoutPolicy {
    /// Resolve the effective model and timeout for one invocation.
    ///
    /// The model identifier is passed through unchanged — validating it
    /// against the supported set is the tool boundary's job. Timeout
    /// precedence: explicit request (clamped to `[1, ceiling]`), registered
    /// per-model default, global default.
    pub fn resolve(&self, model: Option<&str>, timeout_secs: Option<u64>) -> (String, u64) {
        let model = model.unwrap_or(&self.default_model).to_string();
        let timeout = match timeout_secs {
            Some(t) => t.clamp(1, self.max_timeout_secs),
            None => self
                .per_model_secs
                .get(&model)
                .copied()
                .unwrap_or(self.default_timeout_secs)
                .min(self.max_timeout_secs),
        };
        (model, timeout)
    }
}
