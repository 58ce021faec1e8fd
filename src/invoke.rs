use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::client::CompletionBackend;
use crate::selector::ModelTimeoutPolicy;
use crate::snapshot::{new_files, snapshot};
use crate::summary::summarize;

/// One tool call, as handed over by the protocol shim.
#[derive(Debug, Clone)]
pub struct InvocationRequest {
    pub prompt: String,
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Outcome of one invocation. `text` is what goes back over the wire;
/// `new_files` is the sorted diff of the two snapshots.
#[derive(Debug)]
pub struct InvocationResult {
    pub text: String,
    pub success: bool,
    pub new_files: Vec<PathBuf>,
    pub model: String,
    pub timeout_secs: u64,
}

/// Failures that abort an invocation outright. Everything that goes wrong
/// on the remote side is instead folded into a `success = false` result so
/// the protocol layer always receives well-formed text.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("failed to snapshot {dir}: {source}")]
    Snapshot {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Run one `ccglm` invocation end to end: resolve model and timeout,
/// snapshot the working directory, call the completion backend, snapshot
/// again, diff, summarize.
///
/// The snapshot-after runs even when the remote call failed — a model that
/// timed out may still have written files worth reporting.
pub fn run_invocation(
    request: &InvocationRequest,
    backend: &dyn CompletionBackend,
    policy: &ModelTimeoutPolicy,
    workdir: &Path,
) -> Result<InvocationResult, ToolError> {
    if request.prompt.trim().is_empty() {
        return Err(ToolError::InvalidRequest("prompt must not be empty".into()));
    }

    let (model, timeout_secs) = policy.resolve(request.model.as_deref(), request.timeout_secs);

    let before = snapshot(workdir).map_err(|source| ToolError::Snapshot {
        dir: workdir.to_path_buf(),
        source,
    })?;

    let outcome = backend.complete(&request.prompt, &model, Duration::from_secs(timeout_secs));
    let (raw_output, success) = match outcome {
        Ok(text) => (text, true),
        Err(e) => (format!("❌ {e}"), false),
    };

    let after = snapshot(workdir).map_err(|source| ToolError::Snapshot {
        dir: workdir.to_path_buf(),
        source,
    })?;

    let created = new_files(&before, &after);
    let text = summarize(&created, &raw_output);

    Ok(InvocationResult {
        text,
        success,
        new_files: created,
        model,
        timeout_secs,
    })
}
