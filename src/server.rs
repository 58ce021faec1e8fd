use anyhow::Result;
use serde_json::json;
use std::io::{BufRead, Write};

use crate::client::GlmHttpClient;
use crate::config::GlmConfig;
use crate::invoke::{run_invocation, InvocationRequest};
use crate::locale::is_chinese_text;

pub struct ServerState {
    config: GlmConfig,
}

/// Chinese prompts carry an explicit respond-in-Chinese instruction.
pub fn decorate_prompt(prompt: &str) -> String {
    if is_chinese_text(prompt) {
        format!("{prompt}\n\n请用中文回复。")
    } else {
        prompt.to_string()
    }
}

impl ServerState {
    pub fn new(config: GlmConfig) -> Self {
        Self { config }
    }

    fn tool_list(&self, id: serde_json::Value) -> serde_json::Value {
        json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": {
                "tools": [
                    {
                        "name": "ccglm",
                        "description": "Send a prompt to GLM and return the completion. Generated code may write files into the working directory; any files created during the call are listed at the end of the result.",
                        "inputSchema": {
                            "type": "object",
                            "properties": {
                                "prompt": { "type": "string", "description": "The prompt to forward to GLM" },
                                "model": { "type": "string", "enum": self.config.models.clone(), "description": format!("Model to use (default {})", self.config.default_model) },
                                "timeout": { "type": "integer", "description": format!("Max seconds to wait for the completion (clamped to {})", self.config.max_timeout_secs) }
                            },
                            "required": ["prompt"]
                        }
                    }
                ]
            }
        })
    }

    fn tool_call(&self, id: serde_json::Value, params: &serde_json::Value) -> serde_json::Value {
        let name = params.get("name").and_then(|n| n.as_str()).unwrap_or("");
        let args = params.get("arguments").cloned().unwrap_or(json!({}));

        let ok = |text: String| {
            json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": { "content": [{"type":"text","text": text }], "isError": false }
            })
        };

        let err = |msg: String| {
            json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": { "content": [{"type":"text","text": msg }], "isError": true }
            })
        };

        match name {
            "ccglm" => {
                let Some(prompt) = args
                    .get("prompt")
                    .and_then(|v| v.as_str())
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                else {
                    return err("Missing prompt".to_string());
                };

                let model = args.get("model").and_then(|v| v.as_str());
                if let Some(m) = model {
                    if !self.config.is_supported_model(m) {
                        return err(format!(
                            "Unsupported model: {m} (expected one of {:?})",
                            self.config.models
                        ));
                    }
                }

                let timeout_secs = args
                    .get("timeout")
                    .and_then(|v| v.as_i64())
                    .map(|t| t.max(0) as u64);

                let request = InvocationRequest {
                    prompt: decorate_prompt(prompt),
                    model: model.map(String::from),
                    timeout_secs,
                };

                let workdir = match std::env::current_dir() {
                    Ok(d) => d,
                    Err(e) => return err(format!("working directory unavailable: {e}")),
                };

                crate::debug_log!("[ccglm] prompt: {} chars", request.prompt.len());

                let backend = GlmHttpClient::new(
                    self.config.base_url.clone(),
                    self.config.auth_token.clone(),
                );
                match run_invocation(&request, &backend, &self.config.policy(), &workdir) {
                    Ok(res) if res.success => ok(res.text),
                    Ok(res) => err(res.text),
                    Err(e) => err(e.to_string()),
                }
            }
            _ => err(format!("Tool not found: {name}")),
        }
    }
}

pub fn run_stdio_server(config: GlmConfig) -> Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    let state = ServerState::new(config);

    for line in stdin.lock().lines() {
        let Ok(line) = line else { continue };
        if line.trim().is_empty() {
            continue;
        }

        let msg: serde_json::Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(_) => continue,
        };

        // JSON-RPC notifications have no "id" field — don't respond.
        let has_id = msg.get("id").is_some();
        if !has_id {
            // Side-effect-only notifications (initialize ack, cancel, log, etc.) — ignore.
            continue;
        }

        let id = msg.get("id").cloned().unwrap_or(json!(null));
        let method = msg.get("method").and_then(|m| m.as_str()).unwrap_or("");

        let reply = match method {
            "initialize" => json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {
                    "protocolVersion": msg.get("params").and_then(|p| p.get("protocolVersion")).cloned().unwrap_or(json!("2024-11-05")),
                    "capabilities": { "tools": { "listChanged": true } },
                    "serverInfo": { "name": "ccglm-mcp", "version": env!("CARGO_PKG_VERSION") }
                }
            }),
            "ping" => json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {}
            }),
            "tools/list" => state.tool_list(id),
            "tools/call" => {
                let params = msg.get("params").cloned().unwrap_or(json!({}));
                state.tool_call(id, &params)
            }
            // Return empty lists for resources/prompts — we don't implement them.
            "resources/list" => json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": { "resources": [] }
            }),
            "prompts/list" => json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": { "prompts": [] }
            }),
            _ => json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": -32601, "message": format!("Method not found: {method}") }
            }),
        };

        writeln!(stdout, "{}", reply)?;
        stdout.flush()?;
    }

    Ok(())
}
