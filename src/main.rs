use anyhow::{Context, Result};
use ccglm_mcp::client::GlmHttpClient;
use ccglm_mcp::config::load_config;
use ccglm_mcp::invoke::{run_invocation, InvocationRequest};
use ccglm_mcp::server::{decorate_prompt, run_stdio_server};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "ccglm-mcp")]
#[command(version)]
#[command(about = "MCP stdio server bridging coding agents to GLM completions")]
struct Cli {
    /// Run a single completion without an MCP client and print the result.
    #[arg(long, value_name = "TEXT")]
    prompt: Option<String>,

    /// Model identifier (defaults to the configured default model).
    #[arg(long)]
    model: Option<String>,

    /// Completion timeout in seconds (clamped to the configured ceiling).
    #[arg(long)]
    timeout: Option<u64>,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start MCP stdio server
    Mcp,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let workdir = std::env::current_dir().context("Failed to get current dir")?;
    let config = load_config(&workdir);

    if matches!(cli.cmd, Some(Command::Mcp)) {
        return run_stdio_server(config);
    }

    // ── One-shot mode: same pipeline as the tool, no MCP client needed ────
    let Some(prompt) = cli.prompt else {
        anyhow::bail!("nothing to do: pass --prompt TEXT, or the `mcp` subcommand");
    };

    if let Some(model) = cli.model.as_deref() {
        if !config.is_supported_model(model) {
            anyhow::bail!(
                "unsupported model: {model} (expected one of {:?})",
                config.models
            );
        }
    }

    let request = InvocationRequest {
        prompt: decorate_prompt(&prompt),
        model: cli.model,
        timeout_secs: cli.timeout,
    };
    let backend = GlmHttpClient::new(config.base_url.clone(), config.auth_token.clone());
    let result = run_invocation(&request, &backend, &config.policy(), &workdir)?;

    println!("{}", result.text);
    if !result.success {
        std::process::exit(1);
    }
    Ok(())
}
