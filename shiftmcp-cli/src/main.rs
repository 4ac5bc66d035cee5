mod cli;

use clap::Parser;
use cli::{Cli, Command, collect_arguments};
use serde_json::{Map, Value, json};
use shiftmcp_core::{AppConfig, Dispatcher, build_dispatcher};
use std::error::Error;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    init_tracing();
    let cli = Cli::parse();
    debug!(command = ?cli.command, config = ?cli.config, "CLI arguments parsed");

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(secs) = cli.timeout.filter(|secs| *secs > 0) {
        config.timeout = Duration::from_secs(secs);
    }
    info!(
        providers = config.providers.len(),
        cluster = config.cluster.is_some(),
        "Configuration loaded"
    );

    let dispatcher = build_dispatcher(&config).await?;
    run(cli.command, &dispatcher).await
}

async fn run(command: Command, dispatcher: &Dispatcher) -> Result<ExitCode, Box<dyn Error>> {
    match command {
        Command::Tools => {
            let tools: Vec<_> = dispatcher.list_tools().collect();
            print_json(&json!(tools))?;
        }
        Command::Invoke { tool, json, pairs } => {
            let args = collect_arguments(json.as_deref(), &pairs)?;
            let outcome = dispatcher.invoke(&tool, args).await;
            print_json(&json!(outcome))?;
            if !outcome.is_success() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Providers => {
            let registry = dispatcher.registry();
            let providers: Vec<Value> = registry
                .keys()
                .filter_map(|key| registry.get(key))
                .map(|adapter| json!({ "key": adapter.key(), "model": adapter.model() }))
                .collect();
            print_json(&json!({
                "providers": providers,
                "default_provider": registry.effective_default(),
            }))?;
        }
        Command::Probe { provider } => {
            let results = match provider {
                Some(key) => {
                    let health = dispatcher.registry().probe(&key).await?;
                    let mut results = Map::new();
                    results.insert(key, json!(health));
                    Value::Object(results)
                }
                None => json!(dispatcher.probe_providers().await),
            };
            print_json(&results)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn print_json(value: &Value) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Logs go to stderr so stdout carries only JSON.
fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_level(true)
            .init();
    });
}
