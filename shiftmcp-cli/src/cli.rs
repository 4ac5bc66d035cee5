use clap::{Parser, Subcommand};
use serde_json::Value;
use shiftmcp_core::ToolArguments;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "shiftmcp",
    version,
    about = "Dispatch cluster and completion tools from the command line"
)]
pub struct Cli {
    /// Configuration file (defaults to config/server.toml, then environment variables)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Per-invocation timeout in seconds, overriding the configuration
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List registered tools and their input schemas
    Tools,
    /// Invoke a tool and print the outcome as JSON
    Invoke {
        tool: String,
        /// Arguments as one JSON object
        #[arg(long = "args")]
        json: Option<String>,
        /// Single argument as key=value; the value is parsed as JSON when possible
        #[arg(long = "arg", value_parser = parse_key_value)]
        pairs: Vec<(String, Value)>,
    },
    /// List configured completion providers
    Providers,
    /// Probe provider connectivity
    Probe {
        /// Probe only this provider
        #[arg(long)]
        provider: Option<String>,
    },
}

pub fn parse_key_value(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{raw}'"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Merge `--args` and `--arg` into one argument object. Pairs win over the
/// JSON object.
pub fn collect_arguments(
    json: Option<&str>,
    pairs: &[(String, Value)],
) -> Result<ToolArguments, String> {
    let mut args = match json {
        Some(raw) => {
            let value = serde_json::from_str::<Value>(raw)
                .map_err(|err| format!("--args is not valid JSON: {err}"))?;
            ToolArguments::from_value(value)
                .ok_or_else(|| "--args must be a JSON object".to_string())?
        }
        None => ToolArguments::new(),
    };
    for (key, value) in pairs {
        args.insert(key.clone(), value.clone());
    }
    Ok(args)
}
