//! Application constants
//!
//! Single source of truth for paths, endpoints and other defaults.

/// Default configuration file path
pub const CONFIG_PATH: &str = "config/server.toml";

/// Environment files loaded once at startup, in order
pub const ENV_PATHS: [&str; 2] = ["config/.env", ".env"];

/// Upper bound for a single invocation when nothing else is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default sampling temperature for every provider
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Output token limit used when discovering providers from the environment
pub const DEFAULT_ENV_MAX_TOKENS: u32 = 2048;

/// Claude requires `max_tokens` on every request
pub const CLAUDE_FALLBACK_MAX_TOKENS: u32 = 1000;

pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_API_PATH: &str = "v1beta/models";
pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com";
pub const DEFAULT_OPENAI_API_PATH: &str = "/v1/chat/completions";
pub const DEFAULT_CLAUDE_ENDPOINT: &str = "https://api.anthropic.com";
pub const DEFAULT_CLAUDE_API_PATH: &str = "/v1/messages";
pub const CLAUDE_API_VERSION: &str = "2023-06-01";
pub const DEFAULT_CUSTOM_API_PATH: &str = "/generate";
pub const DEFAULT_CUSTOM_HEALTH_PATH: &str = "/health";

/// Prompt sent by connectivity probes
pub const PROBE_PROMPT: &str = "Hello";

/// Output token limit for connectivity probes
pub const PROBE_MAX_TOKENS: u32 = 10;

pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant with access to OpenShift cluster management tools.";
