// Environment discovery tests
//
// Every test here mutates process environment, so all of them are #[serial].

use serial_test::serial;
use shiftmcp_core::config::{AppConfig, ConfigError, ProviderKind};
use std::path::PathBuf;
use std::time::Duration;

const VARS: &[&str] = &[
    "GEMINI_API_KEY",
    "GEMINI_MODEL",
    "GEMINI_MAX_TOKENS",
    "GEMINI_TEMPERATURE",
    "OPENAI_API_KEY",
    "OPENAI_MODEL",
    "OPENAI_BASE_URL",
    "OPENAI_MAX_TOKENS",
    "ANTHROPIC_API_KEY",
    "CLAUDE_MODEL",
    "CUSTOM_LLM_API_KEY",
    "CUSTOM_LLM_BASE_URL",
    "CUSTOM_LLM_MODEL",
    "DEFAULT_LLM_PROVIDER",
    "OPENSHIFT_CLUSTER_URL",
    "OPENSHIFT_VERIFY_SSL",
    "TOOL_TIMEOUT_SECS",
    "SHIFTMCP_AUDIT_LOG",
];

/// Clear every variable the loader reads, then apply `vars`.
fn with_env(vars: &[(&str, &str)]) {
    // SAFETY: tests in this binary are serialized; no other thread reads the
    // environment while it is being changed.
    unsafe {
        for var in VARS {
            std::env::remove_var(var);
        }
        for (key, value) in vars {
            std::env::set_var(key, value);
        }
    }
}

#[test]
#[serial]
fn no_credentials_means_no_providers() {
    with_env(&[]);

    let config = AppConfig::from_env().expect("config");

    assert!(config.providers.is_empty());
    assert!(config.default_provider.is_none());
    assert!(config.cluster.is_none());
    assert_eq!(config.timeout, Duration::from_secs(30));
}

#[test]
#[serial]
fn every_credential_registers_a_provider_in_fixed_order() {
    with_env(&[
        ("ANTHROPIC_API_KEY", "ant"),
        ("OPENAI_API_KEY", "sk"),
        ("GEMINI_API_KEY", "g"),
        ("CUSTOM_LLM_API_KEY", "c"),
        ("CUSTOM_LLM_BASE_URL", "http://localhost:8080"),
    ]);

    let config = AppConfig::from_env().expect("config");
    let ids: Vec<&str> = config.providers.iter().map(|p| p.id.as_str()).collect();

    assert_eq!(ids, vec!["gemini", "openai", "claude", "custom"]);
    assert_eq!(config.default_provider.as_deref(), Some("gemini"));
    assert_eq!(config.provider("claude").unwrap().kind(), ProviderKind::Claude);
    assert_eq!(
        config.provider("custom").unwrap().endpoint,
        "http://localhost:8080"
    );
}

#[test]
#[serial]
fn credentials_are_stored_as_references() {
    with_env(&[("GEMINI_API_KEY", "super-secret")]);

    let config = AppConfig::from_env().expect("config");
    let gemini = config.provider("gemini").unwrap();

    assert_eq!(gemini.api_key.as_deref(), Some("GEMINI_API_KEY"));
    assert!(!format!("{config:?}").contains("super-secret"));
}

#[test]
#[serial]
fn model_and_limits_come_from_prefixed_variables() {
    with_env(&[
        ("GEMINI_API_KEY", "g"),
        ("GEMINI_MODEL", "gemini-1.5-pro"),
        ("GEMINI_MAX_TOKENS", "512"),
        ("GEMINI_TEMPERATURE", "0.1"),
        ("OPENAI_API_KEY", "sk"),
    ]);

    let config = AppConfig::from_env().expect("config");

    let gemini = config.provider("gemini").unwrap();
    assert_eq!(gemini.model, "gemini-1.5-pro");
    assert_eq!(gemini.max_tokens, Some(512));
    assert!((gemini.temperature - 0.1).abs() < f32::EPSILON);

    let openai = config.provider("openai").unwrap();
    assert_eq!(openai.model, "gpt-4");
    assert_eq!(openai.max_tokens, Some(2048));
}

#[test]
#[serial]
fn default_provider_variable_is_honoured_when_registered() {
    with_env(&[
        ("GEMINI_API_KEY", "g"),
        ("OPENAI_API_KEY", "sk"),
        ("DEFAULT_LLM_PROVIDER", "openai"),
    ]);
    let config = AppConfig::from_env().expect("config");
    assert_eq!(config.default_provider.as_deref(), Some("openai"));

    with_env(&[("GEMINI_API_KEY", "g"), ("DEFAULT_LLM_PROVIDER", "claude")]);
    let config = AppConfig::from_env().expect("config");
    assert_eq!(config.default_provider.as_deref(), Some("gemini"));
}

#[test]
#[serial]
fn without_gemini_there_is_no_configured_default() {
    with_env(&[("OPENAI_API_KEY", "sk"), ("ANTHROPIC_API_KEY", "ant")]);

    let config = AppConfig::from_env().expect("config");

    assert_eq!(config.providers.len(), 2);
    assert!(config.default_provider.is_none());
}

#[test]
#[serial]
fn custom_provider_requires_a_base_url() {
    with_env(&[("CUSTOM_LLM_API_KEY", "c")]);

    let config = AppConfig::from_env().expect("config");

    assert!(config.provider("custom").is_none());
}

#[test]
#[serial]
fn openai_base_url_keeps_the_chat_path() {
    with_env(&[
        ("OPENAI_API_KEY", "sk"),
        ("OPENAI_BASE_URL", "https://gateway.example/v1"),
    ]);

    let config = AppConfig::from_env().expect("config");
    let openai = config.provider("openai").unwrap();

    assert_eq!(openai.endpoint, "https://gateway.example/v1");
    assert_eq!(openai.api_path.as_deref(), Some("/chat/completions"));
}

#[test]
#[serial]
fn cluster_timeout_and_audit_log_are_discovered() {
    with_env(&[
        ("OPENSHIFT_CLUSTER_URL", "https://api.ocp.example.com:6443"),
        ("OPENSHIFT_VERIFY_SSL", "false"),
        ("TOOL_TIMEOUT_SECS", "12"),
        ("SHIFTMCP_AUDIT_LOG", "/tmp/shiftmcp-audit.jsonl"),
    ]);

    let config = AppConfig::from_env().expect("config");

    let cluster = config.cluster.expect("cluster");
    assert_eq!(cluster.url, "https://api.ocp.example.com:6443");
    assert_eq!(cluster.token.as_deref(), Some("OPENSHIFT_TOKEN"));
    assert!(!cluster.verify_ssl);
    assert_eq!(config.timeout, Duration::from_secs(12));
    assert_eq!(
        config.audit_log,
        Some(PathBuf::from("/tmp/shiftmcp-audit.jsonl"))
    );
}

#[test]
#[serial]
fn invalid_numbers_are_reported() {
    with_env(&[("GEMINI_API_KEY", "g"), ("GEMINI_MAX_TOKENS", "lots")]);
    assert!(matches!(
        AppConfig::from_env(),
        Err(ConfigError::InvalidEnv { var, .. }) if var == "GEMINI_MAX_TOKENS"
    ));

    with_env(&[("TOOL_TIMEOUT_SECS", "0")]);
    assert!(matches!(AppConfig::from_env(), Err(ConfigError::ZeroTimeout)));

    with_env(&[("OPENSHIFT_CLUSTER_URL", "https://x"), ("OPENSHIFT_VERIFY_SSL", "maybe")]);
    assert!(matches!(
        AppConfig::from_env(),
        Err(ConfigError::InvalidEnv { .. })
    ));
}
