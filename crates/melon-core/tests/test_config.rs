use melon_core::config::{
    resolve_api_key, AiConfig, AppConfig, ProviderKind, RetryConfig,
};
use melon_core::consts::DEFAULT_REQUEST_TIMEOUT_SECS;
use melon_core::error::MelonError;
use melon_core::provider::{AiBackend, Backend};

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

#[test]
fn test_default_provider_is_gemini() {
    assert_eq!(AiConfig::default().default_provider, ProviderKind::Gemini);
}

#[test]
fn test_provider_kind_display() {
    assert_eq!(format!("{}", ProviderKind::Gemini), "Gemini");
    assert_eq!(format!("{}", ProviderKind::OpenRouter), "OpenRouter");
}

#[test]
fn test_defaults_match_provider_documentation() {
    let ai = AiConfig::default();
    assert_eq!(ai.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    assert_eq!(ai.retry.max_retries, 0);
    assert_eq!(ai.gemini.text_model, "gemini-pro");
    assert_eq!(ai.gemini.vision_model, "gemini-pro-vision");
    assert_eq!(ai.openrouter.text_model, "anthropic/claude-3-opus");
    assert_eq!(ai.openrouter.vision_model, "openai/gpt-4-vision");
    assert!((ai.openrouter.temperature - 0.7).abs() < 1e-6);
    assert_eq!(ai.openrouter.max_tokens, 1000);
}

// ---------------------------------------------------------------------------
// TOML
// ---------------------------------------------------------------------------

#[test]
fn test_empty_toml_gives_defaults() {
    let config = AppConfig::from_toml_str("").unwrap();
    assert_eq!(config.ai.default_provider, ProviderKind::Gemini);
    assert_eq!(config.ai.retry, RetryConfig::default());
}

#[test]
fn test_partial_toml_keeps_other_defaults() {
    let config = AppConfig::from_toml_str(
        r#"
[ai]
default_provider = "OpenRouter"
request_timeout_secs = 10

[ai.openrouter]
api_key = "sk-or-test"
vision_model = "anthropic/claude-3.5-sonnet"

[ai.retry]
max_retries = 3
"#,
    )
    .unwrap();

    assert_eq!(config.ai.default_provider, ProviderKind::OpenRouter);
    assert_eq!(config.ai.request_timeout_secs, 10);
    assert_eq!(config.ai.openrouter.api_key.as_deref(), Some("sk-or-test"));
    assert_eq!(config.ai.openrouter.vision_model, "anthropic/claude-3.5-sonnet");
    assert_eq!(config.ai.openrouter.text_model, "anthropic/claude-3-opus");
    assert_eq!(config.ai.retry.max_retries, 3);
    assert_eq!(config.ai.retry.min_delay_ms, 1_000);
    assert_eq!(config.ai.gemini.max_output_tokens, 1000);
}

#[test]
fn test_toml_roundtrip() {
    let mut config = AppConfig::default();
    config.ai.default_provider = ProviderKind::OpenRouter;
    config.ai.gemini.temperature = 0.2;

    let text = config.to_toml_string().unwrap();
    let parsed = AppConfig::from_toml_str(&text).unwrap();
    assert_eq!(parsed.ai.default_provider, ProviderKind::OpenRouter);
    assert!((parsed.ai.gemini.temperature - 0.2).abs() < 1e-6);
}

#[test]
fn test_invalid_toml_is_config_error() {
    let err = AppConfig::from_toml_str("[ai]\ndefault_provider = \"Clippy\"").unwrap_err();
    assert!(matches!(err, MelonError::Config(_)), "got {err:?}");
}

#[test]
fn test_zero_timeout_is_config_error() {
    let err = AppConfig::from_toml_str("[ai]\nrequest_timeout_secs = 0").unwrap_err();
    match err {
        MelonError::Config(msg) => assert!(msg.contains("request_timeout_secs"), "{msg}"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_default_config_is_valid() {
    assert!(AiConfig::default().validate().is_ok());
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("melon.toml");
    std::fs::write(&path, "[ai.gemini]\ntext_model = \"gemini-1.5-flash\"\n").unwrap();

    let config = AppConfig::load(&path).unwrap();
    assert_eq!(config.ai.gemini.text_model, "gemini-1.5-flash");
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = AppConfig::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, MelonError::Io(_)));
}

// ---------------------------------------------------------------------------
// API keys and backend selection
// ---------------------------------------------------------------------------

#[test]
fn test_configured_key_wins() {
    let key = resolve_api_key(Some("  from-config "), "MELON_TEST_UNSET_KEY_A");
    assert_eq!(key.as_deref(), Some("from-config"));
}

#[test]
fn test_blank_key_falls_back_to_environment() {
    std::env::set_var("MELON_TEST_KEY_B", "from-env");
    let key = resolve_api_key(Some(""), "MELON_TEST_KEY_B");
    assert_eq!(key.as_deref(), Some("from-env"));
}

#[test]
fn test_missing_key_everywhere_is_none() {
    assert_eq!(resolve_api_key(None, "MELON_TEST_UNSET_KEY_C"), None);
}

#[test]
fn test_backend_follows_default_provider() {
    let mut ai = AiConfig::default();
    ai.gemini.api_key = Some("g-key".into());
    ai.openrouter.api_key = Some("or-key".into());

    let backend = Backend::from_config(&ai).unwrap();
    assert_eq!(backend.kind(), ProviderKind::Gemini);
    assert_eq!(backend.name(), "Gemini");

    ai.default_provider = ProviderKind::OpenRouter;
    let backend = Backend::from_config(&ai).unwrap();
    assert_eq!(backend.kind(), ProviderKind::OpenRouter);
    assert_eq!(backend.name(), "OpenRouter");
}

#[test]
fn test_backend_override() {
    let mut ai = AiConfig::default();
    ai.openrouter.api_key = Some("or-key".into());
    let backend = Backend::for_provider(ProviderKind::OpenRouter, &ai).unwrap();
    assert_eq!(backend.kind(), ProviderKind::OpenRouter);
}
