use super::*;

#[test]
fn default_config_matches_stock_markup() {
    let config = PageConfig::default();
    assert_eq!(config.theme_toggle_id, "theme-toggle");
    assert_eq!(config.theme_storage_key, "theme");
    assert_eq!(config.nav_wrapper_class, "nav-wrapper");
    assert_eq!(config.back_to_top_id, "back-to-top");
    assert_eq!(config.home_page, "index.html");
    assert_eq!(config.submit_delay(), Duration::from_millis(1500));
}

#[test]
fn empty_object_parses_to_defaults() {
    let config = PageConfig::from_json("{}").unwrap();
    assert_eq!(config, PageConfig::default());
}

#[test]
fn partial_object_overrides_only_named_fields() {
    let config = PageConfig::from_json(r#"{"submit_delay_ms": 10, "home_page": "/"}"#).unwrap();
    assert_eq!(config.submit_delay_ms, 10);
    assert_eq!(config.home_page, "/");
    assert_eq!(config.theme_storage_key, "theme");
}

#[test]
fn malformed_json_is_a_parse_error() {
    let err = PageConfig::from_json("{not json").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn unknown_log_level_is_rejected() {
    let err = PageConfig::from_json(r#"{"log_level": "loud"}"#).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidLogLevel(level) if level == "loud"));
}

#[test]
fn log_level_is_case_insensitive() {
    let config = PageConfig::from_json(r#"{"log_level": "DEBUG"}"#).unwrap();
    assert_eq!(config.log_level_filter().unwrap(), LevelFilter::Debug);
}

#[test]
fn redirect_contexts_match_anywhere_in_address() {
    let config = PageConfig::default();
    assert!(config.redirects_after_submit("https://example.com/login.html"));
    assert!(config.redirects_after_submit("https://example.com/signup.html?next=1"));
    assert!(!config.redirects_after_submit("https://example.com/contact.html"));
}

#[test]
fn empty_redirect_context_never_matches() {
    let config = PageConfig { redirect_contexts: vec![String::new()], ..PageConfig::default() };
    assert!(!config.redirects_after_submit("https://example.com/contact.html"));
}
