use super::*;

#[test]
fn from_values_applies_defaults() {
    let cfg = ClientConfig::from_values(None, None, None).unwrap();
    assert_eq!(cfg.api_base, DEFAULT_API_BASE);
    assert_eq!(cfg.session_key, DEFAULT_SESSION_KEY);
    assert_eq!(cfg.legacy_token_key, LEGACY_TOKEN_KEY);
    assert_eq!(cfg.login_route, LOGIN_ROUTE);
    assert_eq!(cfg.environment, default_environment());
}

#[test]
fn from_values_trims_trailing_slash_from_api_base() {
    let cfg = ClientConfig::from_values(Some(" https://shop.example/ "), None, None).unwrap();
    assert_eq!(cfg.api_base, "https://shop.example");
}

#[test]
fn from_values_parses_environment_names() {
    let dev = ClientConfig::from_values(None, Some("Development"), None).unwrap();
    assert_eq!(dev.environment, BuildEnvironment::Development);
    assert!(dev.environment.is_development());

    let prod = ClientConfig::from_values(None, Some("prod"), None).unwrap();
    assert_eq!(prod.environment, BuildEnvironment::Production);
    assert!(!prod.environment.is_development());
}

#[test]
fn from_values_unknown_environment_errors() {
    let err = ClientConfig::from_values(None, Some("staging"), None).unwrap_err();
    assert_eq!(err, ConfigError::UnknownEnvironment("staging".to_owned()));
    assert!(err.to_string().contains("unknown CMS_ENV"));
}

#[test]
fn from_values_rejects_blank_session_key() {
    let err = ClientConfig::from_values(None, None, Some("  ")).unwrap_err();
    assert_eq!(err, ConfigError::EmptySessionKey);
}

#[test]
fn from_values_accepts_custom_session_key() {
    let cfg = ClientConfig::from_values(None, None, Some("admin_session")).unwrap();
    assert_eq!(cfg.session_key, "admin_session");
}

#[test]
fn from_build_env_succeeds_without_overrides() {
    assert!(ClientConfig::from_build_env().is_ok());
}

#[test]
fn url_joins_relative_paths() {
    let cfg = ClientConfig::from_values(Some("https://api.test"), None, None).unwrap();
    assert_eq!(cfg.url("/api/auth/me"), "https://api.test/api/auth/me");
    assert_eq!(cfg.url("api/auth/me"), "https://api.test/api/auth/me");
}

#[test]
fn url_passes_absolute_urls_through() {
    let cfg = ClientConfig::default();
    assert_eq!(cfg.url("https://cdn.test/a.png"), "https://cdn.test/a.png");
}
