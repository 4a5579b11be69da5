//! Client configuration resolved at build time.
//!
//! The bundle is a static browser artifact, so every setting comes from
//! `option_env!` when the WASM is compiled:
//!
//! - `CMS_API_BASE`: REST origin, default [`DEFAULT_API_BASE`]
//! - `CMS_ENV`: `development` or `production`; defaults to `development`
//!   for debug builds and `production` otherwise
//! - `CMS_SESSION_KEY`: `localStorage` key of the session blob, default
//!   [`DEFAULT_SESSION_KEY`]

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_API_BASE: &str = "http://localhost:8080";
pub const DEFAULT_SESSION_KEY: &str = "cms_session";
/// Dedicated token key written by older builds, migrated on hydrate.
pub const LEGACY_TOKEN_KEY: &str = "token";
pub const LOGIN_ROUTE: &str = "/login";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown CMS_ENV: {0}")]
    UnknownEnvironment(String),

    #[error("CMS_SESSION_KEY must not be empty")]
    EmptySessionKey,
}

/// Build flavor; gates verbose logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildEnvironment {
    Development,
    Production,
}

impl BuildEnvironment {
    #[must_use]
    pub fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base: String,
    pub session_key: String,
    pub legacy_token_key: String,
    pub login_route: String,
    pub environment: BuildEnvironment,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_owned(),
            session_key: DEFAULT_SESSION_KEY.to_owned(),
            legacy_token_key: LEGACY_TOKEN_KEY.to_owned(),
            login_route: LOGIN_ROUTE.to_owned(),
            environment: default_environment(),
        }
    }
}

impl ClientConfig {
    /// Build the config baked into this binary.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a compile-time variable holds an invalid value.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_values(option_env!("CMS_API_BASE"), option_env!("CMS_ENV"), option_env!("CMS_SESSION_KEY"))
    }

    /// Build a config from raw optional values, applying defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an unknown environment name or an empty
    /// session key.
    pub fn from_values(
        api_base: Option<&str>,
        environment: Option<&str>,
        session_key: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let api_base = normalize_api_base(api_base.unwrap_or(DEFAULT_API_BASE));
        let environment = parse_environment(environment)?;
        let session_key = match session_key.map(str::trim) {
            None => DEFAULT_SESSION_KEY.to_owned(),
            Some("") => return Err(ConfigError::EmptySessionKey),
            Some(key) => key.to_owned(),
        };

        Ok(Self {
            api_base,
            session_key,
            legacy_token_key: LEGACY_TOKEN_KEY.to_owned(),
            login_route: LOGIN_ROUTE.to_owned(),
            environment,
        })
    }

    /// Join `path` onto the API base. Absolute URLs pass through unchanged.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_owned();
        }
        if path.starts_with('/') {
            format!("{}{path}", self.api_base)
        } else {
            format!("{}/{path}", self.api_base)
        }
    }
}

fn normalize_api_base(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

fn default_environment() -> BuildEnvironment {
    if cfg!(debug_assertions) {
        BuildEnvironment::Development
    } else {
        BuildEnvironment::Production
    }
}

fn parse_environment(raw: Option<&str>) -> Result<BuildEnvironment, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default_environment());
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "development" | "dev" => Ok(BuildEnvironment::Development),
        "production" | "prod" => Ok(BuildEnvironment::Production),
        other => Err(ConfigError::UnknownEnvironment(other.to_owned())),
    }
}
