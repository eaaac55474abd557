use std::path::PathBuf;

/// Production webhook root of the TilesView provider API.
pub const DEFAULT_BASE_URL: &str = "https://tilesview.ai/Provider/webhooks/";

/// The static `app_key` / `app_secret` header pair sent on every API call.
///
/// Either half may be empty; the transport client refuses to issue a request
/// until both are set.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub app_key: String,
    pub app_secret: String,
}

impl Credentials {
    #[must_use]
    pub fn new(app_key: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            app_key: app_key.into(),
            app_secret: app_secret.into(),
        }
    }

    /// `true` when neither the key nor the secret is empty. Values are taken
    /// as issued: whitespace is not trimmed and counts as content.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.app_key.is_empty() && !self.app_secret.is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |s: &str| if s.is_empty() { "[empty]" } else { "[redacted]" };
        f.debug_struct("Credentials")
            .field("app_key", &redact(&self.app_key))
            .field("app_secret", &redact(&self.app_secret))
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub credentials: Credentials,
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub debug: bool,
    pub log_level: String,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub catalog_path: PathBuf,
}

impl AppConfig {
    /// The tracing filter directive to fall back to when `RUST_LOG` is unset.
    ///
    /// Debug mode always wins over the configured level.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        if self.debug {
            "debug"
        } else {
            &self.log_level
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("credentials", &self.credentials)
            .field("base_url", &self.base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("debug", &self.debug)
            .field("log_level", &self.log_level)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[redacted]"),
            )
            .field("db_max_connections", &self.db_max_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("catalog_path", &self.catalog_path)
            .finish()
    }
}
