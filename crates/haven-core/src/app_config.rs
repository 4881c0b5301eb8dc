use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub directory_path: PathBuf,
    pub mapbox_access_token: Option<String>,
    pub geocodio_api_key: Option<String>,
    pub geocode_timeout_secs: u64,
    pub geocode_retry_backoff_ms: u64,
    pub rate_limit_max_requests: u32,
    pub rate_limit_window_secs: u64,
    pub cache_ttl_secs: u64,
    pub degraded_cache_ttl_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("directory_path", &self.directory_path)
            .field(
                "mapbox_access_token",
                &self.mapbox_access_token.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "geocodio_api_key",
                &self.geocodio_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("geocode_timeout_secs", &self.geocode_timeout_secs)
            .field("geocode_retry_backoff_ms", &self.geocode_retry_backoff_ms)
            .field("rate_limit_max_requests", &self.rate_limit_max_requests)
            .field("rate_limit_window_secs", &self.rate_limit_window_secs)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("degraded_cache_ttl_secs", &self.degraded_cache_ttl_secs)
            .finish()
    }
}
